/// Generates the actix route for each `(name, method, url, fail_msg, { args })`
/// entry. The route forwards its extractors to `<name>_impl` and tags internal
/// failures with `fail_msg`.
#[macro_export]
macro_rules! route_funcs {
    ( $( ( $func_name:ident, $method:ident, $url:literal, $fail_msg:literal, { $( $arg:ident : $ty:ty ),* $(,)? } ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[actix_web::$method($url)]
                async fn $func_name(
                    $( $arg: $ty ),*
                ) -> Result<actix_web::HttpResponse, $crate::error::ApiError> {
                    [<$func_name _impl>]( $( $arg ),* )
                        .await
                        .map_err(|err| err.with_fail_msg($fail_msg))
                }
            }
        )+
    };
}

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::OnceLock;

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TIME_FMT: &str = "%H:%M:%S";

pub fn parse_date_str<S: AsRef<str>>(s: S) -> Option<NaiveDate> {
    let s = s.as_ref();
    // chrono accepts unpadded fields, the API does not
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FMT).ok()
}

pub fn parse_time_str<S: AsRef<str>>(s: S) -> Option<NaiveTime> {
    static HORA_RE: OnceLock<Regex> = OnceLock::new();
    let re = HORA_RE.get_or_init(|| {
        Regex::new(r"^([01]\d|2[0-3]):([0-5]\d):([0-5]\d)$").expect("valid time regex")
    });

    let s = s.as_ref();
    if !re.is_match(s) {
        return None;
    }
    NaiveTime::parse_from_str(s, TIME_FMT).ok()
}

pub fn full_name(nombre: &str, apellido: &str) -> String {
    format!("{} {}", nombre, apellido)
}

/// Keeps `null` apart from a missing field: absent gives `None`, `null`
/// gives `Some(None)`. Use together with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
