use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

use crate::{
    error::ApiError,
    models::turnos::ESTADOS,
    protocol::FieldError,
    utils::{parse_date_str, parse_time_str},
};

/// Collects per-field errors while extracting request values.
///
/// Every check returns a value even when it fails (an empty string, a zeroed
/// date, ...); `finish` must be called before any of them is used.
#[derive(Default)]
pub struct Validator {
    errores: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn reject(&mut self, path: &str, msg: String) {
        self.errores.push(FieldError::new(path, msg));
    }

    pub fn text(&mut self, path: &str, value: Option<String>, max: usize) -> String {
        match value {
            Some(value) if !value.is_empty() => {
                if value.chars().count() > max {
                    self.reject(path, format!("{} admite como máximo {} caracteres", path, max));
                }
                value
            }
            _ => {
                self.reject(path, format!("{} es obligatorio", path));
                String::new()
            }
        }
    }

    /// Non-empty, with no length limit.
    pub fn required(&mut self, path: &str, value: Option<String>) -> String {
        match value {
            Some(value) if !value.is_empty() => value,
            _ => {
                self.reject(path, format!("{} es obligatorio", path));
                String::new()
            }
        }
    }

    /// Optional text; an empty string counts as absent.
    pub fn optional_text(&mut self, path: &str, value: Option<String>, max: usize) -> Option<String> {
        let value = value.filter(|v| !v.is_empty())?;
        if value.chars().count() > max {
            self.reject(path, format!("{} admite como máximo {} caracteres", path, max));
        }
        Some(value)
    }

    pub fn date(&mut self, path: &str, value: Option<String>) -> NaiveDate {
        match value.as_deref().and_then(parse_date_str) {
            Some(date) => date,
            None => {
                self.reject(path, format!("{} debe ser una fecha con formato YYYY-MM-DD", path));
                NaiveDate::default()
            }
        }
    }

    pub fn time(&mut self, path: &str, value: Option<String>) -> NaiveTime {
        match value.as_deref().and_then(parse_time_str) {
            Some(time) => time,
            None => {
                self.reject(path, format!("{} debe ser una hora con formato HH:MM:SS", path));
                NaiveTime::default()
            }
        }
    }

    pub fn id(&mut self, path: &str, value: Option<i64>) -> i32 {
        match value.and_then(|v| i32::try_from(v).ok()).filter(|v| *v >= 1) {
            Some(id) => id,
            None => {
                self.reject(path, format!("{} debe ser un entero mayor o igual a 1", path));
                0
            }
        }
    }

    pub fn estado(&mut self, path: &str, value: Option<String>) -> String {
        match value {
            Some(estado) if ESTADOS.contains(&estado.as_str()) => estado,
            _ => {
                self.reject(path, format!("{} debe ser uno de: {}", path, ESTADOS.join(", ")));
                String::new()
            }
        }
    }

    /// Validates and normalizes (trims, lower-cases) an email address.
    pub fn email(&mut self, path: &str, value: Option<String>) -> String {
        static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
        let re = EMAIL_RE.get_or_init(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
        });

        let email = value.unwrap_or_default().trim().to_lowercase();
        if !re.is_match(&email) {
            self.reject(path, "Email inválido".to_string());
        }
        email
    }

    /// At least 8 characters, one lowercase letter and one digit.
    pub fn strong_password(&mut self, path: &str, value: Option<String>) -> String {
        let password = value.unwrap_or_default();
        let strong = password.chars().count() >= 8
            && password.chars().any(|c| c.is_lowercase())
            && password.chars().any(|c| c.is_ascii_digit());
        if !strong {
            self.reject(
                path,
                "La contraseña debe tener al menos 8 caracteres, una minúscula y un número"
                    .to_string(),
            );
        }
        password
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errores.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errores))
        }
    }
}

/// Path ids must be positive.
pub fn path_id(raw: i64) -> Result<i32, ApiError> {
    let mut v = Validator::new();
    let id = v.id("id", Some(raw));
    v.finish()?;
    Ok(id)
}
