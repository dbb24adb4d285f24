use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Once,
    },
    time::Duration,
};

use actix_web::{
    body::MessageBody,
    dev::ServiceResponse,
    http::{header, StatusCode},
    test,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use diesel::{prelude::*, r2d2::ConnectionManager, MysqlConnection};
use serde_json::Value;

use crate::{
    auth::token::issue_token,
    config::Config,
    database::inserted_id,
    models::{medicos::MedicoData, pacientes::PacienteData, turnos::TurnoData},
    DbPool,
};

const SCHEMA: &str = include_str!("../../migrations/2024-05-20-000000_create_turnos/up.sql");
const TEST_SECRET: &str = "test-secret-key-for-jwt-validation";

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        jwt_secret: TEST_SECRET.to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        static_dir: "./static".to_string(),
        db_pool_size: 4,
    }
}

pub fn bearer() -> String {
    let token = issue_token(1, "test@example.com", TEST_SECRET).expect("sign test token");
    format!("Bearer {}", token)
}

/// A pool that never connects; for requests rejected before any query.
pub fn offline_pool() -> DbPool {
    let manager = ConnectionManager::<MysqlConnection>::new("mysql://nobody@127.0.0.1:1/none");
    r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_millis(200))
        .build_unchecked(manager)
}

/// Pool on `TEST_DATABASE_URL` with the schema applied, or `None` when the
/// variable is unset.
pub fn test_pool() -> Option<DbPool> {
    static SCHEMA_APPLIED: Once = Once::new();

    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!(
            "TEST_DATABASE_URL not set; skipping database test {}",
            std::thread::current().name().unwrap_or("?")
        );
        return None;
    };
    let pool = crate::database::build_pool(&url, 4).expect("connect to TEST_DATABASE_URL");
    SCHEMA_APPLIED.call_once(|| {
        let mut conn = pool.get().expect("test connection");
        for stmt in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            diesel::sql_query(stmt)
                .execute(&mut *conn)
                .expect("apply schema");
        }
    });
    Some(pool)
}

/// Short unique string for natural keys (DNI allows 20 characters).
pub fn unique_key() -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed) % 1000;
    format!("{}{:03}", Utc::now().timestamp_micros() % 1_000_000_000_000, n)
}

pub fn authed(req: test::TestRequest) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, bearer()))
}

pub async fn status_and_json<B: MessageBody>(resp: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = resp.status();
    let body = test::read_body_json(resp).await;
    (status, body)
}

pub fn insert_paciente(pool: &DbPool) -> i32 {
    use crate::schema::paciente;

    let mut conn = pool.get().expect("test connection");
    let key = unique_key();
    diesel::insert_into(paciente::table)
        .values(PacienteData {
            nombre: "Juan".to_string(),
            apellido: format!("Perez{}", key),
            dni: key,
            fecha_nacimiento: NaiveDate::from_ymd_opt(1980, 5, 17).expect("valid date"),
            obra_social: None,
        })
        .execute(&mut *conn)
        .expect("insert paciente");
    inserted_id(&mut *conn).expect("paciente id")
}

pub fn insert_medico(pool: &DbPool) -> i32 {
    use crate::schema::medico;

    let mut conn = pool.get().expect("test connection");
    let key = unique_key();
    diesel::insert_into(medico::table)
        .values(MedicoData {
            nombre: "Laura".to_string(),
            apellido: format!("Gomez{}", key),
            especialidad: "Clínica médica".to_string(),
            matricula_profesional: format!("MP-{}", key),
        })
        .execute(&mut *conn)
        .expect("insert medico");
    inserted_id(&mut *conn).expect("medico id")
}

pub fn insert_turno(pool: &DbPool, paciente_id: i32, medico_id: i32, hora: &str) -> i32 {
    use crate::schema::turno;

    let mut conn = pool.get().expect("test connection");
    diesel::insert_into(turno::table)
        .values(TurnoData {
            paciente_id,
            medico_id,
            fecha: NaiveDate::from_ymd_opt(2030, 1, 15).expect("valid date"),
            hora: NaiveTime::parse_from_str(hora, "%H:%M:%S").expect("valid time"),
            estado: "pendiente".to_string(),
            observaciones: None,
        })
        .execute(&mut *conn)
        .expect("insert turno");
    inserted_id(&mut *conn).expect("turno id")
}
