#[macro_use]
extern crate diesel;

mod appointment;
mod auth;
mod config;
mod database;
mod doctor;
mod error;
mod models;
mod patient;
mod protocol;
mod schema;
mod utils;
mod validation;

use actix_files::Files;
use actix_web::{
    body::BoxBody,
    dev::{fn_service, ServiceFactory, ServiceRequest, ServiceResponse},
    guard, middleware, web, App, HttpResponse, HttpServer,
};
use diesel::{r2d2::ConnectionManager, MysqlConnection};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::Config, error::ApiError, protocol::ErrorResponse};

type DbPool = r2d2::Pool<ConnectionManager<MysqlConnection>>;

const ROUTE_NOT_FOUND: &str = "Ruta no encontrada";

fn not_found_response() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(ROUTE_NOT_FOUND))
}

async fn not_found() -> HttpResponse {
    not_found_response()
}

/// All API routes with their shared state. Static files are mounted by
/// `main` on top of this.
pub fn create_app(
    pool: DbPool,
    config: Config,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(pool))
        .app_data(web::Data::new(config))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            ApiError::field("body", format!("Cuerpo de la solicitud inválido: {}", err)).into()
        }))
        .app_data(
            web::PathConfig::default()
                .error_handler(|_err, _req| ApiError::field("id", "ID inválido").into()),
        )
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            ApiError::field("query", format!("Parámetros inválidos: {}", err)).into()
        }))
        // auth
        .service(web::scope("/auth").configure(auth::config))
        // pacientes
        .service(web::scope("/pacientes").configure(patient::config))
        // medicos
        .service(web::scope("/medicos").configure(doctor::config))
        // turnos
        .service(web::scope("/turnos").configure(appointment::config))
        .default_service(web::to(not_found))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,actix_web=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let pool = database::build_pool(&config.database_url, config.db_pool_size)?;
    let bind = config.bind_address.clone();
    info!(%bind, static_dir = %config.static_dir, "starting turnos server");

    HttpServer::new(move || {
        let files = Files::new("/", &config.static_dir)
            .index_file("index.html")
            .guard(guard::Any(guard::Get()).or(guard::Head()))
            .default_handler(fn_service(|req: ServiceRequest| async {
                let (req, _) = req.into_parts();
                Ok(ServiceResponse::new(req, not_found_response()))
            }));

        create_app(pool.clone(), config.clone())
            .wrap(middleware::Logger::default())
            .service(files)
    })
    .bind(&bind)?
    .run()
    .await?;

    Ok(())
}
