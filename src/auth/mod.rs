mod password;
mod requests;
mod responses;
pub mod token;

use crate::{
    config::Config,
    database::{inserted_id, with_conn},
    error::ApiError,
    models::usuarios::{NewUsuario, Usuario, UsuarioInfo},
    validation::Validator,
    DbPool,
};
use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use tracing::{info, warn};

use self::{
    password::{hash_password, verify_password, verify_without_user},
    requests::{LoginRequest, RegisterRequest},
    responses::{LoginResponse, RegisterResponse},
    token::issue_token,
};

pub use self::token::AuthUser;

const EMAIL_TAKEN: &str = "El email ya está registrado";
const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}

crate::route_funcs! {
    (register, post, "/register", "Error al registrar usuario", {
        pool: web::Data<DbPool>,
        config: web::Data<Config>,
        info: web::Json<RegisterRequest>,
    }),
    (login, post, "/login", "Error al iniciar sesión", {
        pool: web::Data<DbPool>,
        config: web::Data<Config>,
        info: web::Json<LoginRequest>,
    }),
}

async fn register_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::usuario;

    let info = info.into_inner();
    let mut v = Validator::new();
    let nombre = v.text("nombre", info.nombre, 100);
    let email = v.email("email", info.email);
    let password = v.strong_password("password", info.password);
    v.finish()?;

    let user = with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            let res = usuario::table
                .filter(usuario::email.eq(&email))
                .count()
                .get_result::<i64>(conn)?;
            if res > 0 {
                return Err(ApiError::conflict(EMAIL_TAKEN));
            }

            let data = NewUsuario {
                nombre: nombre.clone(),
                email: email.clone(),
                contrasena: hash_password(&password)?,
            };
            diesel::insert_into(usuario::table)
                .values(data)
                .execute(conn)
                .map_err(|e| ApiError::from_violation(e, EMAIL_TAKEN))?;

            Ok(UsuarioInfo {
                id: inserted_id(conn)?,
                nombre,
                email,
            })
        })
    })
    .await?;

    let token = issue_token(user.id, &user.email, &config.jwt_secret)?;
    info!(user_id = user.id, "user registered");

    Ok(HttpResponse::Created().json(RegisterResponse {
        success: true,
        message: "Usuario registrado exitosamente".to_string(),
        token,
        user,
    }))
}

async fn login_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::usuario;

    let info = info.into_inner();
    let mut v = Validator::new();
    let email = v.email("email", info.email);
    let password = v.required("password", info.password);
    v.finish()?;

    // unknown email and wrong password must look the same to the caller
    let user = with_conn(&pool, move |conn| {
        let user = usuario::table
            .filter(usuario::email.eq(&email))
            .select(Usuario::as_select())
            .first(conn)
            .optional()?;
        let user = match user {
            Some(user) => verify_password(&password, &user.contrasena)?.then_some(user),
            None => {
                verify_without_user(&password)?;
                None
            }
        };
        Ok(user)
    })
    .await?;

    let user = match user {
        Some(user) => UsuarioInfo::from(user),
        None => {
            warn!("rejected login");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    let token = issue_token(user.id, &user.email, &config.jwt_secret)?;
    info!(user_id = user.id, "user logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        token,
        user,
    }))
}
