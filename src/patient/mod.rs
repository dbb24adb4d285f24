mod requests;
mod responses;

use crate::{
    auth::AuthUser,
    database::{assert, inserted_id, with_conn},
    error::ApiError,
    models::pacientes::Paciente,
    protocol::DeletedResponse,
    validation::path_id,
    DbPool,
};
use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use tracing::info;

use self::{requests::PacienteRequest, responses::*};

const DNI_TAKEN: &str = "Ya existe un paciente con ese DNI";
const DNI_TAKEN_BY_OTHER: &str = "Ya existe otro paciente con ese DNI";
const HAS_TURNOS: &str = "No se puede eliminar el paciente porque tiene turnos asociados";

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(get_one)
        .service(create)
        .service(update)
        .service(delete);
}

crate::route_funcs! {
    (list, get, "", "Error al obtener pacientes", {
        user: AuthUser,
        pool: web::Data<DbPool>,
    }),
    (get_one, get, "/{id}", "Error al obtener paciente", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        id: web::Path<i64>,
    }),
    (create, post, "", "Error al crear paciente", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        info: web::Json<PacienteRequest>,
    }),
    (update, put, "/{id}", "Error al actualizar paciente", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        id: web::Path<i64>,
        info: web::Json<PacienteRequest>,
    }),
    (delete, delete, "/{id}", "Error al eliminar paciente", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        id: web::Path<i64>,
    }),
}

async fn list_impl(_user: AuthUser, pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    use crate::schema::paciente;

    let pacientes = with_conn(&pool, |conn| {
        let res = paciente::table
            .select(Paciente::as_select())
            .order((paciente::apellido.asc(), paciente::nombre.asc()))
            .load(conn)?;
        Ok(res)
    })
    .await?;

    Ok(HttpResponse::Ok().json(ListPacientesResponse {
        success: true,
        pacientes,
    }))
}

async fn get_one_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::paciente;

    let id = path_id(id.into_inner())?;
    let paciente = with_conn(&pool, move |conn| {
        let res = paciente::table
            .find(id)
            .select(Paciente::as_select())
            .first(conn)
            .optional()?;
        res.ok_or_else(|| ApiError::not_found(assert::PACIENTE_NOT_FOUND))
    })
    .await?;

    Ok(HttpResponse::Ok().json(PacienteResponse {
        success: true,
        paciente,
    }))
}

async fn create_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    info: web::Json<PacienteRequest>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::paciente;

    let data = info.into_inner().validate()?;
    let paciente = with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            let res = paciente::table
                .filter(paciente::dni.eq(&data.dni))
                .count()
                .get_result::<i64>(conn)?;
            if res > 0 {
                return Err(ApiError::conflict(DNI_TAKEN));
            }

            diesel::insert_into(paciente::table)
                .values(&data)
                .execute(conn)
                .map_err(|e| ApiError::from_violation(e, DNI_TAKEN))?;

            Ok(Paciente::from_data(inserted_id(conn)?, data))
        })
    })
    .await?;
    info!(paciente_id = paciente.id, "paciente created");

    Ok(HttpResponse::Created().json(SavePacienteResponse {
        success: true,
        message: "Paciente creado exitosamente".to_string(),
        paciente,
    }))
}

async fn update_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    id: web::Path<i64>,
    info: web::Json<PacienteRequest>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::paciente;

    let id = path_id(id.into_inner())?;
    let data = info.into_inner().validate()?;
    let paciente = with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            assert::assert_paciente(conn, id)?;

            let res = paciente::table
                .filter(paciente::dni.eq(&data.dni))
                .filter(paciente::id.ne(id))
                .count()
                .get_result::<i64>(conn)?;
            if res > 0 {
                return Err(ApiError::conflict(DNI_TAKEN_BY_OTHER));
            }

            diesel::update(paciente::table.find(id))
                .set(&data)
                .execute(conn)
                .map_err(|e| ApiError::from_violation(e, DNI_TAKEN_BY_OTHER))?;

            Ok(Paciente::from_data(id, data))
        })
    })
    .await?;
    info!(paciente_id = id, "paciente updated");

    Ok(HttpResponse::Ok().json(SavePacienteResponse {
        success: true,
        message: "Paciente actualizado exitosamente".to_string(),
        paciente,
    }))
}

async fn delete_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::paciente;

    let id = path_id(id.into_inner())?;
    with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            assert::assert_paciente(conn, id)?;
            if assert::count_turnos_of_paciente(conn, id)? > 0 {
                return Err(ApiError::conflict(HAS_TURNOS));
            }

            diesel::delete(paciente::table.find(id))
                .execute(conn)
                .map_err(|e| ApiError::from_violation(e, HAS_TURNOS))?;
            Ok(())
        })
    })
    .await?;
    info!(paciente_id = id, "paciente deleted");

    Ok(HttpResponse::Ok().json(DeletedResponse::ok("Paciente eliminado exitosamente", id)))
}
