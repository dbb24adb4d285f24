mod requests;
mod responses;

use crate::{
    auth::AuthUser,
    database::{assert, inserted_id, with_conn},
    error::ApiError,
    models::medicos::Medico,
    protocol::DeletedResponse,
    validation::path_id,
    DbPool,
};
use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use tracing::info;

use self::{requests::MedicoRequest, responses::*};

const MATRICULA_TAKEN: &str = "Ya existe un médico con esa matrícula profesional";
const MATRICULA_TAKEN_BY_OTHER: &str = "Ya existe otro médico con esa matrícula profesional";
const HAS_TURNOS: &str = "No se puede eliminar el médico porque tiene turnos asociados";

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(get_one)
        .service(create)
        .service(update)
        .service(delete);
}

crate::route_funcs! {
    (list, get, "", "Error al obtener médicos", {
        user: AuthUser,
        pool: web::Data<DbPool>,
    }),
    (get_one, get, "/{id}", "Error al obtener médico", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        id: web::Path<i64>,
    }),
    (create, post, "", "Error al crear médico", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        info: web::Json<MedicoRequest>,
    }),
    (update, put, "/{id}", "Error al actualizar médico", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        id: web::Path<i64>,
        info: web::Json<MedicoRequest>,
    }),
    (delete, delete, "/{id}", "Error al eliminar médico", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        id: web::Path<i64>,
    }),
}

async fn list_impl(_user: AuthUser, pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    use crate::schema::medico;

    let medicos = with_conn(&pool, |conn| {
        let res = medico::table
            .select(Medico::as_select())
            .order((medico::apellido.asc(), medico::nombre.asc()))
            .load(conn)?;
        Ok(res)
    })
    .await?;

    Ok(HttpResponse::Ok().json(ListMedicosResponse {
        success: true,
        medicos,
    }))
}

async fn get_one_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::medico;

    let id = path_id(id.into_inner())?;
    let medico = with_conn(&pool, move |conn| {
        medico::table
            .find(id)
            .select(Medico::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| ApiError::not_found(assert::MEDICO_NOT_FOUND))
    })
    .await?;

    Ok(HttpResponse::Ok().json(MedicoResponse {
        success: true,
        medico,
    }))
}

async fn create_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    info: web::Json<MedicoRequest>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::medico;

    let data = info.into_inner().validate()?;
    let medico = with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            let res = medico::table
                .filter(medico::matricula_profesional.eq(&data.matricula_profesional))
                .count()
                .get_result::<i64>(conn)?;
            if res > 0 {
                return Err(ApiError::conflict(MATRICULA_TAKEN));
            }

            diesel::insert_into(medico::table)
                .values(&data)
                .execute(conn)
                .map_err(|e| ApiError::from_violation(e, MATRICULA_TAKEN))?;

            Ok(Medico::from_data(inserted_id(conn)?, data))
        })
    })
    .await?;
    info!(medico_id = medico.id, "medico created");

    Ok(HttpResponse::Created().json(SaveMedicoResponse {
        success: true,
        message: "Médico creado exitosamente".to_string(),
        medico,
    }))
}

async fn update_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    id: web::Path<i64>,
    info: web::Json<MedicoRequest>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::medico;

    let id = path_id(id.into_inner())?;
    let data = info.into_inner().validate()?;
    let medico = with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            assert::assert_medico(conn, id)?;

            let res = medico::table
                .filter(medico::matricula_profesional.eq(&data.matricula_profesional))
                .filter(medico::id.ne(id))
                .count()
                .get_result::<i64>(conn)?;
            if res > 0 {
                return Err(ApiError::conflict(MATRICULA_TAKEN_BY_OTHER));
            }

            diesel::update(medico::table.find(id))
                .set(&data)
                .execute(conn)
                .map_err(|e| ApiError::from_violation(e, MATRICULA_TAKEN_BY_OTHER))?;

            Ok(Medico::from_data(id, data))
        })
    })
    .await?;
    info!(medico_id = id, "medico updated");

    Ok(HttpResponse::Ok().json(SaveMedicoResponse {
        success: true,
        message: "Médico actualizado exitosamente".to_string(),
        medico,
    }))
}

async fn delete_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::medico;

    let id = path_id(id.into_inner())?;
    with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            assert::assert_medico(conn, id)?;
            if assert::count_turnos_of_medico(conn, id)? > 0 {
                return Err(ApiError::conflict(HAS_TURNOS));
            }

            diesel::delete(medico::table.find(id))
                .execute(conn)
                .map_err(|e| ApiError::from_violation(e, HAS_TURNOS))?;
            Ok(())
        })
    })
    .await?;
    info!(medico_id = id, "medico deleted");

    Ok(HttpResponse::Ok().json(DeletedResponse::ok("Médico eliminado exitosamente", id)))
}
