mod requests;
mod responses;

use crate::{
    auth::AuthUser,
    database::{assert, inserted_id, with_conn},
    error::ApiError,
    models::{medicos::Medico, pacientes::Paciente, turnos::Turno},
    protocol::DeletedResponse,
    validation::path_id,
    DbPool,
};
use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use tracing::info;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(get_one)
        .service(create)
        .service(update)
        .service(update_estado)
        .service(delete);
}

crate::route_funcs! {
    (list, get, "", "Error al obtener turnos", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        query: web::Query<ListTurnosQuery>,
    }),
    (get_one, get, "/{id}", "Error al obtener turno", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        id: web::Path<i64>,
    }),
    (create, post, "", "Error al crear turno", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        info: web::Json<CreateTurnoRequest>,
    }),
    (update, put, "/{id}", "Error al actualizar turno", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        id: web::Path<i64>,
        info: web::Json<UpdateTurnoRequest>,
    }),
    (update_estado, patch, "/{id}/estado", "Error al actualizar estado del turno", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        id: web::Path<i64>,
        info: web::Json<EstadoRequest>,
    }),
    (delete, delete, "/{id}", "Error al eliminar turno", {
        user: AuthUser,
        pool: web::Data<DbPool>,
        id: web::Path<i64>,
    }),
}

async fn list_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    query: web::Query<ListTurnosQuery>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::{medico, paciente, turno};

    let filter = query.into_inner().validate()?;
    let rows = with_conn(&pool, move |conn| {
        let mut query = turno::table
            .inner_join(paciente::table)
            .inner_join(medico::table)
            .select((Turno::as_select(), Paciente::as_select(), Medico::as_select()))
            .into_boxed();
        if let Some(paciente_id) = filter.paciente_id {
            query = query.filter(turno::paciente_id.eq(paciente_id));
        }
        if let Some(medico_id) = filter.medico_id {
            query = query.filter(turno::medico_id.eq(medico_id));
        }
        if let Some(estado) = filter.estado {
            query = query.filter(turno::estado.eq(estado));
        }

        let res = query
            .order((turno::fecha.desc(), turno::hora.desc()))
            .load::<(Turno, Paciente, Medico)>(conn)?;
        Ok(res)
    })
    .await?;

    let turnos = rows
        .into_iter()
        .map(|(turno, paciente, medico)| TurnoItem::new(turno, &paciente, medico))
        .collect();

    Ok(HttpResponse::Ok().json(ListTurnosResponse {
        success: true,
        turnos,
    }))
}

async fn get_one_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::{medico, paciente, turno};

    let id = path_id(id.into_inner())?;
    let (turno, paciente, medico) = with_conn(&pool, move |conn| {
        turno::table
            .inner_join(paciente::table)
            .inner_join(medico::table)
            .filter(turno::id.eq(id))
            .select((Turno::as_select(), Paciente::as_select(), Medico::as_select()))
            .first::<(Turno, Paciente, Medico)>(conn)
            .optional()?
            .ok_or_else(|| ApiError::not_found(assert::TURNO_NOT_FOUND))
    })
    .await?;

    let paciente_dni = paciente.dni.clone();
    Ok(HttpResponse::Ok().json(TurnoResponse {
        success: true,
        turno: TurnoDetail {
            item: TurnoItem::new(turno, &paciente, medico),
            paciente_dni,
        },
    }))
}

async fn create_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    info: web::Json<CreateTurnoRequest>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::turno;

    let data = info.into_inner().validate()?;
    let turno = with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            assert::assert_paciente(conn, data.paciente_id)?;
            assert::assert_medico(conn, data.medico_id)?;
            assert::assert_slot_free(conn, data.medico_id, data.fecha, data.hora, None)?;

            diesel::insert_into(turno::table)
                .values(&data)
                .execute(conn)
                .map_err(|e| ApiError::from_violation(e, assert::SLOT_TAKEN))?;

            Ok(Turno::from_data(inserted_id(conn)?, data))
        })
    })
    .await?;
    info!(
        turno_id = turno.id,
        medico_id = turno.medico_id,
        fecha = %turno.fecha,
        hora = %turno.hora,
        "turno created"
    );

    Ok(HttpResponse::Created().json(SaveTurnoResponse {
        success: true,
        message: "Turno creado exitosamente".to_string(),
        turno,
    }))
}

async fn update_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    id: web::Path<i64>,
    info: web::Json<UpdateTurnoRequest>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::turno;

    let id = path_id(id.into_inner())?;
    let patch = info.into_inner().validate()?;
    let turno = with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            let current = turno::table
                .find(id)
                .select(Turno::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| ApiError::not_found(assert::TURNO_NOT_FOUND))?;

            let data = patch.merge_onto(current.into_data());
            assert::assert_paciente(conn, data.paciente_id)?;
            assert::assert_medico(conn, data.medico_id)?;
            if data.holds_slot() {
                assert::assert_slot_free(conn, data.medico_id, data.fecha, data.hora, Some(id))?;
            }

            diesel::update(turno::table.find(id))
                .set(&data)
                .execute(conn)
                .map_err(|e| ApiError::from_violation(e, assert::SLOT_TAKEN))?;

            Ok(Turno::from_data(id, data))
        })
    })
    .await?;
    info!(turno_id = id, estado = %turno.estado, "turno updated");

    Ok(HttpResponse::Ok().json(SaveTurnoResponse {
        success: true,
        message: "Turno actualizado exitosamente".to_string(),
        turno,
    }))
}

/// Status and notes only. Scheduling is not re-checked here; reviving a
/// cancelled turno into a taken slot is still refused by the slot index.
async fn update_estado_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    id: web::Path<i64>,
    info: web::Json<EstadoRequest>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::turno;

    let id = path_id(id.into_inner())?;
    let (estado, observaciones) = info.into_inner().validate()?;
    let values = (estado.clone(), observaciones.clone());
    with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            assert::assert_turno(conn, id)?;

            let (estado, observaciones) = values;
            diesel::update(turno::table.find(id))
                .set((
                    turno::estado.eq(estado),
                    turno::observaciones.eq(observaciones),
                ))
                .execute(conn)
                .map_err(|e| ApiError::from_violation(e, assert::SLOT_TAKEN))?;
            Ok(())
        })
    })
    .await?;
    info!(turno_id = id, estado = %estado, "turno estado changed");

    Ok(HttpResponse::Ok().json(EstadoResponse {
        success: true,
        message: "Estado del turno actualizado exitosamente".to_string(),
        turno: EstadoTurno {
            id,
            estado,
            observaciones,
        },
    }))
}

async fn delete_impl(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    use crate::schema::turno;

    let id = path_id(id.into_inner())?;
    with_conn(&pool, move |conn| {
        conn.transaction::<_, ApiError, _>(|conn| {
            assert::assert_turno(conn, id)?;
            diesel::delete(turno::table.find(id)).execute(conn)?;
            Ok(())
        })
    })
    .await?;
    info!(turno_id = id, "turno deleted");

    Ok(HttpResponse::Ok().json(DeletedResponse::ok("Turno eliminado exitosamente", id)))
}

#[cfg(test)]
mod tests {
    use crate::database::testing::*;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    const SLOT_TAKEN: &str = "El médico ya tiene un turno asignado en ese horario";

    fn turno_json(paciente_id: i32, medico_id: i32, hora: &str) -> Value {
        json!({
            "paciente_id": paciente_id,
            "medico_id": medico_id,
            "fecha": "2031-06-02",
            "hora": hora,
        })
    }

    #[actix_web::test]
    async fn rejects_malformed_filters_and_bodies() {
        let app = test::init_service(crate::create_app(offline_pool(), test_config())).await;

        let req = authed(test::TestRequest::get().uri("/turnos?estado=confirmado")).to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errores"][0]["path"], "estado");

        let req = authed(test::TestRequest::post().uri("/turnos"))
            .set_json(json!({ "paciente_id": 1, "medico_id": 1, "fecha": "2031-06-02", "hora": "9:00" }))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errores"][0]["path"], "hora");

        let req = authed(test::TestRequest::patch().uri("/turnos/1/estado"))
            .set_json(json!({ "observaciones": "sin estado" }))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errores"][0]["path"], "estado");
    }

    #[actix_web::test]
    async fn same_slot_cannot_be_booked_twice() {
        let Some(pool) = test_pool() else { return };
        let app = test::init_service(crate::create_app(pool.clone(), test_config())).await;
        let medico = insert_medico(&pool);
        let first_paciente = insert_paciente(&pool);
        let second_paciente = insert_paciente(&pool);

        let req = authed(test::TestRequest::post().uri("/turnos"))
            .set_json(turno_json(first_paciente, medico, "09:00:00"))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["turno"]["estado"], "pendiente");
        let first = body["turno"]["id"].as_i64().unwrap();

        let req = authed(test::TestRequest::post().uri("/turnos"))
            .set_json(turno_json(second_paciente, medico, "09:00:00"))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], SLOT_TAKEN);

        let req = authed(test::TestRequest::get().uri(&format!("/turnos?medico_id={}", medico)))
            .to_request();
        let (_, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(body["turnos"].as_array().unwrap().len(), 1);

        let req = authed(test::TestRequest::patch().uri(&format!("/turnos/{}/estado", first)))
            .set_json(json!({ "estado": "cancelado" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = authed(test::TestRequest::post().uri("/turnos"))
            .set_json(turno_json(second_paciente, medico, "09:00:00"))
            .to_request();
        let (status, _) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::CREATED);

        // the slot is taken again, so the cancelled turno cannot come back
        let req = authed(test::TestRequest::patch().uri(&format!("/turnos/{}/estado", first)))
            .set_json(json!({ "estado": "pendiente" }))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], SLOT_TAKEN);
    }

    #[actix_web::test]
    async fn estado_patch_leaves_the_schedule_alone() {
        let Some(pool) = test_pool() else { return };
        let app = test::init_service(crate::create_app(pool.clone(), test_config())).await;
        let medico = insert_medico(&pool);
        let paciente = insert_paciente(&pool);
        let id = insert_turno(&pool, paciente, medico, "14:15:00");

        let req = authed(test::TestRequest::get().uri(&format!("/turnos/{}", id))).to_request();
        let (status, before) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::OK);
        assert!(before["turno"]["paciente_dni"].is_string());
        assert!(before["turno"]["medico_nombre"].as_str().unwrap().starts_with("Laura Gomez"));

        let req = authed(test::TestRequest::patch().uri(&format!("/turnos/{}/estado", id)))
            .set_json(json!({ "estado": "atendido", "observaciones": "control anual" }))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["turno"]["estado"], "atendido");

        let req = authed(test::TestRequest::get().uri(&format!("/turnos/{}", id))).to_request();
        let (_, after) = status_and_json(test::call_service(&app, req).await).await;
        for field in ["fecha", "hora", "paciente_id", "medico_id"] {
            assert_eq!(after["turno"][field], before["turno"][field], "{}", field);
        }
        assert_eq!(after["turno"]["hora"], "14:15:00");
        assert_eq!(after["turno"]["estado"], "atendido");
        assert_eq!(after["turno"]["observaciones"], "control anual");
    }

    #[actix_web::test]
    async fn update_merges_and_rechecks_the_slot() {
        let Some(pool) = test_pool() else { return };
        let app = test::init_service(crate::create_app(pool.clone(), test_config())).await;
        let medico = insert_medico(&pool);
        let paciente = insert_paciente(&pool);
        let morning = insert_turno(&pool, paciente, medico, "08:00:00");
        let noon = insert_turno(&pool, paciente, medico, "12:00:00");

        // own slot does not count as a conflict
        let req = authed(test::TestRequest::put().uri(&format!("/turnos/{}", morning)))
            .set_json(json!({ "observaciones": "traer estudios" }))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["turno"]["hora"], "08:00:00");
        assert_eq!(body["turno"]["observaciones"], "traer estudios");

        let req = authed(test::TestRequest::put().uri(&format!("/turnos/{}", noon)))
            .set_json(json!({ "hora": "08:00:00" }))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], SLOT_TAKEN);

        let req = authed(test::TestRequest::put().uri(&format!("/turnos/{}", noon)))
            .set_json(json!({ "medico_id": 2147483647 }))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Médico no encontrado");
    }

    #[actix_web::test]
    async fn create_requires_existing_paciente() {
        let Some(pool) = test_pool() else { return };
        let app = test::init_service(crate::create_app(pool.clone(), test_config())).await;
        let medico = insert_medico(&pool);

        let req = authed(test::TestRequest::post().uri("/turnos"))
            .set_json(turno_json(2147483647, medico, "16:00:00"))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Paciente no encontrado");
    }

    #[actix_web::test]
    async fn delete_removes_the_turno() {
        let Some(pool) = test_pool() else { return };
        let app = test::init_service(crate::create_app(pool.clone(), test_config())).await;
        let id = insert_turno(&pool, insert_paciente(&pool), insert_medico(&pool), "17:45:00");

        let req = authed(test::TestRequest::delete().uri(&format!("/turnos/{}", id))).to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id);

        let req = authed(test::TestRequest::get().uri(&format!("/turnos/{}", id))).to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Turno no encontrado");
    }
}
