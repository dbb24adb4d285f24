use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;

use crate::{error::ApiError, models::turnos::ESTADO_CANCELADO};

pub const PACIENTE_NOT_FOUND: &str = "Paciente no encontrado";
pub const MEDICO_NOT_FOUND: &str = "Médico no encontrado";
pub const TURNO_NOT_FOUND: &str = "Turno no encontrado";
pub const SLOT_TAKEN: &str = "El médico ya tiene un turno asignado en ese horario";

pub fn assert_paciente(conn: &mut MysqlConnection, id: i32) -> Result<(), ApiError> {
    use crate::schema::paciente;

    let res = paciente::table
        .filter(paciente::id.eq(id))
        .count()
        .get_result::<i64>(conn)?;

    if res == 0 {
        return Err(ApiError::not_found(PACIENTE_NOT_FOUND));
    }

    Ok(())
}

pub fn assert_medico(conn: &mut MysqlConnection, id: i32) -> Result<(), ApiError> {
    use crate::schema::medico;

    let res = medico::table
        .filter(medico::id.eq(id))
        .count()
        .get_result::<i64>(conn)?;

    if res == 0 {
        return Err(ApiError::not_found(MEDICO_NOT_FOUND));
    }

    Ok(())
}

pub fn assert_turno(conn: &mut MysqlConnection, id: i32) -> Result<(), ApiError> {
    use crate::schema::turno;

    let res = turno::table
        .filter(turno::id.eq(id))
        .count()
        .get_result::<i64>(conn)?;

    if res == 0 {
        return Err(ApiError::not_found(TURNO_NOT_FOUND));
    }

    Ok(())
}

/// Fails with a conflict if a live appointment other than `exclude` already
/// occupies the doctor's slot.
pub fn assert_slot_free(
    conn: &mut MysqlConnection,
    medico_id: i32,
    fecha: NaiveDate,
    hora: NaiveTime,
    exclude: Option<i32>,
) -> Result<(), ApiError> {
    use crate::schema::turno;

    let mut query = turno::table
        .filter(turno::medico_id.eq(medico_id))
        .filter(turno::fecha.eq(fecha))
        .filter(turno::hora.eq(hora))
        .filter(turno::estado.ne(ESTADO_CANCELADO))
        .into_boxed();
    if let Some(id) = exclude {
        query = query.filter(turno::id.ne(id));
    }
    let res = query.count().get_result::<i64>(conn)?;

    if res > 0 {
        return Err(ApiError::conflict(SLOT_TAKEN));
    }

    Ok(())
}

pub fn count_turnos_of_paciente(conn: &mut MysqlConnection, id: i32) -> Result<i64, ApiError> {
    use crate::schema::turno;

    let res = turno::table
        .filter(turno::paciente_id.eq(id))
        .count()
        .get_result::<i64>(conn)?;
    Ok(res)
}

pub fn count_turnos_of_medico(conn: &mut MysqlConnection, id: i32) -> Result<i64, ApiError> {
    use crate::schema::turno;

    let res = turno::table
        .filter(turno::medico_id.eq(id))
        .count()
        .get_result::<i64>(conn)?;
    Ok(res)
}
