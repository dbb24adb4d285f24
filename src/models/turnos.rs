use crate::schema::turno;
use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use serde::Serialize;

pub const ESTADO_PENDIENTE: &str = "pendiente";
pub const ESTADO_ATENDIDO: &str = "atendido";
pub const ESTADO_CANCELADO: &str = "cancelado";

pub const ESTADOS: [&str; 3] = [ESTADO_PENDIENTE, ESTADO_ATENDIDO, ESTADO_CANCELADO];

#[derive(Queryable, Selectable, Serialize, Clone, Debug, PartialEq)]
#[diesel(table_name = turno)]
pub struct Turno {
    pub id: i32,
    pub paciente_id: i32,
    pub medico_id: i32,
    pub fecha: NaiveDate,
    pub hora: NaiveTime,
    pub estado: String,
    pub observaciones: Option<String>,
}

#[derive(Insertable, AsChangeset, Clone, Debug, PartialEq)]
#[diesel(table_name = turno, treat_none_as_null = true)]
pub struct TurnoData {
    pub paciente_id: i32,
    pub medico_id: i32,
    pub fecha: NaiveDate,
    pub hora: NaiveTime,
    pub estado: String,
    pub observaciones: Option<String>,
}

impl TurnoData {
    /// Cancelled appointments do not hold their slot.
    pub fn holds_slot(&self) -> bool {
        self.estado != ESTADO_CANCELADO
    }
}

impl Turno {
    pub fn from_data(id: i32, data: TurnoData) -> Self {
        Self {
            id,
            paciente_id: data.paciente_id,
            medico_id: data.medico_id,
            fecha: data.fecha,
            hora: data.hora,
            estado: data.estado,
            observaciones: data.observaciones,
        }
    }

    pub fn into_data(self) -> TurnoData {
        TurnoData {
            paciente_id: self.paciente_id,
            medico_id: self.medico_id,
            fecha: self.fecha,
            hora: self.hora,
            estado: self.estado,
            observaciones: self.observaciones,
        }
    }
}
