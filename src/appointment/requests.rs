use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::{
    error::ApiError,
    models::turnos::{TurnoData, ESTADO_PENDIENTE},
    utils::double_option,
    validation::Validator,
};

const OBSERVACIONES_MAX: usize = 10_000;

#[derive(Deserialize)]
pub struct ListTurnosQuery {
    pub paciente_id: Option<String>,
    pub medico_id: Option<String>,
    pub estado: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct TurnoFilter {
    pub paciente_id: Option<i32>,
    pub medico_id: Option<i32>,
    pub estado: Option<String>,
}

impl ListTurnosQuery {
    /// Empty query values count as absent.
    pub fn validate(self) -> Result<TurnoFilter, ApiError> {
        let mut v = Validator::new();
        let present = |s: Option<String>| s.filter(|s| !s.is_empty());
        let filter = TurnoFilter {
            paciente_id: present(self.paciente_id).map(|s| v.id("paciente_id", s.parse().ok())),
            medico_id: present(self.medico_id).map(|s| v.id("medico_id", s.parse().ok())),
            estado: present(self.estado).map(|s| v.estado("estado", Some(s))),
        };
        v.finish()?;
        Ok(filter)
    }
}

#[derive(Deserialize)]
pub struct CreateTurnoRequest {
    pub paciente_id: Option<i64>,
    pub medico_id: Option<i64>,
    pub fecha: Option<String>,
    pub hora: Option<String>,
    pub estado: Option<String>,
    pub observaciones: Option<String>,
}

impl CreateTurnoRequest {
    pub fn validate(self) -> Result<TurnoData, ApiError> {
        let mut v = Validator::new();
        let data = TurnoData {
            paciente_id: v.id("paciente_id", self.paciente_id),
            medico_id: v.id("medico_id", self.medico_id),
            fecha: v.date("fecha", self.fecha),
            hora: v.time("hora", self.hora),
            estado: match self.estado {
                Some(estado) => v.estado("estado", Some(estado)),
                None => ESTADO_PENDIENTE.to_string(),
            },
            observaciones: v.optional_text("observaciones", self.observaciones, OBSERVACIONES_MAX),
        };
        v.finish()?;
        Ok(data)
    }
}

#[derive(Deserialize)]
pub struct UpdateTurnoRequest {
    pub paciente_id: Option<i64>,
    pub medico_id: Option<i64>,
    pub fecha: Option<String>,
    pub hora: Option<String>,
    pub estado: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub observaciones: Option<Option<String>>,
}

/// The validated fields of a partial appointment update.
#[derive(Debug, Default)]
pub struct TurnoPatch {
    pub paciente_id: Option<i32>,
    pub medico_id: Option<i32>,
    pub fecha: Option<NaiveDate>,
    pub hora: Option<NaiveTime>,
    pub estado: Option<String>,
    pub observaciones: Option<Option<String>>,
}

impl UpdateTurnoRequest {
    pub fn validate(self) -> Result<TurnoPatch, ApiError> {
        let mut v = Validator::new();
        let patch = TurnoPatch {
            paciente_id: self.paciente_id.map(|id| v.id("paciente_id", Some(id))),
            medico_id: self.medico_id.map(|id| v.id("medico_id", Some(id))),
            fecha: self.fecha.map(|fecha| v.date("fecha", Some(fecha))),
            hora: self.hora.map(|hora| v.time("hora", Some(hora))),
            estado: self.estado.map(|estado| v.estado("estado", Some(estado))),
            observaciones: self
                .observaciones
                .map(|obs| v.optional_text("observaciones", obs, OBSERVACIONES_MAX)),
        };
        v.finish()?;
        Ok(patch)
    }
}

impl TurnoPatch {
    /// Applies the patch to the stored appointment. A field present in the
    /// patch replaces the stored value, an absent one keeps it. For
    /// `observaciones`, an explicit `null` (or empty string) clears the note.
    pub fn merge_onto(self, current: TurnoData) -> TurnoData {
        TurnoData {
            paciente_id: self.paciente_id.unwrap_or(current.paciente_id),
            medico_id: self.medico_id.unwrap_or(current.medico_id),
            fecha: self.fecha.unwrap_or(current.fecha),
            hora: self.hora.unwrap_or(current.hora),
            estado: self.estado.unwrap_or(current.estado),
            observaciones: self.observaciones.unwrap_or(current.observaciones),
        }
    }
}

#[derive(Deserialize)]
pub struct EstadoRequest {
    pub estado: Option<String>,
    pub observaciones: Option<String>,
}

impl EstadoRequest {
    /// Missing `observaciones` clear the stored note.
    pub fn validate(self) -> Result<(String, Option<String>), ApiError> {
        let mut v = Validator::new();
        let estado = v.estado("estado", self.estado);
        let observaciones = v.optional_text("observaciones", self.observaciones, OBSERVACIONES_MAX);
        v.finish()?;
        Ok((estado, observaciones))
    }
}
