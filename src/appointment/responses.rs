use serde::Serialize;

use crate::{
    models::{medicos::Medico, pacientes::Paciente, turnos::Turno},
    utils::full_name,
};

#[derive(Serialize)]
pub struct TurnoItem {
    #[serde(flatten)]
    pub turno: Turno,
    pub paciente_nombre: String,
    pub medico_nombre: String,
    pub especialidad: String,
}

impl TurnoItem {
    pub fn new(turno: Turno, paciente: &Paciente, medico: Medico) -> Self {
        Self {
            turno,
            paciente_nombre: full_name(&paciente.nombre, &paciente.apellido),
            medico_nombre: full_name(&medico.nombre, &medico.apellido),
            especialidad: medico.especialidad,
        }
    }
}

#[derive(Serialize)]
pub struct TurnoDetail {
    #[serde(flatten)]
    pub item: TurnoItem,
    pub paciente_dni: String,
}

#[derive(Serialize)]
pub struct ListTurnosResponse {
    pub success: bool,
    pub turnos: Vec<TurnoItem>,
}

#[derive(Serialize)]
pub struct TurnoResponse {
    pub success: bool,
    pub turno: TurnoDetail,
}

#[derive(Serialize)]
pub struct SaveTurnoResponse {
    pub success: bool,
    pub message: String,
    pub turno: Turno,
}

#[derive(Serialize)]
pub struct EstadoTurno {
    pub id: i32,
    pub estado: String,
    pub observaciones: Option<String>,
}

#[derive(Serialize)]
pub struct EstadoResponse {
    pub success: bool,
    pub message: String,
    pub turno: EstadoTurno,
}
