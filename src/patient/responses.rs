use serde::Serialize;

use crate::models::pacientes::Paciente;

#[derive(Serialize)]
pub struct ListPacientesResponse {
    pub success: bool,
    pub pacientes: Vec<Paciente>,
}

#[derive(Serialize)]
pub struct PacienteResponse {
    pub success: bool,
    pub paciente: Paciente,
}

#[derive(Serialize)]
pub struct SavePacienteResponse {
    pub success: bool,
    pub message: String,
    pub paciente: Paciente,
}
