use serde::Serialize;

use crate::models::medicos::Medico;

#[derive(Serialize)]
pub struct ListMedicosResponse {
    pub success: bool,
    pub medicos: Vec<Medico>,
}

#[derive(Serialize)]
pub struct MedicoResponse {
    pub success: bool,
    pub medico: Medico,
}

#[derive(Serialize)]
pub struct SaveMedicoResponse {
    pub success: bool,
    pub message: String,
    pub medico: Medico,
}
