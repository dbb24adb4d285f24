use serde::Deserialize;

use crate::{error::ApiError, models::medicos::MedicoData, validation::Validator};

#[derive(Deserialize)]
pub struct MedicoRequest {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub especialidad: Option<String>,
    pub matricula_profesional: Option<String>,
}

impl MedicoRequest {
    pub fn validate(self) -> Result<MedicoData, ApiError> {
        let mut v = Validator::new();
        let data = MedicoData {
            nombre: v.text("nombre", self.nombre, 100),
            apellido: v.text("apellido", self.apellido, 100),
            especialidad: v.text("especialidad", self.especialidad, 100),
            matricula_profesional: v.text("matricula_profesional", self.matricula_profesional, 50),
        };
        v.finish()?;
        Ok(data)
    }
}
