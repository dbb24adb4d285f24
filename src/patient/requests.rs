use serde::Deserialize;

use crate::{error::ApiError, models::pacientes::PacienteData, validation::Validator};

#[derive(Deserialize)]
pub struct PacienteRequest {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    #[serde(rename = "DNI")]
    pub dni: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub obra_social: Option<String>,
}

impl PacienteRequest {
    pub fn validate(self) -> Result<PacienteData, ApiError> {
        let mut v = Validator::new();
        let data = PacienteData {
            nombre: v.text("nombre", self.nombre, 100),
            apellido: v.text("apellido", self.apellido, 100),
            dni: v.text("DNI", self.dni, 20),
            fecha_nacimiento: v.date("fecha_nacimiento", self.fecha_nacimiento),
            obra_social: v.optional_text("obra_social", self.obra_social, 100),
        };
        v.finish()?;
        Ok(data)
    }
}
