use crate::schema::paciente;
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = paciente)]
pub struct Paciente {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    #[serde(rename = "DNI")]
    pub dni: String,
    pub fecha_nacimiento: NaiveDate,
    pub obra_social: Option<String>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = paciente, treat_none_as_null = true)]
pub struct PacienteData {
    pub nombre: String,
    pub apellido: String,
    pub dni: String,
    pub fecha_nacimiento: NaiveDate,
    pub obra_social: Option<String>,
}

impl Paciente {
    pub fn from_data(id: i32, data: PacienteData) -> Self {
        Self {
            id,
            nombre: data.nombre,
            apellido: data.apellido,
            dni: data.dni,
            fecha_nacimiento: data.fecha_nacimiento,
            obra_social: data.obra_social,
        }
    }
}
