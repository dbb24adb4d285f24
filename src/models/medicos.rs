use crate::schema::medico;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = medico)]
pub struct Medico {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    pub especialidad: String,
    pub matricula_profesional: String,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = medico)]
pub struct MedicoData {
    pub nombre: String,
    pub apellido: String,
    pub especialidad: String,
    pub matricula_profesional: String,
}

impl Medico {
    pub fn from_data(id: i32, data: MedicoData) -> Self {
        Self {
            id,
            nombre: data.nombre,
            apellido: data.apellido,
            especialidad: data.especialidad,
            matricula_profesional: data.matricula_profesional,
        }
    }
}
