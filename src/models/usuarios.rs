use crate::schema::usuario;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Selectable)]
#[diesel(table_name = usuario)]
pub struct Usuario {
    pub id: i32,
    pub nombre: String,
    pub email: String,
    pub contrasena: String,
}

#[derive(Insertable)]
#[diesel(table_name = usuario)]
pub struct NewUsuario {
    pub nombre: String,
    pub email: String,
    pub contrasena: String,
}

/// The part of a user that is safe to hand out.
#[derive(Clone, Debug, Serialize)]
pub struct UsuarioInfo {
    pub id: i32,
    pub nombre: String,
    pub email: String,
}

impl From<Usuario> for UsuarioInfo {
    fn from(data: Usuario) -> Self {
        Self {
            id: data.id,
            nombre: data.nombre,
            email: data.email,
        }
    }
}
