use serde::Serialize;

use crate::models::usuarios::UsuarioInfo;

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UsuarioInfo,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UsuarioInfo,
}
