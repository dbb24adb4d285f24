use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub msg: String,
}

impl FieldError {
    pub fn new<P: ToString, M: ToString>(path: P, msg: M) -> Self {
        Self {
            path: path.to_string(),
            msg: msg.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new<S: ToString>(error: S) -> Self {
        Self {
            success: false,
            error: error.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub errores: Vec<FieldError>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
    pub id: i32,
}

impl DeletedResponse {
    pub fn ok<S: ToString>(message: S, id: i32) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            id,
        }
    }
}
