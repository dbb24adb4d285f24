use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::protocol::{ErrorResponse, FieldError, ValidationErrorResponse};

pub const INTERNAL_ERROR_MSG: &str = "Error interno del servidor";
pub const UNAUTHORIZED_MSG: &str = "No autorizado";

/// Error returned by every route handler.
///
/// Validation errors and business conflicts are reported to the caller
/// verbatim; internal errors are logged and answered with a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn field<P: ToString, M: ToString>(path: P, msg: M) -> Self {
        Self::Validation(vec![FieldError::new(path, msg)])
    }

    pub fn not_found<S: ToString>(msg: S) -> Self {
        Self::NotFound(msg.to_string())
    }

    pub fn conflict<S: ToString>(msg: S) -> Self {
        Self::Conflict(msg.to_string())
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized(UNAUTHORIZED_MSG.to_string())
    }

    /// Replaces the generic message of an internal error with the
    /// operation-specific one shown to the caller.
    pub fn with_fail_msg(self, fail_msg: &str) -> Self {
        match self {
            Self::Internal { source, .. } => Self::Internal {
                message: fail_msg.to_string(),
                source,
            },
            other => other,
        }
    }

    /// Maps a uniqueness or foreign key violation to a conflict carrying
    /// `msg`; anything else stays internal.
    pub fn from_violation(err: DieselError, msg: &str) -> Self {
        match err {
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::ForeignKeyViolation,
                _,
            ) => Self::conflict(msg),
            other => other.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(source: anyhow::Error) -> Self {
        Self::Internal {
            message: INTERNAL_ERROR_MSG.to_string(),
            source,
        }
    }
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> Self {
        anyhow::Error::new(err).context("DB error").into()
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            Self::Validation(errores) => builder.json(ValidationErrorResponse {
                success: false,
                errores: errores.clone(),
            }),
            Self::Internal { message, source } => {
                tracing::error!(error = ?source, "{}", message);
                builder.json(ErrorResponse::new(message))
            }
            other => builder.json(ErrorResponse::new(other)),
        }
    }
}
