use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure taxonomy for the API and the alert service. Everything becomes a
/// structured JSON response; nothing bubbles out of a handler as a panic.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error de conexión a la base de datos")]
    Conexion(#[source] sqlx::Error),
    #[error("{0}")]
    Validacion(String),
    #[error("{0}")]
    NoAutorizado(String),
    #[error("{0}")]
    NoEncontrado(String),
    #[error("{0}")]
    SinCambios(String),
    #[error("Error interno del servidor: {0}")]
    Interno(anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => ApiError::Conexion(err),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ApiError::Validacion("Registro duplicado".to_string())
            }
            _ => ApiError::Interno(err.into()),
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::Interno(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Conexion(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Validacion(_) => StatusCode::BAD_REQUEST,
            ApiError::NoAutorizado(_) => StatusCode::UNAUTHORIZED,
            ApiError::NoEncontrado(_) => StatusCode::NOT_FOUND,
            // Soft failure: the request was well-formed but changed nothing.
            ApiError::SinCambios(_) => StatusCode::OK,
            ApiError::Interno(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if matches!(self, ApiError::Conexion(_) | ApiError::Interno(_)) {
            error!("Request failed: {:?}", self);
        }

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
