use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Body extractor that accepts both JSON and form-encoded payloads, since
/// the dashboard and older tooling send either interchangeably.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + 'static,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.starts_with("application/json") {
            let Json(valor) = Json::<T>::from_request(req, state)
                .await
                .map_err(|_| ApiError::Validacion("Datos JSON inválidos".to_string()))?;
            return Ok(Self(valor));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(valor) = Form::<T>::from_request(req, state)
                .await
                .map_err(|_| ApiError::Validacion("Datos de formulario inválidos".to_string()))?;
            return Ok(Self(valor));
        }

        Err(ApiError::Validacion(
            "Content-Type no soportado".to_string(),
        ))
    }
}
