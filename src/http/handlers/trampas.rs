use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::Row;

use crate::db::queries;
use crate::error::ApiError;
use crate::http::extract::JsonOrForm;
use crate::http::AppState;
use crate::models::trampa::Trampa;

pub async fn get_trampas(State(state): State<AppState>) -> Result<Json<Vec<Trampa>>, ApiError> {
    let trampas = sqlx::query_as::<_, Trampa>(queries::SELECT_TRAMPAS)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(trampas))
}

/// Traps counted as active: status `active` and a report within the last 45
/// minutes, one sampling cycle plus margin.
pub async fn get_trampas_activas(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let activas = sqlx::query_scalar::<_, i64>(queries::COUNT_TRAMPAS_ACTIVAS)
        .fetch_one(&state.pool)
        .await?;
    Ok(Json(json!({ "trampas_activas": activas })))
}

pub async fn get_trampas_disponibles(
    State(state): State<AppState>,
) -> Result<Json<Vec<i32>>, ApiError> {
    let trampas = sqlx::query_scalar::<_, i32>(queries::SELECT_TRAMPAS_DISPONIBLES)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(trampas))
}

#[derive(Debug, Deserialize)]
pub struct TrampaRequest {
    pub nombre: Option<String>,
    pub ubicacion: Option<String>,
}

fn validar_trampa(body: &TrampaRequest) -> Result<(String, String), ApiError> {
    let nombre = body.nombre.as_deref().map(str::trim).unwrap_or("");
    let ubicacion = body.ubicacion.as_deref().map(str::trim).unwrap_or("");
    if nombre.is_empty() || ubicacion.is_empty() {
        return Err(ApiError::Validacion(
            "Campos requeridos: nombre, ubicacion".to_string(),
        ));
    }
    Ok((nombre.to_string(), ubicacion.to_string()))
}

pub async fn add_trampa(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<TrampaRequest>,
) -> Result<Json<Value>, ApiError> {
    let (nombre, ubicacion) = validar_trampa(&body)?;

    let fila = sqlx::query(queries::INSERT_TRAMPA)
        .bind(&nombre)
        .bind(&ubicacion)
        .fetch_one(&state.pool)
        .await?;
    let trampa_id: i32 = fila.try_get("trampa_id")?;

    Ok(Json(json!({ "success": true, "trampa_id": trampa_id })))
}

pub async fn update_trampa(
    State(state): State<AppState>,
    Path(trampa_id): Path<i32>,
    JsonOrForm(body): JsonOrForm<TrampaRequest>,
) -> Result<Json<Value>, ApiError> {
    let (nombre, ubicacion) = validar_trampa(&body)?;

    let resultado = sqlx::query(queries::UPDATE_TRAMPA)
        .bind(&nombre)
        .bind(&ubicacion)
        .bind(trampa_id)
        .execute(&state.pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Trampa no encontrada".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

pub async fn delete_trampa(
    State(state): State<AppState>,
    Path(trampa_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let resultado = sqlx::query(queries::DELETE_TRAMPA)
        .bind(trampa_id)
        .execute(&state.pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Trampa no encontrada".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}
