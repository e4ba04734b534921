use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::Row;

use crate::db::queries;
use crate::error::ApiError;
use crate::http::extract::JsonOrForm;
use crate::http::AppState;
use crate::models::parse_fecha;
use crate::models::trampa::MantenimientoFisico;

pub async fn get_mantenimientos(
    State(state): State<AppState>,
) -> Result<Json<Vec<MantenimientoFisico>>, ApiError> {
    let mantenimientos = sqlx::query_as::<_, MantenimientoFisico>(queries::SELECT_MANTENIMIENTOS)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(mantenimientos))
}

#[derive(Debug, Deserialize)]
pub struct MantenimientoRequest {
    pub trampa_id: Option<i32>,
    pub tipo_mantenimiento: Option<String>,
    pub notas: Option<String>,
    pub fecha: Option<String>,
}

pub async fn add_mantenimiento(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<MantenimientoRequest>,
) -> Result<Json<Value>, ApiError> {
    let tipo = body
        .tipo_mantenimiento
        .as_deref()
        .map(str::trim)
        .unwrap_or("");
    let trampa_id = match (body.trampa_id, tipo.is_empty()) {
        (Some(id), false) => id,
        _ => return Err(ApiError::Validacion("Datos incompletos".to_string())),
    };
    let fecha = body.fecha.as_deref().and_then(parse_fecha);

    let fila = sqlx::query(queries::INSERT_MANTENIMIENTO)
        .bind(trampa_id)
        .bind(tipo)
        .bind(body.notas.as_deref().unwrap_or(""))
        .bind(fecha)
        .fetch_one(&state.pool)
        .await?;
    let id: i64 = fila.try_get("id")?;

    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn delete_mantenimiento(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let resultado = sqlx::query(queries::DELETE_MANTENIMIENTO)
        .bind(id)
        .execute(&state.pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado(
            "Mantenimiento no encontrado".to_string(),
        ));
    }
    Ok(Json(json!({ "success": true })))
}
