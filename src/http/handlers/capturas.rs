use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::queries;
use crate::error::ApiError;
use crate::http::extract::JsonOrForm;
use crate::http::AppState;
use crate::models::captura::{agrupar_capturas, CapturaConInsectos, FilaCaptura, Lectura};

pub async fn get_capturas(
    State(state): State<AppState>,
) -> Result<Json<Vec<CapturaConInsectos>>, ApiError> {
    let filas = sqlx::query_as::<_, FilaCaptura>(queries::SELECT_CAPTURAS_CON_DETECCIONES)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(agrupar_capturas(filas)))
}

pub async fn get_lecturas(State(state): State<AppState>) -> Result<Json<Vec<Lectura>>, ApiError> {
    let lecturas = sqlx::query_as::<_, Lectura>(queries::SELECT_LECTURAS)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(lecturas))
}

#[derive(Debug, Deserialize)]
pub struct LecturaRequest {
    pub tipo: Option<String>,
    pub cantidad: Option<i32>,
}

pub async fn editar_lectura(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonOrForm(body): JsonOrForm<LecturaRequest>,
) -> Result<Json<Value>, ApiError> {
    let tipo = body.tipo.as_deref().map(str::trim).unwrap_or("");
    let cantidad = body.cantidad;
    let (tipo, cantidad) = match (tipo.is_empty(), cantidad) {
        (false, Some(c)) if c >= 0 => (tipo.to_string(), c),
        _ => {
            return Err(ApiError::Validacion(
                "Datos incompletos o inválidos".to_string(),
            ))
        }
    };

    let resultado = sqlx::query(queries::UPDATE_DETECCION)
        .bind(&tipo)
        .bind(cantidad)
        .bind(id)
        .execute(&state.pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Lectura no encontrada".to_string()));
    }

    // The owning capture's total must follow its detections
    let captura_id: i64 = sqlx::query_scalar(queries::SELECT_CAPTURA_DE_DETECCION)
        .bind(id)
        .fetch_one(&state.pool)
        .await?;
    sqlx::query(queries::REFRESH_TOTAL_CAPTURA)
        .bind(captura_id)
        .execute(&state.pool)
        .await?;

    Ok(Json(json!({ "success": true })))
}

pub async fn delete_lectura(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let captura_id: Option<i64> = sqlx::query_scalar(queries::SELECT_CAPTURA_DE_DETECCION)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let captura_id =
        captura_id.ok_or_else(|| ApiError::NoEncontrado("Lectura no encontrada".to_string()))?;

    sqlx::query(queries::DELETE_DETECCION)
        .bind(id)
        .execute(&state.pool)
        .await?;

    let restantes: i64 = sqlx::query_scalar(queries::COUNT_DETECCIONES_DE_CAPTURA)
        .bind(captura_id)
        .fetch_one(&state.pool)
        .await?;

    if restantes == 0 {
        // A capture without detections has nothing left to show
        sqlx::query(queries::DELETE_CAPTURA)
            .bind(captura_id)
            .execute(&state.pool)
            .await?;
    } else {
        sqlx::query(queries::REFRESH_TOTAL_CAPTURA)
            .bind(captura_id)
            .execute(&state.pool)
            .await?;
    }

    Ok(Json(json!({ "success": true })))
}

pub async fn get_tipos_insectos(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let tipos = sqlx::query_scalar::<_, String>(queries::SELECT_TIPOS_INSECTOS)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(json!({ "success": true, "tipos": tipos })))
}
