use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::alertas::{self, FiltrosAlertas, NuevaAlerta, RegistroAlerta};
use crate::db::queries;
use crate::error::ApiError;
use crate::http::extract::JsonOrForm;
use crate::http::AppState;
use crate::models::alerta::{Alerta, EstadoAlerta};

#[derive(Debug, Deserialize)]
pub struct RegistroAlertaRequest {
    pub tipo: Option<String>,
    pub mensaje: Option<String>,
    pub severidad: Option<String>,
    pub captura_id: Option<i64>,
    pub trampa_id: Option<i32>,
}

pub async fn registrar_alerta(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<RegistroAlertaRequest>,
) -> Result<Json<Value>, ApiError> {
    let alerta = NuevaAlerta::validar(
        body.tipo.as_deref(),
        body.mensaje.as_deref(),
        body.severidad.as_deref(),
        body.captura_id,
        body.trampa_id,
    )?;

    match alertas::registrar(&state.pool, &alerta).await? {
        RegistroAlerta::Duplicada => Ok(Json(json!({
            "success": true,
            "message": "Alerta similar ya existe",
            "duplicate": true,
        }))),
        RegistroAlerta::Creada(id) => Ok(Json(json!({
            "success": true,
            "message": "Alerta registrada exitosamente",
            "alerta_id": id,
        }))),
    }
}

#[derive(Debug, Deserialize)]
pub struct ParamsAlertas {
    pub estado: Option<String>,
    pub severidad: Option<String>,
    pub limite: Option<String>,
    pub desde_fecha: Option<String>,
    pub orden: Option<String>,
}

pub async fn get_alertas(
    State(state): State<AppState>,
    Query(params): Query<ParamsAlertas>,
) -> Result<Json<Value>, ApiError> {
    let filtros = FiltrosAlertas::normalizar(
        params.estado.as_deref(),
        params.severidad.as_deref(),
        params.limite.as_deref(),
        params.desde_fecha.as_deref(),
        params.orden.as_deref(),
    );

    let consulta = alertas::consultar(&state.pool, &filtros).await?;
    let total_mostradas = consulta.alertas.len();

    Ok(Json(json!({
        "success": true,
        "alertas": consulta.alertas,
        "total_encontradas": consulta.total_encontradas,
        "total_mostradas": total_mostradas,
        "estadisticas": consulta.estadisticas,
        "filtros_aplicados": filtros,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ResolverAlertaRequest {
    pub alerta_id: Option<i64>,
    pub estado: Option<String>,
    pub notas: Option<String>,
}

pub async fn resolver_alerta(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<ResolverAlertaRequest>,
) -> Result<Json<Value>, ApiError> {
    let alerta_id = body.alerta_id.unwrap_or(0);
    if alerta_id <= 0 {
        return Err(ApiError::Validacion("ID de alerta inválido".to_string()));
    }

    let estado = body.estado.as_deref().map(str::trim).unwrap_or("");
    if estado.is_empty() {
        return Err(ApiError::Validacion("Estado es requerido".to_string()));
    }
    let estado = EstadoAlerta::parse(estado).ok_or_else(|| {
        ApiError::Validacion("Estado debe ser: resuelta, descartada o activa".to_string())
    })?;

    let notas = body
        .notas
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let cambio = alertas::resolver(&state.pool, alerta_id, estado, notas).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Alerta actualizada exitosamente",
        "alerta_id": alerta_id,
        "estado_anterior": cambio.estado_anterior,
        "estado_nuevo": cambio.estado_nuevo,
    })))
}

pub async fn get_alertas_historial(
    State(state): State<AppState>,
) -> Result<Json<Vec<Alerta>>, ApiError> {
    let alertas = sqlx::query_as::<_, Alerta>(queries::SELECT_ALERTAS_HISTORIAL)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(alertas))
}
