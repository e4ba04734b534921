use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::Row;

use crate::db::queries;
use crate::error::ApiError;
use crate::http::extract::JsonOrForm;
use crate::http::AppState;
use crate::models::configuracion::{ConfiguracionPlaga, UmbralPorTipo};

pub async fn get_configuracion_plagas(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConfiguracionPlaga>>, ApiError> {
    let configuraciones =
        sqlx::query_as::<_, ConfiguracionPlaga>(queries::SELECT_CONFIGURACION_PLAGAS)
            .fetch_all(&state.pool)
            .await?;
    Ok(Json(configuraciones))
}

#[derive(Debug, Deserialize)]
pub struct PlagaRequest {
    pub tipo_insecto: Option<String>,
    pub umbral_promedio: Option<f64>,
    pub intervalo_minutos: Option<i32>,
    pub aplicar_por_trampa: Option<bool>,
    pub estado: Option<String>,
    pub descripcion: Option<String>,
    pub tipo_alerta: Option<String>,
    pub notas: Option<String>,
}

impl PlagaRequest {
    fn campos_faltantes(&self) -> Vec<&'static str> {
        let mut faltantes = Vec::new();
        if self.tipo_insecto.is_none() {
            faltantes.push("tipo_insecto");
        }
        if self.umbral_promedio.is_none() {
            faltantes.push("umbral_promedio");
        }
        if self.intervalo_minutos.is_none() {
            faltantes.push("intervalo_minutos");
        }
        if self.aplicar_por_trampa.is_none() {
            faltantes.push("aplicar_por_trampa");
        }
        if self.estado.is_none() {
            faltantes.push("estado");
        }
        if self.descripcion.is_none() {
            faltantes.push("descripcion");
        }
        if self.tipo_alerta.is_none() {
            faltantes.push("tipo_alerta");
        }
        faltantes
    }

    fn solo_estado(&self) -> bool {
        self.estado.is_some()
            && self.tipo_insecto.is_none()
            && self.umbral_promedio.is_none()
            && self.intervalo_minutos.is_none()
            && self.aplicar_por_trampa.is_none()
            && self.descripcion.is_none()
            && self.tipo_alerta.is_none()
            && self.notas.is_none()
    }
}

pub async fn add_configuracion_plaga(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<PlagaRequest>,
) -> Result<Json<Value>, ApiError> {
    let faltantes = body.campos_faltantes();
    if !faltantes.is_empty() {
        return Err(ApiError::Validacion("Datos incompletos".to_string()));
    }

    let fila = sqlx::query(queries::INSERT_CONFIGURACION_PLAGA)
        .bind(body.tipo_insecto.as_deref())
        .bind(body.umbral_promedio)
        .bind(body.intervalo_minutos)
        .bind(body.aplicar_por_trampa)
        .bind(body.estado.as_deref())
        .bind(body.descripcion.as_deref())
        .bind(body.tipo_alerta.as_deref())
        .bind(body.notas.as_deref().unwrap_or(""))
        .fetch_one(&state.pool)
        .await?;
    let id: i64 = fila.try_get("id")?;

    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn update_configuracion_plaga(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonOrForm(body): JsonOrForm<PlagaRequest>,
) -> Result<Json<Value>, ApiError> {
    // A body carrying nothing but `estado` toggles the rule on or off
    let resultado = if body.solo_estado() {
        sqlx::query(queries::UPDATE_ESTADO_CONFIGURACION_PLAGA)
            .bind(body.estado.as_deref())
            .bind(id)
            .execute(&state.pool)
            .await?
    } else {
        let faltantes = body.campos_faltantes();
        if !faltantes.is_empty() {
            return Err(ApiError::Validacion(format!(
                "Faltan campos: {}",
                faltantes.join(", ")
            )));
        }
        sqlx::query(queries::UPDATE_CONFIGURACION_PLAGA)
            .bind(body.tipo_insecto.as_deref())
            .bind(body.umbral_promedio)
            .bind(body.intervalo_minutos)
            .bind(body.aplicar_por_trampa)
            .bind(body.estado.as_deref())
            .bind(body.descripcion.as_deref())
            .bind(body.tipo_alerta.as_deref())
            .bind(id)
            .execute(&state.pool)
            .await?
    };

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado(
            "Configuración no encontrada".to_string(),
        ));
    }
    Ok(Json(json!({ "success": true })))
}

pub async fn delete_configuracion_plaga(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let resultado = sqlx::query(queries::DELETE_CONFIGURACION_PLAGA)
        .bind(id)
        .execute(&state.pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado(
            "Configuración no encontrada".to_string(),
        ));
    }
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct ParamsUmbral {
    pub periodo: Option<String>,
}

const PERIODOS: [&str; 3] = ["hoy", "semana", "mes"];

pub async fn get_umbrales(
    State(state): State<AppState>,
    Query(params): Query<ParamsUmbral>,
) -> Result<Json<Value>, ApiError> {
    let periodo = params
        .periodo
        .as_deref()
        .filter(|p| PERIODOS.contains(p))
        .unwrap_or("hoy");

    let filas = sqlx::query_as::<_, UmbralPorTipo>(queries::SELECT_UMBRALES_POR_PERIODO)
        .bind(periodo)
        .fetch_all(&state.pool)
        .await?;

    let umbrales: BTreeMap<String, i32> = filas
        .into_iter()
        .map(|f| (f.tipo_insecto.to_lowercase(), f.umbral))
        .collect();

    Ok(Json(json!({ "success": true, "data": umbrales })))
}

#[derive(Debug, Deserialize)]
pub struct UmbralRequest {
    pub tipo: Option<String>,
    pub periodo: Option<String>,
    pub umbral: Option<i32>,
}

pub async fn update_umbral(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<UmbralRequest>,
) -> Result<Json<Value>, ApiError> {
    let tipo = body.tipo.as_deref().map(str::trim).unwrap_or("");
    let periodo = body.periodo.as_deref().map(str::trim).unwrap_or("");
    let umbral = match (tipo.is_empty(), periodo.is_empty(), body.umbral) {
        (false, false, Some(u)) => u,
        _ => {
            return Err(ApiError::Validacion(
                "Campos requeridos: tipo, periodo, umbral".to_string(),
            ))
        }
    };
    if !PERIODOS.contains(&periodo) {
        return Err(ApiError::Validacion(
            "Periodo debe ser: hoy, semana o mes".to_string(),
        ));
    }

    sqlx::query(queries::UPSERT_UMBRAL)
        .bind(tipo)
        .bind(periodo)
        .bind(umbral)
        .execute(&state.pool)
        .await?;

    Ok(Json(json!({ "success": true, "message": "Umbral actualizado" })))
}
