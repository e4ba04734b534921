use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;

use crate::db::queries;
use crate::error::ApiError;
use crate::http::AppState;
use crate::models::reporte::{
    rellenar_semana, resumir_historial, DeteccionesPorTrampa, FilaHistorialIncremento,
    HistorialIncrementos, IncrementoPorDia, IncrementoPorHora, PromedioPorHora,
    PromedioTipoPorDia, TotalPorDia, TotalPorHora, UltimoIncremento,
};
use crate::models::{parse_fecha, parse_fecha_fin};

#[derive(Debug, Deserialize)]
pub struct ParamsRango {
    pub inicio: Option<String>,
    pub fin: Option<String>,
}

fn fin_del_dia(dia: NaiveDate) -> NaiveDateTime {
    dia.and_time(NaiveTime::from_hms_opt(23, 59, 59).expect("hora fija válida"))
}

/// Resolves an inclusive datetime range, defaulting to the current day.
fn rango(params: &ParamsRango) -> (NaiveDateTime, NaiveDateTime) {
    let hoy = Utc::now().date_naive();
    let inicio = params
        .inicio
        .as_deref()
        .and_then(parse_fecha)
        .unwrap_or_else(|| hoy.and_time(NaiveTime::MIN));
    let fin = params
        .fin
        .as_deref()
        .and_then(parse_fecha_fin)
        .unwrap_or_else(|| fin_del_dia(hoy));
    (inicio, fin)
}

/// Same as [`rango`], but the default lower bound reaches back the given
/// number of days for the day-granularity reports.
fn rango_dias(params: &ParamsRango, dias_atras: i64) -> (NaiveDateTime, NaiveDateTime) {
    let hoy = Utc::now().date_naive();
    let inicio = params
        .inicio
        .as_deref()
        .and_then(parse_fecha)
        .unwrap_or_else(|| (hoy - chrono::Duration::days(dias_atras)).and_time(NaiveTime::MIN));
    let fin = params
        .fin
        .as_deref()
        .and_then(parse_fecha_fin)
        .unwrap_or_else(|| fin_del_dia(hoy));
    (inicio, fin)
}

pub async fn get_incrementos_por_hora(
    State(state): State<AppState>,
    Query(params): Query<ParamsRango>,
) -> Result<Json<Vec<IncrementoPorHora>>, ApiError> {
    let (inicio, fin) = rango(&params);
    let filas = sqlx::query_as::<_, IncrementoPorHora>(queries::INCREMENTOS_POR_HORA)
        .bind(inicio)
        .bind(fin)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(filas))
}

pub async fn get_incrementos_totales_por_hora(
    State(state): State<AppState>,
    Query(params): Query<ParamsRango>,
) -> Result<Json<Vec<TotalPorHora>>, ApiError> {
    let (inicio, fin) = rango(&params);
    let filas = sqlx::query_as::<_, TotalPorHora>(queries::INCREMENTOS_TOTALES_POR_HORA)
        .bind(inicio)
        .bind(fin)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(filas))
}

pub async fn get_incrementos_por_dia(
    State(state): State<AppState>,
    Query(params): Query<ParamsRango>,
) -> Result<Json<Vec<IncrementoPorDia>>, ApiError> {
    let (inicio, fin) = rango_dias(&params, 6);
    let filas = sqlx::query_as::<_, IncrementoPorDia>(queries::INCREMENTOS_POR_DIA)
        .bind(inicio)
        .bind(fin)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(filas))
}

pub async fn get_ultimos_incrementos(
    State(state): State<AppState>,
) -> Result<Json<Vec<UltimoIncremento>>, ApiError> {
    let filas = sqlx::query_as::<_, UltimoIncremento>(queries::ULTIMOS_INCREMENTOS)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(filas))
}

pub async fn get_historial_incrementos(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistorialIncrementos>>, ApiError> {
    let filas = sqlx::query_as::<_, FilaHistorialIncremento>(queries::SELECT_HISTORIAL_INCREMENTOS)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(resumir_historial(filas)))
}

/// Seven daily totals ending today, zero-filled, for the dashboard's weekly
/// sparkline.
pub async fn get_reporte_semanal(State(state): State<AppState>) -> Result<Json<Vec<i64>>, ApiError> {
    let hoy = Utc::now().date_naive();
    let inicio = (hoy - chrono::Duration::days(6)).and_time(NaiveTime::MIN);
    let filas = sqlx::query_as::<_, TotalPorDia>(queries::TOTALES_POR_DIA)
        .bind(inicio)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(rellenar_semana(hoy, &filas)))
}

pub async fn get_promedio_por_hora(
    State(state): State<AppState>,
    Query(params): Query<ParamsRango>,
) -> Result<Json<Vec<PromedioPorHora>>, ApiError> {
    let (inicio, fin) = rango(&params);
    let filas = sqlx::query_as::<_, PromedioPorHora>(queries::PROMEDIO_POR_HORA)
        .bind(inicio)
        .bind(fin)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(filas))
}

pub async fn get_promedio_tipo_por_dia(
    State(state): State<AppState>,
    Query(params): Query<ParamsRango>,
) -> Result<Json<Vec<PromedioTipoPorDia>>, ApiError> {
    let (inicio, fin) = rango_dias(&params, 6);
    let filas = sqlx::query_as::<_, PromedioTipoPorDia>(queries::PROMEDIO_TIPO_POR_DIA)
        .bind(inicio)
        .bind(fin)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(filas))
}

#[derive(Debug, Deserialize)]
pub struct ParamsPeriodo {
    pub periodo: Option<String>,
}

pub async fn get_detecciones_por_trampa(
    State(state): State<AppState>,
    Query(params): Query<ParamsPeriodo>,
) -> Result<Json<Vec<DeteccionesPorTrampa>>, ApiError> {
    let hoy = Utc::now().date_naive();
    let inicio = match params.periodo.as_deref() {
        Some("semana") => hoy - chrono::Duration::days(7),
        Some("mes") => hoy - chrono::Duration::days(30),
        _ => hoy,
    };

    let filas = sqlx::query_as::<_, DeteccionesPorTrampa>(queries::DETECCIONES_POR_TRAMPA)
        .bind(inicio)
        .bind(hoy)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(filas))
}
