use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::Row;

use crate::db::queries;
use crate::error::ApiError;
use crate::http::extract::JsonOrForm;
use crate::http::AppState;
use crate::models::usuario::{Usuario, UsuarioConPassword};

#[derive(Debug, Deserialize)]
pub struct CredencialesRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn validar_credenciales(body: &CredencialesRequest) -> Result<(String, String), ApiError> {
    let email = body.email.as_deref().map(str::trim).unwrap_or("");
    let password = body.password.as_deref().unwrap_or("");
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Validacion(
            "Faltan datos: email y password".to_string(),
        ));
    }
    Ok((email.to_string(), password.to_string()))
}

pub async fn register(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<CredencialesRequest>,
) -> Result<Json<Value>, ApiError> {
    let (email, password) = validar_credenciales(&body)?;

    let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;
    let fila = sqlx::query(queries::INSERT_USUARIO)
        .bind(&email)
        .bind(&hash)
        .fetch_one(&state.pool)
        .await?;
    let usuario_id: i64 = fila.try_get("id")?;

    Ok(Json(json!({
        "success": true,
        "message": "Usuario registrado",
        "usuario_id": usuario_id,
    })))
}

pub async fn login(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<CredencialesRequest>,
) -> Result<Json<Value>, ApiError> {
    let (email, password) = validar_credenciales(&body)?;

    let usuario = sqlx::query_as::<_, UsuarioConPassword>(queries::SELECT_USUARIO_POR_EMAIL)
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::NoAutorizado("Usuario no encontrado".to_string()))?;

    if !bcrypt::verify(&password, &usuario.password)? {
        return Err(ApiError::NoAutorizado("Contraseña incorrecta".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Inicio de sesión exitoso",
        "usuario_id": usuario.id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CambioPasswordRequest {
    pub email: Option<String>,
    pub actual: Option<String>,
    pub nueva: Option<String>,
}

pub async fn change_password(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<CambioPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = body.email.as_deref().map(str::trim).unwrap_or("");
    let actual = body.actual.as_deref().unwrap_or("");
    let nueva = body.nueva.as_deref().unwrap_or("");
    if email.is_empty() || actual.is_empty() || nueva.is_empty() {
        return Err(ApiError::Validacion(
            "Faltan datos: email, actual y nueva".to_string(),
        ));
    }

    let usuario = sqlx::query_as::<_, UsuarioConPassword>(queries::SELECT_USUARIO_POR_EMAIL)
        .bind(email)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::NoEncontrado("Usuario no encontrado".to_string()))?;

    if !bcrypt::verify(actual, &usuario.password)? {
        return Err(ApiError::NoAutorizado(
            "Contraseña actual incorrecta".to_string(),
        ));
    }

    let hash = bcrypt::hash(nueva, bcrypt::DEFAULT_COST)?;
    sqlx::query(queries::UPDATE_PASSWORD)
        .bind(&hash)
        .bind(email)
        .execute(&state.pool)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Contraseña actualizada",
    })))
}

pub async fn get_usuarios(State(state): State<AppState>) -> Result<Json<Vec<Usuario>>, ApiError> {
    let usuarios = sqlx::query_as::<_, Usuario>(queries::SELECT_USUARIOS)
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(usuarios))
}

pub async fn delete_usuario(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let resultado = sqlx::query(queries::DELETE_USUARIO)
        .bind(id)
        .execute(&state.pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Usuario no encontrado".to_string()));
    }
    Ok(Json(json!({ "success": true, "message": "Usuario eliminado" })))
}
