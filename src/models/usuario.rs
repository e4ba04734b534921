use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct Usuario {
    pub id: i64,
    pub email: String,
    pub created_at: NaiveDateTime,
}

// Never serialized; the hash stays inside the auth handlers.
#[derive(Debug, FromRow)]
pub struct UsuarioConPassword {
    pub id: i64,
    pub email: String,
    pub password: String,
}
