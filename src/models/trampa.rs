use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct Trampa {
    pub trampa_id: i32,
    pub nombre: Option<String>, // NULL until named from the dashboard
    pub ubicacion: Option<String>,
    pub status: String,
    pub timestamp: NaiveDateTime,
    pub trampa_adhesiva: Option<String>,
}

/// A physical maintenance entry, joined with the trap name for display
/// (`Trampa ID n` when the trap was never named or no longer exists).
#[derive(Debug, FromRow, Serialize)]
pub struct MantenimientoFisico {
    pub id: i64,
    pub trampa_id: i32,
    pub tipo_mantenimiento: String,
    pub notas: String,
    pub fecha: NaiveDateTime,
    pub nombre_trampa: String,
}
