use serde::Serialize;
use sqlx::FromRow;

/// A pest-threshold rule evaluated against recent increments after every
/// reported capture.
#[derive(Debug, FromRow, Serialize)]
pub struct ConfiguracionPlaga {
    pub id: i64,
    pub tipo_insecto: String,
    pub umbral_promedio: f64,
    pub intervalo_minutos: i32,
    pub aplicar_por_trampa: bool,
    pub estado: String,
    pub descripcion: String,
    pub tipo_alerta: String,
    pub notas: String,
}

#[derive(Debug, FromRow)]
pub struct UmbralPorTipo {
    pub tipo_insecto: String,
    pub umbral: i32,
}
