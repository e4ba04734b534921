//! Alert lifecycle: ingestion with duplicate suppression, filtered queries
//! with fleet-wide statistics, and state transitions with resolution
//! stamping.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::Row;
use tracing::{debug, info};

use crate::db::{queries, DbPool};
use crate::error::ApiError;
use crate::models::alerta::{AlertaDetalle, EstadisticasAlertas, EstadoAlerta, Severidad};
use crate::models::parse_fecha;

/// Window in which an active alert with identical tipo and mensaje counts as
/// a duplicate. Must match the interval in [`queries::CHECK_ALERTA_DUPLICADA`].
pub const VENTANA_DUPLICADOS_MINUTOS: i64 = 5;

pub const LIMITE_DEFECTO: i64 = 50;
pub const LIMITE_MAXIMO: i64 = 500;

/// A validated alert candidate. Construction is the validation boundary;
/// an instance always carries a non-empty tipo/mensaje and a known severity.
#[derive(Debug)]
pub struct NuevaAlerta {
    pub tipo: String,
    pub mensaje: String,
    pub severidad: Severidad,
    pub captura_id: Option<i64>,
    pub trampa_id: Option<i32>,
}

impl NuevaAlerta {
    pub fn validar(
        tipo: Option<&str>,
        mensaje: Option<&str>,
        severidad: Option<&str>,
        captura_id: Option<i64>,
        trampa_id: Option<i32>,
    ) -> Result<Self, ApiError> {
        let tipo = tipo.map(str::trim).unwrap_or("");
        let mensaje = mensaje.map(str::trim).unwrap_or("");
        let severidad = severidad.map(str::trim).unwrap_or("");

        if tipo.is_empty() || mensaje.is_empty() || severidad.is_empty() {
            return Err(ApiError::Validacion(
                "Campos requeridos: tipo, mensaje, severidad".to_string(),
            ));
        }

        let severidad = Severidad::parse(severidad).ok_or_else(|| {
            ApiError::Validacion("Severidad debe ser: alta, media o baja".to_string())
        })?;

        Ok(Self {
            tipo: tipo.to_string(),
            mensaje: mensaje.to_string(),
            severidad,
            captura_id,
            trampa_id,
        })
    }
}

#[derive(Debug)]
pub enum RegistroAlerta {
    Creada(i64),
    Duplicada,
}

/// Inserts a new alert unless an identical one is already active within the
/// duplicate window. The check-then-insert pair is not atomic; two
/// simultaneous identical candidates may both insert.
pub async fn registrar(pool: &DbPool, alerta: &NuevaAlerta) -> Result<RegistroAlerta, ApiError> {
    let existente = sqlx::query(queries::CHECK_ALERTA_DUPLICADA)
        .bind(&alerta.tipo)
        .bind(&alerta.mensaje)
        .fetch_optional(pool)
        .await?;

    if existente.is_some() {
        debug!(
            "Alerta duplicada dentro de la ventana de {} minutos: {} / {}",
            VENTANA_DUPLICADOS_MINUTOS, alerta.tipo, alerta.mensaje
        );
        return Ok(RegistroAlerta::Duplicada);
    }

    let fila = sqlx::query(queries::INSERT_ALERTA)
        .bind(&alerta.tipo)
        .bind(&alerta.mensaje)
        .bind(alerta.severidad.as_str())
        .bind(alerta.captura_id)
        .bind(alerta.trampa_id)
        .fetch_one(pool)
        .await?;
    let id: i64 = fila.try_get("id")?;

    info!(
        "Alerta {} registrada: {} [{}]",
        id,
        alerta.tipo,
        alerta.severidad.as_str()
    );
    Ok(RegistroAlerta::Creada(id))
}

/// Which of the two listing orders a caller wants. The dashboard's main view
/// groups by severity; the history widgets use plain recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrdenAlertas {
    Fecha,
    Severidad,
}

/// Normalized query filters. Out-of-range inputs fall back silently instead
/// of failing: unknown estado becomes `activa`, unknown severidad is
/// dropped, an unusable limit becomes the default.
#[derive(Debug, Serialize)]
pub struct FiltrosAlertas {
    pub estado: EstadoAlerta,
    pub severidad: Option<Severidad>,
    pub limite: i64,
    pub desde_fecha: Option<NaiveDateTime>,
    pub orden: OrdenAlertas,
}

impl FiltrosAlertas {
    pub fn normalizar(
        estado: Option<&str>,
        severidad: Option<&str>,
        limite: Option<&str>,
        desde_fecha: Option<&str>,
        orden: Option<&str>,
    ) -> Self {
        let estado = estado
            .and_then(EstadoAlerta::parse)
            .unwrap_or(EstadoAlerta::Activa);
        let severidad = severidad.and_then(Severidad::parse);
        let limite = limite
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| (1..=LIMITE_MAXIMO).contains(l))
            .unwrap_or(LIMITE_DEFECTO);
        let desde_fecha = desde_fecha.and_then(parse_fecha);
        let orden = match orden {
            Some("severidad") => OrdenAlertas::Severidad,
            _ => OrdenAlertas::Fecha,
        };

        Self {
            estado,
            severidad,
            limite,
            desde_fecha,
            orden,
        }
    }
}

#[derive(Debug)]
pub struct ConsultaAlertas {
    pub alertas: Vec<AlertaDetalle>,
    pub total_encontradas: i64,
    pub estadisticas: EstadisticasAlertas,
}

pub async fn consultar(pool: &DbPool, filtros: &FiltrosAlertas) -> Result<ConsultaAlertas, ApiError> {
    let sql = match filtros.orden {
        OrdenAlertas::Fecha => queries::SELECT_ALERTAS_POR_FECHA,
        OrdenAlertas::Severidad => queries::SELECT_ALERTAS_POR_SEVERIDAD,
    };
    let severidad = filtros.severidad.map(|s| s.as_str());

    let alertas = sqlx::query_as::<_, AlertaDetalle>(sql)
        .bind(filtros.estado.as_str())
        .bind(severidad)
        .bind(filtros.desde_fecha)
        .bind(filtros.limite)
        .fetch_all(pool)
        .await?;

    let total_encontradas = sqlx::query_scalar::<_, i64>(queries::COUNT_ALERTAS)
        .bind(filtros.estado.as_str())
        .bind(severidad)
        .bind(filtros.desde_fecha)
        .fetch_one(pool)
        .await?;

    let estadisticas = estadisticas_activas(pool).await?;

    Ok(ConsultaAlertas {
        alertas,
        total_encontradas,
        estadisticas,
    })
}

async fn estadisticas_activas(pool: &DbPool) -> Result<EstadisticasAlertas, ApiError> {
    let filas = sqlx::query(queries::STATS_ALERTAS_ACTIVAS)
        .fetch_all(pool)
        .await?;

    let mut stats = EstadisticasAlertas::default();
    for fila in filas {
        let severidad: String = fila.try_get("severidad")?;
        let cantidad: i64 = fila.try_get("cantidad")?;
        match severidad.as_str() {
            "alta" => stats.alta = cantidad,
            "media" => stats.media = cantidad,
            "baja" => stats.baja = cantidad,
            _ => {}
        }
        stats.total += cantidad;
    }
    Ok(stats)
}

#[derive(Debug)]
pub struct CambioEstado {
    pub estado_anterior: String,
    pub estado_nuevo: EstadoAlerta,
}

/// Transitions an alert. Closing states stamp the resolution fields;
/// reactivation clears them regardless of their prior value.
pub async fn resolver(
    pool: &DbPool,
    alerta_id: i64,
    estado: EstadoAlerta,
    notas: Option<&str>,
) -> Result<CambioEstado, ApiError> {
    let estado_anterior: Option<String> = sqlx::query_scalar(queries::SELECT_ESTADO_ALERTA)
        .bind(alerta_id)
        .fetch_optional(pool)
        .await?;

    let estado_anterior = estado_anterior
        .ok_or_else(|| ApiError::NoEncontrado("Alerta no encontrada".to_string()))?;

    let resultado = match estado {
        EstadoAlerta::Activa => {
            sqlx::query(queries::UPDATE_ALERTA_REACTIVADA)
                .bind(alerta_id)
                .execute(pool)
                .await?
        }
        EstadoAlerta::Resuelta | EstadoAlerta::Descartada => {
            sqlx::query(queries::UPDATE_ALERTA_CERRADA)
                .bind(estado.as_str())
                .bind(notas)
                .bind(alerta_id)
                .execute(pool)
                .await?
        }
    };

    if resultado.rows_affected() == 0 {
        return Err(ApiError::SinCambios(
            "No se realizaron cambios en la alerta".to_string(),
        ));
    }

    info!(
        "Alerta {} cambió de {} a {}",
        alerta_id,
        estado_anterior,
        estado.as_str()
    );
    Ok(CambioEstado {
        estado_anterior,
        estado_nuevo: estado,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validar_campos_requeridos() {
        for (tipo, mensaje, severidad) in [
            (None, Some("m"), Some("alta")),
            (Some("t"), None, Some("alta")),
            (Some("t"), Some("m"), None),
            (Some("  "), Some("m"), Some("alta")),
            (Some("t"), Some(""), Some("alta")),
        ] {
            let res = NuevaAlerta::validar(tipo, mensaje, severidad, None, None);
            assert!(res.is_err(), "{:?} debería fallar", (tipo, mensaje, severidad));
        }
    }

    #[test]
    fn test_validar_severidad_fuera_de_rango() {
        let res = NuevaAlerta::validar(Some("t"), Some("m"), Some("urgente"), None, None);
        match res {
            Err(ApiError::Validacion(msg)) => {
                assert_eq!(msg, "Severidad debe ser: alta, media o baja")
            }
            _ => panic!("se esperaba error de validación"),
        }
    }

    #[test]
    fn test_validar_recorta_espacios() {
        let alerta =
            NuevaAlerta::validar(Some(" trampa_llena "), Some(" Trampa 3 llena "), Some("alta"), None, Some(3))
                .unwrap();
        assert_eq!(alerta.tipo, "trampa_llena");
        assert_eq!(alerta.mensaje, "Trampa 3 llena");
        assert_eq!(alerta.severidad, Severidad::Alta);
        assert_eq!(alerta.trampa_id, Some(3));
    }

    #[test]
    fn test_normalizar_estado_desconocido_cae_en_activa() {
        let filtros = FiltrosAlertas::normalizar(Some("archivada"), None, None, None, None);
        assert_eq!(filtros.estado, EstadoAlerta::Activa);
    }

    #[test]
    fn test_normalizar_severidad_desconocida_se_ignora() {
        let filtros = FiltrosAlertas::normalizar(None, Some("critica"), None, None, None);
        assert_eq!(filtros.severidad, None);
        let filtros = FiltrosAlertas::normalizar(None, Some("alta"), None, None, None);
        assert_eq!(filtros.severidad, Some(Severidad::Alta));
    }

    #[test]
    fn test_normalizar_limite_fuera_de_rango() {
        for limite in [None, Some("0"), Some("-5"), Some("501"), Some("abc")] {
            let filtros = FiltrosAlertas::normalizar(None, None, limite, None, None);
            assert_eq!(filtros.limite, LIMITE_DEFECTO, "limite {:?}", limite);
        }
        let filtros = FiltrosAlertas::normalizar(None, None, Some("200"), None, None);
        assert_eq!(filtros.limite, 200);
    }

    #[test]
    fn test_normalizar_orden() {
        let filtros = FiltrosAlertas::normalizar(None, None, None, None, Some("severidad"));
        assert_eq!(filtros.orden, OrdenAlertas::Severidad);
        let filtros = FiltrosAlertas::normalizar(None, None, None, None, Some("otro"));
        assert_eq!(filtros.orden, OrdenAlertas::Fecha);
    }

    #[test]
    fn test_normalizar_desde_fecha() {
        let filtros =
            FiltrosAlertas::normalizar(None, None, None, Some("2025-08-01 00:00:00"), None);
        assert!(filtros.desde_fecha.is_some());
        let filtros = FiltrosAlertas::normalizar(None, None, None, Some("ayer"), None);
        assert_eq!(filtros.desde_fecha, None);
    }
}
