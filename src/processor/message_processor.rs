use sqlx::Row;
use tracing::{info, warn};

use crate::alertas::{self, NuevaAlerta, RegistroAlerta};
use crate::db::{queries, DbPool};
use crate::models::alerta::Severidad;
use crate::models::configuracion::ConfiguracionPlaga;
use crate::models::message::{DeteccionMessage, EstadoTrampaMessage};
use crate::models::parse_fecha;

/// Handles one message from the detections topic: persists the capture and
/// its detections, records per-type increments and evaluates pest rules.
pub async fn process_deteccion(pool: &DbPool, payload: &[u8]) -> anyhow::Result<()> {
    // 1. Parse JSON
    let message: DeteccionMessage = match serde_json::from_slice(payload) {
        Ok(m) => m,
        Err(e) => {
            warn!("Failed to parse detection message: {}", e);
            return Ok(());
        }
    };

    let fecha = match parse_fecha(&message.fecha) {
        Some(f) => f,
        None => {
            warn!("Invalid fecha in detection message: '{}'", message.fecha);
            return Ok(());
        }
    };

    info!(
        "Processing capture from trampa {} with {} detection types",
        message.trampa_id,
        message.insectos.len()
    );

    // 2. Find or create the capture for this reporting event
    let captura_existente = sqlx::query(queries::SELECT_CAPTURA_POR_FECHA)
        .bind(fecha)
        .fetch_optional(pool)
        .await?;

    let captura_id: i64 = match captura_existente {
        Some(fila) => fila.try_get("id")?,
        None => {
            let fila = sqlx::query(queries::INSERT_CAPTURA)
                .bind(fecha)
                .bind(message.trampa_id)
                .fetch_one(pool)
                .await?;
            fila.try_get("id")?
        }
    };

    // 3. Insert detections and derive increments against the previous report
    for insecto in &message.insectos {
        let anterior: Option<i32> = sqlx::query_scalar(queries::SELECT_CANTIDAD_ANTERIOR)
            .bind(message.trampa_id)
            .bind(&insecto.tipo)
            .bind(fecha)
            .fetch_optional(pool)
            .await?;

        sqlx::query(queries::INSERT_DETECCION)
            .bind(captura_id)
            .bind(&insecto.tipo)
            .bind(insecto.count)
            .execute(pool)
            .await?;

        // Device counts are cumulative per sticky sheet
        let incremento = insecto.count - anterior.unwrap_or(0);
        if incremento > 0 {
            sqlx::query(queries::INSERT_INCREMENTO)
                .bind(fecha)
                .bind(&insecto.tipo)
                .bind(incremento)
                .bind(message.trampa_id)
                .execute(pool)
                .await?;
        }
    }

    sqlx::query(queries::REFRESH_TOTAL_CAPTURA)
        .bind(captura_id)
        .execute(pool)
        .await?;

    // 4. Evaluate active pest rules for the reported types
    for insecto in &message.insectos {
        evaluar_reglas(pool, &insecto.tipo, message.trampa_id, captura_id).await?;
    }

    Ok(())
}

/// Checks every active rule for an insect type against the increments of the
/// configured window and raises an alert when the threshold is reached. The
/// alert service's duplicate window keeps repeated reports from piling up.
async fn evaluar_reglas(
    pool: &DbPool,
    tipo: &str,
    trampa_id: i32,
    captura_id: i64,
) -> anyhow::Result<()> {
    let reglas = sqlx::query_as::<_, ConfiguracionPlaga>(queries::SELECT_REGLAS_ACTIVAS)
        .bind(tipo)
        .fetch_all(pool)
        .await?;

    for regla in reglas {
        let filtro_trampa = regla.aplicar_por_trampa.then_some(trampa_id);
        let suma: i64 = sqlx::query_scalar(queries::SUMA_INCREMENTOS_VENTANA)
            .bind(tipo)
            .bind(regla.intervalo_minutos)
            .bind(filtro_trampa)
            .fetch_one(pool)
            .await?;

        if (suma as f64) < regla.umbral_promedio {
            continue;
        }

        let mensaje = if regla.aplicar_por_trampa {
            format!("Trampa {}: {}", trampa_id, regla.descripcion)
        } else {
            regla.descripcion.clone()
        };

        let alerta = NuevaAlerta {
            tipo: regla.tipo_alerta.clone(),
            mensaje,
            severidad: Severidad::Alta,
            captura_id: Some(captura_id),
            trampa_id: Some(trampa_id),
        };

        match alertas::registrar(pool, &alerta).await? {
            RegistroAlerta::Creada(id) => {
                info!(
                    "Regla {} disparada para {}: alerta {} registrada",
                    regla.id, tipo, id
                );
            }
            RegistroAlerta::Duplicada => {}
        }
    }

    Ok(())
}

/// Handles one message from the trap-status topic: insert-or-update of the
/// trap's last known state.
pub async fn process_estado_trampa(pool: &DbPool, payload: &[u8]) -> anyhow::Result<()> {
    let message: EstadoTrampaMessage = match serde_json::from_slice(payload) {
        Ok(m) => m,
        Err(e) => {
            warn!("Failed to parse trap status message: {}", e);
            return Ok(());
        }
    };

    let timestamp = match parse_fecha(&message.timestamp) {
        Some(t) => t,
        None => {
            warn!("Invalid timestamp in trap status: '{}'", message.timestamp);
            return Ok(());
        }
    };

    sqlx::query(queries::UPSERT_ESTADO_TRAMPA)
        .bind(message.trampa_id)
        .bind(&message.status)
        .bind(timestamp)
        .bind(message.trampa_adhesiva.as_deref())
        .execute(pool)
        .await?;

    info!(
        "Trampa {} actualizada: {} @ {}",
        message.trampa_id, message.status, timestamp
    );
    Ok(())
}
