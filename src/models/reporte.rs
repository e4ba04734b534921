use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct IncrementoPorHora {
    pub hora: i32,
    pub tipo: String,
    pub cantidad: i64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct TotalPorHora {
    pub hora: i32,
    pub total: i64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct IncrementoPorDia {
    pub fecha: NaiveDate,
    pub tipo: String,
    pub cantidad: i64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct UltimoIncremento {
    pub fecha: NaiveDateTime,
    pub tipo: String,
    pub cantidad: i32,
    pub trampa_id: i32,
}

#[derive(Debug, FromRow)]
pub struct FilaHistorialIncremento {
    pub trampa_id: i32,
    pub fecha: NaiveDateTime,
    pub tipo: String,
    pub incremento: i32,
}

/// One reading per (trap, date) with a compact per-type summary string, the
/// shape the dashboard's history table renders directly.
#[derive(Debug, Serialize)]
pub struct HistorialIncrementos {
    pub trampa_id: i32,
    pub fecha: NaiveDateTime,
    pub insectos_detectados: String,
}

#[derive(Debug, FromRow, Serialize)]
pub struct PromedioPorHora {
    pub fecha: NaiveDateTime,
    pub promedio: i64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct PromedioTipoPorDia {
    pub fecha: NaiveDate,
    pub tipo: String,
    pub promedio: i64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct DeteccionesPorTrampa {
    pub trampa_id: i32,
    pub tipo_insecto: String,
    pub cantidad: i64,
}

#[derive(Debug, FromRow)]
pub struct TotalPorDia {
    pub dia: NaiveDate,
    pub total: i64,
}

/// Collapses increment rows into one entry per (trap, date). Rows arrive
/// ordered, so equal keys are contiguous.
pub fn resumir_historial(filas: Vec<FilaHistorialIncremento>) -> Vec<HistorialIncrementos> {
    let mut lecturas: Vec<HistorialIncrementos> = Vec::new();
    for fila in filas {
        match lecturas.last_mut() {
            Some(l) if l.trampa_id == fila.trampa_id && l.fecha == fila.fecha => {
                l.insectos_detectados
                    .push_str(&format!(", {} ({})", fila.tipo, fila.incremento));
            }
            _ => lecturas.push(HistorialIncrementos {
                trampa_id: fila.trampa_id,
                fecha: fila.fecha,
                insectos_detectados: format!("{} ({})", fila.tipo, fila.incremento),
            }),
        }
    }
    lecturas
}

/// Seven daily totals ending today, oldest first, missing days zero-filled.
pub fn rellenar_semana(hoy: NaiveDate, filas: &[TotalPorDia]) -> Vec<i64> {
    (0..7)
        .map(|i| {
            let dia = hoy - chrono::Duration::days(6 - i);
            filas
                .iter()
                .find(|f| f.dia == dia)
                .map(|f| f.total)
                .unwrap_or(0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fecha(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_resumir_historial_agrupa_por_trampa_y_fecha() {
        let filas = vec![
            FilaHistorialIncremento {
                trampa_id: 1,
                fecha: fecha(5, 10),
                tipo: "mosca_blanca".to_string(),
                incremento: 4,
            },
            FilaHistorialIncremento {
                trampa_id: 1,
                fecha: fecha(5, 10),
                tipo: "trips".to_string(),
                incremento: 2,
            },
            FilaHistorialIncremento {
                trampa_id: 2,
                fecha: fecha(5, 10),
                tipo: "mosca_blanca".to_string(),
                incremento: 1,
            },
        ];
        let lecturas = resumir_historial(filas);
        assert_eq!(lecturas.len(), 2);
        assert_eq!(lecturas[0].insectos_detectados, "mosca_blanca (4), trips (2)");
        assert_eq!(lecturas[1].insectos_detectados, "mosca_blanca (1)");
    }

    #[test]
    fn test_rellenar_semana_ceros_y_orden() {
        let hoy = NaiveDate::from_ymd_opt(2025, 8, 7).unwrap();
        let filas = vec![
            TotalPorDia {
                dia: NaiveDate::from_ymd_opt(2025, 8, 7).unwrap(),
                total: 9,
            },
            TotalPorDia {
                dia: NaiveDate::from_ymd_opt(2025, 8, 3).unwrap(),
                total: 5,
            },
        ];
        assert_eq!(rellenar_semana(hoy, &filas), vec![0, 0, 5, 0, 0, 0, 9]);
    }
}
