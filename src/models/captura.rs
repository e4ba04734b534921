use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// One reporting event from a trap, with its per-type detections nested the
/// way the dashboard consumes them.
#[derive(Debug, Serialize)]
pub struct CapturaConInsectos {
    pub id: i64,
    pub fecha: NaiveDateTime,
    pub trampa_id: i32,
    pub total_insectos: i32,
    pub insectos: Vec<InsectoContado>,
}

#[derive(Debug, Serialize)]
pub struct InsectoContado {
    pub tipo: String,
    pub cantidad: i32,
}

/// Join row from capturas LEFT JOIN detecciones, regrouped in code.
#[derive(Debug, FromRow)]
pub struct FilaCaptura {
    pub id: i64,
    pub fecha: NaiveDateTime,
    pub trampa_id: i32,
    pub total_insectos: i32,
    pub tipo: Option<String>,
    pub cantidad: Option<i32>,
}

/// Detection row joined with its capture date and trap name.
#[derive(Debug, FromRow, Serialize)]
pub struct Lectura {
    pub id: i64,
    pub captura_id: i64,
    pub tipo: String,
    pub cantidad: i32,
    pub fecha: NaiveDateTime,
    pub trampa_id: i32,
    pub nombre_trampa: Option<String>,
}

/// Groups join rows into captures. Rows arrive ordered by capture, so equal
/// ids are contiguous.
pub fn agrupar_capturas(filas: Vec<FilaCaptura>) -> Vec<CapturaConInsectos> {
    let mut capturas: Vec<CapturaConInsectos> = Vec::new();
    for fila in filas {
        match capturas.last_mut() {
            Some(c) if c.id == fila.id => {
                if let (Some(tipo), Some(cantidad)) = (fila.tipo, fila.cantidad) {
                    c.insectos.push(InsectoContado { tipo, cantidad });
                }
            }
            _ => {
                let mut captura = CapturaConInsectos {
                    id: fila.id,
                    fecha: fila.fecha,
                    trampa_id: fila.trampa_id,
                    total_insectos: fila.total_insectos,
                    insectos: Vec::new(),
                };
                if let (Some(tipo), Some(cantidad)) = (fila.tipo, fila.cantidad) {
                    captura.insectos.push(InsectoContado { tipo, cantidad });
                }
                capturas.push(captura);
            }
        }
    }
    capturas
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fila(id: i64, tipo: Option<&str>, cantidad: Option<i32>) -> FilaCaptura {
        FilaCaptura {
            id,
            fecha: NaiveDate::from_ymd_opt(2025, 8, 5)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            trampa_id: 1,
            total_insectos: 10,
            tipo: tipo.map(str::to_string),
            cantidad,
        }
    }

    #[test]
    fn test_agrupa_detecciones_por_captura() {
        let filas = vec![
            fila(2, Some("mosca_blanca"), Some(7)),
            fila(2, Some("trips"), Some(3)),
            fila(1, Some("mosca_blanca"), Some(4)),
        ];
        let capturas = agrupar_capturas(filas);
        assert_eq!(capturas.len(), 2);
        assert_eq!(capturas[0].id, 2);
        assert_eq!(capturas[0].insectos.len(), 2);
        assert_eq!(capturas[1].insectos.len(), 1);
    }

    #[test]
    fn test_captura_sin_detecciones() {
        let capturas = agrupar_capturas(vec![fila(1, None, None)]);
        assert_eq!(capturas.len(), 1);
        assert!(capturas[0].insectos.is_empty());
    }
}
