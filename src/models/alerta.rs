use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// Severity tiers of an alert. Anything outside this set is rejected at the
/// validation boundary before any statement runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severidad {
    Alta,
    Media,
    Baja,
}

impl Severidad {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "alta" => Some(Severidad::Alta),
            "media" => Some(Severidad::Media),
            "baja" => Some(Severidad::Baja),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severidad::Alta => "alta",
            Severidad::Media => "media",
            Severidad::Baja => "baja",
        }
    }
}

/// Lifecycle state of an alert. `activa` is the initial state; the other two
/// are reversible terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoAlerta {
    Activa,
    Resuelta,
    Descartada,
}

impl EstadoAlerta {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "activa" => Some(EstadoAlerta::Activa),
            "resuelta" => Some(EstadoAlerta::Resuelta),
            "descartada" => Some(EstadoAlerta::Descartada),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoAlerta::Activa => "activa",
            EstadoAlerta::Resuelta => "resuelta",
            EstadoAlerta::Descartada => "descartada",
        }
    }
}

#[derive(Debug, FromRow, Serialize)]
pub struct Alerta {
    pub id: i64,
    pub tipo: String,
    pub mensaje: String,
    pub fecha: NaiveDateTime,
    pub severidad: String, // enum in DB, map to String
    pub estado: String,
    pub captura_id: Option<i64>,
    pub trampa_id: Option<i32>,
    pub fecha_resolucion: Option<NaiveDateTime>,
    pub notas_resolucion: Option<String>,
}

/// Listing row enriched with capture context and elapsed minutes, both
/// computed by the store at query time.
#[derive(Debug, FromRow, Serialize)]
pub struct AlertaDetalle {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub alerta: Alerta,
    pub fecha_captura: Option<NaiveDateTime>,
    pub minutos_desde_alerta: i64,
    pub total_insectos: Option<i64>,
}

/// Active-alert breakdown by severity, always reported alongside a listing
/// regardless of the requested filter.
#[derive(Debug, Default, Serialize)]
pub struct EstadisticasAlertas {
    pub alta: i64,
    pub media: i64,
    pub baja: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severidad_parse() {
        assert_eq!(Severidad::parse("alta"), Some(Severidad::Alta));
        assert_eq!(Severidad::parse("media"), Some(Severidad::Media));
        assert_eq!(Severidad::parse("baja"), Some(Severidad::Baja));
        assert_eq!(Severidad::parse("critica"), None);
        assert_eq!(Severidad::parse("Alta"), None); // case-sensitive
        assert_eq!(Severidad::parse(""), None);
    }

    #[test]
    fn test_estado_parse() {
        assert_eq!(EstadoAlerta::parse("activa"), Some(EstadoAlerta::Activa));
        assert_eq!(EstadoAlerta::parse("resuelta"), Some(EstadoAlerta::Resuelta));
        assert_eq!(EstadoAlerta::parse("descartada"), Some(EstadoAlerta::Descartada));
        assert_eq!(EstadoAlerta::parse("cerrada"), None);
    }

    #[test]
    fn test_round_trip_as_str() {
        for estado in ["activa", "resuelta", "descartada"] {
            assert_eq!(EstadoAlerta::parse(estado).unwrap().as_str(), estado);
        }
        for severidad in ["alta", "media", "baja"] {
            assert_eq!(Severidad::parse(severidad).unwrap().as_str(), severidad);
        }
    }
}
