use chrono::{NaiveDate, NaiveDateTime};

pub mod alerta;
pub mod captura;
pub mod configuracion;
pub mod message;
pub mod reporte;
pub mod trampa;
pub mod usuario;

/// Parses the date formats the devices and the dashboard send. Date-only
/// values resolve to midnight.
pub fn parse_fecha(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Like [`parse_fecha`], but date-only values resolve to the end of the day
/// so an inclusive range upper bound covers the whole day.
pub fn parse_fecha_fin(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(23, 59, 59))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fecha_formats() {
        assert!(parse_fecha("2025-08-05 14:30:00").is_some());
        assert!(parse_fecha("2025-08-05T14:30:00").is_some());
        assert_eq!(
            parse_fecha("2025-08-05").unwrap().format("%H:%M:%S").to_string(),
            "00:00:00"
        );
        assert!(parse_fecha("no es una fecha").is_none());
        assert!(parse_fecha("").is_none());
    }

    #[test]
    fn test_parse_fecha_fin_covers_full_day() {
        assert_eq!(
            parse_fecha_fin("2025-08-05").unwrap().format("%H:%M:%S").to_string(),
            "23:59:59"
        );
        assert_eq!(
            parse_fecha_fin("2025-08-05 10:00:00").unwrap().format("%H:%M:%S").to_string(),
            "10:00:00"
        );
    }
}
