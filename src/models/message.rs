use serde::{Deserialize, Deserializer};

/// Payload published on the detections topic. Firmware versions differ on
/// whether counts arrive as numbers or strings, so both are accepted.
#[derive(Debug, Deserialize)]
pub struct DeteccionMessage {
    pub fecha: String,
    #[serde(deserialize_with = "parse_i32")]
    pub trampa_id: i32,
    #[serde(rename = "insects_detected")]
    pub insectos: Vec<InsectoDetectado>,
}

#[derive(Debug, Deserialize)]
pub struct InsectoDetectado {
    pub tipo: String,
    #[serde(deserialize_with = "parse_i32")]
    pub count: i32,
}

/// Payload published on the trap-status topic.
#[derive(Debug, Deserialize)]
pub struct EstadoTrampaMessage {
    #[serde(deserialize_with = "parse_i32")]
    pub trampa_id: i32,
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub trampa_adhesiva: Option<String>,
}

fn parse_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        String(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(v) => i32::try_from(v).map_err(serde::de::Error::custom),
        IntOrString::String(s) => s.trim().parse::<i32>().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing_deteccion_payload() {
        let payload = r#"
        {
            "fecha": "2025-08-05 14:30:00",
            "trampa_id": 3,
            "insects_detected": [
                {"tipo": "mosca_blanca", "count": 12},
                {"tipo": "trips", "count": 4}
            ]
        }
        "#;

        let msg: DeteccionMessage = serde_json::from_str(payload).unwrap();
        assert_eq!(msg.trampa_id, 3);
        assert_eq!(msg.insectos.len(), 2);
        assert_eq!(msg.insectos[0].tipo, "mosca_blanca");
        assert_eq!(msg.insectos[0].count, 12);
    }

    #[test]
    fn test_parsing_counts_as_strings() {
        let payload = r#"
        {
            "fecha": "2025-08-05 14:30:00",
            "trampa_id": "7",
            "insects_detected": [
                {"tipo": "pulgon", "count": "25"}
            ]
        }
        "#;

        let msg: DeteccionMessage = serde_json::from_str(payload).unwrap();
        assert_eq!(msg.trampa_id, 7);
        assert_eq!(msg.insectos[0].count, 25);
    }

    #[test]
    fn test_parsing_estado_trampa() {
        let payload = r#"
        {
            "trampa_id": 1,
            "status": "active",
            "timestamp": "2025-08-05 14:30:00"
        }
        "#;

        let msg: EstadoTrampaMessage = serde_json::from_str(payload).unwrap();
        assert_eq!(msg.trampa_id, 1);
        assert_eq!(msg.status, "active");
        assert!(msg.trampa_adhesiva.is_none());
    }

    #[test]
    fn test_payload_invalido_rechazado() {
        assert!(serde_json::from_str::<DeteccionMessage>(r#"{"fecha": "x"}"#).is_err());
        assert!(serde_json::from_str::<DeteccionMessage>("no json").is_err());
    }
}
