// src/common/serde_utils.rs

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// O frontend manda `""` quando o select de produto fica vazio.
/// Vazio (ou só espaços) vira `None`; o resto precisa ser um UUID válido.
pub fn blank_uuid_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Texto vazio (ou só espaços) vira `None`.
pub fn blank_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "blank_uuid_as_none")]
        id: Option<Uuid>,
        #[serde(default, deserialize_with = "blank_string_as_none")]
        name: Option<String>,
    }

    #[test]
    fn blank_values_become_none() {
        let probe: Probe = serde_json::from_str(r#"{ "id": "  ", "name": "" }"#).unwrap();
        assert!(probe.id.is_none());
        assert!(probe.name.is_none());

        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert!(probe.id.is_none());
    }

    #[test]
    fn real_values_are_kept() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{ "id": "{id}", "name": " Taladro " }}"#);
        let probe: Probe = serde_json::from_str(&json).unwrap();
        assert_eq!(probe.id, Some(id));
        assert_eq!(probe.name.as_deref(), Some("Taladro"));
    }

    #[test]
    fn garbage_ids_are_rejected() {
        assert!(serde_json::from_str::<Probe>(r#"{ "id": "abc" }"#).is_err());
    }
}
