//! Tournament registry record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{lenient_int, scalar_string};

/// One entry of the local tournament registry.
///
/// The registry file is produced offline from the tour calendar; only `Id` is
/// required, every other field is best effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRecord {
    /// Canonical tournament identifier (numeric string in practice)
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "Name")]
    pub name: Option<String>,

    /// Singles main-draw size
    #[serde(rename = "SglDrawSize")]
    pub sgl_draw_size: Option<i64>,

    #[serde(rename = "DblDrawSize")]
    pub dbl_draw_size: Option<i64>,

    /// Tour level tag (e.g. "250", "1000", "GS")
    #[serde(rename = "Type")]
    pub tournament_type: Option<String>,
}

impl TournamentRecord {
    /// Build a record from one raw registry element.
    ///
    /// Returns `None` when the element is not an object or lacks a usable `Id`.
    /// Numeric ids and draw sizes stored as strings are both accepted.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = scalar_string(obj.get("Id")?)?;

        Some(Self {
            id,
            name: obj.get("Name").and_then(scalar_string),
            sgl_draw_size: obj.get("SglDrawSize").and_then(lenient_int),
            dbl_draw_size: obj.get("DblDrawSize").and_then(lenient_int),
            tournament_type: obj.get("Type").and_then(scalar_string),
        })
    }

    /// Whether `name` equals this record's display name, ignoring case.
    pub fn name_matches(&self, lowered: &str) -> bool {
        self.name
            .as_deref()
            .map(|n| n.to_lowercase() == lowered)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_record() {
        let record = TournamentRecord::from_value(&json!({
            "Id": "580",
            "Name": "Doha",
            "SglDrawSize": 32,
            "DblDrawSize": 16,
            "Type": "500"
        }))
        .unwrap();

        assert_eq!(record.id, "580");
        assert_eq!(record.name.as_deref(), Some("Doha"));
        assert_eq!(record.sgl_draw_size, Some(32));
        assert_eq!(record.dbl_draw_size, Some(16));
        assert_eq!(record.tournament_type.as_deref(), Some("500"));
    }

    #[test]
    fn test_from_value_numeric_id_and_string_draw() {
        let record =
            TournamentRecord::from_value(&json!({"Id": 339, "SglDrawSize": "28"})).unwrap();
        assert_eq!(record.id, "339");
        assert_eq!(record.sgl_draw_size, Some(28));
        assert!(record.name.is_none());
    }

    #[test]
    fn test_from_value_without_id() {
        assert!(TournamentRecord::from_value(&json!({"Name": "Nowhere"})).is_none());
        assert!(TournamentRecord::from_value(&json!({"Id": null})).is_none());
        assert!(TournamentRecord::from_value(&json!("580")).is_none());
    }

    #[test]
    fn test_name_matches_case_insensitive() {
        let record = TournamentRecord::from_value(&json!({"Id": "580", "Name": "Doha"})).unwrap();
        assert!(record.name_matches("doha"));
        assert!(!record.name_matches("dubai"));
    }

    #[test]
    fn test_serialization_uses_registry_keys() {
        let record = TournamentRecord::from_value(&json!({"Id": "580", "Name": "Doha"})).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Id"], "580");
        assert_eq!(json["Name"], "Doha");
        assert!(json["SglDrawSize"].is_null());
    }
}
