//! Reshaping of upstream ATP payloads.
//!
//! The upstream service serves (at least) two schemas for the same data: the
//! website schema and the data-feed schema. Rather than modelling each as its
//! own type, every logical field is read through an ordered list of candidate
//! locations and the first present value wins.
//!
//! - **matches**: match-stats payloads into [`MatchRecord`](crate::models::MatchRecord)
//! - **h2h**: head-to-head payloads into [`H2HMatchRecord`](crate::models::H2HMatchRecord)

pub mod h2h;
pub mod matches;

pub use h2h::{flatten_h2h, flatten_h2h_matches, parse_result_string};
pub use matches::{flatten_match, has_match_id};

use serde_json::Value;

/// Walk nested objects by key. Null counts as missing.
pub fn get_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// A value counts as present unless it is null or an empty string.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// First present candidate, cloned.
pub fn first_present<'a, I>(candidates: I) -> Option<Value>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|v| is_present(v))
        .cloned()
}

/// First present candidate that reads as a string.
pub fn first_string<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    candidates
        .into_iter()
        .flatten()
        .filter(|v| is_present(v))
        .find_map(scalar_string)
}

/// Stringify a JSON string or number; anything else is treated as absent.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer from a JSON integer or a numeric string.
pub fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_path_nested() {
        let v = json!({"Match": {"Round": {"ShortName": "QF"}}});
        assert_eq!(
            get_path(&v, &["Match", "Round", "ShortName"]),
            Some(&json!("QF"))
        );
        assert_eq!(get_path(&v, &["Match", "Missing"]), None);
        assert_eq!(get_path(&v, &["Match", "Round", "ShortName", "Deeper"]), None);
    }

    #[test]
    fn test_get_path_null_is_missing() {
        let v = json!({"Tournament": null});
        assert_eq!(get_path(&v, &["Tournament"]), None);
    }

    #[test]
    fn test_first_present_skips_null_and_empty() {
        let empty = json!("");
        let null = Value::Null;
        let real = json!("Hard");
        assert_eq!(
            first_present([None, Some(&null), Some(&empty), Some(&real)]),
            Some(json!("Hard"))
        );
        assert_eq!(first_present([None, Some(&null)]), None);
    }

    #[test]
    fn test_first_string_skips_objects() {
        let round = json!({"LongName": "Final"});
        let name = json!("F");
        assert_eq!(
            first_string([Some(&round), Some(&name)]),
            Some("F".to_string())
        );
    }

    #[test]
    fn test_lenient_int() {
        assert_eq!(lenient_int(&json!(6)), Some(6));
        assert_eq!(lenient_int(&json!("7")), Some(7));
        assert_eq!(lenient_int(&json!("x")), None);
        assert_eq!(lenient_int(&json!(6.5)), None);
    }
}
