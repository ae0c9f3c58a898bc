pub mod h2h;
pub mod matches;
pub mod registry;

use serde::{Deserialize, Deserializer};

/// `?flatten=` query flag shared by the match and head-to-head routes.
#[derive(Debug, Default, Deserialize)]
pub struct FlattenQuery {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub flatten: bool,
}

/// Parse a query-string boolean the way browsers and curl users write them.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid boolean flag: {}", raw)))
}
