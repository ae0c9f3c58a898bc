//! Head-to-head records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flattened head-to-head response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct H2HSummary {
    #[serde(rename = "playerLeft")]
    pub player_left: Option<Value>,

    #[serde(rename = "playerRight")]
    pub player_right: Option<Value>,

    pub matches: Vec<H2HMatchRecord>,
}

/// One meeting between the two players.
///
/// Both set representations may be present: `sets` comes from the website
/// result string, `upstream_sets` from the data feed's per-set objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct H2HMatchRecord {
    pub tournament: Option<String>,
    pub year: Option<Value>,
    pub round: Option<String>,
    pub winner: Option<Value>,
    pub surface: Option<String>,
    pub indoor_outdoor: Option<String>,
    pub match_id: Option<Value>,
    /// Raw result string, e.g. `"64 76(7) 63"`
    pub result: Option<String>,
    pub sets: Option<Vec<ParsedSet>>,
    pub player_team: Option<Value>,
    pub opponent_team: Option<Value>,
    pub upstream_sets: Option<Vec<UpstreamSet>>,
    pub match_stats_url: Option<Value>,
    /// Retirement or walkover reason
    pub reason: Option<Value>,
}

/// A set parsed out of a result string token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSet {
    pub set: u32,
    pub p1: u8,
    pub p2: u8,
    /// Points won by the tiebreak loser
    pub tiebreak: Option<u64>,
}

impl ParsedSet {
    pub fn new(set: u32, p1: u8, p2: u8, tiebreak: Option<u64>) -> Self {
        Self {
            set,
            p1,
            p2,
            tiebreak,
        }
    }
}

/// A set as reported by the data feed, from the primary side's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamSet {
    pub set_number: Option<Value>,
    pub player_games: Option<Value>,
    pub player_tiebreak: Option<Value>,
    pub won_set: Option<Value>,
}
