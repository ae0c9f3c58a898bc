//! Flattened match record served when `flatten=true`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single match reduced to the fields clients usually need.
///
/// Loosely typed upstream scalars (ids, years, durations) are carried as raw
/// JSON values since the upstream feeds disagree on whether they are numbers
/// or strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: Option<Value>,
    pub event_id: Option<Value>,
    pub event_year: Option<Value>,
    pub event_name: Option<String>,
    pub tournament_name: Option<String>,
    pub city: Option<String>,
    pub surface: Option<String>,
    pub round: Option<String>,
    pub status: Option<String>,
    pub is_doubles: Option<bool>,
    pub winner_id: Option<Value>,
    /// `None` when neither side carries a player id
    pub players: Option<Vec<PlayerSummary>>,
    /// `None` when no set data was found
    pub score: Option<Vec<SetScore>>,
    pub duration: Option<Value>,
}

/// One side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub player_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
}

/// Games per side for one set. A side missing from the upstream feed stays `None`.
///
/// Scores are the upstream values as sent, number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub set: u64,
    pub p1: Option<Value>,
    pub p2: Option<Value>,
    pub tiebreak: Option<TiebreakScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiebreakScore {
    pub p1: Option<Value>,
    pub p2: Option<Value>,
}
