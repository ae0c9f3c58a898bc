//! Match-stats payload flattening.
//!
//! Accepts both the wrapped schema (`{"Tournament": {...}, "Match": {...}}`)
//! and the legacy schema where match fields sit at the top level.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use super::{first_present, first_string, get_path, is_present, scalar_string};
use crate::models::{MatchRecord, PlayerSummary, SetScore, TiebreakScore};

/// True if the payload carries a match id in either schema.
///
/// Upstream answers unknown match ids with placeholder bodies, so anything
/// failing this check is not a real match.
pub fn has_match_id(payload: &Value) -> bool {
    let wrapped = get_path(payload, &["Match", "MatchId"]);
    let legacy = get_path(payload, &["MatchId"]);
    wrapped.into_iter().chain(legacy).any(is_present)
}

/// Flatten one match-stats payload. Non-object payloads yield an empty record.
pub fn flatten_match(payload: &Value) -> MatchRecord {
    if !payload.is_object() {
        return MatchRecord::default();
    }

    let tournament = payload.get("Tournament").filter(|t| t.is_object());
    let m = payload
        .get("Match")
        .filter(|m| m.is_object())
        .unwrap_or(payload);

    let players: Vec<PlayerSummary> = ["PlayerTeam", "OpponentTeam"]
        .into_iter()
        .filter_map(|team| player_summary(get_path(m, &[team, "Player"])))
        .collect();

    MatchRecord {
        match_id: first_present([m.get("MatchId"), payload.get("MatchId")]),
        event_id: field(tournament, "EventId").cloned(),
        event_year: field(tournament, "EventYear").cloned(),
        event_name: field(tournament, "EventDisplayName").and_then(scalar_string),
        tournament_name: field(tournament, "TournamentName").and_then(scalar_string),
        city: field(tournament, "TournamentCity").and_then(scalar_string),
        surface: first_string([
            field(tournament, "Court"),
            m.get("Surface"),
            payload.get("Surface"),
        ]),
        round: first_string([
            get_path(m, &["Round", "ShortName"]),
            m.get("RoundName"),
            m.get("Round"),
        ]),
        status: first_string([
            m.get("Status"),
            m.get("MatchStatus"),
            payload.get("Status"),
        ]),
        is_doubles: m.get("IsDoubles").and_then(Value::as_bool),
        winner_id: first_present([
            m.get("WinningPlayerId"),
            m.get("Winner"),
            payload.get("Winner"),
        ]),
        players: if players.is_empty() {
            None
        } else {
            Some(players)
        },
        score: set_scores(
            get_path(m, &["PlayerTeam1", "Sets"]),
            get_path(m, &["PlayerTeam2", "Sets"]),
        ),
        duration: first_present([m.get("MatchTimeTotal"), m.get("MatchTime")]),
    }
}

fn field<'a>(obj: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    obj.and_then(|o| get_path(o, &[key]))
}

fn player_summary(player: Option<&Value>) -> Option<PlayerSummary> {
    let obj = player?.as_object()?;
    let player_id = obj
        .get("PlayerId")
        .filter(|v| is_present(v))
        .and_then(scalar_string)?;

    Some(PlayerSummary {
        player_id,
        first_name: obj.get("PlayerFirstName").and_then(scalar_string),
        last_name: obj.get("PlayerLastName").and_then(scalar_string),
        country: obj.get("PlayerCountry").and_then(scalar_string),
    })
}

/// Index a per-side `Sets` array by set number. A later duplicate replaces an
/// earlier one. `None` means the field exists but is not an array.
fn sets_by_number(sets: Option<&Value>) -> Option<BTreeMap<u64, &Map<String, Value>>> {
    match sets {
        None => Some(BTreeMap::new()),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|s| Some((s.get("SetNumber")?.as_u64()?, s)))
                .filter(|(n, _)| *n >= 1)
                .collect(),
        ),
        Some(_) => None,
    }
}

fn set_scores(p1_sets: Option<&Value>, p2_sets: Option<&Value>) -> Option<Vec<SetScore>> {
    let p1 = sets_by_number(p1_sets)?;
    let p2 = sets_by_number(p2_sets)?;

    let set_numbers: BTreeSet<u64> = p1.keys().chain(p2.keys()).copied().collect();

    let score: Vec<SetScore> = set_numbers
        .into_iter()
        .map(|n| {
            let s1 = p1.get(&n);
            let s2 = p2.get(&n);
            let read = |side: Option<&&Map<String, Value>>, key: &str| {
                side.and_then(|s| s.get(key))
                    .filter(|v| !v.is_null())
                    .cloned()
            };

            let tb1 = read(s1, "TieBreakScore");
            let tb2 = read(s2, "TieBreakScore");

            SetScore {
                set: n,
                p1: read(s1, "SetScore"),
                p2: read(s2, "SetScore"),
                tiebreak: if tb1.is_none() && tb2.is_none() {
                    None
                } else {
                    Some(TiebreakScore { p1: tb1, p2: tb2 })
                },
            }
        })
        .collect();

    if score.is_empty() {
        None
    } else {
        Some(score)
    }
}
