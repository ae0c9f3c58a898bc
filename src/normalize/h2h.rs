//! Head-to-head flattening.
//!
//! Two upstream shapes are handled:
//!
//! - **data feed**: tournaments carry `TournamentName` and a `MatchResults`
//!   list whose matches hold per-set objects under `PlayerTeam.Sets`
//! - **website**: tournaments carry `EventDisplayName` and a `Matches` list
//!   whose matches hold a `ResultString` such as `"64 76(7) 63"`

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::{first_string, get_path, scalar_string};
use crate::models::{H2HMatchRecord, H2HSummary, ParsedSet, UpstreamSet};

/// Top-level tournament groupings, in output order.
const SECTIONS: [&str; 2] = ["Tournaments", "OtherTournaments"];

/// Result tokens marking a match that was not played to completion.
const NON_COMPLETION_MARKERS: [&str; 7] = ["RET", "W/O", "WO", "DEF", "ABN", "BYE", "CANC"];

fn set_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // e.g. "76(7)" -> games "76", tiebreak "7"
    RE.get_or_init(|| Regex::new(r"^([0-9]+)(?:\(([0-9]+)\))?$").unwrap())
}

/// Parse a website result string into sets.
///
/// Each accepted token contributes one set: its first digit is side one's
/// games, its second digit side two's, and an optional parenthesised number is
/// the tiebreak loser's points. Game counts are single digits per side, so
/// scores like `"1210"` are misread; the upstream format gives no way to
/// split them. Parsing stops at the first non-completion marker.
pub fn parse_result_string(result: &str) -> Option<Vec<ParsedSet>> {
    let mut sets = Vec::new();

    for token in result.split_whitespace() {
        let upper = token.to_uppercase();
        if NON_COMPLETION_MARKERS.contains(&upper.as_str()) {
            break;
        }

        let Some(caps) = set_token_regex().captures(token) else {
            continue;
        };

        let digits = caps[1].as_bytes();
        if digits.len() < 2 {
            continue;
        }

        // an absurdly long tiebreak count still leaves a valid set
        let tiebreak = caps.get(2).and_then(|m| m.as_str().parse::<u64>().ok());

        let set_number = sets.len() as u32 + 1;
        sets.push(ParsedSet::new(
            set_number,
            digits[0] - b'0',
            digits[1] - b'0',
            tiebreak,
        ));
    }

    if sets.is_empty() {
        None
    } else {
        Some(sets)
    }
}

/// Flatten every match of a head-to-head payload into one list.
pub fn flatten_h2h_matches(raw: &Value) -> Vec<H2HMatchRecord> {
    let mut matches = Vec::new();

    for section in SECTIONS {
        let Some(tournaments) = raw.get(section).and_then(Value::as_array) else {
            continue;
        };

        for tournament in tournaments.iter().filter(|t| t.is_object()) {
            let name = first_string([
                tournament.get("TournamentName"),
                tournament.get("EventDisplayName"),
                tournament.get("EventName"),
            ]);
            let year = get_path(tournament, &["EventYear"]).cloned();
            let surface = tournament.get("Surface").and_then(scalar_string);
            let indoor_outdoor = tournament
                .get("InOutdoorDisplay")
                .and_then(scalar_string);

            for m in match_list(tournament).iter().filter(|m| m.is_object()) {
                matches.push(flatten_one(
                    m,
                    name.clone(),
                    year.clone(),
                    surface.clone(),
                    indoor_outdoor.clone(),
                ));
            }
        }
    }

    matches
}

/// Build the flattened response, carrying both player headers through.
pub fn flatten_h2h(raw: &Value) -> H2HSummary {
    H2HSummary {
        player_left: get_path(raw, &["playerLeft"]).cloned(),
        player_right: get_path(raw, &["playerRight"]).cloned(),
        matches: flatten_h2h_matches(raw),
    }
}

/// `MatchResults` (data feed) wins over `Matches` (website) when non-empty.
fn match_list(tournament: &Value) -> &[Value] {
    ["MatchResults", "Matches"]
        .into_iter()
        .filter_map(|key| tournament.get(key).and_then(Value::as_array))
        .find(|list| !list.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn flatten_one(
    m: &Value,
    tournament: Option<String>,
    year: Option<Value>,
    surface: Option<String>,
    indoor_outdoor: Option<String>,
) -> H2HMatchRecord {
    let result = m
        .get("ResultString")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let sets = result.as_deref().and_then(parse_result_string);

    let upstream_sets = get_path(m, &["PlayerTeam", "Sets"])
        .and_then(Value::as_array)
        .map(|sets| {
            sets.iter()
                .filter(|s| s.is_object())
                .map(|s| UpstreamSet {
                    set_number: get_path(s, &["SetNumber"]).cloned(),
                    player_games: get_path(s, &["SetScore"]).cloned(),
                    player_tiebreak: get_path(s, &["TieBreakScore"]).cloned(),
                    won_set: get_path(s, &["WonSet"]).cloned(),
                })
                .collect()
        });

    H2HMatchRecord {
        tournament,
        year,
        round: first_string([get_path(m, &["Round", "ShortName"])]),
        winner: get_path(m, &["Winner"]).cloned(),
        surface,
        indoor_outdoor,
        match_id: get_path(m, &["MatchId"]).cloned(),
        result,
        sets,
        player_team: get_path(m, &["PlayerTeam"]).cloned(),
        opponent_team: get_path(m, &["OpponentTeam"]).cloned(),
        upstream_sets,
        match_stats_url: get_path(m, &["MatchStatsUrl"]).cloned(),
        reason: get_path(m, &["Reason"]).cloned(),
    }
}
