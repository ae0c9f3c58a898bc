//! Candidate match identifiers.
//!
//! Upstream match resources are addressed as `ms001`, `ms002`, ... for the
//! main draw and `qs001`, ... for qualifying. There is no listing endpoint, so
//! the candidate ids are generated from the draw size and probed one by one.

/// Prefix of main-draw singles match ids.
pub const MAIN_DRAW_PREFIX: &str = "ms";

/// Prefix of qualifying-draw singles match ids.
pub const QUALIFIER_PREFIX: &str = "qs";

/// Main-draw match ids for a single-elimination draw of `draw_size` entrants.
///
/// A draw of D players has D - 1 matches. Draws smaller than 2 have none.
pub fn main_draw_ids(draw_size: i64) -> Vec<String> {
    if draw_size < 2 {
        return Vec::new();
    }
    sequence(MAIN_DRAW_PREFIX, draw_size - 1)
}

/// Qualifying match ids up to `max_qualifiers`. Non-positive caps yield none.
pub fn qualifier_ids(max_qualifiers: i64) -> Vec<String> {
    if max_qualifiers <= 0 {
        return Vec::new();
    }
    sequence(QUALIFIER_PREFIX, max_qualifiers)
}

/// All ids to probe for a tournament: main draw first, then qualifying.
pub fn candidate_ids(draw_size: i64, max_qualifiers: i64) -> Vec<String> {
    let mut ids = main_draw_ids(draw_size);
    ids.extend(qualifier_ids(max_qualifiers));
    ids
}

fn sequence(prefix: &str, count: i64) -> Vec<String> {
    (1..=count).map(|i| format!("{}{:03}", prefix, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_draw_32() {
        let ids = main_draw_ids(32);
        assert_eq!(ids.len(), 31);
        assert_eq!(ids.first().map(String::as_str), Some("ms001"));
        assert_eq!(ids.last().map(String::as_str), Some("ms031"));
    }

    #[test]
    fn test_main_draw_is_ascending_sequence() {
        for draw_size in [2, 3, 28, 56, 96, 128] {
            let ids = main_draw_ids(draw_size);
            let expected: Vec<String> = (1..draw_size).map(|i| format!("ms{:03}", i)).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn test_main_draw_minimum() {
        assert_eq!(main_draw_ids(2), vec!["ms001".to_string()]);
    }

    #[test]
    fn test_main_draw_degenerate() {
        assert!(main_draw_ids(1).is_empty());
        assert!(main_draw_ids(0).is_empty());
        assert!(main_draw_ids(-16).is_empty());
    }

    #[test]
    fn test_qualifier_ids() {
        let ids = qualifier_ids(20);
        assert_eq!(ids.len(), 20);
        assert_eq!(ids[0], "qs001");
        assert_eq!(ids[19], "qs020");
    }

    #[test]
    fn test_qualifier_ids_non_positive() {
        assert!(qualifier_ids(0).is_empty());
        assert!(qualifier_ids(-1).is_empty());
    }

    #[test]
    fn test_candidate_ids_order() {
        let ids = candidate_ids(4, 2);
        assert_eq!(ids, vec!["ms001", "ms002", "ms003", "qs001", "qs002"]);
    }

    #[test]
    fn test_wide_sequence_keeps_padding_minimum() {
        let ids = main_draw_ids(1200);
        assert_eq!(ids[998], "ms999");
        assert_eq!(ids[999], "ms1000");
    }
}
