//! Filter tags, sort metrics and the listing sort modes.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AnalyzedMatch, FinishType, MarginKind, Match, SortMetrics, StandingsRow, Tag};

use super::classify::{
    classify_finish, is_close_match, is_high_scoring, is_low_scoring, is_upset,
    was_successful_chase,
};
use super::margin::MarginSource;

/// Sentinel for a margin that could not be read; sorts last when closest.
pub const UNKNOWN_MARGIN: u32 = 999;
/// Wicket margins are multiplied by this to rank against run margins.
pub const WICKET_CLOSENESS_SCALE: u32 = 10;

/// Every tag that applies to the match. Tags are independent.
pub fn generate_tags(m: &Match, standings: &[StandingsRow]) -> Vec<Tag> {
    let finish = classify_finish(m);
    [
        (is_close_match(m), Tag::Close),
        (is_high_scoring(m), Tag::HighScoring),
        (is_low_scoring(m), Tag::LowScoring),
        (is_upset(m, standings), Tag::Upset),
        (was_successful_chase(m), Tag::Chase),
        (finish == FinishType::SuperOver, Tag::SuperOver),
        (finish == FinishType::BigWin, Tag::Dominant),
    ]
    .into_iter()
    .filter_map(|(applies, tag)| applies.then_some(tag))
    .collect()
}

/// Numeric bundle backing the sort modes.
pub fn generate_sort_metrics(m: &Match) -> SortMetrics {
    let margin = m.margin();
    let closeness = match margin {
        Some(mg) => match mg.kind {
            MarginKind::SuperOver | MarginKind::Tie => 0,
            MarginKind::Runs => mg.value,
            MarginKind::Wickets => mg.value.saturating_mul(WICKET_CLOSENESS_SCALE),
        },
        None => UNKNOWN_MARGIN,
    };

    let (home, away) = (&m.score.home, &m.score.away);
    let highest_chase = if was_successful_chase(m) {
        home.runs.max(away.runs)
    } else {
        0
    };

    SortMetrics {
        closeness,
        total_runs: home.runs.saturating_add(away.runs),
        total_wickets: home.wickets.saturating_add(away.wickets),
        highest_chase,
        margin_value: margin.map_or(UNKNOWN_MARGIN, |mg| mg.value),
        margin_type: margin.map(|mg| mg.kind.to_string()).unwrap_or_default(),
    }
}

/// Ordering used by match listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    #[default]
    Newest,
    Closest,
    BiggestWin,
    MostWickets,
    HighestChase,
}

impl SortMode {
    /// Parse a mode name; unknown names fall back to [`SortMode::Newest`].
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "closest" => SortMode::Closest,
            "biggestWin" | "biggest-win" => SortMode::BiggestWin,
            "mostWickets" | "most-wickets" => SortMode::MostWickets,
            "highestChase" | "highest-chase" => SortMode::HighestChase,
            _ => SortMode::Newest,
        }
    }

    /// Compare two analyzed matches under this mode.
    pub fn compare(&self, a: &AnalyzedMatch, b: &AnalyzedMatch) -> Ordering {
        let metric = |m: &AnalyzedMatch, f: fn(&SortMetrics) -> u32, missing: u32| {
            m.insights.as_ref().map_or(missing, |i| f(&i.sort_metrics))
        };
        match self {
            SortMode::Newest => {
                // Newest first; unparseable dates sink to the end.
                match (parse_match_date(&a.record.date), parse_match_date(&b.record.date)) {
                    (Some(da), Some(db)) => db.cmp(&da),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
            SortMode::Closest => metric(a, |s| s.closeness, UNKNOWN_MARGIN)
                .cmp(&metric(b, |s| s.closeness, UNKNOWN_MARGIN)),
            SortMode::BiggestWin => {
                metric(b, |s| s.margin_value, 0).cmp(&metric(a, |s| s.margin_value, 0))
            }
            SortMode::MostWickets => {
                metric(b, |s| s.total_wickets, 0).cmp(&metric(a, |s| s.total_wickets, 0))
            }
            SortMode::HighestChase => {
                metric(b, |s| s.highest_chase, 0).cmp(&metric(a, |s| s.highest_chase, 0))
            }
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Newest => write!(f, "newest"),
            SortMode::Closest => write!(f, "closest"),
            SortMode::BiggestWin => write!(f, "biggestWin"),
            SortMode::MostWickets => write!(f, "mostWickets"),
            SortMode::HighestChase => write!(f, "highestChase"),
        }
    }
}

/// Stable sort of an analyzed collection.
pub fn sort_matches(matches: &mut [AnalyzedMatch], mode: SortMode) {
    matches.sort_by(|a, b| mode.compare(a, b));
}

/// Parse a match timestamp: RFC 3339, a few naive date-time layouts, or a
/// bare date (taken as midnight UTC).
pub fn parse_match_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
