//! Result margin parsing.
//!
//! Upstream only publishes the margin as free text ("Mumbai won by 5 runs",
//! "Super Over", "Match tied"). [`MarginSource`] is the seam that lets a
//! structured source skip text parsing entirely.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Margin, Match, MatchResult};

static RUNS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*run").expect("runs margin pattern"));
static WICKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*wicket").expect("wickets margin pattern"));
static SUPER_OVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)super\s*over").expect("super over pattern"));
static TIE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)tie").expect("tie pattern"));

/// Anything that can report a structured margin.
pub trait MarginSource {
    fn margin(&self) -> Option<Margin>;
}

impl MarginSource for str {
    fn margin(&self) -> Option<Margin> {
        parse_margin(self)
    }
}

impl MarginSource for MatchResult {
    /// The structured margin when present, otherwise the parsed margin text.
    fn margin(&self) -> Option<Margin> {
        self.margin_detail.or_else(|| parse_margin(&self.margin))
    }
}

impl MarginSource for Match {
    fn margin(&self) -> Option<Margin> {
        self.result.margin()
    }
}

/// Parse free-text margin. Patterns are tried in priority order: runs,
/// wickets, super over, tie. The first match wins.
pub fn parse_margin(text: &str) -> Option<Margin> {
    if text.is_empty() {
        return None;
    }
    if let Some(value) = capture_number(&RUNS_RE, text) {
        return Some(Margin::runs(value));
    }
    if let Some(value) = capture_number(&WICKETS_RE, text) {
        return Some(Margin::wickets(value));
    }
    if SUPER_OVER_RE.is_match(text) {
        return Some(Margin::super_over());
    }
    if TIE_RE.is_match(text) {
        return Some(Margin::tie());
    }
    None
}

fn capture_number(re: &Regex, text: &str) -> Option<u32> {
    // Absurdly long digit runs saturate rather than failing the match.
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
}
