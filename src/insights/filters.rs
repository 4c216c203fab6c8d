//! Listing filters over analyzed matches.

use chrono::{DateTime, Utc};

use crate::models::{AnalyzedMatch, Tag, TeamId};

use super::metrics::parse_match_date;

/// True when the match carries every one of `tags`. An empty list passes.
pub fn has_all_tags(m: &AnalyzedMatch, tags: &[Tag]) -> bool {
    tags.is_empty()
        || m.insights
            .as_ref()
            .is_some_and(|i| tags.iter().all(|t| i.has_tag(*t)))
}

/// True when the match is dated within `[from, to]`; either bound may be
/// open. An unparseable date passes only when both bounds are open.
pub fn within_dates(m: &AnalyzedMatch, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    let Some(date) = parse_match_date(&m.record.date) else {
        return false;
    };
    from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
}

/// True when the team played on either side. No team, or an empty id, passes.
pub fn involves_team(m: &AnalyzedMatch, team_id: Option<&TeamId>) -> bool {
    team_id.map_or(true, |t| t.is_empty() || m.record.involves(t))
}

/// Keep matches carrying every one of `tags`. An empty tag list keeps all.
pub fn filter_by_tags<'a>(matches: &'a [AnalyzedMatch], tags: &[Tag]) -> Vec<&'a AnalyzedMatch> {
    matches.iter().filter(|m| has_all_tags(m, tags)).collect()
}

/// Keep matches dated within `[from, to]`; either bound may be open.
///
/// Matches whose date cannot be parsed are kept only when both bounds are
/// open.
pub fn filter_by_date_range<'a>(
    matches: &'a [AnalyzedMatch],
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Vec<&'a AnalyzedMatch> {
    matches.iter().filter(|m| within_dates(m, from, to)).collect()
}

/// Keep matches in which the team played, on either side.
pub fn filter_by_team<'a>(
    matches: &'a [AnalyzedMatch],
    team_id: Option<&TeamId>,
) -> Vec<&'a AnalyzedMatch> {
    matches.iter().filter(|m| involves_team(m, team_id)).collect()
}

/// Combined listing query, applied team, then date range, then tags.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub team: Option<TeamId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub tags: Vec<Tag>,
}

impl MatchFilter {
    pub fn matches(&self, m: &AnalyzedMatch) -> bool {
        involves_team(m, self.team.as_ref())
            && within_dates(m, self.from, self.to)
            && has_all_tags(m, &self.tags)
    }

    /// Owned copies of the matches passing the filter, in input order.
    pub fn apply(&self, matches: &[AnalyzedMatch]) -> Vec<AnalyzedMatch> {
        matches.iter().filter(|m| self.matches(m)).cloned().collect()
    }
}
