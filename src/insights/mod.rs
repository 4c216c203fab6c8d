//! Match insights engine.
//!
//! Derives presentation-ready insights from completed T20 fixtures:
//! - Margin parsing and finish classification
//! - Highlight chips, story arc and thirty-second summaries
//! - Ball-by-ball key moments and chart series
//! - Tags, sort metrics and listing filters
//! - Related matches and head-to-head records
//!
//! Everything here is a pure function of its inputs.

pub mod classify;
pub mod filters;
pub mod key_moments;
pub mod margin;
pub mod metrics;
pub mod narrative;
pub mod relations;
pub mod timeline;

pub use classify::{
    batting_first, chasing_side, classify_finish, is_close_match, is_high_scoring,
    is_low_scoring, is_upset, last_over_finish, was_successful_chase,
};
pub use filters::{filter_by_date_range, filter_by_tags, filter_by_team, MatchFilter};
pub use key_moments::{
    biggest_partnership, death_overs_score, generate_key_moments, powerplay_score,
    turning_point_over, wicket_clusters,
};
pub use margin::{parse_margin, MarginSource};
pub use metrics::{generate_sort_metrics, generate_tags, parse_match_date, sort_matches, SortMode};
pub use narrative::{generate_highlights, generate_story, summarize_for_thirty_seconds};
pub use relations::{
    compute_head_to_head, compute_head_to_head_with_recent, find_related_matches,
    DEFAULT_RELATED_LIMIT, RECENT_MEETINGS,
};
pub use timeline::{compute_fall_of_wickets, compute_momentum_data};

use rayon::prelude::*;
use tracing::debug;

use crate::models::{AnalyzedMatch, Match, MatchInsights, StandingsRow};

/// Full insight bundle for a completed match; `None` otherwise.
pub fn compute_match_insights(m: &Match, standings: &[StandingsRow]) -> Option<MatchInsights> {
    if !m.is_completed() {
        return None;
    }

    Some(MatchInsights {
        highlights: generate_highlights(m, standings),
        story: generate_story(m),
        finish_type: classify_finish(m),
        tags: generate_tags(m, standings),
        sort_metrics: generate_sort_metrics(m),
        key_moments: generate_key_moments(m),
    })
}

/// Attach insights to a single match.
pub fn analyze_match(m: Match, standings: &[StandingsRow]) -> AnalyzedMatch {
    let insights = compute_match_insights(&m, standings);
    AnalyzedMatch {
        record: m,
        insights,
    }
}

/// Attach insights to every match, in parallel. Output order follows input.
pub fn analyze_matches(matches: Vec<Match>, standings: &[StandingsRow]) -> Vec<AnalyzedMatch> {
    let analyzed: Vec<AnalyzedMatch> = matches
        .into_par_iter()
        .map(|m| analyze_match(m, standings))
        .collect();

    debug!(
        total = analyzed.len(),
        with_insights = analyzed.iter().filter(|a| a.insights.is_some()).count(),
        "Analyzed matches"
    );
    analyzed
}

#[cfg(test)]
mod tests {
    use super::classify::fixtures::*;
    use super::*;
    use crate::models::{Ball, BattingEntry, FinishType, Highlight, MatchStatus, Tag};
    use pretty_assertions::assert_eq;

    fn with_deliveries(mut m: Match) -> Match {
        m.balls = vec![
            Ball::new(0, 8, 0),
            Ball::new(2, 1, 1),
            Ball::new(3, 0, 1),
            Ball::new(12, 22, 0),
            Ball::new(18, 14, 0),
        ];
        m.batting = vec![vec![
            BattingEntry {
                player_name: "Opener A".to_string(),
                runs: 61,
                ..BattingEntry::default()
            },
            BattingEntry {
                player_name: "Opener B".to_string(),
                runs: 44,
                ..BattingEntry::default()
            },
        ]];
        m
    }

    #[test]
    fn test_chase_scenario_end_to_end() {
        let m = with_deliveries(chase_scenario());
        let insights = compute_match_insights(&m, &table()).unwrap();

        assert_eq!(insights.finish_type, FinishType::Standard);
        assert!(was_successful_chase(&m));
        assert!(is_upset(&m, &table()));
        assert!(insights.has_tag(Tag::Chase));
        assert!(insights.has_tag(Tag::Upset));
        assert!(insights.highlights.contains(&Highlight::SuccessfulChase));
        assert_eq!(insights.highlights.len(), 3);

        assert_eq!(insights.story.finish, "4 wickets");
        assert_eq!(insights.sort_metrics.highest_chase, 182);

        let km = &insights.key_moments;
        assert_eq!(km.powerplay.as_ref().map(|p| (p.runs, p.wickets)), Some((9, 2)));
        assert_eq!(km.wicket_clusters.len(), 1);
        assert_eq!(km.biggest_partnership.as_ref().map(|p| p.runs), Some(105));
        assert_eq!(km.turning_point.as_ref().map(|t| t.over), Some(12));
    }

    #[test]
    fn test_insights_only_for_completed() {
        for status in [MatchStatus::Upcoming, MatchStatus::Live] {
            let mut m = chase_scenario();
            m.status = status;
            assert!(compute_match_insights(&m, &table()).is_none());
        }
    }

    #[test]
    fn test_insights_are_deterministic() {
        let m = with_deliveries(chase_scenario());
        let first = compute_match_insights(&m, &table());
        let second = compute_match_insights(&m, &table());
        assert_eq!(first, second);
    }

    #[test]
    fn test_analyze_matches_preserves_order() {
        let mut live = chase_scenario();
        live.id = "live".into();
        live.status = MatchStatus::Live;
        let mut tie = with_margin("Match tied");
        tie.id = "tie".into();

        let analyzed = analyze_matches(vec![chase_scenario(), live, tie], &table());
        let ids: Vec<&str> = analyzed.iter().map(|a| a.record.id.as_str()).collect();
        assert_eq!(ids, vec!["e2e", "live", "tie"]);
        assert!(analyzed[0].insights.is_some());
        assert!(analyzed[1].insights.is_none());
        assert_eq!(
            analyzed[2].insights.as_ref().map(|i| i.finish_type),
            Some(FinishType::Tie)
        );
    }

    #[test]
    fn test_saturated_counts_do_not_overflow() {
        // Oversized numbers deserialize to u32::MAX.
        let json = r#"{
            "id": "huge",
            "status": "completed",
            "teams": {"home": {"id": "1", "name": "One"}, "away": {"id": "2", "name": "Two"}},
            "score": {
                "home": {"runs": 1e12, "wickets": 1e12, "overs": 20},
                "away": {"runs": 1e12, "wickets": 1e12, "overs": 19.5}
            },
            "result": {"winner": "2", "margin": "Two won by 99999999999 wickets"},
            "batting": [[{"playerName": "A", "runs": 1e12}, {"playerName": "B", "runs": 1e12}]],
            "balls": [
                {"over": 0, "runs": 1e12, "wickets": 1e12},
                {"over": 0, "runs": 1e12, "wickets": 1e12},
                {"over": 17, "runs": 1e12, "wickets": 0},
                {"over": 17, "runs": 1e12, "wickets": 0}
            ]
        }"#;
        let m: Match = serde_json::from_str(json).unwrap();
        assert_eq!(m.score.home.runs, u32::MAX);

        let standings = vec![
            StandingsRow::new("1", "One", 1),
            StandingsRow::new("2", "Two", u32::MAX),
        ];
        let insights = compute_match_insights(&m, &standings).unwrap();

        assert_eq!(insights.sort_metrics.total_runs, u32::MAX);
        assert_eq!(insights.sort_metrics.total_wickets, u32::MAX);
        let km = &insights.key_moments;
        assert_eq!(km.powerplay.as_ref().map(|p| p.runs), Some(u32::MAX));
        assert_eq!(km.death_overs.as_ref().map(|d| d.runs), Some(u32::MAX));
        assert_eq!(km.biggest_partnership.as_ref().map(|p| p.runs), Some(u32::MAX));
        assert!(km.turning_point.is_some());
    }

    #[test]
    fn test_analyzed_match_serializes_flat() {
        let analyzed = analyze_match(chase_scenario(), &[]);
        let json = serde_json::to_value(&analyzed).unwrap();
        assert_eq!(json["id"], "e2e");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["insights"]["finishType"], "standard");
    }
}
