pub mod head_to_head;
pub mod matches;

use axum::Json;
use serde::Serialize;

use crate::models::{AnalyzedMatch, Highlight, MatchStatus, Scoreboard, Tag};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Compact listing row for a match.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: String,
    pub date: String,
    pub status: MatchStatus,
    pub home: String,
    pub away: String,
    pub score: Scoreboard,
    pub winner: String,
    pub margin: String,
    pub highlights: Vec<Highlight>,
    pub tags: Vec<Tag>,
}

impl From<&AnalyzedMatch> for MatchSummary {
    fn from(analyzed: &AnalyzedMatch) -> Self {
        let m = &analyzed.record;
        let (highlights, tags) = analyzed
            .insights
            .as_ref()
            .map(|i| (i.highlights.clone(), i.tags.clone()))
            .unwrap_or_default();

        Self {
            id: m.id.to_string(),
            date: m.date.clone(),
            status: m.status,
            home: m.teams.home.label("Team A").to_string(),
            away: m.teams.away.label("Team B").to_string(),
            score: m.score.clone(),
            winner: m.result.winner.to_string(),
            margin: m.result.margin.clone(),
            highlights,
            tags,
        }
    }
}
