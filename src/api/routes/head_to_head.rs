use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::insights::compute_head_to_head_with_recent;
use crate::models::TeamId;

use super::MatchSummary;

#[derive(Debug, Deserialize)]
pub struct HeadToHeadParams {
    pub team_a: Option<String>,
    pub team_b: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadResponse {
    pub team_a: String,
    pub team_b: String,
    pub total: u32,
    pub a_wins: u32,
    pub b_wins: u32,
    pub draws: u32,
    pub avg_score_a: u32,
    pub avg_score_b: u32,
    pub recent: Vec<MatchSummary>,
}

fn required(name: &str, value: Option<String>) -> Result<TeamId, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(TeamId::from)
        .ok_or_else(|| ApiError::BadRequest(format!("Missing query parameter: {}", name)))
}

pub async fn get_head_to_head(
    State(state): State<AppState>,
    Query(params): Query<HeadToHeadParams>,
) -> Result<Json<HeadToHeadResponse>, ApiError> {
    let team_a = required("team_a", params.team_a)?;
    let team_b = required("team_b", params.team_b)?;
    if team_a == team_b {
        return Err(ApiError::BadRequest(
            "team_a and team_b must differ".to_string(),
        ));
    }

    let all = state.analyzed_matches().await?;
    let h2h = compute_head_to_head_with_recent(
        &team_a,
        &team_b,
        &all,
        state.config.insights.recent_meetings,
    );

    Ok(Json(HeadToHeadResponse {
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        total: h2h.total,
        a_wins: h2h.a_wins,
        b_wins: h2h.b_wins,
        draws: h2h.draws,
        avg_score_a: h2h.avg_score_a,
        avg_score_b: h2h.avg_score_b,
        recent: h2h.recent.into_iter().map(MatchSummary::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::AppConfig;
    use crate::models::{InningsScore, Match, MatchStatus, Team};
    use crate::storage::{JsonlWriter, StorageConfig};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn meeting(id: &str, home: &str, away: &str, runs: (u32, u32), winner: &str) -> Match {
        let team = |t: &str| Team {
            id: t.into(),
            name: t.to_string(),
            ..Team::default()
        };
        let mut m = Match::new(id, MatchStatus::Completed, team(home), team(away));
        m.score.home = InningsScore::new(runs.0, 8, 20.0);
        m.score.away = InningsScore::new(runs.1, 8, 20.0);
        m.result.winner = winner.into();
        m
    }

    fn setup_test_state(dir: &std::path::Path) -> AppState {
        let storage = StorageConfig::new(dir.to_path_buf());
        JsonlWriter::new(storage.matches_path())
            .write_all(&[
                meeting("1", "MI", "CSK", (170, 160), "MI"),
                meeting("2", "CSK", "MI", (155, 156), "MI"),
                meeting("3", "MI", "CSK", (140, 145), "CSK"),
                meeting("4", "MI", "RCB", (200, 120), "MI"),
            ])
            .unwrap();
        AppState::new(storage, AppConfig::default())
    }

    #[tokio::test]
    async fn test_head_to_head() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/head-to-head?team_a=MI&team_b=CSK").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 3);
        assert_eq!(json["aWins"], 2);
        assert_eq!(json["bWins"], 1);
        assert_eq!(json["draws"], 0);
        // MI: 170 + 156 + 140 = 466 over 3.
        assert_eq!(json["avgScoreA"], 155);
        // CSK: 160 + 155 + 145 = 460 over 3.
        assert_eq!(json["avgScoreB"], 153);
        assert_eq!(json["recent"][0]["id"], "3");
    }

    #[tokio::test]
    async fn test_head_to_head_requires_both_teams() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(build_router(state.clone()), "/api/head-to-head?team_a=MI").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let (status, _) =
            get_json(build_router(state), "/api/head-to-head?team_a=MI&team_b=MI").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
