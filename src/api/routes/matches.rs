use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::insights::{
    compute_fall_of_wickets, compute_momentum_data, find_related_matches, parse_match_date,
    sort_matches, summarize_for_thirty_seconds, MatchFilter, SortMode,
};
use crate::models::{AnalyzedMatch, FallOfWicket, MatchInsights, OverMomentum, Tag, TeamId};

use super::MatchSummary;

#[derive(Debug, Default, Deserialize)]
pub struct ListMatchesParams {
    pub sort: Option<String>,
    /// Comma-separated tag names
    pub tags: Option<String>,
    pub team: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub sort: SortMode,
    pub matches: Vec<MatchSummary>,
    pub pagination: PaginationMeta,
}

/// Parse a comma-separated tag list, rejecting unknown names.
pub fn parse_tags(raw: &str) -> Result<Vec<Tag>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<Tag>()
                .map_err(|_| ApiError::BadRequest(format!("Unknown tag: {}", t)))
        })
        .collect()
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<chrono::DateTime<chrono::Utc>>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_match_date(s)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid {} date: {}", name, s))),
    }
}

impl ListMatchesParams {
    fn filter(&self) -> Result<MatchFilter, ApiError> {
        Ok(MatchFilter {
            team: self.team.as_deref().map(TeamId::from),
            from: parse_bound("from", self.from.as_deref())?,
            to: parse_bound("to", self.to.as_deref())?,
            tags: self.tags.as_deref().map(parse_tags).transpose()?.unwrap_or_default(),
        })
    }
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListMatchesParams>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let filter = params.filter()?;
    let sort = params
        .sort
        .as_deref()
        .map(SortMode::from_name)
        .unwrap_or_default();

    let all = state.analyzed_matches().await?;
    let mut matches = filter.apply(&all);
    sort_matches(&mut matches, sort);
    debug!("Listing {} of {} matches sorted by {}", matches.len(), all.len(), sort);

    let default_size = u32::try_from(state.config.insights.page_size).unwrap_or(u32::MAX);
    let pagination = Pagination::new(params.page, params.page_size, default_size);
    let meta = PaginationMeta::new(&pagination, matches.len() as u32);

    Ok(Json(MatchListResponse {
        sort,
        matches: pagination.slice(&matches).iter().map(MatchSummary::from).collect(),
        pagination: meta,
    }))
}

fn find<'a>(all: &'a [AnalyzedMatch], id: &str) -> Result<&'a AnalyzedMatch, ApiError> {
    all.iter()
        .find(|m| m.record.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("Match not found: {}", id)))
}

pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalyzedMatch>, ApiError> {
    let all = state.analyzed_matches().await?;
    Ok(Json(find(&all, &id)?.clone()))
}

pub async fn get_insights(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MatchInsights>, ApiError> {
    let all = state.analyzed_matches().await?;
    let m = find(&all, &id)?;
    m.insights
        .clone()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No insights for match {}: not completed", id)))
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub id: String,
    pub lines: Vec<String>,
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let all = state.analyzed_matches().await?;
    let m = find(&all, &id)?;
    let lines = summarize_for_thirty_seconds(m)
        .ok_or_else(|| ApiError::NotFound(format!("No summary for match {}: not completed", id)))?;
    Ok(Json(SummaryResponse { id, lines }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    pub id: String,
    pub fall_of_wickets: Vec<FallOfWicket>,
    pub momentum: Vec<OverMomentum>,
}

pub async fn get_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TimelineResponse>, ApiError> {
    let all = state.analyzed_matches().await?;
    let balls = &find(&all, &id)?.record.balls;
    Ok(Json(TimelineResponse {
        fall_of_wickets: compute_fall_of_wickets(balls),
        momentum: compute_momentum_data(balls),
        id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RelatedParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RelatedResponse {
    pub id: String,
    pub related: Vec<MatchSummary>,
}

pub async fn get_related(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RelatedParams>,
) -> Result<Json<RelatedResponse>, ApiError> {
    let all = state.analyzed_matches().await?;
    let target = find(&all, &id)?;
    let limit = params.limit.unwrap_or(state.config.insights.related_limit);

    let related = find_related_matches(&target.record, &all, limit)
        .into_iter()
        .map(MatchSummary::from)
        .collect();
    Ok(Json(RelatedResponse { id, related }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::AppConfig;
    use crate::models::{Ball, InningsScore, League, Match, MatchStatus, StandingsRow, Team};
    use crate::storage::StorageConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn write_jsonl<T: serde::Serialize>(path: &std::path::Path, items: &[T]) {
        let mut content = String::new();
        for item in items {
            content.push_str(&serde_json::to_string(item).unwrap());
            content.push('\n');
        }
        std::fs::write(path, content).unwrap();
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn team(id: &str, name: &str) -> Team {
        Team {
            id: id.into(),
            name: name.to_string(),
            ..Team::default()
        }
    }

    fn make_match(
        id: &str,
        date: &str,
        (home, away): (&str, &str),
        (home_runs, away_runs): (u32, u32),
        winner: &str,
        margin: &str,
    ) -> Match {
        let mut m = Match::new(
            id,
            MatchStatus::Completed,
            team(home, &format!("{} XI", home)),
            team(away, &format!("{} XI", away)),
        );
        m.date = date.to_string();
        m.league = League {
            id: "ipl".into(),
            name: "IPL".to_string(),
            season: "2024".to_string(),
        };
        m.score.home = InningsScore::new(home_runs, 6, 20.0);
        m.score.away = InningsScore::new(away_runs, 6, 19.4);
        m.result.winner = winner.into();
        m.result.margin = margin.to_string();
        m
    }

    fn setup_test_state(dir: &std::path::Path) -> AppState {
        let storage = StorageConfig::new(dir.to_path_buf());

        let mut chase = make_match("1", "2024-04-02T14:00:00Z", ("H", "A"), (180, 182), "A", "4 wickets");
        chase.balls = vec![
            Ball::new(0, 4, 0).with_ball(1),
            Ball::new(1, 0, 1).with_ball(3).with_batsman("Opener"),
            Ball::new(17, 18, 0).with_ball(2),
        ];
        let defended = make_match("2", "2024-04-05T14:00:00Z", ("A", "H"), (150, 140), "A", "10 runs");
        let rout = make_match("3", "2024-04-09T14:00:00Z", ("H", "C"), (210, 120), "H", "90 runs");
        let mut upcoming = make_match("4", "2024-05-01T14:00:00Z", ("A", "C"), (0, 0), "", "");
        upcoming.status = MatchStatus::Upcoming;

        write_jsonl(&storage.matches_path(), &[chase, defended, rout, upcoming]);
        write_jsonl(
            &storage.standings_path(),
            &[
                StandingsRow::new("H", "H XI", 1),
                StandingsRow::new("C", "C XI", 2),
                StandingsRow::new("A", "A XI", 7),
            ],
        );

        AppState::new(storage, AppConfig::default())
    }

    #[tokio::test]
    async fn test_health() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));
        let (status, json) = get_json(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_matches_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/matches").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = json["matches"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["4", "3", "2", "1"]);
        assert_eq!(json["pagination"]["totalItems"], 4);
        assert_eq!(json["sort"], "newest");
    }

    #[tokio::test]
    async fn test_list_matches_sort_and_tags() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (_, json) = get_json(build_router(state.clone()), "/api/matches?sort=closest").await;
        let ids: Vec<&str> = json["matches"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_str().unwrap())
            .collect();
        // 10 runs, 4 wickets (40), 90 runs, then the unanalyzed fixture.
        assert_eq!(ids, vec!["2", "1", "3", "4"]);

        let (_, json) = get_json(build_router(state.clone()), "/api/matches?tags=chase,upset").await;
        let matches = json["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["id"], "1");

        let (_, json) = get_json(build_router(state), "/api/matches?tags=dominant&team=C").await;
        assert_eq!(json["matches"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_matches_date_range_and_paging() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (_, json) = get_json(
            build_router(state.clone()),
            "/api/matches?from=2024-04-03&to=2024-04-30",
        )
        .await;
        assert_eq!(json["matches"].as_array().unwrap().len(), 2);

        let (_, json) = get_json(build_router(state), "/api/matches?page=2&page_size=3").await;
        assert_eq!(json["matches"].as_array().unwrap().len(), 1);
        assert_eq!(json["pagination"]["hasPrev"], true);
        assert_eq!(json["pagination"]["hasNext"], false);
    }

    #[tokio::test]
    async fn test_list_matches_rejects_bad_input() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(build_router(state.clone()), "/api/matches?tags=boring").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let (status, _) = get_json(build_router(state), "/api/matches?from=yesterday").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_match_and_insights() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(build_router(state.clone()), "/api/matches/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "1");
        assert_eq!(json["insights"]["finishType"], "standard");

        let (status, json) = get_json(build_router(state.clone()), "/api/matches/1/insights").await;
        assert_eq!(status, StatusCode::OK);
        let tags: Vec<&str> = json["tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_str().unwrap())
            .collect();
        assert!(tags.contains(&"chase"));
        assert!(tags.contains(&"upset"));

        let (status, _) = get_json(build_router(state.clone()), "/api/matches/4/insights").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, json) = get_json(build_router(state), "/api/matches/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(build_router(state.clone()), "/api/matches/1/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["lines"][0], "H XI posted 180/6. A XI replied with 182/6.");

        let (status, _) = get_json(build_router(state), "/api/matches/4/summary").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_timeline() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/matches/1/timeline").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["fallOfWickets"][0]["runs"], 4);
        assert_eq!(json["fallOfWickets"][0]["batsmanName"], "Opener");
        assert_eq!(json["momentum"].as_array().unwrap().len(), 3);
        assert_eq!(json["momentum"][2]["phase"], "death");
    }

    #[tokio::test]
    async fn test_get_related() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(build_router(state.clone()), "/api/matches/1/related").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = json["related"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_str().unwrap())
            .collect();
        // Same pair first, then the shared-team match; upcoming is never eligible.
        assert_eq!(ids, vec!["2", "3"]);

        let (_, json) = get_json(build_router(state), "/api/matches/1/related?limit=1").await;
        assert_eq!(json["related"].as_array().unwrap().len(), 1);
    }
}
