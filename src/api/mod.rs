//! Read-only HTTP surface over the scoring engine.
//!
//! Persistence, auth and stat bookkeeping live upstream; these routes only
//! expose what the engine computes so the UI and the results job can call it.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::scoring::{
    DifficultyPreview, MatchOutcome, Prediction, ScoreTally, ScoringEngine, ScoringResult,
};
use crate::teams::CompetitorRanking;

#[derive(Clone)]
pub struct AppState {
    pub engine: ScoringEngine,
}

/// Build the Axum router for the preview API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/rankings", get(rankings_handler))
        .route("/api/team-groups", get(team_groups_handler))
        .route("/api/odds", get(odds_handler))
        .route("/api/scoring", post(scoring_handler))
        .route("/api/scoring/batch", post(batch_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Deserialize)]
pub struct RankingsQuery {
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RankingsView {
    pub label: String,
    pub effective_from: NaiveDate,
    pub teams: Vec<CompetitorRanking>,
}

#[derive(Debug, Deserialize)]
pub struct OddsQuery {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub result: MatchOutcome,
    pub prediction: Prediction,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub result: MatchOutcome,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<ScoringResult>,
    pub tally: ScoreTally,
}

async fn health_handler() -> &'static str {
    "ok"
}

/// GET /api/rankings?as_of=2025-10-01
async fn rankings_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RankingsQuery>,
) -> Json<RankingsView> {
    let store = state.engine.rankings();
    let table = match q.as_of {
        Some(date) => store.active_on(date),
        None => store.current(),
    };
    Json(RankingsView {
        label: table.label().to_string(),
        effective_from: table.effective_from(),
        teams: table.teams().to_vec(),
    })
}

/// GET /api/team-groups
async fn team_groups_handler(
    State(state): State<Arc<AppState>>,
) -> Json<BTreeMap<String, Vec<CompetitorRanking>>> {
    let table = state.engine.rankings().current();
    let groups = (1..=crate::teams::WEAKEST_TIER)
        .map(|tier| (format!("G{tier}"), table.tier_members(tier).cloned().collect()))
        .collect();
    Json(groups)
}

/// GET /api/odds?home_team=..&away_team=..&home_goals=2&away_goals=1
async fn odds_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<OddsQuery>,
) -> Result<Json<DifficultyPreview>, (StatusCode, String)> {
    require_teams(&q.home_team, &q.away_team)?;
    Ok(Json(state.engine.classify_difficulty(
        &q.home_team,
        &q.away_team,
        q.home_goals,
        q.away_goals,
    )))
}

/// POST /api/scoring
async fn scoring_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoringResult>, (StatusCode, String)> {
    require_teams(&req.result.home_team, &req.result.away_team)?;
    Ok(Json(state.engine.score(&req.result, &req.prediction)))
}

/// POST /api/scoring/batch
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, (StatusCode, String)> {
    require_teams(&req.result.home_team, &req.result.away_team)?;
    let (results, tally) = state.engine.score_batch(&req.result, &req.predictions);
    Ok(Json(BatchResponse { results, tally }))
}

fn require_teams(home: &str, away: &str) -> Result<(), (StatusCode, String)> {
    if home.trim().is_empty() || away.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "home and away team names are required".to_string(),
        ));
    }
    Ok(())
}
