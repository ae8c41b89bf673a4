use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::recommender::recommend;

use super::AppState;

/// Smallest and largest accepted recommendation counts; out-of-range
/// requests are clamped, not rejected.
const MIN_RECOMMENDATIONS: i64 = 1;
const MAX_RECOMMENDATIONS: i64 = 100;
const DEFAULT_RECOMMENDATIONS: usize = 10;

// Request/Response types

/// Raw query parameters of a recommendation request. Everything arrives as
/// strings and is validated during normalization.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub user_id: Option<String>,
    pub num_recommendations: Option<String>,
    pub exclude_seen: Option<String>,
}

/// JSON-body variant of the same parameters. `user_id` may be a JSON number
/// or a string; `exclude_seen` is a native boolean here.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationBody {
    pub user_id: Option<Value>,
    pub num_recommendations: Option<Value>,
    pub exclude_seen: Option<bool>,
}

/// Fully validated parameters handed to the recommender core.
#[derive(Debug, PartialEq, Eq)]
struct RecommendationParams {
    user_id: String,
    count: usize,
    exclude_seen: bool,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub user_id: String,
    /// Localized known-user indicator: "Oui" for known, "Non" for unknown.
    pub user_known: String,
    pub num_recommendations: usize,
    pub recommendations: Vec<String>,
}

// Parameter normalization

/// Canonicalizes an external user identifier. Numeric identifiers are
/// coerced through an integer so "007" and "7" name the same trained user;
/// non-numeric identifiers pass through untouched.
fn normalize_user_id(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| trimmed.to_string())
}

fn clamp_count(count: i64) -> usize {
    count.clamp(MIN_RECOMMENDATIONS, MAX_RECOMMENDATIONS) as usize
}

fn parse_count(raw: &str) -> AppResult<usize> {
    raw.trim()
        .parse::<i64>()
        .map(clamp_count)
        .map_err(|_| AppError::InvalidParameter(format!("num_recommendations: {raw:?}")))
}

fn parse_exclude_seen(raw: &str) -> AppResult<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(AppError::InvalidParameter(format!("exclude_seen: {raw:?}")))
    }
}

fn user_id_from_value(value: &Value) -> AppResult<String> {
    match value {
        Value::String(s) => Ok(normalize_user_id(s)),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(AppError::InvalidParameter(format!("user_id: {other}"))),
    }
}

fn count_from_value(value: &Value) -> AppResult<usize> {
    value
        .as_i64()
        .map(clamp_count)
        .ok_or_else(|| AppError::InvalidParameter(format!("num_recommendations: {value}")))
}

/// Merges query parameters with an optional JSON body into validated
/// parameters. Query values win when both carry the same field; defaults are
/// 10 recommendations with seen items excluded.
fn normalize_params(
    query: RecommendationQuery,
    body: Option<RecommendationBody>,
) -> AppResult<RecommendationParams> {
    let body = body.unwrap_or_default();

    let user_id = match query.user_id.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => normalize_user_id(raw),
        None => match &body.user_id {
            Some(value) => user_id_from_value(value)?,
            None => return Err(AppError::MissingParameter("user_id")),
        },
    };

    let count = match (&query.num_recommendations, &body.num_recommendations) {
        (Some(raw), _) => parse_count(raw)?,
        (None, Some(value)) => count_from_value(value)?,
        (None, None) => DEFAULT_RECOMMENDATIONS,
    };

    let exclude_seen = match (&query.exclude_seen, body.exclude_seen) {
        (Some(raw), _) => parse_exclude_seen(raw)?,
        (None, Some(flag)) => flag,
        (None, None) => true,
    };

    Ok(RecommendationParams {
        user_id,
        count,
        exclude_seen,
    })
}

// Handlers

/// Serves the exploration form
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

/// Health check endpoint; reports healthy regardless of model load state
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Recommendation service is running",
        "architecture": "axum HTTP API + blob-storage model loading",
    }))
}

/// GET /recommendations with query parameters
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    run_recommendation(&state, normalize_params(query, None)?)
}

/// POST /recommendations with query parameters and/or a JSON body
pub async fn post_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
    body: Option<Json<RecommendationBody>>,
) -> AppResult<Json<RecommendationResponse>> {
    let body = body.map(|Json(b)| b);
    run_recommendation(&state, normalize_params(query, body)?)
}

fn run_recommendation(
    state: &AppState,
    params: RecommendationParams,
) -> AppResult<Json<RecommendationResponse>> {
    let model = state.model()?;
    let result = recommend(model, &params.user_id, params.count, params.exclude_seen)?;

    tracing::info!(
        user_id = %params.user_id,
        user_known = result.user_known,
        returned = result.items.len(),
        requested = params.count,
        "Generated recommendations"
    );

    Ok(Json(RecommendationResponse {
        user_id: params.user_id,
        user_known: if result.user_known { "Oui" } else { "Non" }.to_string(),
        num_recommendations: result.items.len(),
        recommendations: result.items,
    }))
}
