//! Axum route handlers for the find-job API.
//!
//! Handlers only validate request shape and delegate; every parameter error is
//! reported before the store is touched.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::matching::company::match_by_company;
use crate::matching::enrollment::enroll_and_match;
use crate::matching::tag::match_by_tag;
use crate::models::catalog::{CourseSummary, SocRow};
use crate::models::job::AggregatedJob;
use crate::state::AppState;
use crate::taxonomy::resolver::resolve;
use crate::taxonomy::soc_code::SocCode;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TagQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "tagName")]
    pub tag_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SocDetailsQuery {
    pub level: Option<String>,
    #[serde(rename = "InputSoc")]
    pub input_soc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Body of the enrollment request. Kept loosely typed so shape errors surface
/// as `InvalidParameters` instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<Value>,
    pub crns: Option<Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/findjob/tagname-to-job
pub async fn handle_tag_to_jobs(
    State(state): State<AppState>,
    Query(params): Query<TagQuery>,
) -> Result<Json<Vec<AggregatedJob>>, AppError> {
    let user_id = parse_user_id(params.user_id.as_deref())?;
    let tag_name = params
        .tag_name
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::InvalidParameters("userId and tagName are required parameters".to_string())
        })?;
    let tag: SocCode = tag_name.parse()?;

    let jobs = match_by_tag(state.store.as_ref(), user_id, tag).await?;
    Ok(Json(jobs))
}

/// GET /api/findjob/soc-details
pub async fn handle_soc_details(
    State(state): State<AppState>,
    Query(params): Query<SocDetailsQuery>,
) -> Result<Json<Vec<SocRow>>, AppError> {
    let level = params
        .level
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| AppError::InvalidParameters("level is a required parameter".to_string()))?
        .parse::<i64>()
        .map_err(|_| AppError::InvalidParameters("level must be an integer".to_string()))?;

    let rows = resolve(state.store.as_ref(), level, params.input_soc.as_deref()).await?;
    Ok(Json(rows))
}

/// GET /api/findjob/company-jobs
pub async fn handle_company_jobs(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Vec<AggregatedJob>>, AppError> {
    let user_id = parse_user_id(params.user_id.as_deref())?;
    let jobs = match_by_company(state.store.as_ref(), user_id).await?;
    Ok(Json(jobs))
}

/// GET /api/findjob/courses
pub async fn handle_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    Ok(Json(state.store.courses().await?))
}

/// POST /api/findjob/enroll-and-fetch-jobs
pub async fn handle_enroll_and_fetch(
    State(state): State<AppState>,
    payload: Result<Json<EnrollRequest>, JsonRejection>,
) -> Result<Json<Vec<AggregatedJob>>, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::InvalidParameters(format!("Invalid request body: {e}")))?;

    let user_id = match &request.user_id {
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .filter(|v| *v > 0)
            .ok_or_else(invalid_enroll_body)?,
        Some(Value::String(s)) => parse_user_id(Some(s)).map_err(|_| invalid_enroll_body())?,
        _ => return Err(invalid_enroll_body()),
    };
    let crns = parse_crns(request.crns.as_ref())?;

    let jobs = enroll_and_match(state.store.as_ref(), user_id, &crns).await?;
    Ok(Json(jobs))
}

// ────────────────────────────────────────────────────────────────────────────
// Parameter parsing
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn parse_user_id(raw: Option<&str>) -> Result<i32, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidParameters("userId is a required parameter".to_string()))?;
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidParameters(format!("Invalid userId '{raw}'")))
}

fn parse_crns(raw: Option<&Value>) -> Result<Vec<String>, AppError> {
    let items = match raw {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(invalid_enroll_body()),
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(invalid_enroll_body()),
        })
        .collect()
}

fn invalid_enroll_body() -> AppError {
    AppError::InvalidParameters("userId and crns (array) are required parameters".to_string())
}
