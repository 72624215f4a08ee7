use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::matching::handlers::parse_user_id;
use crate::models::user::{NewUser, UserAccount};
use crate::profile::repo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub name: Option<String>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|_| AppError::InvalidParameters("Missing required user fields".to_string()))
}

/// GET /api/login
pub async fn handle_get_user(
    State(state): State<AppState>,
    Query(params): Query<LoginQuery>,
) -> Result<Json<UserAccount>, AppError> {
    let user_id = parse_user_id(params.user_id.as_deref())?;
    let name = params
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::InvalidParameters("Invalid or missing userId or name".to_string()))?;

    Ok(Json(repo::find_user(&state.db, user_id, name).await?))
}

/// POST /api/login/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user = body(payload)?;
    let user_id = repo::create_user(&state.db, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "userId": user_id })),
    ))
}

/// PUT /api/login/update
pub async fn handle_update(
    State(state): State<AppState>,
    payload: Result<Json<UserAccount>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let user = body(payload)?;
    repo::update_user(&state.db, &user).await?;
    Ok(Json(json!({ "message": "User updated successfully" })))
}

/// DELETE /api/login/delete/:userId
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user_id = parse_user_id(Some(&user_id))?;
    repo::delete_user(&state.db, user_id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
