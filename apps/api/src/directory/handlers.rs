use axum::{
    extract::{Path, State},
    Json,
};

use crate::directory::repo;
use crate::errors::AppError;
use crate::models::company::{Company, CompanyName};
use crate::state::AppState;

/// GET /api/comsel/industries
pub async fn handle_industries(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(repo::list_industries(&state.db).await?))
}

/// GET /api/comsel/:industry
pub async fn handle_companies_by_industry(
    State(state): State<AppState>,
    Path(industry): Path<String>,
) -> Result<Json<Vec<CompanyName>>, AppError> {
    let industry = non_blank(&industry, "Industry is required")?;
    Ok(Json(repo::companies_by_industry(&state.db, industry).await?))
}

/// GET /api/comsel/company/:name
pub async fn handle_company(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Company>, AppError> {
    let name = non_blank(&name, "Company name is required")?;
    Ok(Json(repo::company_by_name(&state.db, name).await?))
}

fn non_blank<'a>(value: &'a str, message: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidParameters(message.to_string()));
    }
    Ok(value)
}
