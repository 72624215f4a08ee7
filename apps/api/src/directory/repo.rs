use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::company::{Company, CompanyName};

pub async fn list_industries(pool: &PgPool) -> Result<Vec<String>, AppError> {
    Ok(sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT industry FROM company WHERE industry IS NOT NULL ORDER BY industry",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn companies_by_industry(
    pool: &PgPool,
    industry: &str,
) -> Result<Vec<CompanyName>, AppError> {
    Ok(sqlx::query_as::<_, CompanyName>(
        "SELECT name FROM company WHERE industry = $1 ORDER BY name",
    )
    .bind(industry)
    .fetch_all(pool)
    .await?)
}

pub async fn company_by_name(pool: &PgPool, name: &str) -> Result<Company, AppError> {
    sqlx::query_as::<_, Company>(
        "SELECT name, size, ceo, industry, website FROM company WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Company with name \"{name}\" not found")))
}
