use tracing::info;

use crate::errors::AppError;
use crate::matching::aggregate::{aggregate_postings, CompanyColumn};
use crate::matching::{finish, user_not_found};
use crate::models::job::AggregatedJob;
use crate::store::{MatchStore, MatchTx};

/// Postings at the user's ideal company. Empty when the user has none.
pub async fn match_by_company(
    store: &dyn MatchStore,
    user_id: i32,
) -> Result<Vec<AggregatedJob>, AppError> {
    let mut tx = store.begin().await?;
    let result = company_steps(tx.as_mut(), user_id).await;
    let jobs = finish(tx, result, "Company matching", user_id).await?;

    info!("Ideal company matched {} jobs for user {user_id}", jobs.len());
    Ok(jobs)
}

async fn company_steps(
    tx: &mut dyn MatchTx,
    user_id: i32,
) -> Result<Vec<AggregatedJob>, AppError> {
    let user = tx
        .find_user(user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    let company = match user.ideal_company.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => return Ok(Vec::new()),
    };

    let rows = tx.postings_at_company(&company).await?;
    Ok(aggregate_postings(rows, CompanyColumn::Grouped))
}
