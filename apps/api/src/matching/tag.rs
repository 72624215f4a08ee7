use tracing::info;

use crate::errors::AppError;
use crate::matching::aggregate::{aggregate_postings, CompanyColumn};
use crate::matching::{finish, user_not_found};
use crate::models::job::AggregatedJob;
use crate::store::{MatchStore, MatchTx};
use crate::taxonomy::soc_code::SocCode;

/// Stores `tag` as the user's tag code, then returns the postings reachable
/// from it through the alternate-title table.
///
/// The write happens first and exactly once, whether or not any posting
/// matches. Both steps share one transaction.
pub async fn match_by_tag(
    store: &dyn MatchStore,
    user_id: i32,
    tag: SocCode,
) -> Result<Vec<AggregatedJob>, AppError> {
    let tag_code = tag.to_string();
    let mut tx = store.begin().await?;
    let result = tag_steps(tx.as_mut(), user_id, &tag_code).await;
    let jobs = finish(tx, result, "Tag matching", user_id).await?;

    info!(
        "Tag {tag_code} matched {} jobs for user {user_id}",
        jobs.len()
    );
    Ok(jobs)
}

async fn tag_steps(
    tx: &mut dyn MatchTx,
    user_id: i32,
    tag_code: &str,
) -> Result<Vec<AggregatedJob>, AppError> {
    if tx.set_tag_code(user_id, tag_code).await? == 0 {
        return Err(user_not_found(user_id));
    }

    let rows = tx.postings_for_soc_codes(&[tag_code.to_string()]).await?;
    Ok(aggregate_postings(rows, CompanyColumn::Concatenated))
}
