//! Course-enrollment matching.
//!
//! Replaces the user's enrollment set, derives the occupation codes whose skill
//! coverage is met by the enrolled courses, and returns the reachable postings
//! ranked by average maximum salary. All of it is one transaction; the user row
//! is locked first so two requests for the same user never interleave.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::matching::aggregate::{aggregate_postings, rank_by_max_salary, CompanyColumn};
use crate::matching::{finish, user_not_found};
use crate::models::catalog::SkillMatchRow;
use crate::models::job::AggregatedJob;
use crate::store::{MatchStore, MatchTx};

/// Minimum number of non-blank skills an occupation code needs across the
/// enrolled courses.
pub const MIN_MATCHED_SKILLS: usize = 2;

pub async fn enroll_and_match(
    store: &dyn MatchStore,
    user_id: i32,
    crns: &[String],
) -> Result<Vec<AggregatedJob>, AppError> {
    if user_id <= 0 {
        return Err(AppError::InvalidParameters(
            "userId must be a positive integer".to_string(),
        ));
    }
    if crns.is_empty() {
        return Err(AppError::InvalidParameters(
            "crns must contain at least one course".to_string(),
        ));
    }

    let mut tx = store.begin().await?;
    let result = enrollment_steps(tx.as_mut(), user_id, crns).await;
    let jobs = finish(tx, result, "Enrollment matching", user_id).await?;

    info!(
        "Enrolled user {user_id} in {} courses, matched {} jobs",
        crns.len(),
        jobs.len()
    );
    Ok(jobs)
}

async fn enrollment_steps(
    tx: &mut dyn MatchTx,
    user_id: i32,
    crns: &[String],
) -> Result<Vec<AggregatedJob>, AppError> {
    tx.lock_user(user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    let removed = tx.clear_enrollment(user_id).await?;
    let mut inserted = 0usize;
    for crn in crns {
        if tx.enroll(user_id, crn).await? {
            inserted += 1;
        }
    }
    debug!("User {user_id}: removed {removed} enrollments, inserted {inserted}");

    let skill_rows = tx.enrolled_skill_rows(user_id).await?;
    let soc_codes = covered_soc_codes(&skill_rows, MIN_MATCHED_SKILLS);
    if soc_codes.is_empty() {
        return Ok(Vec::new());
    }
    debug!("User {user_id}: covered SOC codes {soc_codes:?}");

    let rows = tx.postings_for_soc_codes(&soc_codes).await?;
    let mut jobs = aggregate_postings(rows, CompanyColumn::Concatenated);
    rank_by_max_salary(&mut jobs);
    Ok(jobs)
}

/// Occupation codes whose total non-blank skill count across `rows` reaches
/// `min_skills`, sorted by code.
pub fn covered_soc_codes(rows: &[SkillMatchRow], min_skills: usize) -> Vec<String> {
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.soc_code.as_str()).or_default() += row.matched_skills();
    }
    totals
        .into_iter()
        .filter(|(_, count)| *count >= min_skills)
        .map(|(code, _)| code.to_string())
        .collect()
}
