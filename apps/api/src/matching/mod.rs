// Job matching: tag, ideal-company and course-enrollment paths.
// Every path reads raw postings through the store and collapses them with the
// shared aggregation in `aggregate`.

pub mod aggregate;
pub mod company;
pub mod enrollment;
pub mod handlers;
pub mod tag;

use tracing::{error, warn};

use crate::errors::AppError;
use crate::store::MatchTx;

/// Commits on success; on failure rolls back explicitly before returning the
/// original error.
pub(crate) async fn finish<T>(
    tx: Box<dyn MatchTx>,
    result: Result<T, AppError>,
    operation: &str,
    user_id: i32,
) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            error!("{operation} failed for user {user_id}, rolling back: {e}");
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback of {operation} for user {user_id} failed: {rollback_err}");
            }
            Err(e)
        }
    }
}

pub(crate) fn user_not_found(user_id: i32) -> AppError {
    AppError::NotFound(format!("User {user_id} not found"))
}
