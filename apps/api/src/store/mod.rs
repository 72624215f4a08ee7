//! Storage seam for the matching layer.
//!
//! `AppState` carries an `Arc<dyn MatchStore>`. Production uses
//! [`postgres::PgMatchStore`]; tests use the in-memory store.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::catalog::{CourseSummary, SkillMatchRow, SocRow};
use crate::models::job::JobPostingRow;
use crate::models::user::UserAccount;

#[async_trait]
pub trait MatchStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Opens a unit of work. Dropping it without `commit` rolls it back.
    async fn begin(&self) -> Result<Box<dyn MatchTx>, AppError>;

    /// SOC rows whose code starts with `prefix`, ordered by code.
    async fn soc_codes_with_prefix(&self, prefix: &str) -> Result<Vec<SocRow>, AppError>;

    async fn courses(&self) -> Result<Vec<CourseSummary>, AppError>;
}

/// Operations available inside one transaction.
#[async_trait]
pub trait MatchTx: Send {
    async fn find_user(&mut self, user_id: i32) -> Result<Option<UserAccount>, AppError>;

    /// Like `find_user`, but holds a row lock until the transaction ends so
    /// writers for the same user serialize.
    async fn lock_user(&mut self, user_id: i32) -> Result<Option<UserAccount>, AppError>;

    /// Returns the number of rows updated (0 when the user does not exist).
    async fn set_tag_code(&mut self, user_id: i32, tag_code: &str) -> Result<u64, AppError>;

    async fn clear_enrollment(&mut self, user_id: i32) -> Result<u64, AppError>;

    /// Returns `false` when the (user, crn) pair was already present.
    async fn enroll(&mut self, user_id: i32, crn: &str) -> Result<bool, AppError>;

    /// Skill-matching rows for every course the user is enrolled in.
    async fn enrolled_skill_rows(&mut self, user_id: i32) -> Result<Vec<SkillMatchRow>, AppError>;

    /// Postings whose role is an alternate title of any of `soc_codes` and is a
    /// known position.
    async fn postings_for_soc_codes(
        &mut self,
        soc_codes: &[String],
    ) -> Result<Vec<JobPostingRow>, AppError>;

    /// Postings at `company` whose role is a known position.
    async fn postings_at_company(&mut self, company: &str)
        -> Result<Vec<JobPostingRow>, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}
