use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::errors::AppError;
use crate::models::catalog::{CourseSummary, SkillMatchRow, SocRow};
use crate::models::job::JobPostingRow;
use crate::models::user::UserAccount;
use crate::store::{MatchStore, MatchTx};

const POSTING_COLUMNS: &str = "j.job_id, j.role, j.avg_experience, j.qualification, \
     j.min_salary, j.max_salary, j.job_type, j.preference, j.benefits, j.company_name";

const USER_COLUMNS: &str = "user_id, name, experience, education, ideal_company, tag_code";

/// Requests reach SQL already validated, so whatever the database rejects here
/// is reported as a storage fault.
fn storage_fault(e: sqlx::Error) -> AppError {
    AppError::Persistence(e.to_string())
}

/// Postgres-backed matching store sharing the application pool.
#[derive(Clone)]
pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn begin(&self) -> Result<Box<dyn MatchTx>, AppError> {
        let tx = self.pool.begin().await.map_err(storage_fault)?;
        Ok(Box::new(PgMatchTx { tx }))
    }

    async fn soc_codes_with_prefix(&self, prefix: &str) -> Result<Vec<SocRow>, AppError> {
        sqlx::query_as::<_, SocRow>(
            r#"
            SELECT soc_code, name, related_experience, knowledge, ability
            FROM soc
            WHERE soc_code LIKE $1 || '%'
            ORDER BY soc_code
            "#,
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_fault)
    }

    async fn courses(&self) -> Result<Vec<CourseSummary>, AppError> {
        sqlx::query_as::<_, CourseSummary>("SELECT crn, course_name FROM course_info ORDER BY crn")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_fault)
    }
}

pub struct PgMatchTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl MatchTx for PgMatchTx {
    async fn find_user(&mut self, user_id: i32) -> Result<Option<UserAccount>, AppError> {
        sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {USER_COLUMNS} FROM user_account WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(storage_fault)
    }

    async fn lock_user(&mut self, user_id: i32) -> Result<Option<UserAccount>, AppError> {
        sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {USER_COLUMNS} FROM user_account WHERE user_id = $1 FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(storage_fault)
    }

    async fn set_tag_code(&mut self, user_id: i32, tag_code: &str) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE user_account SET tag_code = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(tag_code)
            .execute(&mut *self.tx)
            .await
            .map_err(storage_fault)?;
        Ok(result.rows_affected())
    }

    async fn clear_enrollment(&mut self, user_id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM enrollment WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *self.tx)
            .await
            .map_err(storage_fault)?;
        Ok(result.rows_affected())
    }

    async fn enroll(&mut self, user_id: i32, crn: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO enrollment (user_id, crn) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(crn)
        .execute(&mut *self.tx)
        .await
        .map_err(storage_fault)?;
        Ok(result.rows_affected() == 1)
    }

    async fn enrolled_skill_rows(&mut self, user_id: i32) -> Result<Vec<SkillMatchRow>, AppError> {
        sqlx::query_as::<_, SkillMatchRow>(
            r#"
            SELECT s.crn, s.soc_code, s.skill1, s.skill2
            FROM skill_matching s
            JOIN enrollment e ON e.crn = s.crn
            WHERE e.user_id = $1
            ORDER BY s.soc_code, s.crn
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(storage_fault)
    }

    async fn postings_for_soc_codes(
        &mut self,
        soc_codes: &[String],
    ) -> Result<Vec<JobPostingRow>, AppError> {
        sqlx::query_as::<_, JobPostingRow>(&format!(
            r#"
            SELECT {POSTING_COLUMNS}
            FROM job j
            JOIN positions p ON p.role = j.role
            WHERE j.role IN (
                SELECT a.alter_title FROM alter_table a WHERE a.soc_code = ANY($1)
            )
            "#
        ))
        .bind(soc_codes)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(storage_fault)
    }

    async fn postings_at_company(
        &mut self,
        company: &str,
    ) -> Result<Vec<JobPostingRow>, AppError> {
        sqlx::query_as::<_, JobPostingRow>(&format!(
            r#"
            SELECT {POSTING_COLUMNS}
            FROM job j
            JOIN positions p ON p.role = j.role
            WHERE j.company_name = $1
            "#
        ))
        .bind(company)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(storage_fault)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await.map_err(storage_fault)
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        self.tx.rollback().await.map_err(storage_fault)
    }
}
