use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{NewUser, UserAccount};

const MISSING_FIELDS: &str = "Missing required user fields";

/// Name, non-negative experience and an ideal company are mandatory on every
/// profile write.
pub fn require_profile_fields(
    name: &str,
    experience: i32,
    ideal_company: Option<&str>,
) -> Result<(), AppError> {
    let has_company = ideal_company.is_some_and(|c| !c.trim().is_empty());
    if name.trim().is_empty() || experience < 0 || !has_company {
        return Err(AppError::InvalidParameters(MISSING_FIELDS.to_string()));
    }
    Ok(())
}

/// Work experience may only grow.
pub fn check_experience_not_decreased(current: i32, requested: i32) -> Result<(), AppError> {
    if requested < current {
        return Err(AppError::InvalidParameters(
            "Work experience cannot be decreased".to_string(),
        ));
    }
    Ok(())
}

/// Unique index over the whole profile; see the schema migration.
const PROFILE_UNIQUE_INDEX: &str = "user_account_profile_uniq";

fn duplicate_profile() -> AppError {
    AppError::Conflict("User already exists with the same information".to_string())
}

/// Only a hit on the profile index means "same user again". Any other unique
/// violation is a storage fault.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db)
            if db.is_unique_violation() && db.constraint() == Some(PROFILE_UNIQUE_INDEX) =>
        {
            duplicate_profile()
        }
        _ => AppError::Database(e),
    }
}

async fn ensure_company_exists(
    conn: &mut sqlx::PgConnection,
    company: Option<&str>,
) -> Result<(), AppError> {
    let Some(company) = company else {
        return Ok(());
    };
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM company WHERE name = $1)")
            .bind(company)
            .fetch_one(&mut *conn)
            .await?;
    if !exists {
        return Err(AppError::InvalidParameters(format!(
            "Unknown company '{company}'"
        )));
    }
    Ok(())
}

/// Looks a user up by id and name together.
pub async fn find_user(pool: &PgPool, user_id: i32, name: &str) -> Result<UserAccount, AppError> {
    sqlx::query_as::<_, UserAccount>(
        r#"
        SELECT user_id, name, experience, education, ideal_company, tag_code
        FROM user_account
        WHERE user_id = $1 AND name = $2
        "#,
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Registers a profile and returns its id. An identical
/// (name, experience, ideal company, education) profile is a conflict.
///
/// The id is one past the current maximum. The table lock makes concurrent
/// sign-ups take turns while reads and enrollment row locks proceed.
pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<i32, AppError> {
    require_profile_fields(&user.name, user.experience, user.ideal_company.as_deref())?;

    let mut tx = pool.begin().await?;
    sqlx::query("LOCK TABLE user_account IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;
    ensure_company_exists(&mut tx, user.ideal_company.as_deref()).await?;

    let duplicate: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM user_account
            WHERE name = $1
              AND experience = $2
              AND ideal_company IS NOT DISTINCT FROM $3
              AND education IS NOT DISTINCT FROM $4
        )
        "#,
    )
    .bind(&user.name)
    .bind(user.experience)
    .bind(&user.ideal_company)
    .bind(&user.education)
    .fetch_one(&mut *tx)
    .await?;
    if duplicate {
        return Err(duplicate_profile());
    }

    let next_id: i32 =
        sqlx::query_scalar("SELECT COALESCE(MAX(user_id), 0) + 1 FROM user_account")
            .fetch_one(&mut *tx)
            .await?;

    let user_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO user_account (user_id, name, experience, ideal_company, education)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING user_id
        "#,
    )
    .bind(next_id)
    .bind(&user.name)
    .bind(user.experience)
    .bind(&user.ideal_company)
    .bind(&user.education)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_unique_violation)?;

    tx.commit().await?;
    info!("Created user {user_id}");
    Ok(user_id)
}

/// Overwrites the profile fields of an existing user. The stored tag code is
/// left alone.
pub async fn update_user(pool: &PgPool, user: &UserAccount) -> Result<(), AppError> {
    if user.user_id <= 0 {
        return Err(AppError::InvalidParameters(MISSING_FIELDS.to_string()));
    }
    require_profile_fields(&user.name, user.experience, user.ideal_company.as_deref())?;

    let mut tx = pool.begin().await?;
    let current: i32 =
        sqlx::query_scalar("SELECT experience FROM user_account WHERE user_id = $1 FOR UPDATE")
            .bind(user.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    check_experience_not_decreased(current, user.experience)?;
    ensure_company_exists(&mut tx, user.ideal_company.as_deref()).await?;

    sqlx::query(
        r#"
        UPDATE user_account
        SET name = $2, experience = $3, ideal_company = $4, education = $5
        WHERE user_id = $1
        "#,
    )
    .bind(user.user_id)
    .bind(&user.name)
    .bind(user.experience)
    .bind(&user.ideal_company)
    .bind(&user.education)
    .execute(&mut *tx)
    .await
    .map_err(map_unique_violation)?;

    tx.commit().await?;
    info!("Updated user {}", user.user_id);
    Ok(())
}

/// Deletes a user; enrollment rows go with it.
pub async fn delete_user(pool: &PgPool, user_id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM user_account WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    info!("Deleted user {user_id}");
    Ok(())
}
