use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub user_id: i32,
    pub name: String,
    pub experience: i32,
    pub education: Option<String>,
    pub ideal_company: Option<String>,
    /// SOC code last chosen through tag matching.
    pub tag_code: Option<String>,
}

/// Sign-up payload; `user_id` is assigned by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub experience: i32,
    pub education: Option<String>,
    pub ideal_company: Option<String>,
}
