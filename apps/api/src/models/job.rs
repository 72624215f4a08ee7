use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One raw posting row as read along a matching join path.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct JobPostingRow {
    pub job_id: i64,
    pub role: String,
    pub avg_experience: Option<f64>,
    pub qualification: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub job_type: Option<String>,
    pub preference: Option<String>,
    pub benefits: Option<String>,
    pub company_name: Option<String>,
}

/// One or more postings collapsed by grouping key.
///
/// Serialized with a single camelCase casing; `job_type` goes out as `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedJob {
    pub job_id: i64,
    pub role: String,
    pub avg_experience: Option<f64>,
    pub qualification: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub preference: Option<String>,
    pub benefits: Option<String>,
    pub company_name: Option<String>,
}
