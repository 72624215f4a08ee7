use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the SOC occupation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SocRow {
    #[serde(rename = "code")]
    pub soc_code: String,
    pub name: String,
    pub related_experience: Option<String>,
    pub knowledge: Option<String>,
    pub ability: Option<String>,
}

/// Course picker entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CourseSummary {
    #[serde(rename = "CRN")]
    pub crn: String,
    #[serde(rename = "CourseName")]
    pub course_name: String,
}

/// Skill linkage between a course and an occupation code.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SkillMatchRow {
    pub crn: String,
    pub soc_code: String,
    pub skill1: Option<String>,
    pub skill2: Option<String>,
}

impl SkillMatchRow {
    /// Number of non-blank skill slots (0–2).
    pub fn matched_skills(&self) -> usize {
        [&self.skill1, &self.skill2]
            .into_iter()
            .filter(|s| s.as_deref().is_some_and(|v| !v.trim().is_empty()))
            .count()
    }
}
