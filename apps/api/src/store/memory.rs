//! In-memory `MatchStore` for tests.
//!
//! A transaction takes the store-wide lock and works on a copy of the tables;
//! `commit` writes the copy back, anything else discards it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::errors::AppError;
use crate::models::catalog::{CourseSummary, SkillMatchRow, SocRow};
use crate::models::job::JobPostingRow;
use crate::models::user::UserAccount;
use crate::store::{MatchStore, MatchTx};

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: BTreeMap<i32, UserAccount>,
    pub courses: Vec<CourseSummary>,
    pub positions: BTreeSet<String>,
    pub soc: Vec<SocRow>,
    /// (soc_code, alter_title)
    pub alter_titles: Vec<(String, String)>,
    pub skill_matching: Vec<SkillMatchRow>,
    pub jobs: Vec<JobPostingRow>,
    /// (user_id, crn) in insertion order
    pub enrollment: Vec<(i32, String)>,
    pub tag_writes: usize,
}

impl Tables {
    pub fn enrolled_crns(&self, user_id: i32) -> Vec<String> {
        self.enrollment
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, crn)| crn.clone())
            .collect()
    }

    fn known_posting(&self, job: &JobPostingRow) -> bool {
        self.positions.contains(&job.role)
    }
}

/// Operation that fails with a storage error when reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    SkillRead,
    PostingRead,
}

pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_point: Option<FailPoint>,
}

impl MemoryStore {
    pub fn new(tables: Tables) -> Self {
        Self {
            tables: Arc::new(Mutex::new(tables)),
            fail_point: None,
        }
    }

    pub fn failing_at(mut self, fail_point: FailPoint) -> Self {
        self.fail_point = Some(fail_point);
        self
    }

    pub async fn snapshot(&self) -> Tables {
        self.tables.lock().await.clone()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn begin(&self) -> Result<Box<dyn MatchTx>, AppError> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx {
            guard,
            working,
            fail_point: self.fail_point,
        }))
    }

    async fn soc_codes_with_prefix(&self, prefix: &str) -> Result<Vec<SocRow>, AppError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<SocRow> = tables
            .soc
            .iter()
            .filter(|r| r.soc_code.starts_with(prefix))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.soc_code.cmp(&b.soc_code));
        Ok(rows)
    }

    async fn courses(&self) -> Result<Vec<CourseSummary>, AppError> {
        let mut courses = self.tables.lock().await.courses.clone();
        courses.sort_by(|a, b| a.crn.cmp(&b.crn));
        Ok(courses)
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
    fail_point: Option<FailPoint>,
}

impl MemoryTx {
    fn check(&self, point: FailPoint) -> Result<(), AppError> {
        if self.fail_point == Some(point) {
            return Err(AppError::Persistence(format!(
                "injected failure at {point:?}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MatchTx for MemoryTx {
    async fn find_user(&mut self, user_id: i32) -> Result<Option<UserAccount>, AppError> {
        Ok(self.working.users.get(&user_id).cloned())
    }

    async fn lock_user(&mut self, user_id: i32) -> Result<Option<UserAccount>, AppError> {
        self.find_user(user_id).await
    }

    async fn set_tag_code(&mut self, user_id: i32, tag_code: &str) -> Result<u64, AppError> {
        match self.working.users.get_mut(&user_id) {
            Some(user) => {
                user.tag_code = Some(tag_code.to_string());
                self.working.tag_writes += 1;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn clear_enrollment(&mut self, user_id: i32) -> Result<u64, AppError> {
        let before = self.working.enrollment.len();
        self.working.enrollment.retain(|(u, _)| *u != user_id);
        Ok((before - self.working.enrollment.len()) as u64)
    }

    async fn enroll(&mut self, user_id: i32, crn: &str) -> Result<bool, AppError> {
        if !self.working.courses.iter().any(|c| c.crn == crn) {
            return Err(AppError::Persistence(format!(
                "enrollment references unknown course {crn}"
            )));
        }
        if self
            .working
            .enrollment
            .iter()
            .any(|(u, c)| *u == user_id && c == crn)
        {
            return Ok(false);
        }
        self.working.enrollment.push((user_id, crn.to_string()));
        Ok(true)
    }

    async fn enrolled_skill_rows(&mut self, user_id: i32) -> Result<Vec<SkillMatchRow>, AppError> {
        self.check(FailPoint::SkillRead)?;
        let crns = self.working.enrolled_crns(user_id);
        Ok(self
            .working
            .skill_matching
            .iter()
            .filter(|r| crns.contains(&r.crn))
            .cloned()
            .collect())
    }

    async fn postings_for_soc_codes(
        &mut self,
        soc_codes: &[String],
    ) -> Result<Vec<JobPostingRow>, AppError> {
        self.check(FailPoint::PostingRead)?;
        let titles: BTreeSet<&str> = self
            .working
            .alter_titles
            .iter()
            .filter(|(code, _)| soc_codes.contains(code))
            .map(|(_, title)| title.as_str())
            .collect();
        Ok(self
            .working
            .jobs
            .iter()
            .filter(|j| titles.contains(j.role.as_str()) && self.working.known_posting(j))
            .cloned()
            .collect())
    }

    async fn postings_at_company(
        &mut self,
        company: &str,
    ) -> Result<Vec<JobPostingRow>, AppError> {
        self.check(FailPoint::PostingRead)?;
        Ok(self
            .working
            .jobs
            .iter()
            .filter(|j| j.company_name.as_deref() == Some(company))
            .filter(|j| self.working.known_posting(j))
            .cloned()
            .collect())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryTx {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        Ok(())
    }
}

fn user(user_id: i32, name: &str, experience: i32, ideal_company: Option<&str>) -> UserAccount {
    UserAccount {
        user_id,
        name: name.to_string(),
        experience,
        education: Some("Bachelor".to_string()),
        ideal_company: ideal_company.map(String::from),
        tag_code: None,
    }
}

fn soc(code: &str, name: &str) -> SocRow {
    SocRow {
        soc_code: code.to_string(),
        name: name.to_string(),
        related_experience: None,
        knowledge: None,
        ability: None,
    }
}

fn skill(crn: &str, code: &str, skill1: Option<&str>, skill2: Option<&str>) -> SkillMatchRow {
    SkillMatchRow {
        crn: crn.to_string(),
        soc_code: code.to_string(),
        skill1: skill1.map(String::from),
        skill2: skill2.map(String::from),
    }
}

#[allow(clippy::too_many_arguments)]
fn job(
    job_id: i64,
    role: &str,
    company: &str,
    experience: f64,
    qualification: &str,
    min_salary: f64,
    max_salary: f64,
) -> JobPostingRow {
    JobPostingRow {
        job_id,
        role: role.to_string(),
        avg_experience: Some(experience),
        qualification: Some(qualification.to_string()),
        min_salary: Some(min_salary),
        max_salary: Some(max_salary),
        job_type: Some("Full-time".to_string()),
        preference: Some("Hybrid".to_string()),
        benefits: Some("Health, 401k".to_string()),
        company_name: Some(company.to_string()),
    }
}

/// A small catalog shared by the matcher and handler tests.
///
/// - user 1 (Alice) targets Nvidia, user 2 (Bob) has no ideal company,
///   user 3 (Carol) targets Best Buy and is enrolled in CRN004.
/// - CRN001 + CRN002 give `15-1132` two skills; CRN001 alone gives `15-1134`
///   a single skill.
/// - "Ghost Role" maps from `15-1132` but is not a known position.
pub fn sample_tables() -> Tables {
    let users = [
        user(1, "Alice", 3, Some("Nvidia")),
        user(2, "Bob", 1, None),
        user(3, "Carol", 6, Some("Best Buy")),
    ]
    .into_iter()
    .map(|u| (u.user_id, u))
    .collect();

    let courses = [
        ("CRN001", "Intro to Programming"),
        ("CRN002", "Data Structures"),
        ("CRN003", "Applied Statistics"),
        ("CRN004", "Sales Fundamentals"),
    ]
    .into_iter()
    .map(|(crn, name)| CourseSummary {
        crn: crn.to_string(),
        course_name: name.to_string(),
    })
    .collect();

    let positions = [
        "Software Developer",
        "Web Developer",
        "Data Scientist",
        "Statistician",
        "Sales Manager",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    let soc_rows = vec![
        soc("11-0000", "Management Occupations"),
        soc("11-2000", "Advertising, Marketing, and Sales Managers"),
        soc("11-2020", "Marketing and Sales Managers"),
        soc("11-2022", "Sales Managers"),
        soc("15-0000", "Computer and Mathematical Occupations"),
        soc("15-1100", "Computer Occupations"),
        soc("15-1130", "Software Developers and Programmers"),
        soc("15-1132", "Software Developers, Applications"),
        soc("15-1134", "Web Developers"),
        soc("15-2000", "Mathematical Science Occupations"),
        soc("15-2040", "Statisticians"),
        soc("15-2041", "Statisticians"),
    ];

    let alter_titles = [
        ("15-1132", "Software Developer"),
        ("15-1132", "Ghost Role"),
        ("15-1134", "Web Developer"),
        ("15-2041", "Statistician"),
        ("15-2041", "Data Scientist"),
        ("11-2022", "Sales Manager"),
    ]
    .into_iter()
    .map(|(c, t)| (c.to_string(), t.to_string()))
    .collect();

    let skill_matching = vec![
        skill("CRN001", "15-1132", Some("Programming"), None),
        skill("CRN002", "15-1132", Some("Algorithms"), Some("")),
        skill("CRN001", "15-1134", Some("HTML"), None),
        skill("CRN003", "15-2041", Some("Statistics"), Some("Mathematics")),
        skill("CRN004", "11-2022", Some("Negotiation"), None),
    ];

    let jobs = vec![
        job(101, "Software Developer", "Nvidia", 2.0, "BS", 70000.0, 120000.0),
        job(101, "Software Developer", "Nvidia", 4.0, "MS", 75000.0, 130000.0),
        job(102, "Software Developer", "Best Buy", 1.0, "BS", 60000.0, 90000.0),
        job(103, "Web Developer", "Nvidia", 2.0, "BS", 50000.0, 80000.0),
        job(104, "Data Scientist", "Nvidia", 3.0, "MS", 90000.0, 150000.0),
        job(105, "Statistician", "Best Buy", 2.0, "MS", 65000.0, 95000.0),
        job(106, "Ghost Role", "Nvidia", 0.0, "None", 1.0, 999999.0),
        job(107, "Sales Manager", "Best Buy", 5.0, "BA", 55000.0, 85000.0),
    ];

    Tables {
        users,
        courses,
        positions,
        soc: soc_rows,
        alter_titles,
        skill_matching,
        jobs,
        enrollment: vec![(3, "CRN004".to_string())],
        tag_writes: 0,
    }
}
