//! Shared aggregation for every matching path.
//!
//! Postings are grouped by (job id, role, type, preference, benefits), plus the
//! company name when the caller already pinned the company. Numeric columns are
//! averaged, string columns are collapsed into a distinct, sorted list.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::job::{AggregatedJob, JobPostingRow};

pub const CONCAT_SEPARATOR: &str = ", ";

/// How the company column participates in grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyColumn {
    /// Company names of all collapsed postings are joined into one string.
    Concatenated,
    /// Company name is part of the grouping key and copied through.
    Grouped,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    job_id: i64,
    role: String,
    job_type: Option<String>,
    preference: Option<String>,
    benefits: Option<String>,
    company: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    experience: Mean,
    min_salary: Mean,
    max_salary: Mean,
    qualifications: BTreeSet<String>,
    companies: BTreeSet<String>,
}

/// Collapses raw postings into one entry per grouping key, ordered by key.
pub fn aggregate_postings<I>(rows: I, company: CompanyColumn) -> Vec<AggregatedJob>
where
    I: IntoIterator<Item = JobPostingRow>,
{
    let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();

    for row in rows {
        let key = GroupKey {
            job_id: row.job_id,
            role: row.role,
            job_type: row.job_type,
            preference: row.preference,
            benefits: row.benefits,
            company: match company {
                CompanyColumn::Grouped => row.company_name.clone(),
                CompanyColumn::Concatenated => None,
            },
        };
        let acc = groups.entry(key).or_default();
        acc.experience.push(row.avg_experience);
        acc.min_salary.push(row.min_salary);
        acc.max_salary.push(row.max_salary);
        insert_non_blank(&mut acc.qualifications, row.qualification);
        insert_non_blank(&mut acc.companies, row.company_name);
    }

    groups
        .into_iter()
        .map(|(key, acc)| AggregatedJob {
            job_id: key.job_id,
            role: key.role,
            avg_experience: acc.experience.value(),
            qualification: join_distinct(&acc.qualifications),
            min_salary: acc.min_salary.value().map(round_cents),
            max_salary: acc.max_salary.value().map(round_cents),
            job_type: key.job_type,
            preference: key.preference,
            benefits: key.benefits,
            company_name: match company {
                CompanyColumn::Grouped => key.company,
                CompanyColumn::Concatenated => join_distinct(&acc.companies),
            },
        })
        .collect()
}

/// Orders by aggregated max salary, highest first. Entries without a salary go
/// last; ties keep their incoming order.
pub fn rank_by_max_salary(jobs: &mut [AggregatedJob]) {
    jobs.sort_by(|a, b| match (a.max_salary, b.max_salary) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn insert_non_blank(set: &mut BTreeSet<String>, value: Option<String>) {
    if let Some(v) = value {
        if !v.trim().is_empty() {
            set.insert(v);
        }
    }
}

fn join_distinct(values: &BTreeSet<String>) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(CONCAT_SEPARATOR),
    )
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
