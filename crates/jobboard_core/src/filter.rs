//! Client-side search over assembled job views.
//!
//! Every active predicate must hold for a job to be kept. The pipeline is a
//! pure function of its inputs and never touches the network, so it can be
//! re-run on every keystroke.

use std::str::FromStr;

use thiserror::Error;

use crate::{EmploymentType, Id, JobView};

/// Lower salary boundary, in the posting currency's major unit.
pub const SALARY_LOW_BOUND: f64 = 10.0;
/// Upper salary boundary, in the posting currency's major unit.
pub const SALARY_HIGH_BOUND: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceBracket {
    NoExperience,
    UnderOneYear,
    /// Postings asking for at most this many years.
    UpTo(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryBracket {
    Negotiable,
    Below10,
    From10To20,
    Above20,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Latest,
    SalaryDesc,
    SalaryAsc,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobFilter {
    pub query: String,
    pub location: String,
    pub category: Option<Id>,
    pub experience: Option<ExperienceBracket>,
    pub salary: Option<SalaryBracket>,
    pub education: Option<String>,
    pub employment_type: Option<EmploymentType>,
}

impl JobFilter {
    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.location.trim().is_empty()
            && self.category.is_none()
            && self.experience.is_none()
            && self.salary.is_none()
            && self
                .education
                .as_deref()
                .is_none_or(|education| education.trim().is_empty())
            && self.employment_type.is_none()
    }

    pub fn matches(&self, item: &JobView) -> bool {
        self.matches_query(item)
            && self.matches_location(item)
            && self.matches_category(item)
            && self.matches_experience(item)
            && self.matches_salary(item)
            && self.matches_education(item)
            && self.matches_employment_type(item)
    }

    fn matches_query(&self, item: &JobView) -> bool {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        contains_folded(&item.job.title, &needle)
            || item
                .company_name()
                .is_some_and(|company| contains_folded(company, &needle))
            || contains_folded(&item.job.description, &needle)
    }

    fn matches_location(&self, item: &JobView) -> bool {
        let needle = self.location.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        item.location_name()
            .is_some_and(|name| contains_folded(name, &needle))
    }

    fn matches_category(&self, item: &JobView) -> bool {
        match &self.category {
            None => true,
            Some(wanted) => item.category_id() == Some(wanted),
        }
    }

    fn matches_experience(&self, item: &JobView) -> bool {
        let Some(bracket) = self.experience else {
            return true;
        };
        let text = item
            .job
            .experience_required
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        match bracket {
            ExperienceBracket::NoExperience => is_no_experience(&text),
            ExperienceBracket::UnderOneYear => {
                is_no_experience(&text) || is_under_one_year(&text)
            }
            ExperienceBracket::UpTo(limit) => {
                required_years(&text).is_some_and(|years| years <= limit)
            }
        }
    }

    fn matches_salary(&self, item: &JobView) -> bool {
        let Some(bracket) = self.salary else {
            return true;
        };
        let job = &item.job;
        match bracket {
            SalaryBracket::Negotiable => job.is_salary_negotiable,
            SalaryBracket::Below10 => job.salary_max.is_some_and(|max| max <= SALARY_LOW_BOUND),
            SalaryBracket::From10To20 => {
                job.salary_min.is_some_and(|min| min >= SALARY_LOW_BOUND)
                    && job.salary_max.is_some_and(|max| max <= SALARY_HIGH_BOUND)
            }
            SalaryBracket::Above20 => job.salary_min.is_some_and(|min| min >= SALARY_HIGH_BOUND),
        }
    }

    fn matches_education(&self, item: &JobView) -> bool {
        let needle = match self.education.as_deref().map(str::trim) {
            None | Some("") => return true,
            Some(needle) => needle.to_lowercase(),
        };
        item.job
            .education_required
            .as_deref()
            .is_some_and(|education| contains_folded(education, &needle))
    }

    fn matches_employment_type(&self, item: &JobView) -> bool {
        match self.employment_type {
            None => true,
            Some(wanted) => item.job.employment_type == Some(wanted),
        }
    }
}

/// Returns the jobs matching `filter`, in source order.
///
/// The result is always a fresh vector, even when the filter is empty.
pub fn filter_jobs(items: &[JobView], filter: &JobFilter) -> Vec<JobView> {
    if filter.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect()
}

/// Stable sort of `items` by `key`. Missing salaries count as zero.
pub fn sort_jobs(items: &mut [JobView], key: SortKey) {
    match key {
        SortKey::Latest => items.sort_by(|a, b| b.job.updated_at.cmp(&a.job.updated_at)),
        SortKey::SalaryDesc => items.sort_by(|a, b| {
            salary_or_zero(b.job.salary_max).total_cmp(&salary_or_zero(a.job.salary_max))
        }),
        SortKey::SalaryAsc => items.sort_by(|a, b| {
            salary_or_zero(a.job.salary_min).total_cmp(&salary_or_zero(b.job.salary_min))
        }),
    }
}

/// Filter then sort; `sort = None` keeps the source order.
pub fn filter_and_sort(
    items: &[JobView],
    filter: &JobFilter,
    sort: Option<SortKey>,
) -> Vec<JobView> {
    let mut result = filter_jobs(items, filter);
    if let Some(key) = sort {
        sort_jobs(&mut result, key);
    }
    result
}

fn salary_or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}

fn is_no_experience(text: &str) -> bool {
    text.contains("no experience") || text.trim() == "none"
}

fn is_under_one_year(text: &str) -> bool {
    ["under 1 year", "less than 1 year", "< 1 year"]
        .iter()
        .any(|phrase| text.contains(phrase))
}

/// Minimum years a posting asks for: the first integer in the text.
fn required_years(text: &str) -> Option<u32> {
    if is_no_experience(text) || is_under_one_year(text) {
        return Some(0);
    }
    leading_integer(text)
}

fn leading_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised {field} value {value:?}")]
pub struct ParseFilterError {
    pub field: &'static str,
    pub value: String,
}

impl FromStr for ExperienceBracket {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no-experience" => Ok(ExperienceBracket::NoExperience),
            "under-1" | "under-1-year" => Ok(ExperienceBracket::UnderOneYear),
            other => other
                .parse::<u32>()
                .map(ExperienceBracket::UpTo)
                .map_err(|_| ParseFilterError {
                    field: "experience",
                    value: s.to_string(),
                }),
        }
    }
}

impl FromStr for SalaryBracket {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "negotiable" => Ok(SalaryBracket::Negotiable),
            "under-10" => Ok(SalaryBracket::Below10),
            "10-20" => Ok(SalaryBracket::From10To20),
            "over-20" => Ok(SalaryBracket::Above20),
            _ => Err(ParseFilterError {
                field: "salary",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(SortKey::Latest),
            "salary-desc" => Ok(SortKey::SalaryDesc),
            "salary-asc" => Ok(SortKey::SalaryAsc),
            _ => Err(ParseFilterError {
                field: "sort",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for EmploymentType {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full-time" | "full_time" | "fulltime" => Ok(EmploymentType::FullTime),
            "part-time" | "part_time" | "parttime" => Ok(EmploymentType::PartTime),
            "internship" => Ok(EmploymentType::Internship),
            "contract" => Ok(EmploymentType::Contract),
            _ => Err(ParseFilterError {
                field: "employment type",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_integer_takes_first_digit_run() {
        assert_eq!(leading_integer("2-3 years"), Some(2));
        assert_eq!(leading_integer("at least 5 years"), Some(5));
        assert_eq!(leading_integer("12+ years"), Some(12));
        assert_eq!(leading_integer("several years"), None);
    }

    #[test]
    fn no_experience_text_counts_as_zero_years() {
        assert_eq!(required_years("no experience required"), Some(0));
        assert_eq!(required_years("less than 1 year"), Some(0));
    }

    #[test]
    fn bracket_parsing_accepts_cli_spellings() {
        assert_eq!("3".parse::<ExperienceBracket>(), Ok(ExperienceBracket::UpTo(3)));
        assert_eq!("none".parse::<ExperienceBracket>(), Ok(ExperienceBracket::NoExperience));
        assert_eq!("10-20".parse::<SalaryBracket>(), Ok(SalaryBracket::From10To20));
        assert_eq!("salary-desc".parse::<SortKey>(), Ok(SortKey::SalaryDesc));
        assert!("weekly".parse::<SortKey>().is_err());
    }

    #[test]
    fn parse_error_names_field_and_value() {
        let err = "lots".parse::<SalaryBracket>().unwrap_err();
        assert_eq!(err.to_string(), r#"unrecognised salary value "lots""#);
    }
}
