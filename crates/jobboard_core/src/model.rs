//! Entity records as served by the job board data API.
//!
//! Field names follow the API's camelCase JSON. Records are ephemeral copies;
//! the API stays authoritative.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque record identifier.
///
/// The data API hands out either numeric or string ids depending on the
/// resource and how it was seeded; both are normalised to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr", into = "String")]
pub struct Id(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl From<IdRepr> for Id {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Unsigned(n) => Id(n.to_string()),
            IdRepr::Signed(n) => Id(n.to_string()),
            IdRepr::Float(f) => Id(float_id(f)),
            IdRepr::Text(s) => Id(s),
        }
    }
}

/// `3.0` and `3` name the same record.
fn float_id(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

impl From<Id> for String {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id(value)
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Id(value.to_string())
    }
}

impl Id {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "full-time", alias = "full_time", alias = "fulltime")]
    FullTime,
    #[serde(rename = "part-time", alias = "part_time", alias = "parttime")]
    PartTime,
    #[serde(rename = "internship")]
    Internship,
    #[serde(rename = "contract")]
    Contract,
    #[serde(rename = "other", other)]
    Other,
}

impl EmploymentType {
    pub fn label(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full-time",
            EmploymentType::PartTime => "part-time",
            EmploymentType::Internship => "internship",
            EmploymentType::Contract => "contract",
            EmploymentType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewing,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Accepted and rejected applications are closed to further review.
    pub fn is_final(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Candidate,
    Employer,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: Id,
    pub employer_id: Option<Id>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub benefits: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    #[serde(default)]
    pub is_salary_negotiable: bool,
    pub experience_required: Option<String>,
    pub education_required: Option<String>,
    pub employment_type: Option<EmploymentType>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    /// A posting with only an id and title, everything else empty.
    pub fn new(id: impl Into<Id>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            employer_id: None,
            title: title.into(),
            description: String::new(),
            requirements: String::new(),
            benefits: String::new(),
            salary_min: None,
            salary_max: None,
            salary_currency: None,
            is_salary_negotiable: false,
            experience_required: None,
            education_required: None,
            employment_type: None,
            deadline: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// True when the application deadline lies strictly before `today`.
    pub fn is_closed_on(&self, today: NaiveDate) -> bool {
        self.deadline.is_some_and(|deadline| deadline < today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employer {
    pub id: Id,
    pub user_id: Option<Id>,
    #[serde(default)]
    pub company_name: String,
    pub company_logo: Option<String>,
    pub company_size: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub company_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    #[serde(default, alias = "categoryName")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Id,
    #[serde(default, alias = "locationName")]
    pub name: String,
}

/// Link row attaching a category to a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCategory {
    pub id: Id,
    pub job_post_id: Id,
    pub category_id: Id,
}

/// Link row attaching a location to a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLocation {
    pub id: Id,
    pub job_post_id: Id,
    pub location_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Id,
    pub job_post_id: Id,
    pub candidate_id: Id,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub cover_letter: String,
    pub resume_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_status_update: Option<DateTime<Utc>>,
    pub employer_notes: Option<String>,
}

/// Bookmark join row between a candidate and a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub id: Id,
    pub candidate_id: Id,
    pub job_post_id: Id,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Id,
    pub user_id: Id,
    #[serde(default)]
    pub full_name: String,
    pub headline: Option<String>,
    pub resume_url: Option<String>,
}

/// Seed data is not consistent about timestamp shapes; anything that does not
/// parse is treated as absent rather than failing the whole record.
mod lenient {
    use super::*;
    use serde::de::IgnoredAny;

    /// Epoch values above this are taken as milliseconds.
    const MILLIS_THRESHOLD: i64 = 100_000_000_000;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Text(String),
        Integer(i64),
        Float(f64),
        Other(IgnoredAny),
    }

    impl RawTime {
        fn to_timestamp(&self) -> Option<DateTime<Utc>> {
            match self {
                RawTime::Text(text) => parse_timestamp(text),
                RawTime::Integer(epoch) => from_epoch(*epoch),
                RawTime::Float(epoch) if epoch.is_finite() => from_epoch(epoch.trunc() as i64),
                RawTime::Float(_) | RawTime::Other(_) => None,
            }
        }
    }

    pub(super) fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawTime>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(RawTime::to_timestamp))
    }

    pub(super) fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawTime>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawTime::Text(text)) => parse_date(&text),
            Some(other) => other.to_timestamp().map(|ts| ts.date_naive()),
            None => None,
        })
    }

    fn from_epoch(epoch: i64) -> Option<DateTime<Utc>> {
        if epoch.abs() >= MILLIS_THRESHOLD {
            DateTime::from_timestamp_millis(epoch)
        } else {
            DateTime::from_timestamp(epoch, 0)
        }
    }

    fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    fn parse_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
    }
}
