use chrono::{DateTime, Utc};

use crate::{
    Application, ApplicationStatus, Category, Employer, EmploymentType, Id, JobPosting, Location,
    PageStatus,
};

/// A posting joined with the records the data API keeps on other endpoints.
///
/// Relations that could not be resolved stay `None`; the posting itself is
/// always present.
#[derive(Debug, Clone, PartialEq)]
pub struct JobView {
    pub job: JobPosting,
    pub employer: Option<Employer>,
    pub category: Option<Category>,
    pub location: Option<Location>,
}

impl JobView {
    pub fn new(job: JobPosting) -> Self {
        Self {
            job,
            employer: None,
            category: None,
            location: None,
        }
    }

    pub fn with_employer(mut self, employer: Employer) -> Self {
        self.employer = Some(employer);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn id(&self) -> &Id {
        &self.job.id
    }

    pub fn company_name(&self) -> Option<&str> {
        self.employer
            .as_ref()
            .map(|employer| employer.company_name.as_str())
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location.as_ref().map(|location| location.name.as_str())
    }

    pub fn category_id(&self) -> Option<&Id> {
        self.category.as_ref().map(|category| &category.id)
    }
}

/// An application joined with its posting and the posting's employer.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationView {
    pub application: Application,
    pub job: JobPosting,
    pub employer: Option<Employer>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub signed_in_as: Option<String>,
    pub jobs_status: PageStatus,
    pub jobs: Vec<JobRowView>,
    pub total_jobs: usize,
    pub filter_active: bool,
    pub saved_count: usize,
    pub applications_status: PageStatus,
    pub applications: Vec<ApplicationRowView>,
    pub notice: Option<String>,
    pub signed_out: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRowView {
    pub job_id: Id,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub salary: String,
    pub employment_type: Option<EmploymentType>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_saved: bool,
    pub bookmark_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRowView {
    pub application_id: Id,
    pub job_title: String,
    pub company: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: Option<DateTime<Utc>>,
    pub employer_notes: Option<String>,
}

impl From<&ApplicationView> for ApplicationRowView {
    fn from(view: &ApplicationView) -> Self {
        Self {
            application_id: view.application.id.clone(),
            job_title: view.job.title.clone(),
            company: view
                .employer
                .as_ref()
                .map(|employer| employer.company_name.clone()),
            status: view.application.status,
            applied_at: view.application.applied_at,
            employer_notes: view.application.employer_notes.clone(),
        }
    }
}

/// Human-readable salary range for a posting.
pub fn format_salary(job: &JobPosting) -> String {
    if job.is_salary_negotiable {
        return "Negotiable".to_string();
    }
    let currency = job
        .salary_currency
        .as_deref()
        .map(|c| format!(" {c}"))
        .unwrap_or_default();
    match (job.salary_min, job.salary_max) {
        (Some(min), Some(max)) if min == max => format!("{}{currency}", amount(min)),
        (Some(min), Some(max)) => format!("{}-{}{currency}", amount(min), amount(max)),
        (Some(min), None) => format!("from {}{currency}", amount(min)),
        (None, Some(max)) => format!("up to {}{currency}", amount(max)),
        (None, None) => "Not disclosed".to_string(),
    }
}

fn amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
