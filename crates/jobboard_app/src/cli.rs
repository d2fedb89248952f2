use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jobboard_core::{
    ApplicationStatus, EmploymentType, ExperienceBracket, FilterChange, Id, SalaryBracket, SortKey,
};

use crate::platform::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse, save and apply to jobs", long_about = None)]
pub struct Cli {
    /// RON configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Exchange an API token for a stored session.
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        user_id: Id,
    },
    /// Forget the stored session.
    Logout,
    /// List job postings.
    Jobs(JobsArgs),
    /// Save a job, or unsave it if already saved.
    Bookmark { job_id: Id },
    /// List saved jobs.
    Saved,
    /// List your applications, or those received for one job with `--job`.
    Applications {
        #[arg(long)]
        job: Option<Id>,
    },
    /// Apply to a job.
    Apply {
        job_id: Id,
        #[arg(long, default_value = "")]
        cover_letter: String,
        #[arg(long)]
        resume_url: Option<String>,
    },
    /// Move an application to a new status.
    Review {
        application_id: Id,
        #[arg(long, value_enum)]
        status: StatusArg,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct JobsArgs {
    /// Substring of the title, company name or description.
    #[arg(long, short)]
    pub query: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Category id.
    #[arg(long)]
    pub category: Option<Id>,
    /// `none`, `under-1`, or a number of years.
    #[arg(long)]
    pub experience: Option<ExperienceBracket>,
    /// `negotiable`, `under-10`, `10-20` or `over-20`.
    #[arg(long)]
    pub salary: Option<SalaryBracket>,
    #[arg(long)]
    pub education: Option<String>,
    #[arg(long = "type")]
    pub employment_type: Option<EmploymentType>,
    /// `latest`, `salary-desc` or `salary-asc`.
    #[arg(long)]
    pub sort: Option<SortKey>,
    /// Only postings of this employer id.
    #[arg(long)]
    pub employer: Option<Id>,
}

impl JobsArgs {
    pub fn filter_changes(&self) -> Vec<FilterChange> {
        let mut changes = Vec::new();
        if let Some(query) = &self.query {
            changes.push(FilterChange::Query(query.clone()));
        }
        if let Some(location) = &self.location {
            changes.push(FilterChange::Location(location.clone()));
        }
        if self.category.is_some() {
            changes.push(FilterChange::Category(self.category.clone()));
        }
        if self.experience.is_some() {
            changes.push(FilterChange::Experience(self.experience));
        }
        if self.salary.is_some() {
            changes.push(FilterChange::Salary(self.salary));
        }
        if self.education.is_some() {
            changes.push(FilterChange::Education(self.education.clone()));
        }
        if self.employment_type.is_some() {
            changes.push(FilterChange::EmploymentType(self.employment_type));
        }
        changes
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    Pending,
    Reviewing,
    Accepted,
    Rejected,
}

impl From<StatusArg> for ApplicationStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => ApplicationStatus::Pending,
            StatusArg::Reviewing => ApplicationStatus::Reviewing,
            StatusArg::Accepted => ApplicationStatus::Accepted,
            StatusArg::Rejected => ApplicationStatus::Rejected,
        }
    }
}
