use crate::{
    Application, ApplicationStatus, ApplicationView, EmploymentType, ExperienceBracket, Id,
    JobView, SalaryBracket, SortKey, Viewer,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A stored session was found (or not) at startup.
    SessionRestored(Option<Viewer>),
    /// The job board page was entered; (re)load everything it shows.
    JobBoardOpened,
    /// Assembled job views, or the page-level error text.
    JobsLoaded(Result<Vec<JobView>, String>),
    SavedJobsLoaded(Result<Vec<Id>, String>),
    FilterChanged(FilterChange),
    SortChanged(Option<SortKey>),
    FiltersCleared,
    /// User clicked the bookmark button of a job.
    BookmarkClicked { job_id: Id },
    /// Engine finished a bookmark toggle; `Ok(true)` means the job is now saved.
    BookmarkSettled {
        job_id: Id,
        result: Result<bool, String>,
    },
    /// Candidate opened their own applications.
    ApplicationsOpened,
    /// Employer opened the applications received for one of their jobs.
    JobApplicationsOpened { job_id: Id },
    ApplicationsLoaded(Result<Vec<ApplicationView>, String>),
    ApplyClicked {
        job_id: Id,
        cover_letter: String,
        resume_url: Option<String>,
    },
    ApplicationSubmitted(Result<Application, String>),
    StatusChangeRequested {
        application_id: Id,
        status: ApplicationStatus,
        notes: Option<String>,
    },
    ApplicationUpdated(Result<Application, String>),
    /// The API rejected the session token.
    SessionExpired,
    Tick,
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Query(String),
    Location(String),
    Category(Option<Id>),
    Experience(Option<ExperienceBracket>),
    Salary(Option<SalaryBracket>),
    Education(Option<String>),
    EmploymentType(Option<EmploymentType>),
}
