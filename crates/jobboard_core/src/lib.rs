//! Job board core: entity models, the filter/sort pipeline and the pure page
//! state machine.
mod effect;
mod filter;
mod model;
mod msg;
mod saved;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use filter::{
    filter_and_sort, filter_jobs, sort_jobs, ExperienceBracket, JobFilter, ParseFilterError,
    SalaryBracket, SortKey, SALARY_HIGH_BOUND, SALARY_LOW_BOUND,
};
pub use model::{
    Application, ApplicationStatus, Candidate, Category, Employer, EmploymentType, Id, JobCategory,
    JobLocation, JobPosting, Location, SavedJob, User, UserRole,
};
pub use msg::{FilterChange, Msg};
pub use saved::SavedSet;
pub use state::{AppState, PageStatus, Viewer};
pub use update::update;
pub use view_model::{
    format_salary, AppViewModel, ApplicationRowView, ApplicationView, JobRowView, JobView,
};
