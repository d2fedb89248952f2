use crate::{ApplicationStatus, Id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadJobs,
    LoadSavedJobs {
        candidate_id: Id,
    },
    ToggleBookmark {
        candidate_id: Id,
        job_id: Id,
    },
    LoadCandidateApplications {
        candidate_id: Id,
    },
    LoadJobApplications {
        job_id: Id,
    },
    SubmitApplication {
        candidate_id: Id,
        job_id: Id,
        cover_letter: String,
        resume_url: Option<String>,
    },
    UpdateApplicationStatus {
        application_id: Id,
        status: ApplicationStatus,
        notes: Option<String>,
    },
    /// Forget the persisted session; the API no longer accepts it.
    ClearSession,
}
