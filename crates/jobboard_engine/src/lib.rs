//! Job board engine: REST access to the data API, view-model assembly and
//! the background command runner.
mod applications;
mod assemble;
mod bookmark;
mod client;
mod engine;
mod persist;
mod resource;
mod session;
mod types;

pub use applications::{
    load_candidate_applications, load_job_applications, submit_application,
    update_application_status,
};
pub use assemble::{
    assemble_applications, assemble_jobs, load_job_board, resolve_relations, RelationDescriptor,
    RelationPath, ResolvedRelations, CATEGORY, EMPLOYER, JOB, JOB_RELATIONS, LOCATION,
};
pub use bookmark::{load_saved_set, toggle_bookmark, toggle_saved_job, BookmarkState};
pub use client::{create_as, get_as, list_as, ApiSettings, ReqwestClient, ResourceClient};
pub use engine::{Clock, EngineCommand, EngineConfig, EngineError, EngineHandle};
pub use persist::{ensure_state_dir, PersistError, StateDir};
pub use resource::Resource;
pub use session::{sign_in, Session, SessionContext};
pub use types::{ApiError, EngineEvent, FailureKind};
