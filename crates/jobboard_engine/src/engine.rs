use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use board_logging::board_debug;
use chrono::{DateTime, Utc};
use jobboard_core::{ApplicationStatus, Id};
use thiserror::Error;

use crate::applications::{
    load_candidate_applications, load_job_applications, submit_application,
    update_application_status,
};
use crate::assemble::load_job_board;
use crate::bookmark::{load_saved_set, toggle_saved_job};
use crate::client::{ApiSettings, ReqwestClient};
use crate::session::{sign_in, SessionContext};
use crate::{ApiError, EngineEvent};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct EngineConfig {
    pub api: ApiSettings,
    /// Source of `savedAt`/`appliedAt` timestamps.
    pub clock: Clock,
}

impl EngineConfig {
    pub fn new(api: ApiSettings) -> Self {
        Self {
            api,
            clock: Arc::new(Utc::now),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("api client: {0}")]
    Api(#[from] ApiError),
    #[error("async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    SignIn {
        token: String,
        user_id: Id,
    },
    LoadJobs {
        employer_id: Option<Id>,
    },
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
}

/// Runs REST work on a background tokio runtime.
///
/// Commands go in through [`EngineHandle::send`]; results come back as
/// [`EngineEvent`]s in completion order, not submission order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    session: SessionContext,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, session: SessionContext) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let client = Arc::new(ReqwestClient::new(config.api, session.clone())?);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let clock = config.clock;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let clock = clock.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), clock, command, event_tx).await;
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            session,
        })
    }

    pub fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}

async fn handle_command(
    client: &ReqwestClient,
    clock: Clock,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    board_debug!("Engine command {:?}", command);
    let had_session = client.session().is_active();

    let event = match command {
        EngineCommand::SignIn { token, user_id } => {
            EngineEvent::SignedIn(sign_in(client, client.session(), &token, &user_id).await)
        }
        EngineCommand::LoadJobs { employer_id } => {
            EngineEvent::JobsLoaded(load_job_board(client, employer_id.as_ref()).await)
        }
        EngineCommand::LoadSavedJobs { candidate_id } => EngineEvent::SavedJobsLoaded(
            load_saved_set(client, &candidate_id)
                .await
                .map(|saved| saved.iter().cloned().collect()),
        ),
        EngineCommand::ToggleBookmark {
            candidate_id,
            job_id,
        } => {
            let result = toggle_saved_job(client, &candidate_id, &job_id, clock()).await;
            EngineEvent::BookmarkToggled { job_id, result }
        }
        EngineCommand::LoadCandidateApplications { candidate_id } => {
            EngineEvent::ApplicationsLoaded(load_candidate_applications(client, &candidate_id).await)
        }
        EngineCommand::LoadJobApplications { job_id } => {
            EngineEvent::ApplicationsLoaded(load_job_applications(client, &job_id).await)
        }
        EngineCommand::SubmitApplication {
            candidate_id,
            job_id,
            cover_letter,
            resume_url,
        } => EngineEvent::ApplicationSubmitted(
            submit_application(
                client,
                &candidate_id,
                &job_id,
                &cover_letter,
                resume_url.as_deref(),
                clock(),
            )
            .await,
        ),
        EngineCommand::UpdateApplicationStatus {
            application_id,
            status,
            notes,
        } => EngineEvent::ApplicationUpdated(
            update_application_status(client, &application_id, status, notes.as_deref(), clock())
                .await,
        ),
    };

    let _ = event_tx.send(event);
    if had_session && !client.session().is_active() {
        let _ = event_tx.send(EngineEvent::SessionExpired);
    }
}
