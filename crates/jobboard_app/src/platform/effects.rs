use std::time::Duration;

use anyhow::{anyhow, bail};
use board_logging::{board_info, board_warn};
use jobboard_core::{Effect, Id, Msg};
use jobboard_engine::{
    ApiError, EngineCommand, EngineConfig, EngineEvent, EngineHandle, Session, SessionContext,
    StateDir,
};

use super::persistence;

/// Turns core effects into engine commands and engine events back into
/// messages for the update loop.
pub struct EffectRunner {
    engine: EngineHandle,
    state_dir: StateDir,
    /// Restricts `Effect::LoadJobs` to one employer's postings.
    job_scope: Option<Id>,
    reply_timeout: Duration,
}

impl EffectRunner {
    pub fn new(
        config: EngineConfig,
        session: SessionContext,
        state_dir: StateDir,
    ) -> anyhow::Result<Self> {
        // The engine answers every command once its request settles or times out.
        let reply_timeout = config.api.connect_timeout + config.api.request_timeout * 4;
        let engine = EngineHandle::new(config, session)?;
        Ok(Self {
            engine,
            state_dir,
            job_scope: None,
            reply_timeout,
        })
    }

    pub fn scope_jobs_to(&mut self, employer_id: Option<Id>) {
        self.job_scope = employer_id;
    }

    pub fn session_active(&self) -> bool {
        self.engine.session().is_active()
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            let command = match effect {
                Effect::LoadJobs => EngineCommand::LoadJobs {
                    employer_id: self.job_scope.clone(),
                },
                Effect::LoadSavedJobs { candidate_id } => {
                    EngineCommand::LoadSavedJobs { candidate_id }
                }
                Effect::ToggleBookmark {
                    candidate_id,
                    job_id,
                } => EngineCommand::ToggleBookmark {
                    candidate_id,
                    job_id,
                },
                Effect::LoadCandidateApplications { candidate_id } => {
                    EngineCommand::LoadCandidateApplications { candidate_id }
                }
                Effect::LoadJobApplications { job_id } => {
                    EngineCommand::LoadJobApplications { job_id }
                }
                Effect::SubmitApplication {
                    candidate_id,
                    job_id,
                    cover_letter,
                    resume_url,
                } => EngineCommand::SubmitApplication {
                    candidate_id,
                    job_id,
                    cover_letter,
                    resume_url,
                },
                Effect::UpdateApplicationStatus {
                    application_id,
                    status,
                    notes,
                } => EngineCommand::UpdateApplicationStatus {
                    application_id,
                    status,
                    notes,
                },
                Effect::ClearSession => {
                    if persistence::clear_session(&self.state_dir) {
                        board_info!("Removed stored session after it was rejected");
                    }
                    continue;
                }
            };
            self.engine.send(command);
        }
    }

    /// Wait for the next engine reply and translate it.
    pub fn next_msg(&self) -> anyhow::Result<Msg> {
        let event = self
            .engine
            .recv_timeout(self.reply_timeout)
            .ok_or_else(|| anyhow!("no reply from the API within {:?}", self.reply_timeout))?;
        Ok(map_event(event))
    }

    /// Exchange a token for a session and store it for later runs.
    pub fn sign_in(&self, token: String, user_id: Id) -> anyhow::Result<Session> {
        self.engine.send(EngineCommand::SignIn { token, user_id });
        loop {
            let event = self
                .engine
                .recv_timeout(self.reply_timeout)
                .ok_or_else(|| anyhow!("no reply from the API within {:?}", self.reply_timeout))?;
            match event {
                EngineEvent::SignedIn(Ok(session)) => {
                    persistence::save_session(&self.state_dir, &session)?;
                    return Ok(session);
                }
                EngineEvent::SignedIn(Err(err)) => bail!(err.user_message()),
                // Sign-in through a fresh context; a stale expiry notice is moot.
                EngineEvent::SessionExpired => {}
                other => board_warn!("Ignoring unexpected engine event during sign-in: {:?}", other),
            }
        }
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SignedIn(result) => match result {
            Ok(session) => Msg::SessionRestored(Some(session.viewer())),
            Err(err) => {
                board_warn!("Sign-in failed: {}", err);
                Msg::NoOp
            }
        },
        EngineEvent::JobsLoaded(result) => Msg::JobsLoaded(user_result(result)),
        EngineEvent::SavedJobsLoaded(result) => Msg::SavedJobsLoaded(user_result(result)),
        EngineEvent::BookmarkToggled { job_id, result } => Msg::BookmarkSettled {
            job_id,
            result: user_result(result.map(|state| state.is_saved())),
        },
        EngineEvent::ApplicationsLoaded(result) => Msg::ApplicationsLoaded(user_result(result)),
        EngineEvent::ApplicationSubmitted(result) => {
            Msg::ApplicationSubmitted(user_result(result))
        }
        EngineEvent::ApplicationUpdated(result) => Msg::ApplicationUpdated(user_result(result)),
        EngineEvent::SessionExpired => Msg::SessionExpired,
    }
}

fn user_result<T>(result: Result<T, ApiError>) -> Result<T, String> {
    result.map_err(|err| {
        board_warn!("Request failed: {}", err);
        err.user_message()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_engine::{BookmarkState, FailureKind};

    #[test]
    fn bookmark_state_maps_to_saved_flag() {
        let msg = map_event(EngineEvent::BookmarkToggled {
            job_id: Id::from(7),
            result: Ok(BookmarkState::Unsaved),
        });
        assert_eq!(
            msg,
            Msg::BookmarkSettled {
                job_id: Id::from(7),
                result: Ok(false),
            }
        );
    }

    #[test]
    fn api_errors_become_user_messages() {
        let err = ApiError {
            kind: FailureKind::Timeout,
            message: "operation timed out after 30s".to_string(),
        };
        assert_eq!(
            map_event(EngineEvent::JobsLoaded(Err(err))),
            Msg::JobsLoaded(Err("The server took too long to answer.".to_string()))
        );
    }

    #[test]
    fn expiry_passes_through() {
        assert_eq!(map_event(EngineEvent::SessionExpired), Msg::SessionExpired);
    }
}
