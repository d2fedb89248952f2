//! Explicit session context.
//!
//! A session starts when the user signs in with a bearer token and ends on
//! logout or the first 401 from the data API. Every client holding a clone of
//! the same [`SessionContext`] sees the change immediately.

use std::sync::{Arc, PoisonError, RwLock};

use board_logging::{board_info, redact};
use futures_util::future::join;
use jobboard_core::{Candidate, Employer, Id, User, UserRole, Viewer};
use serde::{Deserialize, Serialize};

use crate::client::{get_as, list_as, ResourceClient};
use crate::{ApiError, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub candidate_id: Option<Id>,
    pub employer_id: Option<Id>,
}

impl Session {
    pub fn viewer(&self) -> Viewer {
        let display_name = if self.user.full_name.is_empty() {
            self.user.email.clone()
        } else {
            self.user.full_name.clone()
        };
        Viewer {
            user_id: self.user.id.clone(),
            display_name,
            candidate_id: self.candidate_id.clone(),
            employer_id: self.employer_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        let context = Self::new();
        context.begin(session);
        context
    }

    pub fn begin(&self, session: Session) {
        board_info!(
            "Session started for user {} (token {})",
            session.user.id,
            redact(&session.token)
        );
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Ends the session, returning it if one was active.
    pub fn end(&self) -> Option<Session> {
        let ended = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(session) = &ended {
            board_info!("Session ended for user {}", session.user.id);
        }
        ended
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn bearer(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.token.clone())
    }

    pub fn is_active(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Starts a session for `user_id` with an already issued bearer token.
///
/// The token is attached while the user and their candidate or employer
/// profile are looked up; on failure the context is left signed out.
pub async fn sign_in(
    client: &dyn ResourceClient,
    context: &SessionContext,
    token: &str,
    user_id: &Id,
) -> Result<Session, ApiError> {
    context.begin(Session {
        token: token.to_string(),
        user: User {
            id: user_id.clone(),
            email: String::new(),
            full_name: String::new(),
            role: UserRole::default(),
        },
        candidate_id: None,
        employer_id: None,
    });

    match resolve_session(client, token, user_id).await {
        Ok(session) => {
            context.begin(session.clone());
            Ok(session)
        }
        Err(err) => {
            context.end();
            Err(err)
        }
    }
}

async fn resolve_session(
    client: &dyn ResourceClient,
    token: &str,
    user_id: &Id,
) -> Result<Session, ApiError> {
    let user: User = get_as(client, Resource::Users, user_id).await?;
    let query = [("userId", user_id.as_str())];
    let (candidates, employers) = join(
        list_as::<Candidate>(client, Resource::Candidates, &query),
        list_as::<Employer>(client, Resource::Employers, &query),
    )
    .await;

    Ok(Session {
        token: token.to_string(),
        candidate_id: candidates?.into_iter().next().map(|candidate| candidate.id),
        employer_id: employers?.into_iter().next().map(|employer| employer.id),
        user,
    })
}
