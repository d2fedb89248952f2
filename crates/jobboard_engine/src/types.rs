use std::fmt;

use jobboard_core::{Application, ApplicationView, Id, JobView};

use crate::bookmark::BookmarkState;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SignedIn(Result<Session, ApiError>),
    JobsLoaded(Result<Vec<JobView>, ApiError>),
    SavedJobsLoaded(Result<Vec<Id>, ApiError>),
    BookmarkToggled {
        job_id: Id,
        result: Result<BookmarkState, ApiError>,
    },
    ApplicationsLoaded(Result<Vec<ApplicationView>, ApiError>),
    ApplicationSubmitted(Result<Application, ApiError>),
    ApplicationUpdated(Result<Application, ApiError>),
    /// A request was answered with 401 and the session context was ended.
    SessionExpired,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Text suitable for showing to the user in place of the page content.
    pub fn user_message(&self) -> String {
        match self.kind {
            // These carry a message written for the user already.
            FailureKind::Conflict | FailureKind::Rejected => self.message.clone(),
            _ => self.kind.user_message().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    NotFound,
    Unauthorized,
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Conflict,
    Rejected,
    NoSession,
}

impl FailureKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::InvalidUrl => "The server address is not valid. Check your configuration.",
            FailureKind::HttpStatus(code) if *code >= 500 => {
                "The server ran into a problem. Please try again later."
            }
            FailureKind::HttpStatus(_) => "The request was refused by the server.",
            FailureKind::NotFound => "The requested item no longer exists.",
            FailureKind::Unauthorized => "Your session has expired. Please sign in again.",
            FailureKind::Timeout => "The server took too long to answer.",
            FailureKind::Network => "Could not reach the server. Check your connection.",
            FailureKind::TooLarge { .. } => "The server sent more data than expected.",
            FailureKind::Decode => "The server sent data in an unexpected format.",
            FailureKind::Conflict => "That action was already done.",
            FailureKind::Rejected => "That action is no longer possible.",
            FailureKind::NoSession => "Please sign in first.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Unauthorized => write!(f, "unauthorized"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Conflict => write!(f, "conflict"),
            FailureKind::Rejected => write!(f, "rejected"),
            FailureKind::NoSession => write!(f, "no session"),
        }
    }
}
