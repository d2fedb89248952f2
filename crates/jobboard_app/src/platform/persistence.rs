use board_logging::{board_error, board_info, board_warn, redact};
use jobboard_engine::{Session, StateDir};

const SESSION_FILENAME: &str = "session.ron";

/// Load the stored session; unreadable or malformed files count as signed out.
pub(crate) fn load_session(state: &StateDir) -> Option<Session> {
    let content = match state.read(SESSION_FILENAME) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            board_warn!("Failed to read session from {:?}: {}", state.path(), err);
            return None;
        }
    };

    match ron::from_str::<Session>(&content) {
        Ok(session) => {
            board_info!(
                "Restored session for user {} (token {})",
                session.user.id,
                redact(&session.token)
            );
            Some(session)
        }
        Err(err) => {
            board_warn!("Failed to parse session in {:?}: {}", state.path(), err);
            None
        }
    }
}

pub(crate) fn save_session(state: &StateDir, session: &Session) -> anyhow::Result<()> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(session, pretty)?;
    state.write(SESSION_FILENAME, &content)?;
    board_info!("Saved session for user {}", session.user.id);
    Ok(())
}

/// Remove the stored session. Returns whether a file was there.
pub(crate) fn clear_session(state: &StateDir) -> bool {
    match state.remove(SESSION_FILENAME) {
        Ok(removed) => removed,
        Err(err) => {
            board_error!("Failed to remove session in {:?}: {}", state.path(), err);
            false
        }
    }
}
