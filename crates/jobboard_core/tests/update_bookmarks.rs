use std::sync::Once;

use jobboard_core::{update, AppState, Effect, Id, JobPosting, JobView, Msg, Viewer};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(board_logging::initialize_for_tests);
}

fn candidate() -> Viewer {
    Viewer {
        user_id: Id::from("u1"),
        display_name: "Lan".to_string(),
        candidate_id: Some(Id::from("c1")),
        employer_id: None,
    }
}

fn signed_in_with_jobs() -> AppState {
    let state = AppState::new();
    let (state, _) = update(state, Msg::SessionRestored(Some(candidate())));
    let (state, _) = update(state, Msg::JobBoardOpened);
    let (state, _) = update(
        state,
        Msg::JobsLoaded(Ok(vec![
            JobView::new(JobPosting::new(1, "One")),
            JobView::new(JobPosting::new(2, "Two")),
        ])),
    );
    let (state, _) = update(state, Msg::SavedJobsLoaded(Ok(vec![Id::from(2)])));
    state
}

fn toggle(state: AppState, job_id: u64, now_saved: bool) -> AppState {
    let (state, _) = update(
        state,
        Msg::BookmarkClicked {
            job_id: Id::from(job_id),
        },
    );
    let (state, _) = update(
        state,
        Msg::BookmarkSettled {
            job_id: Id::from(job_id),
            result: Ok(now_saved),
        },
    );
    state
}

#[test]
fn opening_board_loads_jobs_and_saved_set() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SessionRestored(Some(candidate())));
    let (state, effects) = update(state, Msg::JobBoardOpened);

    assert!(state.is_busy());
    assert_eq!(
        effects,
        vec![
            Effect::LoadJobs,
            Effect::LoadSavedJobs {
                candidate_id: Id::from("c1")
            }
        ]
    );
}

#[test]
fn bookmark_click_emits_toggle_effect() {
    init_logging();
    let state = signed_in_with_jobs();
    let (state, effects) = update(
        state,
        Msg::BookmarkClicked {
            job_id: Id::from(1),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::ToggleBookmark {
            candidate_id: Id::from("c1"),
            job_id: Id::from(1),
        }]
    );
    let row = state
        .view()
        .jobs
        .into_iter()
        .find(|row| row.job_id == Id::from(1))
        .unwrap();
    assert!(row.bookmark_pending);
    assert!(!row.is_saved);
}

#[test]
fn second_click_while_in_flight_is_ignored() {
    init_logging();
    let state = signed_in_with_jobs();
    let click = || Msg::BookmarkClicked {
        job_id: Id::from(1),
    };
    let (state, first) = update(state, click());
    let (state, second) = update(state, click());

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());

    let (state, _) = update(
        state,
        Msg::BookmarkSettled {
            job_id: Id::from(1),
            result: Ok(true),
        },
    );
    let (_state, third) = update(state, click());
    assert_eq!(third.len(), 1);
}

#[test]
fn toggling_twice_restores_saved_set() {
    init_logging();
    let state = signed_in_with_jobs();
    let before = state.saved().clone();

    let state = toggle(state, 1, true);
    assert!(state.saved().contains(&Id::from(1)));
    let state = toggle(state, 1, false);

    assert_eq!(state.saved(), &before);
    assert!(!state.is_busy());
}

#[test]
fn failed_toggle_keeps_saved_set_and_shows_notice() {
    init_logging();
    let state = signed_in_with_jobs();
    let (state, _) = update(
        state,
        Msg::BookmarkClicked {
            job_id: Id::from(2),
        },
    );
    let (state, _) = update(
        state,
        Msg::BookmarkSettled {
            job_id: Id::from(2),
            result: Err("Could not reach the server.".to_string()),
        },
    );

    assert!(state.saved().contains(&Id::from(2)));
    assert_eq!(
        state.view().notice.as_deref(),
        Some("Could not reach the server.")
    );
}

#[test]
fn bookmark_without_candidate_profile_is_refused() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::BookmarkClicked {
            job_id: Id::from(1),
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().notice.is_some());
    assert!(!state.is_busy());
}

#[test]
fn stale_settle_after_sign_out_is_ignored() {
    init_logging();
    let state = signed_in_with_jobs();
    let (state, _) = update(
        state,
        Msg::BookmarkClicked {
            job_id: Id::from(1),
        },
    );
    let (state, effects) = update(state, Msg::SessionExpired);
    assert_eq!(effects, vec![Effect::ClearSession]);

    let (state, _) = update(
        state,
        Msg::BookmarkSettled {
            job_id: Id::from(1),
            result: Ok(true),
        },
    );
    assert!(state.saved().is_empty());
    assert!(state.view().signed_out);
}
