use board_logging::{board_info, board_warn};
use chrono::{DateTime, Utc};
use jobboard_core::{Id, SavedJob, SavedSet};
use serde::Serialize;

use crate::assemble::id_field;
use crate::client::{create_as, ResourceClient};
use crate::{ApiError, FailureKind, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkState {
    Saved,
    Unsaved,
}

impl BookmarkState {
    pub fn is_saved(self) -> bool {
        self == BookmarkState::Saved
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewSavedJob<'a> {
    candidate_id: &'a Id,
    job_post_id: &'a Id,
    saved_at: DateTime<Utc>,
}

/// Job ids bookmarked by `candidate_id` according to the API.
pub async fn load_saved_set(
    client: &dyn ResourceClient,
    candidate_id: &Id,
) -> Result<SavedSet, ApiError> {
    let rows = client
        .list(Resource::SavedJobs, &[("candidateId", candidate_id.as_str())])
        .await?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let job_id = id_field(row, "jobPostId");
            if job_id.is_none() {
                board_warn!("Saved job row {:?} has no job id", row.get("id"));
            }
            job_id
        })
        .collect())
}

/// Flips the bookmark of `job_id` on the API and returns the new state.
///
/// Existing rows for the pair are all deleted, which also repairs duplicates
/// left behind by older clients. Only each row's id is read, so a row with
/// odd fields still counts as a bookmark.
pub async fn toggle_saved_job(
    client: &dyn ResourceClient,
    candidate_id: &Id,
    job_id: &Id,
    now: DateTime<Utc>,
) -> Result<BookmarkState, ApiError> {
    let rows = client
        .list(
            Resource::SavedJobs,
            &[
                ("candidateId", candidate_id.as_str()),
                ("jobPostId", job_id.as_str()),
            ],
        )
        .await?;
    let existing = rows
        .iter()
        .map(|row| {
            id_field(row, "id").ok_or_else(|| {
                ApiError::new(
                    FailureKind::Decode,
                    format!("saved job row without an id for job {job_id}"),
                )
            })
        })
        .collect::<Result<Vec<Id>, ApiError>>()?;

    if existing.is_empty() {
        let body = NewSavedJob {
            candidate_id,
            job_post_id: job_id,
            saved_at: now,
        };
        let created: SavedJob = create_as(client, Resource::SavedJobs, &body).await?;
        board_info!("Saved job {} for candidate {} as {}", job_id, candidate_id, created.id);
        return Ok(BookmarkState::Saved);
    }

    if existing.len() > 1 {
        board_warn!(
            "Found {} bookmarks of job {} for candidate {}; removing all",
            existing.len(),
            job_id,
            candidate_id
        );
    }
    for row_id in &existing {
        match client.delete(Resource::SavedJobs, row_id).await {
            Ok(()) => {}
            // Someone else removed it first; the outcome is the same.
            Err(err) if err.kind == FailureKind::NotFound => {}
            Err(err) => return Err(err),
        }
    }
    board_info!("Unsaved job {} for candidate {}", job_id, candidate_id);
    Ok(BookmarkState::Unsaved)
}

/// [`toggle_saved_job`], applied to a local saved-set on success.
pub async fn toggle_bookmark(
    client: &dyn ResourceClient,
    candidate_id: &Id,
    job_id: &Id,
    saved: &mut SavedSet,
    now: DateTime<Utc>,
) -> Result<BookmarkState, ApiError> {
    let state = toggle_saved_job(client, candidate_id, job_id, now).await?;
    match state {
        BookmarkState::Saved => saved.insert(job_id.clone()),
        BookmarkState::Unsaved => saved.remove(job_id),
    };
    Ok(state)
}
