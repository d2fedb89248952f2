use board_logging::board_info;
use chrono::{DateTime, Utc};
use jobboard_core::{Application, ApplicationStatus, ApplicationView, Id, JobPosting};
use serde::Serialize;

use crate::assemble::assemble_applications;
use crate::client::{create_as, decode, encode, get_as, list_as, ResourceClient};
use crate::{ApiError, FailureKind, Resource};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewApplication<'a> {
    job_post_id: &'a Id,
    candidate_id: &'a Id,
    status: ApplicationStatus,
    cover_letter: &'a str,
    resume_url: Option<&'a str>,
    applied_at: DateTime<Utc>,
    last_status_update: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusPatch<'a> {
    status: ApplicationStatus,
    last_status_update: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    employer_notes: Option<&'a str>,
}

/// Files a pending application of `candidate_id` to `job_id`.
///
/// Refused when the candidate already applied or the deadline has passed.
pub async fn submit_application(
    client: &dyn ResourceClient,
    candidate_id: &Id,
    job_id: &Id,
    cover_letter: &str,
    resume_url: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Application, ApiError> {
    let job: JobPosting = get_as(client, Resource::JobPosts, job_id).await?;
    if job.is_closed_on(now.date_naive()) {
        let deadline = job
            .deadline
            .map(|date| date.to_string())
            .unwrap_or_default();
        return Err(ApiError::new(
            FailureKind::Rejected,
            format!("Applications for \"{}\" closed on {deadline}.", job.title),
        ));
    }

    let existing: Vec<Application> = list_as(
        client,
        Resource::Applications,
        &[
            ("candidateId", candidate_id.as_str()),
            ("jobPostId", job_id.as_str()),
        ],
    )
    .await?;
    if !existing.is_empty() {
        return Err(ApiError::new(
            FailureKind::Conflict,
            "You have already applied to this job.",
        ));
    }

    let body = NewApplication {
        job_post_id: job_id,
        candidate_id,
        status: ApplicationStatus::Pending,
        cover_letter,
        resume_url,
        applied_at: now,
        last_status_update: now,
    };
    let created: Application = create_as(client, Resource::Applications, &body).await?;
    board_info!(
        "Candidate {} applied to job {} as application {}",
        candidate_id,
        job_id,
        created.id
    );
    Ok(created)
}

/// Employer review: sets the status and, when given, the notes.
pub async fn update_application_status(
    client: &dyn ResourceClient,
    application_id: &Id,
    status: ApplicationStatus,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Application, ApiError> {
    let patch = encode(&StatusPatch {
        status,
        last_status_update: now,
        employer_notes: notes,
    })?;
    let updated = client
        .patch(Resource::Applications, application_id, patch)
        .await?;
    let application: Application = decode(updated)?;
    board_info!(
        "Application {} moved to {}",
        application.id,
        application.status.label()
    );
    Ok(application)
}

pub async fn load_candidate_applications(
    client: &dyn ResourceClient,
    candidate_id: &Id,
) -> Result<Vec<ApplicationView>, ApiError> {
    let records = client
        .list(
            Resource::Applications,
            &[("candidateId", candidate_id.as_str())],
        )
        .await?;
    Ok(assemble_applications(client, &records).await)
}

pub async fn load_job_applications(
    client: &dyn ResourceClient,
    job_id: &Id,
) -> Result<Vec<ApplicationView>, ApiError> {
    let records = client
        .list(Resource::Applications, &[("jobPostId", job_id.as_str())])
        .await?;
    Ok(assemble_applications(client, &records).await)
}
