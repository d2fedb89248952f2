use chrono::{NaiveDate, TimeZone, Utc};
use jobboard_core::{
    format_salary, ApplicationStatus, EmploymentType, Id, JobPosting, SavedJob,
};
use serde_json::json;

#[test]
fn job_posting_decodes_api_shape() {
    let raw = json!({
        "id": 7,
        "employerId": "3",
        "title": "Rust Engineer",
        "description": "Systems work",
        "salaryMin": 15,
        "salaryMax": 20.5,
        "salaryCurrency": "million VND",
        "isSalaryNegotiable": false,
        "experienceRequired": "2 years",
        "educationRequired": "Bachelor's Degree",
        "employmentType": "full-time",
        "deadline": "2024-06-30",
        "updatedAt": "2024-05-02T09:00:00Z"
    });

    let posting: JobPosting = serde_json::from_value(raw).unwrap();
    assert_eq!(posting.id, Id::from("7"));
    assert_eq!(posting.employer_id, Some(Id::from(3)));
    assert_eq!(posting.salary_min, Some(15.0));
    assert_eq!(posting.employment_type, Some(EmploymentType::FullTime));
    assert_eq!(posting.deadline, NaiveDate::from_ymd_opt(2024, 6, 30));
    assert_eq!(
        posting.updated_at,
        Some(Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap())
    );
    assert_eq!(posting.requirements, "");
    assert_eq!(format_salary(&posting), "15-20.5 million VND");
}

#[test]
fn malformed_timestamps_and_unknown_kinds_degrade() {
    let raw = json!({
        "id": "x1",
        "title": "Odd",
        "employmentType": "seasonal",
        "updatedAt": "yesterday",
        "deadline": null
    });

    let posting: JobPosting = serde_json::from_value(raw).unwrap();
    assert_eq!(posting.employment_type, Some(EmploymentType::Other));
    assert_eq!(posting.updated_at, None);
    assert_eq!(posting.deadline, None);
    assert!(!posting.is_closed_on(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
}

#[test]
fn saved_job_serializes_ids_as_strings() {
    let saved = SavedJob {
        id: Id::from(5),
        candidate_id: Id::from("c1"),
        job_post_id: Id::from(7),
        saved_at: None,
    };
    let value = serde_json::to_value(&saved).unwrap();
    assert_eq!(value["jobPostId"], json!("7"));
    assert_eq!(value["candidateId"], json!("c1"));
}

#[test]
fn application_status_defaults_to_pending() {
    let app: jobboard_core::Application = serde_json::from_value(json!({
        "id": 1,
        "jobPostId": 2,
        "candidateId": 3
    }))
    .unwrap();
    assert_eq!(app.status, ApplicationStatus::Pending);
    assert!(!app.status.is_final());
}

#[test]
fn epoch_timestamps_decode_instead_of_failing_the_record() {
    let posting: JobPosting = serde_json::from_value(json!({
        "id": 1,
        "title": "Dev",
        "updatedAt": 1714550400000u64,
        "createdAt": 1714550400,
        "deadline": 1719705600000u64
    }))
    .unwrap();
    let expected = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    assert_eq!(posting.updated_at, Some(expected));
    assert_eq!(posting.created_at, Some(expected));
    assert_eq!(posting.deadline, NaiveDate::from_ymd_opt(2024, 6, 30));
}

#[test]
fn unexpected_timestamp_shapes_are_absent() {
    let saved: SavedJob = serde_json::from_value(json!({
        "id": 40,
        "candidateId": "c1",
        "jobPostId": "7",
        "savedAt": {"seconds": 12}
    }))
    .unwrap();
    assert_eq!(saved.saved_at, None);

    let posting: JobPosting =
        serde_json::from_value(json!({"id": 2, "updatedAt": [2024, 5, 1], "deadline": true}))
            .unwrap();
    assert_eq!(posting.updated_at, None);
    assert_eq!(posting.deadline, None);
}

#[test]
fn numeric_ids_normalise_to_one_spelling() {
    let saved: SavedJob = serde_json::from_value(json!({
        "id": -1,
        "candidateId": 3.0,
        "jobPostId": 2.5
    }))
    .unwrap();
    assert_eq!(saved.id, Id::from("-1"));
    assert_eq!(saved.candidate_id, Id::from(3));
    assert_eq!(saved.job_post_id, Id::from("2.5"));
}
