use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use jobboard_core::{Id, User, UserRole};
use jobboard_engine::{
    ApiSettings, BookmarkState, EngineCommand, EngineConfig, EngineEvent, EngineHandle,
    FailureKind, Session, SessionContext,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session() -> Session {
    Session {
        token: "tok-0123456789".to_string(),
        user: User {
            id: Id::from(1),
            email: "lan@example.com".to_string(),
            full_name: "Lan".to_string(),
            role: UserRole::Candidate,
        },
        candidate_id: Some(Id::from("c1")),
        employer_id: None,
    }
}

fn engine_for(server: &MockServer, context: SessionContext) -> EngineHandle {
    let mut config = EngineConfig::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    });
    config.clock = Arc::new(|| Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
    EngineHandle::new(config, context).expect("engine")
}

async fn collect_events(engine: &EngineHandle, count: usize) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while events.len() < count && Instant::now() < deadline {
        match engine.try_recv() {
            Some(event) => events.push(event),
            None => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    events
}

#[tokio::test]
async fn load_jobs_reports_assembled_views() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobPosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Rust Engineer"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobCategories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobLocations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let engine = engine_for(&server, SessionContext::new());
    engine.send(EngineCommand::LoadJobs { employer_id: None });

    let events = collect_events(&engine, 1).await;
    match events.as_slice() {
        [EngineEvent::JobsLoaded(Ok(views))] => {
            assert_eq!(views.len(), 1);
            assert_eq!(views[0].job.title, "Rust Engineer");
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[tokio::test]
async fn bookmark_toggle_uses_engine_clock() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/savedJobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/savedJobs"))
        .and(body_partial_json(json!({"savedAt": "2024-05-01T08:00:00Z"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9, "candidateId": "c1", "jobPostId": "7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine_for(&server, SessionContext::with_session(session()));
    engine.send(EngineCommand::ToggleBookmark {
        candidate_id: Id::from("c1"),
        job_id: Id::from(7),
    });

    let events = collect_events(&engine, 1).await;
    assert_eq!(
        events,
        vec![EngineEvent::BookmarkToggled {
            job_id: Id::from(7),
            result: Ok(BookmarkState::Saved),
        }]
    );
}

#[tokio::test]
async fn unauthorized_response_emits_session_expired() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobPosts"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let context = SessionContext::with_session(session());
    let engine = engine_for(&server, context.clone());
    engine.send(EngineCommand::LoadJobs { employer_id: None });

    let events = collect_events(&engine, 2).await;
    assert_eq!(events.len(), 2);
    match &events[0] {
        EngineEvent::JobsLoaded(Err(err)) => assert_eq!(err.kind, FailureKind::Unauthorized),
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(events[1], EngineEvent::SessionExpired);
    assert!(!engine.session().is_active());
}
