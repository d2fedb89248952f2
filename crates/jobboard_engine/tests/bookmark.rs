use chrono::{TimeZone, Utc};
use jobboard_core::{Id, SavedSet};
use jobboard_engine::{
    load_saved_set, toggle_bookmark, ApiSettings, BookmarkState, FailureKind, ReqwestClient,
    SessionContext,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestClient {
    let settings = ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    };
    ReqwestClient::new(settings, SessionContext::new()).expect("client")
}

#[tokio::test]
async fn toggling_twice_restores_saved_set() {
    let server = MockServer::start().await;
    // First lookup: not saved yet. Second lookup: the row created below.
    Mock::given(method("GET"))
        .and(path("/savedJobs"))
        .and(query_param("candidateId", "c1"))
        .and(query_param("jobPostId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/savedJobs"))
        .and(query_param("jobPostId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 40, "candidateId": "c1", "jobPostId": "7", "savedAt": "2024-05-01T08:00:00Z"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/savedJobs"))
        .and(body_partial_json(json!({
            "candidateId": "c1",
            "jobPostId": "7",
            "savedAt": "2024-05-01T08:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 40, "candidateId": "c1", "jobPostId": "7", "savedAt": "2024-05-01T08:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/savedJobs/40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let candidate = Id::from("c1");
    let job = Id::from(7);
    let mut saved: SavedSet = [Id::from(2)].into_iter().collect();
    let before = saved.clone();

    let first = toggle_bookmark(&client, &candidate, &job, &mut saved, now)
        .await
        .expect("save");
    assert_eq!(first, BookmarkState::Saved);
    assert!(saved.contains(&job));

    let second = toggle_bookmark(&client, &candidate, &job, &mut saved, now)
        .await
        .expect("unsave");
    assert_eq!(second, BookmarkState::Unsaved);
    assert_eq!(saved, before);
}

#[tokio::test]
async fn duplicate_rows_are_all_removed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/savedJobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "candidateId": "c1", "jobPostId": 7},
            {"id": 2, "candidateId": "c1", "jobPostId": 7}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/savedJobs/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    // Already gone: still counts as unsaved.
    Mock::given(method("DELETE"))
        .and(path("/savedJobs/2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut saved: SavedSet = [Id::from(7)].into_iter().collect();
    let state = toggle_bookmark(&client, &Id::from("c1"), &Id::from(7), &mut saved, Utc::now())
        .await
        .expect("unsave");

    assert_eq!(state, BookmarkState::Unsaved);
    assert!(saved.is_empty());
}

#[tokio::test]
async fn failed_create_leaves_local_set_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/savedJobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/savedJobs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut saved = SavedSet::new();
    let result =
        toggle_bookmark(&client, &Id::from("c1"), &Id::from(7), &mut saved, Utc::now()).await;

    assert!(result.is_err());
    assert!(saved.is_empty());
}

#[tokio::test]
async fn saved_set_loads_job_ids_once_each() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/savedJobs"))
        .and(query_param("candidateId", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "candidateId": "c1", "jobPostId": 7},
            {"id": 2, "candidateId": "c1", "jobPostId": "7"},
            {"id": 3, "candidateId": "c1", "jobPostId": 9}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let saved = load_saved_set(&client, &Id::from("c1")).await.expect("load");

    assert_eq!(saved.len(), 2);
    assert!(saved.contains(&Id::from(7)));
    assert!(saved.contains(&Id::from(9)));
}

#[tokio::test]
async fn existing_row_with_odd_fields_is_still_unsaved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/savedJobs"))
        .and(query_param("jobPostId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 40, "candidateId": "c1", "jobPostId": "7", "savedAt": {"when": "earlier"}}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/savedJobs/40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/savedJobs"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut saved: SavedSet = [Id::from(7)].into_iter().collect();
    let state = toggle_bookmark(&client, &Id::from("c1"), &Id::from(7), &mut saved, Utc::now())
        .await
        .expect("unsave");

    assert_eq!(state, BookmarkState::Unsaved);
    assert!(saved.is_empty());
}

#[tokio::test]
async fn row_without_id_fails_instead_of_creating_a_duplicate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/savedJobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"candidateId": "c1", "jobPostId": "7"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/savedJobs"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut saved = SavedSet::new();
    let err = toggle_bookmark(&client, &Id::from("c1"), &Id::from(7), &mut saved, Utc::now())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
    assert!(saved.is_empty());
}
