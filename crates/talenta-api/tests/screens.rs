//! Screen-level tests: the real router wired to a mocked remote API.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use talenta_api::{create_router, ApiConfig, AppState, MemoryStore, SessionStore};
use talenta_directus::{DirectusClient, DirectusConfig};
use talenta_models::{ManualClock, SharedClock};

fn test_state(server: &MockServer, clock: Arc<ManualClock>) -> AppState {
    let client = DirectusClient::new(DirectusConfig {
        base_url: server.uri(),
        token: "test-token".to_string(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    })
    .unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
    AppState::with_components(ApiConfig::default(), client, clock as SharedClock, store)
}

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post_json(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn posting_json(id: u64, title: &str, status: Value, deadline: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "department": "Engineering",
        "description": "desc",
        "requirements": "Rust",
        "deadline": deadline,
        "date_created": "2025-08-01T00:00:00Z",
        "location": "Jakarta",
        "salary": "kompetitif",
        "employment_type": "full_time",
        "min_education": "S1",
        "experience": "2 tahun",
        "status": status,
    })
}

/// No expired postings, so the pre-list sweep patches nothing.
async fn mount_empty_sweep(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/items/job_postings"))
        .and(query_param("fields", "id,title,deadline,status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn list_screen_annotates_counts_and_splits_by_display_predicate() {
    let server = MockServer::start().await;
    mount_empty_sweep(&server).await;

    Mock::given(method("GET"))
        .and(path("/items/job_postings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                posting_json(1, "Backend Engineer", json!("active"), "2031-01-01T00:00:00Z"),
                posting_json(2, "Legacy Role", Value::Null, "2031-01-01T00:00:00Z"),
                posting_json(3, "Closed Role", json!("inactive"), "2031-01-01T00:00:00Z"),
                posting_json(4, "Expired Role", json!("active"), "2020-01-01T00:00:00Z"),
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items/job_applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"appliedJobId": 1}, {"appliedJobId": 1}, {"appliedJobId": 3}]
        })))
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new("2025-08-07T12:00:00Z".parse().unwrap()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) = get_json(router, "/dashboard/list").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let all = body["job_postings"].as_array().unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0]["applicant_count"], 2);
    assert_eq!(all[1]["applicant_count"], 0);
    assert_eq!(all[2]["applicant_count"], 1);

    // Active: explicit active + null-as-active, both with future deadlines
    let active: Vec<&str> = body["active_job_postings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(active, vec!["Backend Engineer", "Legacy Role"]);

    // Inactive: explicit inactive + past deadline
    let inactive: Vec<&str> = body["inactive_job_postings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(inactive, vec!["Closed Role", "Expired Role"]);
}

#[tokio::test]
async fn list_screen_surfaces_remote_failure_in_the_error_field() {
    let server = MockServer::start().await;
    mount_empty_sweep(&server).await;

    Mock::given(method("GET"))
        .and(path("/items/job_postings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items/job_applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) = get_json(router, "/dashboard/list").await;
    // Load handlers never error out; the screen renders the message
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("database offline"));
    assert!(body["job_postings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_posting_rejects_missing_fields_locally() {
    let server = MockServer::start().await;
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) = post_json(
        router,
        "/dashboard/postings",
        json!({"title": "Backend Engineer"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Semua field diperlukan"));
    // Validation never reached the network
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_posting_returns_created_record_and_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items/job_postings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": posting_json(9, "Backend Engineer", json!("active"), "2031-01-01T00:00:00Z")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) = post_json(
        router,
        "/dashboard/postings",
        json!({
            "title": "Backend Engineer",
            "department": "Engineering",
            "description": "Build services",
            "requirements": "Rust\nSQL",
            "deadline": "2031-01-01T00:00:00Z",
            "location": "Jakarta",
            "salary": "kompetitif",
            "employment_type": "full_time",
            "min_education": "S1",
            "experience": "2 tahun",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    // Item ids are normalized to strings on the way through
    assert_eq!(body["job"]["id"], "9");
    assert_eq!(body["redirect"], "/dashboard/list");
}

#[tokio::test]
async fn accepted_status_uses_the_review_vocabulary_and_special_notice() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/items/job_applications/a1"))
        .and(body_json(json!({"applicationStatus": "accepted"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "a1",
                "fullName": "Siti Rahma",
                "email": "siti@example.com",
                "appliedJobId": 7,
                "applicationStatus": "accepted",
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) = post_json(
        router,
        "/dashboard/candidates/a1/status",
        json!({"status": "lolos", "note": "bagus"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["updated_status"], "accepted");
    assert_eq!(body["updated_note"], "bagus");
    assert!(body["message"].as_str().unwrap().contains("LOLOS"));
}

#[tokio::test]
async fn unknown_review_status_fails_closed() {
    let server = MockServer::start().await;
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) = post_json(
        router,
        "/dashboard/candidates/a1/status",
        json!({"status": "shortlisted"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("shortlisted"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn candidate_detail_is_404_for_missing_applicant() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/job_applications/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) = get_json(router, "/dashboard/candidates/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Data pelamar tidak ditemukan"));
}

#[tokio::test]
async fn candidate_detail_normalizes_assets_and_fetches_job_title() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/job_applications/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "a1",
                "fullName": "Siti Rahma",
                "email": "siti@example.com",
                "appliedJobId": 7,
                "applicationStatus": "interview",
                "profilePhoto": "photo-1",
                "resumeFileUrl": {"id": "f-9"},
                "transcriptUrl": "https://drive.example.com/doc/5",
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items/job_postings/7"))
        .and(query_param("fields", "id,title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 7, "title": "Backend Engineer"}
        })))
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) = get_json(router, "/dashboard/candidates/a1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job_title"], "Backend Engineer");

    let base = server.uri();
    assert_eq!(
        body["applicant"]["profilePhoto"],
        format!("{}/assets/photo-1", base)
    );
    assert_eq!(
        body["applicant"]["resumeFileUrl"],
        format!("{}/assets/f-9", base)
    );
    // External URLs pass through untouched
    assert_eq!(
        body["applicant"]["transcriptUrl"],
        "https://drive.example.com/doc/5"
    );
}

#[tokio::test]
async fn applications_screen_loads_job_applicant_and_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/job_postings/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": posting_json(7, "Backend Engineer", json!("active"), "2031-01-01T00:00:00Z")
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items/job_applications"))
        .and(query_param("filter[appliedJobId][_eq]", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "a1",
                "fullName": "Siti Rahma",
                "email": "siti@example.com",
                "appliedJobId": 7,
                "applicationStatus": "pending",
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items/job_applications/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "a1",
                "fullName": "Siti Rahma",
                "email": "siti@example.com",
                "appliedJobId": 7,
                "applicationStatus": "pending",
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items/application_documents"))
        .and(query_param("filter[application_id][_eq]", "a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "application_id": "a1", "document_id": {"id": "f-1"}}]
        })))
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) =
        get_json(router, "/dashboard/applications?job_id=7&applicant_id=a1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected_job"]["title"], "Backend Engineer");
    assert_eq!(body["applications"].as_array().unwrap().len(), 1);
    assert_eq!(body["applicant"]["id"], "a1");
    assert_eq!(body["supporting_documents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn auth_flow_round_trip() {
    let server = MockServer::start().await;
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let state = test_state(&server, clock);

    // Lowercase code matches the allow-list case-insensitively
    let (status, body) = post_json(
        create_router(state.clone(), None),
        "/auth/login",
        json!({"code": "hrd2025"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Berhasil masuk ke dashboard");

    let (_, body) = get_json(create_router(state.clone(), None), "/auth/session").await;
    assert_eq!(body["authenticated"], true);

    let (status, _) = post_json(create_router(state.clone(), None), "/auth/logout", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(create_router(state, None), "/auth/session").await;
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn empty_access_code_is_a_validation_error() {
    let server = MockServer::start().await;
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) = post_json(router, "/auth/login", json!({"code": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Kode akses harus diisi"));
}

#[tokio::test]
async fn wrong_access_code_is_unauthorized() {
    let server = MockServer::start().await;
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let router = create_router(test_state(&server, clock), None);

    let (status, body) = post_json(router, "/auth/login", json!({"code": "LETMEIN"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].as_str().unwrap().contains("Kode akses tidak valid"));
}
