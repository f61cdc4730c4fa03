use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use session_cell::models::{
    AppendEegRequest, SessionError, SessionStatus, StartSessionRequest,
};
use session_cell::services::session::SessionService;
use shared_utils::test_utils::TestConfig;

fn test_service(mock_server: &MockServer) -> SessionService {
    let test_config = TestConfig::default();
    let mut config = test_config.to_app_config();
    config.supabase_url = mock_server.uri();
    SessionService::new(&config)
}

fn session_row(
    session_id: &Uuid,
    patient_id: &Uuid,
    status: &str,
    focus_alert: Option<&str>,
) -> serde_json::Value {
    json!({
        "id": session_id,
        "patient_id": patient_id,
        "therapist_id": Uuid::new_v4(),
        "issue_type": "Focus",
        "eeg_data": [],
        "status": status,
        "focus_alert": focus_alert,
        "created_at": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_start_session_creates_active_record() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();
    let session_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/sessions"))
        .and(body_partial_json(json!({ "status": "active", "eeg_data": [] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            session_row(&session_id, &patient_id, "active", None)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = test_service(&mock_server);
    let session = service
        .start_session(
            patient_id,
            StartSessionRequest {
                therapist_id: Uuid::new_v4(),
                issue_type: session_cell::models::IssueType::Focus,
            },
            "token",
        )
        .await
        .expect("session should start");

    assert_eq!(session.status, SessionStatus::Active);
    assert!(session.eeg_data.is_empty());
}

#[tokio::test]
async fn test_low_signal_sets_focus_alert() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();
    let session_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sessions"))
        .and(query_param("id", format!("eq.{}", session_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            session_row(&session_id, &patient_id, "active", None)
        ])))
        .mount(&mock_server)
        .await;

    let mut updated = session_row(
        &session_id,
        &patient_id,
        "active",
        Some("Focus dropped! Please refocus."),
    );
    updated["eeg_data"] = json!([{ "signal": 42.0, "timestamp_ms": 1700000000000i64 }]);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/sessions"))
        .and(body_partial_json(
            json!({ "focus_alert": "Focus dropped! Please refocus." }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = test_service(&mock_server);
    let session = service
        .append_eeg(session_id, patient_id, AppendEegRequest { signal: 42.0 }, "token")
        .await
        .expect("append should succeed");

    assert_eq!(
        session.focus_alert.as_deref(),
        Some("Focus dropped! Please refocus.")
    );
    assert_eq!(session.eeg_data.len(), 1);
}

#[tokio::test]
async fn test_healthy_signal_leaves_alert_untouched() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();
    let session_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sessions"))
        .and(query_param("id", format!("eq.{}", session_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            session_row(&session_id, &patient_id, "active", None)
        ])))
        .mount(&mock_server)
        .await;

    let mut updated = session_row(&session_id, &patient_id, "active", None);
    updated["eeg_data"] = json!([{ "signal": 75.0, "timestamp_ms": 1700000000000i64 }]);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = test_service(&mock_server);
    let session = service
        .append_eeg(session_id, patient_id, AppendEegRequest { signal: 75.0 }, "token")
        .await
        .expect("append should succeed");

    assert!(session.focus_alert.is_none());
}

#[tokio::test]
async fn test_append_to_ended_session_fails_without_write() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();
    let session_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sessions"))
        .and(query_param("id", format!("eq.{}", session_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            session_row(&session_id, &patient_id, "ended", None)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/sessions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = test_service(&mock_server);
    let result = service
        .append_eeg(session_id, patient_id, AppendEegRequest { signal: 60.0 }, "token")
        .await;

    assert_matches!(result, Err(SessionError::SessionEnded));
}

#[tokio::test]
async fn test_append_by_other_patient_is_unauthorized() {
    let mock_server = MockServer::start().await;
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let session_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sessions"))
        .and(query_param("id", format!("eq.{}", session_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            session_row(&session_id, &owner, "active", None)
        ])))
        .mount(&mock_server)
        .await;

    let service = test_service(&mock_server);
    let result = service
        .append_eeg(session_id, stranger, AppendEegRequest { signal: 60.0 }, "token")
        .await;

    assert_matches!(result, Err(SessionError::Unauthorized));
}

#[tokio::test]
async fn test_end_session_patches_status() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();
    let session_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sessions"))
        .and(query_param("id", format!("eq.{}", session_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            session_row(&session_id, &patient_id, "active", None)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/sessions"))
        .and(body_partial_json(json!({ "status": "ended" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            session_row(&session_id, &patient_id, "ended", None)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = test_service(&mock_server);
    let session = service
        .end_session(session_id, patient_id, "token")
        .await
        .expect("end should succeed");

    assert_eq!(session.status, SessionStatus::Ended);
}
