use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use confirmation_cell::models::{ConfirmationError, ConfirmationStatus};
use confirmation_cell::ConfirmationTokenService;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn service_for(mock_server: &MockServer) -> ConfirmationTokenService {
    let mut test_config = TestConfig::default();
    test_config.supabase_url = mock_server.uri();
    ConfirmationTokenService::new(&test_config.to_app_config())
}

#[tokio::test]
async fn issue_regenerates_and_resend_returns_unchanged() {
    let mock_server = MockServer::start().await;
    let appointment_id = Uuid::new_v4();

    // every issue clears the previous token first
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/confirmation_tokens"))
        .and(query_param("appointment_id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&mock_server)
        .await;

    // first insert yields tok-A, second insert yields tok-B
    Mock::given(method("POST"))
        .and(path("/rest/v1/confirmation_tokens"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::token_row("tok-A", appointment_id)
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/confirmation_tokens"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::token_row("tok-B", appointment_id)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/confirmation_tokens"))
        .and(query_param("appointment_id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::token_row("tok-A", appointment_id)
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);

    let first = service.issue(appointment_id, None).await.unwrap();
    assert_eq!(first.token, "tok-A");

    // resend does not mint anything
    let resent = service.resend(appointment_id, None).await.unwrap();
    assert_eq!(resent.token, first.token);

    let second = service.issue(appointment_id, None).await.unwrap();
    assert_ne!(second.token, first.token);
}

#[tokio::test]
async fn resend_without_active_token_is_not_found() {
    let mock_server = MockServer::start().await;
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/confirmation_tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);

    let result = service.resend(appointment_id, None).await;
    assert_matches!(result, Err(ConfirmationError::NotFound));
}

#[tokio::test]
async fn resolve_joins_snapshot_and_is_idempotent() {
    let mock_server = MockServer::start().await;
    let appointment_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();
    let professional_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/confirmation_tokens"))
        .and(query_param("token", "eq.tok-A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::token_row("tok-A", appointment_id)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row(
                appointment_id,
                patient_id,
                professional_id,
                "pending",
                None,
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "full_name": "María Pérez" }
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);

    let first = service.resolve("tok-A").await.unwrap();
    assert_eq!(first.patient_name, "María Pérez");
    assert_eq!(first.status, ConfirmationStatus::Pending);
    assert_eq!(first.service, None);

    let second = service.resolve("tok-A").await.unwrap();
    assert_eq!(second.patient_name, first.patient_name);
    assert_eq!(second.date, first.date);
    assert_eq!(second.time, first.time);
    assert_eq!(second.status, first.status);
}

#[tokio::test]
async fn unknown_and_stale_tokens_resolve_not_found() {
    let mock_server = MockServer::start().await;
    let appointment_id = Uuid::new_v4();

    // unknown token: no token row
    Mock::given(method("GET"))
        .and(path("/rest/v1/confirmation_tokens"))
        .and(query_param("token", "eq.unknown"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    // stale token: row exists but the appointment was released
    Mock::given(method("GET"))
        .and(path("/rest/v1/confirmation_tokens"))
        .and(query_param("token", "eq.stale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::token_row("stale", appointment_id)
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);

    assert_matches!(service.resolve("unknown").await, Err(ConfirmationError::NotFound));
    assert_matches!(service.resolve("stale").await, Err(ConfirmationError::NotFound));
}

#[tokio::test]
async fn confirmation_url_uses_public_base() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    assert_eq!(
        service.confirmation_url("tok-A"),
        "https://agenda.example.com/confirmar/tok-A"
    );
}
