use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path};

use dashboard_cell::{DashboardController, DashboardError, TransitionOutcome, ViewSelector};
use shared_resource::FetchError;
use shared_utils::test_utils::{TestConfig, MockConsultationApiResponses as Api};

const PSYCHOLOGISTS: &str = "/consultationManagement/psychologists";
const USERS: &str = "/consultationManagement/getUser";
const CONSULTATIONS: &str = "/consultationManagement/getConsultations";

fn controller_for(server: &MockServer) -> DashboardController {
    DashboardController::new(&TestConfig::with_api_url(server.uri()).to_app_config())
}

async fn mount_json(server: &MockServer, endpoint: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_directory(server: &MockServer) {
    mount_json(server, PSYCHOLOGISTS, 200, Api::psychologists_response(vec![
        Api::psychologist("p1", "drsmith", true),
        Api::psychologist("p2", "drjones", true),
    ])).await;
    mount_json(server, USERS, 200, Api::users_response(vec![
        Api::user("u1", "alice", 2),
        Api::user("u2", "bob", 0),
    ])).await;
    mount_json(server, CONSULTATIONS, 200, Api::consultations_response(vec![
        Api::consultation("c1", "u1", "p1"),
        Api::consultation("c2", "u2", "p1"),
        Api::consultation("c3", "u1", "p2"),
    ])).await;
}

#[tokio::test]
async fn test_psychologists_transition_attaches_counts() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server).await;
    let controller = controller_for(&mock_server);

    let outcome = controller.select_view(ViewSelector::Psychologists).await;

    assert_eq!(outcome, TransitionOutcome::Applied);
    let totals = controller
        .inspect(|state| {
            state.psychologists()
                .iter()
                .map(|row| (row.key.clone(), row.record.total_consultations))
                .collect::<Vec<_>>()
        })
        .await;
    assert_eq!(totals, vec![("p1".to_string(), Some(2)), ("p2".to_string(), Some(1))]);
    // counting does not populate the held consultations
    assert!(controller.inspect(|state| state.consultations().is_empty()).await);
}

#[tokio::test]
async fn test_users_transition_attaches_child_counts() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server).await;
    let controller = controller_for(&mock_server);

    let outcome = controller.select_view(ViewSelector::Users).await;

    assert_eq!(outcome, TransitionOutcome::Applied);
    let totals = controller
        .inspect(|state| state.users().iter().map(|row| row.record.total_children).collect::<Vec<_>>())
        .await;
    assert_eq!(totals, vec![Some(2), Some(0)]);
}

#[tokio::test]
async fn test_consultations_transition_enriches_every_record() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server).await;
    let controller = controller_for(&mock_server);

    let outcome = controller.select_view(ViewSelector::Consultations).await;

    assert_eq!(outcome, TransitionOutcome::Applied);
    controller.inspect(|state| {
        let rows = state.consultations();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].key, "c1");
        assert_eq!(rows[0].record.user_name, "alice");
        assert_eq!(rows[0].record.user_email, "alice@family.example");
        assert_eq!(rows[0].record.psychologist_name, "drsmith");
        assert_eq!(rows[2].record.psychologist_email, "drjones@clinic.example");
    }).await;
}

#[tokio::test]
async fn test_consultations_transition_tolerates_missing_data_fields() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, PSYCHOLOGISTS, 200, json!({})).await;
    mount_json(&mock_server, USERS, 200, json!({ "data": null })).await;
    mount_json(&mock_server, CONSULTATIONS, 200, json!([{
        "_id": "c1",
        "userId": { "_id": "u1", "email": "embedded@family.example" },
        "psychologistId": "p1"
    }])).await;
    let controller = controller_for(&mock_server);

    let outcome = controller.select_view(ViewSelector::Consultations).await;

    assert_eq!(outcome, TransitionOutcome::Applied);
    controller.inspect(|state| {
        let row = &state.consultations()[0].record;
        assert_eq!(row.user_name, "N/A");
        assert_eq!(row.user_email, "embedded@family.example");
        assert_eq!(row.psychologist_email, "N/A");
    }).await;
}

#[tokio::test]
async fn test_one_failed_fetch_fails_the_consultations_transition() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, PSYCHOLOGISTS, 200, Api::psychologists_response(vec![
        Api::psychologist("p1", "drsmith", true),
    ])).await;
    mount_json(&mock_server, CONSULTATIONS, 200, Api::consultations_response(vec![
        Api::consultation("c1", "u1", "p1"),
    ])).await;
    mount_json(&mock_server, USERS, 500, Api::error_response("users unavailable")).await;
    let controller = controller_for(&mock_server);

    assert_eq!(controller.select_view(ViewSelector::Psychologists).await, TransitionOutcome::Applied);
    let outcome = controller.select_view(ViewSelector::Consultations).await;

    assert_matches!(
        outcome,
        TransitionOutcome::Failed(DashboardError::Fetch(FetchError::HttpStatus { status: 500, .. }))
    );

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.table.view, ViewSelector::Consultations);
    assert!(snapshot.table.rows.is_empty());
    assert!(!snapshot.table.loading);
    assert_eq!(snapshot.notices.len(), 1);
    assert_eq!(snapshot.notices[0].message, "Failed to load consultations");

    // the psychologists loaded earlier are still there
    assert_eq!(controller.inspect(|state| state.psychologists().len()).await, 1);
}

#[tokio::test]
async fn test_wrapped_consultations_payload_is_shape_error() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, PSYCHOLOGISTS, 200, Api::psychologists_response(vec![])).await;
    mount_json(&mock_server, USERS, 200, Api::users_response(vec![])).await;
    mount_json(&mock_server, CONSULTATIONS, 200, json!({ "data": [] })).await;
    let controller = controller_for(&mock_server);

    let outcome = controller.select_view(ViewSelector::Consultations).await;

    assert_matches!(outcome, TransitionOutcome::Failed(ref err) if err.is_shape());
}

#[tokio::test]
async fn test_network_failure_becomes_notice() {
    let controller = DashboardController::new(&TestConfig::default().to_app_config());

    let outcome = controller.select_view(ViewSelector::Users).await;

    assert_matches!(outcome, TransitionOutcome::Failed(ref err) if err.is_network());
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.notices[0].message, "Failed to load users");
}

#[tokio::test]
async fn test_superseded_fetch_is_not_applied() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PSYCHOLOGISTS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(Api::psychologists_response(vec![Api::psychologist("p1", "drsmith", true)]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;
    mount_json(&mock_server, CONSULTATIONS, 200, Api::consultations_response(vec![])).await;
    mount_json(&mock_server, USERS, 200, Api::users_response(vec![Api::user("u1", "alice", 1)])).await;
    let controller = Arc::new(controller_for(&mock_server));

    let slow = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.select_view(ViewSelector::Psychologists).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(controller.select_view(ViewSelector::Users).await, TransitionOutcome::Applied);
    assert_eq!(slow.await.unwrap(), TransitionOutcome::Superseded);

    controller.inspect(|state| {
        assert_eq!(state.view(), ViewSelector::Users);
        assert!(state.psychologists().is_empty());
        assert_eq!(state.users().len(), 1);
    }).await;
}

#[tokio::test]
async fn test_drill_down_uses_held_consultations() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server).await;
    let controller = controller_for(&mock_server);
    controller.select_view(ViewSelector::Consultations).await;

    mock_server.reset().await;
    controller.view_consultations_for("p1").await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.table.title, "FilteredConsultations");
    let keys: Vec<&str> = snapshot.table.rows.iter().map(|row| row.key.as_str()).collect();
    assert_eq!(keys, vec!["c1", "c2"]);
    assert!(mock_server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_deactivate_patches_in_place() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server).await;
    Mock::given(method("PUT"))
        .and(path("/consultationManagement/psychologists/inactivate/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let controller = controller_for(&mock_server);
    controller.select_view(ViewSelector::Psychologists).await;

    let result = controller.deactivate("p1").await;

    assert!(result.is_ok());
    controller.inspect(|state| {
        let p1 = &state.psychologists()[0].record;
        assert!(!p1.is_active);
        assert_eq!(p1.total_consultations, Some(2));
        assert!(state.psychologists()[1].record.is_active);
    }).await;
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.notices[0].message, "Psychologist has been successfully inactivated.");
}

#[tokio::test]
async fn test_failed_deactivate_changes_nothing() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server).await;
    Mock::given(method("PUT"))
        .and(path("/consultationManagement/psychologists/inactivate/p1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(Api::error_response("Psychologist not found")))
        .mount(&mock_server)
        .await;
    let controller = controller_for(&mock_server);
    controller.select_view(ViewSelector::Psychologists).await;

    let err = controller.deactivate("p1").await.unwrap_err();

    assert_eq!(err.server_message(), Some("Psychologist not found"));
    assert!(controller.inspect(|state| state.psychologists()[0].record.is_active).await);
    let snapshot = controller.snapshot().await;
    assert!(snapshot.notices[0].is_error());
    assert!(!snapshot.table.loading);
}

#[tokio::test]
async fn test_off_type_display_fields_still_render() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, PSYCHOLOGISTS, 200, json!({ "data": [
        { "_id": "p1", "username": "drsmith", "email": "drsmith@clinic.example", "isActive": null }
    ]})).await;
    mount_json(&mock_server, USERS, 200, Api::users_response(vec![Api::user("u1", "alice", 1)])).await;
    mount_json(&mock_server, CONSULTATIONS, 200, json!([
        { "_id": "c1", "userId": "u1", "psychologistId": "p1", "rating": "5", "timeSlot": null },
        { "_id": "c2", "userId": "u1", "psychologistId": "p1", "verifiedByUser": "yes" }
    ])).await;
    let controller = controller_for(&mock_server);

    assert_eq!(controller.select_view(ViewSelector::Psychologists).await, TransitionOutcome::Applied);
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.table.rows[0].cells[3], "2");
    assert_eq!(snapshot.table.rows[0].cells[4], "Inactive");

    assert_eq!(controller.select_view(ViewSelector::Consultations).await, TransitionOutcome::Applied);
    let snapshot = controller.snapshot().await;
    let keys: Vec<&str> = snapshot.table.rows.iter().map(|row| row.key.as_str()).collect();
    assert_eq!(keys, vec!["c1", "c2"]);
    assert_eq!(snapshot.table.rows[0].cells[10], "5");
    assert_eq!(snapshot.table.rows[0].cells[5], "N/A");
    assert_eq!(snapshot.table.rows[1].cells[8], "Yes");
    assert_eq!(snapshot.table.rows[1].cells[2], "drsmith");
}
