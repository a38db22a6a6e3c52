use crate::common::quick_suite_settings;
use crate::fake_reqres::FakeReqres;
use crate::helpers::{assert_violation, spawn_target};
use claims::assert_ok;
use reqres_contract::api_client::ApiClient;
use reqres_contract::contract::ContractViolation;
use reqres_contract::scenarios::{ScenarioError, delayed_list_users};
use std::time::Duration;

#[tokio::test]
async fn delayed_list_users_passes_when_the_service_is_fast() {
    // Arrange
    let target = spawn_target(FakeReqres::default().latency(Duration::from_millis(100))).await;

    // Act
    let outcome = delayed_list_users(&target.client, &quick_suite_settings()).await;

    // Assert
    assert_ok!(outcome);
}

#[tokio::test]
async fn delayed_list_users_asks_for_the_configured_delay() {
    // Arrange
    let target = spawn_target(FakeReqres::default()).await;

    // Act
    delayed_list_users(&target.client, &quick_suite_settings())
        .await
        .unwrap();

    // Assert
    let requests = target.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), Some("delay=1"));
}

#[tokio::test]
async fn delayed_list_users_fails_when_the_service_is_too_slow() {
    // Arrange
    let target = spawn_target(FakeReqres::default().latency(Duration::from_millis(1_200))).await;

    // Act
    let violation =
        assert_violation(delayed_list_users(&target.client, &quick_suite_settings()).await);

    // Assert
    match violation {
        ContractViolation::TooSlow {
            message,
            elapsed,
            bound,
        } => {
            assert_eq!(message, "Response time is more than 1 sec.");
            assert!(elapsed >= bound);
            assert_eq!(bound, Duration::from_secs(1));
        }
        other => panic!("Expected the response to be too slow, got {:?}", other),
    }
}

#[tokio::test]
async fn a_timeout_is_a_transport_failure() {
    // Arrange
    let target = spawn_target(FakeReqres::default().latency(Duration::from_secs(2))).await;
    let impatient_client =
        ApiClient::new(target.server.uri(), Duration::from_millis(200)).unwrap();

    // Act
    let outcome = delayed_list_users(&impatient_client, &quick_suite_settings()).await;

    // Assert
    match outcome {
        Err(ScenarioError::Transport(e)) => assert!(e.is_timeout()),
        other => panic!("Expected a timeout, got {:?}", other),
    }
}
