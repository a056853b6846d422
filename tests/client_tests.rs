//! Resource client and provisioning tests against a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use gather::{
    BatchConfig, ClientConfig, Error, GatherClient, GuestRole, NewGuest, ProvisionPlan,
    Provisioner, RateLedger, RateTier, SafetySettings, SpaceConfig, WebhookRequest,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder("gt_test_key")
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .max_retries(2)
        .base_backoff(Duration::from_millis(10))
        .build()
        .unwrap()
}

fn test_client(server: &MockServer) -> GatherClient {
    GatherClient::new(test_config(server)).unwrap()
}

fn space_body() -> serde_json::Value {
    json!({
        "id": "s1",
        "name": "Team HQ",
        "url": "https://app.gather.town/app/s1/Team-HQ",
        "createdAt": "2024-01-15T10:30:00Z"
    })
}

// ============================================================================
// Spaces
// ============================================================================

#[tokio::test]
async fn test_create_and_get_space() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/spaces"))
        .and(body_partial_json(json!({"name": "Team HQ", "isPrivate": true})))
        .respond_with(ResponseTemplate::new(201).set_body_json(space_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/spaces/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": space_body()})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let created = client.spaces().create(&SpaceConfig::private("Team HQ")).await.unwrap();
    let fetched = client.spaces().get(&created.id).await.unwrap();

    assert_eq!(created, fetched);
    assert!(fetched.created_at.is_some());
}

#[tokio::test]
async fn test_apply_safety_settings() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/spaces/s1"))
        .and(body_partial_json(json!({
            "safety": {"moderationEnabled": true, "allowGuestBuild": false}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(space_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client
        .spaces()
        .apply_safety_settings("s1", &SafetySettings::recommended())
        .await
        .unwrap();
}

// ============================================================================
// Guests
// ============================================================================

#[tokio::test]
async fn test_list_guests_wrapped_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spaces/s1/guests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "guests": [
                {"id": "g1", "email": "a@x.io", "role": "moderator"},
                {"id": "g2", "email": "b@x.io", "role": "guest"}
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let guests = client.guests().list("s1").await.unwrap();

    assert_eq!(guests.len(), 2);
    assert_eq!(guests[0].role, GuestRole::Moderator);
}

#[tokio::test]
async fn test_remove_guest() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/spaces/s1/guests/g2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.guests().remove("s1", "g2").await.unwrap();
}

#[tokio::test]
async fn test_bulk_add_reports_each_guest() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/spaces/s1/guests"))
        .and(body_partial_json(json!({"email": "dup@x.io"})))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"error": "duplicate guest"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/spaces/s1/guests"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "g", "email": "someone@x.io", "role": "guest"
        })))
        .expect(4)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let guests: Vec<NewGuest> = ["a@x.io", "b@x.io", "dup@x.io", "c@x.io", "d@x.io"]
        .into_iter()
        .map(|email| NewGuest::new(email, GuestRole::Guest))
        .collect();
    let batch = BatchConfig {
        batch_size: 2,
        delay: Duration::from_millis(5),
    };

    let report = client.guests().add_many("s1", &guests, &batch).await;

    assert_eq!(report.added.len(), 4);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].email, "dup@x.io");
    assert_eq!(report.failed[0].error.status(), Some(409));
}

// ============================================================================
// Webhooks
// ============================================================================

#[tokio::test]
async fn test_register_webhook() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .and(body_partial_json(json!({"events": ["guest.joined"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "wh-1",
            "url": "https://hooks.example.com/gather",
            "events": ["guest.joined"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let webhook = client
        .webhooks()
        .register(&WebhookRequest {
            url: "https://hooks.example.com/gather".to_string(),
            events: vec!["guest.joined".to_string()],
            space_id: Some("s1".to_string()),
            secret: None,
        })
        .await
        .unwrap();

    assert_eq!(webhook.id, "wh-1");
    assert!(webhook.active);
}

// ============================================================================
// Rate Ledger
// ============================================================================

#[tokio::test]
async fn test_rate_limited_client_stops_before_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spaces/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(space_body()))
        .expect(2)
        .mount(&server)
        .await;

    let mut ledger = RateLedger::default();
    ledger.set_tier("trial", RateTier::new(2, Duration::from_secs(60)));
    let ledger = Arc::new(ledger);

    let client = GatherClient::with_rate_limit(test_config(&server), Arc::clone(&ledger), "trial")
        .unwrap();

    client.spaces().get("s1").await.unwrap();
    client.spaces().get("s1").await.unwrap();
    let err = client.spaces().get("s1").await.unwrap_err();

    match err {
        Error::RateLimitExceeded { tier, retry_after } => {
            assert_eq!(tier, "trial");
            assert!(retry_after <= Duration::from_secs(60));
        }
        other => panic!("expected client-side rate limit, got {other:?}"),
    }
    assert_eq!(ledger.status("trial").await.remaining, 0);
}

#[tokio::test]
async fn test_retries_do_not_consume_ledger_quota() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spaces/s1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/spaces/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(space_body()))
        .mount(&server)
        .await;

    let ledger = Arc::new(RateLedger::default());
    let client =
        GatherClient::with_rate_limit(test_config(&server), Arc::clone(&ledger), "standard")
            .unwrap();

    client.spaces().get("s1").await.unwrap();

    let status = ledger.status("standard").await;
    assert_eq!(status.limit - status.remaining, 1);
}

// ============================================================================
// Provisioning
// ============================================================================

#[tokio::test]
async fn test_provisioning_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/spaces"))
        .respond_with(ResponseTemplate::new(201).set_body_json(space_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/spaces/s1/guests"))
        .and(body_partial_json(json!({
            "email": "lead@example.com",
            "role": "moderator",
            "permissions": {"canModerate": true}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "g1", "email": "lead@example.com", "role": "moderator"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/spaces/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(space_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/invitations"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3) // Initial + 2 retries, then the step is skipped
        .mount(&server)
        .await;

    let client = test_client(&server);
    let plan = ProvisionPlan::new(SpaceConfig::private("Team HQ"), "lead@example.com")
        .with_invitation("You're a moderator", "Welcome to Team HQ");

    let report = Provisioner::new(&client).run(&plan).await.unwrap();

    assert_eq!(report.space.id, "s1");
    assert_eq!(report.moderator.email, "lead@example.com");
    assert!(report.invitation.is_none());
    assert_eq!(report.warnings.len(), 1);
}
