//! Integration tests for the publish pipeline using wiremock HTTP mocks.
//!
//! Exact call counts are asserted with `Mock::expect`, verified when the
//! `MockServer` drops.

use std::time::{Duration, Instant};

use clipcast_core::Credential;
use clipcast_graph::{GraphClient, GraphError};
use clipcast_publish::{
    poll_until_finished, publish_video, resolve_destinations, PollPolicy, PublishError,
    PublishTarget,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_graph(base_url: &str) -> GraphClient {
    GraphClient::with_base_url(
        "app-1",
        "secret",
        "https://localhost:3000/insta/callback",
        "v16.0",
        30,
        base_url,
    )
    .expect("client construction should not fail")
}

fn test_credential() -> Credential {
    Credential {
        access_token: "tok-1".to_owned(),
        refresh_token: None,
        provider_user_id: None,
    }
}

fn pending_body() -> serde_json::Value {
    serde_json::json!({ "status_code": "IN_PROGRESS", "id": "C123" })
}

fn finished_body() -> serde_json::Value {
    serde_json::json!({ "status_code": "FINISHED", "id": "C123" })
}

#[tokio::test]
async fn poller_times_out_after_exactly_the_attempt_budget() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v16.0/C123"))
        .and(query_param("fields", "status_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_body()))
        .expect(3)
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let policy = PollPolicy::new(3, 20);
    let started = Instant::now();
    let err = poll_until_finished(&graph, "tok-1", "C123", policy)
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::PollTimeout { attempts: 3 }));
    // Sleeps run between attempts only: (N - 1) × interval.
    assert!(
        started.elapsed() >= Duration::from_millis(40),
        "expected at least two 20ms sleeps, elapsed: {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn poller_returns_early_on_finished() {
    let server = MockServer::start().await;

    // First two polls see a pending container, the third sees FINISHED.
    Mock::given(method("GET"))
        .and(path("/v16.0/C123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_body()))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v16.0/C123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished_body()))
        .expect(1)
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let policy = PollPolicy::new(30, 1);
    poll_until_finished(&graph, "tok-1", "C123", policy)
        .await
        .expect("should finish on the third attempt");
}

#[tokio::test]
async fn poller_short_circuits_on_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v16.0/C123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": { "message": "Media upload has failed with error code 2207026" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let policy = PollPolicy::new(30, 1);
    let err = poll_until_finished(&graph, "tok-1", "C123", policy)
        .await
        .unwrap_err();

    match err {
        PublishError::UploadFailed { message } => {
            assert!(message.contains("2207026"), "unexpected message: {message}");
        }
        other => panic!("expected UploadFailed, got: {other}"),
    }
}

#[tokio::test]
async fn poller_fails_fast_on_malformed_status_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v16.0/C123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "C123" })))
        .expect(1)
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let policy = PollPolicy::new(30, 1);
    let err = poll_until_finished(&graph, "tok-1", "C123", policy)
        .await
        .unwrap_err();

    assert!(
        matches!(err, PublishError::Graph(GraphError::StatusCheck(_))),
        "malformed payload must fail the check, not keep polling: {err}"
    );
}

#[tokio::test]
async fn publish_is_never_finalized_when_polling_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v16.0/IG1/media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "C123" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v16.0/C123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_body()))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v16.0/IG1/media_publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "M999" })))
        .expect(0)
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let target = PublishTarget::BusinessAccount("IG1".to_owned());
    let result = publish_video(
        &graph,
        &test_credential(),
        &target,
        "https://cdn/video.mp4",
        PollPolicy::new(2, 1),
    )
    .await;

    assert!(!result.is_success());
    assert!(result
        .error_message
        .as_deref()
        .is_some_and(|m| m.contains("2 status checks")));
}

#[tokio::test]
async fn enrichment_keeps_accounts_whose_handle_lookup_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v16.0/me/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "name": "One", "instagram_business_account": { "id": "IG1" } },
                { "name": "Two", "instagram_business_account": { "id": "IG2" } },
                { "name": "Three", "instagram_business_account": { "id": "IG3" } }
            ]
        })))
        .mount(&server)
        .await;

    for (id, username) in [("IG1", "one_official"), ("IG3", "three_official")] {
        Mock::given(method("GET"))
            .and(path(format!("/v16.0/{id}")))
            .and(query_param("fields", "username"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "username": username, "id": id })),
            )
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/v16.0/IG2"))
        .and(query_param("fields", "username"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": { "message": "An unknown error occurred" }
        })))
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let destinations = resolve_destinations(&graph, "tok-1")
        .await
        .expect("listing succeeded, enrichment is best-effort");

    assert_eq!(destinations.len(), 3, "no account may be dropped");
    assert_eq!(destinations[0].username.as_deref(), Some("one_official"));
    assert_eq!(destinations[1].id, "IG2");
    assert_eq!(destinations[1].username, None);
    assert_eq!(destinations[2].username.as_deref(), Some("three_official"));
}

#[tokio::test]
async fn destination_list_maps_page_to_linked_account() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v16.0/me/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "id": "P1", "name": "Acme", "instagram_business_account": { "id": "IG1" } }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v16.0/IG1"))
        .and(query_param("fields", "username"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "username": "acme_official", "id": "IG1" })),
        )
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let destinations = resolve_destinations(&graph, "tok-1")
        .await
        .expect("should resolve destinations");

    assert_eq!(destinations.len(), 1);
    assert_eq!(destinations[0].id, "IG1");
    assert_eq!(destinations[0].name, "Acme");
    assert_eq!(destinations[0].username.as_deref(), Some("acme_official"));
}

#[tokio::test]
async fn publish_workflow_succeeds_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v16.0/IG1/media"))
        .and(query_param("media_type", "REELS"))
        .and(query_param("video_url", "https://cdn/video.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "C123" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v16.0/C123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_body()))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v16.0/C123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v16.0/IG1/media_publish"))
        .and(query_param("creation_id", "C123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "M999" })))
        .expect(1)
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let target = PublishTarget::BusinessAccount("IG1".to_owned());
    let result = publish_video(
        &graph,
        &test_credential(),
        &target,
        "https://cdn/video.mp4",
        PollPolicy::new(30, 1),
    )
    .await;

    assert!(result.is_success(), "unexpected failure: {result:?}");
    assert_eq!(result.published_media_id.as_deref(), Some("M999"));
}

#[tokio::test]
async fn publish_workflow_reports_finalize_failure_without_retrying() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v16.0/IG1/media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "C123" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v16.0/C123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished_body()))
        .expect(1)
        .mount(&server)
        .await;

    // Exactly one finalize attempt, even though it fails.
    Mock::given(method("POST"))
        .and(path("/v16.0/IG1/media_publish"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "message": "Media publish limit reached" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let target = PublishTarget::BusinessAccount("IG1".to_owned());
    let result = publish_video(
        &graph,
        &test_credential(),
        &target,
        "https://cdn/video.mp4",
        PollPolicy::new(30, 1),
    )
    .await;

    assert!(!result.is_success());
    assert!(result
        .error_message
        .as_deref()
        .is_some_and(|m| m.contains("Media publish limit reached")));
}

#[tokio::test]
async fn page_target_resolves_linked_business_account_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v16.0/P1"))
        .and(query_param("fields", "instagram_business_account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "instagram_business_account": { "id": "IG9" },
            "id": "P1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v16.0/IG9/media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "C9" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v16.0/C9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status_code": "FINISHED" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v16.0/IG9/media_publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "M9" })))
        .expect(1)
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let target = PublishTarget::Page("P1".to_owned());
    let result = publish_video(
        &graph,
        &test_credential(),
        &target,
        "https://cdn/video.mp4",
        PollPolicy::new(30, 1),
    )
    .await;

    assert!(result.is_success(), "unexpected failure: {result:?}");
    assert_eq!(result.published_media_id.as_deref(), Some("M9"));
}

#[tokio::test]
async fn page_target_without_linkage_fails_the_workflow() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v16.0/P2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "P2" })))
        .expect(1)
        .mount(&server)
        .await;

    // No container may be created for a page without a linked account.
    Mock::given(method("POST"))
        .and(path("/v16.0/P2/media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "C0" })))
        .expect(0)
        .mount(&server)
        .await;

    let graph = test_graph(&server.uri());
    let target = PublishTarget::Page("P2".to_owned());
    let result = publish_video(
        &graph,
        &test_credential(),
        &target,
        "https://cdn/video.mp4",
        PollPolicy::new(30, 1),
    )
    .await;

    assert!(!result.is_success());
    assert!(result
        .error_message
        .as_deref()
        .is_some_and(|m| m.contains("no linked Instagram business account")));
}
