//! End-to-end tests against a mock webhook endpoint.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mattermost_notify::{
    format, ChannelError, ChatNotifier, Level, LogRecord, MattermostChannel, MessageFilter,
    NotifierConfig,
};

fn notifier_for(server: &MockServer) -> ChatNotifier {
    let url = format!("{}/hooks/abc", server.uri());
    ChatNotifier::with_channels(
        NotifierConfig::new(url.clone()).with_app_name("billing-api"),
        vec![Arc::new(MattermostChannel::new(url))],
    )
}

async fn received_texts(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|req| {
            let body: serde_json::Value =
                serde_json::from_slice(&req.body).expect("webhook body is JSON");
            body["text"].as_str().expect("text field").to_string()
        })
        .collect()
}

#[tokio::test]
async fn record_below_threshold_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server);
    let results = notifier
        .handle_and_wait(&LogRecord::new(Level::WARNING, "slow query"))
        .await;

    assert!(results.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn qualifying_record_posts_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/abc"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server);
    let record = LogRecord::new(Level::CRITICAL, "DB down")
        .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

    let results = notifier.handle_and_wait(&record).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, "mattermost");
    assert!(results[0].1.is_ok());

    let texts = received_texts(&server).await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("@channel **billing-api**"));
    assert!(texts[0].contains("Error: DB down"));
    // Default timezone is Asia/Kolkata (UTC+05:30)
    assert!(texts[0].contains("Date&Time: 2024-01-01 05:30: AM"));

    server.verify().await;
}

#[tokio::test]
async fn excluded_phrase_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server);
    let results = notifier
        .handle_and_wait(&LogRecord::new(Level::CRITICAL, "Target is not instantiable."))
        .await;

    assert!(results.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn explicit_timezone_shifts_the_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/hooks/abc", server.uri());
    let notifier = ChatNotifier::with_channels(
        NotifierConfig::new(url.clone())
            .with_app_name("billing-api")
            .with_timezone(chrono_tz::Europe::Berlin),
        vec![Arc::new(MattermostChannel::new(url))],
    );

    let record = LogRecord::new(Level::ERROR, "DB down")
        .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    notifier.handle_and_wait(&record).await;

    let texts = received_texts(&server).await;
    assert!(texts[0].contains("Date&Time: 2024-01-01 01:00: AM"));
}

#[tokio::test]
async fn rendered_tail_is_capped_over_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server);
    let record = LogRecord::new(Level::ERROR, "stack overflow")
        .with_formatted("x".repeat(format::MAX_TAIL_CHARS + 7_000));

    notifier.handle_and_wait(&record).await;

    let texts = received_texts(&server).await;
    let tail = texts[0].rsplit('\n').next().unwrap();
    assert_eq!(tail.chars().count(), format::MAX_TAIL_CHARS);
}

#[tokio::test]
async fn webhook_failure_is_reported_but_contained() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server);
    let results = notifier
        .handle_and_wait(&LogRecord::new(Level::ERROR, "DB down"))
        .await;

    assert_eq!(results.len(), 1);
    match &results[0].1 {
        Err(ChannelError::Status { status, .. }) => assert_eq!(*status, 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn fire_and_forget_handle_delivers_in_background() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server);
    notifier.handle(&LogRecord::new(Level::ERROR, "DB down"));

    // handle() returns immediately; give the spawned task time to run.
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        if server
            .received_requests()
            .await
            .is_some_and(|reqs| !reqs.is_empty())
        {
            break;
        }
    }

    server.verify().await;
}

#[tokio::test]
async fn custom_exclusions_are_honored_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server).with_filter(MessageFilter::new(["deadline exceeded"]));
    let results = notifier
        .handle_and_wait(&LogRecord::new(Level::ERROR, "context Deadline Exceeded"))
        .await;

    assert!(results.is_empty());
    server.verify().await;
}
