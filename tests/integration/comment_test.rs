//! Integration tests for comment creation and its notification.

mod helpers;

use std::sync::Arc;
use std::time::{Duration, Instant};

use http::StatusCode;
use uuid::Uuid;

use tweet_core::config::BrokerConfig;
use tweet_core::events::NotificationEvent;
use tweet_realtime::bridge::{ChannelSource, RedisStreamGateway};
use tweet_realtime::MemoryChannel;

fn unreachable_broker() -> BrokerConfig {
    BrokerConfig {
        url: "redis://127.0.0.1:1".to_string(),
        publish_timeout_ms: 1000,
        ..BrokerConfig::default()
    }
}

#[tokio::test]
async fn test_create_comment_persists_and_publishes() {
    let channel = MemoryChannel::default();
    let app = helpers::TestApi::new(Arc::new(channel.clone()));
    let user = Uuid::new_v4();

    let response = app.comment(user, "first!").await;

    assert_eq!(response.status, StatusCode::CREATED);
    let comment_id: Uuid = response.body["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(response.body["content"], "first!");
    assert_eq!(response.body["likes"], 0);

    let stored = app.store.get(&comment_id).expect("comment not stored");
    assert_eq!(stored.post_id, app.post_id);
    assert_eq!(stored.owner_id, user);

    let published = channel.receive().await.unwrap();
    assert_eq!(published.len(), 1);
    let event = NotificationEvent::decode(published[0].as_bytes()).unwrap();
    assert_eq!(event, NotificationEvent::comment(app.post_id, user));
}

#[tokio::test]
async fn test_rejected_comment_publishes_nothing() {
    let channel = MemoryChannel::default();
    let app = helpers::TestApi::new(Arc::new(channel.clone()));

    let unknown = app
        .request(
            "POST",
            &format!("/v1/posts/{}/comments", Uuid::new_v4()),
            Some(Uuid::new_v4()),
            Some(serde_json::json!({ "content": "hello" })),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let blank = app.comment(Uuid::new_v4(), "  ").await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let anonymous = app
        .request(
            "POST",
            &format!("/v1/posts/{}/comments", app.post_id),
            None,
            Some(serde_json::json!({ "content": "hello" })),
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    assert_eq!(channel.pending().await, 0);
    assert!(app.store.comments_for_post(&app.post_id).is_empty());
}

#[tokio::test]
async fn test_broker_down_still_creates_comment() {
    let notifier = helpers::TestNotifier::start(true).await;
    let mut client = notifier.connect().await;

    let app = helpers::TestApi::new(Arc::new(RedisStreamGateway::new(&unreachable_broker())));
    let user = Uuid::new_v4();

    let (logs, guard) = helpers::CapturedLogs::install();
    let started = Instant::now();
    let response = app.comment(user, "saved anyway").await;
    drop(guard);

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(app.store.comments_for_post(&app.post_id).len(), 1);

    let failures = logs.lines_with("Failed to publish comment notification");
    assert_eq!(failures.len(), 1, "logs: {}", logs.contents());
    assert!(failures[0].contains("WARN"));
    assert!(failures[0].contains(&app.post_id.to_string()));
    assert!(failures[0].contains(&user.to_string()));

    helpers::assert_silent(&mut client).await;
    notifier.stop().await;
}

#[tokio::test]
async fn test_post_then_comment() {
    let channel = MemoryChannel::default();
    let app = helpers::TestApi::new(Arc::new(channel.clone()));
    let user = Uuid::new_v4();

    let created = app
        .request(
            "POST",
            "/v1/posts",
            Some(user),
            Some(serde_json::json!({ "content": "a new post" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let post_id = created.body["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            &format!("/v1/posts/{post_id}/comments"),
            Some(Uuid::new_v4()),
            Some(serde_json::json!({ "content": "reply" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["post_id"], post_id.as_str());
    assert_eq!(channel.pending().await, 1);
}
