//! Integration tests for WebSocket sessions on the notifier.

mod helpers;

use futures::SinkExt;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn test_health_reports_connections() {
    let notifier = helpers::TestNotifier::start(true).await;
    let _client = notifier.connect().await;

    let snapshot = notifier.engine.metrics_snapshot();
    assert_eq!(snapshot.active_connections, 1);
    assert_eq!(snapshot.connections_opened, 1);

    notifier.stop().await;
}

#[tokio::test]
async fn test_client_message_is_rebroadcast_to_all() {
    let notifier = helpers::TestNotifier::start(true).await;
    let mut a = notifier.connect().await;
    let mut b = notifier.connect().await;

    helpers::send_text(&mut a, "ping").await;

    assert_eq!(helpers::recv_text(&mut a).await, "ping");
    assert_eq!(helpers::recv_text(&mut b).await, "ping");

    notifier.stop().await;
}

#[tokio::test]
async fn test_sender_skipped_without_echo() {
    let notifier = helpers::TestNotifier::start(false).await;
    let mut a = notifier.connect().await;
    let mut b = notifier.connect().await;

    helpers::send_text(&mut a, "ping").await;

    assert_eq!(helpers::recv_text(&mut b).await, "ping");
    helpers::assert_silent(&mut a).await;

    notifier.stop().await;
}

#[tokio::test]
async fn test_utf8_binary_frame_is_forwarded() {
    let notifier = helpers::TestNotifier::start(true).await;
    let mut a = notifier.connect().await;
    let mut b = notifier.connect().await;

    a.send(Message::binary(b"\xff\xfe".to_vec())).await.unwrap();
    a.send(Message::binary(b"hello".to_vec())).await.unwrap();

    assert_eq!(helpers::recv_text(&mut b).await, "hello");

    notifier.stop().await;
}

#[tokio::test]
async fn test_closed_client_is_unregistered() {
    let notifier = helpers::TestNotifier::start(true).await;
    let mut a = notifier.connect().await;
    let mut b = notifier.connect().await;
    assert_eq!(notifier.connection_count(), 2);

    a.close(None).await.unwrap();
    notifier.wait_for_connections(1).await;

    notifier.publish("after close").await;
    assert_eq!(helpers::recv_text(&mut b).await, "after close");

    let snapshot = notifier.engine.metrics_snapshot();
    assert_eq!(snapshot.connections_closed, 1);

    notifier.stop().await;
}

#[tokio::test]
async fn test_shutdown_closes_clients() {
    let notifier = helpers::TestNotifier::start(true).await;
    let mut client = notifier.connect().await;

    notifier.engine.shutdown().await.unwrap();

    assert!(helpers::recv_text_within(&mut client, helpers::RECV_TIMEOUT).await.is_none());
    notifier.wait_for_connections(0).await;
}
