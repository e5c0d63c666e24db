//! End-to-end fan-out from comment creation to WebSocket clients.

mod helpers;

use std::sync::Arc;

use futures::future::join_all;
use http::StatusCode;
use uuid::Uuid;

use tweet_core::events::NotificationEvent;
use tweet_realtime::MemoryChannel;

#[tokio::test]
async fn test_channel_event_reaches_every_client() {
    let notifier = helpers::TestNotifier::start(true).await;
    let mut a = notifier.connect().await;
    let mut b = notifier.connect().await;

    let payload = NotificationEvent::comment("p1", "u1").encode().unwrap();
    notifier.publish(&payload).await;

    for client in [&mut a, &mut b] {
        let received = helpers::recv_text(client).await;
        assert_eq!(received, payload);

        let event = NotificationEvent::decode(received.as_bytes()).unwrap();
        assert_eq!(event.post_id, "p1");
        assert_eq!(event.actor_id, "u1");
    }

    notifier.stop().await;
}

#[tokio::test]
async fn test_comment_fans_out_to_connected_clients() {
    let channel = MemoryChannel::default();
    let notifier = helpers::TestNotifier::start_with_channel(true, channel.clone()).await;
    let app = helpers::TestApi::new(Arc::new(channel));

    let mut a = notifier.connect().await;
    let mut b = notifier.connect().await;

    let user = Uuid::new_v4();
    let response = app.comment(user, "great post").await;
    assert_eq!(response.status, StatusCode::CREATED);

    let expected = NotificationEvent::comment(app.post_id, user);
    for client in [&mut a, &mut b] {
        let received = helpers::recv_text(client).await;
        assert_eq!(NotificationEvent::decode(received.as_bytes()).unwrap(), expected);
    }

    notifier.stop().await;
}

#[tokio::test]
async fn test_channel_order_is_preserved() {
    let notifier = helpers::TestNotifier::start(true).await;
    let mut client = notifier.connect().await;

    for i in 0..20 {
        notifier.publish(&format!("message-{i}")).await;
    }

    for i in 0..20 {
        assert_eq!(helpers::recv_text(&mut client).await, format!("message-{i}"));
    }

    notifier.stop().await;
}

#[tokio::test]
async fn test_late_client_gets_no_backlog() {
    let notifier = helpers::TestNotifier::start(true).await;
    let mut early = notifier.connect().await;

    notifier.publish("before").await;
    assert_eq!(helpers::recv_text(&mut early).await, "before");

    let mut late = notifier.connect().await;
    helpers::assert_silent(&mut late).await;

    notifier.publish("after").await;
    assert_eq!(helpers::recv_text(&mut late).await, "after");
    assert_eq!(helpers::recv_text(&mut early).await, "after");

    notifier.stop().await;
}

#[tokio::test]
async fn test_concurrent_connect_and_disconnect_settles() {
    let notifier = helpers::TestNotifier::start(true).await;
    let url = notifier.ws_url();

    let clients = join_all((0..10).map(|_| {
        let url = url.clone();
        async move {
            let (client, _) = tokio_tungstenite::connect_async(url).await.unwrap();
            client
        }
    }))
    .await;
    notifier.wait_for_connections(10).await;

    let mut clients = clients.into_iter();
    let to_close: Vec<_> = clients.by_ref().take(4).collect();
    let mut kept: Vec<_> = clients.collect();

    join_all(to_close.into_iter().map(|mut client| async move {
        client.close(None).await.unwrap();
    }))
    .await;
    notifier.wait_for_connections(6).await;

    notifier.publish("survivors").await;
    for client in kept.iter_mut() {
        assert_eq!(helpers::recv_text(client).await, "survivors");
    }

    notifier.stop().await;
}
