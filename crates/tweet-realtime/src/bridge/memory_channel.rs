//! In-process durable channel for single-process deployments and tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use tweet_core::AppResult;

use super::channel::{ChannelGateway, ChannelSource};

/// A FIFO shared between a gateway and a source in the same process.
///
/// Clones share the same queue. Messages published before anyone receives
/// are retained; each message is handed to exactly one receiver.
#[derive(Debug, Clone)]
pub struct MemoryChannel {
    inner: Arc<Inner>,
    batch_size: usize,
}

#[derive(Debug, Default)]
struct Inner {
    queue: Mutex<VecDeque<String>>,
    notify: Notify,
}

impl MemoryChannel {
    /// Creates an empty channel. A receive returns at most `batch_size` messages.
    pub fn new(batch_size: usize) -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            batch_size: batch_size.max(1),
        }
    }

    /// Number of messages not yet received.
    pub async fn pending(&self) -> usize {
        self.inner.queue.lock().await.len()
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl ChannelGateway for MemoryChannel {
    async fn publish(&self, payload: &str) -> AppResult<()> {
        self.inner.queue.lock().await.push_back(payload.to_owned());
        self.inner.notify.notify_one();
        Ok(())
    }
}

#[async_trait]
impl ChannelSource for MemoryChannel {
    async fn receive(&self) -> AppResult<Vec<String>> {
        loop {
            {
                let mut queue = self.inner.queue.lock().await;
                if !queue.is_empty() {
                    let take = queue.len().min(self.batch_size);
                    let batch: Vec<String> = queue.drain(..take).collect();
                    if !queue.is_empty() {
                        self.inner.notify.notify_one();
                    }
                    return Ok(batch);
                }
            }
            self.inner.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_receive_returns_published_in_order() {
        let channel = MemoryChannel::new(10);
        channel.publish("a").await.unwrap();
        channel.publish("b").await.unwrap();

        assert_eq!(channel.receive().await.unwrap(), vec!["a", "b"]);
        assert_eq!(channel.pending().await, 0);
    }

    #[tokio::test]
    async fn test_batch_size_limits_receive() {
        let channel = MemoryChannel::new(2);
        for p in ["1", "2", "3"] {
            channel.publish(p).await.unwrap();
        }

        assert_eq!(channel.receive().await.unwrap(), vec!["1", "2"]);
        assert_eq!(channel.receive().await.unwrap(), vec!["3"]);
    }

    #[tokio::test]
    async fn test_receive_waits_for_publish() {
        let channel = MemoryChannel::default();
        let source = channel.clone();
        let waiter = tokio::spawn(async move { source.receive().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        channel.publish("late").await.unwrap();
        let got = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(got, vec!["late"]);
    }
}
