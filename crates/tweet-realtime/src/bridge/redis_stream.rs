//! Redis Streams binding of the durable channel.
//!
//! The channel is a stream key read through one consumer group shared by
//! every notifier instance. Reads use `NOACK`, so a message counts as
//! delivered as soon as it is returned to a consumer.

use async_trait::async_trait;
use redis::aio::ConnectionLike;
use redis::streams::StreamReadReply;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use tweet_core::config::BrokerConfig;
use tweet_core::error::{AppError, ErrorKind};
use tweet_core::events::CONTENT_TYPE;
use tweet_core::AppResult;

use super::channel::{ChannelGateway, ChannelSource};

/// Field holding the event body in each stream entry.
const BODY_FIELD: &str = "body";
/// Field holding the content type in each stream entry.
const CONTENT_TYPE_FIELD: &str = "content_type";

/// Creates the stream and consumer group if they do not exist yet.
async fn declare_channel<C: ConnectionLike + Send>(
    conn: &mut C,
    channel: &str,
    group: &str,
) -> AppResult<()> {
    let result = redis::cmd("XGROUP")
        .arg("CREATE")
        .arg(channel)
        .arg(group)
        .arg("0")
        .arg("MKSTREAM")
        .query_async::<()>(conn)
        .await;

    match result {
        Ok(()) => {
            debug!(channel = %channel, group = %group, "Declared durable channel");
            Ok(())
        }
        Err(e) if e.code() == Some("BUSYGROUP") => Ok(()),
        Err(e) => Err(AppError::with_source(
            ErrorKind::Broker,
            format!("Failed to declare channel '{channel}': {e}"),
            e,
        )),
    }
}

/// Publishes to a Redis stream, one connection per call.
#[derive(Debug, Clone)]
pub struct RedisStreamGateway {
    config: BrokerConfig,
}

impl RedisStreamGateway {
    /// Creates a gateway. No connection is opened until the first publish.
    pub fn new(config: &BrokerConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    async fn publish_once(&self, payload: &str) -> AppResult<()> {
        let client = redis::Client::open(self.config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Broker, format!("Invalid broker URL: {e}"), e)
        })?;

        let mut conn = client.get_multiplexed_async_connection().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Broker,
                format!("Broker connection failed: {e}"),
                e,
            )
        })?;

        declare_channel(&mut conn, &self.config.channel, &self.config.group).await?;

        redis::cmd("XADD")
            .arg(&self.config.channel)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.config.max_len)
            .arg("*")
            .arg(CONTENT_TYPE_FIELD)
            .arg(CONTENT_TYPE)
            .arg(BODY_FIELD)
            .arg(payload)
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Broker, format!("Broker XADD failed: {e}"), e)
            })?;

        Ok(())
    }
}

#[async_trait]
impl ChannelGateway for RedisStreamGateway {
    async fn publish(&self, payload: &str) -> AppResult<()> {
        let limit = self.config.publish_timeout();
        match timeout(limit, self.publish_once(payload)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::broker(format!(
                "Publish to '{}' timed out after {}ms",
                self.config.channel,
                limit.as_millis()
            ))),
        }
    }
}

/// Consumes a Redis stream through a consumer group.
#[derive(Clone)]
pub struct RedisStreamSource {
    conn: redis::aio::ConnectionManager,
    config: BrokerConfig,
}

impl std::fmt::Debug for RedisStreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStreamSource")
            .field("channel", &self.config.channel)
            .field("group", &self.config.group)
            .field("consumer", &self.config.consumer_name)
            .finish()
    }
}

impl RedisStreamSource {
    /// Connects and declares the channel.
    pub async fn connect(config: &BrokerConfig) -> AppResult<Self> {
        let client = redis::Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Broker, format!("Invalid broker URL: {e}"), e)
        })?;

        let mut conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Broker,
                    format!("Broker connection failed: {e}"),
                    e,
                )
            })?;

        declare_channel(&mut conn, &config.channel, &config.group).await?;

        info!(
            channel = %config.channel,
            group = %config.group,
            consumer = %config.consumer_name,
            "Subscribed to durable channel"
        );

        Ok(Self {
            conn,
            config: config.clone(),
        })
    }

    fn extract(reply: StreamReadReply) -> Vec<String> {
        let mut payloads = Vec::new();
        for key in reply.keys {
            for entry in key.ids {
                match entry.get::<String>(BODY_FIELD) {
                    Some(body) => payloads.push(body),
                    None => warn!(entry_id = %entry.id, "Stream entry without body, skipping"),
                }
            }
        }
        payloads
    }
}

#[async_trait]
impl ChannelSource for RedisStreamSource {
    async fn receive(&self) -> AppResult<Vec<String>> {
        let mut conn = self.conn.clone();

        let reply = redis::cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&self.config.group)
            .arg(&self.config.consumer_name)
            .arg("COUNT")
            .arg(self.config.batch_size)
            .arg("BLOCK")
            .arg(self.config.block_ms)
            .arg("NOACK")
            .arg("STREAMS")
            .arg(&self.config.channel)
            .arg(">")
            .query_async::<Option<StreamReadReply>>(&mut conn)
            .await;

        match reply {
            Ok(Some(reply)) => Ok(Self::extract(reply)),
            Ok(None) => Ok(Vec::new()),
            Err(e) if e.is_timeout() => Ok(Vec::new()),
            Err(e) if e.code() == Some("NOGROUP") => {
                warn!(channel = %self.config.channel, "Consumer group missing, declaring again");
                declare_channel(&mut conn, &self.config.channel, &self.config.group).await?;
                Ok(Vec::new())
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Broker,
                format!("Broker XREADGROUP failed: {e}"),
                e,
            )),
        }
    }
}
