//! Bridge between the durable channel and the notifier.

pub mod channel;
pub mod consumer;
pub mod memory_channel;
pub mod redis_stream;

pub use channel::{ChannelGateway, ChannelSource};
pub use consumer::ChannelConsumer;
pub use memory_channel::MemoryChannel;
pub use redis_stream::{RedisStreamGateway, RedisStreamSource};
