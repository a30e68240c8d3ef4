use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::channel::BrokerChannel;
use crate::error::MqError;
use crate::pool::ChannelPool;

/// Delivers a single message to a named durable queue.
///
/// Object-safe so callers can hold `Arc<dyn Publisher>` and tests can
/// substitute counting doubles.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `message` to `queue` with persistence guarantees. Returns
    /// once the client library has accepted the publish locally; no broker
    /// acknowledgment is awaited. Failures propagate; no internal retry.
    async fn publish(&self, queue: &str, message: serde_json::Value) -> Result<(), MqError>;
}

/// Publisher backed by a pooled broker channel.
pub struct AmqpPublisher<C = lapin::Channel> {
    pool: Arc<ChannelPool<C>>,
}

impl<C> AmqpPublisher<C> {
    pub fn new(pool: Arc<ChannelPool<C>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<C: BrokerChannel + Clone> Publisher for AmqpPublisher<C> {
    async fn publish(&self, queue: &str, message: serde_json::Value) -> Result<(), MqError> {
        let payload = serde_json::to_vec(&message)?;
        let channel = self.pool.get_channel()?;
        // Re-declaring an existing durable queue is a no-op, so every
        // publish can assert its queue without tracking declaration state.
        channel.declare_durable_queue(queue).await?;
        channel.publish_persistent(queue, &payload).await?;
        info!(queue, message = %message, "Message published");
        Ok(())
    }
}
