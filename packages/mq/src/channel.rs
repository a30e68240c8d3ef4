use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel};

use crate::error::MqError;

/// AMQP delivery mode flagging a message as persistent (written to durable
/// storage by the broker).
const DELIVERY_MODE_PERSISTENT: u8 = 2;

/// The broker operations the pool and publisher need from a channel.
///
/// `lapin::Channel` is the production implementation; tests substitute
/// in-memory channels to exercise pool and publisher semantics without a
/// broker.
#[async_trait]
pub trait BrokerChannel: Send + Sync {
    /// Declare `queue` as durable. A no-op if the queue already exists with
    /// matching durability.
    async fn declare_durable_queue(&self, queue: &str) -> Result<(), MqError>;

    /// Publish `payload` to `queue` with persistent delivery. Returns once
    /// the client library has accepted the publish locally; no broker
    /// acknowledgment is awaited.
    async fn publish_persistent(&self, queue: &str, payload: &[u8]) -> Result<(), MqError>;

    /// Close the channel.
    async fn shutdown(&self) -> Result<(), MqError>;
}

#[async_trait]
impl BrokerChannel for Channel {
    async fn declare_durable_queue(&self, queue: &str) -> Result<(), MqError> {
        self.queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;
        Ok(())
    }

    async fn publish_persistent(&self, queue: &str, payload: &[u8]) -> Result<(), MqError> {
        // Publish via the default exchange; routing key == queue name.
        // Publisher confirms are not enabled, so success means "handed to
        // lapin", not "stored by the broker".
        self.basic_publish(
            "",
            queue,
            BasicPublishOptions::default(),
            payload,
            BasicProperties::default().with_delivery_mode(DELIVERY_MODE_PERSISTENT),
        )
        .await?;
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), MqError> {
        self.close(200, "channel pool shutdown").await?;
        Ok(())
    }
}
