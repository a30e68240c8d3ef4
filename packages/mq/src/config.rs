use serde::Deserialize;

/// Broker settings, embedded into the server's `AppConfig`.
#[derive(Debug, Deserialize, Clone)]
pub struct MqConfig {
    /// AMQP connection URL, e.g. `amqp://localhost:5672`.
    pub url: String,
    /// Requested channel pool size; clamped to
    /// [`crate::pool::MIN_POOL_SIZE`, `crate::pool::MAX_POOL_SIZE`].
    pub pool_size: usize,
    /// Name of the durable queue submissions are dispatched to.
    pub queue_name: String,
}
