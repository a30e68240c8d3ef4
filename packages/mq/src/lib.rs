pub mod channel;
pub mod config;
pub mod error;
pub mod pool;
pub mod publisher;

pub use channel::BrokerChannel;
pub use config::MqConfig;
pub use error::MqError;
pub use pool::ChannelPool;
pub use publisher::{AmqpPublisher, Publisher};

/// Channel pool over a live AMQP connection.
pub type AmqpChannelPool = ChannelPool<lapin::Channel>;
