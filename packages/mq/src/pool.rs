use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use lapin::Connection;
use tracing::{info, warn};

use crate::channel::BrokerChannel;
use crate::error::MqError;

/// Bounds for the configured pool size; requests outside this range are
/// clamped at construction.
pub const MIN_POOL_SIZE: usize = 5;
pub const MAX_POOL_SIZE: usize = 1000;

fn clamp_pool_size(requested: usize) -> usize {
    requested.clamp(MIN_POOL_SIZE, MAX_POOL_SIZE)
}

struct PoolInner<C> {
    channels: Vec<C>,
    connection: Option<Connection>,
}

/// A fixed set of long-lived broker channels multiplexed over one
/// connection, handed out round-robin.
///
/// Channels are shared, not checked out: there is no acquire/release
/// protocol and no health checking on the hot path. The channel set is
/// populated exactly once by [`ChannelPool::open`] and only ever mutated
/// again by [`ChannelPool::close`], which drains it. The connection is
/// owned exclusively by the pool and never exposed to callers.
pub struct ChannelPool<C> {
    inner: RwLock<PoolInner<C>>,
    cursor: AtomicUsize,
    pool_size: usize,
}

impl ChannelPool<lapin::Channel> {
    /// Create exactly `pool_size` channels (clamped to
    /// `[MIN_POOL_SIZE, MAX_POOL_SIZE]`) sequentially over `connection`,
    /// taking ownership of the connection.
    ///
    /// Fails if any channel creation fails; a partially built pool is never
    /// returned. Callers must treat a failure here as fatal to startup.
    pub async fn open(connection: Connection, pool_size: usize) -> Result<Self, MqError> {
        let pool_size = clamp_pool_size(pool_size);
        let mut channels = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            channels.push(connection.create_channel().await?);
        }
        info!(pool_size, "Channel pool opened");
        Ok(Self::assemble(channels, Some(connection)))
    }
}

impl<C: BrokerChannel + Clone> ChannelPool<C> {
    fn assemble(channels: Vec<C>, connection: Option<Connection>) -> Self {
        let pool_size = channels.len();
        Self {
            inner: RwLock::new(PoolInner {
                channels,
                connection,
            }),
            cursor: AtomicUsize::new(0),
            pool_size,
        }
    }

    /// Build a pool from pre-made channels, without a connection.
    #[cfg(test)]
    pub(crate) fn for_tests(channels: Vec<C>) -> Self {
        Self::assemble(channels, None)
    }

    /// Return the channel at the cursor and advance the cursor by one,
    /// modulo the pool size.
    ///
    /// Never blocks on broker I/O, never creates a channel, never inspects
    /// channel health. Fails with [`MqError::NoChannels`] if the pool was
    /// not opened or has been closed.
    pub fn get_channel(&self) -> Result<C, MqError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        if inner.channels.is_empty() {
            return Err(MqError::NoChannels);
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % inner.channels.len();
        Ok(inner.channels[idx].clone())
    }

    /// Close every channel, then the owned connection.
    ///
    /// The channel set is drained up front, so the pool reports zero
    /// channels for the whole shutdown. Individual close failures are
    /// logged and skipped so one faulty channel cannot block cleanup of the
    /// rest. This is the only place in the subsystem where errors are
    /// swallowed.
    pub async fn close(&self) {
        let (channels, connection) = {
            let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
            (std::mem::take(&mut inner.channels), inner.connection.take())
        };

        for channel in channels {
            if let Err(e) = channel.shutdown().await {
                warn!(error = %e, "Failed to close pooled channel, continuing");
            }
        }

        if let Some(connection) = connection {
            if let Err(e) = connection.close(200, "channel pool shutdown").await {
                warn!(error = %e, "Failed to close broker connection");
            }
        }

        info!("Channel pool closed");
    }

    /// The configured pool size; constant after `open()`.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Number of channels currently held; `pool_size()` while open, zero
    /// after `close()`.
    pub fn channel_count(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .channels
            .len()
    }
}
