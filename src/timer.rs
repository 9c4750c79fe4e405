//! Delays for animation sequencing

use async_trait::async_trait;
use std::time::Duration;

/// Waits out CSS animation durations before removing nodes
#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

/// Delay backed by the tokio timer
#[cfg(feature = "native")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[cfg(feature = "native")]
#[async_trait(?Send)]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
