//! Pause policy between dependent upstream requests.

use std::time::Duration;

use async_trait::async_trait;

/// Waits before a network-bound traversal step.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps a fixed interval on the tokio timer.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

#[async_trait]
impl<T: Pacer + ?Sized> Pacer for &T {
    async fn pause(&self) {
        (**self).pause().await
    }
}
