//! Time provider abstraction for injected delays.
//!
//! The handler's randomized delays are the only places the server sleeps.
//! Going through a provider keeps the state machine testable: integration
//! tests run [`TokioTimeProvider`] on tokio's paused clock so multi-second
//! delays elapse in virtual time.

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Provider trait for time operations.
#[async_trait]
pub trait TimeProvider: Clone + Send + Sync + 'static {
    /// Sleep for the specified duration.
    async fn sleep(&self, duration: Duration);

    /// Get the current time.
    fn now(&self) -> Instant;
}

/// Real time provider using tokio's time facilities.
#[derive(Debug, Clone, Default)]
pub struct TokioTimeProvider;

impl TokioTimeProvider {
    /// Create a new tokio time provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TimeProvider for TokioTimeProvider {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tokio_provider_sleeps_at_least_the_requested_duration() {
        let time = TokioTimeProvider::new();
        let start = Instant::now();
        time.sleep(Duration::from_millis(5)).await;
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[tokio::test]
    async fn zero_duration_sleep_returns_promptly() {
        let time = TokioTimeProvider::new();
        let start = Instant::now();
        time.sleep(Duration::ZERO).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
