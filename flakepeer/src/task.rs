//! Task spawning abstraction for per-connection handlers.
//!
//! Dispatch is fire-and-forget: the listener loop spawns one task per
//! accepted connection and never joins, supervises, or bounds them. Handlers
//! must be schedulable simultaneously on multiple hardware threads, so
//! futures are `Send` and run on the multi-threaded runtime.

use std::future::Future;
use tracing::Instrument;

/// Provider for spawning independent connection-handler tasks.
pub trait TaskProvider: Clone + Send + Sync + 'static {
    /// Spawn a named task. The name only appears in the task's tracing span;
    /// the returned handle is never awaited by the listener loop.
    fn spawn_task<F>(&self, name: &str, future: F) -> tokio::task::JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Tokio-based task provider spawning onto the multi-threaded runtime.
#[derive(Debug, Clone, Default)]
pub struct TokioTaskProvider;

impl TokioTaskProvider {
    /// Create a new tokio task provider.
    pub fn new() -> Self {
        Self
    }
}

impl TaskProvider for TokioTaskProvider {
    fn spawn_task<F>(&self, name: &str, future: F) -> tokio::task::JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let span = tracing::info_span!("task", name = %name);
        tokio::spawn(future.instrument(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn spawned_task_runs_to_completion() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let handle = TokioTaskProvider::new().spawn_task("unit", async move {
            flag.store(true, Ordering::SeqCst);
        });
        handle.await.expect("task join");
        assert!(ran.load(Ordering::SeqCst));
    }
}
