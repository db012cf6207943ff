//! The listener loop dispatching connections to handlers.
//!
//! The loop owns the listening socket, serially accepts connections, and
//! spawns one independent handler task per connection so no handler ever
//! blocks the next accept. Nothing flows back from handlers; they are never
//! joined, limited, or supervised. A bind or accept failure is fatal and
//! surfaces as a [`ServerError`] for the binary to log and exit on.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler;
use crate::network::{NetworkProvider, TcpListenerTrait};
use crate::random::RandomProvider;
use crate::task::TaskProvider;
use crate::time::TimeProvider;

/// The fault-injecting TCP endpoint.
///
/// Generic over its providers so tests can substitute deterministic
/// randomness, virtual time, or in-memory streams.
pub struct Server<N, R, T, P> {
    config: ServerConfig,
    network: N,
    random: R,
    time: T,
    tasks: P,
}

impl<N, R, T, P> Server<N, R, T, P>
where
    N: NetworkProvider,
    R: RandomProvider,
    T: TimeProvider,
    P: TaskProvider,
{
    /// Create a server from a configuration snapshot and its providers.
    pub fn new(config: ServerConfig, network: N, random: R, time: T, tasks: P) -> Self {
        Self {
            config,
            network,
            random,
            time,
            tasks,
        }
    }

    /// Bind the listening socket. Failing to bind is a startup
    /// precondition violation, not a runtime error.
    pub async fn bind(&self) -> ServerResult<N::TcpListener> {
        let addr = self.config.bind_addr();
        let listener = self
            .network
            .bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        tracing::info!("listening on {}", addr);
        Ok(listener)
    }

    /// Accept connections forever, dispatching each to an independent
    /// handler task.
    ///
    /// Only returns on an accept failure, which is unrecoverable; in normal
    /// operation the loop has no terminal state.
    pub async fn serve(self, listener: N::TcpListener) -> ServerResult<()> {
        let mut next_connection_id: u64 = 0;

        loop {
            tracing::debug!("blocking to accept");
            let (stream, peer_addr) = listener.accept().await.map_err(ServerError::Accept)?;

            let connection_id = next_connection_id;
            next_connection_id += 1;
            tracing::info!("accepted connection {} from {}", connection_id, peer_addr);

            let config = self.config;
            let random = self.random.clone();
            let time = self.time.clone();
            self.tasks
                .spawn_task(&format!("connection_{}", connection_id), async move {
                    handler::handle_connection(stream, config, random, time).await;
                });
        }
    }

    /// Bind and serve in one step; the normal entry point for the binary.
    pub async fn run(self) -> ServerResult<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }
}
