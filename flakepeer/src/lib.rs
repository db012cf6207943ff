//! # flakepeer
//!
//! A configurable fault-injecting TCP endpoint for testing client
//! implementations against unreliable network peers.
//!
//! For each accepted connection the server randomly decides whether to
//! respond at all, and if so, sleeps for a randomized delay before reading
//! the request and again before writing the reply. Clients connecting to it
//! experience either:
//!
//! - a peer that silently never responds and leaves the connection dangling
//!   (the client must time out on its own), or
//! - a slow but otherwise correct peer that echoes the request back with a
//!   `replying to: ` prefix after up to two configured delays.
//!
//! ## Provider traits
//!
//! All environment interactions go through small provider traits so tests
//! can substitute deterministic implementations:
//!
//! - [`RandomProvider`]: uniform integer draws driving all fault decisions
//! - [`TimeProvider`]: sleeping for the injected delays
//! - [`NetworkProvider`]: listener and byte-stream creation
//! - [`TaskProvider`]: fire-and-forget per-connection task dispatch

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

/// Immutable server configuration snapshot.
pub mod config;
/// Error types for fatal listener failures.
pub mod error;
/// The per-connection fault-injection state machine.
pub mod handler;
/// Network connection and listener abstraction.
pub mod network;
/// Random number generation provider abstraction.
pub mod random;
/// The listener loop dispatching connections to handlers.
pub mod server;
/// Task spawning abstraction for per-connection handlers.
pub mod task;
/// Time provider abstraction for injected delays.
pub mod time;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{
    Decision, Outcome, READ_BUFFER_SIZE, REPLY_PREFIX, decide, handle_connection, sample_delay,
};
pub use network::{NetworkProvider, TcpListenerTrait, TokioNetworkProvider, TokioTcpListener};
pub use random::{RandomProvider, SeededRandomProvider, ThreadRandomProvider};
pub use server::Server;
pub use task::{TaskProvider, TokioTaskProvider};
pub use time::{TimeProvider, TokioTimeProvider};
