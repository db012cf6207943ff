//! The per-connection fault-injection state machine.
//!
//! Exactly one handler runs per accepted connection, fully independently of
//! all others. Its stages are strictly sequential:
//!
//! 1. **Decide** — one uniform draw in `[0, 100)`; engage iff the draw is
//!    below the success percentage, otherwise abandon the connection
//!    without closing it.
//! 2. **Pre-read delay** — sleep a uniform number of whole seconds below
//!    the configured bound.
//! 3. **Read** — a single read into a fixed 1024-byte buffer. Failure
//!    (including the peer hanging up first) is logged and handling
//!    continues with whatever the buffer holds.
//! 4. **Pre-write delay** — as step 2 with the write bound.
//! 5. **Write** — `replying to: ` followed by the full buffer, trailing
//!    zero padding included.
//!
//! On the engaged path the connection is closed on every exit (the stream
//! is dropped); on the abandoned path it is deliberately leaked so the
//! client sees a peer that holds the connection open and never answers.

use std::mem;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::ServerConfig;
use crate::random::RandomProvider;
use crate::time::TimeProvider;

/// Size of the request read buffer. At most this many bytes are read from a
/// connection, in a single read call.
pub const READ_BUFFER_SIZE: usize = 1024;

/// Prefix prepended to every reply.
pub const REPLY_PREFIX: &[u8] = b"replying to: ";

/// Whether a connection gets a response at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Handle the connection (delayed read, delayed echo reply, close).
    Engage,
    /// Never respond and leave the connection dangling.
    Abandon,
}

/// What a finished handler did with its connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The connection was left open and untouched.
    Abandoned,
    /// The connection was handled and closed.
    Engaged {
        /// Bytes actually received from the peer (zero if the read failed
        /// or the peer closed first).
        bytes_read: usize,
    },
}

/// Draw the engage/abandon decision for one connection.
///
/// The draw is uniform in `[0, 100)` and the percentage is clamped, so 100
/// always engages and 0 always abandons.
pub fn decide<R: RandomProvider>(config: &ServerConfig, random: &R) -> Decision {
    let draw = random.random_range(0..100);
    if draw < u64::from(config.success_percentage.min(100)) {
        Decision::Engage
    } else {
        Decision::Abandon
    }
}

/// Sample a delay of a uniform number of whole seconds in `[0, max_secs)`.
///
/// A bound of zero is a zero-width range, which the naive draw would reject;
/// it is defined here as "no delay" and consumes no randomness.
pub fn sample_delay<R: RandomProvider>(max_secs: u64, random: &R) -> Duration {
    if max_secs == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs(random.random_range(0..max_secs))
}

/// Run the fault-injection state machine for a single connection.
///
/// The stream is closed when this function returns on the engaged path and
/// intentionally left open on the abandoned path. Errors never escape: a
/// failed read or write is logged and the handler carries on, so no
/// connection can affect another or the listener.
pub async fn handle_connection<S, R, T>(
    mut stream: S,
    config: ServerConfig,
    random: R,
    time: T,
) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    R: RandomProvider,
    T: TimeProvider,
{
    if decide(&config, &random) == Decision::Abandon {
        tracing::info!("not going to respond to client");
        // Leak rather than drop: dropping would close the socket, but a
        // hung peer holds its end of the connection open forever.
        mem::forget(stream);
        return Outcome::Abandoned;
    }

    let delay = sample_delay(config.max_pre_read_delay, &random);
    tracing::info!("client connected, sleeping for {:?} before read", delay);
    time.sleep(delay).await;

    let mut buf = [0u8; READ_BUFFER_SIZE];
    let bytes_read = match stream.read(&mut buf).await {
        Ok(0) => {
            tracing::warn!("peer closed the connection before sending data");
            0
        }
        Ok(n) => {
            tracing::debug!("read {} bytes from peer", n);
            n
        }
        Err(err) => {
            tracing::warn!("error reading from peer: {}", err);
            0
        }
    };

    let delay = sample_delay(config.max_pre_write_delay, &random);
    tracing::info!("request received, sleeping for {:?} before write", delay);
    time.sleep(delay).await;

    // The reply carries the whole buffer, zero padding and all, matching the
    // wire format byte-for-byte regardless of how much the peer sent.
    let mut reply = Vec::with_capacity(REPLY_PREFIX.len() + buf.len());
    reply.extend_from_slice(REPLY_PREFIX);
    reply.extend_from_slice(&buf);
    if let Err(err) = stream.write_all(&reply).await {
        tracing::warn!("error writing reply: {}", err);
    }

    // Dropping the stream here closes the connection on every engaged path.
    Outcome::Engaged { bytes_read }
}
