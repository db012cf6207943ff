//! Error types for fatal listener failures.
//!
//! Only listener-level failures surface as errors: a bind failure at startup
//! and an accept failure at runtime, both unrecoverable. Per-connection
//! failures never cross the handler boundary; they are logged and the
//! handler fails in isolation.

use thiserror::Error;

/// Fatal errors terminating the listener loop.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound at startup.
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        /// Address the bind was attempted on.
        addr: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The listener failed while accepting; it is unrecoverable past this
    /// point and the process terminates.
    #[error("listener accept failed: {0}")]
    Accept(#[from] std::io::Error),
}

/// A type alias for `Result<T, ServerError>`.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_names_the_address() {
        let err = ServerError::Bind {
            addr: "127.0.0.1:10000".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        let message = err.to_string();
        assert!(message.contains("127.0.0.1:10000"));
    }
}
