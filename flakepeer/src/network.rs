//! Network connection and listener abstraction.
//!
//! The handler performs I/O against a generic bidirectional byte-stream, so
//! it never names a concrete socket type; the listener loop goes through
//! [`NetworkProvider`] the same way. Production uses the tokio
//! implementations below, tests use in-memory duplex streams.

use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::instrument;

/// Provider trait for creating network connections and listeners.
#[async_trait]
pub trait NetworkProvider: Clone + Send + Sync + 'static {
    /// The bidirectional byte-stream type for this provider.
    type TcpStream: AsyncRead + AsyncWrite + Unpin + Send + 'static;
    /// The listener type for this provider.
    type TcpListener: TcpListenerTrait<TcpStream = Self::TcpStream> + 'static;

    /// Create a listener bound to the given address.
    async fn bind(&self, addr: &str) -> io::Result<Self::TcpListener>;

    /// Connect to a remote address.
    async fn connect(&self, addr: &str) -> io::Result<Self::TcpStream>;
}

/// Trait for listeners that can accept connections.
#[async_trait]
pub trait TcpListenerTrait: Send + Sync {
    /// The byte-stream type this listener produces.
    type TcpStream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Accept a single incoming connection, returning the stream and the
    /// peer address.
    async fn accept(&self) -> io::Result<(Self::TcpStream, String)>;

    /// Get the local address this listener is bound to.
    fn local_addr(&self) -> io::Result<String>;
}

/// Real tokio networking implementation.
#[derive(Debug, Clone, Default)]
pub struct TokioNetworkProvider;

impl TokioNetworkProvider {
    /// Create a new tokio network provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NetworkProvider for TokioNetworkProvider {
    type TcpStream = tokio::net::TcpStream;
    type TcpListener = TokioTcpListener;

    #[instrument(skip(self))]
    async fn bind(&self, addr: &str) -> io::Result<Self::TcpListener> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        Ok(TokioTcpListener { inner: listener })
    }

    #[instrument(skip(self))]
    async fn connect(&self, addr: &str) -> io::Result<Self::TcpStream> {
        tokio::net::TcpStream::connect(addr).await
    }
}

/// Wrapper for the tokio TcpListener to implement our trait.
#[derive(Debug)]
pub struct TokioTcpListener {
    inner: tokio::net::TcpListener,
}

#[async_trait]
impl TcpListenerTrait for TokioTcpListener {
    type TcpStream = tokio::net::TcpStream;

    async fn accept(&self) -> io::Result<(Self::TcpStream, String)> {
        let (stream, addr) = self.inner.accept().await?;
        Ok((stream, addr.to_string()))
    }

    fn local_addr(&self) -> io::Result<String> {
        Ok(self.inner.local_addr()?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_on_ephemeral_port_reports_local_addr() {
        let provider = TokioNetworkProvider::new();
        let listener = provider
            .bind("127.0.0.1:0")
            .await
            .expect("bind on ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        assert!(addr.starts_with("127.0.0.1:"));
        assert!(!addr.ends_with(":0"));
    }

    #[tokio::test]
    async fn accept_pairs_with_connect() {
        let provider = TokioNetworkProvider::new();
        let listener = provider.bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let connect = provider.connect(&addr);
        let accept = listener.accept();
        let (client, accepted) = tokio::join!(connect, accept);
        client.expect("connect");
        let (_stream, peer) = accepted.expect("accept");
        assert!(peer.starts_with("127.0.0.1:"));
    }
}
