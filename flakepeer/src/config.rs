//! Immutable server configuration snapshot.
//!
//! The configuration is loaded once at startup, clamped into valid ranges,
//! and shared read-only across all connection handlers. Nothing mutates it
//! after load, so no synchronization is needed.

/// Host the listener binds to.
const BIND_HOST: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 10_000;
/// Default upper bound in seconds for the delay before reading.
pub const DEFAULT_MAX_PRE_READ_DELAY: i64 = 30;
/// Default upper bound in seconds for the delay before writing.
pub const DEFAULT_MAX_PRE_WRITE_DELAY: i64 = 30;
/// Default percentage of connections that get a response.
pub const DEFAULT_SUCCESS_PERCENTAGE: i64 = 80;

/// Configuration for the fault-injecting endpoint.
///
/// `Copy` on purpose: every handler gets its own snapshot and no state is
/// shared between connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on. Port 0 asks the OS for an ephemeral port, which is
    /// how the integration tests bind.
    pub port: u16,
    /// Exclusive upper bound in whole seconds for the randomized delay
    /// before the request is read. Zero means no delay.
    pub max_pre_read_delay: u64,
    /// Exclusive upper bound in whole seconds for the randomized delay
    /// before the reply is written. Zero means no delay.
    pub max_pre_write_delay: u64,
    /// Probability in percent (0-100) that a connection is honored at all.
    pub success_percentage: u8,
}

impl ServerConfig {
    /// Build a configuration, clamping out-of-range inputs instead of
    /// failing: negative delay bounds become zero (no delay), and the
    /// success percentage is clamped into `[0, 100]` so out-of-range values
    /// mean "always abandon" / "always engage" rather than a crash.
    pub fn new(
        port: u16,
        max_pre_read_delay: i64,
        max_pre_write_delay: i64,
        success_percentage: i64,
    ) -> Self {
        Self {
            port,
            max_pre_read_delay: max_pre_read_delay.max(0) as u64,
            max_pre_write_delay: max_pre_write_delay.max(0) as u64,
            success_percentage: success_percentage.clamp(0, 100) as u8,
        }
    }

    /// The address the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", BIND_HOST, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_PORT,
            DEFAULT_MAX_PRE_READ_DELAY,
            DEFAULT_MAX_PRE_WRITE_DELAY,
            DEFAULT_SUCCESS_PERCENTAGE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 10_000);
        assert_eq!(config.max_pre_read_delay, 30);
        assert_eq!(config.max_pre_write_delay, 30);
        assert_eq!(config.success_percentage, 80);
    }

    #[test]
    fn negative_delays_clamp_to_zero() {
        let config = ServerConfig::new(0, -5, -1, 50);
        assert_eq!(config.max_pre_read_delay, 0);
        assert_eq!(config.max_pre_write_delay, 0);
    }

    #[test]
    fn out_of_range_percentage_clamps_to_boundaries() {
        assert_eq!(ServerConfig::new(0, 0, 0, 150).success_percentage, 100);
        assert_eq!(ServerConfig::new(0, 0, 0, -20).success_percentage, 0);
    }

    #[test]
    fn bind_addr_uses_loopback_and_port() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:10000");
    }
}
