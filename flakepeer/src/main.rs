//! Binary entry point for the flakepeer fault-injecting TCP endpoint.
//!
//! Owns only process setup: flag parsing, logging initialization, and fatal
//! error handling. All actual behavior lives in the library.

use clap::Parser;
use std::process;

use flakepeer::config::{
    DEFAULT_MAX_PRE_READ_DELAY, DEFAULT_MAX_PRE_WRITE_DELAY, DEFAULT_PORT,
    DEFAULT_SUCCESS_PERCENTAGE,
};
use flakepeer::{
    RandomProvider, SeededRandomProvider, Server, ServerConfig, ServerResult,
    ThreadRandomProvider, TokioNetworkProvider, TokioTaskProvider, TokioTimeProvider,
};

/// Fault-injecting TCP endpoint for testing clients against unreliable
/// peers: drops, slow reads, and slow writes, without a real flaky network.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Maximum time in seconds to wait before reading from the socket.
    #[arg(long, default_value_t = DEFAULT_MAX_PRE_READ_DELAY)]
    max_pre_read_delay: i64,

    /// Maximum time in seconds to wait before writing to the socket.
    #[arg(long, default_value_t = DEFAULT_MAX_PRE_WRITE_DELAY)]
    max_pre_write_delay: i64,

    /// Percentage of connections to successfully handle.
    #[arg(long, default_value_t = DEFAULT_SUCCESS_PERCENTAGE)]
    success_percentage: i64,

    /// Seed for deterministic randomness; omit to use thread-local entropy.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = ServerConfig::new(
        args.port,
        args.max_pre_read_delay,
        args.max_pre_write_delay,
        args.success_percentage,
    );
    tracing::info!(
        "configuration: max_pre_read_delay({}) max_pre_write_delay({}) success_percentage({})",
        config.max_pre_read_delay,
        config.max_pre_write_delay,
        config.success_percentage
    );

    let result = match args.seed {
        Some(seed) => {
            tracing::info!("using deterministic randomness with seed {}", seed);
            run(config, SeededRandomProvider::new(seed)).await
        }
        None => run(config, ThreadRandomProvider::new()).await,
    };

    // Normal operation never exits; only fatal listener errors land here.
    if let Err(err) = result {
        tracing::error!("fatal: {}", err);
        process::exit(1);
    }
}

async fn run<R: RandomProvider>(config: ServerConfig, random: R) -> ServerResult<()> {
    Server::new(
        config,
        TokioNetworkProvider::new(),
        random,
        TokioTimeProvider::new(),
        TokioTaskProvider::new(),
    )
    .run()
    .await
}
