//! Chat registry: the naming service every provider registers with.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin palaver-registry -- --bind 0.0.0.0:1099 --advertise http://chat.example:1099
//! ```

use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use palaver_server::{domain::Endpoint, infrastructure::TransportConfig};
use palaver_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "palaver-registry", version, about = "Palaver chat registry")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:1099")]
    bind: SocketAddr,

    /// URL providers use to reach this registry (defaults to the bound address)
    #[arg(long)]
    advertise: Option<Endpoint>,

    /// Milliseconds before a call to a provider counts as unreachable
    #[arg(long, default_value_t = 5000)]
    call_timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config =
        TransportConfig::default().with_call_timeout(Duration::from_millis(args.call_timeout_ms));

    if let Err(e) = palaver_server::run_registry(args.bind, args.advertise, config).await {
        tracing::error!("Registry error: {}", e);
        std::process::exit(1);
    }
}
