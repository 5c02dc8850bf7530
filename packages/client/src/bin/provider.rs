//! Chat provider: one chat identity and the chat rooms it hosts.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin palaver-provider -- --registry http://127.0.0.1:1099
//! ```

use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use palaver_client::run_cli;
use palaver_server::{
    ChatProvider, RpcServer, domain::Endpoint, infrastructure::TransportConfig,
    ui::shutdown_signal,
};
use palaver_shared::logger::setup_logger;
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(name = "palaver-provider", version, about = "Palaver chat provider")]
struct Args {
    /// URL of the chat registry
    #[arg(long, default_value = "http://127.0.0.1:1099")]
    registry: Endpoint,

    /// Address to serve this provider's chat client and rooms on
    #[arg(long, default_value = "127.0.0.1:0")]
    bind: SocketAddr,

    /// URL other processes use to reach this provider (defaults to the bound address)
    #[arg(long)]
    advertise: Option<Endpoint>,

    /// Milliseconds before a call to another process counts as unreachable
    #[arg(long, default_value_t = 5000)]
    call_timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing; keep the prompt readable by default
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let config =
        TransportConfig::default().with_call_timeout(Duration::from_millis(args.call_timeout_ms));

    let server = match RpcServer::start(args.bind, args.advertise, config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Provider error: {}", e);
            std::process::exit(1);
        }
    };

    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    let provider = ChatProvider::connect(&server, args.registry.clone(), ui_tx);
    if let Err(e) = provider.check_registry().await {
        tracing::error!("Cannot reach the chat registry at {}: {}", args.registry, e);
        server.shutdown().await;
        std::process::exit(1);
    }

    let outcome = tokio::select! {
        outcome = run_cli(&provider, ui_rx) => outcome,
        _ = shutdown_signal() => Ok(()),
    };

    provider.quit().await;
    drop(provider);
    server.shutdown().await;

    if let Err(e) = outcome {
        tracing::error!("Provider error: {}", e);
        std::process::exit(1);
    }
}
