//! RPC server lifecycle.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower_http::trace::TraceLayer;

use super::{
    handler::{health_check, invoke},
    signal::shutdown_signal,
    state::AppState,
};
use crate::{
    domain::{Endpoint, Registry},
    infrastructure::{
        Connector, ObjectTable, RpcClient, TransportConfig, TransportError, dto::rpc::RPC_PATH,
    },
};

/// How long `shutdown` waits for in-flight calls to finish.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the router serving `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(RPC_PATH, post(invoke))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A running RPC server and the export table it serves.
pub struct RpcServer {
    endpoint: Endpoint,
    local_addr: SocketAddr,
    connector: Connector,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl RpcServer {
    /// Bind `bind` and start serving.
    ///
    /// Objects are advertised under `advertise`, or under the bound address
    /// when none is given.
    pub async fn start(
        bind: SocketAddr,
        advertise: Option<Endpoint>,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(bind)
            .await
            .map_err(|source| TransportError::Bind { addr: bind, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| TransportError::Bind { addr: bind, source })?;

        let endpoint = match advertise {
            Some(endpoint) => endpoint,
            None => Endpoint::new(format!("http://{local_addr}"))?,
        };

        let exports = Arc::new(ObjectTable::new(endpoint.clone()));
        let connector = Connector::new(RpcClient::new(&config)?, exports.clone());
        // Handles received as arguments are only ever called while serving.
        let arguments = Connector::new(RpcClient::nested(&config)?, exports.clone());
        let app = router(Arc::new(AppState {
            exports,
            connector: arguments,
        }));

        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = stopped.await;
                })
                .await
        });

        tracing::info!("Serving {} on {}", endpoint, local_addr);

        Ok(Self {
            endpoint,
            local_addr,
            connector,
            stop: Some(stop),
            task: Some(task),
        })
    }

    /// Endpoint other processes use to reach this one.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn exports(&self) -> &Arc<ObjectTable> {
        self.connector.exports()
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    /// Withdraw every export and stop serving.
    ///
    /// To other processes this is indistinguishable from the process dying:
    /// every later call on its objects fails as unreachable.
    pub async fn shutdown(mut self) {
        let withdrawn = self.exports().withdraw_all();
        tracing::info!("Stopping {} ({} objects withdrawn)", self.endpoint, withdrawn);

        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let Some(task) = self.task.take() else {
            return;
        };
        match tokio::time::timeout(DRAIN_TIMEOUT, task).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => tracing::error!("Server error: {}", e),
            Ok(Err(e)) => tracing::error!("Server task failed: {}", e),
            Err(_) => tracing::warn!("In-flight calls still running after {:?}", DRAIN_TIMEOUT),
        }
    }
}

/// Run the chat registry until a shutdown signal arrives.
///
/// The registry is published under its well-known object id at the server's
/// endpoint; that endpoint is what providers are pointed at.
pub async fn run_registry(
    bind: SocketAddr,
    advertise: Option<Endpoint>,
    config: TransportConfig,
) -> Result<(), TransportError> {
    let server = RpcServer::start(bind, advertise, config).await?;
    let registry = server.exports().export_registry(Arc::new(Registry::new()));
    tracing::info!("Chat registry published as {}", registry);

    shutdown_signal().await;
    server.shutdown().await;
    Ok(())
}

impl Drop for RpcServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}
