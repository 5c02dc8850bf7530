//! Test fixtures: a registry and providers, each behind its own HTTP server.

#![allow(dead_code)]

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use axum::{Json, Router, extract::State, routing::post};
use palaver_server::{
    ChatProvider, RpcServer,
    domain::{
        ClientEvent, ClientHandle, Endpoint, EntityInfo, EntityName, EntityRef, ObjectIdFactory,
        Registry,
    },
    infrastructure::{
        Connector, TransportConfig,
        dto::{Call, Invocation, Reply, rpc::RPC_PATH},
    },
};
use tokio::{
    net::TcpListener,
    sync::mpsc::{self, UnboundedReceiver},
    task::JoinHandle,
};

pub fn config() -> TransportConfig {
    TransportConfig::default().with_call_timeout(Duration::from_secs(1))
}

pub fn name(value: &str) -> EntityName {
    EntityName::new(value.to_string()).expect("valid name")
}

/// Registry process.
pub struct TestRegistry {
    server: RpcServer,
}

impl TestRegistry {
    pub async fn start() -> Self {
        let server = RpcServer::start("127.0.0.1:0".parse().unwrap(), None, config())
            .await
            .expect("Failed to start registry");
        server.exports().export_registry(Arc::new(Registry::new()));
        Self { server }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.server.endpoint().clone()
    }
}

/// Provider process.
pub struct TestPeer {
    pub server: RpcServer,
    pub provider: ChatProvider,
    pub events: UnboundedReceiver<ClientEvent>,
}

impl TestPeer {
    pub async fn start(registry: &TestRegistry) -> Self {
        let server = RpcServer::start("127.0.0.1:0".parse().unwrap(), None, config())
            .await
            .expect("Failed to start provider");
        let (ui_tx, events) = mpsc::unbounded_channel();
        let provider = ChatProvider::connect(&server, registry.endpoint(), ui_tx);
        Self {
            server,
            provider,
            events,
        }
    }

    /// Start a provider and register its client under `client`.
    pub async fn with_client(registry: &TestRegistry, client: &str) -> Self {
        let peer = Self::start(registry).await;
        assert_eq!(
            peer.provider.register_chat_client(name(client)).await,
            Ok(true)
        );
        peer
    }

    /// Simulate the process dying: nothing it served answers any more.
    pub async fn kill(self) {
        let Self {
            server, provider, ..
        } = self;
        drop(provider);
        server.shutdown().await;
    }

    /// Wait for `expected` among the inbound events.
    pub async fn expect_event(&mut self, expected: &ClientEvent) -> bool {
        let found = async {
            while let Some(event) = self.events.recv().await {
                if &event == expected {
                    return true;
                }
            }
            false
        };
        tokio::time::timeout(Duration::from_secs(2), found)
            .await
            .unwrap_or(false)
    }
}

#[derive(Clone)]
struct SilentState {
    name: EntityName,
    hanging: Arc<AtomicBool>,
}

async fn answer(
    State(state): State<SilentState>,
    Json(invocation): Json<Invocation>,
) -> Json<Reply> {
    if state.hanging.load(Ordering::SeqCst) {
        std::future::pending::<()>().await;
    }
    let reply = match invocation.call {
        Call::Name => Reply::Name {
            name: state.name.clone(),
        },
        Call::Info => Reply::Info {
            info: EntityInfo::from([("Name".to_string(), state.name.to_string())]),
        },
        _ => Reply::Done,
    };
    Json(reply)
}

/// Client process that answers normally until told to hang, after which it
/// still accepts connections but never replies.
pub struct SilentClient {
    reference: EntityRef,
    hanging: Arc<AtomicBool>,
    task: JoinHandle<std::io::Result<()>>,
}

impl SilentClient {
    pub async fn start(client: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = Endpoint::new(format!("http://{}", listener.local_addr().unwrap())).unwrap();
        let hanging = Arc::new(AtomicBool::new(false));
        let app = Router::new()
            .route(RPC_PATH, post(answer))
            .with_state(SilentState {
                name: name(client),
                hanging: hanging.clone(),
            });
        let task = tokio::spawn(async move { axum::serve(listener, app).await });
        Self {
            reference: EntityRef::new(endpoint, ObjectIdFactory::generate()),
            hanging,
            task,
        }
    }

    /// Handle to this client as seen through `connector`.
    pub fn handle(&self, connector: &Connector) -> ClientHandle {
        connector.client(self.reference.clone())
    }

    pub fn hang(&self) {
        self.hanging.store(true, Ordering::SeqCst);
    }
}

impl Drop for SilentClient {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Poll `condition` until it holds or two seconds have passed.
pub async fn eventually<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
