//! Test doubles for entities whose liveness can be switched off.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use mockall::mock;

use super::{
    entity::{ChatClient, ChatRoom, Entity, EntityInfo},
    error::{Remote, Unreachable},
    factory::ObjectIdFactory,
    handle::{ClientHandle, EntityRef, RoomHandle},
    value_object::{Endpoint, EntityName},
};

pub fn test_endpoint(process: &str) -> Endpoint {
    Endpoint::new(format!("http://{process}.test")).unwrap()
}

/// Poll `condition` until it holds or a second has passed.
pub async fn wait_until<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if condition().await {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    false
}

pub fn name(value: &str) -> EntityName {
    EntityName::new(value.to_string()).unwrap()
}

/// A message as seen by a stub client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub room: String,
    pub sender: String,
    pub message: String,
}

impl Delivery {
    pub fn new(room: &str, sender: &str, message: &str) -> Self {
        Self {
            room: room.to_string(),
            sender: sender.to_string(),
            message: message.to_string(),
        }
    }
}

struct Liveness {
    alive: AtomicBool,
    hung: AtomicBool,
}

impl Liveness {
    fn new() -> Self {
        Self {
            alive: AtomicBool::new(true),
            hung: AtomicBool::new(false),
        }
    }

    fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    fn hang(&self) {
        self.hung.store(true, Ordering::SeqCst);
    }

    /// Fails once killed, and never completes once hung.
    async fn check(&self, who: &EntityName) -> Remote<()> {
        if self.hung.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Unreachable::new(format!("{who} is down")))
        }
    }
}

/// Chat client that records what it receives.
pub struct StubClient {
    name: EntityName,
    reference: EntityRef,
    liveness: Liveness,
    inbox: Mutex<Vec<Delivery>>,
    closed: Mutex<Vec<EntityName>>,
}

impl StubClient {
    pub fn new(value: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name(value),
            reference: EntityRef::new(test_endpoint(value), ObjectIdFactory::generate()),
            liveness: Liveness::new(),
            inbox: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
        })
    }

    pub fn handle(self: &Arc<Self>) -> ClientHandle {
        ClientHandle::new(self.reference.clone(), self.clone())
    }

    pub fn entity_name(&self) -> EntityName {
        self.name.clone()
    }

    pub fn kill(&self) {
        self.liveness.kill();
    }

    /// Stop answering: every later call waits forever.
    pub fn hang(&self) {
        self.liveness.hang();
    }

    pub fn inbox(&self) -> Vec<Delivery> {
        self.inbox.lock().unwrap().clone()
    }

    pub fn closed_rooms(&self) -> Vec<EntityName> {
        self.closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Entity for StubClient {
    async fn name(&self) -> Remote<EntityName> {
        self.liveness.check(&self.name).await?;
        Ok(self.name.clone())
    }

    async fn info(&self) -> Remote<EntityInfo> {
        self.liveness.check(&self.name).await?;
        Ok(EntityInfo::from([(
            "Name".to_string(),
            self.name.to_string(),
        )]))
    }
}

#[async_trait]
impl ChatClient for StubClient {
    async fn deliver(&self, room: EntityName, sender: String, message: String) -> Remote<()> {
        self.liveness.check(&self.name).await?;
        self.inbox
            .lock()
            .unwrap()
            .push(Delivery::new(room.as_str(), &sender, &message));
        Ok(())
    }

    async fn closed(&self, room: EntityName) -> Remote<()> {
        self.liveness.check(&self.name).await?;
        self.closed.lock().unwrap().push(room);
        Ok(())
    }
}

/// Chat room that accepts everything while alive.
pub struct StubRoom {
    name: EntityName,
    reference: EntityRef,
    liveness: Liveness,
}

impl StubRoom {
    pub fn new(value: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name(value),
            reference: EntityRef::new(test_endpoint(value), ObjectIdFactory::generate()),
            liveness: Liveness::new(),
        })
    }

    pub fn handle(self: &Arc<Self>) -> RoomHandle {
        RoomHandle::new(self.reference.clone(), self.clone())
    }

    pub fn entity_name(&self) -> EntityName {
        self.name.clone()
    }

    pub fn kill(&self) {
        self.liveness.kill();
    }
}

#[async_trait]
impl Entity for StubRoom {
    async fn name(&self) -> Remote<EntityName> {
        self.liveness.check(&self.name).await?;
        Ok(self.name.clone())
    }

    async fn info(&self) -> Remote<EntityInfo> {
        self.liveness.check(&self.name).await?;
        Ok(EntityInfo::from([(
            "Name".to_string(),
            self.name.to_string(),
        )]))
    }
}

#[async_trait]
impl ChatRoom for StubRoom {
    async fn join(&self, _client: ClientHandle) -> Remote<bool> {
        self.liveness.check(&self.name).await?;
        Ok(true)
    }

    async fn talk(&self, _client: ClientHandle, _message: String) -> Remote<bool> {
        self.liveness.check(&self.name).await?;
        Ok(true)
    }

    async fn leave(&self, _client: ClientHandle) -> Remote<bool> {
        self.liveness.check(&self.name).await?;
        Ok(true)
    }

    async fn empty(&self) -> Remote<()> {
        self.liveness.check(&self.name).await
    }
}

mock! {
    pub Client {}

    #[async_trait]
    impl Entity for Client {
        async fn name(&self) -> Remote<EntityName>;
        async fn info(&self) -> Remote<EntityInfo>;
    }

    #[async_trait]
    impl ChatClient for Client {
        async fn deliver(&self, room: EntityName, sender: String, message: String) -> Remote<()>;
        async fn closed(&self, room: EntityName) -> Remote<()>;
    }
}

impl MockClient {
    pub fn into_handle(self) -> ClientHandle {
        ClientHandle::new(
            EntityRef::new(test_endpoint("mock"), ObjectIdFactory::generate()),
            Arc::new(self),
        )
    }
}
