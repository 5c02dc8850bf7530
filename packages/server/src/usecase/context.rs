//! State shared by the provider use cases.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc::UnboundedSender};

use super::error::ProviderError;
use crate::{
    domain::{ChatRegistry, ClientEvent, ClientHandle, EntityName, OwnerEvent, RoomBook, RoomHandle},
    infrastructure::ObjectTable,
};

/// Everything one provider process owns.
pub struct ProviderContext {
    /// The shared registry
    pub registry: Arc<dyn ChatRegistry>,
    /// Objects this process serves
    pub exports: Arc<ObjectTable>,
    /// Hosted and joined rooms
    pub book: Arc<RoomBook>,
    /// The provider's own client, once registered
    pub client: Mutex<Option<ClientHandle>>,
    /// Owner callbacks of hosted rooms
    pub owner_events: UnboundedSender<OwnerEvent>,
    /// Consumer of the client's inbound calls
    pub client_events: UnboundedSender<ClientEvent>,
}

impl ProviderContext {
    pub fn new(
        registry: Arc<dyn ChatRegistry>,
        exports: Arc<ObjectTable>,
        owner_events: UnboundedSender<OwnerEvent>,
        client_events: UnboundedSender<ClientEvent>,
    ) -> Self {
        Self {
            registry,
            exports,
            book: Arc::new(RoomBook::new()),
            client: Mutex::new(None),
            owner_events,
            client_events,
        }
    }

    /// The registered client.
    pub async fn client(&self) -> Result<ClientHandle, ProviderError> {
        self.client
            .lock()
            .await
            .clone()
            .ok_or(ProviderError::NotRegistered)
    }

    /// Forget a room that failed a call and drop its registry binding.
    pub async fn discard_room(&self, name: &EntityName, room: &RoomHandle) {
        tracing::warn!("Chat room '{}' is unreachable, discarding it", name);
        self.book.joined().remove_matching(name, room).await;
        self.book.hosted().remove_matching(name, room).await;

        match self.registry.deregister(room.clone().into()).await {
            Ok(true) => tracing::info!("Deregistered chat room '{}'", name),
            Ok(false) => tracing::debug!("Chat room '{}' was no longer registered", name),
            Err(e) => tracing::warn!("Could not deregister chat room '{}': {}", name, e),
        }
    }
}
