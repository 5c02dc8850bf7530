//! ChatProvider: one process's chat identity and the rooms it hosts.

use std::sync::Arc;

use tokio::{
    sync::mpsc::{self, UnboundedSender},
    task::JoinHandle,
};

use super::{
    DirectoryUseCase, HostRoomUseCase, NotificationUseCase, ParticipateUseCase, ProviderContext,
    ProviderError, QuitUseCase, RegisterClientUseCase,
};
use crate::{
    domain::{ChatRegistry, ClientEvent, Endpoint, Entity, EntityInfo, EntityName},
    infrastructure::ObjectTable,
    ui::RpcServer,
};

/// Façade over the provider use cases.
///
/// Owns a background task that handles owner callbacks of hosted rooms and
/// forwards the client's inbound calls to `ui`. The task stops when the
/// provider is dropped.
pub struct ChatProvider {
    ctx: Arc<ProviderContext>,
    pump: JoinHandle<()>,
}

impl ChatProvider {
    /// Must be called inside a tokio runtime.
    pub fn new(
        registry: Arc<dyn ChatRegistry>,
        exports: Arc<ObjectTable>,
        ui: UnboundedSender<ClientEvent>,
    ) -> Self {
        let (owner_tx, owner_rx) = mpsc::unbounded_channel();
        let (client_tx, client_rx) = mpsc::unbounded_channel();
        let ctx = Arc::new(ProviderContext::new(registry, exports, owner_tx, client_tx));
        let pump = tokio::spawn(NotificationUseCase::new(ctx.clone(), ui).run(owner_rx, client_rx));
        Self { ctx, pump }
    }

    /// A provider serving its objects through `server`, talking to the
    /// registry published at `registry`.
    pub fn connect(
        server: &RpcServer,
        registry: Endpoint,
        ui: UnboundedSender<ClientEvent>,
    ) -> Self {
        Self::new(
            server.connector().registry(registry),
            server.exports().clone(),
            ui,
        )
    }

    /// Fails if the registry does not answer.
    pub async fn check_registry(&self) -> Result<(), ProviderError> {
        self.directory().chat_rooms().await.map(|_| ())
    }

    /// Name of the registered client, if any.
    pub async fn client_name(&self) -> Option<EntityName> {
        let client = self.ctx.client().await.ok()?;
        client.name().await.ok()
    }

    pub async fn register_chat_client(&self, name: EntityName) -> Result<bool, ProviderError> {
        RegisterClientUseCase::new(self.ctx.clone())
            .execute(name)
            .await
    }

    pub async fn register_chat_room(&self, name: EntityName) -> Result<bool, ProviderError> {
        HostRoomUseCase::new(self.ctx.clone()).register(name).await
    }

    pub async fn deregister_chat_room(&self, name: &EntityName) -> Result<bool, ProviderError> {
        HostRoomUseCase::new(self.ctx.clone()).deregister(name).await
    }

    pub async fn join_chat_room(&self, name: &EntityName) -> Result<bool, ProviderError> {
        ParticipateUseCase::new(self.ctx.clone()).join(name).await
    }

    pub async fn talk_chat_room(
        &self,
        name: &EntityName,
        message: String,
    ) -> Result<bool, ProviderError> {
        ParticipateUseCase::new(self.ctx.clone())
            .talk(name, message)
            .await
    }

    pub async fn leave_chat_room(&self, name: &EntityName) -> Result<bool, ProviderError> {
        ParticipateUseCase::new(self.ctx.clone()).leave(name).await
    }

    pub async fn get_entity_info(
        &self,
        name: EntityName,
    ) -> Result<Option<EntityInfo>, ProviderError> {
        self.directory().entity_info(name).await
    }

    pub async fn get_chat_rooms(&self) -> Result<Vec<EntityName>, ProviderError> {
        self.directory().chat_rooms().await
    }

    pub async fn hosted_chat_rooms(&self) -> Vec<EntityName> {
        self.directory().hosted_chat_rooms().await
    }

    pub async fn joined_chat_rooms(&self) -> Vec<EntityName> {
        self.directory().joined_chat_rooms().await
    }

    /// Leave, close and deregister everything this provider holds.
    pub async fn quit(&self) {
        QuitUseCase::new(self.ctx.clone()).execute().await;
    }

    fn directory(&self) -> DirectoryUseCase {
        DirectoryUseCase::new(self.ctx.clone())
    }
}

impl Drop for ChatProvider {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
