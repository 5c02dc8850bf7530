//! Chat client: a provider's identity and inbound callback surface.

use std::sync::Arc;

use async_trait::async_trait;
use palaver_shared::time::{elapsed_minutes, millis_to_jst_rfc3339, now_millis};
use tokio::sync::mpsc::UnboundedSender;

use super::{
    entity::{ChatClient, Entity, EntityInfo, EntityKind},
    error::{Remote, Unreachable},
    event::ClientEvent,
    room_book::RoomBook,
    value_object::{EntityName, Timestamp},
};

/// A chat client hosted in this process.
///
/// Forwards everything it receives to its consumer unchanged and in arrival
/// order.
pub struct LocalChatClient {
    name: EntityName,
    created_at: Timestamp,
    book: Arc<RoomBook>,
    consumer: UnboundedSender<ClientEvent>,
}

impl LocalChatClient {
    pub fn new(
        name: EntityName,
        book: Arc<RoomBook>,
        consumer: UnboundedSender<ClientEvent>,
    ) -> Self {
        Self {
            name,
            created_at: Timestamp::now(),
            book,
            consumer,
        }
    }

    fn forward(&self, event: ClientEvent) -> Remote<()> {
        // A consumer that is gone means this process is shutting down.
        self.consumer
            .send(event)
            .map_err(|_| Unreachable::new(format!("client '{}' has no consumer", self.name)))
    }
}

#[async_trait]
impl Entity for LocalChatClient {
    async fn name(&self) -> Remote<EntityName> {
        Ok(self.name.clone())
    }

    async fn info(&self) -> Remote<EntityInfo> {
        let created = self.created_at.value();

        let mut info = EntityInfo::new();
        info.insert("Kind".to_string(), EntityKind::Client.label().to_string());
        info.insert("Name".to_string(), self.name.to_string());
        info.insert("Created".to_string(), millis_to_jst_rfc3339(created));
        info.insert(
            "Time Online".to_string(),
            format!("{} minutes", elapsed_minutes(created, now_millis())),
        );
        info.insert(
            "# Chat Rooms Hosting".to_string(),
            self.book.hosted().len().await.to_string(),
        );
        info.insert(
            "# Chat Rooms Joined".to_string(),
            self.book.joined().len().await.to_string(),
        );
        Ok(info)
    }
}

#[async_trait]
impl ChatClient for LocalChatClient {
    async fn deliver(&self, room: EntityName, sender: String, message: String) -> Remote<()> {
        tracing::debug!("[{}] {} -> {}: {}", room, sender, self.name, message);
        self.forward(ClientEvent::Delivered {
            room,
            sender,
            message,
        })
    }

    async fn closed(&self, room: EntityName) -> Remote<()> {
        tracing::info!("Room '{}' was closed by its owner", room);
        self.forward(ClientEvent::RoomClosed { room })
    }
}
