//! Remote-callable capabilities of chat entities.
//!
//! Every method returns [`Remote`]: `Err(Unreachable)` means the call did not
//! complete and the peer is presumed dead, while `Ok(false)` means the call
//! completed and was refused.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    error::Remote,
    handle::{ClientHandle, EntityHandle, RoomHandle},
    value_object::EntityName,
};

/// Diagnostic snapshot of an entity, computed on demand.
pub type EntityInfo = BTreeMap<String, String>;

/// Capability tag of a registrable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Room,
    Client,
}

impl EntityKind {
    /// Human-readable label used in info snapshots.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Room => "chat room",
            Self::Client => "chat client",
        }
    }
}

/// The minimal capability of anything registrable.
#[async_trait]
pub trait Entity: Send + Sync {
    /// The entity's registry-wide name. Also used as the liveness probe.
    async fn name(&self) -> Remote<EntityName>;

    /// Diagnostic key/value snapshot.
    async fn info(&self) -> Remote<EntityInfo>;
}

/// A chat room hosted by one provider.
#[async_trait]
pub trait ChatRoom: Entity {
    /// Add `client` to the room. Refused if already a member or the room is closed.
    async fn join(&self, client: ClientHandle) -> Remote<bool>;

    /// Broadcast `message` from `client` to every current member.
    async fn talk(&self, client: ClientHandle, message: String) -> Remote<bool>;

    /// Remove `client` from the room. Refused if not a member.
    async fn leave(&self, client: ClientHandle) -> Remote<bool>;

    /// Close the room and notify every member.
    async fn empty(&self) -> Remote<()>;
}

/// A provider's chat identity, receiving room traffic.
#[async_trait]
pub trait ChatClient: Entity {
    /// A message broadcast in `room`.
    async fn deliver(&self, room: EntityName, sender: String, message: String) -> Remote<()>;

    /// `room` has been closed by its owner.
    async fn closed(&self, room: EntityName) -> Remote<()>;
}

/// The process-wide naming service.
#[async_trait]
pub trait ChatRegistry: Send + Sync {
    /// Bind `entity` under its name. Refused while a live entity holds the name.
    async fn register(&self, entity: EntityHandle) -> Remote<bool>;

    /// Remove the binding of `entity`. Refused if it is not bound.
    async fn deregister(&self, entity: EntityHandle) -> Remote<bool>;

    /// Info of the entity bound under `name`, or `None` if nothing live is bound.
    async fn get_info(&self, name: EntityName) -> Remote<Option<EntityInfo>>;

    /// Every live chat room, reclaiming dead bindings on the way.
    async fn get_chat_rooms(&self) -> Remote<BTreeMap<EntityName, RoomHandle>>;
}
