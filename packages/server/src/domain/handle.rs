//! Pass-by-reference handles to chat entities.
//!
//! A handle pairs the entity's location-independent identity ([`EntityRef`])
//! with something that can be called: the object itself when it lives in this
//! process, or a proxy that forwards over the transport. Handles compare and
//! hash by identity only.

use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use super::{
    entity::{ChatClient, ChatRoom, Entity, EntityInfo, EntityKind},
    error::Remote,
    value_object::{EntityName, Endpoint, ObjectId},
};

/// Globally unique identity of an exported entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Process hosting the entity
    pub endpoint: Endpoint,
    /// Object id within that process
    pub object_id: ObjectId,
}

impl EntityRef {
    pub fn new(endpoint: Endpoint, object_id: ObjectId) -> Self {
        Self {
            endpoint,
            object_id,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.endpoint, self.object_id)
    }
}

macro_rules! entity_handle {
    ($(#[$meta:meta])* $handle:ident, $capability:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $handle {
            reference: EntityRef,
            target: Arc<dyn $capability>,
        }

        impl $handle {
            pub fn new(reference: EntityRef, target: Arc<dyn $capability>) -> Self {
                Self { reference, target }
            }

            /// Identity of the entity behind this handle.
            pub fn reference(&self) -> &EntityRef {
                &self.reference
            }
        }

        impl Deref for $handle {
            type Target = dyn $capability;

            fn deref(&self) -> &Self::Target {
                self.target.as_ref()
            }
        }

        impl PartialEq for $handle {
            fn eq(&self, other: &Self) -> bool {
                self.reference == other.reference
            }
        }

        impl Eq for $handle {}

        impl Hash for $handle {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.reference.hash(state);
            }
        }

        impl fmt::Debug for $handle {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($handle))
                    .field(&self.reference)
                    .finish()
            }
        }
    };
}

entity_handle!(
    /// Handle to a chat room.
    RoomHandle,
    ChatRoom
);

entity_handle!(
    /// Handle to a chat client.
    ClientHandle,
    ChatClient
);

/// A registrable entity, tagged by capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityHandle {
    Room(RoomHandle),
    Client(ClientHandle),
}

impl EntityHandle {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Room(_) => EntityKind::Room,
            Self::Client(_) => EntityKind::Client,
        }
    }

    pub fn reference(&self) -> &EntityRef {
        match self {
            Self::Room(room) => room.reference(),
            Self::Client(client) => client.reference(),
        }
    }

    /// Liveness probe: the entity's current name.
    pub async fn name(&self) -> Remote<EntityName> {
        match self {
            Self::Room(room) => room.name().await,
            Self::Client(client) => client.name().await,
        }
    }

    pub async fn info(&self) -> Remote<EntityInfo> {
        match self {
            Self::Room(room) => room.info().await,
            Self::Client(client) => client.info().await,
        }
    }

    pub fn as_room(&self) -> Option<&RoomHandle> {
        match self {
            Self::Room(room) => Some(room),
            Self::Client(_) => None,
        }
    }
}

impl From<RoomHandle> for EntityHandle {
    fn from(room: RoomHandle) -> Self {
        Self::Room(room)
    }
}

impl From<ClientHandle> for EntityHandle {
    fn from(client: ClientHandle) -> Self {
        Self::Client(client)
    }
}
