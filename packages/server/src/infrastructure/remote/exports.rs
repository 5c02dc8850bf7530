//! Objects this process serves to others.

use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::{
    ChatClient, ChatRegistry, ChatRoom, ClientHandle, Endpoint, EntityRef, ObjectId,
    ObjectIdFactory, RoomHandle,
};

/// An object reachable through this process's RPC endpoint.
#[derive(Clone)]
pub enum Exported {
    Room(Arc<dyn ChatRoom>),
    Client(Arc<dyn ChatClient>),
    Registry(Arc<dyn ChatRegistry>),
}

impl Exported {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Room(_) => "chat room",
            Self::Client(_) => "chat client",
            Self::Registry(_) => "chat registry",
        }
    }
}

/// Export table keyed by object id.
///
/// An entity is reachable from other processes exactly while it is in this
/// table; withdrawing it makes every later call on it fail as unreachable.
pub struct ObjectTable {
    endpoint: Endpoint,
    objects: DashMap<ObjectId, Exported>,
}

impl ObjectTable {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            objects: DashMap::new(),
        }
    }

    /// Endpoint under which the exported objects are advertised.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn export_room(&self, room: Arc<dyn ChatRoom>) -> RoomHandle {
        let reference = self.insert(ObjectIdFactory::generate(), Exported::Room(room.clone()));
        RoomHandle::new(reference, room)
    }

    pub fn export_client(&self, client: Arc<dyn ChatClient>) -> ClientHandle {
        let reference = self.insert(ObjectIdFactory::generate(), Exported::Client(client.clone()));
        ClientHandle::new(reference, client)
    }

    /// Export the registry under its well-known object id.
    pub fn export_registry(&self, registry: Arc<dyn ChatRegistry>) -> EntityRef {
        self.insert(ObjectIdFactory::registry(), Exported::Registry(registry))
    }

    fn insert(&self, object_id: ObjectId, object: Exported) -> EntityRef {
        tracing::debug!("Exporting {} as {}", object.kind(), object_id);
        self.objects.insert(object_id.clone(), object);
        EntityRef::new(self.endpoint.clone(), object_id)
    }

    pub fn get(&self, object_id: &ObjectId) -> Option<Exported> {
        self.objects.get(object_id).map(|entry| entry.value().clone())
    }

    /// Resolve a reference to a local object, if it was exported here.
    pub fn lookup(&self, reference: &EntityRef) -> Option<Exported> {
        if reference.endpoint != self.endpoint {
            return None;
        }
        self.get(&reference.object_id)
    }

    /// Stop serving one object. Returns whether it was exported here.
    pub fn withdraw(&self, reference: &EntityRef) -> bool {
        if reference.endpoint != self.endpoint {
            return false;
        }
        let removed = self.objects.remove(&reference.object_id).is_some();
        if removed {
            tracing::debug!("Withdrew {}", reference);
        }
        removed
    }

    /// Stop serving every object. Returns how many were withdrawn.
    pub fn withdraw_all(&self) -> usize {
        let count = self.objects.len();
        self.objects.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
