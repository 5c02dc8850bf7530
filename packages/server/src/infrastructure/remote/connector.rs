//! Turns references received over the wire into callable handles.

use std::sync::Arc;

use super::{Exported, ObjectTable, RemoteClient, RemoteRegistry, RemoteRoom, RpcClient};
use crate::{
    domain::{
        ChatRegistry, ClientHandle, Endpoint, EntityHandle, EntityKind, EntityRef,
        ObjectIdFactory, RoomHandle,
    },
    infrastructure::dto::WireHandle,
};

/// Resolves [`EntityRef`]s to handles.
///
/// A reference to an object exported by this process resolves to the object
/// itself; anything else resolves to a proxy.
#[derive(Clone)]
pub struct Connector {
    rpc: RpcClient,
    exports: Arc<ObjectTable>,
}

impl Connector {
    pub fn new(rpc: RpcClient, exports: Arc<ObjectTable>) -> Self {
        Self { rpc, exports }
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    pub fn exports(&self) -> &Arc<ObjectTable> {
        &self.exports
    }

    pub fn room(&self, reference: EntityRef) -> RoomHandle {
        if let Some(Exported::Room(room)) = self.exports.lookup(&reference) {
            return RoomHandle::new(reference, room);
        }
        let proxy = RemoteRoom::new(reference.clone(), self.rpc.clone());
        RoomHandle::new(reference, Arc::new(proxy))
    }

    pub fn client(&self, reference: EntityRef) -> ClientHandle {
        if let Some(Exported::Client(client)) = self.exports.lookup(&reference) {
            return ClientHandle::new(reference, client);
        }
        let proxy = RemoteClient::new(reference.clone(), self.rpc.clone());
        ClientHandle::new(reference, Arc::new(proxy))
    }

    pub fn entity(&self, wire: WireHandle) -> EntityHandle {
        match wire.kind {
            EntityKind::Room => self.room(wire.reference).into(),
            EntityKind::Client => self.client(wire.reference).into(),
        }
    }

    /// The registry published at `endpoint` under its well-known name.
    pub fn registry(&self, endpoint: Endpoint) -> Arc<dyn ChatRegistry> {
        let reference = EntityRef::new(endpoint, ObjectIdFactory::registry());
        if let Some(Exported::Registry(registry)) = self.exports.lookup(&reference) {
            return registry;
        }
        Arc::new(RemoteRegistry::new(reference, self.clone()))
    }
}
