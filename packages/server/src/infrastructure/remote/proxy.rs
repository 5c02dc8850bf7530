//! Proxies that forward entity and registry calls to another process.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{Connector, RpcClient};
use crate::{
    domain::{
        ChatClient, ChatRegistry, ChatRoom, ClientHandle, Entity, EntityHandle, EntityInfo,
        EntityKind, EntityName, EntityRef, Remote, RoomHandle, Unreachable,
    },
    infrastructure::dto::{Call, Reply, WireHandle},
};

/// The addressing half every proxy shares.
#[derive(Debug, Clone)]
struct Stub {
    reference: EntityRef,
    rpc: RpcClient,
}

impl Stub {
    fn unexpected(&self, op: &str, reply: Reply) -> Unreachable {
        Unreachable::new(format!(
            "unexpected reply to {op} from {}: {reply:?}",
            self.reference
        ))
    }

    async fn call(&self, call: Call) -> Remote<Reply> {
        self.rpc.invoke(&self.reference, call).await
    }

    async fn name(&self) -> Remote<EntityName> {
        match self.call(Call::Name).await? {
            Reply::Name { name } => Ok(name),
            other => Err(self.unexpected("name", other)),
        }
    }

    async fn info(&self) -> Remote<EntityInfo> {
        match self.call(Call::Info).await? {
            Reply::Info { info } => Ok(info),
            other => Err(self.unexpected("info", other)),
        }
    }

    async fn accepted(&self, call: Call) -> Remote<bool> {
        let op = call.op();
        match self.call(call).await? {
            Reply::Accepted { accepted } => Ok(accepted),
            other => Err(self.unexpected(op, other)),
        }
    }

    async fn done(&self, call: Call) -> Remote<()> {
        let op = call.op();
        match self.call(call).await? {
            Reply::Done => Ok(()),
            other => Err(self.unexpected(op, other)),
        }
    }
}

/// A chat room living in another process.
#[derive(Debug, Clone)]
pub struct RemoteRoom {
    stub: Stub,
}

impl RemoteRoom {
    pub fn new(reference: EntityRef, rpc: RpcClient) -> Self {
        Self {
            stub: Stub { reference, rpc },
        }
    }
}

#[async_trait]
impl Entity for RemoteRoom {
    async fn name(&self) -> Remote<EntityName> {
        self.stub.name().await
    }

    async fn info(&self) -> Remote<EntityInfo> {
        self.stub.info().await
    }
}

#[async_trait]
impl ChatRoom for RemoteRoom {
    async fn join(&self, client: ClientHandle) -> Remote<bool> {
        self.stub
            .accepted(Call::Join {
                client: WireHandle::client(&client),
            })
            .await
    }

    async fn talk(&self, client: ClientHandle, message: String) -> Remote<bool> {
        self.stub
            .accepted(Call::Talk {
                client: WireHandle::client(&client),
                message,
            })
            .await
    }

    async fn leave(&self, client: ClientHandle) -> Remote<bool> {
        self.stub
            .accepted(Call::Leave {
                client: WireHandle::client(&client),
            })
            .await
    }

    async fn empty(&self) -> Remote<()> {
        self.stub.done(Call::Empty).await
    }
}

/// A chat client living in another process.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    stub: Stub,
}

impl RemoteClient {
    pub fn new(reference: EntityRef, rpc: RpcClient) -> Self {
        Self {
            stub: Stub { reference, rpc },
        }
    }
}

#[async_trait]
impl Entity for RemoteClient {
    async fn name(&self) -> Remote<EntityName> {
        self.stub.name().await
    }

    async fn info(&self) -> Remote<EntityInfo> {
        self.stub.info().await
    }
}

#[async_trait]
impl ChatClient for RemoteClient {
    async fn deliver(&self, room: EntityName, sender: String, message: String) -> Remote<()> {
        self.stub
            .done(Call::Deliver {
                room,
                sender,
                message,
            })
            .await
    }

    async fn closed(&self, room: EntityName) -> Remote<()> {
        self.stub.done(Call::Closed { room }).await
    }
}

/// The registry, as seen from a provider process.
///
/// Room handles in a `get_chat_rooms` reply are resolved through the
/// [`Connector`], so rooms hosted by this process are called directly.
#[derive(Clone)]
pub struct RemoteRegistry {
    stub: Stub,
    connector: Connector,
}

impl RemoteRegistry {
    pub fn new(reference: EntityRef, connector: Connector) -> Self {
        Self {
            stub: Stub {
                reference,
                rpc: connector.rpc().clone(),
            },
            connector,
        }
    }
}

#[async_trait]
impl ChatRegistry for RemoteRegistry {
    async fn register(&self, entity: EntityHandle) -> Remote<bool> {
        self.stub
            .accepted(Call::Register {
                entity: WireHandle::from(&entity),
            })
            .await
    }

    async fn deregister(&self, entity: EntityHandle) -> Remote<bool> {
        self.stub
            .accepted(Call::Deregister {
                entity: WireHandle::from(&entity),
            })
            .await
    }

    async fn get_info(&self, name: EntityName) -> Remote<Option<EntityInfo>> {
        match self.stub.call(Call::GetInfo { name }).await? {
            Reply::Lookup { info } => Ok(info),
            other => Err(self.stub.unexpected("get-info", other)),
        }
    }

    async fn get_chat_rooms(&self) -> Remote<BTreeMap<EntityName, RoomHandle>> {
        match self.stub.call(Call::GetChatRooms).await? {
            Reply::Rooms { rooms } => Ok(rooms
                .into_iter()
                .filter(|(_, wire)| wire.kind == EntityKind::Room)
                .map(|(name, wire)| (name, self.connector.room(wire.reference)))
                .collect()),
            other => Err(self.stub.unexpected("get-chat-rooms", other)),
        }
    }
}
