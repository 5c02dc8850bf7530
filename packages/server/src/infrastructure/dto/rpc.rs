//! RPC wire format.
//!
//! A call is an HTTP `POST /rpc` whose body is an [`Invocation`] naming the
//! target object and the operation. A `200` response carries a [`Reply`];
//! any other status carries an [`RpcFault`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    ClientHandle, EntityHandle, EntityInfo, EntityKind, EntityName, EntityRef, ObjectId,
    RoomHandle,
};

/// Path of the RPC endpoint.
pub const RPC_PATH: &str = "/rpc";

/// An entity handle as passed by reference over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireHandle {
    pub kind: EntityKind,
    pub reference: EntityRef,
}

impl WireHandle {
    pub fn room(room: &RoomHandle) -> Self {
        Self {
            kind: EntityKind::Room,
            reference: room.reference().clone(),
        }
    }

    pub fn client(client: &ClientHandle) -> Self {
        Self {
            kind: EntityKind::Client,
            reference: client.reference().clone(),
        }
    }
}

impl From<&EntityHandle> for WireHandle {
    fn from(entity: &EntityHandle) -> Self {
        Self {
            kind: entity.kind(),
            reference: entity.reference().clone(),
        }
    }
}

/// A call addressed to one exported object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub target: ObjectId,
    pub call: Call,
}

/// Every remotely invocable operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Call {
    // Entity
    Name,
    Info,
    // ChatRoom
    Join {
        client: WireHandle,
    },
    Talk {
        client: WireHandle,
        message: String,
    },
    Leave {
        client: WireHandle,
    },
    Empty,
    // ChatClient
    Deliver {
        room: EntityName,
        sender: String,
        message: String,
    },
    Closed {
        room: EntityName,
    },
    // ChatRegistry
    Register {
        entity: WireHandle,
    },
    Deregister {
        entity: WireHandle,
    },
    GetInfo {
        name: EntityName,
    },
    GetChatRooms,
}

impl Call {
    /// Operation name, as it appears on the wire.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Info => "info",
            Self::Join { .. } => "join",
            Self::Talk { .. } => "talk",
            Self::Leave { .. } => "leave",
            Self::Empty => "empty",
            Self::Deliver { .. } => "deliver",
            Self::Closed { .. } => "closed",
            Self::Register { .. } => "register",
            Self::Deregister { .. } => "deregister",
            Self::GetInfo { .. } => "get-info",
            Self::GetChatRooms => "get-chat-rooms",
        }
    }
}

/// Result of a completed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Reply {
    Name { name: EntityName },
    Info { info: EntityInfo },
    /// `false` is a policy rejection, not a failure.
    Accepted { accepted: bool },
    Done,
    Lookup { info: Option<EntityInfo> },
    Rooms { rooms: BTreeMap<EntityName, WireHandle> },
}

/// Body of a non-`200` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcFault {
    pub message: String,
}
