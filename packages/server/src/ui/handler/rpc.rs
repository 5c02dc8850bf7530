//! Dispatch of incoming calls to exported objects.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::{
        ChatClient, ChatRegistry, ChatRoom, ClientHandle, Entity, EntityKind, ObjectId,
        Unreachable,
    },
    infrastructure::{
        Connector, Exported,
        dto::{Call, Invocation, Reply, RpcFault, WireHandle},
    },
    ui::state::AppState,
};

/// Why a call could not be completed on this side.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no object exported as {0}")]
    UnknownObject(ObjectId),

    #[error("{kind} does not support {op}")]
    Unsupported { kind: &'static str, op: &'static str },

    #[error("expected a {expected} handle, got a {actual}")]
    WrongKind {
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    Failed(#[from] Unreachable),
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnknownObject(_) => StatusCode::NOT_FOUND,
            Self::Unsupported { .. } | Self::WrongKind { .. } => StatusCode::BAD_REQUEST,
            Self::Failed(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let fault = RpcFault {
            message: self.to_string(),
        };
        (status, Json(fault)).into_response()
    }
}

/// `POST /rpc`
pub async fn invoke(
    State(state): State<Arc<AppState>>,
    Json(invocation): Json<Invocation>,
) -> Result<Json<Reply>, DispatchError> {
    let Invocation { target, call } = invocation;
    let object = state
        .exports
        .get(&target)
        .ok_or_else(|| DispatchError::UnknownObject(target.clone()))?;

    tracing::debug!("{} on {} {}", call.op(), object.kind(), target);

    let reply = match object {
        Exported::Room(room) => dispatch_room(&state.connector, room.as_ref(), call).await,
        Exported::Client(client) => dispatch_client(client.as_ref(), call).await,
        Exported::Registry(registry) => {
            dispatch_registry(&state.connector, registry.as_ref(), call).await
        }
    };

    if let Err(e) = &reply {
        tracing::debug!("Call on {} not completed: {}", target, e);
    }
    reply.map(Json)
}

fn client_arg(connector: &Connector, wire: WireHandle) -> Result<ClientHandle, DispatchError> {
    match wire.kind {
        EntityKind::Client => Ok(connector.client(wire.reference)),
        other => Err(DispatchError::WrongKind {
            expected: EntityKind::Client.label(),
            actual: other.label(),
        }),
    }
}

async fn dispatch_room(
    connector: &Connector,
    room: &dyn ChatRoom,
    call: Call,
) -> Result<Reply, DispatchError> {
    let reply = match call {
        Call::Name => Reply::Name {
            name: room.name().await?,
        },
        Call::Info => Reply::Info {
            info: room.info().await?,
        },
        Call::Join { client } => Reply::Accepted {
            accepted: room.join(client_arg(connector, client)?).await?,
        },
        Call::Talk { client, message } => Reply::Accepted {
            accepted: room.talk(client_arg(connector, client)?, message).await?,
        },
        Call::Leave { client } => Reply::Accepted {
            accepted: room.leave(client_arg(connector, client)?).await?,
        },
        Call::Empty => {
            room.empty().await?;
            Reply::Done
        }
        other => {
            return Err(DispatchError::Unsupported {
                kind: EntityKind::Room.label(),
                op: other.op(),
            });
        }
    };
    Ok(reply)
}

async fn dispatch_client(client: &dyn ChatClient, call: Call) -> Result<Reply, DispatchError> {
    let reply = match call {
        Call::Name => Reply::Name {
            name: client.name().await?,
        },
        Call::Info => Reply::Info {
            info: client.info().await?,
        },
        Call::Deliver {
            room,
            sender,
            message,
        } => {
            client.deliver(room, sender, message).await?;
            Reply::Done
        }
        Call::Closed { room } => {
            client.closed(room).await?;
            Reply::Done
        }
        other => {
            return Err(DispatchError::Unsupported {
                kind: EntityKind::Client.label(),
                op: other.op(),
            });
        }
    };
    Ok(reply)
}

async fn dispatch_registry(
    connector: &Connector,
    registry: &dyn ChatRegistry,
    call: Call,
) -> Result<Reply, DispatchError> {
    let reply = match call {
        Call::Register { entity } => Reply::Accepted {
            accepted: registry.register(connector.entity(entity)).await?,
        },
        Call::Deregister { entity } => Reply::Accepted {
            accepted: registry.deregister(connector.entity(entity)).await?,
        },
        Call::GetInfo { name } => Reply::Lookup {
            info: registry.get_info(name).await?,
        },
        Call::GetChatRooms => Reply::Rooms {
            rooms: registry
                .get_chat_rooms()
                .await?
                .iter()
                .map(|(name, room)| (name.clone(), WireHandle::room(room)))
                .collect(),
        },
        other => {
            return Err(DispatchError::Unsupported {
                kind: "chat registry",
                op: other.op(),
            });
        }
    };
    Ok(reply)
}
