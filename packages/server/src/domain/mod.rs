//! Domain layer for the chat service.
//!
//! This module contains the entity model (rooms, clients, the registry) and
//! is independent of the transport that carries calls between processes.

pub mod client;
pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod handle;
pub mod registry;
pub mod room;
pub mod room_book;
pub mod value_object;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::LocalChatClient;
pub use entity::{ChatClient, ChatRegistry, ChatRoom, Entity, EntityInfo, EntityKind};
pub use error::{Remote, Unreachable, ValueObjectError};
pub use event::{ClientEvent, OwnerEvent};
pub use factory::{ObjectIdFactory, REGISTRY_OBJECT_ID};
pub use handle::{ClientHandle, EntityHandle, EntityRef, RoomHandle};
pub use registry::Registry;
pub use room::{JOINED_NOTICE, LEFT_NOTICE, LocalChatRoom, UNKNOWN_SENDER};
pub use room_book::{RoomBook, RoomShelf};
pub use value_object::{Endpoint, EntityName, ObjectId, Timestamp};
