//! Notifications flowing out of rooms and clients.
//!
//! Both are delivered over unbounded channels so that sending never waits on
//! the consumer.

use super::{handle::ClientHandle, value_object::EntityName};

/// Room → owning provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerEvent {
    /// The room's last member left; it is closed for good.
    RoomClosed { room: EntityName },
    /// A member failed a delivery and was evicted.
    ClientUnreachable { client: ClientHandle },
}

/// Client → local consumer (the provider, then the UI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A message broadcast in a joined room.
    Delivered {
        room: EntityName,
        sender: String,
        message: String,
    },
    /// A joined room was closed by its owner.
    RoomClosed { room: EntityName },
}
