//! Peer-hosted group chat library.
//!
//! Chat rooms and chat clients live in the provider processes that created
//! them and are called remotely by everyone else. A single registry process
//! maps names to those entities and reclaims the names of entities whose
//! process has died.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{RpcServer, run_registry};
pub use usecase::ChatProvider;
