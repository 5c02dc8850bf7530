//! Remote-call transport: HTTP+JSON calls between chat processes.

pub mod config;
pub mod connector;
pub mod error;
pub mod exports;
pub mod proxy;
pub mod rpc_client;

pub use config::TransportConfig;
pub use connector::Connector;
pub use error::TransportError;
pub use exports::{Exported, ObjectTable};
pub use proxy::{RemoteClient, RemoteRegistry, RemoteRoom};
pub use rpc_client::RpcClient;
