//! Infrastructure layer: the remote-call transport between processes.

pub mod dto;
pub mod remote;

pub use remote::{
    Connector, Exported, ObjectTable, RemoteClient, RemoteRegistry, RemoteRoom, RpcClient,
    TransportConfig, TransportError,
};
