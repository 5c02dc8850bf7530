//! Data transfer objects exchanged between processes.

pub mod rpc;

pub use rpc::{Call, Invocation, Reply, RpcFault, WireHandle};
