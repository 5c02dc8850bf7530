//! Handler modules for the RPC and HTTP endpoints.

pub mod http;
pub mod rpc;

pub use http::health_check;
pub use rpc::invoke;
