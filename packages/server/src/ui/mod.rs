//! RPC server exposing this process's exported objects.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{RpcServer, router, run_registry};
pub use signal::shutdown_signal;
