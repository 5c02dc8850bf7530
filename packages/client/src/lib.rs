//! Interactive chat provider.
//!
//! A thin command line over [`palaver_server::ChatProvider`]: it reads user
//! commands with rustyline and prints what the provider's chat client receives.

pub mod cli;

// Re-export entry points
pub use cli::run_cli;
