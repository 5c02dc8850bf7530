//! Shared utilities for Palaver binaries.

pub mod logger;
pub mod time;
