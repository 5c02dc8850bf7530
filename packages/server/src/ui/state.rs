//! Server state shared by the request handlers.

use std::sync::Arc;

use crate::infrastructure::{Connector, ObjectTable};

/// Shared application state
pub struct AppState {
    /// Objects served by this process
    pub exports: Arc<ObjectTable>,
    /// Resolves handles passed as call arguments, with the nested call timeout
    pub connector: Connector,
}
