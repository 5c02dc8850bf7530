//! Transport setup error definitions.

use std::net::SocketAddr;

use thiserror::Error;

use crate::domain::ValueObjectError;

/// Errors raised while setting up the transport.
///
/// Failures of individual calls are never reported here; they surface as
/// [`Unreachable`](crate::domain::Unreachable).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] ValueObjectError),
}
