//! CLI error definitions.

use palaver_server::usecase::ProviderError;
use thiserror::Error;

/// Errors that end an interactive session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
