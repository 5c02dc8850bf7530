//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::Unreachable;

/// Errors reported by provider operations.
///
/// Policy rejections (name taken, not a member, ...) are not errors; the
/// operations report them as `Ok(false)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The operation needs a registered chat client
    #[error("no chat client is registered yet")]
    NotRegistered,

    /// The provider already owns a chat client
    #[error("a chat client is already registered")]
    AlreadyRegistered,

    /// The registry did not answer
    #[error("registry is unreachable: {0}")]
    RegistryUnreachable(#[from] Unreachable),
}
