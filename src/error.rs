use crate::module::SystemModule;
use crate::types::{RoleId, TabId};
use thiserror::Error;

/// Store-layer error type.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
///
/// Authorization outcomes are never reported through this type; a denial is
/// an ordinary [`Decision`](crate::Decision).
#[derive(Debug, Error)]
pub enum Error {
    /// Store error wrapper.
    #[error("store error: {0}")]
    Store(#[source] StoreError),
    /// Invalid identifier input.
    #[error("invalid id: {0}")]
    InvalidId(String),
    /// Invalid permission input.
    #[error("invalid permission: {0}")]
    InvalidPermission(String),
    /// Module name outside the closed module set.
    #[error("unknown module: {0}")]
    UnknownModule(String),
    /// Action name outside the closed action set.
    #[error("unknown action: {0}")]
    UnknownAction(String),
    /// Tab-scoped grant naming a tab the module does not declare.
    #[error("unknown tab {tab} in module {module}")]
    UnknownTab { module: SystemModule, tab: TabId },
    /// Two catalog entries share an id.
    #[error("duplicate role id: {0}")]
    DuplicateRole(RoleId),
    /// Policy configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}
