//! Errors surfaced by the runtime world.

use rules_core::{CastError, EntityId, ErrorSeverity, GameError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Cast(#[from] CastError),

    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),

    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    /// A thread panicked while holding the named lock.
    #[error("{0} lock poisoned")]
    Poisoned(&'static str),
}

impl RuntimeError {
    /// The underlying cast error, if any.
    pub fn as_cast(&self) -> Option<&CastError> {
        match self {
            Self::Cast(error) => Some(error),
            _ => None,
        }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cast(error) => error.severity(),
            Self::DuplicateEntity(_) | Self::UnknownEntity(_) => ErrorSeverity::Validation,
            Self::Poisoned(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Cast(error) => error.error_code(),
            Self::DuplicateEntity(_) => "RUNTIME_DUPLICATE_ENTITY",
            Self::UnknownEntity(_) => "RUNTIME_UNKNOWN_ENTITY",
            Self::Poisoned(_) => "RUNTIME_LOCK_POISONED",
        }
    }
}
