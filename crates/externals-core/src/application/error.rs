//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the collaborators
//! reached through ports. Pure logic errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Every attempt produced a value that already exists.
    ///
    /// `message` is the translated, human-readable text.
    #[error("{message} ({attempts} attempts)")]
    UniqueValueNotGenerated { message: String, attempts: u32 },

    /// Storage rejected a row whose unique value already exists.
    #[error("Unique constraint violated: {entity}.{property} = '{value}'")]
    UniqueConstraintViolation {
        entity: String,
        property: String,
        value: String,
    },

    /// The repository could not answer a query.
    #[error("Repository failure: {reason}")]
    RepositoryFailure { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Shared state is unavailable (lock poisoned, etc.).
    #[error("Store lock poisoned")]
    StoreLockError,

    /// A translation catalog could not be read.
    #[error("Translation catalog error: {reason}")]
    TranslationCatalog { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UniqueValueNotGenerated { attempts, .. } => vec![
                format!("No free value was found in {} attempts", attempts),
                "The keyspace is likely too small or nearly exhausted".into(),
                "Increase the generated length".into(),
            ],
            Self::UniqueConstraintViolation { value, .. } => vec![
                format!("'{}' was stored concurrently by another writer", value),
                "Persist the entity again to draw a fresh value".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec![
                "The in-memory store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::TranslationCatalog { .. } => vec![
                "Check the translation catalog file is valid TOML".into(),
                "Messages belong in a [messages] table".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UniqueValueNotGenerated { .. } => ErrorCategory::Exhausted,
            Self::UniqueConstraintViolation { .. } => ErrorCategory::Conflict,
            Self::RepositoryFailure { .. } => ErrorCategory::Internal,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::TranslationCatalog { .. } => ErrorCategory::Configuration,
        }
    }

    /// Numeric code carried alongside the message.
    pub fn code(&self) -> u16 {
        match self {
            Self::UniqueValueNotGenerated { .. } => 2001,
            Self::UniqueConstraintViolation { .. } => 2002,
            Self::RepositoryFailure { .. } => 2003,
            Self::FilesystemError { .. } => 2004,
            Self::StoreLockError => 2005,
            Self::TranslationCatalog { .. } => 2006,
        }
    }
}
