//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `externals-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{CharacterSet, Entity, HealthStatus};
use crate::error::ExternalsResult;

/// Port for random string generation.
///
/// Implemented by:
/// - `externals_adapters::random::ThreadRngGenerator` (production)
/// - `externals_adapters::random::SeededGenerator` (reproducible runs)
#[cfg_attr(test, mockall::automock)]
pub trait RandomStringGenerator: Send + Sync {
    /// Draw `length` characters from the alphabet of `charset`.
    fn random_string(&self, length: usize, charset: CharacterSet) -> String;
}

/// Port for check-digit calculation.
///
/// Implemented by:
/// - `externals_adapters::check_digit::LuhnCheckDigit`
#[cfg_attr(test, mockall::automock)]
pub trait CheckDigitCalculator: Send + Sync {
    /// Single check character for `value`.
    fn calculate(&self, value: &str) -> ExternalsResult<char>;

    /// True if the trailing character of `value` is its check character.
    fn verify(&self, value: &str) -> ExternalsResult<bool>;
}

/// Port for the uniqueness query of the active repository.
///
/// Implemented by:
/// - `externals_adapters::entity_store::InMemoryEntityStore`
#[cfg_attr(test, mockall::automock)]
pub trait UniqueValueRepository: Send + Sync {
    /// Number of stored `entity` rows whose `property` equals `value`.
    fn count(&self, entity: &str, property: &str, value: &str) -> ExternalsResult<u64>;
}

/// Port for message translation.
///
/// Implemented by:
/// - `externals_adapters::translator::CatalogTranslator`
#[cfg_attr(test, mockall::automock)]
pub trait Translator: Send + Sync {
    /// Translated message for `key`; unknown keys come back unchanged.
    fn translate(&self, key: &str) -> String;
}

/// Port for listeners the persistence layer runs before a first insert.
///
/// Implemented by:
/// - `crate::application::UniqueValueGenerator`
pub trait PrePersistListener: Send + Sync {
    fn pre_persist(
        &self,
        entity: &mut dyn Entity,
        repository: &dyn UniqueValueRepository,
    ) -> ExternalsResult<()>;
}

/// Port for a single named health check.
///
/// Implemented by:
/// - `externals_adapters::health::FilesystemHealthCheck`
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self) -> HealthStatus;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `externals_adapters::filesystem::LocalFilesystem` (production)
/// - `externals_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ExternalsResult<()>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> ExternalsResult<()>;

    /// Append content to a file, creating it if missing.
    fn append_file(&self, path: &Path, content: &str) -> ExternalsResult<()>;

    /// Read a whole file as UTF-8.
    fn read_file(&self, path: &Path) -> ExternalsResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a file or a directory and all contents.
    fn remove(&self, path: &Path) -> ExternalsResult<()>;

    /// Copy a file.
    fn copy(&self, from: &Path, to: &Path) -> ExternalsResult<()>;

    /// Move a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> ExternalsResult<()>;
}
