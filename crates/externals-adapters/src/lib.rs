//! Infrastructure adapters for Externals.
//!
//! This crate implements the ports defined in `externals-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod check_digit;
pub mod entity_store;
pub mod filesystem;
pub mod health;
pub mod random;
pub mod registry;
pub mod translator;

// Re-export commonly used adapters
pub use check_digit::LuhnCheckDigit;
pub use entity_store::{InMemoryEntityStore, StoredRecord, UniqueValue};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use health::{FilesystemHealthCheck, RegistryHealthCheck};
pub use random::{SeededGenerator, ThreadRngGenerator};
pub use registry::{CodeRegistry, IssuedCode, RegistryError};
pub use translator::CatalogTranslator;
