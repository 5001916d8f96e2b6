//! Application layer for Externals.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (UniqueValueGenerator, HealthCheckService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer. Pure rules such as
//! the check-digit algorithm live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CheckResult, HealthCheckService, HealthReport, MAX_ATTEMPTS, NOT_GENERATED_KEY,
    UniqueValueGenerator,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CheckDigitCalculator, Filesystem, HealthCheck, PrePersistListener, RandomStringGenerator,
    Translator, UniqueValueRepository,
};

pub use error::ApplicationError;
