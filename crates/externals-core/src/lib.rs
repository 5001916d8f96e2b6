//! Externals Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Externals:
//! small first-party interfaces in front of third-party components, plus the
//! unique-value generation hook run before an entity is first persisted.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      Persistence layer / externals-cli  │
//! │     (Calls PrePersistListener)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (UniqueValueGenerator, HealthCheckSvc)  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Random, CheckDigit, Repository, i18n)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    externals-adapters (Infrastructure)  │
//! │ (rand, Luhn, catalog, in-memory store)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (CharacterSet, LuhnModN, capabilities)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use externals_core::prelude::*;
//!
//! // 1. Wire the hook with injected adapters
//! let generator = UniqueValueGenerator::new(random, check_digit, translator);
//!
//! // 2. Let the persistence layer call it before the first insert
//! generator.pre_persist(&mut voucher, &repository)?;
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        HealthCheckService, HealthReport, UniqueValueGenerator,
        ports::{
            CheckDigitCalculator, Filesystem, HealthCheck, PrePersistListener,
            RandomStringGenerator, Translator, UniqueValueRepository,
        },
    };
    pub use crate::domain::{
        CharacterSet, Entity, GenerationSettings, HealthStatus, LuhnModN, OnValueGenerated,
        UniqueValueTarget,
    };
    pub use crate::error::{ExternalsError, ExternalsResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
