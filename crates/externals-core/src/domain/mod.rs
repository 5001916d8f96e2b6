// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Externals.
//!
//! This module contains pure logic with ZERO external dependencies.
//! Randomness, storage and translation are reached via ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No external crates**: Only std library + thiserror (+ serde derives)
//! - **Explicit capabilities**: Entities opt in through traits, never reflection
//!
// Public API - what the world sees
pub mod charset;
pub mod check_digit;
pub mod entity;
pub mod error;
pub mod health;
pub mod settings;

// Re-exports for convenience
pub use charset::CharacterSet;
pub use check_digit::LuhnModN;
pub use entity::{Entity, OnValueGenerated, UniqueValueTarget};
pub use error::{DomainError, ErrorCategory};
pub use health::HealthStatus;
pub use settings::GenerationSettings;
