//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `externals-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `RandomStringGenerator`: Random candidate values
//!   - `CheckDigitCalculator`: Check characters
//!   - `UniqueValueRepository`: Uniqueness query of the active session
//!   - `Translator`: Human-readable messages
//!   - `HealthCheck`: Named probes
//!   - `Filesystem`: File operations
//!
//! - **Driving (Input) Ports**: Called by the persistence layer
//!   - `PrePersistListener`: Implemented by `UniqueValueGenerator`

pub mod output;

pub use output::{
    CheckDigitCalculator, Filesystem, HealthCheck, PrePersistListener, RandomStringGenerator,
    Translator, UniqueValueRepository,
};

#[cfg(test)]
pub use output::{
    MockCheckDigitCalculator, MockRandomStringGenerator, MockTranslator,
    MockUniqueValueRepository,
};
