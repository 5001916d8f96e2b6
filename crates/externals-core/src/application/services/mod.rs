//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "fill a unique value before persisting" or
//! "report system health".

pub mod health;
pub mod unique_value;

pub use health::{CheckResult, HealthCheckService, HealthReport};
pub use unique_value::{MAX_ATTEMPTS, NOT_GENERATED_KEY, UniqueValueGenerator};
