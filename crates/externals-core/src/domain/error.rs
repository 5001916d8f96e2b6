// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid generation settings for '{property}': {reason}")]
    InvalidSettings { property: String, reason: String },

    #[error("Character '{character}' is not part of the alphabet")]
    CharacterNotInAlphabet { character: char },

    #[error("Cannot compute a check digit for an empty value")]
    EmptyValue,

    #[error("Character set '{0}' has no characters")]
    EmptyCharacterSet(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidSettings { property, reason } => vec![
                format!("Property '{}' cannot be generated: {}", property, reason),
                "Use a length of at least 2 when a check digit is required".into(),
            ],
            Self::CharacterNotInAlphabet { character } => vec![
                format!("'{}' is excluded from the code alphabet", character),
                "Codes never contain 0, O, 1, I or L".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSettings { .. } | Self::CharacterNotInAlphabet { .. } | Self::EmptyValue => {
                ErrorCategory::Validation
            }
            Self::EmptyCharacterSet(_) => ErrorCategory::Internal,
        }
    }

    /// Numeric code carried alongside the message.
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidSettings { .. } => 1001,
            Self::CharacterNotInAlphabet { .. } => 1002,
            Self::EmptyValue => 1003,
            Self::EmptyCharacterSet(_) => 1004,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
