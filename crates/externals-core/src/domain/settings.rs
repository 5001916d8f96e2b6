use crate::domain::{entity::UniqueValueTarget, error::DomainError};

/// Validated snapshot of what an entity asks the generator for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    property: String,
    length: usize,
    check_digit: bool,
}

impl GenerationSettings {
    pub fn new(
        property: impl Into<String>,
        length: usize,
        check_digit: bool,
    ) -> Result<Self, DomainError> {
        let property = property.into();

        if property.trim().is_empty() {
            return Err(DomainError::InvalidSettings {
                property,
                reason: "property name is empty".into(),
            });
        }
        if length == 0 {
            return Err(DomainError::InvalidSettings {
                property,
                reason: "length must be positive".into(),
            });
        }
        if check_digit && length < 2 {
            return Err(DomainError::InvalidSettings {
                property,
                reason: "length must leave room for a check digit".into(),
            });
        }

        Ok(Self {
            property,
            length,
            check_digit,
        })
    }

    /// Read the settings off an entity's capability.
    pub fn from_target(target: &dyn UniqueValueTarget) -> Result<Self, DomainError> {
        Self::new(
            target.generated_property(),
            target.generated_property_length(),
            target.has_check_digit(),
        )
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Total length, check digit included.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn has_check_digit(&self) -> bool {
        self.check_digit
    }

    /// Number of characters drawn at random.
    pub fn random_length(&self) -> usize {
        if self.check_digit {
            self.length - 1
        } else {
            self.length
        }
    }
}
