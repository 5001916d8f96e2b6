//! Entity capability contracts.
//!
//! A persistable record implements [`Entity`]. Records that want a generated
//! unique value additionally expose a [`UniqueValueTarget`] through
//! [`Entity::unique_value_target`]; everything else is left untouched by the
//! pre-persist hook.

/// A record handed to the persistence layer.
pub trait Entity {
    /// Stable name of the entity kind, used to scope repository queries.
    fn entity_name(&self) -> &str;

    /// The unique-value capability, if this entity opts in.
    fn unique_value_target(&mut self) -> Option<&mut dyn UniqueValueTarget> {
        None
    }
}

/// Capability: the entity wants one of its properties filled with a random,
/// repository-unique value before it is first persisted.
pub trait UniqueValueTarget {
    /// When false the hook does nothing for this entity.
    fn generators_enabled(&self) -> bool {
        true
    }

    /// Name of the property holding the generated value.
    fn generated_property(&self) -> &str;

    /// Total length of the value, check digit included.
    fn generated_property_length(&self) -> usize;

    /// Whether the last character is a check digit.
    fn has_check_digit(&self) -> bool {
        false
    }

    /// Assign the generated value.
    fn set_generated_value(&mut self, value: String);

    /// Current value of the generated property.
    fn generated_value(&self) -> Option<&str>;

    /// Optional callback run once after assignment.
    fn generated_callback(&mut self) -> Option<&mut dyn OnValueGenerated> {
        None
    }
}

/// Callback capability: react to (or override) a freshly generated value.
///
/// Whatever the callback stores is not re-checked for uniqueness.
pub trait OnValueGenerated {
    fn on_generated(&mut self, value: &str);
}
