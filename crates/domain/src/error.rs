//! Unified error types for the domain layer
//!
//! Only caller-supplied input can fail. Unresolvable dataset references and
//! irregular rules data are absorbed by the rules code and never surface here.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Ability identifier is not one of the six abilities
    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    /// Skill identifier is not one of the eighteen skills
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
}

impl DomainError {
    /// Creates a validation error for rejected caller input.
    ///
    /// # Example
    /// ```ignore
    /// if amount < 0 {
    ///     return Err(DomainError::validation("Currency cannot be negative"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn unknown_ability(id: impl Into<String>) -> Self {
        Self::UnknownAbility(id.into())
    }

    pub fn unknown_skill(id: impl Into<String>) -> Self {
        Self::UnknownSkill(id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = DomainError::validation("Level must be numeric");
        assert_eq!(err.to_string(), "Validation failed: Level must be numeric");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = DomainError::not_found("ChoiceGroup", "race:elf:languages");
        assert_eq!(
            err.to_string(),
            "Entity not found: ChoiceGroup with id race:elf:languages"
        );
    }

    #[test]
    fn test_unknown_identifier_errors() {
        assert_eq!(
            DomainError::unknown_ability("luck").to_string(),
            "Unknown ability: luck"
        );
        assert_eq!(
            DomainError::unknown_skill("juggling").to_string(),
            "Unknown skill: juggling"
        );
    }
}
