use thiserror::Error;

/// Errors raised when an entity rejects its inputs.
///
/// Every violation names the entity, the attribute, the offending value
/// and the rule, so the validation sweep can report it verbatim.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{entity}.{attribute}: {rule} (got {value:?})")]
    Invalid {
        entity: &'static str,
        attribute: &'static str,
        value: String,
        rule: String,
    },

    #[error("timestamp {value:?} does not match {expected}")]
    Timestamp { value: String, expected: &'static str },
}

impl ModelError {
    pub fn invalid(
        entity: &'static str,
        attribute: &'static str,
        value: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        ModelError::Invalid {
            entity,
            attribute,
            value: value.into(),
            rule: rule.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
