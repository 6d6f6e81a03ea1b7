use thiserror::Error;

#[derive(Debug, Error)]
pub enum SegmentError {
    /// An argument violates a rule intrinsic to the segment.
    #[error("{segment}-{field}: {rule} (got {value:?})")]
    Invalid {
        segment: &'static str,
        field: &'static str,
        value: String,
        rule: String,
    },

    #[error(transparent)]
    Encoding(#[from] ssmix_hl7::Hl7Error),
}

impl SegmentError {
    pub fn invalid(
        segment: &'static str,
        field: &'static str,
        value: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        SegmentError::Invalid {
            segment,
            field,
            value: value.into(),
            rule: rule.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SegmentError>;
