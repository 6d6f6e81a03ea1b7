use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageError {
    /// A profile precondition or tightened field rule failed. These
    /// indicate a programming bug upstream and abort the run.
    #[error("{message_type}: {rule}")]
    Profile {
        message_type: &'static str,
        rule: String,
    },

    #[error(transparent)]
    Segment(#[from] ssmix_segments::SegmentError),
}

impl MessageError {
    pub fn profile(message_type: &'static str, rule: impl Into<String>) -> Self {
        MessageError::Profile {
            message_type,
            rule: rule.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MessageError>;
