use thiserror::Error;

/// Errors raised by the encoding layer.
#[derive(Debug, Error)]
pub enum Hl7Error {
    /// An escape sequence in encoded data is not one of `\F\ \S\ \R\ \E\ \T\`.
    #[error("unknown escape sequence: \\{sequence}\\")]
    UnknownEscape { sequence: String },

    /// Encoded data ends in the middle of an escape sequence.
    #[error("truncated escape sequence at offset {offset}")]
    TruncatedEscape { offset: usize },

    /// A segment identifier is not a three-character uppercase code.
    #[error("invalid segment id: {id:?}")]
    InvalidSegmentId { id: String },
}

pub type Result<T> = std::result::Result<T, Hl7Error>;
