//! The three-state field value model.
//!
//! An HL7 field is either absent (emitted as nothing between delimiters),
//! the explicit null `""` (emitted as two visible quote characters, used
//! only where a profile requires the field but its value is undefined), or
//! text. The distinction is first-class; the null is never represented as
//! a sentinel string inside the model.

use crate::escape::escape;
use crate::NULL_LITERAL;

/// A single field (or positional component) of a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// No value; encoded as the empty string between delimiters.
    Empty,
    /// The explicit HL7 null, encoded as the two characters `""`.
    Null,
    /// Pre-composed field content. Data placed here is expected to have
    /// been escaped datum-by-datum; composed fields may legitimately
    /// contain `^`, `~` and `&` as structure.
    Text(String),
}

impl FieldValue {
    /// A field built from a single datum, escaping encoding characters.
    pub fn datum(data: &str) -> Self {
        if data.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Text(escape(data))
        }
    }

    /// A field built from already-composed content (components joined by
    /// the caller). Empty input collapses to `Empty`.
    pub fn composed(content: impl Into<String>) -> Self {
        let content = content.into();
        if content.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Text(content)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// True when a profile-required slot is satisfied: text or the
    /// explicit null, but not absence.
    pub fn is_present(&self) -> bool {
        !self.is_empty()
    }

    /// The encoded form of the field.
    pub fn encoded(&self) -> &str {
        match self {
            FieldValue::Empty => "",
            FieldValue::Null => NULL_LITERAL,
            FieldValue::Text(text) => text,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Empty
    }
}

impl From<&str> for FieldValue {
    fn from(data: &str) -> Self {
        FieldValue::datum(data)
    }
}

impl From<String> for FieldValue {
    fn from(data: String) -> Self {
        FieldValue::datum(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_null_are_distinct() {
        assert_eq!(FieldValue::Empty.encoded(), "");
        assert_eq!(FieldValue::Null.encoded(), "\"\"");
        assert_ne!(FieldValue::Empty, FieldValue::Null);
    }

    #[test]
    fn datum_escapes_encoding_characters() {
        assert_eq!(FieldValue::datum("A|B").encoded(), "A\\F\\B");
    }

    #[test]
    fn empty_datum_collapses_to_absent() {
        assert!(FieldValue::datum("").is_empty());
        assert!(FieldValue::composed(String::new()).is_empty());
    }
}
