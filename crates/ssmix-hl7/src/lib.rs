//! HL7 v2.5 encoding primitives.
//!
//! This crate owns the byte-exact rules of the wire format: the fixed
//! encoding characters, the escape sequences, the three-state field value
//! model (absent, explicit null, text), and the assembly of fields into
//! segments and segments into `\r`-framed messages.

pub mod escape;
pub mod field;
pub mod segment;

mod error;

pub use error::{Hl7Error, Result};
pub use escape::{escape, unescape};
pub use field::FieldValue;
pub use segment::{Message, Segment};

/// Field separator (MSH-1).
pub const FIELD_SEP: char = '|';
/// Component separator.
pub const COMPONENT_SEP: char = '^';
/// Repetition separator.
pub const REPETITION_SEP: char = '~';
/// Escape character.
pub const ESCAPE_CHAR: char = '\\';
/// Subcomponent separator.
pub const SUBCOMPONENT_SEP: char = '&';

/// The MSH-2 encoding characters, emitted literally and never escaped.
pub const ENCODING_CHARACTERS: &str = "^~\\&";

/// Segment terminator. HL7 frames segments with a carriage return; a bare
/// line feed must never appear inside a message.
pub const SEGMENT_TERMINATOR: char = '\r';

/// The visible two-character null, used where a profile requires a field
/// whose semantic value is undefined.
pub const NULL_LITERAL: &str = "\"\"";

/// Joins already-escaped parts with the component separator.
///
/// Trailing content is preserved as given; callers that need positional
/// components (e.g. `last^first^^^^^L^I`) pass every slot explicitly.
pub fn join_components<S: AsRef<str>>(parts: &[S]) -> String {
    join_with(parts, COMPONENT_SEP)
}

/// Joins already-escaped parts with the repetition separator.
pub fn join_repetitions<S: AsRef<str>>(parts: &[S]) -> String {
    join_with(parts, REPETITION_SEP)
}

/// Joins already-escaped parts with the subcomponent separator.
pub fn join_subcomponents<S: AsRef<str>>(parts: &[S]) -> String {
    join_with(parts, SUBCOMPONENT_SEP)
}

fn join_with<S: AsRef<str>>(parts: &[S], sep: char) -> String {
    let mut out = String::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            out.push(sep);
        }
        out.push_str(part.as_ref());
    }
    out
}
