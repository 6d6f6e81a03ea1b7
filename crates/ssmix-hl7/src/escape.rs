//! HL7 escape sequences.
//!
//! Each of the five encoding characters occurring inside data is replaced
//! by its escape sequence before the datum is placed into a field or
//! component. Decoding the encoded form recovers the original string.

use crate::error::{Hl7Error, Result};
use crate::{COMPONENT_SEP, ESCAPE_CHAR, FIELD_SEP, REPETITION_SEP, SUBCOMPONENT_SEP};

/// Escapes the HL7 encoding characters in a datum.
///
/// `|` → `\F\`, `^` → `\S\`, `~` → `\R\`, `\` → `\E\`, `&` → `\T\`.
pub fn escape(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for ch in data.chars() {
        match ch {
            FIELD_SEP => out.push_str("\\F\\"),
            COMPONENT_SEP => out.push_str("\\S\\"),
            REPETITION_SEP => out.push_str("\\R\\"),
            ESCAPE_CHAR => out.push_str("\\E\\"),
            SUBCOMPONENT_SEP => out.push_str("\\T\\"),
            other => out.push(other),
        }
    }
    out
}

/// Decodes escaped data back to the original string.
pub fn unescape(encoded: &str) -> Result<String> {
    let mut out = String::with_capacity(encoded.len());
    let mut chars = encoded.char_indices();
    while let Some((offset, ch)) = chars.next() {
        if ch != ESCAPE_CHAR {
            out.push(ch);
            continue;
        }
        let (_, code) = chars
            .next()
            .ok_or(Hl7Error::TruncatedEscape { offset })?;
        match chars.next() {
            Some((_, close)) if close == ESCAPE_CHAR => {}
            _ => return Err(Hl7Error::TruncatedEscape { offset }),
        }
        match code {
            'F' => out.push(FIELD_SEP),
            'S' => out.push(COMPONENT_SEP),
            'R' => out.push(REPETITION_SEP),
            'E' => out.push(ESCAPE_CHAR),
            'T' => out.push(SUBCOMPONENT_SEP),
            other => {
                return Err(Hl7Error::UnknownEscape {
                    sequence: other.to_string(),
                })
            }
        }
    }
    Ok(out)
}
