//! Segment and message assembly.
//!
//! A segment is its three-letter id plus a positional field list; encoding
//! joins the fields with `|` and trims trailing empty fields. A message is
//! an ordered segment list framed with `\r` terminators.

use crate::error::{Hl7Error, Result};
use crate::field::FieldValue;
use crate::{ENCODING_CHARACTERS, FIELD_SEP, SEGMENT_TERMINATOR};

/// One HL7 segment under construction.
#[derive(Debug, Clone)]
pub struct Segment {
    id: &'static str,
    fields: Vec<FieldValue>,
    msh: bool,
}

impl Segment {
    /// Starts a segment with the given three-letter id.
    pub fn new(id: &'static str) -> Result<Self> {
        if id.len() != 3 || !id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(Hl7Error::InvalidSegmentId { id: id.to_string() });
        }
        Ok(Self {
            id,
            fields: Vec::new(),
            msh: false,
        })
    }

    /// Starts an MSH segment. MSH-1 is the field separator itself and
    /// MSH-2 the encoding characters; both are emitted literally, so the
    /// first pushed field is MSH-3.
    pub fn msh() -> Self {
        Self {
            id: "MSH",
            fields: Vec::new(),
            msh: true,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Appends the next positional field.
    pub fn push(&mut self, field: impl Into<FieldValue>) -> &mut Self {
        self.fields.push(field.into());
        self
    }

    /// Appends `count` absent fields.
    pub fn push_empty(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.fields.push(FieldValue::Empty);
        }
        self
    }

    /// The field at a 1-based position (MSH-2 is addressable for tests;
    /// MSH-1 is the separator and has no slot).
    pub fn field(&self, position: usize) -> Option<&FieldValue> {
        if position == 0 {
            return None;
        }
        if self.msh {
            // MSH-2 is the literal encoding characters; fields start at 3.
            match position {
                1 | 2 => None,
                n => self.fields.get(n - 3),
            }
        } else {
            self.fields.get(position - 1)
        }
    }

    /// Encodes the segment, trimming trailing empty fields.
    pub fn encode(&self) -> String {
        let mut last = self.fields.len();
        while last > 0 && self.fields[last - 1].is_empty() {
            last -= 1;
        }

        let mut out = String::from(self.id);
        if self.msh {
            out.push(FIELD_SEP);
            out.push_str(ENCODING_CHARACTERS);
        }
        for field in &self.fields[..last] {
            out.push(FIELD_SEP);
            out.push_str(field.encoded());
        }
        out
    }
}

/// An ordered list of segments forming one message.
#[derive(Debug, Clone, Default)]
pub struct Message {
    segments: Vec<Segment>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: Segment) -> &mut Self {
        self.segments.push(segment);
        self
    }

    pub fn extend(&mut self, segments: impl IntoIterator<Item = Segment>) -> &mut Self {
        self.segments.extend(segments);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Encodes the message: every segment terminated by a carriage
    /// return, no byte-order mark, no line feeds.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(&segment.encode());
            out.push(SEGMENT_TERMINATOR);
        }
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_empty_fields() {
        let mut seg = Segment::new("PID").unwrap();
        seg.push("0001").push_empty(2).push("X").push_empty(5);
        assert_eq!(seg.encode(), "PID|0001|||X");
    }

    #[test]
    fn null_fields_survive_trimming() {
        let mut seg = Segment::new("RXE").unwrap();
        seg.push_empty(2).push(FieldValue::Null);
        assert_eq!(seg.encode(), "RXE|||\"\"");
    }

    #[test]
    fn msh_carries_separator_and_encoding_characters_literally() {
        let mut seg = Segment::msh();
        seg.push("HIS123").push("SEND");
        assert_eq!(seg.encode(), "MSH|^~\\&|HIS123|SEND");
    }

    #[test]
    fn msh_field_positions_start_at_three() {
        let mut seg = Segment::msh();
        seg.push("HIS123").push("SEND");
        assert_eq!(seg.field(3).unwrap().encoded(), "HIS123");
        assert_eq!(seg.field(4).unwrap().encoded(), "SEND");
        assert!(seg.field(2).is_none());
    }

    #[test]
    fn rejects_malformed_segment_id() {
        assert!(Segment::new("pid").is_err());
        assert!(Segment::new("PIDX").is_err());
    }

    #[test]
    fn message_is_cr_framed_without_line_feeds() {
        let mut msg = Message::new();
        let mut a = Segment::msh();
        a.push("APP");
        msg.push(a);
        msg.push(Segment::new("EVN").unwrap());
        let bytes = msg.encode();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "MSH|^~\\&|APP\rEVN\r");
        assert!(!text.contains('\n'));
    }
}
