//! MSH — message header.
//!
//! Example:
//! `MSH|^~\&|HIS123|SEND|GW|RCV|20111220224447.339||ADT^A08^ADT_A01|20111220000001|P|2.5||||||~ISO IR87||ISO 2022-1994|SS-MIX2_1.20_h^SS-MIX2^1.2.392.200250.2.1.100.1.2.120^ISO`

use ssmix_hl7::{FieldValue, Segment};
use ssmix_model::{Hl7Timestamp, Precision};
use ssmix_standards::tables::{self, H7T_0354_STRUCTURE, UDT_0003_EVENT, UDT_0076_MESSAGE};

use crate::error::{Result, SegmentError};

/// Fixed sending/receiving identity of the synthetic hospital system.
pub const SENDING_APP: &str = "HIS123";
pub const SENDING_FACILITY: &str = "SEND";
pub const RECEIVING_APP: &str = "GW";
pub const RECEIVING_FACILITY: &str = "RCV";

/// MSH-12: the only HL7 version SS-MIX2 stores.
pub const VERSION_ID: &str = "2.5";

/// MSH-18: Japanese character set declaration.
pub const CHARACTER_SET: &str = "~ISO IR87";
/// MSH-20.
pub const CHARACTER_HANDLING: &str = "ISO 2022-1994";

/// SS-MIX2 guideline revision carried in MSH-21.
pub const GUIDELINE_VERSION: &str = "h";

/// A validated `code^trigger^structure` triple (MSH-9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageType {
    pub code: &'static str,
    pub trigger: &'static str,
    pub structure: &'static str,
}

impl MessageType {
    pub fn new(code: &'static str, trigger: &'static str, structure: &'static str) -> Result<Self> {
        if !tables::contains(UDT_0076_MESSAGE, code) {
            return Err(SegmentError::invalid(
                "MSH",
                "9",
                code,
                "message code must be one of user table 0076",
            ));
        }
        if !tables::contains(UDT_0003_EVENT, trigger) {
            return Err(SegmentError::invalid(
                "MSH",
                "9",
                trigger,
                "trigger event must be one of user table 0003",
            ));
        }
        if !tables::contains(H7T_0354_STRUCTURE, structure) {
            return Err(SegmentError::invalid(
                "MSH",
                "9",
                structure,
                "message structure must be one of HL7 table 0354",
            ));
        }
        Ok(Self {
            code,
            trigger,
            structure,
        })
    }

    /// The MSH-9 field content.
    pub fn encoded(&self) -> String {
        format!("{}^{}^{}", self.code, self.trigger, self.structure)
    }

    /// `code^trigger`, the granularity most profile rules key on.
    pub fn event_pair(&self) -> String {
        format!("{}^{}", self.code, self.trigger)
    }
}

/// Builds the MSH segment. The message id is the store-wide unique
/// control id, at most 20 characters.
pub fn msh(message_type: &MessageType, message_time: &Hl7Timestamp, message_id: &str) -> Result<Segment> {
    if message_id.is_empty() || message_id.len() > 20 {
        return Err(SegmentError::invalid(
            "MSH",
            "10",
            message_id,
            "message control id must be 1-20 characters",
        ));
    }

    let mut seg = Segment::msh();
    seg.push(SENDING_APP) // MSH-3
        .push(SENDING_FACILITY)
        .push(RECEIVING_APP)
        .push(RECEIVING_FACILITY)
        .push(message_time.format(Precision::Milli)) // MSH-7
        .push_empty(1)
        .push(FieldValue::composed(message_type.encoded())) // MSH-9
        .push(message_id)
        .push("P") // MSH-11 processing id
        .push(VERSION_ID)
        .push_empty(5)
        .push(FieldValue::composed(CHARACTER_SET)) // MSH-18
        .push_empty(1)
        .push(CHARACTER_HANDLING)
        .push(FieldValue::composed(format!(
            "SS-MIX2_1.20_{GUIDELINE_VERSION}^SS-MIX2^1.2.392.200250.2.1.100.1.2.120^ISO"
        )));
    Ok(seg)
}
