//! Segment builders.
//!
//! One builder per HL7 segment. Builders accept typed arguments, validate
//! only what is constant for the segment (fixed sequence ids, intrinsic
//! code tables, the MSH constants) and emit the assembled field list.
//! Validation that varies with the message — which optional fields become
//! required, which triggers admit a field — lives with the message
//! builders, so a segment builder never rejects a value that is legal in
//! some message.

pub mod common;
pub mod msh;
pub mod observation;
pub mod order;
pub mod patient;
pub mod problem;
pub mod visit;

mod error;

pub use error::{Result, SegmentError};
pub use msh::{msh, MessageType};
pub use observation::{obr, obx, spm, ObxArgs};
pub use order::{orc, rxc, rxe, rxr, tq1, RxeArgs, Tq1Args};
pub use patient::{al1, db1, in1, nk1, pid};
pub use problem::prb;
pub use visit::{evn, pv1, EvnArgs, Pv1Args};
