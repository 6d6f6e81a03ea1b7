//! Message builders, one per SS-MIX2 profile.
//!
//! A message builder is the single authority for its profile: it checks
//! the semantic preconditions of its trigger, applies the field rules the
//! profile tightens beyond the generic segment definitions, assembles the
//! segments in the mandated order and stamps the MSH header. Builders
//! return an [`ssmix_hl7::Message`]; `encode()` yields the on-disk bytes.

pub mod adt;
pub mod oul;
pub mod ppr;
pub mod rde;

mod error;

pub use error::{MessageError, Result};
