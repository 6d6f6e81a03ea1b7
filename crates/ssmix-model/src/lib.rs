//! Clinical entities of the synthetic SS-MIX2 store.
//!
//! Entities validate on construction: factory functions return either a
//! validated value or a [`ModelError`] naming the entity, attribute,
//! offending value and rule. Optional attributes uniformly accept the
//! empty string.

pub mod admission;
pub mod enums;
pub mod hospital;
pub mod lab;
pub mod orders;
pub mod patient;
pub mod physician;
pub mod problem;
pub mod timestamp;

mod error;
mod postal;

pub use admission::Admission;
pub use enums::{ComponentKind, OrderClass, Sex};
pub use error::{ModelError, Result};
pub use hospital::Hospital;
pub use lab::{LabResult, LabResultAttrs, LabSpecimen, LabSpecimenAttrs};
pub use orders::{
    DoseUnit, InjectionAttrs, InjectionComponent, InjectionOrder, MinimumDose, OrderCommon,
    PrescriptionAttrs, PrescriptionOrder,
};
pub use patient::{Allergy, Insurance, Patient, PatientAttrs};
pub use physician::Physician;
pub use postal::normalize_postal_code;
pub use problem::{Problem, ProblemAttrs};
pub use timestamp::{Hl7Timestamp, Precision};
