//! Synthesis of auxiliary attributes.
//!
//! Everything here is deterministic given a seed: the driver derives one
//! RNG stream per patient from (global seed, patient id), so re-runs
//! reproduce the store byte for byte regardless of worker count. All
//! human-identifying output carries the 仮 / カリ provisional markers,
//! the chōme of every address is pinned to 99丁目, and phone numbers use
//! the unassignable 099 prefix.

pub mod address;
pub mod data;
pub mod drugs;
pub mod lab;
pub mod person;
pub mod seed;

pub use address::{synth_address, synth_phone, SynthAddress};
pub use drugs::{injection_component_kind, prescription_profile, PrescriptionProfile};
pub use person::{
    synth_admission_location, synth_allergies, synth_hospital, synth_insurance, synth_patient,
    synth_physician, PatientSeed,
};
pub use seed::{patient_stream, stream_seed, SynthRng};
