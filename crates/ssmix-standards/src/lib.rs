//! Reference data for SS-MIX2 message generation.
//!
//! Everything in this crate is immutable after process start and shared by
//! reference across workers: HL7 user/standard tables, the JAHIS and
//! MERIT-9 vocabularies, JLAC10 specimen and test-type codes, and the
//! postal-code table the address synthesizer joins against.

pub mod insurance;
pub mod jlac10;
pub mod postal;
pub mod tables;

pub use insurance::{insurance_plan, public_expense_plans, InsurancePlan, InsuranceClass};
pub use postal::{postal_code_exists, prefecture_entries, prefectures, PostalEntry};
