//! Admission (encounter) entity.

use crate::error::{ModelError, Result};
use crate::physician::Physician;
use crate::timestamp::Hl7Timestamp;

/// An inpatient stay. Alive between an admission event and the matching
/// discharge; the attending physician's department labels the stay.
#[derive(Debug, Clone)]
pub struct Admission {
    pub ward_code: String,
    pub room_code: String,
    pub bed_code: String,
    pub admit_time: Hl7Timestamp,
    pub discharge_time: Option<Hl7Timestamp>,
    pub physician: Physician,
}

impl Admission {
    pub fn new(
        ward_code: &str,
        room_code: &str,
        bed_code: &str,
        admit_time: Hl7Timestamp,
        physician: Physician,
    ) -> Result<Self> {
        const ENTITY: &str = "Admission";
        for (attribute, value) in [
            ("ward_code", ward_code),
            ("room_code", room_code),
            ("bed_code", bed_code),
        ] {
            if value.is_empty() {
                return Err(ModelError::invalid(ENTITY, attribute, value, "must not be empty"));
            }
        }
        let combined = ward_code.chars().count() + room_code.chars().count() + bed_code.chars().count();
        if combined >= 70 {
            return Err(ModelError::invalid(
                ENTITY,
                "location",
                format!("{combined} chars"),
                "ward, room and bed combined must be shorter than 70 characters",
            ));
        }
        Ok(Self {
            ward_code: ward_code.to_string(),
            room_code: room_code.to_string(),
            bed_code: bed_code.to_string(),
            admit_time,
            discharge_time: None,
            physician,
        })
    }

    pub fn department_code(&self) -> &str {
        &self.physician.department_code
    }

    /// Records the discharge; the stay must not end before it begins.
    pub fn discharge(&mut self, time: Hl7Timestamp) -> Result<()> {
        if time < self.admit_time {
            return Err(ModelError::invalid(
                "Admission",
                "discharge_time",
                time.to_string(),
                format!("must not precede admit time {}", self.admit_time),
            ));
        }
        self.discharge_time = Some(time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physician() -> Physician {
        Physician::new("1234567890", "仮医師", "カリイシ", "一郎", "イチロウ", "01").unwrap()
    }

    #[test]
    fn discharge_must_follow_admission() {
        let admit = Hl7Timestamp::parse("20200102080000").unwrap();
        let mut admission = Admission::new("32", "302", "1", admit, physician()).unwrap();
        let early = Hl7Timestamp::parse("20200101080000").unwrap();
        assert!(admission.discharge(early).is_err());
        let late = Hl7Timestamp::parse("20200105100000").unwrap();
        assert!(admission.discharge(late).is_ok());
        assert!(admission.discharge_time.is_some());
    }

    #[test]
    fn rejects_empty_bed() {
        let admit = Hl7Timestamp::parse("20200102080000").unwrap();
        assert!(Admission::new("32", "302", "", admit, physician()).is_err());
    }
}
