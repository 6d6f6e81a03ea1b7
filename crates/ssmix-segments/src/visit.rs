//! Encounter segments: EVN and PV1.

use ssmix_hl7::{FieldValue, Segment};
use ssmix_model::{Admission, Hl7Timestamp, Physician};
use ssmix_standards::tables::{self, UDT_0062_EVENT_REASON, UDT_0069_DEPARTMENT, UDT_0112_DISPOSITION};

use crate::common::{bed_location, clinic_location, second, staff_xcn};
use crate::error::{Result, SegmentError};

/// EVN-7 is a fixed dummy event facility for the synthetic store.
const EVENT_FACILITY: &str = "SEND001";

/// Arguments for [`evn`]. Which of the optional times a trigger admits is
/// message-level validation and happens in the message builders.
#[derive(Debug, Clone, Default)]
pub struct EvnArgs<'a> {
    pub transaction_time: Option<&'a Hl7Timestamp>,
    pub planned_event_time: Option<&'a Hl7Timestamp>,
    pub reason_code: &'a str,
    pub controller_id: &'a str,
    pub event_time: Option<&'a Hl7Timestamp>,
}

/// EVN — event type.
///
/// Example: `EVN||201112202100|||||SEND001`
pub fn evn(args: EvnArgs<'_>) -> Result<Segment> {
    let transaction = args.transaction_time.ok_or_else(|| {
        SegmentError::invalid("EVN", "2", "", "recorded date/time is required")
    })?;
    if !args.reason_code.is_empty() && !tables::contains(UDT_0062_EVENT_REASON, args.reason_code) {
        return Err(SegmentError::invalid(
            "EVN",
            "4",
            args.reason_code,
            "must be one of user table 0062",
        ));
    }
    let mut seg = Segment::new("EVN")?;
    seg.push_empty(1)
        .push(second(Some(transaction))) // EVN-2
        .push(second(args.planned_event_time)) // EVN-3
        .push(args.reason_code)
        .push(args.controller_id)
        .push(second(args.event_time)) // EVN-6
        .push(EVENT_FACILITY);
    Ok(seg)
}

/// Arguments for [`pv1`].
#[derive(Debug, Clone, Default)]
pub struct Pv1Args<'a> {
    /// PV1-1; the ordering profiles omit it.
    pub set_id: &'a str,
    /// Clinic for outpatients; ignored when an admission is present.
    pub department_code: &'a str,
    /// PV1-10; only the triggers that admit it pass something here.
    pub hospital_service: &'a str,
    pub primary_physician: Option<&'a Physician>,
    pub admission: Option<&'a Admission>,
    pub discharge_disposition: &'a str,
    /// PV1-44 admit/visit datetime.
    pub admission_or_visit_time: Option<&'a Hl7Timestamp>,
    /// PV1-45.
    pub discharge_time: Option<&'a Hl7Timestamp>,
}

/// PV1 — patient visit.
///
/// Example: `PV1|0001|I|32^302^1^^^N||||220^医師^一郎^^^^^^^L^^^^^I`
pub fn pv1(args: Pv1Args<'_>) -> Result<Segment> {
    if !args.set_id.is_empty() && args.set_id != "0001" {
        return Err(SegmentError::invalid(
            "PV1",
            "1",
            args.set_id,
            "set id is the constant 0001 when present",
        ));
    }
    if !args.department_code.is_empty()
        && !tables::contains(UDT_0069_DEPARTMENT, args.department_code)
    {
        return Err(SegmentError::invalid(
            "PV1",
            "3",
            args.department_code,
            "must be one of user table 0069",
        ));
    }
    if !args.discharge_disposition.is_empty()
        && !tables::contains(UDT_0112_DISPOSITION, args.discharge_disposition)
    {
        return Err(SegmentError::invalid(
            "PV1",
            "36",
            args.discharge_disposition,
            "must be one of user table 0112",
        ));
    }

    let (patient_class, location, attending) = match args.admission {
        Some(admission) => (
            "I",
            bed_location(&admission.ward_code, &admission.room_code, &admission.bed_code),
            staff_xcn(&admission.physician),
        ),
        None => (
            "O",
            if args.department_code.is_empty() {
                String::new()
            } else {
                clinic_location(args.department_code)
            },
            String::new(),
        ),
    };
    let primary = args.primary_physician.map(staff_xcn).unwrap_or_default();

    let mut seg = Segment::new("PV1")?;
    seg.push(args.set_id)
        .push(patient_class) // PV1-2
        .push(FieldValue::composed(location)) // PV1-3
        .push_empty(3)
        .push(FieldValue::composed(primary)) // PV1-7
        .push_empty(2)
        .push(args.hospital_service) // PV1-10
        .push_empty(6)
        .push(FieldValue::composed(attending)) // PV1-17
        .push_empty(18)
        .push(args.discharge_disposition) // PV1-36
        .push_empty(7)
        .push(second(args.admission_or_visit_time)) // PV1-44
        .push(second(args.discharge_time)); // PV1-45
    Ok(seg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physician() -> Physician {
        Physician::new("220", "仮医師", "カリイシ", "一郎", "イチロウ", "01").unwrap()
    }

    #[test]
    fn inpatient_visit_uses_bed_location() {
        let admit = Hl7Timestamp::parse("20111120160000").unwrap();
        let admission = Admission::new("32", "302", "1", admit, physician()).unwrap();
        let seg = pv1(Pv1Args {
            set_id: "0001",
            primary_physician: Some(&physician()),
            admission: Some(&admission),
            ..Pv1Args::default()
        })
        .unwrap();
        let encoded = seg.encode();
        assert!(encoded.starts_with("PV1|0001|I|32^302^1^^^N||||220^仮医師^一郎^^^^^^^L^^^^^I"));
    }

    #[test]
    fn outpatient_visit_uses_clinic_location() {
        let seg = pv1(Pv1Args {
            set_id: "0001",
            department_code: "01",
            primary_physician: Some(&physician()),
            ..Pv1Args::default()
        })
        .unwrap();
        assert!(seg.encode().starts_with("PV1|0001|O|01^^^^^C"));
    }

    #[test]
    fn discharge_fields_land_in_36_and_45() {
        let admit = Hl7Timestamp::parse("20111120160000").unwrap();
        let discharge = Hl7Timestamp::parse("20111125100000").unwrap();
        let admission = Admission::new("32", "302", "1", admit, physician()).unwrap();
        let seg = pv1(Pv1Args {
            set_id: "0001",
            admission: Some(&admission),
            discharge_disposition: "01",
            discharge_time: Some(&discharge),
            ..Pv1Args::default()
        })
        .unwrap();
        assert_eq!(seg.field(36).unwrap().encoded(), "01");
        assert_eq!(seg.field(45).unwrap().encoded(), "20111125100000");
    }

    #[test]
    fn evn_requires_transaction_time() {
        assert!(evn(EvnArgs::default()).is_err());
        let t = Hl7Timestamp::parse("201112202100").unwrap();
        let seg = evn(EvnArgs {
            transaction_time: Some(&t),
            ..EvnArgs::default()
        })
        .unwrap();
        assert_eq!(seg.encode(), "EVN||201112202100|||||SEND001");
    }
}
