//! Patient-centric segments: PID, NK1, DB1, AL1, IN1.

use ssmix_hl7::Segment;
use ssmix_model::{Allergy, Hl7Timestamp, Insurance, Patient, Precision};
use ssmix_standards::tables::{self, UDT_0063_RELATIONSHIP, UDT_0127_ALLERGY, UDT_0334_DISABLED};

use crate::common::{coded_element, day, home_address, person_name, phone, second};
use crate::error::{Result, SegmentError};

/// PID — patient identification. PID-1 is the constant sequence `0001`.
///
/// Example:
/// `PID|0001||9999013||患者^太郎^^^^^L^I~カンジャ^タロウ^^^^^L^P||19480405|M|||^^^^422-8033^JPN^H^...`
pub fn pid(patient: &Patient, last_updated: Option<&Hl7Timestamp>) -> Result<Segment> {
    let mut seg = Segment::new("PID")?;
    seg.push("0001") // PID-1
        .push_empty(1)
        .push(patient.patient_id.as_str()) // PID-3
        .push_empty(1)
        .push(ssmix_hl7::FieldValue::composed(person_name(
            &patient.family_name,
            &patient.given_name,
            &patient.family_name_kana,
            &patient.given_name_kana,
        ))) // PID-5
        .push_empty(1)
        .push(patient.dob.format(Precision::Day)) // PID-7
        .push(patient.sex.as_str()) // PID-8
        .push_empty(2)
        .push(ssmix_hl7::FieldValue::composed(home_address(
            &patient.postal_code,
            &patient.address,
        ))) // PID-11
        .push_empty(1)
        .push(ssmix_hl7::FieldValue::composed(phone("PRN", &patient.home_phone))) // PID-13
        .push(ssmix_hl7::FieldValue::composed(phone("WPN", &patient.work_phone))) // PID-14
        .push_empty(14)
        .push(day(patient.death_date.as_ref())) // PID-29
        .push(if patient.is_dead() { "Y" } else { "" }) // PID-30
        .push_empty(2)
        .push(second(last_updated)); // PID-33
    Ok(seg)
}

/// NK1 — next of kin. The store keeps one self entry per patient.
pub fn nk1(sequence_no: usize, patient: &Patient, relationship: &str) -> Result<Segment> {
    if !relationship.is_empty() && !tables::contains(UDT_0063_RELATIONSHIP, relationship) {
        return Err(SegmentError::invalid(
            "NK1",
            "3",
            relationship,
            "must be one of user table 0063",
        ));
    }
    let mut seg = Segment::new("NK1")?;
    seg.push(sequence_no.to_string())
        .push(ssmix_hl7::FieldValue::composed(person_name(
            &patient.family_name,
            &patient.given_name,
            &patient.family_name_kana,
            &patient.given_name_kana,
        )))
        .push(relationship)
        .push(ssmix_hl7::FieldValue::composed(home_address(
            &patient.postal_code,
            &patient.address,
        )))
        .push(ssmix_hl7::FieldValue::composed(phone("PRN", &patient.home_phone)))
        .push(ssmix_hl7::FieldValue::composed(phone("WPN", &patient.work_phone)))
        .push_empty(6)
        .push(patient.work_place.as_str()); // NK1-13
    Ok(seg)
}

/// DB1 — disability.
pub fn db1(sequence_no: usize, person_code: &str, present: bool) -> Result<Segment> {
    if !tables::contains(UDT_0334_DISABLED, person_code) {
        return Err(SegmentError::invalid(
            "DB1",
            "2",
            person_code,
            "must be one of user table 0334",
        ));
    }
    let mut seg = Segment::new("DB1")?;
    seg.push(sequence_no.to_string())
        .push(person_code)
        .push_empty(1)
        .push(if present { "Y" } else { "N" });
    Ok(seg)
}

/// AL1 — allergy.
///
/// Example: `AL1|1|DA^薬剤アレルギー^HL70127|1^ペニシリン^99XYZ`
pub fn al1(sequence_no: usize, allergy: &Allergy) -> Result<Segment> {
    if sequence_no == 0 {
        return Err(SegmentError::invalid(
            "AL1",
            "1",
            "0",
            "sequence numbers start at 1",
        ));
    }
    let type_name = tables::lookup(UDT_0127_ALLERGY, &allergy.type_code).ok_or_else(|| {
        SegmentError::invalid("AL1", "2", &allergy.type_code, "must be one of user table 0127")
    })?;
    let mut seg = Segment::new("AL1")?;
    seg.push(sequence_no.to_string())
        .push(ssmix_hl7::FieldValue::composed(coded_element(
            &allergy.type_code,
            type_name,
            "HL70127",
        )))
        .push(ssmix_hl7::FieldValue::composed(coded_element(
            &allergy.allergen_code,
            &allergy.allergen_name,
            &allergy.allergen_code_system,
        )));
    Ok(seg)
}

/// IN1 — insurance.
///
/// Example: `IN1|1|67^国民健康保険退職者^JHSD0001|67999991|...|SEL^本人^HL70063`
pub fn in1(sequence_no: usize, insurance: &Insurance) -> Result<Segment> {
    if sequence_no == 0 {
        return Err(SegmentError::invalid(
            "IN1",
            "1",
            "0",
            "sequence numbers start at 1",
        ));
    }
    let relationship = if insurance.relationship.is_empty() {
        String::new()
    } else {
        let name = tables::lookup(UDT_0063_RELATIONSHIP, &insurance.relationship).ok_or_else(
            || {
                SegmentError::invalid(
                    "IN1",
                    "17",
                    &insurance.relationship,
                    "must be one of user table 0063",
                )
            },
        )?;
        coded_element(&insurance.relationship, name, "HL70063")
    };
    // Group employer id is only meaningful for medical/pollution plans;
    // the store carries a fixed placeholder there.
    let group_employer_id = match insurance.classification {
        ssmix_standards::InsuranceClass::Medical | ssmix_standards::InsuranceClass::Pollution => {
            "123~1234567~01"
        }
        _ => "",
    };
    let mut seg = Segment::new("IN1")?;
    seg.push(sequence_no.to_string())
        .push(ssmix_hl7::FieldValue::composed(coded_element(
            &insurance.plan_code,
            &insurance.plan_name,
            "JHSD0001",
        )))
        .push(insurance.number.as_str())
        .push(insurance.company_name.as_str())
        .push_empty(5)
        .push(ssmix_hl7::FieldValue::composed(group_employer_id.to_string())) // IN1-10
        .push("被保険者グループ雇用者名") // IN1-11 placeholder
        .push(day(insurance.effective_date.as_ref()))
        .push(day(insurance.expiration_date.as_ref()))
        .push_empty(1)
        .push(insurance.plan_type.as_str()) // IN1-15
        .push_empty(1)
        .push(ssmix_hl7::FieldValue::composed(relationship)); // IN1-17
    Ok(seg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssmix_model::PatientAttrs;

    fn patient() -> Patient {
        Patient::new(PatientAttrs {
            patient_id: "0010020003".into(),
            dob: "19480405".into(),
            sex: "M".into(),
            family_name: "仮患者".into(),
            family_name_kana: "カリカンジャ".into(),
            given_name: "太郎".into(),
            given_name_kana: "タロウ".into(),
            postal_code: "422-8033".into(),
            address: "静岡県静岡市駿河区登呂99丁目1番5号".into(),
            home_phone: "099-000-0000".into(),
            work_phone: "099-999-9999".into(),
            ..PatientAttrs::default()
        })
        .unwrap()
    }

    #[test]
    fn pid_carries_constant_sequence_and_demographics() {
        let seg = pid(&patient(), None).unwrap();
        let encoded = seg.encode();
        assert!(encoded.starts_with("PID|0001||0010020003||仮患者^太郎^^^^^L^I~カリカンジャ^タロウ^^^^^L^P||19480405|M"));
        assert!(encoded.contains("^^^^422-8033^JPN^H^静岡県静岡市駿河区登呂99丁目1番5号"));
    }

    #[test]
    fn pid_last_updated_lands_in_field_33() {
        let updated = Hl7Timestamp::parse("20111219121551").unwrap();
        let seg = pid(&patient(), Some(&updated)).unwrap();
        assert_eq!(seg.field(33).unwrap().encoded(), "20111219121551");
    }

    #[test]
    fn dead_patient_fills_pid_29_and_30() {
        let mut attrs = PatientAttrs {
            patient_id: "0010020003".into(),
            dob: "19480405".into(),
            sex: "M".into(),
            family_name: "仮患者".into(),
            family_name_kana: "カリカンジャ".into(),
            given_name: "太郎".into(),
            given_name_kana: "タロウ".into(),
            postal_code: "422-8033".into(),
            address: "静岡県".into(),
            ..PatientAttrs::default()
        };
        attrs.death_date = "20200301".into();
        let seg = pid(&Patient::new(attrs).unwrap(), None).unwrap();
        assert_eq!(seg.field(29).unwrap().encoded(), "20200301");
        assert_eq!(seg.field(30).unwrap().encoded(), "Y");
    }

    #[test]
    fn al1_resolves_type_name() {
        let allergy = Allergy::new("DA", "1", "ペニシリン", "99XYZ").unwrap();
        let seg = al1(1, &allergy).unwrap();
        assert_eq!(seg.encode(), "AL1|1|DA^薬剤アレルギー^HL70127|1^ペニシリン^99XYZ");
    }

    #[test]
    fn db1_requires_known_person_code() {
        assert!(db1(1, "PT", true).is_ok());
        assert!(db1(1, "XX", true).is_err());
    }
}
