//! Cross-entity construction tests.

use ssmix_model::{
    Admission, Hl7Timestamp, OrderClass, OrderCommon, Patient, PatientAttrs, Physician,
};

fn physician() -> Physician {
    Physician::new("1000000001", "仮佐藤", "カリサトウ", "一郎", "イチロウ", "09A").unwrap()
}

fn patient_attrs() -> PatientAttrs {
    PatientAttrs {
        patient_id: "1234567890".into(),
        dob: "19800115".into(),
        sex: "F".into(),
        family_name: "仮鈴木".into(),
        family_name_kana: "カリスズキ".into(),
        given_name: "花子".into(),
        given_name_kana: "ハナコ".into(),
        postal_code: "100-0005".into(),
        address: "東京都千代田区丸の内99丁目3番2号".into(),
        home_phone: "099-555-1234".into(),
        ..PatientAttrs::default()
    }
}

#[test]
fn optional_attributes_accept_the_empty_string() {
    // Blood types, measurements, work data and the death date are all
    // optional; empty must never be rejected.
    let patient = Patient::new(patient_attrs()).unwrap();
    assert!(patient.abo_blood_type.is_empty());
    assert!(patient.work_place.is_empty());
    assert!(patient.death_date.is_none());
}

#[test]
fn violations_name_entity_attribute_value_and_rule() {
    let mut attrs = patient_attrs();
    attrs.postal_code = "not-a-code".into();
    let err = Patient::new(attrs).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("Patient"), "{text}");
    assert!(text.contains("postal_code"), "{text}");
    assert!(text.contains("not-a-code"), "{text}");
    assert!(text.contains("NNN-NNNN"), "{text}");
}

#[test]
fn admissions_for_one_patient_do_not_overlap_backwards() {
    let admit = Hl7Timestamp::parse("20220401090000").unwrap();
    let mut admission = Admission::new("31", "305", "2", admit, physician()).unwrap();
    assert!(admission
        .discharge(Hl7Timestamp::parse("20220331090000").unwrap())
        .is_err());
    assert!(admission
        .discharge(Hl7Timestamp::parse("20220410090000").unwrap())
        .is_ok());
}

#[test]
fn order_numbers_are_bounded_and_zero_filled() {
    let common = OrderCommon::new(
        "NW",
        "42",
        "",
        "",
        "",
        "20220401090000",
        "",
        OrderClass::Outpatient,
        physician(),
        physician(),
    )
    .unwrap();
    assert_eq!(common.requester_order_number, "000000000000042");

    let too_long = OrderCommon::new(
        "NW",
        "1234567890123456",
        "",
        "",
        "",
        "",
        "",
        OrderClass::Outpatient,
        physician(),
        physician(),
    );
    assert!(too_long.is_err());
}
