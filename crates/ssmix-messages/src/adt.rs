//! ADT profiles: A08 (demographics), A01 (admission), A03 (discharge),
//! A04 (outpatient visit).

use ssmix_hl7::Message;
use ssmix_model::{Admission, Hl7Timestamp, Patient, Physician};
use ssmix_segments::{
    al1, db1, evn, in1, msh, nk1, obx, pid, pv1, EvnArgs, MessageType, ObxArgs, Pv1Args,
};

use crate::error::{MessageError, Result};

/// Arguments shared by the ADT builders.
#[derive(Debug, Clone, Copy)]
pub struct AdtContext<'a> {
    pub message_time: &'a Hl7Timestamp,
    pub message_id: &'a str,
    pub transaction_time: &'a Hl7Timestamp,
    pub patient: &'a Patient,
    pub primary_physician: &'a Physician,
}

/// ADT^A08 — patient information update, the ADT-00 demographics
/// snapshot: MSH EVN PID NK1 PV1 DB1 OBX* AL1* IN1*.
///
/// The profile requires PID-33 (last updated) and carries the patient's
/// body measurements and blood types as OBX observations.
pub fn a08(
    ctx: AdtContext<'_>,
    last_updated: &Hl7Timestamp,
    admission: Option<&Admission>,
) -> Result<Message> {
    let mt = MessageType::new("ADT", "A08", "ADT_A01")?;
    let patient = ctx.patient;

    let mut message = Message::new();
    message.push(msh(&mt, ctx.message_time, ctx.message_id)?);
    message.push(evn(EvnArgs {
        transaction_time: Some(ctx.transaction_time),
        ..EvnArgs::default()
    })?);
    message.push(pid(patient, Some(last_updated))?);
    message.push(nk1(1, patient, "SEL")?);
    message.push(pv1(Pv1Args {
        set_id: "0001",
        department_code: &ctx.primary_physician.department_code,
        primary_physician: Some(ctx.primary_physician),
        admission,
        ..Pv1Args::default()
    })?);
    message.push(db1(1, "PT", true)?);

    let mut obx_seq = 0;
    let mut push_obx = |message: &mut Message, args: ObxArgs<'_>| -> Result<()> {
        message.push(obx(args)?);
        Ok(())
    };
    if !patient.height.is_empty() {
        obx_seq += 1;
        push_obx(
            &mut message,
            ObxArgs {
                sequence_no: obx_seq,
                value_type: "NM",
                observation_code: "9N001000000000001",
                observation_name: "身長",
                observation_code_system: "JC10",
                observation_value: &patient.height,
                unit: "cm",
                unit_code: "cm",
                unit_code_system: "ISO+",
                status: "F",
                ..ObxArgs::default()
            },
        )?;
    }
    if !patient.weight.is_empty() {
        obx_seq += 1;
        push_obx(
            &mut message,
            ObxArgs {
                sequence_no: obx_seq,
                value_type: "NM",
                observation_code: "9N006000000000001",
                observation_name: "体重",
                observation_code_system: "JC10",
                observation_value: &patient.weight,
                unit: "kg",
                unit_code: "kg",
                unit_code_system: "ISO+",
                status: "F",
                ..ObxArgs::default()
            },
        )?;
    }
    if !patient.abo_blood_type.is_empty() {
        obx_seq += 1;
        push_obx(
            &mut message,
            ObxArgs {
                sequence_no: obx_seq,
                value_type: "CWE",
                observation_code: "5H010000001999911",
                observation_name: "血液型-ABO式",
                observation_code_system: "JC10",
                observation_value: &patient.abo_blood_type,
                observation_value_code: &patient.abo_blood_type,
                observation_value_system: "JSHR002",
                status: "F",
                ..ObxArgs::default()
            },
        )?;
    }
    if !patient.rh_blood_type.is_empty() {
        obx_seq += 1;
        let rh_name = if patient.rh_blood_type == "+" { "Rh+" } else { "Rh-" };
        push_obx(
            &mut message,
            ObxArgs {
                sequence_no: obx_seq,
                value_type: "CWE",
                observation_code: "5H020000001999911",
                observation_name: "血液型-Rh式",
                observation_code_system: "JC10",
                observation_value: rh_name,
                observation_value_code: &patient.rh_blood_type,
                observation_value_system: "JSHR002",
                status: "F",
                ..ObxArgs::default()
            },
        )?;
    }

    for (seq, allergy) in patient.allergies.iter().enumerate() {
        message.push(al1(seq + 1, allergy)?);
    }
    for (seq, insurance) in patient.insurances.iter().enumerate() {
        message.push(in1(seq + 1, insurance)?);
    }
    Ok(message)
}

/// ADT^A01 — admission: MSH EVN PID PV1. PV1-44 carries the admit time.
pub fn a01(ctx: AdtContext<'_>, admission: &Admission) -> Result<Message> {
    let mt = MessageType::new("ADT", "A01", "ADT_A01")?;
    let mut message = Message::new();
    message.push(msh(&mt, ctx.message_time, ctx.message_id)?);
    message.push(evn(EvnArgs {
        transaction_time: Some(ctx.transaction_time),
        ..EvnArgs::default()
    })?);
    message.push(pid(ctx.patient, None)?);
    message.push(pv1(Pv1Args {
        set_id: "0001",
        primary_physician: Some(ctx.primary_physician),
        admission: Some(admission),
        admission_or_visit_time: Some(&admission.admit_time),
        ..Pv1Args::default()
    })?);
    Ok(message)
}

/// ADT^A03 — discharge: MSH EVN PID PV1. The profile requires the
/// admission being closed, its discharge time, and a disposition.
pub fn a03(
    ctx: AdtContext<'_>,
    admission: &Admission,
    discharge_disposition: &str,
) -> Result<Message> {
    let mt = MessageType::new("ADT", "A03", "ADT_A03")?;
    let discharge_time = admission.discharge_time.as_ref().ok_or_else(|| {
        MessageError::profile("ADT^A03", "discharge requires a closed admission")
    })?;
    if discharge_disposition.is_empty() {
        return Err(MessageError::profile(
            "ADT^A03",
            "discharge disposition is required",
        ));
    }
    let mut message = Message::new();
    message.push(msh(&mt, ctx.message_time, ctx.message_id)?);
    message.push(evn(EvnArgs {
        transaction_time: Some(ctx.transaction_time),
        ..EvnArgs::default()
    })?);
    message.push(pid(ctx.patient, None)?);
    message.push(pv1(Pv1Args {
        set_id: "0001",
        primary_physician: Some(ctx.primary_physician),
        admission: Some(admission),
        discharge_disposition,
        admission_or_visit_time: Some(&admission.admit_time),
        discharge_time: Some(discharge_time),
        ..Pv1Args::default()
    })?);
    Ok(message)
}

/// ADT^A04 — outpatient visit: MSH EVN PID PV1. PV1-44 carries the visit
/// time; the visit department fills PV1-3 as a clinic location.
pub fn a04(
    ctx: AdtContext<'_>,
    visit_time: &Hl7Timestamp,
    department_code: &str,
) -> Result<Message> {
    let mt = MessageType::new("ADT", "A04", "ADT_A01")?;
    if department_code.is_empty() {
        return Err(MessageError::profile(
            "ADT^A04",
            "an outpatient visit names its department",
        ));
    }
    let mut message = Message::new();
    message.push(msh(&mt, ctx.message_time, ctx.message_id)?);
    message.push(evn(EvnArgs {
        transaction_time: Some(ctx.transaction_time),
        ..EvnArgs::default()
    })?);
    message.push(pid(ctx.patient, None)?);
    message.push(pv1(Pv1Args {
        set_id: "0001",
        department_code,
        primary_physician: Some(ctx.primary_physician),
        admission_or_visit_time: Some(visit_time),
        ..Pv1Args::default()
    })?);
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssmix_model::{Allergy, Insurance, PatientAttrs};

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
            height: "167.8".into(),
            weight: "63.5".into(),
            abo_blood_type: "A".into(),
            rh_blood_type: "+".into(),
            allergies: vec![Allergy::new("DA", "1", "ペニシリン", "99XYZ").unwrap()],
            insurances: vec![Insurance::new(
                "C0",
                "123456",
                "20111219",
                "20121218",
                "",
                "SEL",
                "保険者の名称(仮)",
            )
            .unwrap()],
            ..PatientAttrs::default()
        })
        .unwrap()
    }

    fn physician() -> Physician {
        Physician::new("220", "仮医師", "カリイシ", "一郎", "イチロウ", "01").unwrap()
    }

    fn times() -> (Hl7Timestamp, Hl7Timestamp, Hl7Timestamp) {
        (
            Hl7Timestamp::parse("20111220224447339900").unwrap(),
            Hl7Timestamp::parse("20111220210000").unwrap(),
            Hl7Timestamp::parse("20111219121551").unwrap(),
        )
    }

    #[test]
    fn a08_orders_segments_per_profile() {
        let patient = patient();
        let physician = physician();
        let (message_time, transaction, updated) = times();
        let message = a08(
            AdtContext {
                message_time: &message_time,
                message_id: "3000200100",
                transaction_time: &transaction,
                patient: &patient,
                primary_physician: &physician,
            },
            &updated,
            None,
        )
        .unwrap();
        let ids: Vec<_> = message.segments().iter().map(|s| s.id()).collect();
        assert_eq!(
            ids,
            ["MSH", "EVN", "PID", "NK1", "PV1", "DB1", "OBX", "OBX", "OBX", "OBX", "AL1", "IN1"]
        );
        let text = String::from_utf8(message.encode()).unwrap();
        assert!(text.contains("ADT^A08^ADT_A01"));
        assert!(text.contains("|2.5|"));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn a03_requires_closed_admission() {
        let patient = patient();
        let physician = physician();
        let (message_time, transaction, _) = times();
        let ctx = AdtContext {
            message_time: &message_time,
            message_id: "3000200101",
            transaction_time: &transaction,
            patient: &patient,
            primary_physician: &physician,
        };
        let admit = Hl7Timestamp::parse("20111120160000").unwrap();
        let mut admission = Admission::new("32", "302", "1", admit, physician.clone()).unwrap();
        assert!(a03(ctx, &admission, "01").is_err());
        admission
            .discharge(Hl7Timestamp::parse("20111125100000").unwrap())
            .unwrap();
        let message = a03(ctx, &admission, "01").unwrap();
        let text = String::from_utf8(message.encode()).unwrap();
        assert!(text.contains("ADT^A03^ADT_A03"));
        assert!(text.contains("20111125100000"));
    }

    #[test]
    fn a04_requires_department() {
        let patient = patient();
        let physician = physician();
        let (message_time, transaction, _) = times();
        let ctx = AdtContext {
            message_time: &message_time,
            message_id: "3000200102",
            transaction_time: &transaction,
            patient: &patient,
            primary_physician: &physician,
        };
        let visit = Hl7Timestamp::parse("20111220200000").unwrap();
        assert!(a04(ctx, &visit, "").is_err());
        let message = a04(ctx, &visit, "01").unwrap();
        let text = String::from_utf8(message.encode()).unwrap();
        assert!(text.contains("ADT^A04^ADT_A01"));
        assert!(text.contains("|O|01^^^^^C|"));
    }
}
