//! PPR^ZD1 — problem (diagnosis) message, the PPR-01 category.
//!
//! Grammar: `MSH PID { PRB {ORC} }`. The ZPR/ZPD/ZI1 Z-segments of the
//! full profile are not stored.

use ssmix_hl7::Message;
use ssmix_model::{Hl7Timestamp, Hospital, Patient, Problem};
use ssmix_segments::{msh, orc, pid, prb, MessageType};

use crate::error::{MessageError, Result};

/// Builds a PPR^ZD1 message. In this profile each problem's ORC-2 is the
/// problem instance id (PRB-4).
pub fn zd1(
    message_time: &Hl7Timestamp,
    message_id: &str,
    patient: &Patient,
    hospital: &Hospital,
    problems: &[Problem],
) -> Result<Message> {
    let mt = MessageType::new("PPR", "ZD1", "PPR_ZD1")?;
    if problems.is_empty() {
        return Err(MessageError::profile(
            "PPR^ZD1",
            "a problem message carries at least one problem",
        ));
    }

    let mut message = Message::new();
    message.push(msh(&mt, message_time, message_id)?);
    message.push(pid(patient, None)?);
    for problem in problems {
        message.push(prb(problem)?);
        let mut common = problem.common.clone();
        common.requester_order_number = format!("{:0>15}", problem.instance_id);
        message.push(orc(&common, hospital)?);
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssmix_model::{OrderClass, OrderCommon, PatientAttrs, Physician, ProblemAttrs};

    #[test]
    fn zd1_pairs_each_prb_with_an_orc() {
        let patient = Patient::new(PatientAttrs {
            patient_id: "1234567890".into(),
            dob: "19650415".into(),
            sex: "M".into(),
            family_name: "仮患者".into(),
            family_name_kana: "カリカンジャ".into(),
            given_name: "太郎".into(),
            given_name_kana: "タロウ".into(),
            postal_code: "422-8033".into(),
            address: "静岡県".into(),
            ..PatientAttrs::default()
        })
        .unwrap();
        let physician =
            Physician::new("110", "仮医師", "カリイシ", "一郎", "イチロウ", "01").unwrap();
        let hospital = Hospital::new("登呂病院", "", "静岡県静岡市", "054-284-9122").unwrap();
        let problem = Problem::new(ProblemAttrs {
            action_code: "AD".into(),
            action_time: "20110915".into(),
            dx_code: "20054174".into(),
            dx_name: "胃炎".into(),
            dx_code_system: "MDCDX2".into(),
            instance_id: "123456789012345".into(),
            date_of_diagnosis: "20110831".into(),
            expected_time_solved: String::new(),
            time_solved: String::new(),
            icd10_code: "K297".into(),
            icd10_name: String::new(),
            diagnosis_type: "O".into(),
            provisional: String::new(),
            time_of_onset: "20110831".into(),
            common: OrderCommon::new(
                "NW",
                "123456789012345",
                "",
                "",
                "",
                "20110915",
                "",
                OrderClass::Outpatient,
                physician.clone(),
                physician,
            )
            .unwrap(),
        })
        .unwrap();
        let message_time = Hl7Timestamp::parse("20111209163030000000").unwrap();
        let message = zd1(&message_time, "0987654321", &patient, &hospital, &[problem]).unwrap();
        let ids: Vec<_> = message.segments().iter().map(|s| s.id()).collect();
        assert_eq!(ids, ["MSH", "PID", "PRB", "ORC"]);
        let text = String::from_utf8(message.encode()).unwrap();
        assert!(text.contains("PPR^ZD1^PPR_ZD1"));
        assert!(text.contains("ORC|NW|123456789012345"));
    }

    #[test]
    fn zd1_rejects_empty_problem_list() {
        let patient = Patient::new(PatientAttrs {
            patient_id: "1234567890".into(),
            dob: "19650415".into(),
            sex: "M".into(),
            family_name: "仮患者".into(),
            family_name_kana: "カリカンジャ".into(),
            given_name: "太郎".into(),
            given_name_kana: "タロウ".into(),
            postal_code: "422-8033".into(),
            address: "静岡県".into(),
            ..PatientAttrs::default()
        })
        .unwrap();
        let hospital = Hospital::new("登呂病院", "", "静岡県静岡市", "054-284-9122").unwrap();
        let message_time = Hl7Timestamp::parse("20111209163030000000").unwrap();
        assert!(zd1(&message_time, "0987654321", &patient, &hospital, &[]).is_err());
    }
}
