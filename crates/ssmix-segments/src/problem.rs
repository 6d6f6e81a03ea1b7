//! PRB — problem detail.

use ssmix_hl7::{escape, FieldValue, Segment};
use ssmix_model::{Precision, Problem};
use ssmix_standards::tables::{self, JHSD_0004_DIAGNOSIS_TYPE};

use crate::common::{coded_element, day};
use crate::error::{Result, SegmentError};

/// PRB — problem detail.
///
/// Example:
/// `PRB|AD|20110915|20054174^胃炎^MDCDX2|123456789012345|||20110831|||K297^^I10^O^外来時^JHSD0004|||1|||20110831`
pub fn prb(problem: &Problem) -> Result<Segment> {
    let (type_name, type_system) = if problem.diagnosis_type.is_empty() {
        ("", "")
    } else {
        let name = tables::lookup(JHSD_0004_DIAGNOSIS_TYPE, &problem.diagnosis_type).ok_or_else(
            || {
                SegmentError::invalid(
                    "PRB",
                    "10",
                    &problem.diagnosis_type,
                    "must be one of JHSD0004",
                )
            },
        )?;
        (name, "JHSD0004")
    };
    // ICD-10 classification: <icd10>^<name>^I10^<type>^<type name>^JHSD0004
    let classification = format!(
        "{}^{}^I10^{}^{}^{}",
        escape(&problem.icd10_code),
        escape(&problem.icd10_name),
        escape(&problem.diagnosis_type),
        escape(type_name),
        type_system,
    );

    let mut seg = Segment::new("PRB")?;
    seg.push(problem.action_code.as_str()) // PRB-1
        .push(problem.action_time.format(Precision::Day)) // PRB-2
        .push(FieldValue::composed(coded_element(
            &problem.dx_code,
            &problem.dx_name,
            &problem.dx_code_system,
        ))) // PRB-3
        .push(problem.instance_id.as_str()) // PRB-4
        .push_empty(2)
        .push(day(problem.date_of_diagnosis.as_ref())) // PRB-7
        .push(day(problem.expected_time_solved.as_ref())) // PRB-8
        .push(day(problem.time_solved.as_ref())) // PRB-9
        .push(FieldValue::composed(classification)) // PRB-10
        .push_empty(2)
        .push(problem.provisional.as_str()) // PRB-13
        .push_empty(2)
        .push(day(problem.time_of_onset.as_ref())); // PRB-16
    Ok(seg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssmix_model::{OrderClass, OrderCommon, Physician, ProblemAttrs};

    #[test]
    fn formats_gastritis_problem() {
        let physician =
            Physician::new("1234567890", "仮医師", "カリイシ", "一郎", "イチロウ", "01").unwrap();
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
            provisional: "1".into(),
            time_of_onset: "20110831".into(),
            common: OrderCommon::new(
                "NW",
                "123456789012345",
                "",
                "",
                "",
                "",
                "",
                OrderClass::Outpatient,
                physician.clone(),
                physician,
            )
            .unwrap(),
        })
        .unwrap();
        let seg = prb(&problem).unwrap();
        assert_eq!(
            seg.encode(),
            "PRB|AD|20110915|20054174^胃炎^MDCDX2|123456789012345|||20110831|||K297^^I10^O^外来時^JHSD0004|||1|||20110831"
        );
    }
}
