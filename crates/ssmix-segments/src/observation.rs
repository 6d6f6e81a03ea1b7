//! Result segments: OBX, OBR, SPM.

use ssmix_hl7::{FieldValue, Segment};
use ssmix_model::{Hl7Timestamp, LabResult, LabSpecimen, Physician, Precision};
use ssmix_standards::tables::{self, H7T_0085_RESULT_STATUS, H7T_0125_VALUE_TYPE};

use crate::common::{coded_element, minute, second};
use crate::error::{Result, SegmentError};

/// Arguments for [`obx`].
#[derive(Debug, Clone, Default)]
pub struct ObxArgs<'a> {
    pub sequence_no: usize,
    pub value_type: &'a str,
    pub observation_code: &'a str,
    pub observation_name: &'a str,
    pub observation_code_system: &'a str,
    pub observation_sub_id: &'a str,
    /// The plain value; when a value code/system is given the field is
    /// emitted as `code^value^system` instead.
    pub observation_value: &'a str,
    pub observation_value_code: &'a str,
    pub observation_value_system: &'a str,
    pub unit: &'a str,
    pub unit_code: &'a str,
    pub unit_code_system: &'a str,
    pub reference_range: &'a str,
    pub abnormal_flag: &'a str,
    pub status: &'a str,
    /// OBX-14 observation datetime.
    pub observation_time: Option<&'a Hl7Timestamp>,
}

impl<'a> ObxArgs<'a> {
    /// OBX arguments for a lab observation.
    pub fn from_lab_result(
        sequence_no: usize,
        result: &'a LabResult,
        observation_time: Option<&'a Hl7Timestamp>,
    ) -> Self {
        ObxArgs {
            sequence_no,
            value_type: &result.value_type,
            observation_code: &result.observation_code,
            observation_name: &result.observation_name,
            observation_code_system: &result.observation_code_system,
            observation_sub_id: &result.observation_sub_id,
            observation_value: &result.observation_value,
            observation_value_code: &result.observation_value_code,
            observation_value_system: &result.observation_value_system,
            unit: &result.unit,
            unit_code: &result.unit_code,
            unit_code_system: &result.unit_code_system,
            reference_range: &result.reference_range,
            abnormal_flag: &result.abnormal_flag,
            status: &result.status,
            observation_time,
        }
    }
}

/// OBX — observation result.
///
/// Example: `OBX|1|NM|3A016000002327102^A/G比^JC10||1.7||1.2-2.0||||F|||201112191500`
pub fn obx(args: ObxArgs<'_>) -> Result<Segment> {
    if !args.value_type.is_empty() && !tables::contains(H7T_0125_VALUE_TYPE, args.value_type) {
        return Err(SegmentError::invalid(
            "OBX",
            "2",
            args.value_type,
            "must be one of HL7 table 0125",
        ));
    }
    if !args.status.is_empty() && !tables::contains(H7T_0085_RESULT_STATUS, args.status) {
        return Err(SegmentError::invalid(
            "OBX",
            "11",
            args.status,
            "must be one of HL7 table 0085",
        ));
    }

    let value = if args.observation_value_code.is_empty() && args.observation_value_system.is_empty()
    {
        FieldValue::datum(args.observation_value)
    } else {
        FieldValue::composed(coded_element(
            args.observation_value_code,
            args.observation_value,
            args.observation_value_system,
        ))
    };
    let unit = if args.unit.is_empty() {
        FieldValue::Empty
    } else if args.unit_code.is_empty() && args.unit_code_system.is_empty() {
        FieldValue::datum(args.unit)
    } else {
        FieldValue::composed(coded_element(args.unit_code, args.unit, args.unit_code_system))
    };

    let mut seg = Segment::new("OBX")?;
    seg.push(args.sequence_no.to_string())
        .push(args.value_type)
        .push(FieldValue::composed(coded_element(
            args.observation_code,
            args.observation_name,
            args.observation_code_system,
        ))) // OBX-3
        .push(args.observation_sub_id)
        .push(value) // OBX-5
        .push(unit) // OBX-6
        .push(args.reference_range) // OBX-7
        .push(args.abnormal_flag) // OBX-8
        .push_empty(2)
        .push(args.status) // OBX-11
        .push_empty(2)
        .push(minute(args.observation_time)); // OBX-14
    Ok(seg)
}

/// OBR — observation request, one per specimen in OUL^R22.
///
/// Example: `OBR|1|000000011000354|000000001219001|E001^血液学的検査^99O03|||20111219|20111219|...`
#[allow(clippy::too_many_arguments)]
pub fn obr(
    sequence_no: usize,
    requester_order_number: &str,
    filler_order_number: &str,
    test_type_code: &str,
    test_type_name: &str,
    test_type_code_system: &str,
    sampled_time: Option<&Hl7Timestamp>,
    sampling_finished_time: Option<&Hl7Timestamp>,
    requester: Option<&Physician>,
    reported_time: Option<&Hl7Timestamp>,
    parent_result: &str,
) -> Result<Segment> {
    let requester_field = requester
        .map(|physician| {
            format!(
                "{}^{}^{}",
                ssmix_hl7::escape(&physician.physician_id),
                ssmix_hl7::escape(&physician.family_name),
                ssmix_hl7::escape(&physician.given_name)
            )
        })
        .unwrap_or_default();

    let mut seg = Segment::new("OBR")?;
    seg.push(sequence_no.to_string())
        .push(requester_order_number) // OBR-2
        .push(filler_order_number) // OBR-3
        .push(FieldValue::composed(coded_element(
            test_type_code,
            test_type_name,
            test_type_code_system,
        ))) // OBR-4
        .push_empty(2)
        .push(minute(sampled_time)) // OBR-7
        .push(minute(sampling_finished_time)) // OBR-8
        .push_empty(7)
        .push(FieldValue::composed(requester_field)) // OBR-16
        .push_empty(5)
        .push(second(reported_time)) // OBR-22
        .push_empty(3)
        .push(parent_result); // OBR-26
    Ok(seg)
}

/// SPM — specimen.
///
/// Example: `SPM|1|000000001219001||023^血清^JC10|||||||||||||201112191500`
pub fn spm(sequence_no: usize, specimen: &LabSpecimen) -> Result<Segment> {
    if sequence_no == 0 || sequence_no > 9999 {
        return Err(SegmentError::invalid(
            "SPM",
            "1",
            sequence_no.to_string(),
            "sequence number must be 1-9999",
        ));
    }
    let mut seg = Segment::new("SPM")?;
    seg.push(sequence_no.to_string())
        .push(specimen.specimen_id.as_str()) // SPM-2
        .push_empty(1)
        .push(FieldValue::composed(coded_element(
            &specimen.specimen_code,
            &specimen.specimen_name,
            &specimen.specimen_code_system,
        ))) // SPM-4
        .push_empty(12)
        .push(specimen.sampled_time.format(Precision::Minute)); // SPM-17
    Ok(seg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssmix_model::LabResultAttrs;

    #[test]
    fn obx_places_range_flag_status_and_time() {
        let result = LabResult::new(LabResultAttrs {
            value_type: "NM".into(),
            observation_code: "3A016000002327102".into(),
            observation_name: "A/G比".into(),
            observation_code_system: "JC10".into(),
            observation_value: "1.7".into(),
            reference_range: "1.2-2.0".into(),
            abnormal_flag: "N".into(),
            status: "F".into(),
            ..LabResultAttrs::default()
        })
        .unwrap();
        let time = Hl7Timestamp::parse("201112191500").unwrap();
        let seg = obx(ObxArgs::from_lab_result(1, &result, Some(&time))).unwrap();
        assert_eq!(
            seg.encode(),
            "OBX|1|NM|3A016000002327102^A/G比^JC10||1.7||1.2-2.0|N|||F|||201112191500"
        );
    }

    #[test]
    fn obx_coded_value_uses_code_value_system_order() {
        let seg = obx(ObxArgs {
            sequence_no: 3,
            value_type: "CWE",
            observation_code: "5H010000001999911",
            observation_name: "血液型-ABO式",
            observation_code_system: "JC10",
            observation_value: "A",
            observation_value_code: "A",
            observation_value_system: "JSHR002",
            status: "F",
            ..ObxArgs::default()
        })
        .unwrap();
        assert_eq!(
            seg.encode(),
            "OBX|3|CWE|5H010000001999911^血液型-ABO式^JC10||A^A^JSHR002||||||F"
        );
    }

    #[test]
    fn obx_rejects_unknown_value_type() {
        assert!(obx(ObxArgs {
            sequence_no: 1,
            value_type: "ZZ",
            observation_value: "1",
            ..ObxArgs::default()
        })
        .is_err());
    }
}
