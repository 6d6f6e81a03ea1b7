//! Laboratory result and specimen entities, feeding OUL^R22.

use ssmix_standards::tables::{self, H7T_0078_ABNORMAL, H7T_0085_RESULT_STATUS, H7T_0125_VALUE_TYPE};

use crate::error::{ModelError, Result};
use crate::orders::OrderCommon;
use crate::timestamp::Hl7Timestamp;

/// One observation (OBX).
#[derive(Debug, Clone)]
pub struct LabResult {
    pub value_type: String,
    pub observation_code: String,
    pub observation_name: String,
    pub observation_code_system: String,
    pub observation_sub_id: String,
    pub observation_value: String,
    pub observation_value_code: String,
    pub observation_value_system: String,
    pub unit: String,
    pub unit_code: String,
    pub unit_code_system: String,
    pub reference_range: String,
    pub abnormal_flag: String,
    pub status: String,
}

/// Constructor attributes for [`LabResult`].
#[derive(Debug, Clone, Default)]
pub struct LabResultAttrs {
    pub value_type: String,
    pub observation_code: String,
    pub observation_name: String,
    pub observation_code_system: String,
    pub observation_sub_id: String,
    pub observation_value: String,
    pub observation_value_code: String,
    pub observation_value_system: String,
    pub unit: String,
    pub unit_code: String,
    pub unit_code_system: String,
    pub reference_range: String,
    pub abnormal_flag: String,
    pub status: String,
}

impl LabResult {
    pub fn new(attrs: LabResultAttrs) -> Result<Self> {
        const ENTITY: &str = "LabResult";
        if !tables::contains(H7T_0125_VALUE_TYPE, &attrs.value_type) {
            return Err(ModelError::invalid(
                ENTITY,
                "value_type",
                &attrs.value_type,
                "must be one of HL7 table 0125",
            ));
        }
        if attrs.observation_code.is_empty() || attrs.observation_code_system.is_empty() {
            return Err(ModelError::invalid(
                ENTITY,
                "observation_code",
                &attrs.observation_code,
                "observation code and code system must not be empty",
            ));
        }
        if attrs.observation_sub_id.chars().count() > 20 {
            return Err(ModelError::invalid(
                ENTITY,
                "observation_sub_id",
                &attrs.observation_sub_id,
                "must be at most 20 characters",
            ));
        }
        if attrs.observation_value.is_empty() {
            return Err(ModelError::invalid(
                ENTITY,
                "observation_value",
                &attrs.observation_value,
                "must not be empty",
            ));
        }
        if !attrs.abnormal_flag.is_empty()
            && !tables::contains(H7T_0078_ABNORMAL, &attrs.abnormal_flag)
        {
            return Err(ModelError::invalid(
                ENTITY,
                "abnormal_flag",
                &attrs.abnormal_flag,
                "must be one of HL7 table 0078",
            ));
        }
        if !tables::contains(H7T_0085_RESULT_STATUS, &attrs.status) {
            return Err(ModelError::invalid(
                ENTITY,
                "status",
                &attrs.status,
                "must be one of HL7 table 0085",
            ));
        }
        Ok(Self {
            value_type: attrs.value_type,
            observation_code: attrs.observation_code,
            observation_name: attrs.observation_name,
            observation_code_system: attrs.observation_code_system,
            observation_sub_id: attrs.observation_sub_id,
            observation_value: attrs.observation_value,
            observation_value_code: attrs.observation_value_code,
            observation_value_system: attrs.observation_value_system,
            unit: attrs.unit,
            unit_code: attrs.unit_code,
            unit_code_system: attrs.unit_code_system,
            reference_range: attrs.reference_range,
            abnormal_flag: attrs.abnormal_flag,
            status: attrs.status,
        })
    }
}

/// A specimen with its observations (SPM + OBR + ORC + OBX* cluster).
#[derive(Debug, Clone)]
pub struct LabSpecimen {
    pub specimen_id: String,
    pub specimen_code: String,
    pub specimen_name: String,
    pub specimen_code_system: String,
    pub sampled_time: Hl7Timestamp,
    pub test_type_code: String,
    pub test_type_name: String,
    pub test_type_code_system: String,
    pub sampling_finished_time: Option<Hl7Timestamp>,
    pub reported_time: Option<Hl7Timestamp>,
    /// OBR-26.
    pub parent_result: String,
    pub results: Vec<LabResult>,
    pub common: OrderCommon,
}

/// Constructor attributes for [`LabSpecimen`].
#[derive(Debug, Clone)]
pub struct LabSpecimenAttrs {
    pub specimen_id: String,
    pub specimen_code: String,
    pub specimen_name: String,
    pub specimen_code_system: String,
    pub sampled_time: String,
    pub test_type_code: String,
    pub test_type_name: String,
    pub test_type_code_system: String,
    pub sampling_finished_time: String,
    pub reported_time: String,
    pub parent_result: String,
    pub results: Vec<LabResult>,
    pub common: OrderCommon,
}

impl LabSpecimen {
    pub fn new(attrs: LabSpecimenAttrs) -> Result<Self> {
        const ENTITY: &str = "LabSpecimen";
        if attrs.specimen_id.is_empty() || attrs.specimen_id.chars().count() > 80 {
            return Err(ModelError::invalid(
                ENTITY,
                "specimen_id",
                &attrs.specimen_id,
                "must be non-empty, at most 80 characters",
            ));
        }
        for (attribute, value) in [
            ("specimen_code", &attrs.specimen_code),
            ("specimen_name", &attrs.specimen_name),
            ("specimen_code_system", &attrs.specimen_code_system),
            ("test_type_code", &attrs.test_type_code),
            ("test_type_name", &attrs.test_type_name),
            ("test_type_code_system", &attrs.test_type_code_system),
        ] {
            if value.is_empty() {
                return Err(ModelError::invalid(ENTITY, attribute, value.as_str(), "must not be empty"));
            }
        }
        if attrs.parent_result.chars().count() >= 400 {
            return Err(ModelError::invalid(
                ENTITY,
                "parent_result",
                &attrs.parent_result,
                "must be shorter than 400 characters",
            ));
        }
        if attrs.common.order_status.is_empty() {
            return Err(ModelError::invalid(
                ENTITY,
                "order_status",
                "",
                "laboratory reports require an order status (HL7 table 0038)",
            ));
        }
        if attrs.results.is_empty() {
            return Err(ModelError::invalid(
                ENTITY,
                "results",
                "[]",
                "a specimen carries at least one observation",
            ));
        }

        Ok(Self {
            specimen_id: attrs.specimen_id,
            specimen_code: attrs.specimen_code,
            specimen_name: attrs.specimen_name,
            specimen_code_system: attrs.specimen_code_system,
            sampled_time: Hl7Timestamp::parse(&attrs.sampled_time)?,
            test_type_code: attrs.test_type_code,
            test_type_name: attrs.test_type_name,
            test_type_code_system: attrs.test_type_code_system,
            sampling_finished_time: Hl7Timestamp::parse_opt(&attrs.sampling_finished_time)?,
            reported_time: Hl7Timestamp::parse_opt(&attrs.reported_time)?,
            parent_result: attrs.parent_result,
            results: attrs.results,
            common: attrs.common,
        })
    }
}
