//! Problem (diagnosis) entity, feeding PPR^ZD1.

use ssmix_standards::tables::{self, JHSD_0004_DIAGNOSIS_TYPE};

use crate::error::{ModelError, Result};
use crate::orders::OrderCommon;
use crate::timestamp::Hl7Timestamp;

const ACTION_CODES: &[&str] = &["AD", "CD", "DE", "LI", "UC", "UN", "UP"];

#[derive(Debug, Clone)]
pub struct Problem {
    pub action_code: String,
    pub action_time: Hl7Timestamp,
    pub dx_code: String,
    pub dx_name: String,
    pub dx_code_system: String,
    /// PRB-4; also names the problem's ORC-2 in PPR^ZD1.
    pub instance_id: String,
    pub date_of_diagnosis: Option<Hl7Timestamp>,
    pub expected_time_solved: Option<Hl7Timestamp>,
    pub time_solved: Option<Hl7Timestamp>,
    pub icd10_code: String,
    pub icd10_name: String,
    pub diagnosis_type: String,
    /// `"1"` for provisional (疑い), empty otherwise.
    pub provisional: String,
    pub time_of_onset: Option<Hl7Timestamp>,
    pub common: OrderCommon,
}

/// Constructor attributes for [`Problem`].
#[derive(Debug, Clone)]
pub struct ProblemAttrs {
    pub action_code: String,
    pub action_time: String,
    pub dx_code: String,
    pub dx_name: String,
    pub dx_code_system: String,
    pub instance_id: String,
    pub date_of_diagnosis: String,
    pub expected_time_solved: String,
    pub time_solved: String,
    pub icd10_code: String,
    pub icd10_name: String,
    pub diagnosis_type: String,
    pub provisional: String,
    pub time_of_onset: String,
    pub common: OrderCommon,
}

impl Problem {
    pub fn new(attrs: ProblemAttrs) -> Result<Self> {
        const ENTITY: &str = "Problem";
        if !ACTION_CODES.contains(&attrs.action_code.as_str()) {
            return Err(ModelError::invalid(
                ENTITY,
                "action_code",
                &attrs.action_code,
                "must be one of AD, CD, DE, LI, UC, UN, UP",
            ));
        }
        if attrs.dx_code.is_empty() || attrs.dx_code_system.is_empty() {
            return Err(ModelError::invalid(
                ENTITY,
                "dx_code",
                &attrs.dx_code,
                "diagnosis code and code system must not be empty",
            ));
        }
        let dx_len = attrs.dx_code.chars().count()
            + attrs.dx_name.chars().count()
            + attrs.dx_code_system.chars().count();
        if dx_len >= 230 {
            return Err(ModelError::invalid(
                ENTITY,
                "dx_code",
                format!("{dx_len} chars"),
                "diagnosis code, name and system combined must be shorter than 230 characters",
            ));
        }
        if attrs.icd10_code.chars().count() > 10 {
            return Err(ModelError::invalid(
                ENTITY,
                "icd10_code",
                &attrs.icd10_code,
                "must be at most 10 characters",
            ));
        }
        if attrs.instance_id.is_empty() || attrs.instance_id.chars().count() > 60 {
            return Err(ModelError::invalid(
                ENTITY,
                "instance_id",
                &attrs.instance_id,
                "must be non-empty, at most 60 characters",
            ));
        }
        if !attrs.diagnosis_type.is_empty()
            && !tables::contains(JHSD_0004_DIAGNOSIS_TYPE, &attrs.diagnosis_type)
        {
            return Err(ModelError::invalid(
                ENTITY,
                "diagnosis_type",
                &attrs.diagnosis_type,
                "must be one of JHSD0004",
            ));
        }
        if !attrs.provisional.is_empty() && attrs.provisional != "1" {
            return Err(ModelError::invalid(
                ENTITY,
                "provisional",
                &attrs.provisional,
                "must be \"1\" or empty",
            ));
        }

        Ok(Self {
            action_code: attrs.action_code,
            action_time: Hl7Timestamp::parse(&attrs.action_time)?,
            dx_code: attrs.dx_code,
            dx_name: attrs.dx_name,
            dx_code_system: attrs.dx_code_system,
            instance_id: attrs.instance_id,
            date_of_diagnosis: Hl7Timestamp::parse_opt(&attrs.date_of_diagnosis)?,
            expected_time_solved: Hl7Timestamp::parse_opt(&attrs.expected_time_solved)?,
            time_solved: Hl7Timestamp::parse_opt(&attrs.time_solved)?,
            icd10_code: attrs.icd10_code,
            icd10_name: attrs.icd10_name,
            diagnosis_type: attrs.diagnosis_type,
            provisional: attrs.provisional,
            time_of_onset: Hl7Timestamp::parse_opt(&attrs.time_of_onset)?,
            common: attrs.common,
        })
    }
}
