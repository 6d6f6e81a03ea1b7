//! OUL^R22 — specimen-oriented laboratory result report (OML-11).
//!
//! Grammar: `MSH PID PV1 { SPM OBR ORC {OBX} }`.

use ssmix_hl7::Message;
use ssmix_model::{Admission, Hl7Timestamp, Hospital, LabSpecimen, Patient, Physician};
use ssmix_segments::{msh, obr, obx, orc, pid, pv1, spm, MessageType, ObxArgs, Pv1Args};

use crate::error::{MessageError, Result};

/// Arguments for [`r22`].
#[derive(Debug, Clone, Copy)]
pub struct OulContext<'a> {
    pub message_time: &'a Hl7Timestamp,
    pub message_id: &'a str,
    pub department_code: &'a str,
    pub patient: &'a Patient,
    pub admission: Option<&'a Admission>,
    pub primary_physician: &'a Physician,
    pub hospital: &'a Hospital,
}

/// Builds an OUL^R22 message. The profile requires at least one specimen,
/// every specimen at least one observation (enforced at construction),
/// and one shared ORC-2 plus sampling time across the report.
pub fn r22(ctx: OulContext<'_>, specimens: &[LabSpecimen]) -> Result<Message> {
    let mt = MessageType::new("OUL", "R22", "OUL_R22")?;
    let first = specimens.first().ok_or_else(|| {
        MessageError::profile("OUL^R22", "a result report carries at least one specimen")
    })?;
    for specimen in specimens {
        if specimen.common.requester_order_number != first.common.requester_order_number {
            return Err(MessageError::profile(
                "OUL^R22",
                "specimens of one report share ORC-2",
            ));
        }
        if specimen.sampled_time != first.sampled_time {
            return Err(MessageError::profile(
                "OUL^R22",
                "specimens of one report share the sampling time",
            ));
        }
    }

    let mut message = Message::new();
    message.push(msh(&mt, ctx.message_time, ctx.message_id)?);
    message.push(pid(ctx.patient, None)?);
    message.push(pv1(Pv1Args {
        set_id: "0001",
        department_code: ctx.department_code,
        primary_physician: Some(ctx.primary_physician),
        admission: ctx.admission,
        ..Pv1Args::default()
    })?);

    for (spm_no, specimen) in specimens.iter().enumerate() {
        message.push(spm(spm_no + 1, specimen)?);
        message.push(obr(
            1,
            &specimen.common.requester_order_number,
            &specimen.common.filler_order_number,
            &specimen.test_type_code,
            &specimen.test_type_name,
            &specimen.test_type_code_system,
            Some(&specimen.sampled_time),
            specimen.sampling_finished_time.as_ref(),
            Some(&specimen.common.requester),
            specimen.reported_time.as_ref(),
            &specimen.parent_result,
        )?);
        message.push(orc(&specimen.common, ctx.hospital)?);
        for (obx_no, result) in specimen.results.iter().enumerate() {
            message.push(obx(ObxArgs::from_lab_result(
                obx_no + 1,
                result,
                Some(&specimen.sampled_time),
            ))?);
        }
    }
    Ok(message)
}
