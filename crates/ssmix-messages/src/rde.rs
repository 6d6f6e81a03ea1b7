//! RDE^O11 — pharmacy/treatment encoded order.
//!
//! The same profile carries both prescription orders (OMP-01 category)
//! and injection orders (OMP-02 category). Grammar:
//! `MSH PID [PV1] [{AL1}] { ORC RXE {TQ1} {RXR} [{RXC}] }`.

use ssmix_hl7::Message;
use ssmix_model::{
    Admission, Hl7Timestamp, Hospital, InjectionOrder, Patient, Physician, PrescriptionOrder,
};
use ssmix_segments::{al1, msh, orc, pid, pv1, rxc, rxe, rxr, tq1, MessageType, Pv1Args, RxeArgs, Tq1Args};

use crate::error::{MessageError, Result};

/// Arguments shared by both RDE^O11 renderings.
#[derive(Debug, Clone, Copy)]
pub struct RdeContext<'a> {
    pub message_time: &'a Hl7Timestamp,
    pub message_id: &'a str,
    /// Clinic for outpatients; ignored when an admission is present.
    pub department_code: &'a str,
    pub patient: &'a Patient,
    pub admission: Option<&'a Admission>,
    pub primary_physician: &'a Physician,
    pub hospital: &'a Hospital,
}

fn base_segments(ctx: &RdeContext<'_>, mt: &MessageType) -> Result<Message> {
    let mut message = Message::new();
    message.push(msh(mt, ctx.message_time, ctx.message_id)?);
    message.push(pid(ctx.patient, None)?);
    message.push(pv1(Pv1Args {
        set_id: "0001",
        department_code: ctx.department_code,
        primary_physician: Some(ctx.primary_physician),
        admission: ctx.admission,
        ..Pv1Args::default()
    })?);
    for (seq, allergy) in ctx.patient.allergies.iter().enumerate() {
        message.push(al1(seq + 1, allergy)?);
    }
    Ok(message)
}

fn check_shared_order_number<'o>(
    orders: impl Iterator<Item = &'o str>,
    kind: &'static str,
) -> Result<()> {
    let mut first: Option<&str> = None;
    for number in orders {
        match first {
            None => first = Some(number),
            Some(expected) if expected == number => {}
            Some(expected) => {
                return Err(MessageError::profile(
                    "RDE^O11",
                    format!(
                        "{kind} orders of one message share ORC-2 (got {number:?}, expected {expected:?})"
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// RDE^O11 carrying prescription orders (OMP-01).
pub fn prescription_message(
    ctx: RdeContext<'_>,
    orders: &[PrescriptionOrder],
) -> Result<Message> {
    let mt = MessageType::new("RDE", "O11", "RDE_O11")?;
    if orders.is_empty() {
        return Err(MessageError::profile(
            "RDE^O11",
            "a prescription message carries at least one order",
        ));
    }
    check_shared_order_number(
        orders.iter().map(|o| o.common.requester_order_number.as_str()),
        "prescription",
    )?;

    let mut message = base_segments(&ctx, &mt)?;
    for order in orders {
        message.push(orc(&order.common, ctx.hospital)?);
        message.push(rxe(RxeArgs {
            drug_code: &order.drug_code,
            drug_name: &order.drug_name,
            drug_code_system: &order.drug_code_system,
            minimum_dose: &order.minimum_dose,
            dose_unit: &order.dose_unit,
            dosage_form_code: &order.dosage_form_code,
            dispense_amount: &order.dispense_amount,
            dispense_unit: Some(&order.dispense_unit),
            prescription_number: &order.prescription_number,
            total_daily_dose: "",
            admission: ctx.admission,
            department_code: &order.common.requester.department_code,
        })?);
        message.push(tq1(Tq1Args {
            sequence_no: 1,
            repeat_pattern_code: &order.repeat_pattern_code,
            repeat_pattern_name: &order.repeat_pattern_name,
            repeat_pattern_code_system: &order.repeat_pattern_code_system,
            duration: &order.duration_in_days,
            duration_unit: if order.duration_in_days.is_empty() { "" } else { "d" },
            start_time: order.start_time.as_ref(),
            end_time: order.end_time.as_ref(),
            total_occurrences: &order.total_occurrences,
            ..Tq1Args::default()
        })?);
        message.push(rxr(&order.route_code, "")?);
    }
    Ok(message)
}

/// RDE^O11 carrying injection orders (OMP-02).
pub fn injection_message(ctx: RdeContext<'_>, orders: &[InjectionOrder]) -> Result<Message> {
    let mt = MessageType::new("RDE", "O11", "RDE_O11")?;
    if orders.is_empty() {
        return Err(MessageError::profile(
            "RDE^O11",
            "an injection message carries at least one order",
        ));
    }
    check_shared_order_number(
        orders.iter().map(|o| o.common.requester_order_number.as_str()),
        "injection",
    )?;

    let mut message = base_segments(&ctx, &mt)?;
    for order in orders {
        message.push(orc(&order.common, ctx.hospital)?);
        message.push(rxe(RxeArgs {
            drug_code: &order.injection_type_code,
            drug_name: &order.injection_type_name,
            drug_code_system: &order.injection_type_code_system,
            minimum_dose: &order.minimum_dose,
            dose_unit: &order.dose_unit,
            dosage_form_code: "INJ",
            dispense_amount: &order.dispense_amount,
            dispense_unit: order.dispense_unit.as_ref(),
            prescription_number: &order.prescription_number,
            total_daily_dose: "",
            admission: ctx.admission,
            department_code: ctx.department_code,
        })?);
        message.push(tq1(Tq1Args {
            sequence_no: 1,
            start_time: order.start_time.as_ref(),
            end_time: order.end_time.as_ref(),
            total_occurrences: &order.total_occurrences,
            ..Tq1Args::default()
        })?);
        message.push(rxr(&order.route_code, &order.route_device_code)?);
        for component in &order.components {
            message.push(rxc(component)?);
        }
    }
    Ok(message)
}
