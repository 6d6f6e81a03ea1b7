//! Per-patient message emission.
//!
//! One worker owns one patient: it replays the event table in clinical
//! order, maintains the admission state, derives outpatient visits on
//! date changes, and writes each message as soon as it is built, so the
//! on-disk order within a patient matches clinical time.

use chrono::Duration;
use rand::seq::SliceRandom;
use rand::Rng;

use ssmix_ingest::{EventKind, SourceFile};
use ssmix_messages::{adt, oul, ppr, rde};
use ssmix_model::{
    Admission, Hl7Timestamp, Hospital, InjectionAttrs, InjectionComponent, InjectionOrder,
    LabSpecimen, LabSpecimenAttrs, MinimumDose, OrderClass, OrderCommon, Patient, Physician,
    Precision, PrescriptionAttrs, PrescriptionOrder, Problem, ProblemAttrs,
};
use ssmix_output::{write_message, DataCategory, MessageFile, SsmixRoot};
use ssmix_synth::{
    injection_component_kind, prescription_profile, synth_admission_location, synth_patient,
    PatientSeed, SynthRng,
};

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::events::{derive_facts, parse_events, ClinicalEvent};
use crate::ids::{MessageIdGen, OrderNumberGen};

/// Read-only state shared by every worker.
pub struct SharedContext<'a> {
    pub root: &'a SsmixRoot,
    pub hospital: &'a Hospital,
    pub physicians: &'a [Physician],
    pub cancel: &'a CancelToken,
}

/// What one patient slice produced.
#[derive(Debug, Default)]
pub struct SliceOutcome {
    pub messages_written: usize,
    pub cancelled: bool,
}

fn jitter(rng: &mut SynthRng, min_minutes: i64, max_minutes: i64) -> Duration {
    Duration::milliseconds(rng.gen_range(min_minutes * 60_000..max_minutes * 60_000))
}

fn pick<'a>(rng: &mut SynthRng, physicians: &'a [Physician]) -> &'a Physician {
    physicians.choose(rng).unwrap_or(&physicians[0])
}

/// The requester/enterer draw: mostly the primary physician, sometimes
/// the attending or a random colleague.
fn draw_requester<'a>(
    rng: &mut SynthRng,
    primary: &'a Physician,
    physicians: &'a [Physician],
    admission: Option<&'a Admission>,
) -> &'a Physician {
    if rng.gen_bool(0.7) {
        return primary;
    }
    if let Some(admission) = admission {
        if rng.gen_bool(0.5) {
            return &admission.physician;
        }
    }
    if rng.gen_bool(0.5) {
        primary
    } else {
        pick(rng, physicians)
    }
}

/// Walks one patient's events and writes every message of the slice.
pub fn process_patient(
    ctx: &SharedContext<'_>,
    source: &SourceFile,
    patient_id: &str,
    rng: &mut SynthRng,
) -> Result<SliceOutcome> {
    if ctx.physicians.is_empty() {
        return Err(crate::error::CoreError::Pool("physician pool is empty".into()));
    }
    let rows = ssmix_ingest::read_event_rows(&source.path)?;
    let events = parse_events(source, rows)?;
    let facts = derive_facts(source, &events)?;

    let patient = synth_patient(
        rng,
        &PatientSeed {
            patient_id,
            dob: &facts.dob,
            age: facts.latest_age,
            latest_date: facts.latest_date,
            sex: source.sex,
            death_date: &facts.death_date,
            n_insurance: 1,
        },
    )?;
    for event in &events {
        patient.check_event_date(event.timestamp.date())?;
    }

    let mut message_ids = MessageIdGen::new(patient_id);
    let mut order_numbers = OrderNumberGen::new(patient_id);
    let mut primary = pick(rng, ctx.physicians).clone();
    let mut admission: Option<Admission> = None;
    let mut current_date = String::new();
    let mut last_timestamp = facts.latest_date;

    let mut emitter = Emitter {
        ctx,
        patient: &patient,
        outcome: SliceOutcome::default(),
    };

    for group in group_events(&events) {
        if emitter.ctx.cancel.is_cancelled() {
            emitter.outcome.cancelled = true;
            return Ok(emitter.outcome);
        }
        let timestamp = group[0].timestamp;
        let kind = group[0].kind;
        last_timestamp = timestamp;

        // A date change while not admitted means the patient walked in:
        // file an outpatient visit before the day's first event.
        let day = timestamp.format(Precision::Day);
        if current_date != day {
            current_date = day;
            if admission.is_none() {
                if rng.gen_bool(0.1) {
                    primary = pick(rng, ctx.physicians).clone();
                }
                let visit_time = timestamp.shifted(-jitter(rng, 30, 180));
                emitter.emit_visit(
                    rng,
                    &visit_time,
                    &primary,
                    &mut message_ids,
                    &mut order_numbers,
                )?;
            }
        }

        match kind {
            EventKind::Admission => {
                let attending = pick(rng, ctx.physicians).clone();
                let opened = synth_admission_location(rng, timestamp, attending)?;
                if rng.gen_bool(0.5) {
                    primary = pick(rng, ctx.physicians).clone();
                }
                emitter.emit_admission(
                    rng,
                    &opened,
                    &primary,
                    &mut message_ids,
                    &mut order_numbers,
                )?;
                admission = Some(opened);
            }
            EventKind::Discharge => {
                let mut closing = admission.take().ok_or_else(|| {
                    crate::error::CoreError::source(&source.path, "discharge without admission")
                })?;
                closing.discharge(timestamp)?;
                emitter.emit_discharge(
                    rng,
                    &closing,
                    &timestamp,
                    &group[0].row.discharge_disposition,
                    &primary,
                    &mut message_ids,
                    &mut order_numbers,
                )?;
            }
            EventKind::Diagnosis => {
                let requester =
                    draw_requester(rng, &primary, ctx.physicians, admission.as_ref()).clone();
                emitter.emit_diagnoses(
                    &group,
                    &requester,
                    admission.as_ref(),
                    &mut message_ids,
                    &mut order_numbers,
                )?;
            }
            EventKind::Prescription => {
                let requester =
                    draw_requester(rng, &primary, ctx.physicians, admission.as_ref()).clone();
                emitter.emit_prescriptions(
                    rng,
                    &group,
                    &requester,
                    &primary,
                    admission.as_ref(),
                    &mut message_ids,
                    &mut order_numbers,
                )?;
            }
            EventKind::Injection => {
                let requester =
                    draw_requester(rng, &primary, ctx.physicians, admission.as_ref()).clone();
                emitter.emit_injections(
                    rng,
                    &group,
                    &requester,
                    &primary,
                    admission.as_ref(),
                    &mut message_ids,
                    &mut order_numbers,
                )?;
            }
            EventKind::Laboratory => {
                let requester =
                    draw_requester(rng, &primary, ctx.physicians, admission.as_ref()).clone();
                emitter.emit_laboratory(
                    rng,
                    &group,
                    &requester,
                    &primary,
                    admission.as_ref(),
                    &mut message_ids,
                    &mut order_numbers,
                )?;
            }
        }
    }

    if emitter.ctx.cancel.is_cancelled() {
        emitter.outcome.cancelled = true;
        return Ok(emitter.outcome);
    }

    // Demographics last: the snapshot reflects the final admission state.
    emitter.emit_demographics(rng, &last_timestamp, &primary, admission.as_ref(), &mut message_ids)?;

    Ok(emitter.outcome)
}

/// Groups consecutive events sharing (timestamp, kind); rows of one group
/// travel in one message.
fn group_events(events: &[ClinicalEvent]) -> Vec<Vec<&ClinicalEvent>> {
    let mut groups: Vec<Vec<&ClinicalEvent>> = Vec::new();
    for event in events {
        match groups.last_mut() {
            Some(group)
                if group[0].timestamp == event.timestamp && group[0].kind == event.kind =>
            {
                group.push(event);
            }
            _ => groups.push(vec![event]),
        }
    }
    groups
}

struct Emitter<'a> {
    ctx: &'a SharedContext<'a>,
    patient: &'a Patient,
    outcome: SliceOutcome,
}

impl Emitter<'_> {
    fn write(&mut self, file: MessageFile, bytes: &[u8]) -> Result<()> {
        write_message(self.ctx.root, &file, bytes)?;
        self.outcome.messages_written += 1;
        Ok(())
    }

    fn order_common(
        &self,
        order_control: &str,
        requester_order_number: &str,
        filler_order_number: &str,
        group_number: &str,
        order_status: &str,
        transaction_time: &Hl7Timestamp,
        requester: &Physician,
        admitted: bool,
    ) -> Result<OrderCommon> {
        let time = transaction_time.format(Precision::Second);
        Ok(OrderCommon::new(
            order_control,
            requester_order_number,
            filler_order_number,
            group_number,
            order_status,
            &time,
            &time,
            OrderClass::of_admission(admitted),
            requester.clone(),
            requester.clone(),
        )?)
    }

    fn emit_visit(
        &mut self,
        rng: &mut SynthRng,
        visit_time: &Hl7Timestamp,
        primary: &Physician,
        message_ids: &mut MessageIdGen,
        order_numbers: &mut OrderNumberGen,
    ) -> Result<()> {
        let transaction = visit_time.shifted(jitter(rng, 1, 5));
        let message_time = visit_time.shifted(jitter(rng, 5, 10));
        let message = adt::a04(
            adt::AdtContext {
                message_time: &message_time,
                message_id: &message_ids.next_id(),
                transaction_time: &transaction,
                patient: self.patient,
                primary_physician: primary,
            },
            visit_time,
            &primary.department_code,
        )?;
        self.write(
            MessageFile {
                patient_id: self.patient.patient_id.clone(),
                date: visit_time.format(Precision::Day),
                category: DataCategory::Adt12,
                order_number: order_numbers.next_number(),
                message_time,
                department_code: primary.department_code.clone(),
                condition_flag: "1".into(),
            },
            &message.encode(),
        )
    }

    fn emit_admission(
        &mut self,
        rng: &mut SynthRng,
        admission: &Admission,
        primary: &Physician,
        message_ids: &mut MessageIdGen,
        order_numbers: &mut OrderNumberGen,
    ) -> Result<()> {
        let transaction = admission.admit_time.shifted(jitter(rng, 1, 5));
        let message_time = admission.admit_time.shifted(jitter(rng, 5, 10));
        let message = adt::a01(
            adt::AdtContext {
                message_time: &message_time,
                message_id: &message_ids.next_id(),
                transaction_time: &transaction,
                patient: self.patient,
                primary_physician: primary,
            },
            admission,
        )?;
        self.write(
            MessageFile {
                patient_id: self.patient.patient_id.clone(),
                date: admission.admit_time.format(Precision::Day),
                category: DataCategory::Adt22,
                order_number: order_numbers.next_number(),
                message_time,
                department_code: admission.department_code().to_string(),
                condition_flag: "1".into(),
            },
            &message.encode(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_discharge(
        &mut self,
        rng: &mut SynthRng,
        admission: &Admission,
        discharge_time: &Hl7Timestamp,
        disposition: &str,
        primary: &Physician,
        message_ids: &mut MessageIdGen,
        order_numbers: &mut OrderNumberGen,
    ) -> Result<()> {
        let transaction = discharge_time.shifted(jitter(rng, 1, 5));
        let message_time = discharge_time.shifted(jitter(rng, 5, 10));
        let message = adt::a03(
            adt::AdtContext {
                message_time: &message_time,
                message_id: &message_ids.next_id(),
                transaction_time: &transaction,
                patient: self.patient,
                primary_physician: primary,
            },
            admission,
            disposition,
        )?;
        self.write(
            MessageFile {
                patient_id: self.patient.patient_id.clone(),
                date: discharge_time.format(Precision::Day),
                category: DataCategory::Adt52,
                order_number: order_numbers.next_number(),
                message_time,
                department_code: admission.department_code().to_string(),
                condition_flag: "1".into(),
            },
            &message.encode(),
        )
    }

    fn emit_diagnoses(
        &mut self,
        group: &[&ClinicalEvent],
        requester: &Physician,
        admission: Option<&Admission>,
        message_ids: &mut MessageIdGen,
        order_numbers: &mut OrderNumberGen,
    ) -> Result<()> {
        let timestamp = group[0].timestamp;
        let requester_order_number = order_numbers.next_number();
        let filler_order_number = order_numbers.next_number();
        let diagnosis_type = if admission.is_some() { "A" } else { "O" };

        let mut problems = Vec::with_capacity(group.len());
        for event in group {
            let (dx_code, dx_code_system) = match event.row.mdcdx2.as_str() {
                "" => ("99999999".to_string(), "99XYZ"),
                code if code.len() == 8 => (code.to_string(), "MDCDX2"),
                code => (code.to_string(), "99XYZ"),
            };
            let dx_name = if event.row.text.is_empty() {
                "名称未設定".to_string()
            } else {
                event.row.text.clone()
            };
            let action_time = timestamp.format(Precision::Second);
            problems.push(Problem::new(ProblemAttrs {
                action_code: "AD".into(),
                action_time: action_time.clone(),
                dx_code,
                dx_name,
                dx_code_system: dx_code_system.into(),
                instance_id: order_numbers.next_number(),
                date_of_diagnosis: timestamp.format(Precision::Day),
                expected_time_solved: String::new(),
                time_solved: String::new(),
                icd10_code: event.row.icd10.clone(),
                icd10_name: String::new(),
                diagnosis_type: diagnosis_type.into(),
                provisional: event.row.provisional.clone(),
                time_of_onset: timestamp.format(Precision::Day),
                common: self.order_common(
                    "NW",
                    &requester_order_number,
                    &filler_order_number,
                    "",
                    "",
                    &timestamp,
                    requester,
                    admission.is_some(),
                )?,
            })?);
        }

        let message_time = timestamp;
        let message = ppr::zd1(
            &message_time,
            &message_ids.next_id(),
            self.patient,
            self.ctx.hospital,
            &problems,
        )?;
        self.write(
            MessageFile {
                patient_id: self.patient.patient_id.clone(),
                date: timestamp.format(Precision::Day),
                category: DataCategory::Ppr01,
                order_number: requester_order_number,
                message_time,
                department_code: requester.department_code.clone(),
                condition_flag: "1".into(),
            },
            &message.encode(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_prescriptions(
        &mut self,
        rng: &mut SynthRng,
        group: &[&ClinicalEvent],
        requester: &Physician,
        primary: &Physician,
        admission: Option<&Admission>,
        message_ids: &mut MessageIdGen,
        order_numbers: &mut OrderNumberGen,
    ) -> Result<()> {
        let timestamp = group[0].timestamp;
        let requester_order_number = order_numbers.next_number();
        let filler_order_number = order_numbers.next_number();
        let admitted = admission.is_some();

        let mut orders = Vec::with_capacity(group.len());
        for (rp_no, event) in group.iter().enumerate() {
            let (drug_code, drug_code_system) = match event.row.hot.as_str() {
                "" => ("999999".to_string(), "99XYZ".to_string()),
                code => (code.to_string(), format!("HOT{}", code.len())),
            };
            let drug_name = if event.row.text.is_empty() {
                "名称未設定".to_string()
            } else {
                event.row.text.clone()
            };
            let profile = prescription_profile(&drug_name);
            let dispense_amount = rng.gen_range(1..=20).to_string();
            let dispense_unit = match &profile.dose_unit {
                ssmix_model::DoseUnit::Coded { .. } => profile.dose_unit.clone(),
                // Undefinable dose units still dispense in tubes.
                ssmix_model::DoseUnit::Undefined => ssmix_model::DoseUnit::merit("HON")?,
            };
            let total_occurrences = match &profile.dose_unit {
                ssmix_model::DoseUnit::Coded { code, .. } if code == "DOSE" => {
                    dispense_amount.clone()
                }
                _ => String::new(),
            };
            let (repeat_code, repeat_name, repeat_system) =
                ssmix_synth::drugs::pick_repeat_pattern(rng);
            let recipe_number = format!("{:02}", rp_no + 1);
            orders.push(PrescriptionOrder::new(PrescriptionAttrs {
                drug_code,
                drug_name,
                drug_code_system,
                minimum_dose: profile.minimum_dose,
                dose_unit: profile.dose_unit,
                dosage_form_code: profile.dosage_form_code.into(),
                dispense_amount,
                dispense_unit,
                prescription_number: requester_order_number.clone(),
                repeat_pattern_code: repeat_code.into(),
                repeat_pattern_name: repeat_name.into(),
                repeat_pattern_code_system: repeat_system.into(),
                duration_in_days: ssmix_synth::drugs::pick_duration_days(rng, admitted),
                start_time: timestamp.format(Precision::Minute),
                end_time: String::new(),
                total_occurrences,
                route_code: profile.route_code.into(),
                recipe_number: recipe_number.clone(),
                order_admin_number: "001".into(),
                common: self.order_common(
                    "NW",
                    &requester_order_number,
                    &filler_order_number,
                    &OrderCommon::medication_group_number(
                        &requester_order_number,
                        &recipe_number,
                        "001",
                    ),
                    "",
                    &timestamp,
                    requester,
                    admitted,
                )?,
            })?);
        }

        let message_time = timestamp;
        let department = admission
            .map(|a| a.department_code().to_string())
            .unwrap_or_else(|| primary.department_code.clone());
        let message = rde::prescription_message(
            rde::RdeContext {
                message_time: &message_time,
                message_id: &message_ids.next_id(),
                department_code: &department,
                patient: self.patient,
                admission,
                primary_physician: primary,
                hospital: self.ctx.hospital,
            },
            &orders,
        )?;
        self.write(
            MessageFile {
                patient_id: self.patient.patient_id.clone(),
                date: timestamp.format(Precision::Day),
                category: DataCategory::Omp01,
                order_number: requester_order_number,
                message_time,
                department_code: department,
                condition_flag: "1".into(),
            },
            &message.encode(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_injections(
        &mut self,
        rng: &mut SynthRng,
        group: &[&ClinicalEvent],
        requester: &Physician,
        primary: &Physician,
        admission: Option<&Admission>,
        message_ids: &mut MessageIdGen,
        order_numbers: &mut OrderNumberGen,
    ) -> Result<()> {
        let timestamp = group[0].timestamp;
        let requester_order_number = order_numbers.next_number();
        let filler_order_number = order_numbers.next_number();
        let admitted = admission.is_some();

        // Real injection orders mix several components under one ORC
        // (carrier plus additives), so the rows at one timestamp are
        // shuffled and split into component groups.
        let mut shuffled: Vec<&ClinicalEvent> = group.to_vec();
        shuffled.shuffle(rng);
        let mut chunks: Vec<Vec<&ClinicalEvent>> = Vec::new();
        if shuffled.len() >= 3 {
            let max_pick = shuffled.len() / 3;
            let mut idx = 0;
            while idx < shuffled.len() {
                let remaining = shuffled.len() - idx;
                let take = rng.gen_range(1..=remaining.min(max_pick).max(1));
                chunks.push(shuffled[idx..idx + take].to_vec());
                idx += take;
            }
        } else {
            chunks.push(shuffled);
        }

        let mut orders = Vec::with_capacity(chunks.len());
        for (rp_no, chunk) in chunks.iter().enumerate() {
            let mut components = Vec::with_capacity(chunk.len());
            for event in chunk {
                let (code, code_system) = match event.row.hot.as_str() {
                    "" => ("999999".to_string(), "99XYZ".to_string()),
                    value => (value.to_string(), format!("HOT{}", value.len())),
                };
                let name = if event.row.text.is_empty() {
                    "名称未設定".to_string()
                } else {
                    event.row.text.clone()
                };
                let kind = injection_component_kind(&name);
                let (quantity, unit) = ssmix_synth::drugs::component_quantity(rng, kind);
                components.push(InjectionComponent::new(
                    kind,
                    &code,
                    &name,
                    &code_system,
                    quantity,
                    unit,
                    unit,
                    "ISO+",
                )?);
            }

            let (dispense_amount, dispense_unit) = if rng.gen_bool(0.8) {
                (String::new(), None)
            } else {
                (
                    ["120", "240", "360"].choose(rng).copied().unwrap_or("120").to_string(),
                    Some(ssmix_model::DoseUnit::free("ml", "ml", "ISO+")?),
                )
            };
            let end_time = timestamp.shifted(Duration::days(1));
            let order_admin_number = format!("{:03}", rp_no + 1);
            orders.push(InjectionOrder::new(InjectionAttrs {
                injection_type_code: "01".into(),
                minimum_dose: MinimumDose::Amount("120".into()),
                dose_unit: ssmix_model::DoseUnit::free("ml", "ml", "ISO+")?,
                dispense_amount,
                dispense_unit,
                prescription_number: requester_order_number.clone(),
                start_time: timestamp.format(Precision::Minute),
                end_time: end_time.format(Precision::Minute),
                total_occurrences: String::new(),
                route_code: "IV".into(),
                route_device_code: "IVP".into(),
                components,
                recipe_number: "01".into(),
                order_admin_number: order_admin_number.clone(),
                common: self.order_common(
                    "NW",
                    &requester_order_number,
                    &filler_order_number,
                    &OrderCommon::medication_group_number(
                        &requester_order_number,
                        "01",
                        &order_admin_number,
                    ),
                    "",
                    &timestamp,
                    requester,
                    admitted,
                )?,
            })?);
        }

        let message_time = timestamp;
        let department = admission
            .map(|a| a.department_code().to_string())
            .unwrap_or_else(|| primary.department_code.clone());
        let message = rde::injection_message(
            rde::RdeContext {
                message_time: &message_time,
                message_id: &message_ids.next_id(),
                department_code: &department,
                patient: self.patient,
                admission,
                primary_physician: primary,
                hospital: self.ctx.hospital,
            },
            &orders,
        )?;
        self.write(
            MessageFile {
                patient_id: self.patient.patient_id.clone(),
                date: timestamp.format(Precision::Day),
                category: DataCategory::Omp02,
                order_number: requester_order_number,
                message_time,
                department_code: department,
                condition_flag: "1".into(),
            },
            &message.encode(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_laboratory(
        &mut self,
        rng: &mut SynthRng,
        group: &[&ClinicalEvent],
        requester: &Physician,
        primary: &Physician,
        admission: Option<&Admission>,
        message_ids: &mut MessageIdGen,
        order_numbers: &mut OrderNumberGen,
    ) -> Result<()> {
        let timestamp = group[0].timestamp;
        let requester_order_number = order_numbers.next_number();
        let filler_order_number = order_numbers.next_number();
        let admitted = admission.is_some();

        // Group observations by specimen material; one SPM cluster each.
        let mut by_specimen: Vec<(String, Vec<&ClinicalEvent>)> = Vec::new();
        for event in group {
            let code = ssmix_synth::lab::specimen_code_of(&event.row.jlac10).to_string();
            match by_specimen.iter_mut().find(|(c, _)| *c == code) {
                Some((_, events)) => events.push(event),
                None => by_specimen.push((code, vec![event])),
            }
        }
        by_specimen.sort_by(|a, b| a.0.cmp(&b.0));

        let reported_time = timestamp.shifted(jitter(rng, 30, 180));
        let effective_time = timestamp.shifted(-jitter(rng, 10, 1440));

        let mut specimens = Vec::with_capacity(by_specimen.len());
        for (specimen_code, events) in &by_specimen {
            let mut results = Vec::with_capacity(events.len());
            for event in events {
                results.push(ssmix_synth::lab::synth_lab_result(
                    &event.row.jlac10,
                    &event.row.text,
                    &event.row.lab_value,
                    &event.row.unit,
                )?);
            }
            let (specimen_name, specimen_system) =
                ssmix_synth::lab::specimen_naming(specimen_code);
            let (test_type_code, test_type_name, test_type_system) =
                ssmix_synth::lab::dominant_test_type(&results);
            specimens.push(LabSpecimen::new(LabSpecimenAttrs {
                specimen_id: order_numbers.next_number(),
                specimen_code: specimen_code.clone(),
                specimen_name: specimen_name.to_string(),
                specimen_code_system: specimen_system.to_string(),
                sampled_time: timestamp.format(Precision::Minute),
                test_type_code,
                test_type_name: test_type_name.to_string(),
                test_type_code_system: test_type_system.to_string(),
                sampling_finished_time: timestamp.format(Precision::Minute),
                reported_time: reported_time.format(Precision::Second),
                parent_result: String::new(),
                results,
                common: OrderCommon::new(
                    "SC",
                    &requester_order_number,
                    &filler_order_number,
                    "",
                    "CM",
                    &reported_time.format(Precision::Second),
                    &effective_time.format(Precision::Second),
                    OrderClass::of_admission(admitted),
                    requester.clone(),
                    requester.clone(),
                )?,
            })?);
        }

        let message_time = reported_time;
        let department = admission
            .map(|a| a.department_code().to_string())
            .unwrap_or_else(|| primary.department_code.clone());
        let message = oul::r22(
            oul::OulContext {
                message_time: &message_time,
                message_id: &message_ids.next_id(),
                department_code: &department,
                patient: self.patient,
                admission,
                primary_physician: primary,
                hospital: self.ctx.hospital,
            },
            &specimens,
        )?;
        self.write(
            MessageFile {
                patient_id: self.patient.patient_id.clone(),
                date: timestamp.format(Precision::Day),
                category: DataCategory::Oml11,
                order_number: requester_order_number,
                message_time,
                department_code: department,
                condition_flag: "1".into(),
            },
            &message.encode(),
        )
    }

    fn emit_demographics(
        &mut self,
        rng: &mut SynthRng,
        last_updated: &Hl7Timestamp,
        primary: &Physician,
        admission: Option<&Admission>,
        message_ids: &mut MessageIdGen,
    ) -> Result<()> {
        let transaction = last_updated.shifted(jitter(rng, 1, 5));
        let message_time = last_updated.shifted(jitter(rng, 5, 10));
        let message = adt::a08(
            adt::AdtContext {
                message_time: &message_time,
                message_id: &message_ids.next_id(),
                transaction_time: &transaction,
                patient: self.patient,
                primary_physician: primary,
            },
            last_updated,
            admission,
        )?;
        self.write(
            MessageFile {
                patient_id: self.patient.patient_id.clone(),
                date: "-".into(),
                category: DataCategory::Adt00,
                order_number: "9".repeat(15),
                message_time,
                department_code: "-".into(),
                condition_flag: "1".into(),
            },
            &message.encode(),
        )
    }
}
