//! Prescription and injection order entities.

use ssmix_standards::tables::{
    self, H7T_0119_ORDER_CONTROL, JHSI_0002_INJECTION, MERIT_9_3_DOSAGE_FORM, MERIT_9_4_UNIT,
    UDT_0162_ROUTE, UDT_0164_DEVICE,
};

use crate::enums::{ComponentKind, OrderClass};
use crate::error::{ModelError, Result};
use crate::physician::Physician;
use crate::timestamp::Hl7Timestamp;

/// RXE-3. The minimum dose is profile-required, but for drugs whose dose
/// has no meaningful unit (ointments and the like) the value is
/// *undefined* and emitted as the HL7 null literal, never as an empty
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinimumDose {
    Amount(String),
    Undefined,
}

impl MinimumDose {
    fn validate(&self, entity: &'static str) -> Result<()> {
        match self {
            MinimumDose::Undefined => Ok(()),
            MinimumDose::Amount(amount) => {
                if amount.is_empty() || amount.len() > 20 || !amount.chars().all(|c| c.is_ascii_digit())
                {
                    Err(ModelError::invalid(
                        entity,
                        "minimum_dose",
                        amount.as_str(),
                        "must be digits, 1-20 characters",
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// RXE-5 dose unit; undefined exactly when the minimum dose is undefined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoseUnit {
    Coded {
        code: String,
        name: String,
        system: String,
    },
    Undefined,
}

impl DoseUnit {
    /// A MERIT-9 表4 unit with its display name resolved.
    pub fn merit(code: &str) -> Result<Self> {
        let name = tables::lookup(MERIT_9_4_UNIT, code).ok_or_else(|| {
            ModelError::invalid("DoseUnit", "code", code, "must be one of MERIT-9 表4")
        })?;
        Ok(DoseUnit::Coded {
            code: code.to_string(),
            name: name.to_string(),
            system: "MR9P".to_string(),
        })
    }

    /// A free unit (ISO+ etc.), name and system required.
    pub fn free(code: &str, name: &str, system: &str) -> Result<Self> {
        if code.is_empty() || name.is_empty() || system.is_empty() {
            return Err(ModelError::invalid(
                "DoseUnit",
                "code",
                code,
                "free units require code, name and system",
            ));
        }
        Ok(DoseUnit::Coded {
            code: code.to_string(),
            name: name.to_string(),
            system: system.to_string(),
        })
    }
}

/// ORC fields shared by every order of one placed group.
#[derive(Debug, Clone)]
pub struct OrderCommon {
    pub order_control: String,
    /// ORC-2, 15 digits zero-filled; also names the output file.
    pub requester_order_number: String,
    pub filler_order_number: String,
    /// ORC-4, `<order#>_<recipe#>_<admin#>` for medication orders.
    pub group_number: String,
    pub order_status: String,
    pub transaction_time: Option<Hl7Timestamp>,
    pub effective_time: Option<Hl7Timestamp>,
    pub class: OrderClass,
    pub enterer: Physician,
    pub requester: Physician,
}

impl OrderCommon {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_control: &str,
        requester_order_number: &str,
        filler_order_number: &str,
        group_number: &str,
        order_status: &str,
        transaction_time: &str,
        effective_time: &str,
        class: OrderClass,
        enterer: Physician,
        requester: Physician,
    ) -> Result<Self> {
        const ENTITY: &str = "Order";
        if !tables::contains(H7T_0119_ORDER_CONTROL, order_control) {
            return Err(ModelError::invalid(
                ENTITY,
                "order_control",
                order_control,
                "must be one of HL7 table 0119",
            ));
        }
        let requester_order_number = order_number(ENTITY, "requester_order_number", requester_order_number)?;
        let filler_order_number = if filler_order_number.is_empty() {
            String::new()
        } else {
            order_number(ENTITY, "filler_order_number", filler_order_number)?
        };
        if !order_status.is_empty() && !tables::contains(tables::H7T_0038_ORDER_STATUS, order_status) {
            return Err(ModelError::invalid(
                ENTITY,
                "order_status",
                order_status,
                "must be one of HL7 table 0038",
            ));
        }
        Ok(Self {
            order_control: order_control.to_string(),
            requester_order_number,
            filler_order_number,
            group_number: group_number.to_string(),
            order_status: order_status.to_string(),
            transaction_time: Hl7Timestamp::parse_opt(transaction_time)?,
            effective_time: Hl7Timestamp::parse_opt(effective_time)?,
            class,
            enterer,
            requester,
        })
    }

    /// ORC-4 for medication orders: requester order number + recipe and
    /// administration counters.
    pub fn medication_group_number(
        requester_order_number: &str,
        recipe_number: &str,
        order_admin_number: &str,
    ) -> String {
        format!(
            "{:0>15}_{recipe_number}_{order_admin_number}",
            requester_order_number
        )
    }
}

fn order_number(entity: &'static str, attribute: &'static str, value: &str) -> Result<String> {
    if value.is_empty() || value.len() > 15 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ModelError::invalid(
            entity,
            attribute,
            value,
            "must be digits, at most 15 characters",
        ));
    }
    Ok(format!("{value:0>15}"))
}

fn check_counter(
    entity: &'static str,
    attribute: &'static str,
    value: &str,
    len: usize,
) -> Result<()> {
    if value.len() != len || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ModelError::invalid(
            entity,
            attribute,
            value,
            format!("must be a {len}-digit number"),
        ));
    }
    Ok(())
}

/// One prescribed drug (one RXE cluster of an RDE^O11).
#[derive(Debug, Clone)]
pub struct PrescriptionOrder {
    pub drug_code: String,
    pub drug_name: String,
    pub drug_code_system: String,
    pub minimum_dose: MinimumDose,
    pub dose_unit: DoseUnit,
    pub dosage_form_code: String,
    pub dispense_amount: String,
    pub dispense_unit: DoseUnit,
    pub prescription_number: String,
    pub repeat_pattern_code: String,
    pub repeat_pattern_name: String,
    pub repeat_pattern_code_system: String,
    pub duration_in_days: String,
    pub start_time: Option<Hl7Timestamp>,
    pub end_time: Option<Hl7Timestamp>,
    pub total_occurrences: String,
    pub route_code: String,
    pub recipe_number: String,
    pub order_admin_number: String,
    pub common: OrderCommon,
}

/// Constructor attributes for [`PrescriptionOrder`].
#[derive(Debug, Clone)]
pub struct PrescriptionAttrs {
    pub drug_code: String,
    pub drug_name: String,
    pub drug_code_system: String,
    pub minimum_dose: MinimumDose,
    pub dose_unit: DoseUnit,
    pub dosage_form_code: String,
    pub dispense_amount: String,
    pub dispense_unit: DoseUnit,
    pub prescription_number: String,
    pub repeat_pattern_code: String,
    pub repeat_pattern_name: String,
    pub repeat_pattern_code_system: String,
    pub duration_in_days: String,
    pub start_time: String,
    pub end_time: String,
    pub total_occurrences: String,
    pub route_code: String,
    pub recipe_number: String,
    pub order_admin_number: String,
    pub common: OrderCommon,
}

impl PrescriptionOrder {
    pub fn new(attrs: PrescriptionAttrs) -> Result<Self> {
        const ENTITY: &str = "PrescriptionOrder";
        check_coded_triplet(
            ENTITY,
            "drug",
            &attrs.drug_code,
            &attrs.drug_name,
            &attrs.drug_code_system,
            230,
        )?;
        attrs.minimum_dose.validate(ENTITY)?;
        match (&attrs.minimum_dose, &attrs.dose_unit) {
            (MinimumDose::Undefined, DoseUnit::Undefined) => {}
            (MinimumDose::Undefined, DoseUnit::Coded { code, .. }) => {
                return Err(ModelError::invalid(
                    ENTITY,
                    "dose_unit",
                    code.as_str(),
                    "must be undefined when the minimum dose is undefined",
                ));
            }
            (MinimumDose::Amount(dose), DoseUnit::Undefined) => {
                return Err(ModelError::invalid(
                    ENTITY,
                    "dose_unit",
                    dose.as_str(),
                    "must be coded when a minimum dose amount is given",
                ));
            }
            (MinimumDose::Amount(_), DoseUnit::Coded { .. }) => {}
        }
        if !attrs.dosage_form_code.is_empty()
            && !tables::contains(MERIT_9_3_DOSAGE_FORM, &attrs.dosage_form_code)
        {
            return Err(ModelError::invalid(
                ENTITY,
                "dosage_form_code",
                &attrs.dosage_form_code,
                "must be one of MERIT-9 表3",
            ));
        }
        if attrs.dispense_amount.is_empty()
            || attrs.dispense_amount.len() > 20
            || !attrs.dispense_amount.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ModelError::invalid(
                ENTITY,
                "dispense_amount",
                &attrs.dispense_amount,
                "must be digits, 1-20 characters",
            ));
        }
        if !matches!(attrs.dispense_unit, DoseUnit::Coded { .. }) {
            return Err(ModelError::invalid(
                ENTITY,
                "dispense_unit",
                "",
                "must be a coded unit",
            ));
        }
        if attrs.prescription_number.is_empty() || attrs.prescription_number.len() > 20 {
            return Err(ModelError::invalid(
                ENTITY,
                "prescription_number",
                &attrs.prescription_number,
                "must be non-empty, at most 20 characters",
            ));
        }
        check_repeat_pattern(
            ENTITY,
            &attrs.repeat_pattern_code,
            &attrs.repeat_pattern_name,
            &attrs.repeat_pattern_code_system,
        )?;
        check_optional_digits(ENTITY, "duration_in_days", &attrs.duration_in_days, 18)?;
        check_optional_digits(ENTITY, "total_occurrences", &attrs.total_occurrences, 10)?;
        if !tables::contains(UDT_0162_ROUTE, &attrs.route_code) {
            return Err(ModelError::invalid(
                ENTITY,
                "route_code",
                &attrs.route_code,
                "must be one of user table 0162",
            ));
        }
        check_counter(ENTITY, "recipe_number", &attrs.recipe_number, 2)?;
        check_counter(ENTITY, "order_admin_number", &attrs.order_admin_number, 3)?;

        Ok(Self {
            drug_code: attrs.drug_code,
            drug_name: attrs.drug_name,
            drug_code_system: attrs.drug_code_system,
            minimum_dose: attrs.minimum_dose,
            dose_unit: attrs.dose_unit,
            dosage_form_code: attrs.dosage_form_code,
            dispense_amount: attrs.dispense_amount,
            dispense_unit: attrs.dispense_unit,
            prescription_number: attrs.prescription_number,
            repeat_pattern_code: attrs.repeat_pattern_code,
            repeat_pattern_name: attrs.repeat_pattern_name,
            repeat_pattern_code_system: attrs.repeat_pattern_code_system,
            duration_in_days: attrs.duration_in_days,
            start_time: Hl7Timestamp::parse_opt(&attrs.start_time)?,
            end_time: Hl7Timestamp::parse_opt(&attrs.end_time)?,
            total_occurrences: attrs.total_occurrences,
            route_code: attrs.route_code,
            recipe_number: attrs.recipe_number,
            order_admin_number: attrs.order_admin_number,
            common: attrs.common,
        })
    }
}

/// One component of an injection mixture (RXC).
#[derive(Debug, Clone)]
pub struct InjectionComponent {
    pub kind: ComponentKind,
    pub code: String,
    pub name: String,
    pub code_system: String,
    pub quantity: String,
    pub unit_code: String,
    pub unit_name: String,
    pub unit_code_system: String,
}

impl InjectionComponent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ComponentKind,
        code: &str,
        name: &str,
        code_system: &str,
        quantity: &str,
        unit_code: &str,
        unit_name: &str,
        unit_code_system: &str,
    ) -> Result<Self> {
        const ENTITY: &str = "InjectionComponent";
        check_coded_triplet(ENTITY, "component", code, name, code_system, 240)?;
        if quantity.is_empty() || quantity.len() >= 20 || !quantity.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ModelError::invalid(
                ENTITY,
                "quantity",
                quantity,
                "must be digits, shorter than 20 characters",
            ));
        }
        for (attribute, value) in [
            ("unit_code", unit_code),
            ("unit_name", unit_name),
            ("unit_code_system", unit_code_system),
        ] {
            if value.is_empty() {
                return Err(ModelError::invalid(ENTITY, attribute, value, "must not be empty"));
            }
        }
        Ok(Self {
            kind,
            code: code.to_string(),
            name: name.to_string(),
            code_system: code_system.to_string(),
            quantity: quantity.to_string(),
            unit_code: unit_code.to_string(),
            unit_name: unit_name.to_string(),
            unit_code_system: unit_code_system.to_string(),
        })
    }
}

/// One injection order (one RXE/RXC cluster of an RDE^O11).
#[derive(Debug, Clone)]
pub struct InjectionOrder {
    pub injection_type_code: String,
    pub injection_type_name: String,
    pub injection_type_code_system: String,
    pub minimum_dose: MinimumDose,
    pub dose_unit: DoseUnit,
    pub dispense_amount: String,
    pub dispense_unit: Option<DoseUnit>,
    pub prescription_number: String,
    pub start_time: Option<Hl7Timestamp>,
    pub end_time: Option<Hl7Timestamp>,
    pub total_occurrences: String,
    pub route_code: String,
    pub route_device_code: String,
    pub components: Vec<InjectionComponent>,
    pub recipe_number: String,
    pub order_admin_number: String,
    pub common: OrderCommon,
}

/// Constructor attributes for [`InjectionOrder`].
#[derive(Debug, Clone)]
pub struct InjectionAttrs {
    pub injection_type_code: String,
    pub minimum_dose: MinimumDose,
    pub dose_unit: DoseUnit,
    pub dispense_amount: String,
    pub dispense_unit: Option<DoseUnit>,
    pub prescription_number: String,
    pub start_time: String,
    pub end_time: String,
    pub total_occurrences: String,
    pub route_code: String,
    pub route_device_code: String,
    pub components: Vec<InjectionComponent>,
    pub recipe_number: String,
    pub order_admin_number: String,
    pub common: OrderCommon,
}

impl InjectionOrder {
    pub fn new(attrs: InjectionAttrs) -> Result<Self> {
        const ENTITY: &str = "InjectionOrder";
        let injection_type_name = tables::lookup(JHSI_0002_INJECTION, &attrs.injection_type_code)
            .ok_or_else(|| {
                ModelError::invalid(
                    ENTITY,
                    "injection_type_code",
                    &attrs.injection_type_code,
                    "must be one of JHSI0002",
                )
            })?;
        attrs.minimum_dose.validate(ENTITY)?;
        if matches!(attrs.minimum_dose, MinimumDose::Undefined) {
            return Err(ModelError::invalid(
                ENTITY,
                "minimum_dose",
                "\"\"",
                "injection orders carry the administered volume",
            ));
        }
        if !matches!(attrs.dose_unit, DoseUnit::Coded { .. }) {
            return Err(ModelError::invalid(
                ENTITY,
                "dose_unit",
                "",
                "must be a coded unit",
            ));
        }
        match (attrs.dispense_amount.is_empty(), &attrs.dispense_unit) {
            (true, Some(_)) => {
                return Err(ModelError::invalid(
                    ENTITY,
                    "dispense_unit",
                    "",
                    "must be absent when no dispense amount is given",
                ));
            }
            (false, None) => {
                return Err(ModelError::invalid(
                    ENTITY,
                    "dispense_unit",
                    &attrs.dispense_amount,
                    "must be coded when a dispense amount is given",
                ));
            }
            _ => {}
        }
        if !attrs.dispense_amount.is_empty()
            && (attrs.dispense_amount.len() > 20
                || !attrs.dispense_amount.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(ModelError::invalid(
                ENTITY,
                "dispense_amount",
                &attrs.dispense_amount,
                "must be digits, 1-20 characters",
            ));
        }
        if attrs.prescription_number.is_empty() || attrs.prescription_number.len() > 20 {
            return Err(ModelError::invalid(
                ENTITY,
                "prescription_number",
                &attrs.prescription_number,
                "must be non-empty, at most 20 characters",
            ));
        }
        check_optional_digits(ENTITY, "total_occurrences", &attrs.total_occurrences, 10)?;
        if !tables::contains(UDT_0162_ROUTE, &attrs.route_code) {
            return Err(ModelError::invalid(
                ENTITY,
                "route_code",
                &attrs.route_code,
                "must be one of user table 0162",
            ));
        }
        if !attrs.route_device_code.is_empty()
            && !tables::contains(UDT_0164_DEVICE, &attrs.route_device_code)
        {
            return Err(ModelError::invalid(
                ENTITY,
                "route_device_code",
                &attrs.route_device_code,
                "must be one of user table 0164",
            ));
        }
        check_counter(ENTITY, "recipe_number", &attrs.recipe_number, 2)?;
        check_counter(ENTITY, "order_admin_number", &attrs.order_admin_number, 3)?;

        Ok(Self {
            injection_type_code: attrs.injection_type_code,
            injection_type_name: injection_type_name.to_string(),
            injection_type_code_system: "99I02".to_string(),
            minimum_dose: attrs.minimum_dose,
            dose_unit: attrs.dose_unit,
            dispense_amount: attrs.dispense_amount,
            dispense_unit: attrs.dispense_unit,
            prescription_number: attrs.prescription_number,
            start_time: Hl7Timestamp::parse_opt(&attrs.start_time)?,
            end_time: Hl7Timestamp::parse_opt(&attrs.end_time)?,
            total_occurrences: attrs.total_occurrences,
            route_code: attrs.route_code,
            route_device_code: attrs.route_device_code,
            components: attrs.components,
            recipe_number: attrs.recipe_number,
            order_admin_number: attrs.order_admin_number,
            common: attrs.common,
        })
    }
}

fn check_coded_triplet(
    entity: &'static str,
    attribute: &'static str,
    code: &str,
    name: &str,
    system: &str,
    max: usize,
) -> Result<()> {
    if code.is_empty() || system.is_empty() {
        return Err(ModelError::invalid(
            entity,
            attribute,
            code,
            "code and code system must not be empty",
        ));
    }
    let combined = code.chars().count() + name.chars().count() + system.chars().count();
    if combined >= max {
        return Err(ModelError::invalid(
            entity,
            attribute,
            format!("{combined} chars"),
            format!("code, name and system combined must be shorter than {max} characters"),
        ));
    }
    Ok(())
}

fn check_repeat_pattern(entity: &'static str, code: &str, name: &str, system: &str) -> Result<()> {
    let combined = code.chars().count() + name.chars().count() + system.chars().count();
    if combined >= 520 {
        return Err(ModelError::invalid(
            entity,
            "repeat_pattern",
            format!("{combined} chars"),
            "repeat pattern parts combined must be shorter than 520 characters",
        ));
    }
    Ok(())
}

fn check_optional_digits(
    entity: &'static str,
    attribute: &'static str,
    value: &str,
    max: usize,
) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    if value.len() > max || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ModelError::invalid(
            entity,
            attribute,
            value,
            format!("must be digits, at most {max} characters"),
        ));
    }
    Ok(())
}
