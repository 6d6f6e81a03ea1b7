//! Order segments: ORC, RXE, TQ1, RXR, RXC.

use ssmix_hl7::{escape, join_subcomponents, FieldValue, Segment};
use ssmix_model::{
    Admission, DoseUnit, Hl7Timestamp, Hospital, InjectionComponent, MinimumDose, OrderCommon,
    Precision,
};
use ssmix_standards::tables::{
    self, H7T_0482_ORDER_TYPE, MERIT_9_3_DOSAGE_FORM, UDT_0069_DEPARTMENT, UDT_0162_ROUTE,
    UDT_0164_DEVICE,
};

use crate::common::{bed_location, clinic_location, coded_element, second, staff_xcn};
use crate::error::{Result, SegmentError};

/// ORC — common order.
///
/// Example:
/// `ORC|NW|000000011000185||1|||||20110701103045|058^入力者^花子^...||110^医師^一郎^...|...|O^外来患者オーダ^HL70482`
pub fn orc(common: &OrderCommon, hospital: &Hospital) -> Result<Segment> {
    let department = if common.requester.department_code.is_empty() {
        String::new()
    } else {
        let name = tables::lookup(UDT_0069_DEPARTMENT, &common.requester.department_code)
            .ok_or_else(|| {
                SegmentError::invalid(
                    "ORC",
                    "17",
                    &common.requester.department_code,
                    "must be one of user table 0069",
                )
            })?;
        coded_element(&common.requester.department_code, name, "HL70069")
    };
    let order_type = tables::lookup(H7T_0482_ORDER_TYPE, common.class.as_str())
        .map(|name| coded_element(common.class.as_str(), name, "HL70482"))
        .unwrap_or_default();
    let hospital_address = format!(
        "^^^^{}^JPN^^{}",
        escape(&hospital.postal_code),
        escape(&hospital.address)
    );

    let mut seg = Segment::new("ORC")?;
    seg.push(common.order_control.as_str()) // ORC-1
        .push(common.requester_order_number.as_str()) // ORC-2
        .push(common.filler_order_number.as_str()) // ORC-3
        .push(common.group_number.as_str()) // ORC-4
        .push(common.order_status.as_str()) // ORC-5
        .push_empty(3)
        .push(second(common.transaction_time.as_ref())) // ORC-9
        .push(FieldValue::composed(staff_xcn(&common.enterer))) // ORC-10
        .push_empty(1)
        .push(FieldValue::composed(staff_xcn(&common.requester))) // ORC-12
        .push_empty(2)
        .push(second(common.effective_time.as_ref())) // ORC-15
        .push_empty(1)
        .push(FieldValue::composed(department)) // ORC-17
        .push_empty(3)
        .push(hospital.name.as_str()) // ORC-21
        .push(FieldValue::composed(hospital_address)) // ORC-22
        .push(hospital.phone.as_str()) // ORC-23
        .push_empty(5)
        .push(FieldValue::composed(order_type)); // ORC-29
    Ok(seg)
}

fn dose_unit_field(unit: &DoseUnit) -> FieldValue {
    match unit {
        DoseUnit::Undefined => FieldValue::Null,
        DoseUnit::Coded { code, name, system } => {
            FieldValue::composed(coded_element(code, name, system))
        }
    }
}

fn minimum_dose_field(dose: &MinimumDose) -> FieldValue {
    match dose {
        MinimumDose::Undefined => FieldValue::Null,
        MinimumDose::Amount(amount) => FieldValue::datum(amount),
    }
}

/// Arguments for [`rxe`].
#[derive(Debug, Clone)]
pub struct RxeArgs<'a> {
    pub drug_code: &'a str,
    pub drug_name: &'a str,
    pub drug_code_system: &'a str,
    pub minimum_dose: &'a MinimumDose,
    pub dose_unit: &'a DoseUnit,
    /// MERIT-9 表3 code, resolved to `code^name^MR9P`; empty allowed.
    pub dosage_form_code: &'a str,
    pub dispense_amount: &'a str,
    pub dispense_unit: Option<&'a DoseUnit>,
    pub prescription_number: &'a str,
    /// RXE-19; unit subcomponents are taken from the dispense unit.
    pub total_daily_dose: &'a str,
    /// RXE-42 delivery: the bed for inpatients, the clinic otherwise.
    pub admission: Option<&'a Admission>,
    pub department_code: &'a str,
}

/// RXE — pharmacy encoded order.
///
/// Example:
/// `RXE||100607002^アレピアチン１０倍散^HOT9|50||MG^ミリグラム^MR9P|PWD^散剤^MR9P||||1400|MG^ミリグラム^MR9P||||2011070112345||||100^MG&ミリグラム&MR9P`
pub fn rxe(args: RxeArgs<'_>) -> Result<Segment> {
    let dosage_form = if args.dosage_form_code.is_empty() {
        String::new()
    } else {
        let name = tables::lookup(MERIT_9_3_DOSAGE_FORM, args.dosage_form_code).ok_or_else(|| {
            SegmentError::invalid(
                "RXE",
                "6",
                args.dosage_form_code,
                "must be one of MERIT-9 表3",
            )
        })?;
        coded_element(args.dosage_form_code, name, "MR9P")
    };
    let dispense_unit = args.dispense_unit.map(dose_unit_field).unwrap_or_default();
    let total_daily_dose = if args.total_daily_dose.is_empty() {
        FieldValue::Empty
    } else {
        match args.dispense_unit {
            Some(DoseUnit::Coded { code, name, system }) => FieldValue::composed(format!(
                "{}^{}",
                escape(args.total_daily_dose),
                join_subcomponents(&[escape(code), escape(name), escape(system)])
            )),
            _ => FieldValue::datum(args.total_daily_dose),
        }
    };
    let delivery = match args.admission {
        Some(admission) => {
            bed_location(&admission.ward_code, &admission.room_code, &admission.bed_code)
        }
        None => clinic_location(args.department_code),
    };

    let mut seg = Segment::new("RXE")?;
    seg.push_empty(1)
        .push(FieldValue::composed(coded_element(
            args.drug_code,
            args.drug_name,
            args.drug_code_system,
        ))) // RXE-2
        .push(minimum_dose_field(args.minimum_dose)) // RXE-3
        .push_empty(1)
        .push(dose_unit_field(args.dose_unit)) // RXE-5
        .push(FieldValue::composed(dosage_form)) // RXE-6
        .push_empty(3)
        .push(args.dispense_amount) // RXE-10
        .push(dispense_unit) // RXE-11
        .push_empty(3)
        .push(args.prescription_number) // RXE-15
        .push_empty(3)
        .push(total_daily_dose) // RXE-19
        .push_empty(22)
        .push(FieldValue::composed(delivery)); // RXE-42
    Ok(seg)
}

/// Arguments for [`tq1`].
#[derive(Debug, Clone, Default)]
pub struct Tq1Args<'a> {
    pub sequence_no: usize,
    pub amount: &'a str,
    pub repeat_pattern_code: &'a str,
    pub repeat_pattern_name: &'a str,
    pub repeat_pattern_code_system: &'a str,
    pub duration: &'a str,
    pub duration_unit: &'a str,
    pub start_time: Option<&'a Hl7Timestamp>,
    pub end_time: Option<&'a Hl7Timestamp>,
    pub total_occurrences: &'a str,
}

/// TQ1 — timing/quantity.
///
/// Example: `TQ1|1||1013044400000000&内服・経口・１日３回朝昼夕食後&JAMISDP01|||5^d|2011070100`
pub fn tq1(args: Tq1Args<'_>) -> Result<Segment> {
    let repeat = if args.repeat_pattern_code.is_empty()
        && args.repeat_pattern_name.is_empty()
        && args.repeat_pattern_code_system.is_empty()
    {
        String::new()
    } else {
        join_subcomponents(&[
            escape(args.repeat_pattern_code),
            escape(args.repeat_pattern_name),
            escape(args.repeat_pattern_code_system),
        ])
    };
    let duration = match (args.duration.is_empty(), args.duration_unit.is_empty()) {
        (true, true) => String::new(),
        (false, false) => {
            if !args.duration.chars().all(|c| c.is_ascii_digit()) {
                return Err(SegmentError::invalid(
                    "TQ1",
                    "6",
                    args.duration,
                    "duration must be digits",
                ));
            }
            format!("{}^{}", escape(args.duration), escape(args.duration_unit))
        }
        _ => {
            return Err(SegmentError::invalid(
                "TQ1",
                "6",
                args.duration,
                "duration and its unit travel together",
            ));
        }
    };

    let mut seg = Segment::new("TQ1")?;
    seg.push(args.sequence_no.to_string())
        .push(args.amount)
        .push(FieldValue::composed(repeat)) // TQ1-3
        .push_empty(2)
        .push(FieldValue::composed(duration)) // TQ1-6
        .push(
            args.start_time
                .map(|t| t.format(Precision::Minute))
                .unwrap_or_default(),
        ) // TQ1-7
        .push(
            args.end_time
                .map(|t| t.format(Precision::Minute))
                .unwrap_or_default(),
        ) // TQ1-8
        .push_empty(5)
        .push(args.total_occurrences); // TQ1-14
    Ok(seg)
}

/// RXR — route.
///
/// Example: `RXR|PO^口^HL70162` / `RXR|IV^静脈内^HL70162||IVP^点滴ポンプ^HL70164`
pub fn rxr(route_code: &str, route_device_code: &str) -> Result<Segment> {
    let route = if route_code.is_empty() {
        String::new()
    } else {
        let name = tables::lookup(UDT_0162_ROUTE, route_code).ok_or_else(|| {
            SegmentError::invalid("RXR", "1", route_code, "must be one of user table 0162")
        })?;
        coded_element(route_code, name, "HL70162")
    };
    let device = if route_device_code.is_empty() {
        String::new()
    } else {
        let name = tables::lookup(UDT_0164_DEVICE, route_device_code).ok_or_else(|| {
            SegmentError::invalid("RXR", "3", route_device_code, "must be one of user table 0164")
        })?;
        coded_element(route_device_code, name, "HL70164")
    };

    let mut seg = Segment::new("RXR")?;
    seg.push(FieldValue::composed(route))
        .push_empty(1)
        .push(FieldValue::composed(device));
    Ok(seg)
}

/// RXC — infusion component.
///
/// Example: `RXC|B|620007329^ソリタ－Ｔ３号輸液５００ｍＬ^HOT9|1|HON^本^MR9P`
pub fn rxc(component: &InjectionComponent) -> Result<Segment> {
    let mut seg = Segment::new("RXC")?;
    seg.push(component.kind.as_str())
        .push(FieldValue::composed(coded_element(
            &component.code,
            &component.name,
            &component.code_system,
        )))
        .push(component.quantity.as_str())
        .push(FieldValue::composed(coded_element(
            &component.unit_code,
            &component.unit_name,
            &component.unit_code_system,
        )));
    Ok(seg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssmix_model::{ComponentKind, OrderClass, Physician};

    fn physician() -> Physician {
        Physician::new("110", "仮医師", "カリイシ", "一郎", "イチロウ", "01").unwrap()
    }

    fn common() -> OrderCommon {
        OrderCommon::new(
            "NW",
            "11000185",
            "",
            "1",
            "",
            "20110701103045",
            "",
            OrderClass::Outpatient,
            physician(),
            physician(),
        )
        .unwrap()
    }

    fn hospital() -> Hospital {
        Hospital::new("登呂病院", "422-8033", "静岡県静岡市駿河区登呂3-1-1", "054-284-9122")
            .unwrap()
    }

    #[test]
    fn orc_places_order_type_in_29() {
        let seg = orc(&common(), &hospital()).unwrap();
        assert_eq!(seg.field(1).unwrap().encoded(), "NW");
        assert_eq!(seg.field(2).unwrap().encoded(), "000000011000185");
        assert_eq!(seg.field(29).unwrap().encoded(), "O^外来患者オーダ^HL70482");
        assert!(seg.encode().contains("登呂病院"));
    }

    #[test]
    fn rxe_emits_null_literal_for_undefined_dose() {
        let seg = rxe(RxeArgs {
            drug_code: "999999",
            drug_name: "仮軟膏",
            drug_code_system: "99XYZ",
            minimum_dose: &MinimumDose::Undefined,
            dose_unit: &DoseUnit::Undefined,
            dosage_form_code: "OIT",
            dispense_amount: "1",
            dispense_unit: Some(&DoseUnit::merit("HON").unwrap()),
            prescription_number: "2011070112345",
            total_daily_dose: "",
            admission: None,
            department_code: "01",
        })
        .unwrap();
        assert!(seg.field(3).unwrap().is_null());
        assert!(seg.field(5).unwrap().is_null());
        assert!(seg.encode().starts_with("RXE||999999^仮軟膏^99XYZ|\"\"||\"\"|OIT^軟膏剤^MR9P"));
    }

    #[test]
    fn rxe_total_daily_dose_reuses_dispense_unit() {
        let unit = DoseUnit::merit("MG").unwrap();
        let seg = rxe(RxeArgs {
            drug_code: "100607002",
            drug_name: "アレピアチン１０倍散",
            drug_code_system: "HOT9",
            minimum_dose: &MinimumDose::Amount("50".into()),
            dose_unit: &unit,
            dosage_form_code: "PWD",
            dispense_amount: "1400",
            dispense_unit: Some(&unit),
            prescription_number: "2011070112345",
            total_daily_dose: "100",
            admission: None,
            department_code: "01",
        })
        .unwrap();
        assert_eq!(
            seg.field(19).unwrap().encoded(),
            "100^MG&ミリグラム&MR9P"
        );
    }

    #[test]
    fn tq1_duration_requires_unit() {
        let start = Hl7Timestamp::parse("2011070100").unwrap();
        let seg = tq1(Tq1Args {
            sequence_no: 1,
            repeat_pattern_code: "1013044400000000",
            repeat_pattern_name: "内服・経口・１日３回朝昼夕食後",
            repeat_pattern_code_system: "JAMISDP01",
            duration: "5",
            duration_unit: "d",
            start_time: Some(&start),
            ..Tq1Args::default()
        })
        .unwrap();
        assert_eq!(
            seg.encode(),
            "TQ1|1||1013044400000000&内服・経口・１日３回朝昼夕食後&JAMISDP01|||5^d|201107010000"
        );
        assert!(tq1(Tq1Args {
            sequence_no: 1,
            duration: "5",
            ..Tq1Args::default()
        })
        .is_err());
    }

    #[test]
    fn rxr_resolves_route_and_device_names() {
        let seg = rxr("IV", "IVP").unwrap();
        assert_eq!(seg.encode(), "RXR|IV^静脈内^HL70162||IVP^点滴ポンプ^HL70164");
        assert!(rxr("ZZ", "").is_err());
    }

    #[test]
    fn rxc_formats_base_component() {
        let component = InjectionComponent::new(
            ComponentKind::Base,
            "620007329",
            "ソリタ－Ｔ３号輸液５００ｍＬ",
            "HOT9",
            "1",
            "HON",
            "本",
            "MR9P",
        )
        .unwrap();
        let seg = rxc(&component).unwrap();
        assert_eq!(
            seg.encode(),
            "RXC|B|620007329^ソリタ－Ｔ３号輸液５００ｍＬ^HOT9|1|HON^本^MR9P"
        );
    }
}
