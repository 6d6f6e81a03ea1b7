//! Dose unit, dosage form and route inference from drug names.
//!
//! Source rows carry only a HOT code and the drug's display name, so the
//! pharmaceutical attributes are inferred from name keywords. Ointments
//! and similar drugs have no definable dose unit; their minimum dose is
//! the undefined value, which the encoder renders as the HL7 null.

use rand::seq::SliceRandom;
use rand::Rng;

use ssmix_model::{ComponentKind, DoseUnit, MinimumDose};

use crate::seed::SynthRng;

/// Inferred RXE attributes for one prescribed drug.
#[derive(Debug, Clone)]
pub struct PrescriptionProfile {
    pub minimum_dose: MinimumDose,
    pub dose_unit: DoseUnit,
    pub dosage_form_code: &'static str,
    pub route_code: &'static str,
}

/// Keyword → (form, MERIT-9 unit or None for undefined, route).
/// First match wins; order goes from specific to generic.
const FORM_RULES: &[(&[&str], &'static str, Option<&'static str>, &'static str)] = &[
    (&["軟膏", "膏"], "OIT", None, "TP"),
    (&["クリーム"], "CRM", Some("HON"), "TP"),
    (&["貼付", "パッチ", "テープ"], "PAT", Some("MAI"), "TD"),
    (&["坐剤", "坐薬", "坐"], "SUP", Some("KO"), "PR"),
    (&["点眼"], "OPH", Some("HON"), "OP"),
    (&["点鼻"], "LQD", Some("HON"), "NS"),
    (&["点耳"], "LQD", Some("HON"), "OT"),
    (&["吸入"], "INH", Some("KIT"), "IH"),
    (&["シロップ"], "SYR", Some("DOSE"), "PO"),
    (&["錠"], "TAB", Some("TAB"), "PO"),
    (&["カプセル", "Cap", "cap"], "CAP", Some("CAP"), "PO"),
    (&["散", "原末", "粉末", "顆粒"], "PWD", Some("PCK"), "PO"),
    (&["うがい液"], "LQD", Some("HON"), "PO"),
    (&["液"], "LQD", Some("HON"), "PO"),
];

/// Infers the dose/form/route profile for a prescription drug name.
pub fn prescription_profile(drug_name: &str) -> PrescriptionProfile {
    for &(keywords, form, unit, route) in FORM_RULES {
        if keywords.iter().any(|kw| drug_name.contains(kw)) {
            return match unit {
                None => PrescriptionProfile {
                    minimum_dose: MinimumDose::Undefined,
                    dose_unit: DoseUnit::Undefined,
                    dosage_form_code: form,
                    route_code: route,
                },
                Some(unit_code) => PrescriptionProfile {
                    minimum_dose: MinimumDose::Amount("1".to_string()),
                    dose_unit: DoseUnit::merit(unit_code).expect("unit codes come from the table"),
                    dosage_form_code: form,
                    route_code: route,
                },
            };
        }
    }
    // Unrecognized names fall back to per-dose packaging by mouth.
    PrescriptionProfile {
        minimum_dose: MinimumDose::Amount("1".to_string()),
        dose_unit: DoseUnit::merit("DOSE").expect("DOSE is in the table"),
        dosage_form_code: "",
        route_code: "OTH",
    }
}

/// Repeat patterns drawn for prescriptions: (code, name, system).
pub const REPEAT_PATTERNS: &[(&str, &str, &str)] = &[
    ("1013044400000000", "内服・経口・１日３回朝昼夕食後", "JAMISDP01"),
    ("1012040400000000", "内服・経口・１日２回朝夕食後", "JAMISDP01"),
];

/// Draws a repeat pattern for one prescription.
pub fn pick_repeat_pattern(rng: &mut SynthRng) -> (&'static str, &'static str, &'static str) {
    REPEAT_PATTERNS
        .choose(rng)
        .copied()
        .unwrap_or(REPEAT_PATTERNS[0])
}

/// Prescription duration: long refills for inpatients, up to a week
/// otherwise.
pub fn pick_duration_days(rng: &mut SynthRng, admitted: bool) -> String {
    if admitted {
        ["7", "30", "60", "90"]
            .choose(rng)
            .copied()
            .unwrap_or("7")
            .to_string()
    } else {
        rng.gen_range(1..=7).to_string()
    }
}

/// Solution-name keywords marking the base (carrier) of an infusion.
const BASE_KEYWORDS: &[&str] = &[
    "生食",
    "生理食塩",
    "ブドウ糖",
    "注射用水",
    "蒸留水",
    "ソリタ",
    "ラクトリンゲル",
    "リンゲル",
    "ハルトマン",
    "ヴィーン",
    "ソルデム",
    "ラクテック",
    "ソルラクト",
    "フィジオ",
    "ビーフリード",
    "エルネオパ",
    "ハイカリック",
    "マルトス",
    "糖液",
    "糖注",
    "ボルベン",
    "デキストラン",
];

/// Classifies an injection component as base solution or additive.
pub fn injection_component_kind(component_name: &str) -> ComponentKind {
    if BASE_KEYWORDS.iter().any(|kw| component_name.contains(kw)) {
        ComponentKind::Base
    } else {
        ComponentKind::Additive
    }
}

/// Quantity and unit for one component: carriers in ml, additives in mg.
pub fn component_quantity(rng: &mut SynthRng, kind: ComponentKind) -> (&'static str, &'static str) {
    match kind {
        ComponentKind::Base => (
            ["100", "500", "1000", "1500", "2000"]
                .choose(rng)
                .copied()
                .unwrap_or("500"),
            "ml",
        ),
        ComponentKind::Additive => (
            ["10", "120", "240", "360"].choose(rng).copied().unwrap_or("120"),
            "mg",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ointment_has_undefined_dose() {
        let profile = prescription_profile("白色ワセリン軟膏");
        assert_eq!(profile.minimum_dose, MinimumDose::Undefined);
        assert_eq!(profile.dose_unit, DoseUnit::Undefined);
        assert_eq!(profile.dosage_form_code, "OIT");
        assert_eq!(profile.route_code, "TP");
    }

    #[test]
    fn tablet_resolves_to_tab_by_mouth() {
        let profile = prescription_profile("ダーゼン錠（５mg)");
        assert_eq!(profile.minimum_dose, MinimumDose::Amount("1".into()));
        assert_eq!(profile.dosage_form_code, "TAB");
        assert_eq!(profile.route_code, "PO");
    }

    #[test]
    fn unknown_names_fall_back_to_dose_packaging() {
        let profile = prescription_profile("謎の薬");
        assert_eq!(profile.dosage_form_code, "");
        assert_eq!(profile.route_code, "OTH");
    }

    #[test]
    fn saline_is_a_base_component() {
        assert_eq!(injection_component_kind("生理食塩液"), ComponentKind::Base);
        assert_eq!(
            injection_component_kind("アドナ注（静脈用）50mg"),
            ComponentKind::Additive
        );
    }
}
