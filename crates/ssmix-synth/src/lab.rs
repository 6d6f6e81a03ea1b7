//! Lab result typing and specimen grouping helpers.

use std::collections::BTreeMap;

use ssmix_model::{LabResult, LabResultAttrs, ModelError};
use ssmix_standards::jlac10;

/// Builds one observation from a source row. The value type is numeric
/// when the value parses as a number, string otherwise; units use a local
/// code system.
pub fn synth_lab_result(
    jlac10_code: &str,
    observation_name: &str,
    value: &str,
    unit: &str,
) -> Result<LabResult, ModelError> {
    let value_type = if value.trim().parse::<f64>().is_ok() {
        "NM"
    } else {
        "ST"
    };
    let well_formed = jlac10_code.len() == 17 && jlac10_code.is_ascii();
    LabResult::new(LabResultAttrs {
        value_type: value_type.to_string(),
        observation_code: if jlac10_code.is_empty() {
            "99999999999999999".to_string()
        } else {
            jlac10_code.to_string()
        },
        observation_name: observation_name.to_string(),
        observation_code_system: if well_formed { "JC10" } else { "99XYZ" }.to_string(),
        observation_value: value.to_string(),
        unit: unit.to_string(),
        unit_code: unit.to_string(),
        unit_code_system: if unit.is_empty() { "" } else { "99XYZ" }.to_string(),
        status: "F".to_string(),
        ..LabResultAttrs::default()
    })
}

/// The specimen material for a JLAC10 code (falls back to その他の検体).
pub fn specimen_code_of(jlac10_code: &str) -> &str {
    jlac10::specimen_of(jlac10_code)
}

/// Specimen display name and code system.
pub fn specimen_naming(specimen_code: &str) -> (&'static str, &'static str) {
    match jlac10::specimen_name(specimen_code) {
        Some(name) => (name, "JC10"),
        None => ("不明な検体", "99XYZ"),
    }
}

/// The dominant test category across a specimen's observations: the most
/// frequent leading JLAC10 character, falling back to その他.
pub fn dominant_test_type(results: &[LabResult]) -> (String, &'static str, &'static str) {
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for result in results {
        if let Some(first) = result.observation_code.chars().next() {
            *counts.entry(first).or_default() += 1;
        }
    }
    let leading = counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(ch, _)| ch.to_string());
    if let Some(code) = leading {
        if let Some(name) = jlac10::test_type_name(&code) {
            return (code, name, "JC10");
        }
    }
    (
        jlac10::DEFAULT_TEST_TYPE.to_string(),
        jlac10::test_type_name(jlac10::DEFAULT_TEST_TYPE).unwrap_or("その他の検体検査"),
        "JC10",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values_are_nm() {
        let result = synth_lab_result("3A016000002327102", "A/G比", "1.7", "").unwrap();
        assert_eq!(result.value_type, "NM");
        let result = synth_lab_result("3A016000002327102", "コメント", "陰性", "").unwrap();
        assert_eq!(result.value_type, "ST");
    }

    #[test]
    fn specimen_falls_back_to_other() {
        assert_eq!(specimen_code_of("short"), "990");
        assert_eq!(specimen_naming("990").0, "その他の検体");
        assert_eq!(specimen_naming("023"), ("血清", "JC10"));
    }

    #[test]
    fn dominant_type_uses_most_frequent_leading_character() {
        let a = synth_lab_result("3A016000002327102", "A/G比", "1.7", "").unwrap();
        let b = synth_lab_result("3A010000002327101", "総蛋白", "7.2", "g/dl").unwrap();
        let c = synth_lab_result("2A990000001930102", "白血球数", "6500", "/ul").unwrap();
        let (code, name, system) = dominant_test_type(&[a, b, c]);
        assert_eq!(code, "3");
        assert_eq!(name, "生化学的検査");
        assert_eq!(system, "JC10");
    }
}
