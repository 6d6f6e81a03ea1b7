//! Composite data types shared across segment builders.

use ssmix_hl7::{escape, join_components, join_repetitions};
use ssmix_model::{Hl7Timestamp, Physician, Precision};

/// CE / CWE — `code^name^system`, empty when all parts are empty.
pub fn coded_element(code: &str, name: &str, system: &str) -> String {
    if code.is_empty() && name.is_empty() && system.is_empty() {
        return String::new();
    }
    join_components(&[escape(code), escape(name), escape(system)])
}

/// XCN for ordering and attending staff:
/// `id^family^given^^^^^^^L^^^^^I`.
pub fn staff_xcn(physician: &Physician) -> String {
    format!(
        "{}^{}^{}^^^^^^^L^^^^^I",
        escape(&physician.physician_id),
        escape(&physician.family_name),
        escape(&physician.given_name),
    )
}

/// XPN pair for patients and kin: ideographic and phonetic repetitions.
pub fn person_name(
    family: &str,
    given: &str,
    family_kana: &str,
    given_kana: &str,
) -> String {
    let ideographic = format!("{}^{}^^^^^L^I", escape(family), escape(given));
    let phonetic = format!("{}^{}^^^^^L^P", escape(family_kana), escape(given_kana));
    join_repetitions(&[ideographic, phonetic])
}

/// XAD home address: `^^^^postal^JPN^H^address`.
pub fn home_address(postal_code: &str, address: &str) -> String {
    format!("^^^^{}^JPN^H^{}", escape(postal_code), escape(address))
}

/// XTN phone with a use code (`PRN` home, `WPN` work).
pub fn phone(use_code: &str, number: &str) -> String {
    format!("^{use_code}^PH^^^^^^^^^{}", escape(number))
}

/// PL bed location for inpatients: `ward^room^bed^^^N`.
pub fn bed_location(ward: &str, room: &str, bed: &str) -> String {
    format!("{}^{}^{}^^^N", escape(ward), escape(room), escape(bed))
}

/// PL clinic location for outpatients: `department^^^^^C`.
pub fn clinic_location(department_code: &str) -> String {
    format!("{}^^^^^C", escape(department_code))
}

/// TS at day precision, empty for `None`.
pub fn day(ts: Option<&Hl7Timestamp>) -> String {
    ts.map(|t| t.format(Precision::Day)).unwrap_or_default()
}

/// TS at minute precision, empty for `None`.
pub fn minute(ts: Option<&Hl7Timestamp>) -> String {
    ts.map(|t| t.format(Precision::Minute)).unwrap_or_default()
}

/// TS at second precision, empty for `None`.
pub fn second(ts: Option<&Hl7Timestamp>) -> String {
    ts.map(|t| t.format(Precision::Second)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_element_collapses_when_empty() {
        assert_eq!(coded_element("", "", ""), "");
        assert_eq!(coded_element("PO", "口", "HL70162"), "PO^口^HL70162");
    }

    #[test]
    fn coded_element_escapes_data() {
        assert_eq!(coded_element("A|B", "", "99XYZ"), "A\\F\\B^^99XYZ");
    }

    #[test]
    fn person_name_has_ideographic_and_phonetic_repetitions() {
        let name = person_name("仮山田", "太郎", "カリヤマダ", "タロウ");
        assert_eq!(name, "仮山田^太郎^^^^^L^I~カリヤマダ^タロウ^^^^^L^P");
    }
}
