//! JLAC10 derived vocabularies.
//!
//! A 17-character JLAC10 code embeds the specimen material in characters
//! 9..12 and opens with the test-category digit; both are used when a lab
//! order is grouped into specimens and typed for OBR-4.

use crate::tables::lookup;

/// JLAC10 specimen material codes (材料コード, 3 digits).
pub const SPECIMENS: &[(&str, &str)] = &[
    ("001", "全血"),
    ("002", "血漿"),
    ("023", "血清"),
    ("041", "尿"),
    ("051", "糞便"),
    ("062", "髄液"),
    ("075", "胸水"),
    ("076", "腹水"),
    ("081", "喀痰"),
    ("990", "その他の検体"),
];

/// Test categories keyed by the leading character of the analyte code.
pub const TEST_TYPES: &[(&str, &str)] = &[
    ("1", "一般検査"),
    ("2", "血液学的検査"),
    ("3", "生化学的検査"),
    ("4", "内分泌学的検査"),
    ("5", "免疫学的検査"),
    ("6", "微生物学的検査"),
    ("7", "病理学的検査"),
    ("8", "その他の検体検査"),
    ("9", "生理機能検査"),
];

/// Fallback specimen code when a JLAC10 code is absent or malformed.
pub const DEFAULT_SPECIMEN: &str = "990";

/// Fallback test category.
pub const DEFAULT_TEST_TYPE: &str = "8";

/// The specimen material embedded in a 17-character JLAC10 code, or the
/// default when the code is not well-formed.
pub fn specimen_of(jlac10: &str) -> &str {
    if jlac10.len() == 17 && jlac10.is_ascii() {
        &jlac10[9..12]
    } else {
        DEFAULT_SPECIMEN
    }
}

/// Display name for a specimen code, if it is a JLAC10 material.
pub fn specimen_name(code: &str) -> Option<&'static str> {
    lookup(SPECIMENS, code)
}

/// Display name for a test category digit.
pub fn test_type_name(code: &str) -> Option<&'static str> {
    lookup(TEST_TYPES, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_specimen_from_well_formed_code() {
        assert_eq!(specimen_of("3A016000002327102"), "023");
    }

    #[test]
    fn malformed_code_falls_back_to_other() {
        assert_eq!(specimen_of("short"), DEFAULT_SPECIMEN);
        assert_eq!(specimen_of(""), DEFAULT_SPECIMEN);
    }

    #[test]
    fn serum_is_named() {
        assert_eq!(specimen_name("023"), Some("血清"));
    }
}
