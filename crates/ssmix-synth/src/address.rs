//! Address and phone synthesis.

use rand::seq::SliceRandom;
use rand::Rng;

use ssmix_standards::postal::{prefecture_entries, prefectures, PostalEntry};

use crate::data::{BUILDING_NAMES, NEIGHBOR_PREFECTURES};
use crate::seed::SynthRng;

/// A synthesized address joined to the postal table.
#[derive(Debug, Clone)]
pub struct SynthAddress {
    pub address: String,
    pub postal_code: String,
}

/// Phone number with a non-assignable prefix.
pub fn synth_phone(rng: &mut SynthRng, prefix: &str) -> String {
    format!(
        "{prefix}-{}-{}",
        rng.gen_range(100..=999),
        rng.gen_range(1000..=9999)
    )
}

fn pick_entry(rng: &mut SynthRng, prefecture: Option<&str>) -> &'static PostalEntry {
    let prefs = prefectures();
    let prefecture = match prefecture {
        Some(p) if prefs.contains(&p) => p,
        Some(_) | None => prefs.choose(rng).copied().unwrap_or("東京都"),
    };
    let entries = prefecture_entries(prefecture);
    entries
        .choose(rng)
        .copied()
        .unwrap_or(&ssmix_standards::postal::POSTAL_TABLE[0])
}

/// Synthesizes an address. Prefecture, city and town come from one postal
/// table entry; the chōme is pinned to 99丁目 and an optional building
/// name carries the 仮 marker.
pub fn synth_address(
    rng: &mut SynthRng,
    prefecture: Option<&str>,
    add_building_name: bool,
) -> SynthAddress {
    let entry = pick_entry(rng, prefecture);
    let ban = rng.gen_range(1..=30);
    let gou = rng.gen_range(1..=20);
    let mut address = format!(
        "{}{}{}99丁目{}番{}号",
        entry.prefecture, entry.city, entry.town, ban, gou
    );
    if add_building_name {
        let building = BUILDING_NAMES.choose(rng).copied().unwrap_or(BUILDING_NAMES[0]);
        let number = rng.gen_range(101..=909);
        address.push_str(&format!(" 仮{building}{number}"));
    }
    SynthAddress {
        address,
        postal_code: entry.code.to_string(),
    }
}

/// The patient prefecture draw: 50% Tokyo, 25% a neighboring prefecture,
/// otherwise anywhere in the table.
pub fn patient_prefecture(rng: &mut SynthRng) -> Option<&'static str> {
    if rng.gen_bool(0.5) {
        Some("東京都")
    } else if rng.gen_bool(0.5) {
        NEIGHBOR_PREFECTURES.choose(rng).copied()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::patient_stream;
    use ssmix_standards::postal::{entry_for_code, postal_code_exists};

    #[test]
    fn phone_uses_prefix() {
        let mut rng = patient_stream(1, "p");
        let phone = synth_phone(&mut rng, "099");
        assert!(phone.starts_with("099-"));
    }

    #[test]
    fn address_joins_postal_table_down_to_town() {
        let mut rng = patient_stream(1, "p");
        for _ in 0..32 {
            let prefecture = patient_prefecture(&mut rng);
            let with_building = rng.gen_bool(0.5);
            let addr = synth_address(&mut rng, prefecture, with_building);
            assert!(postal_code_exists(&addr.postal_code));
            let entry = entry_for_code(&addr.postal_code).unwrap();
            assert!(addr.address.starts_with(entry.prefecture));
            assert!(addr.address.contains(entry.city));
            assert!(addr.address.contains(entry.town));
            assert!(addr.address.contains("99丁目"));
        }
    }

    #[test]
    fn building_names_carry_the_marker() {
        let mut rng = patient_stream(2, "p");
        let addr = synth_address(&mut rng, None, true);
        assert!(addr.address.contains(" 仮"));
    }
}
