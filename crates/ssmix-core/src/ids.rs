//! Patient-id pool and per-patient counters.

use rand::seq::index::sample;

use ssmix_synth::SynthRng;

/// Draws a pool of 10-digit patient ids: unique 3-digit, 3-digit and
/// 4-digit level ids combined as a cube, so the bucketed storage tree
/// spreads evenly. The pool is assigned to source files in sorted order.
pub fn patient_id_pool(rng: &mut SynthRng, count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }
    let per_level = (count as f64).cbrt().ceil() as usize;
    let lv1: Vec<String> = sample(rng, 999, per_level.min(999))
        .into_iter()
        .map(|n| format!("{n:03}"))
        .collect();
    let lv2: Vec<String> = sample(rng, 999, per_level.min(999))
        .into_iter()
        .map(|n| format!("{n:03}"))
        .collect();
    let lv3: Vec<String> = sample(rng, 9999, per_level.min(9999))
        .into_iter()
        .map(|n| format!("{n:04}"))
        .collect();

    let mut pool = Vec::with_capacity(count);
    'outer: for a in &lv1 {
        for b in &lv2 {
            for c in &lv3 {
                pool.push(format!("{a}{b}{c}"));
                if pool.len() == count {
                    break 'outer;
                }
            }
        }
    }
    pool
}

/// Message control ids: the reversed patient id plus a counter, at most
/// 20 characters.
#[derive(Debug)]
pub struct MessageIdGen {
    base: String,
    next: u64,
}

impl MessageIdGen {
    pub fn new(patient_id: &str) -> Self {
        Self {
            base: patient_id.chars().rev().collect(),
            next: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.base, self.next);
        self.next += 1;
        id
    }
}

/// Order numbers: the reversed patient id plus a counter, zero-filled to
/// 15 digits; monotonically increasing within the patient.
#[derive(Debug)]
pub struct OrderNumberGen {
    base: String,
    next: u64,
}

impl OrderNumberGen {
    pub fn new(patient_id: &str) -> Self {
        Self {
            base: patient_id.chars().rev().collect(),
            next: 0,
        }
    }

    pub fn next_number(&mut self) -> String {
        let number = format!("{:0>15}", format!("{}{}", self.base, self.next));
        self.next += 1;
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssmix_synth::patient_stream;

    #[test]
    fn pool_yields_unique_ten_digit_ids() {
        let mut rng = patient_stream(42, "patient-id-pool");
        let pool = patient_id_pool(&mut rng, 100);
        assert_eq!(pool.len(), 100);
        let mut unique = pool.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 100);
        for id in &pool {
            assert_eq!(id.len(), 10);
            assert!(id.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn pool_is_deterministic_for_a_seed() {
        let mut a = patient_stream(42, "patient-id-pool");
        let mut b = patient_stream(42, "patient-id-pool");
        assert_eq!(patient_id_pool(&mut a, 10), patient_id_pool(&mut b, 10));
    }

    #[test]
    fn order_numbers_are_fifteen_digits_and_monotonic() {
        let mut numbers = OrderNumberGen::new("0010020003");
        let first = numbers.next_number();
        let second = numbers.next_number();
        assert_eq!(first.len(), 15);
        assert_eq!(second.len(), 15);
        assert!(first < second);
        assert!(first.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn message_ids_stay_within_twenty_chars() {
        let mut ids = MessageIdGen::new("0010020003");
        for _ in 0..1000 {
            assert!(ids.next_id().len() <= 20);
        }
    }
}
