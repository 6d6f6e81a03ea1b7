//! Patient, physician, hospital and admission-location synthesis.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;

use chrono::Duration;

use ssmix_model::{
    Admission, Allergy, Hl7Timestamp, Hospital, Insurance, ModelError, Patient, PatientAttrs,
    Physician, Precision, Sex,
};
use ssmix_standards::insurance::{houbetsu_plans, InsuranceClass};
use ssmix_standards::tables::{JHSD_0002_PUBLIC_EXPENSE, UDT_0069_DEPARTMENT};

use crate::address::{patient_prefecture, synth_address, synth_phone};
use crate::data::{ALLERGIES, BEDS, COMPANIES, FAMILY_NAMES, GIVEN_NAMES_FEMALE, GIVEN_NAMES_MALE, ROOMS, WARDS};
use crate::seed::{normal, SynthRng};

/// Fixed company name on synthesized insurance entries.
const INSURANCE_COMPANY: &str = "保険者の名称(仮)";

/// Inputs the driver derives from the event table before synthesis.
#[derive(Debug, Clone)]
pub struct PatientSeed<'a> {
    pub patient_id: &'a str,
    /// `YYYYMMDD`.
    pub dob: &'a str,
    /// Age at the latest event, for the employment draw.
    pub age: u32,
    /// Latest event date, anchoring insurance validity.
    pub latest_date: Hl7Timestamp,
    pub sex: Sex,
    /// Optional death datetime in base form.
    pub death_date: &'a str,
    pub n_insurance: usize,
}

/// Synthesizes the allergy list: none for half of the patients, up to
/// four otherwise.
pub fn synth_allergies(rng: &mut SynthRng) -> Result<Vec<Allergy>, ModelError> {
    let counts = [0usize, 1, 2, 3, 4];
    let weights = [0.5, 0.2, 0.2, 0.05, 0.05];
    let dist = WeightedIndex::new(weights).expect("static weights");
    let n = counts[dist.sample(rng)];
    let mut allergies = Vec::with_capacity(n);
    for _ in 0..n {
        let (type_code, code, name, system) =
            ALLERGIES.choose(rng).copied().unwrap_or(ALLERGIES[0]);
        allergies.push(Allergy::new(type_code, code, name, system)?);
    }
    Ok(allergies)
}

/// Synthesizes one insurance entry anchored at the given date.
pub fn synth_insurance(rng: &mut SynthRng, current: &Hl7Timestamp) -> Result<Insurance, ModelError> {
    let (plan_code, number) = if rng.gen_bool(0.5) {
        ("C0", format!("{}", rng.gen_range(100000..=999999)))
    } else {
        let plans: Vec<_> = houbetsu_plans().collect();
        let plan = plans.choose(rng).copied().expect("plan table is non-empty");
        (plan.code, format!("{}{}", plan.code, rng.gen_range(100000..=999999)))
    };
    let plan = ssmix_standards::insurance_plan(plan_code).expect("plan just drawn from table");
    let plan_type = if plan.class == InsuranceClass::PublicExpense {
        JHSD_0002_PUBLIC_EXPENSE
            .choose(rng)
            .map(|(code, _)| *code)
            .unwrap_or("12")
    } else {
        ""
    };
    let company_name = if plan.class.requires_company_name() {
        INSURANCE_COMPANY
    } else {
        ""
    };
    let effective = current.format(Precision::Day);
    let expiration = current.shifted(Duration::days(365)).format(Precision::Day);
    Insurance::new(
        plan_code,
        &number,
        &effective,
        &expiration,
        plan_type,
        "SEL",
        company_name,
    )
}

fn pick_name(rng: &mut SynthRng, sex: Sex) -> ((&'static str, &'static str), (&'static str, &'static str)) {
    let family = FAMILY_NAMES.choose(rng).copied().unwrap_or(FAMILY_NAMES[0]);
    let pool = if sex == Sex::Female {
        GIVEN_NAMES_FEMALE
    } else {
        GIVEN_NAMES_MALE
    };
    let given = pool.choose(rng).copied().unwrap_or(pool[0]);
    (family, given)
}

/// Synthesizes a complete patient. The family name and its kana carry the
/// 仮 / カリ markers; address, phones, observations, allergies and
/// insurance entries are drawn from the same stream.
pub fn synth_patient(rng: &mut SynthRng, seed: &PatientSeed<'_>) -> Result<Patient, ModelError> {
    let ((family, family_kana), (given, given_kana)) = pick_name(rng, seed.sex);

    let prefecture = patient_prefecture(rng);
    let with_building = rng.gen_bool(0.5);
    let address = synth_address(rng, prefecture, with_building);
    let home_phone = synth_phone(rng, "099");

    let is_working = match seed.age {
        0..=15 => false,
        16..=23 => rng.gen_bool(0.5),
        24..=64 => rng.gen_bool(0.8),
        _ => rng.gen_bool(0.4),
    };
    let (work_place, work_phone) = if is_working {
        let company = COMPANIES.choose(rng).copied().unwrap_or(COMPANIES[0]);
        (company.to_string(), synth_phone(rng, "099"))
    } else {
        (String::new(), String::new())
    };

    let rh_blood_type = if rng.gen_bool(0.995) { "+" } else { "-" };
    let abo_choices = ["A", "B", "AB", "O"];
    let abo_dist = WeightedIndex::new([0.4, 0.3, 0.1, 0.2]).expect("static weights");
    let abo_blood_type = abo_choices[abo_dist.sample(rng)];
    let height = format!("{:.1}", normal(rng, 165.0, 8.0).clamp(120.0, 210.0));
    let weight = format!("{:.1}", normal(rng, 60.0, 10.0).clamp(25.0, 160.0));

    let allergies = synth_allergies(rng)?;
    let mut insurances = Vec::with_capacity(seed.n_insurance);
    for _ in 0..seed.n_insurance {
        insurances.push(synth_insurance(rng, &seed.latest_date)?);
    }

    Patient::new(PatientAttrs {
        patient_id: seed.patient_id.to_string(),
        dob: seed.dob.to_string(),
        sex: seed.sex.as_str().to_string(),
        family_name: format!("仮{family}"),
        family_name_kana: format!("カリ{family_kana}"),
        given_name: given.to_string(),
        given_name_kana: given_kana.to_string(),
        postal_code: address.postal_code,
        address: address.address,
        home_phone,
        work_place,
        work_phone,
        abo_blood_type: abo_blood_type.to_string(),
        rh_blood_type: rh_blood_type.to_string(),
        height,
        weight,
        death_date: seed.death_date.to_string(),
        allergies,
        insurances,
    })
}

/// Synthesizes one physician with a marked name and a random department.
pub fn synth_physician(rng: &mut SynthRng) -> Result<Physician, ModelError> {
    let sex = if rng.gen_bool(0.5) { Sex::Female } else { Sex::Male };
    let ((family, family_kana), (given, given_kana)) = pick_name(rng, sex);
    let physician_id = format!("{}", rng.gen_range(1_000_000_000u64..=9_999_999_999));
    let department = UDT_0069_DEPARTMENT
        .choose(rng)
        .map(|(code, _)| *code)
        .unwrap_or("01");
    Physician::new(
        &physician_id,
        &format!("仮{family}"),
        &format!("カリ{family_kana}"),
        given,
        given_kana,
        department,
    )
}

/// Synthesizes the run-constant hospital.
pub fn synth_hospital(rng: &mut SynthRng) -> Result<Hospital, ModelError> {
    let prefecture = if rng.gen_bool(0.5) { "東京都" } else { "埼玉県" };
    let address = synth_address(rng, Some(prefecture), false);
    let phone = synth_phone(rng, "099");
    Hospital::new("日本医療情報推進病院", &address.postal_code, &address.address, &phone)
}

/// Draws a ward/room/bed triple and opens an admission under the given
/// attending physician.
pub fn synth_admission_location(
    rng: &mut SynthRng,
    admit_time: Hl7Timestamp,
    physician: Physician,
) -> Result<Admission, ModelError> {
    let ward = WARDS.choose(rng).copied().unwrap_or(WARDS[0]);
    let room = ROOMS.choose(rng).copied().unwrap_or(ROOMS[0]);
    let bed = BEDS.choose(rng).copied().unwrap_or(BEDS[0]);
    Admission::new(ward, room, bed, admit_time, physician)
}
