//! Patient, allergy and insurance entities.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};

use ssmix_standards::insurance::{insurance_plan, InsuranceClass};
use ssmix_standards::tables::{self, JHSD_0002_PUBLIC_EXPENSE, UDT_0063_RELATIONSHIP, UDT_0127_ALLERGY};

use crate::enums::Sex;
use crate::error::{ModelError, Result};
use crate::postal::normalize_postal_code;
use crate::timestamp::Hl7Timestamp;

static PATIENT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"^\w{6,250}$")
        .size_limit(50 * (1 << 20))
        .build()
        .expect("patient id pattern")
});

/// One allergy record (AL1).
#[derive(Debug, Clone)]
pub struct Allergy {
    pub type_code: String,
    pub allergen_code: String,
    pub allergen_name: String,
    pub allergen_code_system: String,
}

impl Allergy {
    pub fn new(
        type_code: &str,
        allergen_code: &str,
        allergen_name: &str,
        allergen_code_system: &str,
    ) -> Result<Self> {
        if !tables::contains(UDT_0127_ALLERGY, type_code) {
            return Err(ModelError::invalid(
                "Allergy",
                "type_code",
                type_code,
                "must be one of user table 0127",
            ));
        }
        for (attribute, value) in [
            ("allergen_code", allergen_code),
            ("allergen_name", allergen_name),
            ("allergen_code_system", allergen_code_system),
        ] {
            if value.is_empty() {
                return Err(ModelError::invalid("Allergy", attribute, value, "must not be empty"));
            }
        }
        Ok(Self {
            type_code: type_code.to_string(),
            allergen_code: allergen_code.to_string(),
            allergen_name: allergen_name.to_string(),
            allergen_code_system: allergen_code_system.to_string(),
        })
    }
}

/// One insurance entry (IN1). The number-length and company-name rules
/// follow JHSD0001 plan classifications.
#[derive(Debug, Clone)]
pub struct Insurance {
    pub plan_code: String,
    pub plan_name: String,
    pub classification: InsuranceClass,
    pub number: String,
    pub effective_date: Option<Hl7Timestamp>,
    pub expiration_date: Option<Hl7Timestamp>,
    /// JHSD0002 type; only for public-expense plans.
    pub plan_type: String,
    pub relationship: String,
    pub company_name: String,
}

impl Insurance {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        plan_code: &str,
        number: &str,
        effective_date: &str,
        expiration_date: &str,
        plan_type: &str,
        relationship: &str,
        company_name: &str,
    ) -> Result<Self> {
        let plan = insurance_plan(plan_code).ok_or_else(|| {
            ModelError::invalid("Insurance", "plan_code", plan_code, "must be one of JHSD0001")
        })?;
        let expected_len = if plan_code == "C0" { 6 } else { 8 };
        if number.len() != expected_len || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ModelError::invalid(
                "Insurance",
                "number",
                number,
                format!("must be {expected_len} digits for plan {plan_code}"),
            ));
        }
        if plan_code != "C0" && !number.starts_with(plan_code) {
            return Err(ModelError::invalid(
                "Insurance",
                "number",
                number,
                "must start with the 法別番号 of the plan",
            ));
        }
        if plan.class == InsuranceClass::PublicExpense
            && !tables::contains(JHSD_0002_PUBLIC_EXPENSE, plan_type)
        {
            return Err(ModelError::invalid(
                "Insurance",
                "plan_type",
                plan_type,
                "public expense plans require a JHSD0002 type",
            ));
        }
        if plan.class.requires_company_name() && company_name.is_empty() {
            return Err(ModelError::invalid(
                "Insurance",
                "company_name",
                company_name,
                format!("must not be empty for classification {}", plan.class.as_str()),
            ));
        }
        if !relationship.is_empty() && !tables::contains(UDT_0063_RELATIONSHIP, relationship) {
            return Err(ModelError::invalid(
                "Insurance",
                "relationship",
                relationship,
                "must be one of user table 0063",
            ));
        }
        Ok(Self {
            plan_code: plan_code.to_string(),
            plan_name: plan.name.to_string(),
            classification: plan.class,
            number: number.to_string(),
            effective_date: Hl7Timestamp::parse_opt(effective_date)?,
            expiration_date: Hl7Timestamp::parse_opt(expiration_date)?,
            plan_type: plan_type.to_string(),
            relationship: relationship.to_string(),
            company_name: company_name.to_string(),
        })
    }
}

/// Attributes of a patient, validated on construction.
#[derive(Debug, Clone, Default)]
pub struct PatientAttrs {
    pub patient_id: String,
    pub dob: String,
    pub sex: String,
    pub family_name: String,
    pub family_name_kana: String,
    pub given_name: String,
    pub given_name_kana: String,
    pub postal_code: String,
    pub address: String,
    pub home_phone: String,
    pub work_place: String,
    pub work_phone: String,
    pub abo_blood_type: String,
    pub rh_blood_type: String,
    /// cm, optional.
    pub height: String,
    /// kg, optional.
    pub weight: String,
    /// Optional death datetime; its presence marks the patient dead.
    pub death_date: String,
    pub allergies: Vec<Allergy>,
    pub insurances: Vec<Insurance>,
}

/// A patient with synthesized demographics.
#[derive(Debug, Clone)]
pub struct Patient {
    pub patient_id: String,
    pub dob: Hl7Timestamp,
    pub sex: Sex,
    pub family_name: String,
    pub family_name_kana: String,
    pub given_name: String,
    pub given_name_kana: String,
    pub postal_code: String,
    pub address: String,
    pub home_phone: String,
    pub work_place: String,
    pub work_phone: String,
    pub abo_blood_type: String,
    pub rh_blood_type: String,
    pub height: String,
    pub weight: String,
    pub death_date: Option<Hl7Timestamp>,
    pub allergies: Vec<Allergy>,
    pub insurances: Vec<Insurance>,
}

impl Patient {
    pub fn new(attrs: PatientAttrs) -> Result<Self> {
        const ENTITY: &str = "Patient";

        if !PATIENT_ID_PATTERN.is_match(&attrs.patient_id) {
            return Err(ModelError::invalid(
                ENTITY,
                "patient_id",
                &attrs.patient_id,
                "must be alphanumeric, 6-250 characters",
            ));
        }
        let sex: Sex = attrs.sex.parse()?;
        let name_len = attrs.family_name.chars().count()
            + attrs.family_name_kana.chars().count()
            + attrs.given_name.chars().count()
            + attrs.given_name_kana.chars().count();
        if name_len >= 230 {
            return Err(ModelError::invalid(
                ENTITY,
                "name",
                format!("{} chars", name_len),
                "combined name parts must be shorter than 230 characters",
            ));
        }
        let postal_code = normalize_postal_code(ENTITY, &attrs.postal_code)?;
        for (attribute, value, max) in [
            ("address", &attrs.address, 235usize),
            ("home_phone", &attrs.home_phone, 250),
            ("work_phone", &attrs.work_phone, 250),
            ("work_place", &attrs.work_place, 250),
        ] {
            if value.chars().count() > max {
                return Err(ModelError::invalid(
                    ENTITY,
                    attribute,
                    value.as_str(),
                    format!("must be {max} characters or less"),
                ));
            }
        }
        if !attrs.abo_blood_type.is_empty()
            && !matches!(attrs.abo_blood_type.as_str(), "A" | "B" | "AB" | "O")
        {
            return Err(ModelError::invalid(
                ENTITY,
                "abo_blood_type",
                &attrs.abo_blood_type,
                "must be A, B, AB, O or empty",
            ));
        }
        if !attrs.rh_blood_type.is_empty() && !matches!(attrs.rh_blood_type.as_str(), "+" | "-") {
            return Err(ModelError::invalid(
                ENTITY,
                "rh_blood_type",
                &attrs.rh_blood_type,
                "must be +, - or empty",
            ));
        }
        check_bounded_number(ENTITY, "height", &attrs.height, 0.0, 300.0)?;
        check_bounded_number(ENTITY, "weight", &attrs.weight, 0.0, 500.0)?;

        let dob = Hl7Timestamp::parse(&attrs.dob)?;
        let death_date = Hl7Timestamp::parse_opt(&attrs.death_date)?;
        if let Some(death) = &death_date {
            if death.date() < dob.date() {
                return Err(ModelError::invalid(
                    ENTITY,
                    "death_date",
                    attrs.death_date.as_str(),
                    "death date must not precede the birth date",
                ));
            }
        }

        Ok(Self {
            patient_id: attrs.patient_id,
            dob,
            sex,
            family_name: attrs.family_name,
            family_name_kana: attrs.family_name_kana,
            given_name: attrs.given_name,
            given_name_kana: attrs.given_name_kana,
            postal_code,
            address: attrs.address,
            home_phone: attrs.home_phone,
            work_place: attrs.work_place,
            work_phone: attrs.work_phone,
            abo_blood_type: attrs.abo_blood_type,
            rh_blood_type: attrs.rh_blood_type,
            height: attrs.height,
            weight: attrs.weight,
            death_date,
            allergies: attrs.allergies,
            insurances: attrs.insurances,
        })
    }

    pub fn is_dead(&self) -> bool {
        self.death_date.is_some()
    }

    /// Checks the temporal invariant against one clinical event date.
    pub fn check_event_date(&self, event: NaiveDate) -> Result<()> {
        if event < self.dob.date() {
            return Err(ModelError::invalid(
                "Patient",
                "dob",
                self.dob.format(crate::timestamp::Precision::Day),
                format!("birth date must not follow event date {event}"),
            ));
        }
        Ok(())
    }
}

fn check_bounded_number(
    entity: &'static str,
    attribute: &'static str,
    value: &str,
    min: f64,
    max: f64,
) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    match value.parse::<f64>() {
        Ok(parsed) if (min..=max).contains(&parsed) => Ok(()),
        Ok(_) => Err(ModelError::invalid(
            entity,
            attribute,
            value,
            format!("must be between {min} and {max}"),
        )),
        Err(_) => Err(ModelError::invalid(entity, attribute, value, "must be a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_attrs() -> PatientAttrs {
        PatientAttrs {
            patient_id: "0010020003".into(),
            dob: "19700405".into(),
            sex: "M".into(),
            family_name: "仮山田".into(),
            family_name_kana: "カリヤマダ".into(),
            given_name: "太郎".into(),
            given_name_kana: "タロウ".into(),
            postal_code: "100-0005".into(),
            address: "東京都千代田区丸の内99丁目13番1号".into(),
            home_phone: "099-123-4567".into(),
            ..PatientAttrs::default()
        }
    }

    #[test]
    fn accepts_minimal_patient() {
        let patient = Patient::new(base_attrs()).unwrap();
        assert_eq!(patient.sex, Sex::Male);
        assert!(!patient.is_dead());
    }

    #[test]
    fn optional_fields_accept_empty() {
        let attrs = base_attrs();
        assert!(attrs.height.is_empty() && attrs.weight.is_empty());
        assert!(Patient::new(attrs).is_ok());
    }

    #[test]
    fn rejects_short_patient_id() {
        let mut attrs = base_attrs();
        attrs.patient_id = "123".into();
        assert!(Patient::new(attrs).is_err());
    }

    #[test]
    fn rejects_death_before_birth() {
        let mut attrs = base_attrs();
        attrs.death_date = "19690101".into();
        assert!(Patient::new(attrs).is_err());
    }

    #[test]
    fn event_before_birth_violates_temporal_rule() {
        let mut attrs = base_attrs();
        attrs.dob = "20200101".into();
        let patient = Patient::new(attrs).unwrap();
        let event = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        assert!(patient.check_event_date(event).is_err());
    }

    #[test]
    fn insurance_number_length_follows_plan() {
        let company = "保険者の名称(仮)";
        assert!(Insurance::new("C0", "123456", "", "", "", "SEL", company).is_ok());
        assert!(Insurance::new("C0", "12345678", "", "", "", "SEL", company).is_err());
        assert!(Insurance::new("01", "01123456", "", "", "", "SEL", company).is_ok());
        assert!(Insurance::new("01", "99123456", "", "", "", "SEL", company).is_err());
    }

    #[test]
    fn medical_insurance_requires_company_name() {
        assert!(Insurance::new("C0", "123456", "", "", "", "SEL", "").is_err());
    }

    #[test]
    fn allergy_requires_table_membership() {
        assert!(Allergy::new("DA", "1", "ペニシリン", "99XYZ").is_ok());
        assert!(Allergy::new("XX", "1", "ペニシリン", "99XYZ").is_err());
    }
}
