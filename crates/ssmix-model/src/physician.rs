//! Physician (ordering/attending staff) entity.

use ssmix_standards::tables::{self, UDT_0069_DEPARTMENT};

use crate::error::{ModelError, Result};

#[derive(Debug, Clone)]
pub struct Physician {
    pub physician_id: String,
    pub family_name: String,
    pub family_name_kana: String,
    pub given_name: String,
    pub given_name_kana: String,
    pub department_code: String,
}

impl Physician {
    pub fn new(
        physician_id: &str,
        family_name: &str,
        family_name_kana: &str,
        given_name: &str,
        given_name_kana: &str,
        department_code: &str,
    ) -> Result<Self> {
        const ENTITY: &str = "Physician";
        if !department_code.is_empty() && !tables::contains(UDT_0069_DEPARTMENT, department_code) {
            return Err(ModelError::invalid(
                ENTITY,
                "department_code",
                department_code,
                "must be one of user table 0069",
            ));
        }
        for (attribute, value) in [
            ("physician_id", physician_id),
            ("family_name", family_name),
            ("given_name", given_name),
        ] {
            if value.is_empty() {
                return Err(ModelError::invalid(ENTITY, attribute, value, "must not be empty"));
            }
        }
        let combined = physician_id.chars().count()
            + family_name.chars().count()
            + given_name.chars().count()
            + family_name_kana.chars().count()
            + given_name_kana.chars().count();
        if combined >= 230 {
            return Err(ModelError::invalid(
                ENTITY,
                "name",
                format!("{combined} chars"),
                "combined id and name parts must be shorter than 230 characters",
            ));
        }
        Ok(Self {
            physician_id: physician_id.to_string(),
            family_name: family_name.to_string(),
            family_name_kana: family_name_kana.to_string(),
            given_name: given_name.to_string(),
            given_name_kana: given_name_kana.to_string(),
            department_code: department_code.to_string(),
        })
    }

    /// Department display name from user table 0069.
    pub fn department_name(&self) -> Option<&'static str> {
        tables::lookup(UDT_0069_DEPARTMENT, &self.department_code)
    }
}
