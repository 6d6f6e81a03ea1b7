//! Hospital entity, a process-wide constant for one generation run.

use crate::error::{ModelError, Result};
use crate::postal::normalize_postal_code;

#[derive(Debug, Clone)]
pub struct Hospital {
    pub name: String,
    pub postal_code: String,
    pub address: String,
    pub phone: String,
}

impl Hospital {
    pub fn new(name: &str, postal_code: &str, address: &str, phone: &str) -> Result<Self> {
        const ENTITY: &str = "Hospital";
        if name.is_empty() || name.chars().count() >= 250 {
            return Err(ModelError::invalid(
                ENTITY,
                "name",
                name,
                "must be non-empty and shorter than 250 characters",
            ));
        }
        let postal_code = if postal_code.is_empty() {
            String::new()
        } else {
            normalize_postal_code(ENTITY, postal_code)?
        };
        if address.chars().count() + postal_code.chars().count() >= 230 {
            return Err(ModelError::invalid(
                ENTITY,
                "address",
                address,
                "address and postal code combined must be shorter than 230 characters",
            ));
        }
        if phone.chars().count() >= 230 {
            return Err(ModelError::invalid(
                ENTITY,
                "phone",
                phone,
                "must be shorter than 230 characters",
            ));
        }
        Ok(Self {
            name: name.to_string(),
            postal_code,
            address: address.to_string(),
            phone: phone.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hospital_without_postal_code() {
        assert!(Hospital::new("日本医療情報推進病院", "", "東京都港区", "099-111-2222").is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        assert!(Hospital::new("", "100-0005", "東京都", "099-111-2222").is_err());
    }
}
