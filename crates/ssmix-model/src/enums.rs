use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Administrative sex (user table 0001).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
    Other,
    Unknown,
    Ambiguous,
    NotApplicable,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "F",
            Sex::Male => "M",
            Sex::Other => "O",
            Sex::Unknown => "U",
            Sex::Ambiguous => "A",
            Sex::NotApplicable => "N",
        }
    }
}

impl FromStr for Sex {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F" => Ok(Sex::Female),
            "M" => Ok(Sex::Male),
            "O" => Ok(Sex::Other),
            "U" => Ok(Sex::Unknown),
            "A" => Ok(Sex::Ambiguous),
            "N" => Ok(Sex::NotApplicable),
            other => Err(ModelError::invalid(
                "Patient",
                "sex",
                other,
                "must be one of user table 0001 (F, M, O, U, A, N)",
            )),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an order was placed for an admitted patient (HL7 table 0482).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderClass {
    Inpatient,
    Outpatient,
}

impl OrderClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderClass::Inpatient => "I",
            OrderClass::Outpatient => "O",
        }
    }

    pub fn of_admission(admitted: bool) -> Self {
        if admitted {
            OrderClass::Inpatient
        } else {
            OrderClass::Outpatient
        }
    }
}

/// Injection mixture role (HL7 table 0166).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    Base,
    Additive,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Base => "B",
            ComponentKind::Additive => "A",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_round_trips() {
        for code in ["F", "M", "O", "U", "A", "N"] {
            assert_eq!(code.parse::<Sex>().unwrap().as_str(), code);
        }
        assert!("X".parse::<Sex>().is_err());
    }
}
