//! JAHIS insurance plan table (JHSD0001) with classification metadata.
//!
//! Plan codes are either `C0` (国民健康保険, 6-digit insured number) or a
//! 法別番号 whose first two digits prefix the 8-digit insured number.

/// Broad classification of an insurance plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsuranceClass {
    /// 医療保険 (medical insurance).
    Medical,
    /// 公費負担医療 (public expense).
    PublicExpense,
    /// 労災保険 (labor insurance).
    Labor,
    /// 自賠責保険 (traffic accident liability).
    Traffic,
    /// 公務員災害補償 (public servant compensation).
    PublicServant,
    /// 公害医療 (pollution-related).
    Pollution,
    /// 自費 (own expense).
    OwnExpense,
    /// その他.
    Other,
}

impl InsuranceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsuranceClass::Medical => "MI",
            InsuranceClass::PublicExpense => "PE",
            InsuranceClass::Labor => "LI",
            InsuranceClass::Traffic => "TI",
            InsuranceClass::PublicServant => "PS",
            InsuranceClass::Pollution => "PI",
            InsuranceClass::OwnExpense => "OE",
            InsuranceClass::Other => "OT",
        }
    }

    /// Classes whose plans must name the insurer (IN1-4).
    pub fn requires_company_name(&self) -> bool {
        !matches!(self, InsuranceClass::Labor)
    }
}

/// One JHSD0001 insurance plan.
#[derive(Debug, Clone, Copy)]
pub struct InsurancePlan {
    pub code: &'static str,
    pub name: &'static str,
    pub class: InsuranceClass,
}

/// JHSD0001 — insurance plan codes. `C0` aside, entries are 法別番号.
pub const JHSD_0001_PLANS: &[InsurancePlan] = &[
    InsurancePlan {
        code: "C0",
        name: "国民健康保険",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "01",
        name: "全国健康保険協会管掌健康保険",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "02",
        name: "船員保険",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "06",
        name: "組合管掌健康保険",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "07",
        name: "防衛省職員給与法による自衛官等の療養の給付",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "31",
        name: "国家公務員共済組合",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "32",
        name: "地方公務員等共済組合",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "33",
        name: "警察共済組合",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "34",
        name: "公立学校共済組合",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "39",
        name: "後期高齢者医療",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "63",
        name: "特定健康保険組合",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "67",
        name: "国民健康保険退職者",
        class: InsuranceClass::Medical,
    },
    InsurancePlan {
        code: "12",
        name: "生活保護",
        class: InsuranceClass::PublicExpense,
    },
    InsurancePlan {
        code: "51",
        name: "特定疾患治療研究事業",
        class: InsuranceClass::PublicExpense,
    },
    InsurancePlan {
        code: "54",
        name: "難病の患者に対する医療等に関する法律",
        class: InsuranceClass::PublicExpense,
    },
];

/// Looks up a plan by its JHSD0001 code.
pub fn insurance_plan(code: &str) -> Option<&'static InsurancePlan> {
    JHSD_0001_PLANS.iter().find(|plan| plan.code == code)
}

/// Plan codes other than `C0` (the 法別番号 pool used for synthesis).
pub fn houbetsu_plans() -> impl Iterator<Item = &'static InsurancePlan> {
    JHSD_0001_PLANS.iter().filter(|plan| plan.code != "C0")
}

/// Public-expense plans, which additionally carry a JHSD0002 type.
pub fn public_expense_plans() -> impl Iterator<Item = &'static InsurancePlan> {
    JHSD_0001_PLANS
        .iter()
        .filter(|plan| plan.class == InsuranceClass::PublicExpense)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_health_insurance_is_medical() {
        let plan = insurance_plan("C0").unwrap();
        assert_eq!(plan.class, InsuranceClass::Medical);
    }

    #[test]
    fn houbetsu_codes_are_two_digits() {
        for plan in houbetsu_plans() {
            assert_eq!(plan.code.len(), 2, "plan {}", plan.code);
            assert!(plan.code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
