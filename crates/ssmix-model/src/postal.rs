//! Postal-code normalization shared by patient and hospital addresses.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ModelError, Result};

/// Hyphen-like characters that appear in Japanese source data.
static HYPHEN_VARIANTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[‐‑‒–—―ー－]").expect("hyphen class"));

static POSTAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-\d{4}$").expect("postal pattern"));

/// Normalizes hyphen variants to `-` and validates the `NNN-NNNN` form.
pub fn normalize_postal_code(entity: &'static str, input: &str) -> Result<String> {
    let normalized = HYPHEN_VARIANTS.replace_all(input, "-").into_owned();
    if POSTAL_PATTERN.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(ModelError::invalid(
            entity,
            "postal_code",
            input,
            "must match NNN-NNNN",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_standard_form() {
        assert_eq!(normalize_postal_code("Patient", "100-0005").unwrap(), "100-0005");
    }

    #[test]
    fn normalizes_fullwidth_hyphen() {
        assert_eq!(normalize_postal_code("Patient", "100－0005").unwrap(), "100-0005");
    }

    #[test]
    fn rejects_missing_hyphen() {
        assert!(normalize_postal_code("Patient", "1000005").is_err());
    }
}
