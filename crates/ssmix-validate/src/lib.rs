//! Pre-flight validation.
//!
//! The sweep runs before any output is produced. It loads every source
//! file, applies all rules, and collects every violation; nothing is
//! fail-fast. Generation is gated on an empty report. The report is
//! serialized as `validation_errors.json` in the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use ssmix_ingest::{discover_source_files, read_event_rows, EventKind, EventRow, SourceFile};
use ssmix_model::Hl7Timestamp;
use ssmix_standards::tables::{contains, UDT_0112_DISPOSITION};

/// File name of the serialized report.
pub const REPORT_FILE_NAME: &str = "validation_errors.json";

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Ingest(#[from] ssmix_ingest::IngestError),

    #[error("failed to write {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize validation report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ValidateError>;

/// One rule violation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Source file, relative to the swept directory where possible.
    pub file: String,
    /// 1-based data row, when the violation is row-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub field: String,
    pub rule: String,
    pub value: String,
}

/// The aggregated sweep result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Serializes the report into `output_dir/validation_errors.json`.
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(REPORT_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|source| ValidateError::Report {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Sweeps every CSV under `source_dir`. I/O problems surface as errors;
/// rule violations land in the report.
pub fn validate_source_dir(source_dir: &Path) -> Result<ValidationReport> {
    let files = discover_source_files(source_dir)?;
    info!(files = files.len(), "validating source directory");
    let mut report = ValidationReport::default();
    for path in &files {
        let display = path
            .strip_prefix(source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        validate_file(path, &display, &mut report);
    }
    info!(errors = report.len(), "validation sweep finished");
    Ok(report)
}

/// Validates a single file into the report.
pub fn validate_file(path: &Path, display: &str, report: &mut ValidationReport) {
    let push = |report: &mut ValidationReport,
                row: Option<usize>,
                field: &str,
                rule: &str,
                value: &str| {
        report.errors.push(ValidationIssue {
            file: display.to_string(),
            row,
            field: field.to_string(),
            rule: rule.to_string(),
            value: value.to_string(),
        });
    };

    let source = match SourceFile::from_path(path) {
        Ok(source) => Some(source),
        Err(_) => {
            push(
                report,
                None,
                "file_name",
                "file name must match <age 0-120>_<sex M|F|O|U|N>_<tag>.csv",
                &path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
            );
            None
        }
    };

    let rows = match read_event_rows(path) {
        Ok(rows) => rows,
        Err(err) => {
            push(report, None, "file", "file must be readable CSV with the required columns", &err.to_string());
            return;
        }
    };
    if rows.is_empty() {
        push(report, None, "rows", "event table must not be empty", "0 rows");
        return;
    }

    let dob = explicit_dob(&rows);
    let dob_parsed = dob.as_ref().and_then(|(row, value)| {
        match Hl7Timestamp::parse(value) {
            Ok(ts) => Some(ts),
            Err(_) => {
                push(report, Some(*row), "dob", "birth date must be a valid YYYYMMDD date", value);
                None
            }
        }
    });
    if let Some((row, value)) = explicit_dod(&rows) {
        match Hl7Timestamp::parse(&value) {
            Ok(dod) => {
                if let Some(dob_ts) = &dob_parsed {
                    if dod.date() < dob_ts.date() {
                        push(
                            report,
                            Some(row),
                            "dod",
                            "death date must not precede the birth date",
                            &value,
                        );
                    }
                }
            }
            Err(_) => push(report, Some(row), "dod", "death date must be a valid YYYYMMDD date", &value),
        }
    }

    let mut expecting_admission = true;
    for event in &rows {
        let row = Some(event.row_number);

        let timestamp = match parse_base_timestamp(&event.timestamp) {
            Some(ts) => Some(ts),
            None => {
                push(
                    report,
                    row,
                    "timestamp",
                    "timestamp must be YYYYMMDDHHMMSSFFFFFF",
                    &event.timestamp,
                );
                None
            }
        };
        if let (Some(ts), Some(dob_ts)) = (&timestamp, &dob_parsed) {
            if ts.date() < dob_ts.date() {
                push(
                    report,
                    row,
                    "timestamp",
                    "event must not precede the birth date",
                    &event.timestamp,
                );
            }
        }

        let kind = match event.kind() {
            Some(kind) => kind,
            None => {
                push(report, row, "type", "type must be an integer 0-5", &event.kind_code);
                continue;
            }
        };
        match kind {
            EventKind::Discharge => {
                if event.discharge_disposition.is_empty() {
                    push(
                        report,
                        row,
                        "discharge_disposition",
                        "discharge rows carry a disposition",
                        "",
                    );
                } else if !contains(UDT_0112_DISPOSITION, &event.discharge_disposition) {
                    push(
                        report,
                        row,
                        "discharge_disposition",
                        "disposition must be one of user table 0112",
                        &event.discharge_disposition,
                    );
                }
            }
            EventKind::Diagnosis => {
                if !event.provisional.is_empty() && event.provisional != "1" {
                    push(
                        report,
                        row,
                        "provisional",
                        "provisional must be \"1\" or empty",
                        &event.provisional,
                    );
                }
            }
            EventKind::Laboratory => {
                if event.jlac10.is_empty() {
                    push(report, row, "jlac10", "laboratory rows carry a JLAC10 code", "");
                } else if event.jlac10.len() != 17 {
                    push(
                        report,
                        row,
                        "jlac10",
                        "JLAC10 codes are 17 characters without hyphens",
                        &event.jlac10,
                    );
                }
                if event.lab_value.is_empty() {
                    push(report, row, "lab_value", "laboratory rows carry a value", "");
                }
            }
            _ => {}
        }

        // Admissions and discharges must alternate, starting with an
        // admission; a trailing open admission is allowed.
        match kind {
            EventKind::Admission => {
                if !expecting_admission {
                    push(
                        report,
                        row,
                        "type",
                        "admission while already admitted; admissions and discharges must alternate",
                        &event.kind_code,
                    );
                } else {
                    expecting_admission = false;
                }
            }
            EventKind::Discharge => {
                if expecting_admission {
                    push(
                        report,
                        row,
                        "type",
                        "discharge without a preceding admission",
                        &event.kind_code,
                    );
                } else {
                    expecting_admission = true;
                }
            }
            _ => {}
        }
    }

    // The filename-declared sex has already been checked by the grammar;
    // source is only needed to anchor ages, nothing further to verify.
    let _ = source;
}

/// First non-empty `dob` cell with its row number.
fn explicit_dob(rows: &[EventRow]) -> Option<(usize, String)> {
    rows.iter()
        .find(|row| !row.dob.is_empty())
        .map(|row| (row.row_number, row.dob.clone()))
}

/// First non-empty `dod` cell with its row number.
fn explicit_dod(rows: &[EventRow]) -> Option<(usize, String)> {
    rows.iter()
        .find(|row| !row.dod.is_empty())
        .map(|row| (row.row_number, row.dod.clone()))
}

/// Base timestamps are exactly 20 digits.
fn parse_base_timestamp(value: &str) -> Option<Hl7Timestamp> {
    if value.len() != 20 || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Hl7Timestamp::parse(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "timestamp,type,text,icd10,mdcdx2,provisional,hot,jlac10,lab_value,unit,discharge_disposition,dob";

    fn sweep(name: &str, body: &str) -> ValidationReport {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{HEADER}\n{body}").unwrap();
        validate_source_dir(dir.path()).unwrap()
    }

    #[test]
    fn clean_file_passes() {
        let report = sweep("30_F_a.csv", "20200101120000000000,3,テスト錠,,,,123456789,,,,,");
        assert!(report.is_empty(), "{:?}", report.errors);
    }

    #[test]
    fn admission_before_birth_is_reported_once() {
        let report = sweep(
            "0_M_a.csv",
            "20190101120000000000,0,,,,,,,,,,20200101",
        );
        assert_eq!(report.len(), 1, "{:?}", report.errors);
        assert_eq!(report.errors[0].field, "timestamp");
        assert!(report.errors[0].rule.contains("birth date"));
    }

    #[test]
    fn collects_all_errors_instead_of_failing_fast() {
        let report = sweep(
            "30_F_a.csv",
            "bogus,9,,,,,,,,,,\n20200101120000000000,1,,,,,,,,,,",
        );
        // Bad timestamp, bad type, missing disposition, discharge without
        // admission.
        assert!(report.len() >= 4, "{:?}", report.errors);
    }

    #[test]
    fn lab_rows_require_17_char_jlac10() {
        let report = sweep(
            "30_F_a.csv",
            "20200101120000000000,5,白血球数,,,,,12345,6500,/ul,,",
        );
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors[0].field, "jlac10");
    }

    #[test]
    fn bad_file_name_is_reported() {
        let report = sweep("patient.csv", "20200101120000000000,3,,,,,,,,,,");
        assert!(report.errors.iter().any(|e| e.field == "file_name"));
    }

    #[test]
    fn report_serializes_to_output_dir() {
        let report = sweep("patient.csv", "20200101120000000000,3,,,,,,,,,,");
        let out = tempfile::tempdir().unwrap();
        let path = report.write_to(out.path()).unwrap();
        assert!(path.ends_with(REPORT_FILE_NAME));
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("file_name"));
    }
}
