//! Event-table ingestion.
//!
//! Source data is one CSV per patient, named
//! `<age>_<sex>_<tag>.csv`, holding that patient's clinical events as
//! rows discriminated by a numeric `type` column. The core consumes the
//! typed rows; nothing downstream touches the CSV layer.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use ssmix_model::Sex;

/// Required columns of an event table, in canonical order.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "timestamp",
    "type",
    "text",
    "icd10",
    "mdcdx2",
    "provisional",
    "hot",
    "jlac10",
    "lab_value",
    "unit",
    "discharge_disposition",
];

/// Optional columns: explicit birth and death dates.
pub const OPTIONAL_COLUMNS: &[&str] = &["dob", "dod"];

/// File names are `<age 0..=120>_<sex>_<tag>.csv`.
static FILE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]|[1-9][0-9]|1[01][0-9]|120)_[MFOUN]_[a-zA-Z0-9\-]+\.csv$")
        .expect("file name pattern")
});

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: file name must match <age>_<sex>_<tag>.csv")]
    FileName { path: PathBuf },

    #[error("{path}: missing required column {column:?}")]
    MissingColumn { path: PathBuf, column: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;

/// Event discriminator of one row. The numeric codes are part of the
/// input contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Admission = 0,
    Discharge = 1,
    Diagnosis = 2,
    Prescription = 3,
    Injection = 4,
    Laboratory = 5,
}

impl EventKind {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(EventKind::Admission),
            "1" => Some(EventKind::Discharge),
            "2" => Some(EventKind::Diagnosis),
            "3" => Some(EventKind::Prescription),
            "4" => Some(EventKind::Injection),
            "5" => Some(EventKind::Laboratory),
            _ => None,
        }
    }

    /// Tie-break precedence among events sharing a timestamp.
    pub fn precedence(&self) -> u8 {
        *self as u8
    }
}

/// One event row, fields as read (trimmed, never missing).
#[derive(Debug, Clone, Default)]
pub struct EventRow {
    /// 1-based data row number, for error reports.
    pub row_number: usize,
    pub timestamp: String,
    /// Raw `type` column; [`EventKind::from_code`] interprets it.
    pub kind_code: String,
    pub text: String,
    pub icd10: String,
    pub mdcdx2: String,
    pub provisional: String,
    pub hot: String,
    pub jlac10: String,
    pub lab_value: String,
    pub unit: String,
    pub discharge_disposition: String,
    pub dob: String,
    pub dod: String,
}

impl EventRow {
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::from_code(&self.kind_code)
    }
}

/// A source file with the patient-level attributes its name declares.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub age: u32,
    pub sex: Sex,
}

impl SourceFile {
    /// Parses the `<age>_<sex>_<tag>.csv` grammar.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if !FILE_NAME_PATTERN.is_match(&name) {
            return Err(IngestError::FileName {
                path: path.to_path_buf(),
            });
        }
        let mut parts = name.splitn(3, '_');
        let age: u32 = parts.next().unwrap_or("0").parse().unwrap_or(0);
        let sex = Sex::from_str(parts.next().unwrap_or("U")).unwrap_or(Sex::Unknown);
        Ok(Self {
            path: path.to_path_buf(),
            age,
            sex,
        })
    }
}

/// Recursively collects the CSV files under a source directory, sorted by
/// path so downstream id assignment is stable.
pub fn discover_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_csv_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_csv_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_csv_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    Ok(())
}

/// Reads an event table. Values are trimmed; absent optional columns
/// read as empty strings.
pub fn read_event_rows(path: &Path) -> Result<Vec<EventRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let column = |name: &str| -> Option<usize> {
        headers
            .iter()
            .position(|h| h.trim_matches('\u{feff}').trim() == name)
    };
    for required in REQUIRED_COLUMNS {
        if column(required).is_none() {
            return Err(IngestError::MissingColumn {
                path: path.to_path_buf(),
                column: (*required).to_string(),
            });
        }
    }
    let indices: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .chain(OPTIONAL_COLUMNS.iter())
        .map(|name| column(name))
        .collect();

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let get = |slot: usize| -> String {
            indices[slot]
                .and_then(|idx| record.get(idx))
                .unwrap_or("")
                .trim()
                .to_string()
        };
        rows.push(EventRow {
            row_number: row_idx + 1,
            timestamp: get(0),
            kind_code: get(1),
            text: get(2),
            icd10: get(3),
            mdcdx2: get(4),
            provisional: get(5),
            hot: get(6),
            jlac10: get(7),
            lab_value: get(8),
            unit: get(9),
            discharge_disposition: get(10),
            dob: get(11),
            dod: get(12),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "timestamp,type,text,icd10,mdcdx2,provisional,hot,jlac10,lab_value,unit,discharge_disposition";

    fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{content}").unwrap();
        path
    }

    #[test]
    fn parses_filename_grammar() {
        assert!(SourceFile::from_path(Path::new("64_M_1a5d9f.csv")).is_ok());
        assert!(SourceFile::from_path(Path::new("121_M_x.csv")).is_err());
        assert!(SourceFile::from_path(Path::new("64_X_x.csv")).is_err());
        assert!(SourceFile::from_path(Path::new("64_M.csv")).is_err());
    }

    #[test]
    fn reads_rows_with_optional_columns_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "30_F_a.csv",
            &format!("{HEADER}\n20200101120000000000,3,テスト錠,,,,123456789,,,,"),
        );
        let rows = read_event_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind(), Some(EventKind::Prescription));
        assert_eq!(rows[0].text, "テスト錠");
        assert!(rows[0].dob.is_empty());
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "30_F_b.csv", "timestamp,type\n20200101,0");
        assert!(matches!(
            read_event_rows(&path),
            Err(IngestError::MissingColumn { .. })
        ));
    }

    #[test]
    fn discovery_is_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_csv(dir.path().join("sub").as_path(), "40_M_b.csv", HEADER);
        write_csv(dir.path(), "30_F_a.csv", HEADER);
        let files = discover_source_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("30_F_a.csv"));
    }
}
