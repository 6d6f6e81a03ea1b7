//! SS-MIX2 storage layout and writer.
//!
//! The tree is rooted at `<output_dir>/ssmixtwins` and bucketed as
//! `<pid[0..3]>/<pid[3..6]>/<pid>/<date>/<category>/<file>`. File names
//! compose patient id, date, category, order number, message time,
//! department and condition flag, joined by underscores and carrying no
//! dot-extension. The demographics category stores under the literal `-`
//! date with `-` department.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use ssmix_model::{Hl7Timestamp, Precision};
use ssmix_standards::tables::{contains, UDT_0069_DEPARTMENT};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("invalid {field} in file name: {value:?} ({rule})")]
    FileName {
        field: &'static str,
        value: String,
        rule: &'static str,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OutputError>;

/// SS-MIX2 data categories produced by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataCategory {
    /// Patient demographics snapshot (ADT^A08).
    Adt00,
    /// Outpatient visit (ADT^A04).
    Adt12,
    /// Admission (ADT^A01).
    Adt22,
    /// Discharge (ADT^A03).
    Adt52,
    /// Diagnoses (PPR^ZD1).
    Ppr01,
    /// Prescription orders (RDE^O11).
    Omp01,
    /// Injection orders (RDE^O11).
    Omp02,
    /// Laboratory results (OUL^R22).
    Oml11,
}

impl DataCategory {
    pub fn code(&self) -> &'static str {
        match self {
            DataCategory::Adt00 => "ADT-00",
            DataCategory::Adt12 => "ADT-12",
            DataCategory::Adt22 => "ADT-22",
            DataCategory::Adt52 => "ADT-52",
            DataCategory::Ppr01 => "PPR-01",
            DataCategory::Omp01 => "OMP-01",
            DataCategory::Omp02 => "OMP-02",
            DataCategory::Oml11 => "OML-11",
        }
    }
}

/// The storage root, `<output_dir>/ssmixtwins`.
#[derive(Debug, Clone)]
pub struct SsmixRoot {
    root: PathBuf,
}

impl SsmixRoot {
    /// Creates the root directory under the output directory.
    pub fn create(output_dir: &Path) -> Result<Self> {
        let root = output_dir.join("ssmixtwins");
        fs::create_dir_all(&root).map_err(|source| OutputError::Write {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

/// Naming inputs for one stored message.
#[derive(Debug, Clone)]
pub struct MessageFile {
    pub patient_id: String,
    /// `YYYYMMDD`, or `-` for static (demographics) data.
    pub date: String,
    pub category: DataCategory,
    /// ORC-2; zero-filled to 15 digits.
    pub order_number: String,
    pub message_time: Hl7Timestamp,
    /// User table 0069 code, or `-` for demographics.
    pub department_code: String,
    /// `0`, `1` or `2`; `1` marks active data.
    pub condition_flag: String,
}

impl MessageFile {
    fn validate(&self) -> Result<()> {
        if self.patient_id.len() <= 6 || !self.patient_id.is_ascii() {
            return Err(OutputError::FileName {
                field: "patient_id",
                value: self.patient_id.clone(),
                rule: "patient ids are ASCII, longer than 6 characters",
            });
        }
        if self.date != "-" && (self.date.len() != 8 || !self.date.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(OutputError::FileName {
                field: "date",
                value: self.date.clone(),
                rule: "date is YYYYMMDD or the literal -",
            });
        }
        if self.order_number.is_empty()
            || self.order_number.len() > 15
            || !self.order_number.chars().all(|c| c.is_ascii_digit())
        {
            return Err(OutputError::FileName {
                field: "order_number",
                value: self.order_number.clone(),
                rule: "order numbers are 1-15 digits",
            });
        }
        if self.department_code != "-" && !contains(UDT_0069_DEPARTMENT, &self.department_code) {
            return Err(OutputError::FileName {
                field: "department_code",
                value: self.department_code.clone(),
                rule: "department is a user table 0069 code or the literal -",
            });
        }
        if !matches!(self.condition_flag.as_str(), "0" | "1" | "2") {
            return Err(OutputError::FileName {
                field: "condition_flag",
                value: self.condition_flag.clone(),
                rule: "condition flag is 0, 1 or 2",
            });
        }
        Ok(())
    }

    /// The file name. No extension: SS-MIX2 files carry none.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{:0>15}_{}_{}_{}",
            self.patient_id,
            self.date,
            self.category.code(),
            self.order_number,
            self.message_time.format(Precision::Milli),
            self.department_code,
            self.condition_flag,
        )
    }

    /// The bucketed path below the root.
    pub fn relative_path(&self) -> PathBuf {
        let id = &self.patient_id;
        PathBuf::from(&id[..3])
            .join(&id[3..6])
            .join(id)
            .join(&self.date)
            .join(self.category.code())
            .join(self.file_name())
    }
}

/// Writes one message, provisioning parent directories.
pub fn write_message(root: &SsmixRoot, file: &MessageFile, bytes: &[u8]) -> Result<PathBuf> {
    file.validate()?;
    let path = root.path().join(file.relative_path());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| OutputError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, bytes).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "wrote message");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_file() -> MessageFile {
        MessageFile {
            patient_id: "0010020003".into(),
            date: "20111220".into(),
            category: DataCategory::Omp01,
            order_number: "11000185".into(),
            message_time: Hl7Timestamp::parse("20111220224447339900").unwrap(),
            department_code: "01".into(),
            condition_flag: "1".into(),
        }
    }

    #[test]
    fn file_name_has_no_extension() {
        let name = message_file().file_name();
        assert_eq!(
            name,
            "0010020003_20111220_OMP-01_000000011000185_20111220224447339_01_1"
        );
        assert!(!name.contains('.'));
    }

    #[test]
    fn path_buckets_by_patient_id_prefixes() {
        let rel = message_file().relative_path();
        let parts: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        assert_eq!(parts[0], "001");
        assert_eq!(parts[1], "002");
        assert_eq!(parts[2], "0010020003");
        assert_eq!(parts[3], "20111220");
        assert_eq!(parts[4], "OMP-01");
    }

    #[test]
    fn demographics_use_dash_buckets() {
        let mut file = message_file();
        file.category = DataCategory::Adt00;
        file.date = "-".into();
        file.department_code = "-".into();
        file.order_number = "9".repeat(15);
        let rel = file.relative_path();
        assert!(rel.to_string_lossy().contains("/-/ADT-00/"));
    }

    #[test]
    fn writes_with_provisioned_parents() {
        let dir = tempfile::tempdir().unwrap();
        let root = SsmixRoot::create(dir.path()).unwrap();
        let path = write_message(&root, &message_file(), b"MSH|^~\\&|\r").unwrap();
        assert!(path.exists());
        assert_eq!(fs::read(path).unwrap(), b"MSH|^~\\&|\r");
    }

    #[test]
    fn rejects_bad_condition_flag() {
        let mut file = message_file();
        file.condition_flag = "9".into();
        let dir = tempfile::tempdir().unwrap();
        let root = SsmixRoot::create(dir.path()).unwrap();
        assert!(write_message(&root, &file, b"x").is_err());
    }
}
