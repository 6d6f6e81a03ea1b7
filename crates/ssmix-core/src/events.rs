//! Parsed clinical events and patient-level derivations.

use chrono::Duration;

use ssmix_ingest::{EventKind, EventRow, SourceFile};
use ssmix_model::{Hl7Timestamp, Precision};

use crate::error::{CoreError, Result};

/// One event with its timestamp parsed, ready for ordered emission.
#[derive(Debug, Clone)]
pub struct ClinicalEvent {
    pub timestamp: Hl7Timestamp,
    pub kind: EventKind,
    pub row: EventRow,
}

/// Patient-level facts derived from the rows before synthesis.
#[derive(Debug, Clone)]
pub struct PatientFacts {
    /// `YYYYMMDD`.
    pub dob: String,
    /// Age at the latest event.
    pub latest_age: u32,
    pub latest_date: Hl7Timestamp,
    pub death_date: String,
}

/// Parses and sorts the rows by (timestamp, event precedence), the order
/// messages are emitted and written in.
pub fn parse_events(source: &SourceFile, rows: Vec<EventRow>) -> Result<Vec<ClinicalEvent>> {
    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        let timestamp = Hl7Timestamp::parse(&row.timestamp).map_err(|_| {
            CoreError::source(
                &source.path,
                format!("row {}: unparseable timestamp {:?}", row.row_number, row.timestamp),
            )
        })?;
        let kind = row.kind().ok_or_else(|| {
            CoreError::source(
                &source.path,
                format!("row {}: invalid event type {:?}", row.row_number, row.kind_code),
            )
        })?;
        events.push(ClinicalEvent {
            timestamp,
            kind,
            row,
        });
    }
    events.sort_by(|a, b| {
        (a.timestamp, a.kind.precedence()).cmp(&(b.timestamp, b.kind.precedence()))
    });
    Ok(events)
}

/// Derives birth/death dates and the latest age. An explicit `dob`
/// column wins; otherwise the birth date is the oldest event date minus
/// the file-name age.
pub fn derive_facts(source: &SourceFile, events: &[ClinicalEvent]) -> Result<PatientFacts> {
    let oldest = events
        .first()
        .map(|e| e.timestamp)
        .ok_or_else(|| CoreError::source(&source.path, "event table is empty"))?;
    let latest = events.last().map(|e| e.timestamp).unwrap_or(oldest);

    let explicit_dob = events
        .iter()
        .map(|e| e.row.dob.as_str())
        .find(|dob| !dob.is_empty());
    let dob = match explicit_dob {
        Some(value) => Hl7Timestamp::parse(value)
            .map_err(|_| {
                CoreError::source(&source.path, format!("unparseable dob {value:?}"))
            })?
            .format(Precision::Day),
        None => {
            let days = (f64::from(source.age) * 365.25).ceil() as i64;
            oldest.shifted(Duration::days(-days)).format(Precision::Day)
        }
    };
    let dob_ts = Hl7Timestamp::parse(&dob).map_err(|_| {
        CoreError::source(&source.path, format!("derived dob {dob:?} is not a date"))
    })?;
    let latest_age = ((latest.date() - dob_ts.date()).num_days() as f64 / 365.25).floor() as u32;

    let death_date = events
        .iter()
        .map(|e| e.row.dod.as_str())
        .find(|dod| !dod.is_empty())
        .unwrap_or("")
        .to_string();

    Ok(PatientFacts {
        dob,
        latest_age,
        latest_date: latest,
        death_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn source() -> SourceFile {
        SourceFile {
            path: Path::new("64_M_test.csv").to_path_buf(),
            age: 64,
            sex: ssmix_model::Sex::Male,
        }
    }

    fn row(timestamp: &str, kind: &str) -> EventRow {
        EventRow {
            timestamp: timestamp.to_string(),
            kind_code: kind.to_string(),
            ..EventRow::default()
        }
    }

    #[test]
    fn events_sort_by_time_then_precedence() {
        let rows = vec![
            row("20200101120000000000", "1"),
            row("20200101120000000000", "0"),
            row("20200101080000000000", "3"),
        ];
        let events = parse_events(&source(), rows).unwrap();
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [EventKind::Prescription, EventKind::Admission, EventKind::Discharge]
        );
    }

    #[test]
    fn facts_derive_dob_from_age_when_absent() {
        let rows = vec![row("20200101120000000000", "3")];
        let events = parse_events(&source(), rows).unwrap();
        let facts = derive_facts(&source(), &events).unwrap();
        assert_eq!(facts.dob, "19560101");
        assert_eq!(facts.latest_age, 63);
    }

    #[test]
    fn explicit_dob_wins() {
        let mut with_dob = row("20200101120000000000", "3");
        with_dob.dob = "19600215".into();
        let events = parse_events(&source(), vec![with_dob]).unwrap();
        let facts = derive_facts(&source(), &events).unwrap();
        assert_eq!(facts.dob, "19600215");
        assert_eq!(facts.latest_age, 59);
    }
}
