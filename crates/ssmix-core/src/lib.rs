//! Generation driver.
//!
//! `create_ssmix` validates the source directory, synthesizes the
//! run-constant hospital and physician pool, assigns patient ids, and
//! fans the patient slices out over a worker pool. One patient is one
//! unit of work; its RNG stream is derived from (seed, patient id), so
//! the output tree is byte-identical for any worker count.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info, warn};

use ssmix_ingest::{discover_source_files, SourceFile};
use ssmix_model::{Hospital, Physician};
use ssmix_output::SsmixRoot;
use ssmix_synth::{patient_stream, synth_hospital, synth_physician};
use ssmix_validate::validate_source_dir;

mod cancel;
mod error;
mod events;
mod ids;
mod patient;

pub use cancel::CancelToken;
pub use error::{CoreError, Result};
pub use patient::SliceOutcome;

/// Inputs of one generation run.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Directory of per-patient event tables.
    pub source_dir: PathBuf,
    /// Directory receiving `ssmixtwins/` and the validation report.
    pub output_dir: PathBuf,
    /// Worker count, at least 1.
    pub max_workers: usize,
    /// Skip the pre-flight sweep; entity construction still validates,
    /// but the first offense then aborts the slice.
    pub already_validated: bool,
    /// Global seed; everything derives from it.
    pub seed: u64,
    /// Size of the synthesized physician pool.
    pub n_physicians: usize,
}

impl CreateOptions {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            max_workers: 1,
            already_validated: false,
            seed: 0,
            n_physicians: 30,
        }
    }
}

/// A patient slice that failed; other slices are unaffected.
#[derive(Debug, Clone)]
pub struct SliceFailure {
    pub source: PathBuf,
    pub error: String,
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Messages were generated (possibly zero if the source was empty).
    Generated {
        patients: usize,
        messages: usize,
        cancelled: bool,
        failures: Vec<SliceFailure>,
    },
    /// The sweep found violations; the report was written and no message
    /// files were produced.
    ValidationFailed {
        report_path: PathBuf,
        errors: usize,
    },
}

/// Creates the synthetic SS-MIX2 store. See [`CreateOptions`].
pub fn create_ssmix(options: &CreateOptions) -> Result<RunOutcome> {
    create_ssmix_with_cancel(options, &CancelToken::new())
}

/// [`create_ssmix`] with an external cancellation signal. Cancellation is
/// observed at message boundaries; files already written remain.
pub fn create_ssmix_with_cancel(
    options: &CreateOptions,
    cancel: &CancelToken,
) -> Result<RunOutcome> {
    let files = discover_source_files(&options.source_dir)?;
    if files.is_empty() {
        warn!(dir = %options.source_dir.display(), "no CSV files in the source directory");
        return Ok(RunOutcome::Generated {
            patients: 0,
            messages: 0,
            cancelled: false,
            failures: Vec::new(),
        });
    }
    info!(files = files.len(), "found source files");

    if options.already_validated {
        info!("skipping validation, assuming the source files are already validated");
    } else {
        let report = validate_source_dir(&options.source_dir)?;
        if !report.is_empty() {
            let report_path = report.write_to(&options.output_dir)?;
            error!(
                errors = report.len(),
                report = %report_path.display(),
                "validation failed; no messages were generated"
            );
            return Ok(RunOutcome::ValidationFailed {
                errors: report.len(),
                report_path,
            });
        }
        info!("validation passed");
    }

    let (hospital, physicians) = run_constants(options.seed, options.n_physicians)?;
    let root = SsmixRoot::create(&options.output_dir)?;
    let patient_ids = {
        let mut rng = patient_stream(options.seed, "patient-id-pool");
        ids::patient_id_pool(&mut rng, files.len())
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.max_workers.max(1))
        .build()
        .map_err(|e| CoreError::Pool(e.to_string()))?;

    let ctx = patient::SharedContext {
        root: &root,
        hospital: &hospital,
        physicians: &physicians,
        cancel,
    };
    let seed = options.seed;
    let results: Vec<(PathBuf, Result<SliceOutcome>)> = pool.install(|| {
        files
            .par_iter()
            .zip(patient_ids.par_iter())
            .map(|(path, patient_id)| {
                let outcome = process_one(&ctx, path, patient_id, seed);
                (path.clone(), outcome)
            })
            .collect()
    });

    let mut messages = 0;
    let mut patients = 0;
    let mut cancelled = false;
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(outcome) => {
                patients += 1;
                messages += outcome.messages_written;
                cancelled |= outcome.cancelled;
            }
            Err(err) => {
                error!(file = %path.display(), error = %err, "patient slice failed");
                failures.push(SliceFailure {
                    source: path,
                    error: err.to_string(),
                });
            }
        }
    }
    info!(patients, messages, "generation finished");
    Ok(RunOutcome::Generated {
        patients,
        messages,
        cancelled,
        failures,
    })
}

fn process_one(
    ctx: &patient::SharedContext<'_>,
    path: &Path,
    patient_id: &str,
    seed: u64,
) -> Result<SliceOutcome> {
    let source = SourceFile::from_path(path)?;
    let mut rng = patient_stream(seed, patient_id);
    patient::process_patient(ctx, &source, patient_id, &mut rng)
}

/// The run-constant hospital and physician pool, derived from the seed.
fn run_constants(seed: u64, n_physicians: usize) -> Result<(Hospital, Vec<Physician>)> {
    let hospital = {
        let mut rng = patient_stream(seed, "hospital");
        synth_hospital(&mut rng)?
    };
    let mut physicians = Vec::with_capacity(n_physicians.max(1));
    let mut rng = patient_stream(seed, "physician-pool");
    for _ in 0..n_physicians.max(1) {
        physicians.push(synth_physician(&mut rng)?);
    }
    Ok((hospital, physicians))
}
