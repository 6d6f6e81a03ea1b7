#![deny(unsafe_code)]

//! CLI for the synthetic SS-MIX2 store generator.
//!
//! Exit code 0 means the store was generated; non-zero means validation
//! failed (details in `validation_errors.json`) or a worker hit an I/O
//! error (details on stderr).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use ssmix_core::{create_ssmix, CreateOptions, RunOutcome};

#[derive(Debug, Parser)]
#[command(name = "ssmixtwins")]
#[command(about = "Generate a synthetic SS-MIX2 store from per-patient event tables")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the source directory and, when clean, generate the store.
    Generate {
        /// Directory of per-patient event CSV files.
        source_dir: PathBuf,

        /// Directory receiving the ssmixtwins/ tree.
        #[arg(long, value_name = "DIR")]
        output_dir: PathBuf,

        /// Worker count; one patient per worker task.
        #[arg(long, default_value_t = 1)]
        max_workers: usize,

        /// Skip the pre-flight sweep (inputs were validated earlier).
        #[arg(long)]
        already_validated: bool,

        /// Global seed; identical seeds reproduce the store byte for byte.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Size of the synthesized physician pool.
        #[arg(long, default_value_t = 30)]
        n_physicians: usize,
    },

    /// Run only the validation sweep and write the report if it fails.
    Validate {
        /// Directory of per-patient event CSV files.
        source_dir: PathBuf,

        /// Directory receiving validation_errors.json on failure.
        #[arg(long, value_name = "DIR")]
        output_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            source_dir,
            output_dir,
            max_workers,
            already_validated,
            seed,
            n_physicians,
        } => {
            let options = CreateOptions {
                source_dir,
                output_dir,
                max_workers: max_workers.max(1),
                already_validated,
                seed,
                n_physicians,
            };
            match create_ssmix(&options)? {
                RunOutcome::Generated {
                    patients,
                    messages,
                    cancelled,
                    failures,
                } => {
                    println!("generated {messages} messages for {patients} patients");
                    if cancelled {
                        println!("run was cancelled; partial output at patient boundaries");
                    }
                    if !failures.is_empty() {
                        for failure in &failures {
                            eprintln!("failed: {}: {}", failure.source.display(), failure.error);
                        }
                        return Ok(ExitCode::FAILURE);
                    }
                    Ok(ExitCode::SUCCESS)
                }
                RunOutcome::ValidationFailed { report_path, errors } => {
                    eprintln!(
                        "validation failed with {errors} error(s); see {}",
                        report_path.display()
                    );
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Validate {
            source_dir,
            output_dir,
        } => {
            let report = ssmix_validate::validate_source_dir(&source_dir)?;
            if report.is_empty() {
                println!("no errors found");
                Ok(ExitCode::SUCCESS)
            } else {
                let path = report.write_to(&output_dir)?;
                eprintln!(
                    "found {} error(s); report written to {}",
                    report.len(),
                    path.display()
                );
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
