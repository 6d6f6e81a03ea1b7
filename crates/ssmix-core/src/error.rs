use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validate(#[from] ssmix_validate::ValidateError),

    #[error(transparent)]
    Ingest(#[from] ssmix_ingest::IngestError),

    #[error(transparent)]
    Model(#[from] ssmix_model::ModelError),

    #[error(transparent)]
    Message(#[from] ssmix_messages::MessageError),

    #[error(transparent)]
    Output(#[from] ssmix_output::OutputError),

    #[error("worker pool: {0}")]
    Pool(String),

    #[error("{path}: {rule}")]
    Source { path: PathBuf, rule: String },
}

impl CoreError {
    pub fn source(path: impl Into<PathBuf>, rule: impl Into<String>) -> Self {
        CoreError::Source {
            path: path.into(),
            rule: rule.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
