use labelquant::LabelquantError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Setup(#[from] LabelquantError),

    #[error("Workflow completed without writing the search configuration")]
    NotPersisted,
}
