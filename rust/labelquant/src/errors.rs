use std::path::PathBuf;
use thiserror::Error;

use crate::workflow::WorkflowState;

#[derive(Error, Debug)]
pub enum LabelquantError {
    #[error("Missing required workflow input: {missing}")]
    Startup { missing: &'static str },

    #[error("Unrecognized labeling technique '{0}', expected one of TMT6, TMT10, iTRAQ4, iTRAQ8")]
    UnknownTechnique(String),

    #[error("Unrecognized labeling method '{0}'")]
    UnknownLabelingMethod(String),

    #[error("Unrecognized summarization method '{0}', expected one of median, average, top3, ibaq")]
    UnknownSummarization(String),

    #[error("Unrecognized fixed modification '{0}'")]
    UnknownFixedPtm(String),

    #[error("Value {value} for '{field}' is outside of [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("'{}' is not a candidate for '{field}'", .path.display())]
    NotACandidate { field: &'static str, path: PathBuf },

    #[error("Invalid path '{}' for '{field}': {reason}", .path.display())]
    InvalidPath {
        field: &'static str,
        path: PathBuf,
        reason: &'static str,
    },

    #[error("No value selected for '{0}'")]
    MissingSelection(&'static str),

    #[error("Field '{0}' is locked and can no longer be edited")]
    FieldLocked(&'static str),

    #[error("Channel '{channel}' does not exist for technique {technique}")]
    UnknownChannel {
        channel: String,
        technique: &'static str,
    },

    #[error("Unknown variable modification '{0}'")]
    UnknownPtm(String),

    #[error("At least one variable modification must be selected")]
    EmptyVariablePtms,

    #[error("Cannot {action} while the workflow is {state}")]
    InvalidTransition {
        action: &'static str,
        state: WorkflowState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, LabelquantError>;
