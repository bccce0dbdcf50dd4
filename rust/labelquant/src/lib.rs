//! Search and isobaric quantification settings for SearchGUI/PeptideShaker
//! runs followed by TMT/iTRAQ protein quantification.
//!
//! The crate holds the state behind a two step setup: search settings are
//! collected with [`SearchConfigForm`], the channel to sample assignment
//! with [`ExperimentDesignForm`], and [`Workflow`] enforces the order of the
//! two. The outputs are a JSON configuration and a TSV design table.

pub mod design_form;
pub mod errors;
pub mod models;
pub mod output;
pub mod scan;
pub mod search_form;
pub mod workflow;

pub use design_form::{
    ExperimentDesignForm,
    SaveOutcome,
};
pub use errors::LabelquantError;
pub use models::{
    ExperimentDesignRecord,
    FixedPtm,
    GroupToken,
    LabelingMethod,
    SearchConfiguration,
    SummarizationMethod,
    Technique,
};
pub use search_form::SearchConfigForm;
pub use workflow::{
    Workflow,
    WorkflowInputs,
    WorkflowResult,
    WorkflowState,
};
