//! Two step wizard: search settings, then experimental design.
//!
//! Every user action is a transition on [`WorkflowState`] and is refused
//! when the workflow is in the wrong state, so no rendering runtime is
//! needed to enforce the order of the steps.

use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};
use tracing::info;

use crate::design_form::{
    ExperimentDesignForm,
    SaveOutcome,
};
use crate::errors::{
    LabelquantError,
    Result,
};
use crate::models::SearchConfiguration;
use crate::search_form::SearchConfigForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    CollectingSearchParams,
    SearchParamsLocked,
    CollectingDesign,
    DesignSaved,
    Completed,
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowState::CollectingSearchParams => write!(f, "collecting search parameters"),
            WorkflowState::SearchParamsLocked => write!(f, "search parameters locked"),
            WorkflowState::CollectingDesign => write!(f, "collecting the experimental design"),
            WorkflowState::DesignSaved => write!(f, "design saved"),
            WorkflowState::Completed => write!(f, "completed"),
        }
    }
}

/// Everything handed back once the workflow completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    #[serde(flatten)]
    pub settings: SearchConfiguration,
    pub exp_design: PathBuf,
}

pub type CompletionCallback = Box<dyn FnOnce(&WorkflowResult)>;

/// Caller supplied inputs. Both the label and the callback are required.
#[derive(Default)]
pub struct WorkflowInputs {
    pub completion_label: Option<String>,
    pub on_complete: Option<CompletionCallback>,
    pub work_dir: Option<PathBuf>,
}

impl WorkflowInputs {
    pub fn new(label: impl Into<String>, on_complete: impl FnOnce(&WorkflowResult) + 'static) -> Self {
        Self {
            completion_label: Some(label.into()),
            on_complete: Some(Box::new(on_complete)),
            work_dir: None,
        }
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }
}

pub struct Workflow {
    state: WorkflowState,
    completion_label: String,
    on_complete: Option<CompletionCallback>,
    search: SearchConfigForm,
    design: Option<ExperimentDesignForm>,
    design_path: Option<PathBuf>,
}

impl Workflow {
    /// Fails before anything is scanned or written if an input is missing.
    pub fn start(inputs: WorkflowInputs) -> Result<Self> {
        let completion_label = inputs
            .completion_label
            .filter(|l| !l.trim().is_empty())
            .ok_or(LabelquantError::Startup {
                missing: "completion_label",
            })?;
        let on_complete = inputs.on_complete.ok_or(LabelquantError::Startup {
            missing: "on_complete",
        })?;

        let search = match inputs.work_dir {
            Some(dir) => SearchConfigForm::with_work_dir(&dir)?,
            None => SearchConfigForm::new(),
        };
        info!("Starting workflow, completion action: '{}'", completion_label);
        Ok(Self {
            state: WorkflowState::CollectingSearchParams,
            completion_label,
            on_complete: Some(on_complete),
            search,
            design: None,
            design_path: None,
        })
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn completion_label(&self) -> &str {
        &self.completion_label
    }

    /// Whether the completion action is currently offered.
    pub fn can_complete(&self) -> bool {
        self.state == WorkflowState::DesignSaved
    }

    fn guard(&self, action: &'static str, allowed: &[WorkflowState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(LabelquantError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }

    pub fn search_form(&self) -> &SearchConfigForm {
        &self.search
    }

    /// Locked fields stay locked; the remaining fields can be edited until completion.
    pub fn search_form_mut(&mut self) -> Result<&mut SearchConfigForm> {
        self.guard(
            "edit search settings",
            &[
                WorkflowState::CollectingSearchParams,
                WorkflowState::SearchParamsLocked,
                WorkflowState::CollectingDesign,
                WorkflowState::DesignSaved,
            ],
        )?;
        Ok(&mut self.search)
    }

    pub fn lock_search_params(&mut self) -> Result<SearchConfiguration> {
        self.guard(
            "lock search settings",
            &[WorkflowState::CollectingSearchParams],
        )?;
        let conf = self.search.finalize()?;
        self.search.lock();
        self.state = WorkflowState::SearchParamsLocked;
        Ok(conf)
    }

    /// Builds the design form for the locked labeling technique.
    pub fn enter_design(&mut self) -> Result<&mut ExperimentDesignForm> {
        self.guard(
            "enter the experimental design",
            &[
                WorkflowState::CollectingSearchParams,
                WorkflowState::SearchParamsLocked,
            ],
        )?;
        if self.state == WorkflowState::CollectingSearchParams {
            self.lock_search_params()?;
        }
        let key = self.search.get_labeling_base_key()?;
        let work_dir = self
            .search
            .work_dir()
            .map(Path::to_path_buf)
            .ok_or(LabelquantError::MissingSelection("workdir"))?;
        let form = ExperimentDesignForm::new(key, &work_dir)?;
        info!(
            "Entering experimental design for {} ({} channels)",
            key,
            form.technique().channel_count()
        );
        self.state = WorkflowState::CollectingDesign;
        Ok(self.design.insert(form))
    }

    pub fn design_form(&self) -> Option<&ExperimentDesignForm> {
        self.design.as_ref()
    }

    pub fn design_form_mut(&mut self) -> Result<&mut ExperimentDesignForm> {
        self.guard(
            "edit the experimental design",
            &[WorkflowState::CollectingDesign, WorkflowState::DesignSaved],
        )?;
        self.design
            .as_mut()
            .ok_or(LabelquantError::InvalidTransition {
                action: "edit the experimental design",
                state: self.state,
            })
    }

    pub fn save_design(&mut self) -> Result<SaveOutcome> {
        let outcome = self.design_form_mut()?.save()?;
        if outcome.completion_unlocked {
            info!("'{}' is now available", self.completion_label);
        }
        self.design_path = Some(outcome.path.clone());
        self.state = WorkflowState::DesignSaved;
        Ok(outcome)
    }

    /// Collects the final settings and hands them to the completion callback.
    ///
    /// The callback runs at most once over the lifetime of the workflow.
    pub fn complete(&mut self) -> Result<WorkflowResult> {
        self.guard("complete", &[WorkflowState::DesignSaved])?;
        let settings = self.search.finalize()?;
        let exp_design = self
            .design_path
            .clone()
            .ok_or(LabelquantError::MissingSelection("exp_design"))?;
        let result = WorkflowResult {
            settings,
            exp_design,
        };

        self.state = WorkflowState::Completed;
        if let Some(callback) = self.on_complete.take() {
            callback(&result);
        }
        info!("Workflow completed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_requires_label() {
        let inputs = WorkflowInputs::new("  ", |_| {});
        assert!(matches!(
            Workflow::start(inputs),
            Err(LabelquantError::Startup {
                missing: "completion_label"
            })
        ));
    }

    #[test]
    fn test_startup_requires_callback() {
        let inputs = WorkflowInputs {
            completion_label: Some("Run".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Workflow::start(inputs),
            Err(LabelquantError::Startup {
                missing: "on_complete"
            })
        ));
    }

    #[test]
    fn test_out_of_order_actions() {
        let mut wf = Workflow::start(WorkflowInputs::new("Run", |_| {})).unwrap();
        assert_eq!(wf.state(), WorkflowState::CollectingSearchParams);
        assert!(!wf.can_complete());
        assert!(matches!(
            wf.save_design(),
            Err(LabelquantError::InvalidTransition { .. })
        ));
        assert!(matches!(
            wf.complete(),
            Err(LabelquantError::InvalidTransition { .. })
        ));
        // No working directory yet, so locking fails and the state is unchanged.
        assert!(wf.lock_search_params().is_err());
        assert_eq!(wf.state(), WorkflowState::CollectingSearchParams);
    }
}
