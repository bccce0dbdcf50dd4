use labelquant::scan::scan_work_dir;
use labelquant::{
    LabelquantError,
    Technique,
    Workflow,
    WorkflowInputs,
    WorkflowResult,
};
use std::cell::RefCell;
use std::fs::File;
use std::io::{
    BufWriter,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use std::rc::Rc;
use tracing::{
    info,
    instrument,
    warn,
};

use crate::cli::{
    RunArgs,
    ScanArgs,
    WriteTemplateArgs,
};
use crate::config::{
    DesignInput,
    SearchParams,
    read_json,
};
use crate::error::CliError;

pub const COMPLETION_LABEL: &str = "Run search";

fn write_pretty_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<(), CliError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Main function for the 'write-template' subcommand.
pub fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    std::fs::create_dir_all(&args.output_path)?;
    let params_path = args.output_path.join("search_params.json");
    let design_path = args.output_path.join("design.json");

    write_pretty_json(&SearchParams::template(), &params_path)?;
    write_pretty_json(&DesignInput::template(Technique::Tmt10), &design_path)?;
    info!(
        "Wrote templates to {} and {}",
        params_path.display(),
        design_path.display()
    );
    Ok(())
}

/// Main function for the 'scan' subcommand.
#[instrument]
pub fn main_scan(args: ScanArgs) -> Result<(), CliError> {
    let res = scan_work_dir(&args.work_dir)?;
    if res.fasta_candidates.is_empty() {
        warn!("No usable FASTA database found in {}", args.work_dir.display());
    }
    println!("FASTA databases:");
    for (i, path) in res.fasta_candidates.iter().enumerate() {
        let marker = if i == 0 { "*" } else { " " };
        println!("  {} {}", marker, path.display());
    }
    let default_dir = res.default_spectra_dir();
    println!("Spectra folders:");
    for path in &res.spectra_dir_candidates {
        let marker = if Some(path) == default_dir { "*" } else { " " };
        println!("  {} {}", marker, path.display());
    }
    Ok(())
}

type PersistSlot = Rc<RefCell<Option<Result<PathBuf, LabelquantError>>>>;

/// Completion callback: writes the configuration into the working directory
/// and prints the final settings. The outcome of the write lands in `slot`.
fn persist_on_complete(
    config_name: String,
    slot: PersistSlot,
) -> impl FnOnce(&WorkflowResult) + 'static {
    move |result: &WorkflowResult| {
        let config_path = result.settings.work_dir.join(&config_name);
        let written = result
            .settings
            .persist(&config_path)
            .map(|_| config_path);
        if written.is_ok() {
            match serde_json::to_string_pretty(result) {
                Ok(json) => println!("{}", json),
                Err(e) => warn!("Unable to print final settings: {}", e),
            }
        }
        *slot.borrow_mut() = Some(written);
    }
}

/// Main function for the 'run' subcommand.
///
/// Returns the configuration path and the final settings.
#[instrument]
pub fn main_run(args: RunArgs) -> Result<(PathBuf, WorkflowResult), CliError> {
    let params: SearchParams = match &args.params {
        Some(path) => read_json(path)?,
        None => SearchParams::default(),
    };
    let design: DesignInput = match &args.design {
        Some(path) => read_json(path)?,
        None => DesignInput::default(),
    };

    let slot: PersistSlot = Rc::new(RefCell::new(None));
    let on_complete = persist_on_complete(args.config_name.clone(), slot.clone());
    let inputs = WorkflowInputs::new(COMPLETION_LABEL, on_complete).with_work_dir(&args.work_dir);
    let mut workflow = Workflow::start(inputs)?;

    params.apply(workflow.search_form_mut()?)?;
    let locked = workflow.lock_search_params()?;
    info!("Search settings: {:#?}", locked);

    design.apply(workflow.enter_design()?)?;
    workflow.save_design()?;

    let result = workflow.complete()?;
    let written = slot.borrow_mut().take();
    let config_path = written.ok_or(CliError::NotPersisted)??;
    Ok((config_path, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelquant::SearchConfiguration;
    use std::fs;

    fn work_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("uniprot.fasta"), ">sp\nPEPTIDEK\n").unwrap();
        fs::create_dir(dir.path().join("IN")).unwrap();
        dir
    }

    #[test]
    fn test_templates_parse_back() {
        let dir = tempfile::tempdir().unwrap();
        main_write_template(WriteTemplateArgs {
            output_path: dir.path().to_path_buf(),
        })
        .unwrap();
        let params: SearchParams = read_json(&dir.path().join("search_params.json")).unwrap();
        assert_eq!(params.target_fdr, Some(0.01));
        let design: DesignInput = read_json(&dir.path().join("design.json")).unwrap();
        assert_eq!(design.channels.len(), 10);
    }

    #[test]
    fn test_run_writes_both_outputs() {
        let dir = work_dir();
        let params_path = dir.path().join("params.json");
        fs::write(
            &params_path,
            r#"{"labelling_method": "TMT6", "missed_cleavages": 1}"#,
        )
        .unwrap();

        let (config_path, result) = main_run(RunArgs {
            work_dir: dir.path().to_path_buf(),
            params: Some(params_path),
            design: None,
            config_name: "search_settings.json".to_string(),
        })
        .unwrap();

        let loaded = SearchConfiguration::load(&config_path).unwrap();
        assert_eq!(loaded, result.settings);
        assert_eq!(loaded.missed_cleavages, 1);
        let tsv = fs::read_to_string(&result.exp_design).unwrap();
        assert_eq!(tsv.lines().count(), 7);
        assert!(result.exp_design.ends_with("OUT/exp_design.tsv"));
    }

    #[test]
    fn test_completion_callback_writes_config() {
        let dir = work_dir();
        let (_, result) = main_run(RunArgs {
            work_dir: dir.path().to_path_buf(),
            params: None,
            design: None,
            config_name: "first.json".to_string(),
        })
        .unwrap();

        // Invoking the callback on its own is enough to get the file.
        let slot: PersistSlot = Rc::new(RefCell::new(None));
        persist_on_complete("second.json".to_string(), slot.clone())(&result);
        let written = slot.borrow_mut().take().unwrap().unwrap();
        assert_eq!(written, result.settings.work_dir.join("second.json"));
        assert_eq!(SearchConfiguration::load(&written).unwrap(), result.settings);
    }

    #[test]
    fn test_run_reports_failed_config_write() {
        let dir = work_dir();
        let err = main_run(RunArgs {
            work_dir: dir.path().to_path_buf(),
            params: None,
            design: None,
            config_name: "missing/settings.json".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Setup(LabelquantError::Io(_))));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_run_rejects_out_of_range_params() {
        let dir = work_dir();
        let params_path = dir.path().join("params.json");
        fs::write(&params_path, r#"{"precursor_tolerance": 50}"#).unwrap();
        let err = main_run(RunArgs {
            work_dir: dir.path().to_path_buf(),
            params: Some(params_path),
            design: None,
            config_name: "search_settings.json".to_string(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("precursor_tolerance"));
        assert!(!dir.path().join("OUT").exists());
    }
}
