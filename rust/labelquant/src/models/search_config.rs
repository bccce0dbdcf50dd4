use serde::{
    Deserialize,
    Serialize,
};
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use tracing::info;

use super::labeling::LabelingMethod;
use super::ptms::{
    FixedPtm,
    SummarizationMethod,
    validate_variable_ptms,
};
use crate::errors::{
    LabelquantError,
    Result,
};
use crate::output::write_atomically;
use crate::scan::names_decoy;

/// Inclusive domain of a numeric search parameter.
#[derive(Debug, Clone, Copy)]
pub struct Domain {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn check(&self, value: f64) -> Result<()> {
        if value.is_nan() || value < self.min || value > self.max {
            return Err(LabelquantError::OutOfRange {
                field: self.field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

// The negative lower bound is carried over as-is, see DESIGN.md.
pub const PRECURSOR_TOLERANCE: Domain = Domain {
    field: "precursor_tolerance",
    min: -10.0,
    max: 30.0,
};
pub const FRAGMENT_TOLERANCE: Domain = Domain {
    field: "fragment_tolerance",
    min: 0.0,
    max: 200.0,
};
pub const TARGET_FDR: Domain = Domain {
    field: "target_fdr",
    min: 0.0,
    max: 1.0,
};
pub const MISSED_CLEAVAGES: Domain = Domain {
    field: "missed_cleavages",
    min: 0.0,
    max: 10.0,
};
pub const MIN_PROTEIN_PSMS: Domain = Domain {
    field: "min_protein_psms",
    min: 0.0,
    max: 10.0,
};

/// Finalized search and quantification settings.
///
/// Serialized with the key names the downstream pipeline reads, see
/// [`ConfigurationFile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ConfigurationFile", try_from = "ConfigurationFile")]
pub struct SearchConfiguration {
    pub work_dir: PathBuf,
    pub precursor_tolerance: i32,
    pub fragment_tolerance: f64,
    pub fasta_path: PathBuf,
    pub generate_decoy: bool,
    pub target_fdr: f64,
    pub labeling_method: LabelingMethod,
    pub missed_cleavages: u32,
    pub fixed_ptm: FixedPtm,
    pub variable_ptms: Vec<String>,
    pub spectra_dir: PathBuf,
    pub summarization_method: SummarizationMethod,
    pub min_protein_psms: u32,
    pub use_ptms_for_quant: bool,
}

/// On-disk layout of [`SearchConfiguration`].
///
/// `labelling` is derived from the labeling method and is ignored when
/// reading a file back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationFile {
    pub workdir: PathBuf,
    pub precursor_tolerance: i32,
    pub fragment_tolerance: f64,
    pub fasta_db: PathBuf,
    pub generate_decoy: bool,
    #[serde(default)]
    pub labelling: String,
    pub labelling_method: LabelingMethod,
    pub missed_cleavages: u32,
    pub fixed_ptms: FixedPtm,
    pub var_ptms: Vec<String>,
    pub summarization_method: SummarizationMethod,
    pub min_protein_psms: u32,
    pub use_ptms_for_quant: bool,
    pub target_fdr: f64,
    pub input_directory: PathBuf,
}

impl From<SearchConfiguration> for ConfigurationFile {
    fn from(conf: SearchConfiguration) -> Self {
        Self {
            workdir: conf.work_dir,
            precursor_tolerance: conf.precursor_tolerance,
            fragment_tolerance: conf.fragment_tolerance,
            fasta_db: conf.fasta_path,
            generate_decoy: conf.generate_decoy,
            labelling: conf.labeling_method.ptm_string(),
            labelling_method: conf.labeling_method,
            missed_cleavages: conf.missed_cleavages,
            fixed_ptms: conf.fixed_ptm,
            var_ptms: conf.variable_ptms,
            summarization_method: conf.summarization_method,
            min_protein_psms: conf.min_protein_psms,
            use_ptms_for_quant: conf.use_ptms_for_quant,
            target_fdr: conf.target_fdr,
            input_directory: conf.spectra_dir,
        }
    }
}

impl TryFrom<ConfigurationFile> for SearchConfiguration {
    type Error = LabelquantError;

    fn try_from(file: ConfigurationFile) -> Result<Self> {
        let conf = Self {
            work_dir: file.workdir,
            precursor_tolerance: file.precursor_tolerance,
            fragment_tolerance: file.fragment_tolerance,
            fasta_path: file.fasta_db,
            generate_decoy: file.generate_decoy,
            target_fdr: file.target_fdr,
            labeling_method: file.labelling_method,
            missed_cleavages: file.missed_cleavages,
            fixed_ptm: file.fixed_ptms,
            variable_ptms: file.var_ptms,
            spectra_dir: file.input_directory,
            summarization_method: file.summarization_method,
            min_protein_psms: file.min_protein_psms,
            use_ptms_for_quant: file.use_ptms_for_quant,
        };
        conf.validate()?;
        Ok(conf)
    }
}

impl SearchConfiguration {
    /// Checks every value against its domain and the labeling method against
    /// the channel catalog.
    pub fn validate(&self) -> Result<()> {
        PRECURSOR_TOLERANCE.check(self.precursor_tolerance as f64)?;
        FRAGMENT_TOLERANCE.check(self.fragment_tolerance)?;
        TARGET_FDR.check(self.target_fdr)?;
        MISSED_CLEAVAGES.check(self.missed_cleavages as f64)?;
        MIN_PROTEIN_PSMS.check(self.min_protein_psms as f64)?;
        validate_variable_ptms(&self.variable_ptms)?;
        self.labeling_method.technique()?;
        self.validate_paths()
    }

    /// Path rules the directory scan guarantees for a finalized form.
    fn validate_paths(&self) -> Result<()> {
        let invalid = |field, path: &PathBuf, reason| {
            Err(LabelquantError::InvalidPath {
                field,
                path: path.clone(),
                reason,
            })
        };
        if !self.work_dir.is_absolute() {
            return invalid("workdir", &self.work_dir, "must be absolute");
        }
        if !self.fasta_path.is_absolute() {
            return invalid("fasta_db", &self.fasta_path, "must be absolute");
        }
        let is_fasta = self
            .fasta_path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with(".fasta"));
        if !is_fasta {
            return invalid("fasta_db", &self.fasta_path, "must be a .fasta file");
        }
        if names_decoy(&self.work_dir, &self.fasta_path) {
            return invalid("fasta_db", &self.fasta_path, "must not be a decoy database");
        }
        let in_work_dir = self
            .spectra_dir
            .strip_prefix(&self.work_dir)
            .is_ok_and(|rel| rel.components().next().is_some());
        if !self.spectra_dir.is_absolute() || !in_work_dir {
            return invalid(
                "input_directory",
                &self.spectra_dir,
                "must be a subdirectory of the working directory",
            );
        }
        Ok(())
    }

    /// Writes the configuration as a single JSON object, replacing any
    /// existing file.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let mut buf = serde_json::to_vec_pretty(self)?;
        buf.push(b'\n');
        write_atomically(path, |file| Ok(file.write_all(&buf)?))?;
        info!("Wrote search configuration to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let conf: SearchConfiguration = serde_json::from_str(&content)?;
        Ok(conf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SearchConfiguration {
        SearchConfiguration {
            work_dir: PathBuf::from("/data/run"),
            precursor_tolerance: -5,
            fragment_tolerance: 0.5,
            fasta_path: PathBuf::from("/data/run/human.fasta"),
            generate_decoy: true,
            target_fdr: 0.05,
            labeling_method: LabelingMethod::Itraq4YVariable,
            missed_cleavages: 3,
            fixed_ptm: FixedPtm::None,
            variable_ptms: vec!["Oxidation of M".to_string(), "Phosphorylation of S".to_string()],
            spectra_dir: PathBuf::from("/data/run/IN"),
            summarization_method: SummarizationMethod::Ibaq,
            min_protein_psms: 1,
            use_ptms_for_quant: true,
        }
    }

    #[test]
    fn test_json_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        let mut expected = vec![
            "workdir",
            "precursor_tolerance",
            "fragment_tolerance",
            "fasta_db",
            "generate_decoy",
            "labelling",
            "labelling_method",
            "missed_cleavages",
            "fixed_ptms",
            "var_ptms",
            "summarization_method",
            "min_protein_psms",
            "use_ptms_for_quant",
            "target_fdr",
            "input_directory",
        ];
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert_eq!(
            obj["labelling"],
            "iTRAQ 4-plex of K, iTRAQ 4-plex of peptide N-term"
        );
        assert_eq!(obj["labelling_method"], "iTRAQ4 Y-variable");
        assert_eq!(obj["fixed_ptms"], "None");
        assert_eq!(obj["summarization_method"], "ibaq");
    }

    #[test]
    fn test_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let conf = sample();
        conf.persist(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(!text.ends_with("\n\n"));

        let back = SearchConfiguration::load(&path).unwrap();
        assert_eq!(back, conf);
    }

    #[test]
    fn test_persist_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "x".repeat(4096)).unwrap();
        sample().persist(&path).unwrap();
        let back = SearchConfiguration::load(&path).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_load_rejects_out_of_range() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["target_fdr"] = serde_json::json!(1.5);
        let res: std::result::Result<SearchConfiguration, _> = serde_json::from_value(value);
        let err = res.unwrap_err().to_string();
        assert!(err.contains("target_fdr"), "{}", err);
    }

    fn load_with(edit: impl FnOnce(&mut serde_json::Value)) -> Result<SearchConfiguration> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut value = serde_json::to_value(sample()).unwrap();
        edit(&mut value);
        std::fs::write(&path, value.to_string()).unwrap();
        SearchConfiguration::load(&path)
    }

    #[test]
    fn test_load_rejects_path_violations() {
        let cases: [(&str, &str); 5] = [
            ("fasta_db", "/data/run/human.txt"),
            ("fasta_db", "/data/run/decoy_human.fasta"),
            ("fasta_db", "/data/run/decoys/human.fasta"),
            ("input_directory", "/elsewhere"),
            ("input_directory", "/data/run"),
        ];
        for (key, bad) in cases {
            let res = load_with(|v| v[key] = serde_json::json!(bad));
            let err = res.unwrap_err().to_string();
            assert!(err.contains(key) && err.contains(bad), "{}", err);
        }
        assert!(load_with(|v| v["workdir"] = serde_json::json!("run")).is_err());
    }

    #[test]
    fn test_decoy_named_work_dir_is_allowed() {
        let res = load_with(|v| {
            v["workdir"] = serde_json::json!("/data/decoy_study");
            v["fasta_db"] = serde_json::json!("/data/decoy_study/human.fasta");
            v["input_directory"] = serde_json::json!("/data/decoy_study/IN");
        });
        assert!(res.is_ok());
    }

    #[test]
    fn test_domain_bounds_inclusive() {
        assert!(PRECURSOR_TOLERANCE.check(-10.0).is_ok());
        assert!(PRECURSOR_TOLERANCE.check(30.0).is_ok());
        assert!(PRECURSOR_TOLERANCE.check(31.0).is_err());
        assert!(FRAGMENT_TOLERANCE.check(f64::NAN).is_err());
    }
}
