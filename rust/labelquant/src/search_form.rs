use std::path::{
    Path,
    PathBuf,
};
use tracing::{
    debug,
    info,
};

use crate::errors::{
    LabelquantError,
    Result,
};
use crate::models::search_config::{
    FRAGMENT_TOLERANCE,
    MIN_PROTEIN_PSMS,
    MISSED_CLEAVAGES,
    PRECURSOR_TOLERANCE,
    TARGET_FDR,
};
use crate::models::{
    DEFAULT_VARIABLE_PTM,
    FixedPtm,
    LabelingMethod,
    SearchConfiguration,
    SummarizationMethod,
    Technique,
};
use crate::scan::{
    ScanResult,
    scan_work_dir,
};

/// Live values of the search settings screen.
///
/// Setters validate their input right away. The working directory and the
/// labeling method can be locked, after which their setters fail instead
/// of silently ignoring the change.
#[derive(Debug, Clone)]
pub struct SearchConfigForm {
    work_dir: Option<PathBuf>,
    candidates: ScanResult,
    fasta_path: Option<PathBuf>,
    spectra_dir: Option<PathBuf>,
    precursor_tolerance: i32,
    fragment_tolerance: f64,
    generate_decoy: bool,
    target_fdr: f64,
    labeling_method: LabelingMethod,
    missed_cleavages: u32,
    fixed_ptm: FixedPtm,
    variable_ptms: Vec<String>,
    summarization_method: SummarizationMethod,
    min_protein_psms: u32,
    use_ptms_for_quant: bool,
    locked: bool,
}

impl Default for SearchConfigForm {
    fn default() -> Self {
        Self {
            work_dir: None,
            candidates: ScanResult::default(),
            fasta_path: None,
            spectra_dir: None,
            precursor_tolerance: 10,
            fragment_tolerance: 0.02,
            generate_decoy: true,
            target_fdr: 0.01,
            labeling_method: LabelingMethod::default(),
            missed_cleavages: 2,
            fixed_ptm: FixedPtm::default(),
            variable_ptms: vec![DEFAULT_VARIABLE_PTM.to_string()],
            summarization_method: SummarizationMethod::default(),
            min_protein_psms: 2,
            use_ptms_for_quant: false,
            locked: false,
        }
    }
}

impl SearchConfigForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a form rooted at `work_dir` with its candidates already scanned.
    pub fn with_work_dir(work_dir: &Path) -> Result<Self> {
        let mut form = Self::new();
        form.set_work_dir(work_dir)?;
        Ok(form)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn ensure_unlocked(&self, field: &'static str) -> Result<()> {
        if self.locked {
            return Err(LabelquantError::FieldLocked(field));
        }
        Ok(())
    }

    pub fn set_work_dir(&mut self, path: &Path) -> Result<()> {
        self.ensure_unlocked("workdir")?;
        let path = std::fs::canonicalize(path)?;
        info!("Working directory set to {}", path.display());
        self.scan_into(&path)?;
        self.work_dir = Some(path);
        Ok(())
    }

    /// Re-reads the candidate lists of the current working directory and
    /// resets both selections to their defaults.
    ///
    /// Allowed after the lock, since it can only ever pick entries below the
    /// locked working directory.
    pub fn rescan(&mut self) -> Result<()> {
        let path = self
            .work_dir
            .clone()
            .ok_or(LabelquantError::MissingSelection("workdir"))?;
        self.scan_into(&path)
    }

    fn scan_into(&mut self, path: &Path) -> Result<()> {
        let candidates = scan_work_dir(path)?;
        self.fasta_path = candidates.default_fasta().cloned();
        self.spectra_dir = candidates.default_spectra_dir().cloned();
        debug!(
            "Default selections after scan: fasta={:?} spectra={:?}",
            self.fasta_path, self.spectra_dir
        );
        self.candidates = candidates;
        Ok(())
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    pub fn fasta_candidates(&self) -> &[PathBuf] {
        &self.candidates.fasta_candidates
    }

    pub fn spectra_dir_candidates(&self) -> &[PathBuf] {
        &self.candidates.spectra_dir_candidates
    }

    pub fn fasta_path(&self) -> Option<&Path> {
        self.fasta_path.as_deref()
    }

    pub fn spectra_dir(&self) -> Option<&Path> {
        self.spectra_dir.as_deref()
    }

    pub fn labeling_method(&self) -> LabelingMethod {
        self.labeling_method
    }

    /// Selects a database; relative paths are resolved against the working directory.
    pub fn select_fasta(&mut self, path: &Path) -> Result<()> {
        let path = self.resolve(path);
        if !self.candidates.fasta_candidates.contains(&path) {
            return Err(LabelquantError::NotACandidate {
                field: "fasta_db",
                path,
            });
        }
        self.fasta_path = Some(path);
        Ok(())
    }

    pub fn select_spectra_dir(&mut self, path: &Path) -> Result<()> {
        let path = self.resolve(path);
        if !self.candidates.spectra_dir_candidates.contains(&path) {
            return Err(LabelquantError::NotACandidate {
                field: "input_directory",
                path,
            });
        }
        self.spectra_dir = Some(path);
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.work_dir {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn set_precursor_tolerance(&mut self, ppm: i32) -> Result<()> {
        PRECURSOR_TOLERANCE.check(ppm as f64)?;
        self.precursor_tolerance = ppm;
        Ok(())
    }

    pub fn set_fragment_tolerance(&mut self, da: f64) -> Result<()> {
        FRAGMENT_TOLERANCE.check(da)?;
        self.fragment_tolerance = da;
        Ok(())
    }

    pub fn set_generate_decoy(&mut self, generate: bool) {
        self.generate_decoy = generate;
    }

    pub fn set_target_fdr(&mut self, fdr: f64) -> Result<()> {
        TARGET_FDR.check(fdr)?;
        self.target_fdr = fdr;
        Ok(())
    }

    pub fn set_labeling_method(&mut self, method: LabelingMethod) -> Result<()> {
        self.ensure_unlocked("labelling_method")?;
        self.labeling_method = method;
        Ok(())
    }

    pub fn set_missed_cleavages(&mut self, n: u32) -> Result<()> {
        MISSED_CLEAVAGES.check(n as f64)?;
        self.missed_cleavages = n;
        Ok(())
    }

    pub fn set_fixed_ptm(&mut self, ptm: FixedPtm) {
        self.fixed_ptm = ptm;
    }

    pub fn set_variable_ptms<S: AsRef<str>>(&mut self, ptms: &[S]) -> Result<()> {
        self.variable_ptms = crate::models::ptms::validate_variable_ptms(ptms)?;
        Ok(())
    }

    pub fn set_summarization_method(&mut self, method: SummarizationMethod) {
        self.summarization_method = method;
    }

    pub fn set_min_protein_psms(&mut self, n: u32) -> Result<()> {
        MIN_PROTEIN_PSMS.check(n as f64)?;
        self.min_protein_psms = n;
        Ok(())
    }

    pub fn set_use_ptms_for_quant(&mut self, use_ptms: bool) {
        self.use_ptms_for_quant = use_ptms;
    }

    /// Key of the selected labeling method in the channel catalog.
    pub fn get_labeling_base_key(&self) -> Result<&'static str> {
        let key = self.labeling_method.base_key();
        Technique::from_key(key)?;
        Ok(key)
    }

    /// Snapshot of the current values.
    ///
    /// Can be called any number of times; it never changes the form.
    pub fn finalize(&self) -> Result<SearchConfiguration> {
        let work_dir = self
            .work_dir
            .clone()
            .ok_or(LabelquantError::MissingSelection("workdir"))?;
        let fasta_path = self
            .fasta_path
            .clone()
            .ok_or(LabelquantError::MissingSelection("fasta_db"))?;
        let spectra_dir = self
            .spectra_dir
            .clone()
            .ok_or(LabelquantError::MissingSelection("input_directory"))?;

        let conf = SearchConfiguration {
            work_dir,
            precursor_tolerance: self.precursor_tolerance,
            fragment_tolerance: self.fragment_tolerance,
            fasta_path,
            generate_decoy: self.generate_decoy,
            target_fdr: self.target_fdr,
            labeling_method: self.labeling_method,
            missed_cleavages: self.missed_cleavages,
            fixed_ptm: self.fixed_ptm,
            variable_ptms: self.variable_ptms.clone(),
            spectra_dir,
            summarization_method: self.summarization_method,
            min_protein_psms: self.min_protein_psms,
            use_ptms_for_quant: self.use_ptms_for_quant,
        };
        conf.validate()?;
        Ok(conf)
    }

    /// Disables editing of the working directory and labeling method.
    pub fn lock(&mut self) {
        if !self.locked {
            info!(
                "Locking working directory and labeling method ({})",
                self.labeling_method.display_name()
            );
        }
        self.locked = true;
    }
}
