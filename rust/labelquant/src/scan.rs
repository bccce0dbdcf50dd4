//! Discovery of FASTA databases and spectra folders under a working directory.

use std::path::{
    Path,
    PathBuf,
};
use tracing::debug;

use crate::errors::Result;

/// Name of the spectra folder picked by default when present.
pub const DEFAULT_SPECTRA_DIR_NAME: &str = "IN";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Absolute paths, top level files first, then one level of subdirectories.
    pub fasta_candidates: Vec<PathBuf>,
    /// Absolute paths of the non-hidden direct subdirectories.
    pub spectra_dir_candidates: Vec<PathBuf>,
}

impl ScanResult {
    pub fn default_fasta(&self) -> Option<&PathBuf> {
        self.fasta_candidates.first()
    }

    pub fn default_spectra_dir(&self) -> Option<&PathBuf> {
        self.spectra_dir_candidates
            .iter()
            .find(|p| p.file_name().is_some_and(|n| n == DEFAULT_SPECTRA_DIR_NAME))
            .or_else(|| self.spectra_dir_candidates.first())
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_hidden(path: &Path) -> bool {
    file_name_lossy(path).starts_with('.')
}

/// Whether `path` mentions "decoy" below `root`.
///
/// Only the part relative to `root` is checked, so a working directory
/// whose own name contains "decoy" is still usable. Paths outside of
/// `root` are checked in full.
pub fn names_decoy(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().contains("decoy")
}

/// A FASTA database usable as the target database.
///
/// Decoy databases are generated by the search tool itself, so files that
/// already carry "decoy" in their path are never offered.
pub fn is_fasta_candidate(root: &Path, path: &Path) -> bool {
    file_name_lossy(path).ends_with(".fasta") && !names_decoy(root, path)
}

/// Directory entries sorted by path, so results do not depend on the
/// order the filesystem lists them in.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

fn fasta_files_in(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for path in sorted_entries(dir)? {
        if path.is_file() && is_fasta_candidate(root, &path) {
            out.push(path);
        }
    }
    Ok(())
}

/// Scans `work_dir` and its direct subdirectories.
///
/// Filesystem errors are returned as-is, nothing is retried.
pub fn scan_work_dir(work_dir: &Path) -> Result<ScanResult> {
    let root = std::fs::canonicalize(work_dir)?;
    let mut result = ScanResult::default();

    fasta_files_in(&root, &root, &mut result.fasta_candidates)?;

    for path in sorted_entries(&root)? {
        if !path.is_dir() || is_hidden(&path) {
            continue;
        }
        fasta_files_in(&root, &path, &mut result.fasta_candidates)?;
        result.spectra_dir_candidates.push(path);
    }

    debug!(
        "Scanned {}: {} fasta candidates, {} spectra folders",
        root.display(),
        result.fasta_candidates.len(),
        result.spectra_dir_candidates.len()
    );
    Ok(result)
}
