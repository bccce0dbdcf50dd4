//! All-or-nothing file output.

use std::path::Path;
use tempfile::NamedTempFile;

use crate::errors::Result;

/// Writes `path` through a temporary file in the same directory.
///
/// The target is only replaced once `write` succeeded, so a failed write
/// leaves any previous file untouched.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write(&mut tmp)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
