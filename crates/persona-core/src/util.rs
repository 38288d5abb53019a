//! Utility functions for Persona

use std::fs;
use std::io::Write;
use std::path::Path;

/// Write `bytes` to `path` using a write-then-atomic-rename pattern.
///
/// The content is first written to a temporary file in the target's
/// directory, flushed, then renamed over the target. A reader can never
/// observe a partially written file: on any failure the temporary file is
/// removed and the previous target content is left untouched. Missing
/// parent directories are created.
///
/// # Errors
/// Returns an error if the directory cannot be created, the temporary file
/// cannot be written, or the rename fails.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    // persist() renames over the target; dropping the PersistError removes
    // the temporary file.
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
