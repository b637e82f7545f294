use std::fs;
use std::io::{self, Write};
use std::path::Path;

use agent_filter_core::render_accepted;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Replaces `path` with one identity per line.
///
/// Content goes to a temp file next to the target that is then renamed over it,
/// so a failed write leaves the previous file untouched.
pub fn write_accepted(path: &Path, identities: &[String]) -> Result<(), PersistError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;
    if path.is_dir() {
        return Err(PersistError::OutputDir(format!(
            "{} is a directory",
            path.display()
        )));
    }

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(render_accepted(identities).as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))
}
