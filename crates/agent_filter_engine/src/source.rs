use std::fs;
use std::path::Path;

use agent_filter_core::parse_candidates;

use crate::RunError;

/// Reads a line-delimited candidate file, dropping blank lines.
pub fn load_candidates(path: &Path) -> Result<Vec<String>, RunError> {
    load_with_blank_count(path).map(|(candidates, _)| candidates)
}

/// Like [`load_candidates`], also returning how many blank lines were dropped.
pub(crate) fn load_with_blank_count(path: &Path) -> Result<(Vec<String>, usize), RunError> {
    let raw = fs::read_to_string(path).map_err(|source| RunError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let candidates = parse_candidates(&raw);
    let blank = raw.lines().count() - candidates.len();
    Ok((candidates, blank))
}
