use crate::error::TallyError;
use std::fs;
use std::path::Path;

/// Read the ordered document list: one identifier per line of a UTF-8 file.
/// Blank lines are skipped; order is preserved.
pub fn read_documents(path: &Path) -> Result<Vec<String>, TallyError> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
