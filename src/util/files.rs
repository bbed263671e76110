//! File writing helpers

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Write `contents` to `path` through a temporary file in the same directory.
///
/// The destination either keeps its previous contents or receives the full
/// new contents; a failed write never leaves a truncated file behind.
pub fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
