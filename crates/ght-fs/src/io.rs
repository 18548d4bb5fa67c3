//! Destructive directory helpers and plain file writes

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// Remove whatever exists at `path` and create it again as an empty directory.
pub fn recreate_dir(path: &NormalizedPath) -> Result<()> {
    remove_tree(path)?;
    let native = path.to_native();
    fs::create_dir_all(&native).map_err(|e| Error::io(&native, e))?;
    tracing::debug!(path = %path, "Recreated directory");
    Ok(())
}

/// Recursively remove `path`.
///
/// A missing path is not an error, so calling this twice is safe.
pub fn remove_tree(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    let result = match fs::symlink_metadata(&native) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(&native),
        Ok(_) => fs::remove_file(&native),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(&native, e)),
    }
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file, replacing any previous content.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    let native_path = path.to_native();
    fs::write(&native_path, content).map_err(|e| Error::io(&native_path, e))
}

/// Append text to an existing file.
pub fn append_text(path: &NormalizedPath, content: &str) -> Result<()> {
    use std::io::Write;

    let native_path = path.to_native();
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&native_path)
        .map_err(|e| Error::io(&native_path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::io(&native_path, e))
}
