//! Normalized path handling for fixture workspaces

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Model paths are derived by plain string joining (`root + "/" + name`), so
/// the same inputs always produce the same path text on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and drops a trailing slash
    /// (except for the filesystem root).
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let mut normalized = path_str.replace('\\', "/");
        while normalized.len() > 1 && normalized.ends_with('/') {
            normalized.pop();
        }
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) if idx > 0 => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without a leading `~` are returned unchanged.
pub fn expand_tilde(path: impl AsRef<Path>) -> Result<NormalizedPath> {
    let raw = NormalizedPath::new(path);
    let text = raw.as_str();

    if text == "~" {
        let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        return Ok(NormalizedPath::new(home));
    }

    match text.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
            Ok(NormalizedPath::new(home).join(rest))
        }
        None => Ok(raw),
    }
}

/// Expand a leading `~`, then make the path absolute against the current
/// directory.
///
/// External commands run with varying working directories, so every path
/// handed to them must already be absolute.
pub fn resolve_root(path: impl AsRef<Path>) -> Result<NormalizedPath> {
    let expanded = expand_tilde(path)?.to_native();
    let absolute = std::path::absolute(&expanded).map_err(|e| Error::io(&expanded, e))?;
    Ok(NormalizedPath::new(absolute))
}

/// Validate that `value` can be used as a single path component.
///
/// Rejects empty values, separators, `.`/`..`, NUL bytes and a leading `_`
/// (the `_` prefix is reserved for auxiliary clones next to a working copy).
pub fn validate_path_identifier(value: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(Error::InvalidIdentifier {
            value: value.to_string(),
            reason: reason.to_string(),
        })
    };

    if value.trim().is_empty() {
        return reject("must not be empty");
    }
    if value.contains('/') || value.contains('\\') {
        return reject("must not contain path separators");
    }
    if value == "." || value == ".." {
        return reject("must not be a relative path marker");
    }
    if value.contains('\0') {
        return reject("must not contain NUL bytes");
    }
    if value.starts_with('_') {
        return reject("leading '_' is reserved for auxiliary clones");
    }
    Ok(())
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl serde::Serialize for NormalizedPath {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_dropped() {
        assert_eq!(NormalizedPath::new("/tmp/fixtures/").as_str(), "/tmp/fixtures");
        assert_eq!(NormalizedPath::new("/").as_str(), "/");
    }

    #[test]
    fn test_parent_of_top_level_dir_is_root() {
        let path = NormalizedPath::new("/tmp");
        assert_eq!(path.parent().unwrap().as_str(), "/");
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        let path = expand_tilde("/tmp/fixtures").unwrap();
        assert_eq!(path.as_str(), "/tmp/fixtures");
    }

    #[test]
    fn test_resolve_root_makes_relative_paths_absolute() {
        let path = resolve_root("fixtures").unwrap();
        assert!(path.to_native().is_absolute());
        assert!(path.as_str().ends_with("/fixtures"));
    }

    #[test]
    fn test_resolve_root_keeps_absolute_paths() {
        assert_eq!(resolve_root("/tmp/fixtures").unwrap().as_str(), "/tmp/fixtures");
    }
}
