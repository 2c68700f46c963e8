use std::path::Path;

use eyre::{Result, WrapErr, bail};
use tracing::debug;

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File did not exist and was created
    Created,
    /// Existing file was truncated and rewritten
    Overwritten,
    /// Existing file already had the same content
    Unchanged,
}

/// Write `content` to `path`, creating missing parent directories.
///
/// Existing files are overwritten. A path that points at an existing
/// directory is an error.
pub fn write_file(path: &Path, content: &str) -> Result<WriteResult> {
    if path.as_os_str().is_empty() {
        bail!("cannot write file with an empty path");
    }

    if path.is_dir() {
        bail!("cannot write file `{}`: path is a directory", path.display());
    }

    let existed = path.exists();
    if existed {
        let current = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read `{}`", path.display()))?;
        if current == content {
            debug!(path = %path.display(), "file unchanged");
            return Ok(WriteResult::Unchanged);
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create directory `{}`", parent.display()))?;
    }

    std::fs::write(path, content)
        .wrap_err_with(|| format!("failed to write `{}`", path.display()))?;
    debug!(path = %path.display(), bytes = content.len(), "wrote file");

    if existed {
        Ok(WriteResult::Overwritten)
    } else {
        Ok(WriteResult::Created)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.go");

        let result = write_file(&path, "package p\n").unwrap();

        assert_eq!(result, WriteResult::Created);
        assert_eq!(fs::read_to_string(&path).unwrap(), "package p\n");
    }

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("c").join("test.go");

        write_file(&path, "nested").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_write_file_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.go");

        write_file(&path, "first and longer").unwrap();
        let result = write_file(&path, "second").unwrap();

        assert_eq!(result, WriteResult::Overwritten);
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_file_same_content_is_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.go");

        write_file(&path, "same").unwrap();
        let result = write_file(&path, "same").unwrap();

        assert_eq!(result, WriteResult::Unchanged);
    }

    #[test]
    fn test_write_file_rejects_directory() {
        let temp = TempDir::new().unwrap();

        let err = write_file(temp.path(), "content").unwrap_err();

        assert!(err.to_string().contains("is a directory"));
    }

    #[test]
    fn test_write_file_rejects_empty_path() {
        let err = write_file(Path::new(""), "content").unwrap_err();
        assert!(err.to_string().contains("empty path"));
    }
}
