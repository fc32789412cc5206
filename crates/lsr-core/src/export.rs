//! Plain-text report export.
//!
//! The report is written to a sibling temp file and renamed into place, so
//! a failed export never leaves a truncated report behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use lsr_common::{Error, Result};

/// Resolve the file an export should write.
///
/// An existing directory gets `file_name` appended; anything else is used
/// as given.
pub fn resolve_export_path(target: &Path, file_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(file_name)
    } else {
        target.to_path_buf()
    }
}

/// Write report text to `target`, returning the path written.
///
/// Fails with [`Error::EmptyReport`] when there is nothing to export.
pub fn export_report(text: &str, target: &Path, file_name: &str) -> Result<PathBuf> {
    if text.trim().is_empty() {
        return Err(Error::EmptyReport);
    }

    let path = resolve_export_path(target, file_name);
    let tmp_name = format!(
        "{}.tmp.{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(lsr_config::settings::DEFAULT_EXPORT_FILE_NAME),
        std::process::id()
    );
    let tmp_path = path.with_file_name(tmp_name);

    let written = (|| -> std::io::Result<()> {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        let _ = file.sync_all();
        std::fs::rename(&tmp_path, &path)
    })();

    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(Error::Io(e));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_into_directory_uses_file_name() {
        let dir = TempDir::new().unwrap();
        let path = export_report("RLHSYN report", dir.path(), "lymphoid_biopsy_report.txt").unwrap();

        assert_eq!(path, dir.path().join("lymphoid_biopsy_report.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "RLHSYN report");
    }

    #[test]
    fn test_export_to_explicit_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("case-17.txt");
        let path = export_report("text", &target, "ignored.txt").unwrap();
        assert_eq!(path, target);
        assert!(!dir.path().join("ignored.txt").exists());
    }

    #[test]
    fn test_export_empty_report_rejected() {
        let dir = TempDir::new().unwrap();
        let err = export_report("  \n", dir.path(), "report.txt").unwrap_err();
        assert!(matches!(err, Error::EmptyReport));
        assert!(!dir.path().join("report.txt").exists());
    }

    #[test]
    fn test_export_missing_parent_is_io_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("report.txt");
        let err = export_report("text", &target, "report.txt").unwrap_err();
        assert_eq!(err.code(), 40);
    }
}
