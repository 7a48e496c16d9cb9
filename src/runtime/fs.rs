//! File system reads.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context("Failed to read file to string")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("deps.txt");

        assert!(!runtime.exists(&file_path));

        std::fs::write(&file_path, "INSTALL a\n").unwrap();
        assert!(runtime.exists(&file_path));
        assert_eq!(runtime.read_to_string(&file_path).unwrap(), "INSTALL a\n");
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");

        let err = runtime.read_to_string(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
