//! Per-run working directory
//!
//! Each launch owns `<temp-root>/<token>`, where the token is unique to the
//! run (the process id by default). Nothing in it survives cleanup and it is
//! never shared between runs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// The flat directory holding every artifact of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDir {
    path: PathBuf,
}

impl RunDir {
    /// Run directory keyed by the current process id.
    pub fn for_process(temp_root: impl AsRef<Path>) -> Self {
        Self::with_token(temp_root, &std::process::id().to_string())
    }

    /// Run directory keyed by an explicit token.
    pub fn with_token(temp_root: impl AsRef<Path>, token: &str) -> Self {
        Self {
            path: temp_root.as_ref().join(token),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Create the directory, and the temp root if missing.
    ///
    /// The run directory itself must not exist yet: a leftover from an
    /// earlier run with the same token is never reused.
    pub fn create(&self) -> Result<()> {
        if let Some(root) = self.path.parent() {
            fs::create_dir_all(root).map_err(|e| Error::io(root, e))?;
        }
        fs::create_dir(&self.path).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => Error::RunDirExists {
                path: self.path.clone(),
            },
            _ => Error::io(&self.path, e),
        })?;
        tracing::debug!(path = %self.path.display(), "Run directory ready");
        Ok(())
    }

    /// Path of an artifact stored directly in the run directory.
    ///
    /// Names that would resolve anywhere but a direct child are refused.
    pub fn artifact(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(Error::NotFlat {
                name: name.to_string(),
            });
        }
        Ok(self.path.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_for_process_uses_pid() {
        let dir = RunDir::for_process("/tmp/jnlp");
        assert_eq!(
            dir.path(),
            Path::new("/tmp/jnlp").join(std::process::id().to_string())
        );
    }

    #[test]
    fn test_create_makes_root_and_refuses_reuse() {
        let temp = TempDir::new().unwrap();
        let dir = RunDir::with_token(temp.path().join("root"), "42");
        assert!(!dir.exists());

        dir.create().unwrap();
        assert!(dir.exists());
        assert!(matches!(dir.create(), Err(Error::RunDirExists { .. })));
    }

    #[test]
    fn test_artifact_rejects_escaping_names() {
        let dir = RunDir::with_token("/tmp/jnlp", "1");
        assert_eq!(
            dir.artifact("app.jar").unwrap(),
            Path::new("/tmp/jnlp/1/app.jar")
        );
        assert!(dir.artifact("").is_err());
        assert!(dir.artifact("..").is_err());
        assert!(dir.artifact("a/b.jar").is_err());
        assert!(dir.artifact("a\\b.jar").is_err());
    }
}
