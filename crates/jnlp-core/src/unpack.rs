//! Pack200 decompression through an external `unpack200` binary
//!
//! Modern runtimes no longer ship `unpack200`, so a working binary is
//! discovered on first use: each candidate is asked to unpack a known-good
//! empty archive and the first one that produces output is kept for the rest
//! of the run. The choice lives in the [`Unpack200`] instance, never in
//! process-wide state.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use jnlp_fs::io::remove_file_if_exists;

use crate::capability::Decompressor;
use crate::error::{Error, Result};

/// Name looked up on `PATH`, and the prefix of bundled candidates.
const UNPACK200: &str = "unpack200";

/// Locates and runs an `unpack200` binary.
#[derive(Debug, Clone)]
pub struct Unpack200 {
    candidates: Vec<PathBuf>,
    probe_archive: PathBuf,
    selected: Option<PathBuf>,
}

impl Unpack200 {
    /// Probe `unpack200` on `PATH`, then every `unpack200.*` file in
    /// `support_dir` in name order.
    pub fn discover(support_dir: &Path, probe_archive: impl Into<PathBuf>) -> Self {
        Self::with_candidates(default_candidates(support_dir), probe_archive)
    }

    /// Probe an explicit candidate list, in order.
    pub fn with_candidates(candidates: Vec<PathBuf>, probe_archive: impl Into<PathBuf>) -> Self {
        Self {
            candidates,
            probe_archive: probe_archive.into(),
            selected: None,
        }
    }

    /// Use `binary` without probing.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        let binary = binary.into();
        Self {
            candidates: vec![binary.clone()],
            probe_archive: PathBuf::new(),
            selected: Some(binary),
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Binary chosen so far, if any.
    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    fn binary(&mut self, scratch: &Path) -> Result<PathBuf> {
        if let Some(binary) = &self.selected {
            return Ok(binary.clone());
        }

        tracing::debug!("Detecting unpack200 binary...");
        for candidate in &self.candidates {
            tracing::debug!(candidate = %candidate.display(), "Probing");
            if probe(candidate, &self.probe_archive, scratch) {
                tracing::info!("Using {}", candidate.display());
                self.selected = Some(candidate.clone());
                return Ok(candidate.clone());
            }
        }

        Err(Error::BinaryNotFound {
            tried: self
                .candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect(),
        })
    }
}

impl Decompressor for Unpack200 {
    fn decompress(&mut self, source: &Path, dest: &Path) -> Result<()> {
        let binary = self.binary(dest)?;
        remove_file_if_exists(dest)?;

        let status = Command::new(&binary)
            .arg(source)
            .arg(dest)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::BinaryNotFound {
                    tried: vec![binary.display().to_string()],
                },
                _ => Error::process_execution(&binary, e),
            })?;

        if !status.success() {
            return Err(Error::DecompressFailed {
                binary,
                source_path: source.to_path_buf(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

/// Run one candidate against the probe archive.
///
/// Succeeds only if the candidate exits cleanly and leaves `scratch` behind.
fn probe(candidate: &Path, probe_archive: &Path, scratch: &Path) -> bool {
    if remove_file_if_exists(scratch).is_err() {
        return false;
    }

    let ok = Command::new(candidate)
        .arg(probe_archive)
        .arg(scratch)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
        && scratch.is_file();

    let _ = remove_file_if_exists(scratch);
    ok
}

fn default_candidates(support_dir: &Path) -> Vec<PathBuf> {
    let prefix = format!("{UNPACK200}.");
    let mut bundled: Vec<PathBuf> = fs::read_dir(support_dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
                .map(|e| e.path())
                .collect()
        })
        .unwrap_or_default();
    bundled.sort();

    std::iter::once(PathBuf::from(UNPACK200))
        .chain(bundled)
        .collect()
}
