//! Best-effort removal of everything a run put on disk
//!
//! Cleanup never fails: a file that is already gone is fine, anything else
//! is logged and counted. It can be run any number of times.

use std::path::{Path, PathBuf};

use jnlp_fs::{RunDir, io, strip_pack_suffix};

use crate::acquire::DownloadedArtifact;
use crate::archive;
use crate::manifest::ManifestDescriptor;

/// What a cleanup pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    /// Paths that exist but could not be removed
    pub failed: Vec<PathBuf>,
    /// Whether the run directory itself is gone
    pub dir_removed: bool,
}

/// Removes the artifacts of one run.
#[derive(Debug)]
pub struct Cleanup<'a> {
    run_dir: &'a RunDir,
}

impl<'a> Cleanup<'a> {
    pub fn new(run_dir: &'a RunDir) -> Self {
        Self { run_dir }
    }

    /// Remove extracted natives, downloads, unpacked siblings and the
    /// directory itself.
    ///
    /// `manifest` is `None` when parsing never produced one; tracked
    /// `artifacts` are removed regardless.
    pub fn run(
        &self,
        manifest: Option<&ManifestDescriptor>,
        artifacts: &[DownloadedArtifact],
    ) -> CleanupReport {
        let mut report = CleanupReport::default();

        if let Some(manifest) = manifest {
            for bundle in manifest.native_bundles() {
                self.remove_bundle_members(bundle, &mut report);
            }

            for entry in manifest.resources() {
                self.remove_named(entry.basename(), &mut report);
            }
        }

        for artifact in artifacts {
            for name in &artifact.extracted {
                self.remove_named(name, &mut report);
            }
            if let Some(sibling) = &artifact.decompressed {
                remove(sibling, &mut report);
            }
            remove(&artifact.path, &mut report);
        }

        report.dir_removed = match io::remove_dir_if_exists(self.run_dir.path()) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Leaving run directory in place: {e}");
                false
            }
        };

        tracing::debug!(
            removed = report.removed,
            failed = report.failed.len(),
            "Cleanup finished"
        );
        report
    }

    fn remove_bundle_members(&self, bundle: &str, report: &mut CleanupReport) {
        let Ok(path) = self.run_dir.artifact(bundle) else {
            return;
        };
        if !path.is_file() {
            return;
        }
        match archive::flat_members(&path) {
            Ok(members) => {
                for member in members {
                    self.remove_named(&member, report);
                }
            }
            Err(e) => tracing::warn!("Cannot list {} for cleanup: {e}", path.display()),
        }
    }

    /// Remove `name` and, for pack-compressed names, its unpacked sibling.
    fn remove_named(&self, name: &str, report: &mut CleanupReport) {
        if let Ok(path) = self.run_dir.artifact(name) {
            remove(&path, report);
        }
        if let Some(sibling) = strip_pack_suffix(name)
            && let Ok(path) = self.run_dir.artifact(sibling)
        {
            remove(&path, report);
        }
    }
}

fn remove(path: &Path, report: &mut CleanupReport) {
    match io::remove_file_if_exists(path) {
        Ok(true) => report.removed += 1,
        Ok(false) => {}
        Err(e) => {
            tracing::warn!("Failed to remove {}: {e}", path.display());
            report.failed.push(path.to_path_buf());
        }
    }
}
