//! Download, decompress and unpack manifest resources
//!
//! Resources are handled strictly one after another, in manifest order.
//! Each artifact is recorded as soon as it hits the disk, so a failure
//! halfway through still leaves an accurate list for cleanup.

use std::path::PathBuf;

use jnlp_fs::{RunDir, checksum, io, strip_pack_suffix};

use crate::archive;
use crate::capability::{Decompressor, Fetcher};
use crate::error::Result;
use crate::manifest::{ManifestDescriptor, ResourceEntry};
use crate::resolver::ResolvedResource;

/// A resource stored in the run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    /// Raw downloaded file
    pub path: PathBuf,
    pub entry: ResourceEntry,
    /// Unpacked sibling of a pack-compressed download
    pub decompressed: Option<PathBuf>,
    /// Native libraries extracted from this bundle
    pub extracted: Vec<String>,
}

/// Fills a run directory with the resolved resources.
pub struct Acquirer<'a> {
    run_dir: &'a RunDir,
    fetcher: &'a dyn Fetcher,
    decompressor: &'a mut dyn Decompressor,
}

impl<'a> Acquirer<'a> {
    pub fn new(
        run_dir: &'a RunDir,
        fetcher: &'a dyn Fetcher,
        decompressor: &'a mut dyn Decompressor,
    ) -> Self {
        Self {
            run_dir,
            fetcher,
            decompressor,
        }
    }

    /// Acquire every resource in order, appending to `artifacts` as it goes.
    ///
    /// Stops at the first failure; `artifacts` then describes what is on disk.
    pub fn acquire(
        &mut self,
        manifest: &ManifestDescriptor,
        resources: &[ResolvedResource],
        artifacts: &mut Vec<DownloadedArtifact>,
    ) -> Result<()> {
        self.run_dir.create()?;

        for resource in resources {
            self.acquire_one(manifest, resource, artifacts)?;
        }
        Ok(())
    }

    fn acquire_one(
        &mut self,
        manifest: &ManifestDescriptor,
        resource: &ResolvedResource,
        artifacts: &mut Vec<DownloadedArtifact>,
    ) -> Result<()> {
        let bytes = self.fetcher.fetch(&resource.uri)?;
        let path = self.run_dir.artifact(&resource.basename)?;
        io::write_atomic(&path, &bytes)?;
        tracing::debug!(
            file = %resource.basename,
            checksum = %checksum::compute_checksum(&bytes),
            "Stored"
        );

        artifacts.push(DownloadedArtifact {
            path: path.clone(),
            entry: resource.entry.clone(),
            decompressed: None,
            extracted: Vec::new(),
        });
        let index = artifacts.len() - 1;

        let canonical = match strip_pack_suffix(&resource.basename) {
            Some(name) => {
                let dest = self.run_dir.artifact(name)?;
                artifacts[index].decompressed = Some(dest.clone());
                self.decompressor.decompress(&path, &dest)?;
                tracing::debug!("Unpacked {} -> {}", resource.basename, name);
                dest
            }
            None => path,
        };

        let canonical_name = canonical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if manifest.is_native_bundle(&canonical_name) {
            let extracted = archive::extract_flat(&canonical, self.run_dir.path())?;
            artifacts[index].extracted = extracted;
        }

        Ok(())
    }
}
