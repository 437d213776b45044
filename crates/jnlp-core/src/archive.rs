//! Flat extraction of native library bundles
//!
//! Only top-level, non-hidden members are ever written: an entry whose name
//! contains a path separator or starts with a dot is skipped, so extraction
//! cannot escape the run directory or drop dotfiles into it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use jnlp_fs::is_flat_member;
use zip::ZipArchive;

use crate::error::{Error, Result};

fn open(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| Error::archive(path, e))?;
    ZipArchive::new(file).map_err(|e| Error::archive(path, e))
}

/// Names of the members [`extract_flat`] would write, in archive order.
pub fn flat_members(path: &Path) -> Result<Vec<String>> {
    let archive = open(path)?;
    Ok(archive
        .file_names()
        .filter(|name| is_flat_member(name))
        .map(str::to_string)
        .collect())
}

/// Extract the flat members of `archive_path` into `dest_dir`.
///
/// Returns the names written, in archive order.
pub fn extract_flat(archive_path: &Path, dest_dir: &Path) -> Result<Vec<String>> {
    let mut archive = open(archive_path)?;
    let mut extracted = Vec::new();

    for index in 0..archive.len() {
        let mut member = archive
            .by_index(index)
            .map_err(|e| Error::archive(archive_path, e))?;
        let name = member.name().to_string();

        if member.is_dir() || !is_flat_member(&name) {
            tracing::debug!(member = %name, "Skipping archive member");
            continue;
        }

        let target = dest_dir.join(&name);
        let file = File::create(&target).map_err(|e| jnlp_fs::Error::io(&target, e))?;
        let mut out = BufWriter::new(file);
        io::copy(&mut member, &mut out).map_err(|e| Error::archive(archive_path, e))?;
        out.flush().map_err(|e| jnlp_fs::Error::io(&target, e))?;
        extracted.push(name);
    }

    tracing::debug!(
        archive = %archive_path.display(),
        count = extracted.len(),
        "Extracted native libraries"
    );
    Ok(extracted)
}
