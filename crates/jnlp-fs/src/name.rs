//! Artifact and archive-member name handling
//!
//! Every file the launcher writes lives directly in the run directory, so
//! names coming from the network (resource paths, zip members) are reduced
//! to a single path segment or rejected.

/// Suffix `jnlp.packEnabled` appends to resource paths.
pub const PACK_SUFFIX: &str = ".pack.gz";

/// Last `/`-separated segment of a resource path or URI.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Strip a trailing `.pack` or `.pack.gz` from a file name.
///
/// Returns the canonical (decompressed) name, or `None` when the name
/// carries no pack suffix.
pub fn strip_pack_suffix(name: &str) -> Option<&str> {
    name.strip_suffix(PACK_SUFFIX)
        .or_else(|| name.strip_suffix(".pack"))
}

/// Whether an archive member may be extracted flat into the run directory.
///
/// Members with a path separator, a leading dot, or an empty name are
/// refused. Directory entries always contain a separator and are refused
/// by the same rule.
pub fn is_flat_member(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}
