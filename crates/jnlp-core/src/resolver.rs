//! Resource selection and fetch-URI resolution

use regex::Regex;

use crate::environment::RuntimeEnvironment;
use crate::error::ManifestError;
use crate::manifest::{ManifestDescriptor, ResourceEntry};

/// Exclusion pattern applied when none is configured.
///
/// Skips the KVM viewer native libraries that are known to crash
/// current runtimes.
pub const DEFAULT_EXCLUDE: &str = r"(?:^|/)avctKVMIOLinux(?:64)?[_.][^/]*$";

/// A resource that survived filtering, with where to get it and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    /// Absolute http(s) URI to download
    pub uri: String,
    /// File name inside the run directory
    pub basename: String,
    /// Manifest entry this was resolved from
    pub entry: ResourceEntry,
}

/// Filters manifest resources for one runtime environment.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    env: &'a RuntimeEnvironment,
    exclude: &'a Regex,
}

impl<'a> Resolver<'a> {
    pub fn new(env: &'a RuntimeEnvironment, exclude: &'a Regex) -> Self {
        Self { env, exclude }
    }

    /// Resolve every applicable resource, preserving declaration order.
    pub fn resolve(
        &self,
        manifest: &ManifestDescriptor,
    ) -> Result<Vec<ResolvedResource>, ManifestError> {
        let mut resolved = Vec::new();

        for entry in manifest.resources() {
            if !self.applies(entry) {
                tracing::debug!(
                    path = %entry.path,
                    os = %entry.os,
                    arch = %entry.arch,
                    "Resource not for this platform"
                );
                continue;
            }

            if self.exclude.is_match(&entry.path) {
                tracing::warn!("Skipping excluded resource {}", entry.path);
                continue;
            }

            resolved.push(ResolvedResource {
                uri: resolve_uri(manifest.codebase(), &entry.path)?,
                basename: entry.basename().to_string(),
                entry: entry.clone(),
            });
        }

        Ok(resolved)
    }

    fn applies(&self, entry: &ResourceEntry) -> bool {
        (entry.os.is_empty() || entry.os == self.env.os)
            && (entry.arch.is_empty() || entry.arch == self.env.arch)
    }
}

/// Compute the absolute URI of a resource path relative to the codebase.
///
/// - absolute `http(s)://` paths are used as-is
/// - protocol-relative `//host/...` paths get `http:`
/// - root-relative `/...` paths keep the codebase's scheme and authority
/// - anything else is appended to the codebase with a single `/`
pub fn resolve_uri(codebase: &str, path: &str) -> Result<String, ManifestError> {
    if is_http_uri(path) {
        return Ok(path.to_string());
    }

    if path.starts_with("//") {
        return Ok(format!("http:{path}"));
    }

    if path.starts_with('/') {
        if !is_http_uri(codebase) {
            return Err(ManifestError::InvalidCodebase {
                codebase: codebase.to_string(),
                path: path.to_string(),
            });
        }
        let origin = codebase.splitn(4, '/').take(3).collect::<Vec<_>>().join("/");
        return Ok(format!("{origin}{path}"));
    }

    Ok(format!("{}/{}", codebase.trim_end_matches('/'), path))
}

fn is_http_uri(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
