//! Host runtime description used to filter platform-specific resources

use std::path::Path;
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::error::{Error, Result};

/// OS, architecture and version of the runtime that will run the application.
///
/// Values are compared verbatim with the manifest's `os`/`arch` filters,
/// so they use the runtime's own spelling (`Linux`, `amd64`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnvironment {
    pub os: String,
    pub arch: String,
    pub version: String,
}

/// Output of the properties-printing probe jar.
#[derive(Debug, Deserialize)]
struct ProbeProperties {
    #[serde(rename = "os.name")]
    os: String,
    #[serde(rename = "os.arch")]
    arch: String,
    #[serde(rename = "java.version")]
    version: String,
}

impl RuntimeEnvironment {
    pub fn new(os: impl Into<String>, arch: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
            version: version.into(),
        }
    }

    /// Ask the runtime itself by running `<java> -jar <props_jar>`.
    ///
    /// The jar prints a JSON object with at least `os.name`, `os.arch` and
    /// `java.version`.
    pub fn probe(java: &Path, props_jar: &Path) -> Result<Self> {
        tracing::debug!(java = %java.display(), jar = %props_jar.display(), "Probing runtime");

        let output = Command::new(java)
            .arg("-jar")
            .arg(props_jar)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::process_execution(java, e))?;

        if !output.status.success() {
            return Err(Error::ProbeFailed {
                message: format!(
                    "{} exited with {}: {}",
                    java.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let env = Self::from_probe_output(&output.stdout)?;
        tracing::info!(os = %env.os, arch = %env.arch, version = %env.version, "Detected runtime");
        Ok(env)
    }

    /// Parse the JSON printed by the probe jar.
    pub fn from_probe_output(stdout: &[u8]) -> Result<Self> {
        let props: ProbeProperties =
            serde_json::from_slice(stdout).map_err(|e| Error::ProbeFailed {
                message: format!("invalid probe output: {e}"),
            })?;
        Ok(Self {
            os: props.os,
            arch: props.arch,
            version: props.version,
        })
    }
}
