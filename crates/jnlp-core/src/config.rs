//! Launcher configuration
//!
//! Support files (the probe jar, the empty pack200 fixture, the security
//! properties override and bundled `unpack200.*` binaries) live next to the
//! launcher executable by default. Every value can be overridden from a
//! TOML/JSON file or the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use jnlp_fs::{ConfigStore, RunDir};
use regex::Regex;
use serde::Deserialize;

use crate::error::Result;
use crate::fetch::{DEFAULT_TIMEOUT, FetchOptions};
use crate::pipeline::PipelineOptions;
use crate::resolver::DEFAULT_EXCLUDE;
use crate::unpack::Unpack200;

const PROPS_JAR: &str = "PrintProps.jar";
const PROBE_ARCHIVE: &str = "empty.jar.pack.gz";
const SECURITY_FILE: &str = "java.security";
const TEMP_DIR: &str = "tmp";

/// Settings for one launcher invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchConfig {
    /// Runtime binary
    pub java: PathBuf,
    /// Jar printing the runtime's properties as JSON
    pub propsjar: PathBuf,
    /// Explicit unpack200 binary; probed when unset
    pub unpack: Option<PathBuf>,
    /// Directory searched for bundled `unpack200.*` binaries
    pub support_dir: PathBuf,
    /// Known-good archive used to probe unpack200 candidates
    pub probe_archive: PathBuf,
    /// Security properties override passed to the runtime
    pub security: PathBuf,
    /// Regular expression of resource paths never to download
    pub blacklist: String,
    /// Root under which the per-run directory is created
    pub temp: PathBuf,
    /// Keep downloaded files after the run
    pub debug: bool,
    pub timeout_secs: u64,
    /// Skip TLS certificate verification
    pub insecure: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self::with_support_dir(default_support_dir())
    }
}

impl LaunchConfig {
    /// Defaults with support files looked up in `dir`.
    pub fn with_support_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            java: PathBuf::from("java"),
            propsjar: dir.join(PROPS_JAR),
            unpack: None,
            support_dir: dir.to_path_buf(),
            probe_archive: dir.join(PROBE_ARCHIVE),
            security: dir.join(SECURITY_FILE),
            blacklist: DEFAULT_EXCLUDE.to_string(),
            temp: dir.join(TEMP_DIR),
            debug: false,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            insecure: false,
        }
    }

    /// Load a configuration file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            insecure: self.insecure,
        }
    }

    pub fn pipeline_options(&self) -> Result<PipelineOptions> {
        Ok(PipelineOptions {
            java: self.java.clone(),
            security_file: self.security.clone(),
            exclude: Regex::new(&self.blacklist)?,
            retain: self.debug,
        })
    }

    pub fn decompressor(&self) -> Unpack200 {
        match &self.unpack {
            Some(binary) => Unpack200::with_binary(binary),
            None => Unpack200::discover(&self.support_dir, &self.probe_archive),
        }
    }

    /// Run directory for this process.
    pub fn run_dir(&self) -> RunDir {
        RunDir::for_process(&self.temp)
    }
}

/// Directory containing the running executable, or `.` if unknown.
fn default_support_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
