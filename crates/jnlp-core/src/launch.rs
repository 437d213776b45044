//! Runtime invocation of the downloaded application

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use jnlp_fs::RunDir;

use crate::capability::{ExitOutcome, Invocation, ProcessExecutor};
use crate::error::{Error, Result};
use crate::manifest::ManifestDescriptor;

const LIBRARY_PATH_OPTION: &str = "-Djava.library.path=";
const SECURITY_PROPERTIES_OPTION: &str = "-Djava.security.properties=";

/// Everything needed to start the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Runtime binary
    pub java: PathBuf,
    /// Security properties override shipped with the launcher
    pub security_file: PathBuf,
    /// Native library search path, the run directory
    pub library_path: PathBuf,
    /// Application jar inside the run directory
    pub archive: PathBuf,
    pub main_class: Option<String>,
    pub arguments: Vec<String>,
}

impl LaunchSpec {
    pub fn from_descriptor(
        manifest: &ManifestDescriptor,
        run_dir: &RunDir,
        java: impl Into<PathBuf>,
        security_file: impl Into<PathBuf>,
    ) -> Result<Self> {
        let jar = manifest.primary_archive().ok_or(Error::MissingPrimaryArchive)?;
        Ok(Self {
            java: java.into(),
            security_file: security_file.into(),
            library_path: run_dir.path().to_path_buf(),
            archive: run_dir.artifact(jar)?,
            main_class: manifest.main_class().map(str::to_string),
            arguments: manifest.arguments().to_vec(),
        })
    }

    /// Build the command line.
    ///
    /// With a main class the jar goes on the classpath (`-cp jar Main`),
    /// otherwise it runs as an executable jar (`-jar jar`). Application
    /// arguments follow verbatim.
    pub fn invocation(&self) -> Invocation {
        let invocation = Invocation::new(&self.java)
            .arg(prefixed(LIBRARY_PATH_OPTION, &self.library_path))
            .arg(prefixed(SECURITY_PROPERTIES_OPTION, &self.security_file));

        let invocation = match &self.main_class {
            Some(main_class) => invocation
                .arg("-cp")
                .arg(&self.archive)
                .arg(main_class),
            None => invocation.arg("-jar").arg(&self.archive),
        };

        invocation.args(&self.arguments)
    }
}

fn prefixed(option: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(option);
    arg.push(path);
    arg
}

/// Run the application and wait for it to exit.
pub fn launch(spec: &LaunchSpec, executor: &mut dyn ProcessExecutor) -> Result<ExitOutcome> {
    let invocation = spec.invocation();
    tracing::info!("Executing: {invocation}");

    let outcome = executor.execute(&invocation)?;
    if !outcome.success() {
        tracing::info!(code = ?outcome.code, "Application exited with failure status");
    }
    Ok(outcome)
}

/// Runs invocations as real child processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl ProcessExecutor for SystemExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .status()
            .map_err(|e| Error::process_execution(&invocation.program, e))?;
        Ok(status.into())
    }
}
