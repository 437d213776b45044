//! End-to-end launch pipeline
//!
//! Parsing → Resolving → Acquiring → Launching → CleaningUp → Succeeded/Failed.
//! Every path, including failures, passes through CleaningUp. Nothing is
//! retried.

use std::path::PathBuf;

use jnlp_fs::RunDir;
use regex::Regex;

use crate::acquire::{Acquirer, DownloadedArtifact};
use crate::capability::{Decompressor, ExitOutcome, Fetcher, ProcessExecutor};
use crate::cleanup::{Cleanup, CleanupReport};
use crate::environment::RuntimeEnvironment;
use crate::error::{Error, Result};
use crate::launch::{LaunchSpec, launch};
use crate::manifest::{ManifestDescriptor, ManifestSource};
use crate::resolver::Resolver;

/// Stage the pipeline is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Parsing,
    Resolving,
    Acquiring,
    Launching,
    CleaningUp,
    Succeeded,
    Failed,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Parsing => "parsing",
            Self::Resolving => "resolving",
            Self::Acquiring => "acquiring",
            Self::Launching => "launching",
            Self::CleaningUp => "cleaning up",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Settings that do not come from the manifest.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub java: PathBuf,
    pub security_file: PathBuf,
    /// Resources whose path matches are never downloaded
    pub exclude: Regex,
    /// Keep every artifact on disk for inspection (debug mode)
    pub retain: bool,
}

/// Result of one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// Every state visited, in order
    pub states: Vec<PipelineState>,
    /// Child exit status, or the error that stopped the pipeline
    pub outcome: Result<ExitOutcome>,
    /// `None` when cleanup was skipped: retain mode, or a run directory
    /// this run never owned
    pub cleanup: Option<CleanupReport>,
}

/// Where the runtime description comes from.
#[derive(Debug)]
enum Runtime {
    Known(RuntimeEnvironment),
    /// Probed with `<java> -jar <props_jar>` once the manifest has parsed
    Unprobed { props_jar: PathBuf },
}

impl RunReport {
    pub fn final_state(&self) -> PipelineState {
        self.states
            .last()
            .copied()
            .unwrap_or(PipelineState::Failed)
    }
}

/// One launch, from manifest to cleanup.
pub struct Pipeline<F, D, E> {
    runtime: Runtime,
    run_dir: RunDir,
    options: PipelineOptions,
    fetcher: F,
    decompressor: D,
    executor: E,
}

impl<F, D, E> Pipeline<F, D, E>
where
    F: Fetcher,
    D: Decompressor,
    E: ProcessExecutor,
{
    /// Pipeline for an already known runtime.
    pub fn new(
        env: RuntimeEnvironment,
        run_dir: RunDir,
        options: PipelineOptions,
        fetcher: F,
        decompressor: D,
        executor: E,
    ) -> Self {
        Self::with_runtime(Runtime::Known(env), run_dir, options, fetcher, decompressor, executor)
    }

    /// Pipeline that probes `options.java` with `props_jar` when it starts
    /// resolving, so a broken manifest is reported before the runtime is
    /// ever run.
    pub fn probing(
        props_jar: impl Into<PathBuf>,
        run_dir: RunDir,
        options: PipelineOptions,
        fetcher: F,
        decompressor: D,
        executor: E,
    ) -> Self {
        let runtime = Runtime::Unprobed {
            props_jar: props_jar.into(),
        };
        Self::with_runtime(runtime, run_dir, options, fetcher, decompressor, executor)
    }

    fn with_runtime(
        runtime: Runtime,
        run_dir: RunDir,
        options: PipelineOptions,
        fetcher: F,
        decompressor: D,
        executor: E,
    ) -> Self {
        Self {
            runtime,
            run_dir,
            options,
            fetcher,
            decompressor,
            executor,
        }
    }

    pub fn run_dir(&self) -> &RunDir {
        &self.run_dir
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn decompressor(&self) -> &D {
        &self.decompressor
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run every stage, then clean up.
    pub fn run(&mut self, source: &ManifestSource) -> RunReport {
        let mut states = Vec::new();
        let mut manifest = None;
        let mut artifacts = Vec::new();

        let outcome = self.stages(source, &mut states, &mut manifest, &mut artifacts);
        if let Err(e) = &outcome {
            tracing::debug!(stage = ?states.last(), "Pipeline stopped: {e}");
        }

        enter(&mut states, PipelineState::CleaningUp);
        let foreign_dir = matches!(
            &outcome,
            Err(Error::Fs(jnlp_fs::Error::RunDirExists { .. }))
        );
        let cleanup = if self.options.retain {
            tracing::info!(
                "Debug mode: leaving artifacts in {}",
                self.run_dir.path().display()
            );
            None
        } else if foreign_dir {
            tracing::warn!(
                "Not touching {}: it predates this run",
                self.run_dir.path().display()
            );
            None
        } else {
            Some(Cleanup::new(&self.run_dir).run(manifest.as_ref(), &artifacts))
        };

        enter(
            &mut states,
            if outcome.is_ok() {
                PipelineState::Succeeded
            } else {
                PipelineState::Failed
            },
        );

        RunReport {
            states,
            outcome,
            cleanup,
        }
    }

    fn stages(
        &mut self,
        source: &ManifestSource,
        states: &mut Vec<PipelineState>,
        manifest: &mut Option<ManifestDescriptor>,
        artifacts: &mut Vec<DownloadedArtifact>,
    ) -> Result<ExitOutcome> {
        enter(states, PipelineState::Parsing);
        tracing::debug!("Reading manifest from {source}");
        let manifest: &ManifestDescriptor = manifest.insert(source.read()?);

        enter(states, PipelineState::Resolving);
        if manifest.primary_archive().is_none() {
            return Err(Error::MissingPrimaryArchive);
        }
        let env = self.runtime()?;
        if !manifest.runtime_versions().is_empty() {
            tracing::info!(
                requested = ?manifest.runtime_versions(),
                running = %env.version,
                "Manifest runtime constraints are not enforced"
            );
        }
        let resolved = Resolver::new(&env, &self.options.exclude).resolve(manifest)?;

        enter(states, PipelineState::Acquiring);
        Acquirer::new(&self.run_dir, &self.fetcher, &mut self.decompressor).acquire(
            manifest,
            &resolved,
            artifacts,
        )?;

        enter(states, PipelineState::Launching);
        let spec = LaunchSpec::from_descriptor(
            manifest,
            &self.run_dir,
            &self.options.java,
            &self.options.security_file,
        )?;
        launch(&spec, &mut self.executor)
    }

    /// The runtime description, probing it on first use.
    fn runtime(&mut self) -> Result<RuntimeEnvironment> {
        let env = match &self.runtime {
            Runtime::Known(env) => return Ok(env.clone()),
            Runtime::Unprobed { props_jar } => {
                RuntimeEnvironment::probe(&self.options.java, props_jar)?
            }
        };
        self.runtime = Runtime::Known(env.clone());
        Ok(env)
    }
}

fn enter(states: &mut Vec<PipelineState>, state: PipelineState) {
    tracing::debug!("Pipeline: {state}");
    states.push(state);
}
