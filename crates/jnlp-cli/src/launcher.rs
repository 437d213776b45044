//! Wires the real capabilities into a pipeline run

use jnlp_core::{HttpFetcher, LaunchConfig, ManifestSource, Pipeline, SystemExecutor};

use crate::error::Result;

/// Launch the application described by `source`.
///
/// Returns the application's exit code, which becomes the launcher's own.
pub fn run(source: &ManifestSource, config: &LaunchConfig) -> Result<i32> {
    let options = config.pipeline_options()?;
    let fetcher = HttpFetcher::new(config.fetch_options())?;
    let run_dir = config.run_dir();
    tracing::debug!("Run directory: {}", run_dir.path().display());

    let mut pipeline = Pipeline::probing(
        &config.propsjar,
        run_dir,
        options,
        fetcher,
        config.decompressor(),
        SystemExecutor,
    );
    let report = pipeline.run(source);

    if let Some(cleanup) = &report.cleanup
        && !cleanup.failed.is_empty()
    {
        tracing::warn!(
            "{} file(s) could not be removed from {}",
            cleanup.failed.len(),
            pipeline.run_dir().path().display()
        );
    }

    tracing::debug!("Pipeline {}", report.final_state());
    let outcome = report.outcome?;
    Ok(outcome.code.unwrap_or(1))
}
