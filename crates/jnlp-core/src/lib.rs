//! JNLP launcher core
//!
//! Parses a JNLP manifest, downloads the resources that apply to the local
//! runtime, unpacks pack200 archives and native bundles into a per-run
//! directory, runs the application and removes everything afterwards.
//!
//! The network, the unpack200 tool and the runtime process are reached
//! through the traits in [`capability`]; [`Pipeline`] drives the stages.

pub mod acquire;
pub mod archive;
pub mod capability;
pub mod cleanup;
pub mod config;
pub mod environment;
pub mod error;
pub mod fetch;
pub mod launch;
pub mod manifest;
pub mod pipeline;
pub mod resolver;
pub mod unpack;

pub use acquire::{Acquirer, DownloadedArtifact};
pub use capability::{Decompressor, ExitOutcome, Fetcher, Invocation, ProcessExecutor};
pub use cleanup::{Cleanup, CleanupReport};
pub use config::LaunchConfig;
pub use environment::RuntimeEnvironment;
pub use error::{Error, FetchError, ManifestError, Result};
pub use fetch::{FetchOptions, HttpFetcher};
pub use launch::{LaunchSpec, SystemExecutor, launch};
pub use manifest::{ManifestDescriptor, ManifestSource, ResourceEntry, ResourceKind};
pub use pipeline::{Pipeline, PipelineOptions, PipelineState, RunReport};
pub use resolver::{DEFAULT_EXCLUDE, ResolvedResource, Resolver, resolve_uri};
pub use unpack::Unpack200;
