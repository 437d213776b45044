//! Shared test utilities for the JNLP launcher workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`doubles`]: in-memory [`Fetcher`](jnlp_core::Fetcher),
//!   [`Decompressor`](jnlp_core::Decompressor) and
//!   [`ProcessExecutor`](jnlp_core::ProcessExecutor) implementations
//! - [`fixtures`]: manifest and zip archive builders

pub mod doubles;
pub mod fixtures;

pub use doubles::{CopyDecompressor, RecordingExecutor, StubFetcher};
pub use fixtures::{ManifestBuilder, zip_bytes};
