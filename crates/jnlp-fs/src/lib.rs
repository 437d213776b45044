//! Filesystem primitives for the JNLP launcher
//!
//! Provides the per-run working directory, atomic artifact writes,
//! archive member name guards and configuration loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod name;
pub mod rundir;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use name::{PACK_SUFFIX, basename, is_flat_member, strip_pack_suffix};
pub use rundir::RunDir;
