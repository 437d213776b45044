//! Seams to the outside world
//!
//! The pipeline never touches the network, the unpack200 tool or the
//! runtime binary directly; it goes through these traits so tests can
//! substitute fixed responses and recorders.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};

/// Downloads a resource.
pub trait Fetcher {
    /// Fetch the full body of `uri`. Anything but a success status is an error.
    fn fetch(&self, uri: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// Turns a pack-compressed artifact into a plain jar.
pub trait Decompressor {
    /// Decompress `source` into a new file at `dest`.
    fn decompress(&mut self, source: &Path, dest: &Path) -> Result<()>;
}

/// Runs a child process to completion.
pub trait ProcessExecutor {
    /// Run the invocation, blocking until the child exits.
    ///
    /// A non-zero exit is a normal outcome; only failing to start the
    /// program is an error.
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome>;
}

/// A fully built command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Extra environment variables on top of the inherited environment
    pub env: Vec<(OsString, OsString)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::new("/usr/bin/java")
            .arg("-jar")
            .args(["/tmp/1/app.jar", "host=a b"]);
        assert_eq!(inv.to_string(), "/usr/bin/java -jar /tmp/1/app.jar host=a b");
    }

    #[test]
    fn test_exit_outcome() {
        assert!(ExitOutcome::from_code(0).success());
        assert!(!ExitOutcome::from_code(3).success());
        assert!(!ExitOutcome { code: None }.success());
    }
}
