//! In-memory stand-ins for the network, unpack200 and the runtime.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use jnlp_core::{
    Decompressor, Error, ExitOutcome, FetchError, Fetcher, Invocation, ProcessExecutor, Result,
};

/// Serves fixed bodies per URI and records every request.
///
/// Unknown URIs answer HTTP 404.
#[derive(Debug, Default)]
pub struct StubFetcher {
    responses: HashMap<String, std::result::Result<Vec<u8>, u16>>,
    calls: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `uri`.
    pub fn with(mut self, uri: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(uri.to_string(), Ok(body.into()));
        self
    }

    /// Answer `uri` with an error status.
    pub fn with_status(mut self, uri: &str, status: u16) -> Self {
        self.responses.insert(uri.to_string(), Err(status));
        self
    }

    /// URIs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, uri: &str) -> std::result::Result<Vec<u8>, FetchError> {
        self.calls.borrow_mut().push(uri.to_string());
        match self.responses.get(uri) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(FetchError::Status {
                uri: uri.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                uri: uri.to_string(),
                status: 404,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Decompress,
    NoBinary,
}

/// "Decompresses" by copying the source verbatim.
#[derive(Debug, Default)]
pub struct CopyDecompressor {
    calls: Vec<(PathBuf, PathBuf)>,
    failure: Option<Failure>,
}

impl CopyDecompressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if unpack200 exited with status 1.
    pub fn failing() -> Self {
        Self {
            failure: Some(Failure::Decompress),
            ..Self::default()
        }
    }

    /// Every call fails as if no unpack200 binary could be found.
    pub fn unavailable() -> Self {
        Self {
            failure: Some(Failure::NoBinary),
            ..Self::default()
        }
    }

    /// `(source, dest)` pairs seen so far.
    pub fn calls(&self) -> &[(PathBuf, PathBuf)] {
        &self.calls
    }
}

impl Decompressor for CopyDecompressor {
    fn decompress(&mut self, source: &Path, dest: &Path) -> Result<()> {
        self.calls.push((source.to_path_buf(), dest.to_path_buf()));
        match self.failure {
            Some(Failure::NoBinary) => Err(Error::BinaryNotFound {
                tried: vec!["unpack200".to_string()],
            }),
            Some(Failure::Decompress) => Err(Error::DecompressFailed {
                binary: PathBuf::from("unpack200"),
                source_path: source.to_path_buf(),
                code: Some(1),
            }),
            None => fs::copy(source, dest)
                .map(|_| ())
                .map_err(|_| Error::DecompressFailed {
                    binary: PathBuf::from("copy"),
                    source_path: source.to_path_buf(),
                    code: None,
                }),
        }
    }
}

/// Records invocations instead of running them.
///
/// At each call it also lists the directory named by the
/// `-Djava.library.path=` argument, so tests can check what was on disk
/// while the application "ran".
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    exit_code: i32,
    spawn_fails: bool,
    invocations: Vec<Invocation>,
    observed: Vec<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `code` as the child's exit status.
    pub fn exiting_with(code: i32) -> Self {
        Self {
            exit_code: code,
            ..Self::default()
        }
    }

    /// Fail as if the runtime binary did not exist.
    pub fn spawn_failure() -> Self {
        Self {
            spawn_fails: true,
            ..Self::default()
        }
    }

    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    /// Sorted file names in the library directory, one list per call.
    pub fn observed(&self) -> &[Vec<String>] {
        &self.observed
    }
}

impl ProcessExecutor for RecordingExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome> {
        self.invocations.push(invocation.clone());
        self.observed.push(library_dir_listing(invocation));

        if self.spawn_fails {
            return Err(Error::process_execution(
                &invocation.program,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            ));
        }
        Ok(ExitOutcome::from_code(self.exit_code))
    }
}

fn library_dir_listing(invocation: &Invocation) -> Vec<String> {
    let dir = invocation.args.iter().find_map(|arg| {
        arg.to_str()
            .and_then(|a| a.strip_prefix("-Djava.library.path="))
            .map(PathBuf::from)
    });
    let Some(dir) = dir else {
        return Vec::new();
    };
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
