//! Error types for jnlp-core

use std::path::PathBuf;

/// Result type for jnlp-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Manifest structure or content is not acceptable.
///
/// Raised before any network activity takes place.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Document is not well-formed XML
    #[error("Manifest is not valid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Manifest could not be read
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    /// First element is not `jnlp`
    #[error("Expected <jnlp> root element, found <{name}>")]
    UnexpectedRoot { name: String },

    /// `spec` attribute is not `1.0+`
    #[error("Unsupported JNLP spec version {found:?} (only \"1.0+\" is supported)")]
    UnsupportedSpec { found: String },

    /// `codebase` attribute absent or empty
    #[error("Manifest has no codebase")]
    MissingCodebase,

    /// Element the launcher does not understand
    #[error("Unknown element <{name}>:\n{source_text}")]
    UnknownElement { name: String, source_text: String },

    /// `property` element with a name other than the supported flags
    #[error("Unknown property {name:?}")]
    UnknownProperty { name: String },

    /// `property` element whose value is not `true`
    #[error("Property {name:?} must have value \"true\", found {value:?}")]
    InvalidPropertyValue { name: String, value: String },

    /// `jar`/`nativelib` without `href`
    #[error("<{element}> is missing its href attribute")]
    MissingHref { element: String },

    /// Versioned resource whose href does not end in `.jar`
    #[error("Versioned resource {href:?} does not end in .jar")]
    InvalidVersionedName { href: String },

    /// Primary archive declared inside an OS/arch filtered block
    #[error("Application jar {href:?} must not carry an os/arch filter (os={os:?}, arch={arch:?})")]
    FilteredPrimaryArchive {
        href: String,
        os: String,
        arch: String,
    },

    /// More than one `jar` element
    #[error("Manifest declares more than one application jar ({first:?} and {second:?})")]
    DuplicatePrimaryArchive { first: String, second: String },

    /// Argument element without exactly one text child
    #[error("Malformed application argument:\n{source_text}")]
    MalformedArgument { source_text: String },

    /// Root-relative resource with a codebase that is not absolute http(s)
    #[error("Codebase {codebase:?} is not an absolute http(s) URI, cannot resolve {path:?}")]
    InvalidCodebase { codebase: String, path: String },
}

/// Download of a resource failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request to {uri} failed: {message}")]
    Transport { uri: String, message: String },

    #[error("{uri} returned HTTP {status}")]
    Status { uri: String, status: u16 },
}

/// Errors that can occur while launching an application
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// No unpack200 candidate could decompress the probe archive
    #[error("No working unpack200 binary found (tried: {})", .tried.join(", "))]
    BinaryNotFound { tried: Vec<String> },

    /// The selected unpack200 binary failed on a real artifact
    #[error("{binary} failed to decompress {source_path} (exit code {code:?})")]
    DecompressFailed {
        binary: PathBuf,
        source_path: PathBuf,
        code: Option<i32>,
    },

    /// Bundle could not be opened or read as a zip archive
    #[error("Cannot read archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Runtime binary could not be started
    #[error("Failed to execute {program}: {source}")]
    ProcessExecution {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Runtime probe produced unusable output
    #[error("Runtime probe failed: {message}")]
    ProbeFailed { message: String },

    /// Launch requested for a manifest without an application jar
    #[error("Manifest declares no application jar to launch")]
    MissingPrimaryArchive,

    /// Invalid exclusion pattern
    #[error("Invalid exclusion pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Fs(#[from] jnlp_fs::Error),
}

impl Error {
    pub fn archive(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn process_execution(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ProcessExecution {
            program: program.into(),
            source,
        }
    }
}
