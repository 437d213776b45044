//! CLI argument parsing using clap derive

use clap::Parser;

/// Launch a Java Web Start (JNLP) application without Java Web Start
///
/// Settings are given as key=value tokens; the bare token is the manifest
/// path, `-` reads the manifest from standard input.
///
/// Keys:
///   java=PATH       runtime binary (default: java)
///   propsjar=PATH   runtime properties probe jar
///   unpack=PATH     unpack200 binary (default: probed)
///   blacklist=RE    resources never downloaded
///   temp=DIR        root of the per-run directory
///   security=PATH   java.security override file
///   timeout=SECS    download timeout
///   insecure=BOOL   skip TLS certificate verification
///   debug=BOOL      keep downloaded files, log verbosely
///   config=PATH     TOML/JSON file with the settings above
#[derive(Parser, Debug)]
#[command(name = "jnlp")]
#[command(version, verbatim_doc_comment)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// key=value settings and the manifest (`-` for stdin)
    #[arg(value_name = "ARGS")]
    pub tokens: Vec<String>,
}
