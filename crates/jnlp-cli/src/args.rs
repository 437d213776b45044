//! `key=value` token handling
//!
//! Every key may appear once. The manifest is a key too: given either as a
//! bare token or as `jnlp=PATH`. A `config=PATH` file supplies the base
//! settings that the remaining tokens override.

use std::path::PathBuf;

use jnlp_core::{LaunchConfig, ManifestSource};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Jnlp,
    Java,
    Propsjar,
    Unpack,
    Blacklist,
    Temp,
    Debug,
    Security,
    Timeout,
    Insecure,
    Config,
}

impl Key {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "jnlp" => Self::Jnlp,
            "java" => Self::Java,
            "propsjar" => Self::Propsjar,
            "unpack" => Self::Unpack,
            "blacklist" => Self::Blacklist,
            "temp" => Self::Temp,
            "debug" => Self::Debug,
            "security" => Self::Security,
            "timeout" => Self::Timeout,
            "insecure" => Self::Insecure,
            "config" => Self::Config,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Self::Jnlp => "jnlp",
            Self::Java => "java",
            Self::Propsjar => "propsjar",
            Self::Unpack => "unpack",
            Self::Blacklist => "blacklist",
            Self::Temp => "temp",
            Self::Debug => "debug",
            Self::Security => "security",
            Self::Timeout => "timeout",
            Self::Insecure => "insecure",
            Self::Config => "config",
        }
    }
}

/// Parsed command line.
#[derive(Debug)]
pub struct Settings {
    /// `None` when no manifest was given
    pub manifest: Option<ManifestSource>,
    pub config: LaunchConfig,
}

/// Parse tokens on top of the built-in defaults (or the `config=` file).
pub fn parse(tokens: &[String]) -> Result<Settings> {
    parse_with(tokens, LaunchConfig::default)
}

/// Like [`parse`], with `defaults` supplying the base when no `config=` is given.
pub fn parse_with(tokens: &[String], defaults: impl FnOnce() -> LaunchConfig) -> Result<Settings> {
    let pairs = split(tokens)?;

    let mut config = match pairs.iter().find(|(key, _)| *key == Key::Config) {
        Some((_, path)) => LaunchConfig::load(&PathBuf::from(path))?,
        None => defaults(),
    };

    let mut manifest = None;
    for (key, value) in &pairs {
        match key {
            Key::Jnlp => manifest = Some(ManifestSource::from_arg(value)),
            Key::Config => {}
            _ => apply(&mut config, *key, value)?,
        }
    }

    Ok(Settings { manifest, config })
}

fn split(tokens: &[String]) -> Result<Vec<(Key, String)>> {
    let mut pairs: Vec<(Key, String)> = Vec::with_capacity(tokens.len());

    for token in tokens {
        let (key, value) = match token.split_once('=') {
            Some((name, value)) => {
                let key = Key::from_name(name)
                    .ok_or_else(|| CliError::user(format!("Unknown option: {name}")))?;
                (key, value.to_string())
            }
            None => (Key::Jnlp, token.clone()),
        };

        if pairs.iter().any(|(seen, _)| *seen == key) {
            let message = if key == Key::Jnlp {
                format!("More than one manifest given: {token}")
            } else {
                format!("Duplicate option: {}", key.name())
            };
            return Err(CliError::user(message));
        }
        pairs.push((key, value));
    }

    Ok(pairs)
}

fn apply(config: &mut LaunchConfig, key: Key, value: &str) -> Result<()> {
    match key {
        Key::Java => config.java = value.into(),
        Key::Propsjar => config.propsjar = value.into(),
        Key::Unpack => config.unpack = Some(value.into()),
        Key::Blacklist => config.blacklist = value.to_string(),
        Key::Temp => config.temp = value.into(),
        Key::Security => config.security = value.into(),
        Key::Debug => config.debug = parse_bool(key, value)?,
        Key::Insecure => config.insecure = parse_bool(key, value)?,
        Key::Timeout => {
            config.timeout_secs = value
                .parse()
                .map_err(|_| invalid(key, value))?;
        }
        Key::Jnlp | Key::Config => {}
    }
    Ok(())
}

fn parse_bool(key: Key, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: Key, value: &str) -> CliError {
    CliError::user(format!("Invalid value for {}: {value:?}", key.name()))
}
