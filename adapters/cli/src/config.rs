//! TOML configuration for the command-line adapter.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Configuration schema version understood by this binary.
const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// File consulted when no `--config` flag is given.
const DEFAULT_CONFIG_PATH: &str = "pushbox.toml";

/// Settings resolved from the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Config {
    /// Collection export settings.
    pub(crate) export: ExportConfig,
    /// Diagnostic output settings.
    pub(crate) log: LogConfig,
}

/// `[export]` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ExportConfig {
    /// Writes boards as run-length coded single lines.
    pub(crate) compact: bool,
}

/// `[log]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LogConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub(crate) filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    version: u32,
    #[serde(default)]
    export: ExportConfig,
    #[serde(default)]
    log: LogConfig,
}

impl Config {
    /// Loads the explicit file, or `pushbox.toml` when it exists, or defaults.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        parse_config(&contents)
            .with_context(|| format!("invalid config at {}", path.display()))
    }
}

fn parse_config(contents: &str) -> Result<Config> {
    let file: ConfigFile =
        toml::from_str(contents).context("failed to parse config toml contents")?;
    if file.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported config version {}; expected {}",
            file.version,
            SUPPORTED_CONFIG_VERSION
        );
    }
    if file.log.filter.trim().is_empty() {
        bail!("log filter must not be empty");
    }

    Ok(Config {
        export: file.export,
        log: file.log,
    })
}
