use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Trust anchor directories searched when nothing else is configured,
/// highest precedence first
pub const DEFAULT_SEARCH_DIRS: &[&str] = &[
    "/etc/heimdall/dnssec-trust-anchors.d",
    "/run/heimdall/dnssec-trust-anchors.d",
    "/usr/local/lib/heimdall/dnssec-trust-anchors.d",
    "/usr/lib/heimdall/dnssec-trust-anchors.d",
];

#[derive(Debug, Clone, PartialEq)]
pub struct AnchorConfig {
    /// Directories scanned for `*.positive` / `*.negative` files.
    /// Earlier entries override files of the same name in later ones.
    pub search_dirs: Vec<PathBuf>,

    /// Whether to log every loaded anchor after a successful load
    pub dump_on_load: bool,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            search_dirs: DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from).collect(),
            dump_on_load: true,
        }
    }
}

/// On-disk representation; every key is optional and falls back to the defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnchorConfigFile {
    search_dirs: Option<Vec<PathBuf>>,
    dump_on_load: Option<bool>,
}

impl AnchorConfig {
    /// Build a configuration for an explicit directory list
    pub fn with_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_dirs: dirs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create an AnchorConfig from environment variables
    /// Returns Err if the resulting configuration is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(dirs) = std::env::var("HEIMDALL_TRUST_ANCHOR_DIRS") {
            config.search_dirs = parse_dir_list(&dirs);
        }

        if let Ok(dump) = std::env::var("HEIMDALL_TRUST_ANCHOR_DUMP") {
            config.dump_on_load = parse_bool(&dump, config.dump_on_load);
        }

        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document with optional `search_dirs` and `dump_on_load` keys
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: AnchorConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let mut config = Self::default();
        if let Some(dirs) = file.search_dirs {
            config.search_dirs = dirs;
        }
        if let Some(dump) = file.dump_on_load {
            config.dump_on_load = dump;
        }

        config.validate()?;

        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_dirs.is_empty() {
            return Err(ConfigError::NoDirectories);
        }

        for dir in &self.search_dirs {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidDirectory(format!(
                    "{} is not an absolute path",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

/// Split a `:` or `,` separated directory list, dropping empty entries
fn parse_dir_list(s: &str) -> Vec<PathBuf> {
    s.split([':', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Parse a boolean from a string, with a default value for invalid input
fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}
