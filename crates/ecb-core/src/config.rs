//! Bridge configuration
//!
//! Loaded from a TOML file, then overridden by `ECB_*` environment
//! variables. The settings surface reads and writes a flat key namespace
//! (`operation_timeout_secs`, `toolchain.program`, ...).

use crate::error::ConfigError;
use ecb_reflect::TypeDeclaration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ecb.toml";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "ECB_";

/// External program serving build and test requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub program: Option<String>,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Address clients use to reach the bridge; reported by `ping`
    pub endpoint: String,
    /// Directory receiving result artifacts
    pub output_dir: PathBuf,
    /// Append-only operation log
    pub log_file: PathBuf,
    /// Time budget of delegated build/test jobs
    pub operation_timeout_secs: u64,
    pub debug: bool,
    pub max_traversal_depth: usize,
    pub toolchain: ToolchainConfig,
    /// Project component types registered into the `user` namespace
    pub types: Vec<TypeDeclaration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            endpoint: "stdio".to_string(),
            output_dir: PathBuf::from("ecb-output"),
            log_file: PathBuf::from("ecb-output/ecb.log"),
            operation_timeout_secs: 300,
            debug: false,
            max_traversal_depth: ecb_scene::DEFAULT_MAX_DEPTH,
            toolchain: ToolchainConfig::default(),
            types: Vec::new(),
        }
    }
}

/// Flat keys understood by [`BridgeConfig::get`] and [`BridgeConfig::set`]
pub const SETTING_KEYS: &[&str] = &[
    "endpoint",
    "output_dir",
    "log_file",
    "operation_timeout_secs",
    "debug",
    "max_traversal_depth",
    "toolchain.program",
    "toolchain.args",
    "toolchain.working_dir",
];

impl BridgeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration rooted at `output_dir`
    #[must_use]
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            log_file: output_dir.join("ecb.log"),
            output_dir,
            ..Self::default()
        }
    }

    /// Parse TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Load `path` (which must exist), or `ecb.toml` if present, or defaults;
    /// then apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        config.apply_env(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ECB_<KEY>` overrides; unrelated variables are ignored
    pub fn apply_env<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_ascii_lowercase();
            if SETTING_KEYS.contains(&key.as_str()) {
                tracing::debug!(key = %key, "setting overridden from environment");
                self.set(&key, &value)?;
            }
        }
        Ok(())
    }

    /// Reject values the bridge cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operation_timeout_secs == 0 {
            return Err(invalid("operation_timeout_secs", "0", "must be at least 1"));
        }
        if self.max_traversal_depth == 0 {
            return Err(invalid("max_traversal_depth", "0", "must be at least 1"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(invalid("output_dir", "", "must not be empty"));
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    /// Current value of a flat key
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "endpoint" => self.endpoint.clone(),
            "output_dir" => self.output_dir.display().to_string(),
            "log_file" => self.log_file.display().to_string(),
            "operation_timeout_secs" => self.operation_timeout_secs.to_string(),
            "debug" => self.debug.to_string(),
            "max_traversal_depth" => self.max_traversal_depth.to_string(),
            "toolchain.program" => self.toolchain.program.clone().unwrap_or_default(),
            "toolchain.args" => self.toolchain.args.join(","),
            "toolchain.working_dir" => self
                .toolchain
                .working_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }

    /// Set a flat key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "endpoint" => self.endpoint = value.to_string(),
            "output_dir" => self.output_dir = PathBuf::from(value),
            "log_file" => self.log_file = PathBuf::from(value),
            "operation_timeout_secs" => {
                self.operation_timeout_secs = value
                    .trim()
                    .parse()
                    .map_err(|e| invalid(key, value, &format!("{e}")))?;
            }
            "debug" => {
                self.debug = match ecb_reflect::coerce(value, &ecb_scene::ValueType::Bool) {
                    Some(ecb_scene::PropertyValue::Bool(v)) => v,
                    _ => return Err(invalid(key, value, "expected a boolean")),
                };
            }
            "max_traversal_depth" => {
                self.max_traversal_depth = value
                    .trim()
                    .parse()
                    .map_err(|e| invalid(key, value, &format!("{e}")))?;
            }
            "toolchain.program" => {
                self.toolchain.program = Some(value.trim().to_string()).filter(|p| !p.is_empty());
            }
            "toolchain.args" => {
                self.toolchain.args = value
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "toolchain.working_dir" => {
                self.toolchain.working_dir = Some(PathBuf::from(value.trim())).filter(|p| !p.as_os_str().is_empty());
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Write as TOML
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
