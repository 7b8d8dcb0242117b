//! Gateway configuration.
//!
//! ```toml
//! [ledger]
//! path = "./state/runtime/system_state.json"
//!
//! [fuzz]
//! cosine_threshold = 0.12
//! perturb_scale = 0.01
//! seed = 71
//!
//! [log]
//! level = "info"
//! file = "${HOME}/.vecgate/logs/vecgate.log"
//! ```
//!
//! Every field is optional. `${VAR}` references in paths are expanded from the
//! environment at load time.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_ENV: &str = "VECGATE_CONFIG";
pub const LEDGER_PATH_ENV: &str = "VECGATE_LEDGER_PATH";

pub const DEFAULT_LEDGER_PATH: &str = "./state/runtime/system_state.json";
pub const DEFAULT_COSINE_THRESHOLD: f64 = 0.12;
pub const DEFAULT_PERTURB_SCALE: f64 = 0.01;
pub const DEFAULT_FUZZ_SEED: u64 = 71;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    pub ledger: LedgerConfig,
    pub fuzz: FuzzConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Location of the persisted ledger JSON document.
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LEDGER_PATH),
        }
    }
}

/// Defaults applied to fuzz runs that don't override them per request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FuzzConfig {
    pub cosine_threshold: f64,
    /// Jitter bound for perturbation. Must be finite and non-negative.
    pub perturb_scale: f64,
    /// Seed for the request-scoped perturbation stream.
    pub seed: u64,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            cosine_threshold: DEFAULT_COSINE_THRESHOLD,
            perturb_scale: DEFAULT_PERTURB_SCALE,
            seed: DEFAULT_FUZZ_SEED,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl GatewayConfig {
    /// Resolve and load the configuration.
    ///
    /// An explicit path must exist. The `VECGATE_CONFIG` and home-directory
    /// fallbacks silently yield defaults when the file is absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => match resolve_config_path(env::var_os(CONFIG_ENV), dirs::home_dir()) {
                Some(path) if path.exists() => Self::load_from(&path)?,
                Some(path) => {
                    tracing::debug!(path = %path.display(), "No config file, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        if let Some(path) = env::var_os(LEDGER_PATH_ENV).filter(|v| !v.is_empty()) {
            config.ledger.path = PathBuf::from(path);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        let mut config = Self::parse(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        config.expand_paths();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scale = self.fuzz.perturb_scale;
        if !scale.is_finite() || scale < 0.0 {
            return Err(ConfigError::Invalid {
                field: "fuzz.perturb_scale",
                reason: format!("must be finite and non-negative (got {scale})"),
            });
        }
        if !self.fuzz.cosine_threshold.is_finite() {
            return Err(ConfigError::Invalid {
                field: "fuzz.cosine_threshold",
                reason: "must be finite".to_string(),
            });
        }
        if self.ledger.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "ledger.path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn expand_paths(&mut self) {
        self.ledger.path = expand_path(&self.ledger.path);
        if let Some(file) = self.log.file.as_mut() {
            *file = expand_path(file);
        }
    }
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => PathBuf::from(expand_env_vars(raw)),
        None => path.to_path_buf(),
    }
}

/// Default config location: `VECGATE_CONFIG`, else `~/.vecgate/config.toml`.
fn resolve_config_path(env_value: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    env_value
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|home| home.join(".vecgate").join("config.toml")))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    resolve_config_path(env::var_os(CONFIG_ENV), dirs::home_dir())
}

/// Replace `${VAR}` with the variable's value (empty when unset).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}
