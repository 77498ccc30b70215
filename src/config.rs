use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::http::framing::{FramingPolicy, ReadLimits};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Server settings.
///
/// Layered as defaults, then an optional YAML file, then the `LISTEN` and
/// `SERVE_DIR` environment variables, then command line flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Root directory for the `/files/` routes
    pub directory: PathBuf,
    /// Size of the receive buffer; with `single_read` framing this caps the request size
    pub read_buffer_size: usize,
    pub framing: FramingPolicy,
    pub max_request_size: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:4221".to_string(),
            directory: PathBuf::from("."),
            read_buffer_size: 1024,
            framing: FramingPolicy::SingleRead,
            max_request_size: 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn load() -> Self {
        Self::default().with_env()
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Applies `LISTEN` and `SERVE_DIR` as returned by `lookup`.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup("LISTEN") {
            self.listen_addr = addr;
        }
        if let Some(dir) = lookup("SERVE_DIR") {
            self.directory = PathBuf::from(dir);
        }
        self
    }

    pub fn limits(&self) -> ReadLimits {
        ReadLimits {
            buffer_size: self.read_buffer_size,
            max_request_size: self.max_request_size,
        }
    }
}
