//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `FORAGE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{DEFAULT_FUZZY_THRESHOLD, is_valid_threshold};
use crate::nutrition::{DEFAULT_NUTRITION_URL, DEFAULT_USER_AGENT};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `FORAGE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding one file per cache entry. Default: `./.data/cache`.
    pub storage_path: PathBuf,

    /// Sentence-transformers model directory. `None` runs the stub embedder.
    pub model_dir: Option<PathBuf>,

    /// Corpus embedding matrix (`.npy`).
    pub corpus_vectors: PathBuf,

    /// Corpus row metadata (JSON Lines).
    pub corpus_metadata: PathBuf,

    /// Default fuzzy acceptance threshold in `[0, 100]`. Default: `85`.
    pub fuzzy_threshold: f64,

    /// Nutrition API base URL; `None` disables enrichment.
    pub nutrition_url: Option<String>,

    /// User agent sent to the nutrition API.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            storage_path: PathBuf::from("./.data/cache"),
            model_dir: None,
            corpus_vectors: PathBuf::from("./embeddings/embeddings.npy"),
            corpus_metadata: PathBuf::from("./embeddings/metadata.jsonl"),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            nutrition_url: Some(DEFAULT_NUTRITION_URL.to_string()),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub const ENV_PORT: &'static str = "FORAGE_PORT";
    pub const ENV_BIND_ADDR: &'static str = "FORAGE_BIND_ADDR";
    pub const ENV_STORAGE_PATH: &'static str = "FORAGE_STORAGE_PATH";
    pub const ENV_MODEL_DIR: &'static str = "FORAGE_MODEL_DIR";
    pub const ENV_CORPUS_VECTORS: &'static str = "FORAGE_CORPUS_VECTORS";
    pub const ENV_CORPUS_METADATA: &'static str = "FORAGE_CORPUS_METADATA";
    pub const ENV_FUZZY_THRESHOLD: &'static str = "FORAGE_FUZZY_THRESHOLD";
    pub const ENV_NUTRITION_URL: &'static str = "FORAGE_NUTRITION_URL";
    pub const ENV_USER_AGENT: &'static str = "FORAGE_USER_AGENT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let model_dir = Self::parse_optional_path_from_env(Self::ENV_MODEL_DIR);
        let corpus_vectors =
            Self::parse_path_from_env(Self::ENV_CORPUS_VECTORS, defaults.corpus_vectors);
        let corpus_metadata =
            Self::parse_path_from_env(Self::ENV_CORPUS_METADATA, defaults.corpus_metadata);
        let fuzzy_threshold = Self::parse_threshold_from_env(defaults.fuzzy_threshold)?;
        let nutrition_url = match env::var(Self::ENV_NUTRITION_URL) {
            Ok(value) => Some(value.trim().to_string()).filter(|v| !v.is_empty()),
            Err(_) => defaults.nutrition_url,
        };
        let user_agent = env::var(Self::ENV_USER_AGENT)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.user_agent);

        Ok(Self {
            port,
            bind_addr,
            storage_path,
            model_dir,
            corpus_vectors,
            corpus_metadata,
            fuzzy_threshold,
            nutrition_url,
            user_agent,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        if let Some(ref path) = self.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        for path in [&self.corpus_vectors, &self.corpus_metadata] {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if !is_valid_threshold(self.fuzzy_threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.fuzzy_threshold.to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: f64) -> Result<f64, ConfigError> {
        match env::var(Self::ENV_FUZZY_THRESHOLD) {
            Ok(value) => {
                let threshold: f64 =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::ThresholdParseError {
                            value: value.clone(),
                            source: e,
                        })?;

                if !is_valid_threshold(threshold) {
                    return Err(ConfigError::InvalidThreshold { value });
                }

                Ok(threshold)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
