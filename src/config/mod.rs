//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

const DEFAULT_BASE_URL: &str = "https://solaris.games";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Game server base URL
    pub base_url: Url,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Per-request timeout; full-game syncs can be large
    pub timeout: Duration,

    /// Account email for online mode
    pub email: Option<String>,
    /// Account password for online mode
    pub password: Option<String>,
    /// Game id, display name or slug to load in online mode
    pub game: Option<String>,

    /// Directory holding one cache file per game
    pub cache_dir: Option<PathBuf>,
    /// Load from this dump directory instead of the network
    pub offline_dir: Option<PathBuf>,
    /// Write the loaded game to this directory in dump layout
    pub dump_dir: Option<PathBuf>,
}

/// Where the binary gets its game from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Offline {
        dir: PathBuf,
    },
    Online {
        email: String,
        password: String,
        game: String,
    },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = var("SOLARIS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).map_err(|_| ConfigError::InvalidUrl(base_url))?;

        let timeout = match var("SOLARIS_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("SOLARIS_TIMEOUT_SECS", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            timeout: Duration::from_secs(timeout),

            email: var("SOLARIS_EMAIL"),
            password: var("SOLARIS_PASSWORD"),
            game: var("SOLARIS_GAME"),

            cache_dir: var("SOLARIS_CACHE_DIR").map(PathBuf::from),
            offline_dir: var("SOLARIS_OFFLINE_DIR").map(PathBuf::from),
            dump_dir: var("SOLARIS_DUMP_DIR").map(PathBuf::from),
        })
    }

    /// Offline when a dump directory is configured, online otherwise
    pub fn mode(&self) -> Result<Mode, ConfigError> {
        if let Some(dir) = &self.offline_dir {
            return Ok(Mode::Offline { dir: dir.clone() });
        }

        Ok(Mode::Online {
            email: self
                .email
                .clone()
                .ok_or(ConfigError::Missing("SOLARIS_EMAIL"))?,
            password: self
                .password
                .clone()
                .ok_or(ConfigError::Missing("SOLARIS_PASSWORD"))?,
            game: self.game.clone().ok_or(ConfigError::Missing("SOLARIS_GAME"))?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
