use std::{env, fs, io::ErrorKind, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

use crate::api::normalize_base;

pub const CONFIG_PATH_ENV: &str = "PHISHGUARD_CONFIG";
pub const API_URL_ENV: &str = "PHISHGUARD_API_URL";
pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum PrefError {
    #[error("unable to access config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("unable to parse config file: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("unable to write default config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("api_base is not usable: {0}")]
    InvalidApiBase(String),
    #[error("unknown log_level {0:?}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Preferences {
    http_ip: String,
    port: u16,
    api_base: String,
    https_cert_path: Option<String>,
    https_key_path: Option<String>,
    log_level: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            http_ip: String::from("127.0.0.1"),
            port: 3000,
            api_base: String::from(DEFAULT_API_BASE),
            https_cert_path: None,
            https_key_path: None,
            log_level: String::from("info"),
        }
    }
}

impl Preferences {
    pub fn http_ip(&self) -> &str {
        self.http_ip.as_str()
    }
    pub fn port(&self) -> u16 {
        self.port
    }
    pub fn api_base(&self) -> &str {
        self.api_base.as_str()
    }

    /// Certificate and key paths, only when both are configured
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.https_cert_path, &self.https_key_path) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }

    pub fn log_level(&self) -> Result<Level, PrefError> {
        Level::from_str(self.log_level.trim())
            .map_err(|_| PrefError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Loads the config file named by `PHISHGUARD_CONFIG` (or `./config.toml`) and applies the
    /// `PHISHGUARD_API_URL` override
    pub fn from_env() -> Result<Self, PrefError> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| String::from(DEFAULT_CONFIG_PATH));
        Self::load_config(&path)?.with_api_base_override(env::var(API_URL_ENV).ok())
    }

    /// Reads preferences from a TOML file, writing a default one first if the file doesn't exist.
    /// Fields missing from the file keep their defaults.
    pub fn load_config(path: &str) -> Result<Self, PrefError> {
        let prefs: Self = match fs::read_to_string(path) {
            Ok(buff) => toml::from_str(buff.as_str())?,
            Err(err) if err.kind() == ErrorKind::NotFound => create_default_config(path)?,
            Err(err) => return Err(PrefError::IoError(err)),
        };
        prefs.validated()
    }

    /// Replaces the API base with an environment-supplied one, if any
    pub fn with_api_base_override(mut self, api_base: Option<String>) -> Result<Self, PrefError> {
        if let Some(api_base) = api_base.filter(|base| !base.trim().is_empty()) {
            self.api_base = api_base;
        }
        self.validated()
    }

    fn validated(mut self) -> Result<Self, PrefError> {
        self.api_base = normalize_base(&self.api_base)
            .map_err(|err| PrefError::InvalidApiBase(err.to_string()))?;
        self.log_level()?;
        Ok(self)
    }
}

fn create_default_config(path: &str) -> Result<Preferences, PrefError> {
    let new_pref = Preferences::default();
    tracing::warn!("No config found at {path}, writing defaults");
    fs::write(path, toml::to_string(&new_pref)?)?;
    Ok(new_pref)
}
