use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::{controller::SequencePolicy, store::JsonFileStore};

pub const CONFIG_FILE: &str = "shiftdesk.toml";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub store_path: Option<PathBuf>,
    pub sequence: SequencePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            store_path: None,
            sequence: SequencePolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid server url '{value}': {source}")]
    InvalidServerUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("invalid sequence policy in {origin}: {reason}")]
    InvalidSequence { origin: String, reason: String },
    #[error("no store path configured and no local data directory available")]
    NoStorePath,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    store_path: Option<PathBuf>,
    sequence: Option<SequencePolicy>,
}

impl Settings {
    /// Replaces the server URL, rejecting values that do not parse.
    pub fn set_server_url(&mut self, value: &str) -> Result<(), ConfigError> {
        parse_server_url(value)?;
        self.server_url = value.trim().to_string();
        Ok(())
    }

    pub fn parsed_server_url(&self) -> Result<Url, ConfigError> {
        parse_server_url(&self.server_url)
    }

    /// The configured store file, or the per-user default location.
    pub fn resolved_store_path(&self) -> Result<PathBuf, ConfigError> {
        self.store_path
            .clone()
            .or_else(JsonFileStore::default_path)
            .ok_or(ConfigError::NoStorePath)
    }
}

fn parse_server_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidServerUrl {
        value: value.to_string(),
        source,
    })
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(Path::new(CONFIG_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the config file when it exists, then environment variables.
/// The `APP__*` names win over the `SHIFTDESK_*` ones.
pub fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    match fs::read_to_string(config_path) {
        Ok(raw) => {
            let file_cfg: FileSettings =
                toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: config_path.to_path_buf(),
                    source,
                })?;
            if let Some(v) = file_cfg.server_url {
                settings.set_server_url(&v)?;
            }
            if let Some(v) = file_cfg.store_path {
                settings.store_path = Some(v);
            }
            if let Some(v) = file_cfg.sequence {
                settings.sequence = v;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path.to_path_buf(),
                source,
            })
        }
    }

    for name in ["SHIFTDESK_SERVER_URL", "APP__SERVER_URL"] {
        if let Some(v) = env(name) {
            settings.set_server_url(&v)?;
        }
    }
    for name in ["SHIFTDESK_STORE", "APP__STORE_PATH"] {
        if let Some(v) = env(name) {
            settings.store_path = Some(PathBuf::from(v));
        }
    }
    if let Some(v) = env("APP__SEQUENCE") {
        settings.sequence = v.parse().map_err(|reason| ConfigError::InvalidSequence {
            origin: "APP__SEQUENCE".to_string(),
            reason,
        })?;
    }

    Ok(settings)
}
