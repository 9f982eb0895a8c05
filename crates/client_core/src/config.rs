use std::{fs, io, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_SETTINGS_FILE: &str = "users.toml";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_NOTIFICATION_AUTO_HIDE: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    /// `None` keeps notifications visible until dismissed.
    pub notification_auto_hide: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout: None,
            notification_auto_hide: Some(DEFAULT_NOTIFICATION_AUTO_HIDE),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    notification_auto_hide_ms: Option<u64>,
}

/// Loads settings from `users.toml` in the working directory and the process
/// environment.
pub fn load_settings() -> Result<ClientSettings, ConfigError> {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |key| {
        std::env::var(key).ok()
    })
}

/// Defaults, then the settings file if it exists, then environment overrides.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, ConfigError> {
    let mut settings = ClientSettings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings =
                toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            if let Some(v) = file_cfg.base_url {
                settings.base_url = v;
            }
            if let Some(ms) = file_cfg.request_timeout_ms {
                settings.request_timeout = millis(ms);
            }
            if let Some(ms) = file_cfg.notification_auto_hide_ms {
                settings.notification_auto_hide = millis(ms);
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    apply_env_overrides(&mut settings, env);
    Ok(settings)
}

fn apply_env_overrides(settings: &mut ClientSettings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("USERS_API_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(ms) = env("APP__REQUEST_TIMEOUT_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
        settings.request_timeout = millis(ms);
    }
    if let Some(ms) =
        env("APP__NOTIFICATION_AUTO_HIDE_MS").and_then(|v| v.trim().parse::<u64>().ok())
    {
        settings.notification_auto_hide = millis(ms);
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
