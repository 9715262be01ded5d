//! Runtime tuning for the window manager, loaded from TOML.

use std::time::Duration;

use desktop_app_contract::AppKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::apps::AppCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// What `open` does when the key already has a live entry.
pub enum ReopenPolicy {
    /// Keep the existing body, un-minimize it, and raise it.
    #[default]
    Refocus,
    /// Discard the existing body and mount a fresh one on top.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Delay between `close` and the entry leaving the registry.
    pub close_delay_ms: u64,
    /// Delay between a shutdown request and the desktop powering off.
    pub shutdown_delay_ms: u64,
    /// Apps opened on boot, in order.
    pub boot_apps: Vec<AppKey>,
    pub reopen_policy: ReopenPolicy,
    /// When set, `focus` also clears `minimized`.
    pub focus_restores_minimized: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: 100,
            shutdown_delay_ms: 600,
            boot_apps: vec![AppKey::trusted("showcase")],
            reopen_policy: ReopenPolicy::Refocus,
            focus_restores_minimized: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid runtime config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("boot app `{0}` is not in the application catalog")]
    UnknownBootApp(AppKey),
}

impl RuntimeConfig {
    /// Parses a TOML document; missing fields take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Checks that every boot app is installed.
    pub fn validate(&self, catalog: &AppCatalog) -> Result<(), ConfigError> {
        match self.boot_apps.iter().find(|key| !catalog.contains(key)) {
            Some(key) => Err(ConfigError::UnknownBootApp(key.clone())),
            None => Ok(()),
        }
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    pub fn shutdown_delay(&self) -> Duration {
        Duration::from_millis(self.shutdown_delay_ms)
    }
}
