//! Server configuration parsed from environment variables.

use crate::model::{DEFAULT_FIRE_SPAWN_MINUTES, DEFAULT_WATER_SPAWN_MINUTES, SpawnDefaults};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WS_CLIENT_BUFFER: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    /// Outbound queue capacity per websocket connection.
    pub ws_client_buffer: usize,
    pub spawn_defaults: SpawnDefaults,
    /// Drop a channel's hydra spawn settings when the channel is deleted.
    pub purge_spawn_settings_on_delete: bool,
}

impl Config {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `PORT`: default 3000
    /// - `WS_CLIENT_BUFFER`: default 256
    /// - `HYDRA_WATER_SPAWN_MINUTES`: default 35
    /// - `HYDRA_FIRE_SPAWN_MINUTES`: default 37
    /// - `PURGE_SPAWN_SETTINGS_ON_DELETE`: default false
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let ws_client_buffer = parse_or(&lookup, "WS_CLIENT_BUFFER", DEFAULT_WS_CLIENT_BUFFER)?;
        if ws_client_buffer == 0 {
            return Err(ConfigError::Zero { key: "WS_CLIENT_BUFFER" });
        }
        let spawn_defaults = SpawnDefaults {
            water: parse_or(&lookup, "HYDRA_WATER_SPAWN_MINUTES", DEFAULT_WATER_SPAWN_MINUTES)?,
            fire: parse_or(&lookup, "HYDRA_FIRE_SPAWN_MINUTES", DEFAULT_FIRE_SPAWN_MINUTES)?,
        };
        let purge_spawn_settings_on_delete = parse_or(&lookup, "PURGE_SPAWN_SETTINGS_ON_DELETE", false)?;

        Ok(Self { bind_addr, port, ws_client_buffer, spawn_defaults, purge_spawn_settings_on_delete })
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            ws_client_buffer: DEFAULT_WS_CLIENT_BUFFER,
            spawn_defaults: SpawnDefaults::default(),
            purge_spawn_settings_on_delete: false,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
