//! TOML-based configuration for the connector binary.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\OmicronConnector\config.toml`
//! - Linux:    `~/.config/omicron-connector/config.toml`
//! - macOS:    `~/Library/Application Support/OmicronConnector/config.toml`
//!
//! Every field carries a `#[serde(default = "...")]` so a partial file (or no
//! file at all) still yields a usable config. Example:
//!
//! ```toml
//! [connector]
//! server_host = "tracker.lab.local"
//! control_port = 27000
//! data_port = 7000
//! variant = "omicron"
//!
//! [client]
//! poll_interval_ms = 10
//! log_level = "info"
//! ```

use std::path::PathBuf;

use omicron_core::ProtocolVariant;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::network::ConnectorConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub connector: ConnectorSection,
    #[serde(default)]
    pub client: ClientSection,
}

/// Where and how to dial the input server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorSection {
    /// Hostname or IP of the input server.
    #[serde(default = "default_server_host")]
    pub server_host: String,
    /// TCP port of the server's control channel.
    #[serde(default = "default_control_port")]
    pub control_port: u16,
    /// Local UDP port the server streams events to.
    #[serde(default = "default_data_port")]
    pub data_port: u16,
    /// Handshake variant: `"omicron"`, `"omicron_legacy"`, `"tactile"` or `"plain"`.
    #[serde(default)]
    pub variant: ProtocolVariant,
}

/// Local consumer behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSection {
    /// How often the dispatcher drains the queue, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_server_host() -> String {
    "localhost".to_string()
}
fn default_control_port() -> u16 {
    omicron_core::CONTROL_PORT_DEFAULT
}
fn default_data_port() -> u16 {
    omicron_core::DATA_PORT_DEFAULT
}
fn default_poll_interval_ms() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connector: ConnectorSection::default(),
            client: ClientSection::default(),
        }
    }
}

impl Default for ConnectorSection {
    fn default() -> Self {
        Self {
            server_host: default_server_host(),
            control_port: default_control_port(),
            data_port: default_data_port(),
            variant: ProtocolVariant::default(),
        }
    }
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            log_level: default_log_level(),
        }
    }
}

impl ConnectorSection {
    /// Converts the on-disk section into the network layer's config.
    pub fn to_connector_config(&self) -> ConnectorConfig {
        ConnectorConfig {
            server_host: self.server_host.clone(),
            control_port: self.control_port,
            data_port: self.data_port,
            variant: self.variant,
        }
    }
}

// ── Config file access ────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from disk, returning `AppConfig::default()` if the file
/// does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Persists `config` to disk, creating the config directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_file_path()?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("OmicronConnector"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("omicron-connector"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("OmicronConnector")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_has_reference_ports() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.connector.control_port, 27000);
        assert_eq!(cfg.connector.data_port, 7000);
        assert_eq!(cfg.connector.server_host, "localhost");
        assert_eq!(cfg.connector.variant, ProtocolVariant::Omicron);
    }

    #[test]
    fn test_client_section_defaults() {
        let cfg = ClientSection::default();
        assert_eq!(cfg.poll_interval_ms, 10);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_app_config_round_trips_through_toml() {
        // Arrange
        let mut cfg = AppConfig::default();
        cfg.connector.server_host = "tracker.lab.local".to_string();
        cfg.connector.data_port = 7100;
        cfg.client.log_level = "debug".to_string();

        // Act
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: AppConfig = toml::from_str(&toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_connector_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[connector]
server_host = "10.0.0.5"
variant = "tactile"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.connector.server_host, "10.0.0.5");
        assert_eq!(cfg.connector.variant, ProtocolVariant::TacTile);
        // Unspecified fields keep their defaults.
        assert_eq!(cfg.connector.control_port, 27000);
        assert_eq!(cfg.client.poll_interval_ms, 10);
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_to_connector_config_carries_every_field() {
        let section = ConnectorSection {
            server_host: "192.168.1.20".to_string(),
            control_port: 28000,
            data_port: 7005,
            variant: ProtocolVariant::OmicronLegacy,
        };

        let net = section.to_connector_config();

        assert_eq!(net.server_host, "192.168.1.20");
        assert_eq!(net.control_port, 28000);
        assert_eq!(net.data_port, 7005);
        assert_eq!(net.variant, ProtocolVariant::OmicronLegacy);
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir in a stripped environment is also acceptable.
    }
}
