//
//  wwt-api-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Optional settings read from a TOML file in the platform configuration
//! directory. Every setting has a built-in default, so a missing file is not
//! an error.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/wwt_api_client/config.toml`
//! - **macOS**: `~/Library/Application Support/org.AAS_WWT.wwt_api_client/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\AAS_WWT\wwt_api_client\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [wwt]
//! api_base = "http://localhost:7000"
//!
//! [communities]
//! state_dir = "/home/me/.wwt-state"
//!
//! [constellations]
//! api_url = "https://api.wwtelescope.dev/"
//! id_provider_url = "https://wwtelescope.dev/auth/"
//! client_id = "cli-tool"
//! ```
//!
//! ## Precedence
//!
//! For Constellations, environment variables win over the file, and the file
//! wins over inference from the API URL.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::{Client, DEFAULT_API_BASE};
use crate::api::common::{Error, Result};
use crate::constellations::ClientConfig;

/// All settings.
///
/// # Examples
///
/// ```rust
/// use wwt_api_client::config::Config;
///
/// let config: Config = toml::from_str("[wwt]\napi_base = \"http://localhost:7000\"\n")?;
/// assert_eq!(config.client().base_url(), "http://localhost:7000");
/// assert!(config.communities.state_dir.is_none());
/// # Ok::<(), toml::de::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Core WWT web services.
    #[serde(default)]
    pub wwt: WwtConfig,

    /// The Communities login.
    #[serde(default)]
    pub communities: CommunitiesConfig,

    /// The Constellations service.
    #[serde(default)]
    pub constellations: ConstellationsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WwtConfig {
    /// Base URL of the WWT web services. Defaults to [`DEFAULT_API_BASE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunitiesConfig {
    /// Where login state is kept. Defaults to the platform state directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstellationsConfig {
    /// Stands in for `NUXT_PUBLIC_API_URL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Stands in for `NUXT_PUBLIC_KEYCLOAK_URL`: the Keycloak base URL,
    /// to which `realms/constellations` is appended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_provider_url: Option<String>,

    /// Stands in for `WWT_API_CLIENT_ID`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl Config {
    /// Loads the configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`; a missing file gives defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Configuration(format!("invalid {}: {e}", path.display())))
    }

    /// Writes the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("cannot serialize configuration: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The default configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "AAS_WWT", "wwt_api_client").ok_or_else(|| {
            Error::Configuration("could not determine the configuration directory".to_string())
        })?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// A session for the configured WWT base URL.
    pub fn client(&self) -> Client {
        Client::with_base(self.wwt.api_base.as_deref().unwrap_or(DEFAULT_API_BASE))
    }

    /// Resolves the Constellations configuration from the environment, then
    /// this file, then inference.
    pub fn constellations_config(&self) -> Result<ClientConfig> {
        self.constellations_config_with(|name| std::env::var(name).ok())
    }

    /// Like [`constellations_config`](Self::constellations_config), reading
    /// the environment through `env`.
    pub fn constellations_config_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ClientConfig> {
        let file = &self.constellations;

        ClientConfig::from_lookup(|name| {
            env(name).or_else(|| match name {
                "NUXT_PUBLIC_API_URL" => file.api_url.clone(),
                "NUXT_PUBLIC_KEYCLOAK_URL" => file.id_provider_url.clone(),
                "WWT_API_CLIENT_ID" => file.client_id.clone(),
                _ => None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.client().base_url(), DEFAULT_API_BASE);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.communities.state_dir = Some(PathBuf::from("/tmp/wwt"));
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[wwt\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_environment_wins_over_file() {
        let config: Config = toml::from_str(
            r#"
            [constellations]
            api_url = "https://example.org/"
            id_provider_url = "https://id.example.org"
            "#,
        )
        .unwrap();

        let from_file = config.constellations_config_with(|_| None).unwrap();
        assert_eq!(from_file.api_url, "https://example.org");
        assert_eq!(from_file.id_provider_url, "https://id.example.org/realms/constellations");

        let from_env = config
            .constellations_config_with(|name| {
                (name == "NUXT_PUBLIC_API_URL").then(|| "http://localhost:7000".to_string())
            })
            .unwrap();
        assert_eq!(from_env.api_url, "http://localhost:7000");
        // The file's provider still beats inference
        assert_eq!(from_env.id_provider_url, "https://id.example.org/realms/constellations");
    }
}
