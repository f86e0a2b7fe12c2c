//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;
use std::time::Duration;

use crate::controls::ApiControls;
use crate::provider::PrimaryConfig;
use crate::report::ProviderId;

/// Environment variable consulted when `[primary] api_key` is empty.
pub const API_KEY_ENV: &str = "RAPIDAPI_KEY";

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Primary provider (ADS-B Exchange) settings
    pub primary: PrimarySettings,
    /// Secondary provider (OpenSky) settings
    pub secondary: SecondarySettings,
    /// Fetch behavior
    pub fetch: FetchSettings,
    /// Local provider switches
    pub controls: ControlsSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// `[primary]`
#[derive(Debug, Clone, PartialEq)]
pub struct PrimarySettings {
    /// RapidAPI host
    pub host: String,
    /// RapidAPI key; `None` defers to the `RAPIDAPI_KEY` environment variable
    pub api_key: Option<String>,
    /// Radius of each global region in nautical miles
    pub radius_nm: f64,
}

/// `[secondary]`
#[derive(Debug, Clone, PartialEq)]
pub struct SecondarySettings {
    pub base_url: String,
}

/// `[fetch]`
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    /// Provider tried first
    pub provider: ProviderId,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// `[controls]`
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsSettings {
    pub master_enabled: bool,
    pub primary_enabled: bool,
    pub secondary_enabled: bool,
    /// How long loaded switches are trusted before re-reading
    pub cache_ttl_secs: u64,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl ConfigFile {
    /// Primary client settings, with the API key resolved from the
    /// environment when the file leaves it empty.
    pub fn primary_config(&self) -> PrimaryConfig {
        self.primary_config_with_env(std::env::var(API_KEY_ENV).ok())
    }

    fn primary_config_with_env(&self, env_key: Option<String>) -> PrimaryConfig {
        let api_key = self
            .primary
            .api_key
            .clone()
            .or(env_key)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        PrimaryConfig {
            host: self.primary.host.clone(),
            api_key,
            radius_nm: self.primary.radius_nm,
        }
    }

    /// Switches from the `[controls]` section.
    pub fn api_controls(&self) -> ApiControls {
        ApiControls {
            master_enabled: self.controls.master_enabled,
            primary_enabled: self.controls.primary_enabled,
            secondary_enabled: self.controls.secondary_enabled,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }

    pub fn controls_ttl(&self) -> Duration {
        Duration::from_secs(self.controls.cache_ttl_secs)
    }
}
