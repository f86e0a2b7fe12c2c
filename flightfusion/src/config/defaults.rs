//! Default values and constants for all configuration settings.

use super::file::config_directory;
use super::settings::*;
use crate::controls::DEFAULT_CACHE_TTL;
use crate::provider::{
    DEFAULT_HTTP_TIMEOUT, DEFAULT_PRIMARY_HOST, DEFAULT_RADIUS_NM, DEFAULT_SECONDARY_BASE_URL,
};
use crate::report::ProviderId;

/// Default per-request timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = DEFAULT_HTTP_TIMEOUT.as_secs();

/// Default controls cache lifetime in seconds.
pub const DEFAULT_CONTROLS_TTL_SECS: u64 = DEFAULT_CACHE_TTL.as_secs();

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "flightfusion.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            primary: PrimarySettings {
                host: DEFAULT_PRIMARY_HOST.to_string(),
                api_key: None,
                radius_nm: DEFAULT_RADIUS_NM,
            },
            secondary: SecondarySettings {
                base_url: DEFAULT_SECONDARY_BASE_URL.to_string(),
            },
            fetch: FetchSettings {
                provider: ProviderId::Primary,
                timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            },
            controls: ControlsSettings {
                master_enabled: true,
                primary_enabled: true,
                secondary_enabled: true,
                cache_ttl_secs: DEFAULT_CONTROLS_TTL_SECS,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
