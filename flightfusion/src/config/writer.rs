//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`, and the flat
//! key listing shown by `flightfusion config list`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.primary.api_key.as_deref().unwrap_or("");

    format!(
        r#"[primary]
; ADS-B Exchange via RapidAPI (preferred source)
host = {}
; RapidAPI key. If empty, the RAPIDAPI_KEY environment variable is used.
; Without a key every fetch falls back to the secondary provider.
api_key = {}
; Radius in nautical miles of each of the 8 global hub regions (default: 3000)
radius_nm = {}

[secondary]
; OpenSky Network REST API (fallback source, no key required)
base_url = {}

[fetch]
; Provider tried first: primary or secondary (default: primary)
; Only primary falls back to secondary when it fails entirely.
provider = {}
; Timeout in seconds for each region request (default: 10)
timeout_secs = {}

[controls]
; Provider switches. master_enabled = false disables all fetching.
master_enabled = {}
primary_enabled = {}
secondary_enabled = {}
; Seconds to trust loaded switches before reading them again (default: 60)
cache_ttl_secs = {}

[logging]
; Log file location (cleared at the start of each session)
file = {}
"#,
        config.primary.host,
        api_key,
        config.primary.radius_nm,
        config.secondary.base_url,
        config.fetch.provider,
        config.fetch.timeout_secs,
        config.controls.master_enabled,
        config.controls.primary_enabled,
        config.controls.secondary_enabled,
        config.controls.cache_ttl_secs,
        path_to_string(&config.logging.file),
    )
}

impl ConfigFile {
    /// All settings as `(section.key, value)` pairs in file order.
    ///
    /// The API key is masked.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let api_key = match self.primary.api_key.as_deref() {
            Some(key) => mask_secret(key),
            None => String::new(),
        };

        vec![
            ("primary.host", self.primary.host.clone()),
            ("primary.api_key", api_key),
            ("primary.radius_nm", self.primary.radius_nm.to_string()),
            ("secondary.base_url", self.secondary.base_url.clone()),
            ("fetch.provider", self.fetch.provider.to_string()),
            ("fetch.timeout_secs", self.fetch.timeout_secs.to_string()),
            (
                "controls.master_enabled",
                self.controls.master_enabled.to_string(),
            ),
            (
                "controls.primary_enabled",
                self.controls.primary_enabled.to_string(),
            ),
            (
                "controls.secondary_enabled",
                self.controls.secondary_enabled.to_string(),
            ),
            (
                "controls.cache_ttl_secs",
                self.controls.cache_ttl_secs.to_string(),
            ),
            ("logging.file", path_to_string(&self.logging.file)),
        ]
    }
}

/// Keep the last four characters of a secret.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
