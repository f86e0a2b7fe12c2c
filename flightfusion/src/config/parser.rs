//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::report::ProviderId;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [primary] section
    if let Some(section) = ini.section(Some("primary")) {
        if let Some(v) = section.get("host") {
            let v = v.trim();
            if !v.is_empty() {
                config.primary.host = v.to_string();
            }
        }
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.primary.api_key = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("radius_nm") {
            config.primary.radius_nm = parse_positive::<f64>(v)
                .filter(|r| r.is_finite())
                .ok_or_else(|| {
                    invalid("primary", "radius_nm", v, "must be a positive number (nm)")
                })?;
        }
    }

    // [secondary] section
    if let Some(section) = ini.section(Some("secondary")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.is_empty() {
                if !v.starts_with("http://") && !v.starts_with("https://") {
                    return Err(invalid(
                        "secondary",
                        "base_url",
                        v,
                        "must start with http:// or https://",
                    ));
                }
                config.secondary.base_url = v.to_string();
            }
        }
    }

    // [fetch] section
    if let Some(section) = ini.section(Some("fetch")) {
        if let Some(v) = section.get("provider") {
            config.fetch.provider = ProviderId::from_str(v).map_err(|_| {
                invalid("fetch", "provider", v, "must be 'primary' or 'secondary'")
            })?;
        }
        if let Some(v) = section.get("timeout_secs") {
            config.fetch.timeout_secs = parse_positive::<u64>(v).ok_or_else(|| {
                invalid("fetch", "timeout_secs", v, "must be a positive integer (seconds)")
            })?;
        }
    }

    // [controls] section
    if let Some(section) = ini.section(Some("controls")) {
        if let Some(v) = section.get("master_enabled") {
            config.controls.master_enabled = parse_bool(v);
        }
        if let Some(v) = section.get("primary_enabled") {
            config.controls.primary_enabled = parse_bool(v);
        }
        if let Some(v) = section.get("secondary_enabled") {
            config.controls.secondary_enabled = parse_bool(v);
        }
        if let Some(v) = section.get("cache_ttl_secs") {
            config.controls.cache_ttl_secs = v.trim().parse().map_err(|_| {
                invalid("controls", "cache_ttl_secs", v, "must be an integer (seconds)")
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a strictly positive number.
fn parse_positive<T>(value: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    value
        .trim()
        .parse::<T>()
        .ok()
        .filter(|v| *v > T::default())
}

/// Parse a boolean value from a string.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true.
/// Everything else is false.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
