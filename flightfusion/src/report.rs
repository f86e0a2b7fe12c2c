//! Canonical aircraft report types.
//!
//! Every provider payload is normalized into [`AircraftReport`] before fusion.
//! This module defines the shared vocabulary used by the rest of the crate:
//!
//! - [`ProviderId`] - Which tracking provider produced a report
//! - [`IcaoAddress`] - The 24-bit transponder address, the join key across providers
//! - [`Position`] - Latitude/longitude pair (always present on a report)
//! - [`AircraftReport`] - One observation of one aircraft at one instant
//!
//! All numeric fields are stored in a single unit system regardless of the
//! provider's native units: feet, knots, feet/minute and degrees.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tracking provider that produced a report.
///
/// The ordering between variants encodes trust: when two providers observe
/// the same aircraft at essentially the same instant, `Primary` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Paid ADS-B aggregator (ADS-B Exchange via RapidAPI).
    Primary,
    /// Community network (OpenSky Network).
    Secondary,
}

impl ProviderId {
    /// The other provider, used when falling back.
    pub fn alternate(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }

    /// Name of the upstream service behind this provider.
    pub fn service_name(self) -> &'static str {
        match self {
            Self::Primary => "adsb-exchange",
            Self::Secondary => "opensky",
        }
    }

    /// Returns true if this provider is trusted over `other` for
    /// simultaneous observations.
    #[inline]
    pub fn is_preferred_over(self, other: Self) -> bool {
        self == Self::Primary && other == Self::Secondary
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "primary" | "adsb-exchange" => Ok(Self::Primary),
            "secondary" | "opensky" => Ok(Self::Secondary),
            other => Err(format!(
                "unknown provider '{}' (expected 'primary' or 'secondary')",
                other
            )),
        }
    }
}

/// ICAO 24-bit aircraft address.
///
/// Stored lowercase so reports from providers that disagree on case still
/// join. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IcaoAddress(String);

impl IcaoAddress {
    /// Parse an address from a provider value.
    ///
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_lowercase()))
    }

    /// The normalized (lowercase) address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IcaoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for IcaoAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "ICAO address must not be empty".to_string())
    }
}

impl From<IcaoAddress> for String {
    fn from(address: IcaoAddress) -> Self {
        address.0
    }
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One observation of one aircraft at one instant.
///
/// Reports only exist post-normalization: a report without a position is
/// never constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftReport {
    /// Join key across providers.
    pub icao_address: IcaoAddress,

    /// Trimmed flight callsign, if broadcast.
    pub callsign: Option<String>,

    /// Tail registration (primary provider only).
    pub registration: Option<String>,

    /// ICAO aircraft type designator (primary provider only).
    #[serde(rename = "aircraftTypeCode")]
    pub aircraft_type: Option<String>,

    /// Reported position.
    pub position: Position,

    /// Altitude in feet.
    #[serde(rename = "altitudeFeet")]
    pub altitude_ft: Option<f64>,

    /// Ground speed in knots.
    #[serde(rename = "groundSpeedKnots")]
    pub ground_speed_kt: Option<f64>,

    /// Ground track in degrees.
    #[serde(rename = "trackDegrees")]
    pub track_deg: Option<f64>,

    /// Vertical rate in feet per minute.
    #[serde(rename = "verticalRateFtPerMin")]
    pub vertical_rate_fpm: Option<f64>,

    pub squawk: Option<String>,

    #[serde(rename = "emergencyStatus")]
    pub emergency: Option<String>,

    /// ADS-B emitter category (e.g. "A3").
    pub category: Option<String>,

    pub on_ground: bool,

    /// Unix time of the observation (not of the fetch).
    #[serde(rename = "observedAtEpochSeconds")]
    pub observed_at: f64,

    /// Country of registration (secondary provider only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,

    #[serde(rename = "providerId")]
    pub provider: ProviderId,
}

impl AircraftReport {
    /// Create a report with only the required fields set.
    pub fn new(
        icao_address: IcaoAddress,
        position: Position,
        observed_at: f64,
        provider: ProviderId,
    ) -> Self {
        Self {
            icao_address,
            callsign: None,
            registration: None,
            aircraft_type: None,
            position,
            altitude_ft: None,
            ground_speed_kt: None,
            track_deg: None,
            vertical_rate_fpm: None,
            squawk: None,
            emergency: None,
            category: None,
            on_ground: false,
            observed_at,
            origin_country: None,
            provider,
        }
    }

    /// Label shown for this aircraft: the callsign, or the uppercase ICAO
    /// address when no callsign was broadcast.
    pub fn display_name(&self) -> String {
        match &self.callsign {
            Some(callsign) => callsign.clone(),
            None => self.icao_address.as_str().to_uppercase(),
        }
    }

    /// Absolute difference between the observation times of two reports.
    #[inline]
    pub fn time_delta(&self, other: &Self) -> f64 {
        (self.observed_at - other.observed_at).abs()
    }
}

/// Trim a provider string, mapping empty values to `None`.
pub(crate) fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report(icao: &str) -> AircraftReport {
        AircraftReport::new(
            IcaoAddress::parse(icao).unwrap(),
            Position::new(51.47, -0.46),
            1_700_000_000.0,
            ProviderId::Primary,
        )
    }

    #[test]
    fn test_icao_address_is_lowercased_and_trimmed() {
        let address = IcaoAddress::parse("  ABC123 ").unwrap();
        assert_eq!(address.as_str(), "abc123");
    }

    #[test]
    fn test_icao_address_rejects_empty() {
        assert!(IcaoAddress::parse("").is_none());
        assert!(IcaoAddress::parse("   ").is_none());
    }

    #[test]
    fn test_display_name_prefers_callsign() {
        let mut report = make_report("4ca1fa");
        assert_eq!(report.display_name(), "4CA1FA");

        report.callsign = Some("RYR123".to_string());
        assert_eq!(report.display_name(), "RYR123");
    }

    #[test]
    fn test_provider_preference() {
        assert!(ProviderId::Primary.is_preferred_over(ProviderId::Secondary));
        assert!(!ProviderId::Secondary.is_preferred_over(ProviderId::Primary));
        assert!(!ProviderId::Primary.is_preferred_over(ProviderId::Primary));
    }

    #[test]
    fn test_provider_parse_accepts_service_names() {
        assert_eq!("opensky".parse::<ProviderId>(), Ok(ProviderId::Secondary));
        assert_eq!("Primary".parse::<ProviderId>(), Ok(ProviderId::Primary));
        assert!("flightaware".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_serializes_canonical_field_names() {
        let report = make_report("abc123");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["icaoAddress"], "abc123");
        assert_eq!(json["providerId"], "primary");
        assert_eq!(json["observedAtEpochSeconds"], 1_700_000_000.0);
        assert!(json.get("originCountry").is_none());
    }

    #[test]
    fn test_deserialize_rejects_empty_icao() {
        let mut json = serde_json::to_value(make_report("abc123")).unwrap();
        json["icaoAddress"] = serde_json::Value::String(String::new());

        let result: Result<AircraftReport, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some(" BAW12  ")), Some("BAW12".to_string()));
        assert_eq!(clean_text(Some("   ")), None);
        assert_eq!(clean_text(None), None);
    }
}
