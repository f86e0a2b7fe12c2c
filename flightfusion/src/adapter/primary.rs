//! Primary provider adapter (ADS-B Exchange v2 format).
//!
//! The primary payload is an object with an `ac` array of aircraft objects
//! keyed by short field names:
//!
//! | field | meaning |
//! |---|---|
//! | `hex` | ICAO address |
//! | `flight` | callsign, space padded |
//! | `r` / `t` | registration / type designator |
//! | `lat` / `lon` | position |
//! | `alt_baro` | barometric altitude in feet, or the string `"ground"` |
//! | `alt_geom` | geometric altitude in feet |
//! | `gs` / `track` | ground speed (kt) / track (deg), sub-unit precision |
//! | `baro_rate` | vertical rate (ft/min) |
//! | `squawk`, `emergency`, `category` | transponder data |
//! | `seen` | seconds since the last message, relative to fetch time |
//!
//! Units are already canonical; only rounding and time derivation apply.

use serde::Deserialize;

use crate::report::{clean_text, AircraftReport, IcaoAddress, Position, ProviderId};

/// Barometric altitude below which an aircraft is considered on the ground.
pub const GROUND_ALTITUDE_FT: f64 = 100.0;

/// Emergency value the provider sends when there is no emergency.
const NO_EMERGENCY: &str = "none";

/// Raw primary provider response body.
///
/// Entries are kept as untyped JSON so that one malformed aircraft object
/// cannot fail deserialization of the whole response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrimaryPayload {
    #[serde(default)]
    pub ac: Option<Vec<serde_json::Value>>,
}

impl PrimaryPayload {
    /// Number of raw aircraft entries.
    pub fn raw_len(&self) -> usize {
        self.ac.as_ref().map_or(0, Vec::len)
    }
}

/// Barometric altitude as sent by the provider.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BaroAltitude {
    Feet(f64),
    Label(String),
}

/// Typed view of one aircraft entry.
#[derive(Debug, Deserialize)]
struct PrimaryAircraft {
    hex: String,
    flight: Option<String>,
    r: Option<String>,
    t: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    alt_baro: Option<BaroAltitude>,
    alt_geom: Option<f64>,
    gs: Option<f64>,
    track: Option<f64>,
    baro_rate: Option<f64>,
    squawk: Option<String>,
    emergency: Option<String>,
    category: Option<String>,
    seen: Option<f64>,
}

/// Normalize a primary provider payload.
pub fn normalize(payload: &PrimaryPayload, fetch_time: f64) -> Vec<AircraftReport> {
    let Some(entries) = payload.ac.as_ref() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| PrimaryAircraft::deserialize(entry).ok())
        .filter_map(|aircraft| to_report(aircraft, fetch_time))
        .collect()
}

fn to_report(aircraft: PrimaryAircraft, fetch_time: f64) -> Option<AircraftReport> {
    let (Some(latitude), Some(longitude)) = (aircraft.lat, aircraft.lon) else {
        return None;
    };
    let icao_address = IcaoAddress::parse(&aircraft.hex)?;

    let (baro_ft, on_ground) = match aircraft.alt_baro {
        Some(BaroAltitude::Feet(feet)) => (Some(feet), feet < GROUND_ALTITUDE_FT),
        Some(BaroAltitude::Label(label)) if label.eq_ignore_ascii_case("ground") => {
            (Some(0.0), true)
        }
        Some(BaroAltitude::Label(_)) | None => (None, false),
    };

    let observed_at = fetch_time - aircraft.seen.unwrap_or(0.0);

    let mut report = AircraftReport::new(
        icao_address,
        Position::new(latitude, longitude),
        observed_at,
        ProviderId::Primary,
    );
    report.callsign = clean_text(aircraft.flight.as_deref());
    report.registration = clean_text(aircraft.r.as_deref());
    report.aircraft_type = clean_text(aircraft.t.as_deref());
    report.altitude_ft = baro_ft.or(aircraft.alt_geom);
    report.ground_speed_kt = aircraft.gs.map(f64::round);
    report.track_deg = aircraft.track.map(f64::round);
    report.vertical_rate_fpm = aircraft.baro_rate;
    report.squawk = clean_text(aircraft.squawk.as_deref());
    report.emergency = clean_text(aircraft.emergency.as_deref()).filter(|e| e != NO_EMERGENCY);
    report.category = clean_text(aircraft.category.as_deref());
    report.on_ground = on_ground;

    Some(report)
}
