//! Secondary provider adapter (OpenSky Network state vectors).
//!
//! The secondary payload carries a `states` array of fixed-position tuples:
//!
//! ```text
//!  0 icao24          string
//!  1 callsign        string | null   (space padded)
//!  2 origin_country  string
//!  3 time_position   int | null      (unix seconds of last position)
//!  4 last_contact    int             (unix seconds of last message)
//!  5 longitude       float | null
//!  6 latitude        float | null
//!  7 baro_altitude   float | null    (meters)
//!  8 on_ground       bool
//!  9 velocity        float | null    (m/s)
//! 10 true_track      float | null    (degrees)
//! 11 vertical_rate   float | null    (m/s)
//! ```
//!
//! Trailing slots (sensors, geo altitude, squawk, spi, position source) are
//! ignored. Values are converted to feet, knots and feet/minute and rounded
//! to whole units.

use serde::Deserialize;
use serde_json::Value;

use crate::report::{clean_text, AircraftReport, IcaoAddress, Position, ProviderId};

/// Meters to feet.
pub const METERS_TO_FEET: f64 = 3.28084;

/// Meters per second to knots.
pub const MPS_TO_KNOTS: f64 = 1.94384;

/// Meters per second to feet per minute.
pub const MPS_TO_FPM: f64 = 196.85;

const SLOT_ICAO: usize = 0;
const SLOT_CALLSIGN: usize = 1;
const SLOT_ORIGIN_COUNTRY: usize = 2;
const SLOT_TIME_POSITION: usize = 3;
const SLOT_LAST_CONTACT: usize = 4;
const SLOT_LONGITUDE: usize = 5;
const SLOT_LATITUDE: usize = 6;
const SLOT_BARO_ALTITUDE: usize = 7;
const SLOT_ON_GROUND: usize = 8;
const SLOT_VELOCITY: usize = 9;
const SLOT_TRUE_TRACK: usize = 10;
const SLOT_VERTICAL_RATE: usize = 11;

/// Raw secondary provider response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecondaryPayload {
    /// Server time of the snapshot (unix seconds).
    #[serde(default)]
    pub time: Option<f64>,

    /// State vectors; `null` when the area has no traffic.
    #[serde(default)]
    pub states: Option<Vec<Value>>,
}

impl SecondaryPayload {
    /// Number of raw state vectors.
    pub fn raw_len(&self) -> usize {
        self.states.as_ref().map_or(0, Vec::len)
    }
}

/// Normalize a secondary provider payload.
///
/// Observation time comes from the vector's last contact slot, falling back
/// to its position time and then the snapshot time.
pub fn normalize(payload: &SecondaryPayload) -> Vec<AircraftReport> {
    let Some(states) = payload.states.as_ref() else {
        return Vec::new();
    };

    states
        .iter()
        .filter_map(Value::as_array)
        .filter_map(|state| to_report(state, payload.time))
        .collect()
}

fn to_report(state: &[Value], snapshot_time: Option<f64>) -> Option<AircraftReport> {
    let longitude = number_at(state, SLOT_LONGITUDE)?;
    let latitude = number_at(state, SLOT_LATITUDE)?;
    let icao_address = IcaoAddress::parse(state.get(SLOT_ICAO)?.as_str()?)?;

    let observed_at = number_at(state, SLOT_LAST_CONTACT)
        .or_else(|| number_at(state, SLOT_TIME_POSITION))
        .or(snapshot_time)?;

    let mut report = AircraftReport::new(
        icao_address,
        Position::new(latitude, longitude),
        observed_at,
        ProviderId::Secondary,
    );
    report.callsign = clean_text(text_at(state, SLOT_CALLSIGN));
    report.origin_country = clean_text(text_at(state, SLOT_ORIGIN_COUNTRY));
    report.altitude_ft =
        number_at(state, SLOT_BARO_ALTITUDE).map(|m| (m * METERS_TO_FEET).round());
    report.ground_speed_kt =
        number_at(state, SLOT_VELOCITY).map(|v| (v * MPS_TO_KNOTS).round());
    report.track_deg = number_at(state, SLOT_TRUE_TRACK).map(f64::round);
    report.vertical_rate_fpm =
        number_at(state, SLOT_VERTICAL_RATE).map(|v| (v * MPS_TO_FPM).round());
    report.on_ground = state
        .get(SLOT_ON_GROUND)
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Some(report)
}

fn number_at(state: &[Value], slot: usize) -> Option<f64> {
    state.get(slot).and_then(Value::as_f64)
}

fn text_at(state: &[Value], slot: usize) -> Option<&str> {
    state.get(slot).and_then(Value::as_str)
}
