//! Query areas and the fixed global region lists.
//!
//! The primary provider is queried by center point and radius, the secondary
//! by bounding box. [`Area`] holds either shape and converts between them so a
//! user query can be sent to whichever provider ends up serving it.

use std::fmt;
use std::str::FromStr;

/// Default radius of the primary provider's global regions, nautical miles.
pub const DEFAULT_RADIUS_NM: f64 = 3000.0;

/// Mean Earth radius in nautical miles.
const EARTH_RADIUS_NM: f64 = 3440.065;

/// Nautical miles per degree of latitude.
const NM_PER_DEGREE: f64 = 60.0;

/// Circle around a center point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusArea {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_nm: f64,
}

impl RadiusArea {
    pub fn new(latitude: f64, longitude: f64, radius_nm: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_nm,
        }
    }

    /// Smallest latitude/longitude box containing the circle.
    pub fn to_bounding_box(&self) -> BoundingBox {
        let dlat = self.radius_nm / NM_PER_DEGREE;
        let cos_lat = self.latitude.to_radians().cos().abs();
        let dlon = if cos_lat < 1e-6 {
            180.0
        } else {
            (self.radius_nm / (NM_PER_DEGREE * cos_lat)).min(180.0)
        };

        BoundingBox {
            lamin: (self.latitude - dlat).max(-90.0),
            lomin: (self.longitude - dlon).max(-180.0),
            lamax: (self.latitude + dlat).min(90.0),
            lomax: (self.longitude + dlon).min(180.0),
        }
    }
}

/// Latitude/longitude rectangle, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lamin: f64,
    pub lomin: f64,
    pub lamax: f64,
    pub lomax: f64,
}

impl BoundingBox {
    pub fn new(lamin: f64, lomin: f64, lamax: f64, lomax: f64) -> Self {
        Self {
            lamin,
            lomin,
            lamax,
            lomax,
        }
    }

    /// Check ordering and coordinate ranges.
    pub fn validate(&self) -> Result<(), String> {
        for lat in [self.lamin, self.lamax] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(format!("latitude {} out of range [-90, 90]", lat));
            }
        }
        for lon in [self.lomin, self.lomax] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(format!("longitude {} out of range [-180, 180]", lon));
            }
        }
        if self.lamin > self.lamax {
            return Err(format!("lamin {} exceeds lamax {}", self.lamin, self.lamax));
        }
        if self.lomin > self.lomax {
            return Err(format!("lomin {} exceeds lomax {}", self.lomin, self.lomax));
        }
        Ok(())
    }

    /// Circle centered on the box that reaches its corners.
    pub fn to_radius(&self) -> RadiusArea {
        let latitude = (self.lamin + self.lamax) / 2.0;
        let longitude = (self.lomin + self.lomax) / 2.0;
        let radius_nm = great_circle_nm(latitude, longitude, self.lamax, self.lomax)
            .max(great_circle_nm(latitude, longitude, self.lamin, self.lomin));

        RadiusArea::new(latitude, longitude, radius_nm.ceil())
    }
}

impl FromStr for BoundingBox {
    type Err = String;

    /// Parse `lamin,lomin,lamax,lomax`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("invalid coordinate '{}'", part.trim()))
            })
            .collect::<Result<_, _>>()?;

        let &[lamin, lomin, lamax, lomax] = values.as_slice() else {
            return Err(format!(
                "expected 4 values (lamin,lomin,lamax,lomax), got {}",
                values.len()
            ));
        };

        let bbox = Self::new(lamin, lomin, lamax, lomax);
        bbox.validate()?;
        Ok(bbox)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.lamin, self.lomin, self.lamax, self.lomax)
    }
}

/// A query area in either shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Area {
    Radius(RadiusArea),
    BoundingBox(BoundingBox),
}

impl Area {
    /// This area as a circle.
    pub fn to_radius(&self) -> RadiusArea {
        match self {
            Area::Radius(r) => *r,
            Area::BoundingBox(b) => b.to_radius(),
        }
    }

    /// This area as a rectangle.
    pub fn to_bounding_box(&self) -> BoundingBox {
        match self {
            Area::Radius(r) => r.to_bounding_box(),
            Area::BoundingBox(b) => *b,
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Area::Radius(r) => write!(f, "{},{} r={}nm", r.latitude, r.longitude, r.radius_nm),
            Area::BoundingBox(b) => write!(f, "[{}]", b),
        }
    }
}

/// A named area used in global fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub area: Area,
}

impl Region {
    pub fn new(name: impl Into<String>, area: Area) -> Self {
        Self {
            name: name.into(),
            area,
        }
    }
}

/// Hub cities covering the primary provider's global view.
const PRIMARY_HUBS: &[(&str, f64, f64)] = &[
    ("New York", 40.0, -74.0),
    ("San Francisco", 37.0, -122.0),
    ("Sao Paulo", -23.0, -46.0),
    ("London", 51.0, 0.0),
    ("Dubai", 25.0, 55.0),
    ("Tokyo", 35.0, 140.0),
    ("Singapore", 1.0, 104.0),
    ("Sydney", -33.0, 151.0),
];

/// Continental boxes covering the secondary provider's global view.
const SECONDARY_BOXES: &[(&str, [f64; 4])] = &[
    ("North America", [25.0, -130.0, 50.0, -60.0]),
    ("Europe", [35.0, -10.0, 60.0, 40.0]),
    ("East Asia", [10.0, 100.0, 45.0, 150.0]),
    ("Middle East & South Asia", [10.0, 40.0, 40.0, 100.0]),
    ("Oceania", [-45.0, 110.0, -10.0, 180.0]),
    ("South America", [-55.0, -80.0, 10.0, -35.0]),
];

/// Primary global regions, one circle of `radius_nm` per hub.
pub fn primary_regions(radius_nm: f64) -> Vec<Region> {
    PRIMARY_HUBS
        .iter()
        .map(|&(name, lat, lon)| {
            Region::new(name, Area::Radius(RadiusArea::new(lat, lon, radius_nm)))
        })
        .collect()
}

/// Secondary global regions.
pub fn secondary_regions() -> Vec<Region> {
    SECONDARY_BOXES
        .iter()
        .map(|&(name, [lamin, lomin, lamax, lomax])| {
            Region::new(
                name,
                Area::BoundingBox(BoundingBox::new(lamin, lomin, lamax, lomax)),
            )
        })
        .collect()
}

/// Haversine distance in nautical miles.
fn great_circle_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * a.sqrt().asin()
}
