//! Geographic Reference Library
//!
//! Static lookup data shared by the normalization and proximity pipeline:
//! facility sites, city and country coordinate tables, country-to-region
//! mapping, and great-circle distance math.
//!
//! All tables are compiled in and never mutated at runtime.

use serde::{Deserialize, Serialize};

pub mod tables;

pub use tables::{CITY_COORDS, COUNTRY_COORDS, COUNTRY_REGIONS};

/// Canonical region buckets used for all filtering and display.
///
/// `Global` is both the default for unclassifiable input and the
/// "no filter" wildcard accepted by filtering operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CanonicalRegion {
    #[default]
    #[serde(rename = "GLOBAL")]
    Global,
    #[serde(rename = "AMER")]
    Amer,
    #[serde(rename = "EMEA")]
    Emea,
    #[serde(rename = "APJC")]
    Apjc,
    #[serde(rename = "LATAM")]
    Latam,
}

impl CanonicalRegion {
    /// Display/wire label for this region.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "GLOBAL",
            Self::Amer => "AMER",
            Self::Emea => "EMEA",
            Self::Apjc => "APJC",
            Self::Latam => "LATAM",
        }
    }

    /// `Global` doubles as the "match everything" filter value.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Global)
    }
}

impl std::fmt::Display for CanonicalRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed physical facility used as a proximity reference point.
///
/// Loaded once from the compiled-in table, unique by case-insensitive name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilitySite {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub region: CanonicalRegion,
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
}

impl FacilitySite {
    pub fn new(
        name: &str,
        lat: f64,
        lng: f64,
        region: CanonicalRegion,
        country: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lng,
            region,
            country: country.to_string(),
        }
    }
}

/// Severity bucket attached to proximity alerts for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket an incident severity (1 = informational, 4+ = critical).
    pub fn from_severity(severity: u8) -> Self {
        match severity {
            0 | 1 => Self::Low,
            2 => Self::Medium,
            3 => Self::High,
            _ => Self::Critical,
        }
    }
}

/// The monitored facility network.
///
/// Corporate campuses, manufacturing sites, and regional hubs that proximity
/// alerting screens incidents against.
pub fn facility_sites() -> Vec<FacilitySite> {
    use CanonicalRegion::{Amer, Apjc, Emea, Latam};

    vec![
        FacilitySite::new("Dell Round Rock HQ", 30.5083, -97.6788, Amer, "US"),
        FacilitySite::new("Austin Parmer Campus", 30.4021, -97.7265, Amer, "US"),
        FacilitySite::new("Hopkinton Campus", 42.2287, -71.5226, Amer, "US"),
        FacilitySite::new("Franklin Facility", 42.0834, -71.3967, Amer, "US"),
        FacilitySite::new("Nashville Operations", 36.1627, -86.7816, Amer, "US"),
        FacilitySite::new("Toronto Office", 43.6532, -79.3832, Amer, "CA"),
        FacilitySite::new("Limerick Campus", 52.6638, -8.6267, Emea, "IE"),
        FacilitySite::new("Cherrywood Office", 53.2447, -6.1448, Emea, "IE"),
        FacilitySite::new("Bracknell Office", 51.4154, -0.7536, Emea, "GB"),
        FacilitySite::new("Bratislava Hub", 48.1486, 17.1077, Emea, "SK"),
        FacilitySite::new("Cairo Office", 30.0444, 31.2357, Emea, "EG"),
        FacilitySite::new("Bangalore Campus", 12.9716, 77.5946, Apjc, "IN"),
        FacilitySite::new("Hyderabad Campus", 17.385, 78.4867, Apjc, "IN"),
        FacilitySite::new("Penang Plant", 5.4164, 100.3327, Apjc, "MY"),
        FacilitySite::new("Xiamen Plant", 24.4798, 118.0894, Apjc, "CN"),
        FacilitySite::new("Chengdu Plant", 30.5728, 104.0668, Apjc, "CN"),
        FacilitySite::new("Singapore Office", 1.3521, 103.8198, Apjc, "SG"),
        FacilitySite::new("Kawasaki Office", 35.5308, 139.7029, Apjc, "JP"),
        FacilitySite::new("Sydney Office", -33.8688, 151.2093, Apjc, "AU"),
        FacilitySite::new("Hortolandia Plant", -22.8583, -47.22, Latam, "BR"),
        FacilitySite::new("Panama City Hub", 8.9824, -79.5199, Latam, "PA"),
        FacilitySite::new("El Salvador Center", 13.6929, -89.2182, Latam, "SV"),
    ]
}

/// Find a facility by name, case-insensitively.
pub fn find_site<'a>(sites: &'a [FacilitySite], name: &str) -> Option<&'a FacilitySite> {
    sites
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
}

/// Haversine great-circle distance between two points in km.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const R: f64 = 6371.0; // Mean Earth radius in km

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    R * c
}
