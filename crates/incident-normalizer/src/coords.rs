//! Coordinate resolution.
//!
//! An ordered chain of resolver strategies, tried in sequence until one
//! yields a usable pair: direct numeric fields, free-text location against
//! the city table and facility names, then the country table. Records that
//! survive no stage stay on the (0, 0) sentinel downstream.

use geo_reference::tables::{city_coordinates, country_coordinates, CITY_COORDS};
use geo_reference::{facility_sites, FacilitySite};
use serde::{Deserialize, Serialize};

use crate::RawIncident;

/// A resolved coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A pair is usable when both components are finite and the pair is not the
/// null-island sentinel (both within 1e-4 of zero).
pub fn is_valid_pair(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && !(lat.abs() < 1e-4 && lng.abs() < 1e-4)
}

type Strategy = fn(&RawIncident, &[FacilitySite]) -> Option<Coordinates>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("direct", direct_fields),
    ("location", location_text),
    ("country", country_field),
];

/// Resolve best-effort coordinates for a raw record, or `None`.
pub fn resolve_coordinates(raw: &RawIncident) -> Option<Coordinates> {
    let sites = facility_sites();
    resolve_with_sites(raw, &sites)
}

/// Same chain against a caller-supplied facility list (lets batch callers
/// load the table once).
pub fn resolve_with_sites(raw: &RawIncident, sites: &[FacilitySite]) -> Option<Coordinates> {
    STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let hit = strategy(raw, sites);
            if hit.is_some() {
                tracing::trace!(strategy = *name, "coordinates resolved");
            }
            hit
        })
}

/// Stage 1: numeric `lat` + `lng`/`lon` fields on the record itself.
fn direct_fields(raw: &RawIncident, _sites: &[FacilitySite]) -> Option<Coordinates> {
    let lat = raw.number(&["lat"])?;
    let lng = raw.number(&["lng", "lon"])?;
    is_valid_pair(lat, lng).then_some(Coordinates { lat, lng })
}

/// Lowercase, keep the segment before the first comma, trim.
fn head_segment(text: &str) -> String {
    text.to_lowercase()
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Stage 2: free-text `location`/`city` against the city table, then
/// substring both ways over city keys, then facility names.
fn location_text(raw: &RawIncident, sites: &[FacilitySite]) -> Option<Coordinates> {
    let query = head_segment(raw.text(&["location", "city"])?);
    if query.is_empty() {
        return None;
    }

    if let Some((lat, lng)) = city_coordinates(&query) {
        return Some(Coordinates { lat, lng });
    }

    for (name, lat, lng) in CITY_COORDS {
        if name.contains(&query) || query.contains(name) {
            return Some(Coordinates {
                lat: *lat,
                lng: *lng,
            });
        }
    }

    for site in sites {
        let site_name = site.name.to_lowercase();
        if site_name.contains(&query) || query.contains(&site_name) {
            return Some(Coordinates {
                lat: site.lat,
                lng: site.lng,
            });
        }
    }

    None
}

/// Stage 3: `country` against the country table, then facility country codes.
fn country_field(raw: &RawIncident, sites: &[FacilitySite]) -> Option<Coordinates> {
    let query = head_segment(raw.text(&["country"])?);
    if query.is_empty() {
        return None;
    }

    if let Some((lat, lng)) = country_coordinates(&query) {
        return Some(Coordinates { lat, lng });
    }

    let code_guess: String = query.chars().take(2).collect();
    for site in sites {
        let site_country = site.country.to_lowercase();
        if site_country == query || site_country == code_guess {
            return Some(Coordinates {
                lat: site.lat,
                lng: site.lng,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: serde_json::Value) -> RawIncident {
        RawIncident::from_value(v)
    }

    #[test]
    fn test_direct_fields_win() {
        let got = resolve_coordinates(&raw(json!({
            "lat": 48.85, "lng": 2.35, "location": "Tokyo"
        })))
        .unwrap();
        assert_eq!(got.lat, 48.85);
        assert_eq!(got.lng, 2.35);
    }

    #[test]
    fn test_direct_passthrough_unchanged() {
        let got = resolve_coordinates(&raw(json!({"lat": -33.8688, "lon": 151.2093}))).unwrap();
        assert_eq!(got.lat, -33.8688);
        assert_eq!(got.lng, 151.2093);
    }

    #[test]
    fn test_null_island_sentinel_rejected() {
        // (0, 0) on the wire means "no coordinates", so the chain falls
        // through to the location text.
        let got = resolve_coordinates(&raw(json!({
            "lat": 0.0, "lng": 0.0, "location": "Singapore"
        })))
        .unwrap();
        assert!((got.lat - 1.3521).abs() < 1e-6);
    }

    #[test]
    fn test_location_exact_city() {
        let got = resolve_coordinates(&raw(json!({"location": "Austin, TX"}))).unwrap();
        assert!((got.lat - 30.2672).abs() < 1e-6);
    }

    #[test]
    fn test_location_substring_city() {
        let got = resolve_coordinates(&raw(json!({"city": "Greater London Area"}))).unwrap();
        assert!((got.lat - 51.5074).abs() < 1e-6);
    }

    #[test]
    fn test_location_matches_facility_name() {
        let got = resolve_coordinates(&raw(json!({"location": "Dell Round Rock HQ"}))).unwrap();
        assert!((got.lat - 30.5083).abs() < 1e-6);
        assert!((got.lng + 97.6788).abs() < 1e-6);
    }

    #[test]
    fn test_country_fallback() {
        let got = resolve_coordinates(&raw(json!({"country": "Brazil"}))).unwrap();
        assert!(got.lat < 0.0);
    }

    #[test]
    fn test_country_code_matches_facility() {
        // "SK" is no country name in the table; facility country codes catch it.
        let got = resolve_coordinates(&raw(json!({"country": "sk"}))).unwrap();
        assert!((got.lat - 48.1486).abs() < 1e-6);
    }

    #[test]
    fn test_unresolvable_is_none() {
        assert!(resolve_coordinates(&raw(json!({"location": "nowhere special zzz"}))).is_none());
        assert!(resolve_coordinates(&raw(json!({}))).is_none());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(resolve_coordinates(&raw(json!({"lat": "inf", "lng": "10"}))).is_none());
    }
}
