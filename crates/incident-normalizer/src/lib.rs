//! Incident Normalization Library
//!
//! Turns raw, inconsistently-shaped incident records (varying field names,
//! missing or zero coordinates, free-text locations, country codes or names,
//! uneven region labels) into canonical [`Incident`] values with resolved
//! coordinates and a canonical region.
//!
//! The pipeline is total over arbitrary untyped input: a record missing a
//! title is dropped, every other defect degrades to a default. Nothing here
//! returns an error for bad data.

use chrono::{DateTime, Utc};
use geo_reference::CanonicalRegion;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod coords;
pub mod normalize;
pub mod region;

pub use coords::{resolve_coordinates, Coordinates};
pub use normalize::{filter_recent, normalize, normalize_all, MAX_AGE_HOURS};
pub use region::{normalize_region, region_for_country};

/// A raw incident as received from a feed: an untyped JSON object with
/// optional, aliased fields. No invariants; adversarial input is tolerated.
#[derive(Debug, Clone)]
pub struct RawIncident(Value);

impl RawIncident {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// First non-empty string under any of `keys`.
    pub fn text(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| {
            self.0
                .get(*key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
    }

    /// First numeric value under any of `keys`; numeric strings count.
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|key| {
            let v = self.0.get(*key)?;
            match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
        })
    }

    /// Truthy flag under any of `keys`: `true`, `"true"`, or nonzero number.
    pub fn flag(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| match self.0.get(*key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            _ => false,
        })
    }

    /// The `id` field stringified verbatim, whatever its JSON type.
    pub fn raw_id(&self) -> Option<String> {
        match self.0.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The time field's raw text, used for composite id derivation.
    pub fn raw_time_text(&self) -> String {
        for key in ["time", "ts", "timestamp"] {
            match self.0.get(key) {
                Some(Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(Value::Number(n)) => return n.to_string(),
                _ => continue,
            }
        }
        String::new()
    }
}

impl From<Value> for RawIncident {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// A canonical incident. Immutable once constructed; every field except
/// `title` degrades to a default rather than failing normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// Stable identity: the upstream id verbatim, or `<title-or-link>|<raw time>`.
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Sanitized absolute http(s) URL, or `#` when absent or unsafe.
    pub link: String,
    pub time: DateTime<Utc>,
    /// Severity floor is 1; non-numeric input collapses to 1.
    pub severity: u8,
    pub region: CanonicalRegion,
    /// Uppercased; may be empty.
    pub country: String,
    /// Uppercased; may be empty.
    pub category: String,
    /// Free text as received; may be empty.
    pub location: String,
    /// (0, 0) is the "unresolved" sentinel, detectable via [`Incident::has_coordinates`].
    pub lat: f64,
    pub lng: f64,
    pub source: String,
    /// Trusted when supplied upstream together with `nearest_site_name`.
    pub distance_km: Option<f64>,
    pub nearest_site_name: Option<String>,
    /// Country-wide incidents bypass radius filtering.
    pub country_wide: bool,
}

impl Incident {
    /// Whether coordinates were resolved (the sentinel is near-zero on both axes).
    pub fn has_coordinates(&self) -> bool {
        coords::is_valid_pair(self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_field_aliases() {
        let raw = RawIncident::from_value(json!({"url": "https://example.com/a"}));
        assert_eq!(raw.text(&["link", "url"]), Some("https://example.com/a"));
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        let raw = RawIncident::from_value(json!({"lat": "30.5", "lng": 12}));
        assert_eq!(raw.number(&["lat"]), Some(30.5));
        assert_eq!(raw.number(&["lng", "lon"]), Some(12.0));
    }

    #[test]
    fn test_number_rejects_garbage() {
        let raw = RawIncident::from_value(json!({"lat": "north", "lng": null}));
        assert_eq!(raw.number(&["lat"]), None);
        assert_eq!(raw.number(&["lng", "lon"]), None);
    }

    #[test]
    fn test_flag_variants() {
        assert!(RawIncident::from_value(json!({"country_wide": true})).flag(&["country_wide"]));
        assert!(RawIncident::from_value(json!({"country_wide": "true"})).flag(&["country_wide"]));
        assert!(RawIncident::from_value(json!({"country_wide": 1})).flag(&["country_wide"]));
        assert!(!RawIncident::from_value(json!({"country_wide": "yes"})).flag(&["country_wide"]));
        assert!(!RawIncident::from_value(json!({})).flag(&["country_wide"]));
    }

    #[test]
    fn test_raw_id_stringifies_numbers() {
        let raw = RawIncident::from_value(json!({"id": 4217}));
        assert_eq!(raw.raw_id(), Some("4217".to_string()));
    }
}
