//! Raw record to canonical [`Incident`] conversion and recency filtering.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use geo_reference::tables::country_coordinates;
use geo_reference::{facility_sites, CanonicalRegion, FacilitySite};
use serde_json::Value;
use tracing::debug;

use crate::coords::{is_valid_pair, resolve_with_sites};
use crate::region::{normalize_region, region_for_country};
use crate::{Incident, RawIncident};

/// Incidents older than this are dropped from the live feed.
pub const MAX_AGE_HOURS: i64 = 48;

/// Normalize one raw record. Returns `None` only when the title is empty
/// after trimming; every other defect degrades to a default.
pub fn normalize(raw: &RawIncident) -> Option<Incident> {
    let sites = facility_sites();
    normalize_with_sites(raw, &sites, Utc::now())
}

/// Deterministic variant: the caller supplies the facility table and "now"
/// (used as the default for missing or unparseable timestamps).
pub fn normalize_with_sites(
    raw: &RawIncident,
    sites: &[FacilitySite],
    now: DateTime<Utc>,
) -> Option<Incident> {
    let title = raw.text(&["title"])?.to_string();

    let link = sanitize_link(raw.text(&["link", "url"]));
    let time = parse_time(raw).unwrap_or(now);

    // Identity: upstream id verbatim, else a composite that is stable for
    // the same logical incident across repeated fetches. Untitled records
    // are already gone, so the title anchors the composite.
    let id = raw
        .raw_id()
        .unwrap_or_else(|| format!("{}|{}", title, raw.raw_time_text()));

    let country_raw = raw.text(&["country"]).unwrap_or_default().to_string();

    let (mut lat, mut lng) = match resolve_with_sites(raw, sites) {
        Some(c) => (c.lat, c.lng),
        None => (0.0, 0.0),
    };
    // One extra fallback before settling on the sentinel: the country table.
    if !is_valid_pair(lat, lng) && !country_raw.is_empty() {
        if let Some((clat, clng)) = country_coordinates(&country_raw.to_lowercase()) {
            lat = clat;
            lng = clng;
        }
    }

    let region_label = raw.text(&["raw_region", "region"]);
    let mut region = normalize_region(region_label);
    if region == CanonicalRegion::Global && !country_raw.is_empty() {
        if let Some(by_country) = region_for_country(&country_raw) {
            region = by_country;
        }
    }
    // Geographic override for still-unclassified records: coordinates in
    // the APJC box force the APJC bucket.
    if region == CanonicalRegion::Global
        && is_valid_pair(lat, lng)
        && (-60.0..=90.0).contains(&lat)
        && (60.0..=160.0).contains(&lng)
    {
        region = CanonicalRegion::Apjc;
    }

    let severity = raw
        .number(&["severity", "level"])
        .map(|n| if n.is_finite() && n >= 1.0 { n as u8 } else { 1 })
        .unwrap_or(1)
        .max(1);

    Some(Incident {
        id,
        title,
        summary: raw
            .text(&["summary", "description"])
            .unwrap_or_default()
            .to_string(),
        link,
        time,
        severity,
        region,
        country: country_raw.to_uppercase(),
        category: raw
            .text(&["category", "type"])
            .unwrap_or_default()
            .to_uppercase(),
        location: raw
            .text(&["location", "city"])
            .unwrap_or_default()
            .to_string(),
        lat,
        lng,
        source: raw
            .text(&["source", "source_name"])
            .unwrap_or_default()
            .to_string(),
        distance_km: raw.number(&["distance_km"]),
        nearest_site_name: raw
            .text(&["nearest_site_name"])
            .map(|s| s.to_string()),
        country_wide: raw.flag(&["country_wide"]),
    })
}

/// Normalize a whole payload, dropping records without titles.
pub fn normalize_all(values: Vec<Value>) -> Vec<Incident> {
    let sites = facility_sites();
    let now = Utc::now();
    let total = values.len();

    let incidents: Vec<Incident> = values
        .into_iter()
        .map(RawIncident::from_value)
        .filter_map(|raw| normalize_with_sites(&raw, &sites, now))
        .collect();

    if incidents.len() < total {
        debug!(
            kept = incidents.len(),
            dropped = total - incidents.len(),
            "normalized feed payload"
        );
    }
    incidents
}

/// Keep incidents no older than [`MAX_AGE_HOURS`], newest first.
pub fn filter_recent(mut incidents: Vec<Incident>, now: DateTime<Utc>) -> Vec<Incident> {
    let cutoff = now - Duration::hours(MAX_AGE_HOURS);
    incidents.retain(|i| i.time >= cutoff);
    incidents.sort_by(|a, b| b.time.cmp(&a.time));
    incidents
}

/// Sanitize a link: absolute http(s) URLs pass through, everything else
/// collapses to the `#` placeholder.
fn sanitize_link(link: Option<&str>) -> String {
    match link {
        Some(l) if l.starts_with("https://") || l.starts_with("http://") => l.to_string(),
        _ => "#".to_string(),
    }
}

/// Parse the record's time field: RFC 3339, epoch seconds or millis, or a
/// couple of common naive formats.
fn parse_time(raw: &RawIncident) -> Option<DateTime<Utc>> {
    for key in ["time", "ts", "timestamp"] {
        match raw.as_value().get(key) {
            Some(Value::Number(n)) => {
                if let Some(epoch) = n.as_f64() {
                    return epoch_to_datetime(epoch);
                }
            }
            Some(Value::String(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    continue;
                }
                if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                    return Some(dt.with_timezone(&Utc));
                }
                if let Ok(epoch) = s.parse::<f64>() {
                    return epoch_to_datetime(epoch);
                }
                for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
                    if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                        return Some(Utc.from_utc_datetime(&naive));
                    }
                }
                if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
                }
            }
            _ => continue,
        }
    }
    None
}

/// Epoch values above 1e12 are millis, otherwise seconds.
fn epoch_to_datetime(epoch: f64) -> Option<DateTime<Utc>> {
    if !epoch.is_finite() || epoch <= 0.0 {
        return None;
    }
    let millis = if epoch > 1e12 { epoch } else { epoch * 1000.0 };
    Utc.timestamp_millis_opt(millis as i64).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawIncident {
        RawIncident::from_value(v)
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn normalize_at(v: Value) -> Option<Incident> {
        let sites = facility_sites();
        normalize_with_sites(&raw(v), &sites, fixed_now())
    }

    #[test]
    fn test_empty_title_dropped() {
        assert!(normalize_at(json!({"title": ""})).is_none());
        assert!(normalize_at(json!({"title": "   "})).is_none());
        assert!(normalize_at(json!({"summary": "no title"})).is_none());
    }

    #[test]
    fn test_minimal_record_defaults() {
        let inc = normalize_at(json!({"title": "Power outage"})).unwrap();
        assert_eq!(inc.title, "Power outage");
        assert_eq!(inc.severity, 1);
        assert_eq!(inc.region, CanonicalRegion::Global);
        assert_eq!(inc.link, "#");
        assert_eq!(inc.lat, 0.0);
        assert_eq!(inc.lng, 0.0);
        assert!(!inc.has_coordinates());
        assert_eq!(inc.time, fixed_now());
        assert!(!inc.country_wide);
    }

    #[test]
    fn test_upstream_id_verbatim() {
        let inc = normalize_at(json!({"id": 99, "title": "t"})).unwrap();
        assert_eq!(inc.id, "99");
    }

    #[test]
    fn test_composite_id_stable() {
        let payload = json!({"title": "Flood warning", "ts": 1717243200});
        let a = normalize_at(payload.clone()).unwrap();
        let b = normalize_at(payload).unwrap();
        assert_eq!(a.id, "Flood warning|1717243200");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_idempotent() {
        let payload = json!({
            "title": "Protest near campus",
            "location": "Austin, TX",
            "severity": "3",
            "country": "us",
            "ts": 1717243200
        });
        let a = normalize_at(payload.clone()).unwrap();
        let b = normalize_at(payload).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.lat, b.lat);
        assert_eq!(a.region, b.region);
        assert_eq!(a.severity, b.severity);
    }

    #[test]
    fn test_valid_coordinates_passthrough() {
        let inc = normalize_at(json!({
            "title": "t", "lat": 52.52, "lng": 13.405
        }))
        .unwrap();
        assert_eq!(inc.lat, 52.52);
        assert_eq!(inc.lng, 13.405);
        assert!(inc.has_coordinates());
    }

    #[test]
    fn test_country_resolves_coordinates_and_region() {
        let inc = normalize_at(json!({
            "title": "t", "country": "Japan"
        }))
        .unwrap();
        assert!(inc.has_coordinates());
        assert_eq!(inc.region, CanonicalRegion::Apjc);
    }

    #[test]
    fn test_region_prefers_raw_region() {
        let inc = normalize_at(json!({
            "title": "t", "raw_region": "EMEA", "region": "AMER"
        }))
        .unwrap();
        assert_eq!(inc.region, CanonicalRegion::Emea);
    }

    #[test]
    fn test_region_from_country_when_global() {
        let inc = normalize_at(json!({
            "title": "t", "region": "global", "country": "Brazil"
        }))
        .unwrap();
        assert_eq!(inc.region, CanonicalRegion::Latam);
    }

    #[test]
    fn test_apjc_box_override() {
        // Unclassifiable region, unknown country, but coordinates inside
        // the APJC box.
        let inc = normalize_at(json!({
            "title": "t", "lat": 35.0, "lng": 139.0
        }))
        .unwrap();
        assert_eq!(inc.region, CanonicalRegion::Apjc);
    }

    #[test]
    fn test_apjc_box_requires_coordinates() {
        let inc = normalize_at(json!({"title": "t"})).unwrap();
        assert_eq!(inc.region, CanonicalRegion::Global);
    }

    #[test]
    fn test_severity_floor() {
        assert_eq!(normalize_at(json!({"title": "t", "severity": 0})).unwrap().severity, 1);
        assert_eq!(normalize_at(json!({"title": "t", "severity": -3})).unwrap().severity, 1);
        assert_eq!(normalize_at(json!({"title": "t", "level": "4"})).unwrap().severity, 4);
        assert_eq!(normalize_at(json!({"title": "t", "severity": "high"})).unwrap().severity, 1);
    }

    #[test]
    fn test_case_normalization() {
        let inc = normalize_at(json!({
            "title": "t", "country": "br", "type": "unrest"
        }))
        .unwrap();
        assert_eq!(inc.country, "BR");
        assert_eq!(inc.category, "UNREST");
    }

    #[test]
    fn test_link_sanitization() {
        let ok = normalize_at(json!({"title": "t", "link": "https://x.test/a"})).unwrap();
        assert_eq!(ok.link, "https://x.test/a");
        let js = normalize_at(json!({"title": "t", "url": "javascript:alert(1)"})).unwrap();
        assert_eq!(js.link, "#");
        let rel = normalize_at(json!({"title": "t", "link": "/relative"})).unwrap();
        assert_eq!(rel.link, "#");
    }

    #[test]
    fn test_time_formats() {
        let rfc = normalize_at(json!({"title": "t", "time": "2025-05-31T10:00:00Z"})).unwrap();
        assert_eq!(rfc.time, Utc.with_ymd_and_hms(2025, 5, 31, 10, 0, 0).unwrap());

        let epoch_s = normalize_at(json!({"title": "t", "ts": 1748685600})).unwrap();
        assert_eq!(epoch_s.time.timestamp(), 1748685600);

        let epoch_ms = normalize_at(json!({"title": "t", "timestamp": 1748685600000i64})).unwrap();
        assert_eq!(epoch_ms.time.timestamp(), 1748685600);

        let junk = normalize_at(json!({"title": "t", "time": "yesterday-ish"})).unwrap();
        assert_eq!(junk.time, fixed_now());
    }

    #[test]
    fn test_filter_recent() {
        let now = fixed_now();
        let mk = |hours_ago: i64| {
            let mut inc = normalize_at(json!({"title": format!("t{hours_ago}")})).unwrap();
            inc.time = now - Duration::hours(hours_ago);
            inc
        };
        let kept = filter_recent(vec![mk(49), mk(1), mk(20)], now);
        assert_eq!(kept.len(), 2);
        // Newest first.
        assert_eq!(kept[0].title, "t1");
        assert_eq!(kept[1].title, "t20");
    }

    #[test]
    fn test_normalize_all_drops_untitled() {
        let incidents = normalize_all(vec![
            json!({"title": "a"}),
            json!({"nope": true}),
            json!({"title": "b"}),
        ]);
        assert_eq!(incidents.len(), 2);
    }
}
