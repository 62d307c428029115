//! Proximity Alerting Library
//!
//! Screens normalized incidents against the facility network: nearest-site
//! great-circle distance, radius and country-wide inclusion rules, dismissal
//! state, and an ascending-distance ranking for presentation.

use geo_reference::{haversine_km, CanonicalRegion, FacilitySite, RiskLevel};
use incident_normalizer::Incident;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Presentation cap on the ranked alert list. The engine returns the full
/// list; callers apply the cap.
pub const MAX_ALERTS: usize = 25;

/// Default screening radius.
pub const DEFAULT_RADIUS_KM: f64 = 100.0;

/// How many dismissed ids the session retains.
pub const DISMISSAL_CAP: usize = 200;

/// Nearest-facility result for one incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestSite {
    pub distance_km: f64,
    pub site_name: String,
}

/// An incident paired with its nearest facility. Ephemeral; recomputed on
/// every evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityAlert {
    pub incident: Incident,
    pub nearest: NearestSite,
    /// Severity bucket for presentation.
    pub risk: RiskLevel,
}

/// Session-scoped set of dismissed incident ids, kept as a capped
/// most-recent-last list so it round-trips through storage unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DismissalSet {
    ids: Vec<String>,
}

impl DismissalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: Vec<String>) -> Self {
        let mut set = Self { ids };
        set.truncate_to_cap();
        set
    }

    pub fn dismiss(&mut self, id: &str) {
        if self.contains(id) {
            return;
        }
        self.ids.push(id.to_string());
        self.truncate_to_cap();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn truncate_to_cap(&mut self) {
        if self.ids.len() > DISMISSAL_CAP {
            let excess = self.ids.len() - DISMISSAL_CAP;
            self.ids.drain(..excess);
        }
    }
}

/// Nearest facility to a point, by haversine distance.
pub fn nearest_site(lat: f64, lng: f64, facilities: &[FacilitySite]) -> Option<NearestSite> {
    facilities
        .iter()
        .map(|site| NearestSite {
            distance_km: haversine_km(lat, lng, site.lat, site.lng),
            site_name: site.name.clone(),
        })
        .min_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Compute the ranked alert list.
///
/// Incidents are filtered by region (`Global` = no filter), dropped when
/// their coordinates are unresolved or their id is dismissed, paired with
/// their nearest facility (upstream-precomputed distances are trusted when
/// both distance and site name are present), kept when country-wide or
/// within `radius_km`, and sorted ascending by distance.
pub fn compute_alerts(
    incidents: &[Incident],
    facilities: &[FacilitySite],
    radius_km: f64,
    dismissed: &DismissalSet,
    region_filter: CanonicalRegion,
) -> Vec<ProximityAlert> {
    let mut alerts: Vec<ProximityAlert> = incidents
        .iter()
        .filter(|inc| region_filter.is_wildcard() || inc.region == region_filter)
        .filter(|inc| inc.has_coordinates())
        .filter(|inc| !dismissed.contains(&inc.id))
        .filter_map(|inc| {
            let nearest = match (&inc.distance_km, &inc.nearest_site_name) {
                (Some(distance), Some(name)) => NearestSite {
                    distance_km: *distance,
                    site_name: name.clone(),
                },
                _ => nearest_site(inc.lat, inc.lng, facilities)?,
            };

            if inc.country_wide || nearest.distance_km <= radius_km {
                Some(ProximityAlert {
                    incident: inc.clone(),
                    risk: RiskLevel::from_severity(inc.severity),
                    nearest,
                })
            } else {
                None
            }
        })
        .collect();

    alerts.sort_by(|a, b| {
        a.nearest
            .distance_km
            .partial_cmp(&b.nearest.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!(
        alerts = alerts.len(),
        screened = incidents.len(),
        radius_km,
        "proximity evaluation complete"
    );
    alerts
}
