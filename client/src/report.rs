//! Alert report assembly and output.

use chrono::{DateTime, Utc};
use geo_reference::{CanonicalRegion, RiskLevel};
use proximity_alerts::{ProximityAlert, MAX_ALERTS};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// One row of the ranked alert list.
#[derive(Debug, Clone, Serialize)]
pub struct ReportAlert {
    pub id: String,
    pub title: String,
    pub severity: u8,
    pub risk: RiskLevel,
    pub region: CanonicalRegion,
    pub distance_km: f64,
    pub site_name: String,
    pub time: DateTime<Utc>,
    pub link: String,
    pub country_wide: bool,
}

/// JSON report written by `--output` and the `once` mode.
#[derive(Debug, Clone, Serialize)]
pub struct AlertReport {
    pub generated_at: DateTime<Utc>,
    pub region_filter: CanonicalRegion,
    pub radius_km: f64,
    pub feed_live: bool,
    /// Size of the full ranked list before the presentation cap.
    pub total_alerts: usize,
    pub alerts: Vec<ReportAlert>,
}

impl AlertReport {
    /// Cap the ranked list for presentation; the engine's full result count
    /// is preserved in `total_alerts`.
    pub fn build(
        alerts: &[ProximityAlert],
        region_filter: CanonicalRegion,
        radius_km: f64,
        feed_live: bool,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            region_filter,
            radius_km,
            feed_live,
            total_alerts: alerts.len(),
            alerts: alerts
                .iter()
                .take(MAX_ALERTS)
                .map(|alert| ReportAlert {
                    id: alert.incident.id.clone(),
                    title: alert.incident.title.clone(),
                    severity: alert.incident.severity,
                    risk: alert.risk,
                    region: alert.incident.region,
                    distance_km: alert.nearest.distance_km,
                    site_name: alert.nearest.site_name.clone(),
                    time: alert.incident.time,
                    link: alert.incident.link.clone(),
                    country_wide: alert.incident.country_wide,
                })
                .collect(),
        }
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Log a human-readable summary of the ranked list.
    pub fn log_summary(&self) {
        info!(
            "{} alert(s) within {} km ({} shown), feed {}",
            self.total_alerts,
            self.radius_km,
            self.alerts.len(),
            if self.feed_live { "live" } else { "stale" }
        );
        for alert in &self.alerts {
            // Titles come off the wire; truncate by characters, not bytes.
            let title: String = alert.title.chars().take(40).collect();
            info!(
                "  {:>7.1} km | {:?} | {:40} | {}",
                alert.distance_km, alert.risk, title, alert.site_name
            );
        }
    }
}
