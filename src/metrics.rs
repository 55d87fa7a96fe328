/// Per-brand run metrics
///
/// Tracks how many candidates each brand surfaced, how many passed the
/// portrait filter, and why the rest were skipped.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandMetrics {
    pub brand: String,
    pub candidates_found: usize,
    pub accepted: usize,
    pub download_failures: usize,
    pub decode_failures: usize,
    pub orientation_rejects: usize,
    /// Thumbnails cloned from the last accepted one to fill the grid
    pub padded: usize,
    /// True when zero candidates passed the filter and the grid was skipped
    pub starved: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: u64,
}

impl BrandMetrics {
    pub fn new(brand: String) -> Self {
        Self {
            brand,
            candidates_found: 0,
            accepted: 0,
            download_failures: 0,
            decode_failures: 0,
            orientation_rejects: 0,
            padded: 0,
            starved: false,
            completed_at: None,
            duration_ms: 0,
        }
    }

    pub fn skipped(&self) -> usize {
        self.download_failures + self.decode_failures + self.orientation_rejects
    }

    pub fn acceptance_rate(&self) -> f64 {
        let attempted = self.accepted + self.skipped();
        if attempted == 0 {
            0.0
        } else {
            (self.accepted as f64 / attempted as f64) * 100.0
        }
    }
}

/// Collects BrandMetrics across the run.
pub struct MetricsTracker {
    metrics: Mutex<HashMap<String, BrandMetrics>>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            metrics: Mutex::new(HashMap::new()),
        }
    }

    fn with_brand<F>(&self, brand: &str, f: F)
    where
        F: FnOnce(&mut BrandMetrics),
    {
        let mut metrics = self.metrics.lock().unwrap();
        let entry = metrics
            .entry(brand.to_string())
            .or_insert_with(|| BrandMetrics::new(brand.to_string()));
        f(entry);
    }

    pub fn record_candidates(&self, brand: &str, found: usize) {
        self.with_brand(brand, |m| m.candidates_found = found);
    }

    pub fn record_accepted(&self, brand: &str) {
        self.with_brand(brand, |m| m.accepted += 1);
    }

    /// Count a skipped candidate under its reason kind
    /// ("download", "decode" or "orientation").
    pub fn record_skip(&self, brand: &str, kind: &str) {
        self.with_brand(brand, |m| match kind {
            "download" => m.download_failures += 1,
            "decode" => m.decode_failures += 1,
            "orientation" => m.orientation_rejects += 1,
            other => log::debug!("Unknown skip kind '{}' for {}", other, brand),
        });
    }

    pub fn record_padded(&self, brand: &str, padded: usize) {
        self.with_brand(brand, |m| m.padded = padded);
    }

    pub fn record_starved(&self, brand: &str) {
        self.with_brand(brand, |m| m.starved = true);
    }

    pub fn record_completed(&self, brand: &str, duration: Duration) {
        self.with_brand(brand, |m| {
            m.completed_at = Some(Utc::now());
            m.duration_ms = duration.as_millis() as u64;
        });
    }

    pub fn get(&self, brand: &str) -> Option<BrandMetrics> {
        let metrics = self.metrics.lock().unwrap();
        metrics.get(brand).cloned()
    }

    pub fn all(&self) -> Vec<BrandMetrics> {
        let metrics = self.metrics.lock().unwrap();
        let mut all: Vec<_> = metrics.values().cloned().collect();
        all.sort_by(|a, b| a.brand.cmp(&b.brand));
        all
    }

    pub fn log_summary(&self) {
        log::info!("=== Run summary ===");
        for m in self.all() {
            if m.starved {
                log::warn!(
                    "{}: starved - {} candidates, 0 accepted ({} download / {} decode / {} orientation skips)",
                    m.brand,
                    m.candidates_found,
                    m.download_failures,
                    m.decode_failures,
                    m.orientation_rejects
                );
            } else {
                log::info!(
                    "{}: {} candidates, {} accepted ({:.0}%), {} padded, {}ms",
                    m.brand,
                    m.candidates_found,
                    m.accepted,
                    m.acceptance_rate(),
                    m.padded,
                    m.duration_ms
                );
            }
        }
    }

    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.all()).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = BrandMetrics::new("Supreme".to_string());
        assert_eq!(metrics.brand, "Supreme");
        assert_eq!(metrics.accepted, 0);
        assert_eq!(metrics.acceptance_rate(), 0.0);
        assert!(!metrics.starved);
    }

    #[test]
    fn test_skip_counting_by_kind() {
        let tracker = MetricsTracker::new();
        tracker.record_skip("Supreme", "download");
        tracker.record_skip("Supreme", "orientation");
        tracker.record_skip("Supreme", "orientation");

        let m = tracker.get("Supreme").unwrap();
        assert_eq!(m.download_failures, 1);
        assert_eq!(m.orientation_rejects, 2);
        assert_eq!(m.decode_failures, 0);
        assert_eq!(m.skipped(), 3);
    }

    #[test]
    fn test_acceptance_rate() {
        let tracker = MetricsTracker::new();
        tracker.record_accepted("Dior");
        tracker.record_accepted("Dior");
        tracker.record_skip("Dior", "orientation");

        let m = tracker.get("Dior").unwrap();
        assert!((m.acceptance_rate() - 66.66).abs() < 0.1);
    }

    #[test]
    fn test_completed_brand_has_timestamp() {
        let tracker = MetricsTracker::new();
        tracker.record_candidates("Bape", 8);
        tracker.record_completed("Bape", Duration::from_millis(1500));

        let m = tracker.get("Bape").unwrap();
        assert_eq!(m.candidates_found, 8);
        assert_eq!(m.duration_ms, 1500);
        assert!(m.completed_at.is_some());
    }

    #[test]
    fn test_export_json_lists_all_brands() {
        let tracker = MetricsTracker::new();
        tracker.record_accepted("Bape");
        tracker.record_starved("Amiri");

        let json = tracker.export_json();
        assert!(json.contains("\"Bape\""));
        assert!(json.contains("\"Amiri\""));
        assert_eq!(tracker.all().len(), 2);
    }
}
