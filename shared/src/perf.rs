//! Page-load timing and long-task logging. Best effort only.

use serde::{Deserialize, Serialize};

/// Raw `PerformanceNavigationTiming` marks, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct NavigationTiming {
    pub navigation_start: f64,
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub response_end: f64,
    pub dom_content_loaded_start: f64,
    pub dom_content_loaded_end: f64,
    pub load_event_end: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub dns: f64,
    pub connect: f64,
    pub ttfb: f64,
    pub download: f64,
    pub dom_parse: f64,
    pub total_load: f64,
}

impl From<&NavigationTiming> for PerformanceMetrics {
    fn from(t: &NavigationTiming) -> Self {
        Self {
            dns: t.domain_lookup_end - t.domain_lookup_start,
            connect: t.connect_end - t.connect_start,
            ttfb: t.response_start - t.request_start,
            download: t.response_end - t.response_start,
            dom_parse: t.dom_content_loaded_end - t.dom_content_loaded_start,
            total_load: t.load_event_end - t.navigation_start,
        }
    }
}

/// Analytics event carrying `total_load`.
pub const PAGE_LOAD_EVENT: &str = "page_load_time";

#[derive(Debug, Default)]
pub struct PerfState {
    metrics: Option<PerformanceMetrics>,
    long_tasks: u32,
}

impl PerfState {
    /// Reduces the navigation marks once per page. A repeated load event
    /// yields `None` so the analytics hook is not fed twice.
    pub fn record_load(&mut self, timing: &NavigationTiming) -> Option<PerformanceMetrics> {
        if self.metrics.is_some() {
            return None;
        }
        let metrics = PerformanceMetrics::from(timing);
        tracing::info!(
            dns = metrics.dns,
            connect = metrics.connect,
            ttfb = metrics.ttfb,
            download = metrics.download,
            dom_parse = metrics.dom_parse,
            total_load = metrics.total_load,
            "performance metrics"
        );
        self.metrics = Some(metrics);
        Some(metrics)
    }

    /// Running count of long tasks, or `None` when this one was short.
    pub fn record_task(&mut self, duration_ms: f64, threshold_ms: f64) -> Option<u32> {
        if duration_ms <= threshold_ms {
            return None;
        }
        self.long_tasks += 1;
        tracing::warn!(duration_ms, total = self.long_tasks, "long task detected");
        Some(self.long_tasks)
    }
}
