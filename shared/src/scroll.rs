//! Scroll-linked UI state: header collapse, active section, progress bar and
//! parallax layers.

use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::dom::ElementId;
use crate::event::ScrollSample;
use crate::subscription::{DomEvent, ListenerSpec, ListenerTarget, Route};
use crate::timing::Throttle;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionBox {
    pub id: ElementId,
    pub top: f64,
    pub height: f64,
}

impl SectionBox {
    fn contains(&self, probe: f64) -> bool {
        probe >= self.top && probe < self.top + self.height
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub id: ElementId,
    pub href: String,
}

impl NavLink {
    pub fn targets(&self, section: &ElementId) -> bool {
        crate::dom::fragment_target(&self.href) == Some(section.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub id: ElementId,
    /// Parsed `data-parallax` value.
    #[serde(default)]
    pub speed: Option<f64>,
}

impl ParallaxLayer {
    /// Missing, zero or unparsable speeds fall back to the default.
    pub fn speed(&self) -> f64 {
        self.speed
            .filter(|s| s.is_normal())
            .unwrap_or(crate::config::DEFAULT_PARALLAX_SPEED)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub header_collapsed: bool,
    pub active_section: Option<ElementId>,
    pub progress: f64,
    pub offset: f64,
}

#[must_use]
pub fn header_collapsed(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// Last section whose `[top, top + height)` contains `offset + probe_offset`.
pub fn active_section(sections: &[SectionBox], offset: f64, probe_offset: f64) -> Option<&ElementId> {
    let probe = offset + probe_offset;
    sections
        .iter()
        .rev()
        .find(|section| section.contains(probe))
        .map(|section| &section.id)
}

/// Percentage scrolled, in `[0, 100]`. A page that cannot scroll reports 0.
#[must_use]
pub fn progress(offset: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 || !scrollable.is_finite() || !offset.is_finite() {
        return 0.0;
    }
    (offset / scrollable * 100.0).clamp(0.0, 100.0)
}

#[must_use]
pub fn parallax_offset(offset: f64, speed: f64) -> f64 {
    -(offset * speed)
}

#[derive(Debug, Default)]
pub struct ScrollSync {
    throttle: Throttle,
    metrics: ScrollMetrics,
}

impl ScrollSync {
    pub fn new(throttle_ms: u64) -> Self {
        Self {
            throttle: Throttle::new(throttle_ms),
            ..Self::default()
        }
    }

    pub fn metrics(&self) -> &ScrollMetrics {
        &self.metrics
    }

    /// Throttled entry point for scroll events. Returns whether the sample
    /// was admitted and applied.
    pub fn on_scroll(&mut self, sample: ScrollSample, sections: &[SectionBox], config: &SiteConfig) -> bool {
        if !self.throttle.admit(sample.at_ms) {
            return false;
        }
        self.recompute(sample, sections, config);
        true
    }

    /// Unthrottled recompute, used after resizes and at startup.
    pub fn recompute(&mut self, sample: ScrollSample, sections: &[SectionBox], config: &SiteConfig) {
        self.metrics = ScrollMetrics {
            header_collapsed: header_collapsed(sample.offset, config.header_collapse_px),
            active_section: active_section(sections, sample.offset, config.section_probe_offset_px).cloned(),
            progress: progress(sample.offset, sample.document_height, sample.viewport_height),
            offset: sample.offset,
        };
    }
}

pub fn listeners() -> Vec<ListenerSpec> {
    vec![ListenerSpec::new(ListenerTarget::Window, DomEvent::Scroll, Route::Scroll)]
}
