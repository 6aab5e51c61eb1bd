use serde::{Deserialize, Serialize};

use crate::capabilities::{StorageError, StoredText, TimerId, WorkerOutput};
use crate::dom::ElementId;
use crate::filter::{FilterControl, ProjectCard};
use crate::form::{FieldSpec, FieldValue, SubmissionOutcome};
use crate::media::{LazyImage, ObserverGroup};
use crate::navigation::{ClickRegion, MenuLayout};
use crate::perf::NavigationTiming;
use crate::scroll::{NavLink, ParallaxLayer, SectionBox};

// --- Browser environment, sampled once by the shell at startup ---

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Optional browser features. Anything missing degrades quietly.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Support {
    pub intersection_observer: bool,
    pub performance_observer: bool,
    pub navigation_timing: bool,
    pub smooth_scroll: bool,
    pub push_state: bool,
    pub service_worker: bool,
    pub analytics_hook: bool,
}

impl Support {
    #[must_use]
    pub const fn all() -> Self {
        Self {
            intersection_observer: true,
            performance_observer: true,
            navigation_timing: true,
            smooth_scroll: true,
            push_state: true,
            service_worker: true,
            analytics_hook: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Environment {
    pub prefers_dark: bool,
    pub prefers_reduced_motion: bool,
    pub prefers_high_contrast: bool,
    pub viewport: Viewport,
    pub support: Support,
}

/// The parts of the document the core reasons about, measured by the shell.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PageLayout {
    pub header_height: f64,
    pub sections: Vec<SectionBox>,
    pub nav_links: Vec<NavLink>,
    pub menu: Option<MenuLayout>,
    pub filters: Vec<FilterControl>,
    pub cards: Vec<ProjectCard>,
    pub form: Option<Vec<FieldSpec>>,
    pub parallax: Vec<ParallaxLayer>,
    pub reveal_targets: Vec<ElementId>,
    pub lazy_images: Vec<LazyImage>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Startup {
    pub environment: Environment,
    pub layout: PageLayout,
    /// Scroll position the page was restored to.
    pub scroll: ScrollSample,
    /// Raw JSON overrides for [`crate::SiteConfig`].
    pub config_json: Option<String>,
    /// `location.href`, the base for a same-origin contact endpoint.
    #[serde(default)]
    pub page_url: Option<String>,
}

// --- Per-event payloads ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyInput {
    pub key: String,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    /// `document.activeElement` when the key went down.
    pub active: Option<ElementId>,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    #[must_use]
    pub fn on(mut self, element: ElementId) -> Self {
        self.active = Some(element);
        self
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct ScrollSample {
    pub offset: f64,
    pub document_height: f64,
    pub viewport_height: f64,
    /// Monotonic timestamp (`performance.now()`, whole milliseconds).
    pub at_ms: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Resize {
    pub viewport: Viewport,
    pub header_height: f64,
    pub sections: Vec<SectionBox>,
    pub scroll: ScrollSample,
}

// --- Event enum: large variants boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    Started(Box<Startup>),
    PageLoaded { timing: Option<NavigationTiming> },
    Destroyed,

    // Theme
    ThemeToggled,
    SystemThemeChanged { prefers_dark: bool },

    // Navigation & menu
    MenuToggled { active: Option<ElementId> },
    MenuOpenRequested { active: Option<ElementId> },
    MenuCloseRequested,
    DocumentClicked { region: ClickRegion },
    KeyPressed(KeyInput),
    FocusTrapKey(KeyInput),
    AnchorClicked { href: String },
    SkipLinkClicked { href: String },
    FocusIn { element: ElementId },
    FocusOut { element: ElementId },

    // Scroll & layout
    Scrolled(ScrollSample),
    Resized(Box<Resize>),

    // Projects
    FilterSelected { key: String },

    // Contact form
    FieldInput { name: String, value: String },
    FieldBlurred { name: String, value: String },
    FormSubmitted { values: Vec<FieldValue> },

    // Observers & global handlers
    Intersected {
        group: ObserverGroup,
        targets: Vec<ElementId>,
    },
    LongTaskObserved { duration_ms: f64 },
    ScriptError { message: String },
    UnhandledRejection { reason: String },

    // Capability responses
    TimerFired { id: TimerId },
    ThemeLoaded(StoredText),
    ThemePersisted(Result<(), StorageError>),
    SubmissionCompleted(Box<SubmissionOutcome>),
    WorkerRegistered(WorkerOutput),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Started(_) => "started",
            Event::PageLoaded { .. } => "page_loaded",
            Event::Destroyed => "destroyed",
            Event::ThemeToggled => "theme_toggled",
            Event::SystemThemeChanged { .. } => "system_theme_changed",
            Event::MenuToggled { .. } => "menu_toggled",
            Event::MenuOpenRequested { .. } => "menu_open_requested",
            Event::MenuCloseRequested => "menu_close_requested",
            Event::DocumentClicked { .. } => "document_clicked",
            Event::KeyPressed(_) => "key_pressed",
            Event::FocusTrapKey(_) => "focus_trap_key",
            Event::AnchorClicked { .. } => "anchor_clicked",
            Event::SkipLinkClicked { .. } => "skip_link_clicked",
            Event::FocusIn { .. } => "focus_in",
            Event::FocusOut { .. } => "focus_out",
            Event::Scrolled(_) => "scrolled",
            Event::Resized(_) => "resized",
            Event::FilterSelected { .. } => "filter_selected",
            Event::FieldInput { .. } => "field_input",
            Event::FieldBlurred { .. } => "field_blurred",
            Event::FormSubmitted { .. } => "form_submitted",
            Event::Intersected { .. } => "intersected",
            Event::LongTaskObserved { .. } => "long_task_observed",
            Event::ScriptError { .. } => "script_error",
            Event::UnhandledRejection { .. } => "unhandled_rejection",
            Event::TimerFired { .. } => "timer_fired",
            Event::ThemeLoaded(_) => "theme_loaded",
            Event::ThemePersisted(_) => "theme_persisted",
            Event::SubmissionCompleted(_) => "submission_completed",
            Event::WorkerRegistered(_) => "worker_registered",
        }
    }

    /// High-frequency events that are not worth a debug line each.
    pub fn is_noisy(&self) -> bool {
        matches!(
            self,
            Event::Scrolled(_)
                | Event::FocusIn { .. }
                | Event::FocusOut { .. }
                | Event::FieldInput { .. }
                | Event::TimerFired { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_size_is_reasonable() {
        // Ensure boxing keeps the enum small.
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 128,
            "Event enum is {} bytes, box more variants",
            size
        );
    }

    #[test]
    fn key_input_builders() {
        let key = KeyInput::new("Tab")
            .with_shift()
            .on(ElementId::new("first"));
        assert!(key.shift);
        assert!(!key.alt);
        assert_eq!(key.active, Some(ElementId::new("first")));
    }

    #[test]
    fn event_names_are_stable() {
        assert_eq!(Event::ThemeToggled.name(), "theme_toggled");
        assert!(Event::Scrolled(ScrollSample::default()).is_noisy());
        assert!(!Event::Destroyed.is_noisy());
    }
}
