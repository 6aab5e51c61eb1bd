use crate::a11y::A11yState;
use crate::config::SiteConfig;
use crate::event::{Environment, PageLayout, Resize};
use crate::filter::FilterState;
use crate::form::{default_fields, ContactForm};
use crate::media::MediaState;
use crate::navigation::MenuState;
use crate::perf::PerfState;
use crate::scroll::{ScrollSync, SectionBox};
use crate::subscription::SubscriptionSet;
use crate::theme::ThemeState;
use crate::timing::Scheduler;

/// All UI state for the lifetime of the page. Built once from the startup
/// snapshot; every handler reads and writes it through `App::update`.
#[derive(Debug, Default)]
pub struct Model {
    pub started: bool,
    pub config: SiteConfig,
    pub environment: Environment,
    pub layout: PageLayout,
    /// Address of the page, for same-origin requests.
    pub page_url: Option<String>,

    pub theme: ThemeState,
    pub menu: MenuState,
    pub scroll: ScrollSync,
    pub filter: FilterState,
    pub form: Option<ContactForm>,
    pub a11y: A11yState,
    pub media: MediaState,
    pub perf: PerfState,

    /// Latest resize measurements, applied when the debounce settles.
    pub pending_resize: Option<Resize>,
    pub scheduler: Scheduler,
    pub subscriptions: SubscriptionSet,
}

impl Model {
    pub fn new(config: SiteConfig, environment: Environment, layout: PageLayout) -> Self {
        let form = layout.form.as_ref().map(|specs| {
            let specs = if specs.is_empty() {
                default_fields()
            } else {
                specs.clone()
            };
            ContactForm::new(specs, &config)
        });
        Self {
            started: true,
            theme: ThemeState::from_system(environment.prefers_dark),
            scroll: ScrollSync::new(config.scroll_throttle_ms),
            a11y: A11yState::new(environment.prefers_high_contrast),
            form,
            config,
            environment,
            layout,
            ..Self::default()
        }
    }

    pub fn section(&self, id: &str) -> Option<&SectionBox> {
        self.layout.sections.iter().find(|s| s.id.as_str() == id)
    }

    pub fn parallax_enabled(&self) -> bool {
        !self.environment.prefers_reduced_motion && !self.layout.parallax.is_empty()
    }
}
