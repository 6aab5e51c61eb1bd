use tracing::instrument;

use crate::a11y::{self, KeyAction, KeyContext};
use crate::capabilities::{Capabilities, StorageKey, StoredText, TextStore, WorkerOutput};
use crate::config::SiteConfig;
use crate::dom::{self, ElementId};
use crate::error::{self, AppError, ErrorKind};
use crate::event::{Event, KeyInput, Resize, Startup};
use crate::filter;
use crate::form::{self, FieldValue};
use crate::media::ObserverGroup;
use crate::model::Model;
use crate::navigation::{self, ClickRegion};
use crate::perf::{NavigationTiming, PAGE_LOAD_EVENT};
use crate::scroll;
use crate::subscription::{DomEvent, ListenerSpec, ListenerTarget, Route};
use crate::theme::{self, THEME_KEY};
use crate::timing::Task;
use crate::view::ViewModel;

#[derive(Default)]
pub struct App;

impl App {
    // --- Scheduling ---

    fn schedule(model: &mut Model, caps: &Capabilities, task: Task) {
        let delay = task.delay_ms(&model.config);
        let scheduled = model.scheduler.schedule(task);
        if let Some(old) = scheduled.superseded {
            caps.timer.cancel(old);
        }
        caps.timer
            .start(scheduled.id, delay, |id| Event::TimerFired { id });
    }

    fn cancel(model: &mut Model, caps: &Capabilities, task: Task) {
        if let Some(id) = model.scheduler.cancel(task) {
            caps.timer.cancel(id);
        }
    }

    fn run_task(model: &mut Model, caps: &Capabilities, task: Task) {
        match task {
            Task::FocusFirstMenuItem => {
                if let Some(first) = model.menu.trap().map(|t| t.first().clone()) {
                    caps.browser.focus(first);
                }
            }
            Task::ApplyResize => {
                if let Some(resize) = model.pending_resize.take() {
                    Self::apply_resize(model, caps, resize);
                }
            }
            Task::RemoveHiddenCards => {
                let removed = model.filter.settle();
                tracing::debug!(removed, "hidden cards taken out of layout");
            }
            Task::ResetSubmitButton => {
                if let Some(form) = model.form.as_mut() {
                    form.reset_button();
                }
            }
            Task::DismissBanner => {
                if let Some(form) = model.form.as_mut() {
                    form.dismiss_banner();
                }
            }
            Task::ClearAnnouncement => model.a11y.announcer.clear(),
        }
        caps.render.render();
    }

    fn announce(model: &mut Model, caps: &Capabilities, message: impl Into<String>) {
        model.a11y.announcer.announce(message);
        Self::schedule(model, caps, Task::ClearAnnouncement);
    }

    // --- Startup & teardown ---

    fn config_from(json: Option<&str>) -> SiteConfig {
        match json.map(SiteConfig::from_json) {
            None => SiteConfig::default(),
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                error::report(&AppError::from(e));
                SiteConfig::default()
            }
        }
    }

    fn listeners(model: &Model) -> Vec<ListenerSpec> {
        let mut specs = theme::listeners();
        specs.extend(navigation::listeners());
        specs.extend(scroll::listeners());
        specs.extend(a11y::listeners());
        if !model.layout.filters.is_empty() {
            specs.extend(filter::listeners());
        }
        if model.form.is_some() {
            specs.extend(form::listeners());
        }
        specs.extend([
            ListenerSpec::new(ListenerTarget::Window, DomEvent::Load, Route::PageLoad),
            ListenerSpec::new(ListenerTarget::Window, DomEvent::Error, Route::ScriptError),
            ListenerSpec::new(
                ListenerTarget::Window,
                DomEvent::UnhandledRejection,
                Route::UnhandledRejection,
            ),
        ]);
        specs
    }

    #[instrument(skip_all)]
    fn start(model: &mut Model, caps: &Capabilities, startup: Startup) {
        let Startup {
            environment,
            layout,
            scroll,
            config_json,
            page_url,
        } = startup;
        let config = Self::config_from(config_json.as_deref());
        *model = Model::new(config, environment, layout);
        model.page_url = page_url;

        let specs = Self::listeners(model);
        for subscription in model.subscriptions.register_all(specs) {
            caps.browser.listen(subscription);
        }
        tracing::debug!(listeners = model.subscriptions.len(), "listeners registered");

        match StorageKey::new(THEME_KEY) {
            Ok(key) => caps.key_value.read_text(&key, Event::ThemeLoaded),
            Err(e) => error::report(&AppError::from(e)),
        }

        model
            .scroll
            .recompute(scroll, &model.layout.sections, &model.config);

        if !model.layout.cards.is_empty() {
            Self::apply_filter(model, caps, filter::ALL);
        }

        let observer = model.environment.support.intersection_observer;
        let targets = model.layout.reveal_targets.clone();
        match model.media.track_reveal(&targets, observer) {
            Some(targets) if !targets.is_empty() => caps.browser.observe(ObserverGroup::Reveal, targets),
            Some(_) => {}
            None => error::report(&AppError::unavailable("IntersectionObserver")),
        }
        let images = model.layout.lazy_images.clone();
        let images = model.media.track_images(&images, observer);
        if !images.is_empty() {
            caps.browser.observe(ObserverGroup::LazyImages, images);
        }

        if model.environment.support.performance_observer {
            caps.browser.observe_long_tasks();
        } else {
            error::report(&AppError::unavailable("PerformanceObserver"));
        }

        tracing::info!(theme = %model.theme.mode(), "behaviour layer started");
        caps.render.render();
    }

    #[instrument(skip_all)]
    fn teardown(model: &mut Model, caps: &Capabilities) {
        for subscription in model.subscriptions.release_all() {
            caps.browser.unlisten(subscription.id);
        }
        // The trap listener was part of the released set.
        let _ = model.menu.close();

        if model.environment.support.intersection_observer {
            caps.browser.disconnect(ObserverGroup::Reveal);
            caps.browser.disconnect(ObserverGroup::LazyImages);
        }
        model.media.clear_pending();

        for id in model.scheduler.drain() {
            caps.timer.cancel(id);
        }
        model.pending_resize = None;
        model.started = false;
        tracing::info!("behaviour layer torn down");
        caps.render.render();
    }

    // --- Theme ---

    fn toggle_theme(model: &mut Model, caps: &Capabilities) {
        let mode = model.theme.toggle();
        match StorageKey::new(THEME_KEY) {
            Ok(key) => caps
                .key_value
                .write_text(&key, mode.as_str(), Event::ThemePersisted),
            Err(e) => error::report(&AppError::from(e)),
        }
        tracing::info!(theme = %mode, "theme toggled");
        Self::announce(model, caps, format!("Switched to {mode} mode"));
        caps.render.render();
    }

    fn theme_loaded(model: &mut Model, caps: &Capabilities, stored: StoredText) {
        match stored {
            Ok(stored) => match model.theme.restore(stored.as_deref()) {
                Ok(Some(mode)) => tracing::info!(theme = %mode, "theme restored"),
                Ok(None) => {
                    tracing::debug!("stored theme arrived after an explicit choice");
                    return;
                }
                Err(e) => tracing::warn!(error = %e, "ignoring stored theme"),
            },
            Err(e) => error::report(&AppError::from(e)),
        }
        caps.render.render();
    }

    // --- Menu ---

    #[instrument(skip_all)]
    fn open_menu(model: &mut Model, caps: &Capabilities, active: Option<ElementId>) {
        let Some(layout) = model.layout.menu.clone() else {
            tracing::debug!("no mobile menu on this page");
            return;
        };
        let Some(opened) = model.menu.open(active, &layout.focusables) else {
            return;
        };
        if opened.needs_trap {
            let subscription = model
                .subscriptions
                .register(navigation::focus_trap_listener(&layout.container));
            model.menu.attach_trap_subscription(subscription.id);
            caps.browser.listen(subscription);
        }
        if opened.first_item.is_some() {
            Self::schedule(model, caps, Task::FocusFirstMenuItem);
        }
        tracing::info!(trapped = opened.needs_trap, "mobile menu opened");
        caps.render.render();
    }

    #[instrument(skip_all)]
    fn close_menu(model: &mut Model, caps: &Capabilities) {
        let Some(closed) = model.menu.close() else {
            return;
        };
        Self::cancel(model, caps, Task::FocusFirstMenuItem);
        if let Some(id) = closed.trap_subscription {
            model.subscriptions.release(id);
            caps.browser.unlisten(id);
        }
        if let Some(previous) = closed.restore_focus {
            caps.browser.focus(previous);
        }
        tracing::info!("mobile menu closed");
        caps.render.render();
    }

    fn trap_key(model: &Model, caps: &Capabilities, input: &KeyInput) {
        let Some(target) = model.menu.trap().and_then(|t| t.redirect(input)) else {
            return;
        };
        caps.browser.consume_key();
        caps.browser.focus(target.clone());
    }

    // --- In-page navigation ---

    /// Scrolls a section under the header. Returns false for unknown ids.
    fn scroll_to_section(model: &Model, caps: &Capabilities, id: &str) -> bool {
        let Some(section) = model.section(id) else {
            tracing::debug!(section = id, "no such section");
            return false;
        };
        let top = navigation::scroll_target(
            section.top,
            model.layout.header_height,
            model.config.scroll_target_offset_px,
        );
        caps.browser
            .scroll_to(top, model.environment.support.smooth_scroll);
        true
    }

    fn anchor_clicked(model: &mut Model, caps: &Capabilities, href: &str) {
        let Some(target) = dom::fragment_target(href) else {
            return;
        };
        Self::close_menu(model, caps);
        if Self::scroll_to_section(model, caps, target) {
            if model.environment.support.push_state {
                caps.browser.push_history(href);
            }
            caps.browser.focus_section(ElementId::new(target));
        }
    }

    fn skip_link(model: &Model, caps: &Capabilities, href: &str) {
        let Some(target) = dom::fragment_target(href) else {
            return;
        };
        if model.section(target).is_some() {
            caps.browser.focus_section(ElementId::new(target));
            Self::scroll_to_section(model, caps, target);
        }
    }

    fn navigate_to_section(model: &mut Model, caps: &Capabilities, id: &str) {
        if Self::scroll_to_section(model, caps, id) {
            caps.browser.focus_section(ElementId::new(id));
            Self::announce(model, caps, a11y::navigated_announcement(id));
            caps.render.render();
        }
    }

    fn key_pressed(model: &mut Model, caps: &Capabilities, input: &KeyInput) {
        model.a11y.key_pressed();
        let action = a11y::route_key(
            input,
            &KeyContext {
                menu_open: model.menu.is_open(),
                config: &model.config,
                filters: &model.layout.filters,
                cards: &model.layout.cards,
            },
        );
        let Some(action) = action else {
            return;
        };
        if action.consumes_key() {
            caps.browser.consume_key();
        }
        match action {
            KeyAction::CloseMenu => Self::close_menu(model, caps),
            KeyAction::ToggleTheme => Self::toggle_theme(model, caps),
            KeyAction::NavigateTo(section) => Self::navigate_to_section(model, caps, &section),
            KeyAction::FocusFilter(id) => caps.browser.focus(id),
            KeyAction::ActivateCard(link) => {
                caps.browser.activate(link.id.clone());
                Self::announce(model, caps, a11y::opening_announcement(&link));
                caps.render.render();
            }
        }
    }

    // --- Layout ---

    /// Section boxes and scroll state follow every resize.
    fn resized(model: &mut Model, caps: &Capabilities, resize: Resize) {
        model.layout.sections.clone_from(&resize.sections);
        model
            .scroll
            .recompute(resize.scroll, &model.layout.sections, &model.config);
        model.pending_resize = Some(resize);
        Self::schedule(model, caps, Task::ApplyResize);
        caps.render.render();
    }

    /// Header height and the breakpoint close wait for the debounce.
    fn apply_resize(model: &mut Model, caps: &Capabilities, resize: Resize) {
        model.environment.viewport = resize.viewport;
        model.layout.header_height = resize.header_height;
        if model.menu.is_open()
            && navigation::should_close_for_width(
                resize.viewport.width,
                model.config.desktop_breakpoint_px,
            )
        {
            Self::close_menu(model, caps);
        }
        caps.render.render();
    }

    // --- Projects ---

    #[instrument(skip_all, fields(filter = key))]
    fn apply_filter(model: &mut Model, caps: &Capabilities, key: &str) {
        let outcome = model
            .filter
            .apply(key, &model.layout.cards, model.config.card_stagger_ms);
        if outcome.leaving {
            Self::schedule(model, caps, Task::RemoveHiddenCards);
        } else {
            Self::cancel(model, caps, Task::RemoveHiddenCards);
        }
        tracing::info!(visible = outcome.visible, "projects filtered");
        Self::announce(model, caps, filter::announcement(key, outcome.visible));
        caps.render.render();
    }

    // --- Contact form ---

    #[instrument(skip_all)]
    fn submit(model: &mut Model, caps: &Capabilities, values: &[FieldValue]) {
        let endpoint = model.config.contact_endpoint.clone();
        let Some(form) = model.form.as_mut() else {
            tracing::debug!("submit without a contact form");
            return;
        };
        if form.is_busy() {
            tracing::debug!(state = ?form.button(), "submit ignored while busy");
            return;
        }
        if let Err(first_invalid) = form.validate_all(values) {
            tracing::debug!(
                code = ErrorKind::Validation.code(),
                field = %first_invalid,
                "submit blocked"
            );
            caps.browser.focus(first_invalid);
            Self::announce(model, caps, form::INVALID_FORM_ANNOUNCEMENT);
            caps.render.render();
            return;
        }

        let sent = form::build_request(&endpoint, model.page_url.as_deref(), &form.values())
            .and_then(|request| {
                request.send(&caps.http, |outcome| {
                    Event::SubmissionCompleted(Box::new(outcome))
                })
            });
        match sent {
            Ok(()) => {
                form.begin_submission();
                Self::cancel(model, caps, Task::ResetSubmitButton);
                tracing::info!("contact form submitted");
            }
            Err(e) => Self::finish_submission(model, caps, Err(e)),
        }
        caps.render.render();
    }

    fn submission_completed(
        model: &mut Model,
        caps: &Capabilities,
        outcome: form::SubmissionOutcome,
    ) {
        Self::finish_submission(model, caps, outcome.map(|_| ()));
        caps.render.render();
    }

    fn finish_submission(
        model: &mut Model,
        caps: &Capabilities,
        outcome: Result<(), form::SubmissionError>,
    ) {
        let config = &model.config;
        let Some(form) = model.form.as_mut() else {
            return;
        };
        match outcome {
            Ok(()) => {
                form.finish_submission(true);
                tracing::info!("contact message delivered");
            }
            Err(e) => {
                let link = form::mailto_link(
                    &config.fallback_email,
                    form.value("subject"),
                    &config.fallback_subject,
                    form.value("message"),
                );
                form.finish_submission(false);
                caps.browser.navigate(link);
                error::report(&AppError::from(e));
            }
        }
        Self::schedule(model, caps, Task::ResetSubmitButton);
        Self::schedule(model, caps, Task::DismissBanner);
    }

    // --- Load-time extras ---

    fn page_loaded(model: &mut Model, caps: &Capabilities, timing: Option<&NavigationTiming>) {
        let support = model.environment.support;
        match timing {
            Some(timing) if support.navigation_timing => {
                match model.perf.record_load(timing) {
                    Some(metrics) if support.analytics_hook => {
                        caps.browser.analytics(PAGE_LOAD_EVENT, metrics.total_load);
                    }
                    Some(_) => {}
                    None => tracing::debug!("load timing already recorded"),
                }
            }
            _ => error::report(&AppError::unavailable("Navigation timing")),
        }

        if support.service_worker {
            caps.worker
                .register(model.config.service_worker_url.clone(), Event::WorkerRegistered);
        } else {
            error::report(&AppError::unavailable("Service worker"));
        }
    }

    fn intersected(model: &mut Model, caps: &Capabilities, group: ObserverGroup, targets: &[ElementId]) {
        let done = match group {
            ObserverGroup::Reveal => model.media.reveal(targets),
            ObserverGroup::LazyImages => model.media.load_images(targets),
        };
        if done.is_empty() {
            return;
        }
        for target in done {
            caps.browser.unobserve(group, target);
        }
        caps.render.render();
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        if event.is_noisy() {
            tracing::trace!(event = event.name(), "update");
        } else {
            tracing::debug!(event = event.name(), "update");
        }

        if !model.started && !matches!(event, Event::Started(_)) {
            tracing::debug!(event = event.name(), "ignored outside a live session");
            return;
        }

        match event {
            Event::Started(_) if model.started => {
                tracing::warn!("already started, tear down first");
            }
            Event::Started(startup) => Self::start(model, caps, *startup),
            Event::PageLoaded { timing } => Self::page_loaded(model, caps, timing.as_ref()),
            Event::Destroyed => Self::teardown(model, caps),

            Event::ThemeToggled => Self::toggle_theme(model, caps),
            Event::SystemThemeChanged { prefers_dark } => {
                if let Some(mode) = model.theme.system_changed(prefers_dark) {
                    tracing::info!(theme = %mode, "following system theme");
                    caps.render.render();
                }
            }
            Event::ThemeLoaded(output) => Self::theme_loaded(model, caps, output),
            Event::ThemePersisted(written) => {
                if let Err(e) = written {
                    error::report(&AppError::from(e));
                }
            }

            Event::MenuToggled { active } => {
                if model.menu.is_open() {
                    Self::close_menu(model, caps);
                } else {
                    Self::open_menu(model, caps, active);
                }
            }
            Event::MenuOpenRequested { active } => Self::open_menu(model, caps, active),
            Event::MenuCloseRequested => Self::close_menu(model, caps),
            Event::DocumentClicked { region } => {
                if region == ClickRegion::Outside {
                    Self::close_menu(model, caps);
                }
            }
            Event::KeyPressed(input) => Self::key_pressed(model, caps, &input),
            Event::FocusTrapKey(input) => Self::trap_key(model, caps, &input),
            Event::AnchorClicked { href } => Self::anchor_clicked(model, caps, &href),
            Event::SkipLinkClicked { href } => Self::skip_link(model, caps, &href),
            Event::FocusIn { element } => {
                if model.a11y.is_keyboard_navigation() {
                    model.a11y.focus_in(element);
                    caps.render.render();
                }
            }
            Event::FocusOut { element } => {
                if model.a11y.focus_visible() == Some(&element) {
                    model.a11y.focus_out(&element);
                    caps.render.render();
                }
            }

            Event::Scrolled(sample) => {
                if model
                    .scroll
                    .on_scroll(sample, &model.layout.sections, &model.config)
                {
                    caps.render.render();
                }
            }
            Event::Resized(resize) => Self::resized(model, caps, *resize),

            Event::FilterSelected { key } => Self::apply_filter(model, caps, &key),

            Event::FieldInput { name, value } => {
                if model.form.as_mut().is_some_and(|f| f.input(&name, &value)) {
                    caps.render.render();
                }
            }
            Event::FieldBlurred { name, value } => {
                if model.form.as_mut().and_then(|f| f.blur(&name, &value)).is_some() {
                    caps.render.render();
                }
            }
            Event::FormSubmitted { values } => Self::submit(model, caps, &values),
            Event::SubmissionCompleted(result) => {
                Self::submission_completed(model, caps, *result);
            }

            Event::Intersected { group, targets } => {
                Self::intersected(model, caps, group, &targets);
            }
            Event::LongTaskObserved { duration_ms } => {
                model
                    .perf
                    .record_task(duration_ms, model.config.long_task_threshold_ms);
            }
            Event::ScriptError { message } => error::report(&AppError::new(
                ErrorKind::Script,
                format!("JavaScript error: {message}"),
            )),
            Event::UnhandledRejection { reason } => error::report(&AppError::new(
                ErrorKind::Script,
                format!("Unhandled promise rejection: {reason}"),
            )),
            Event::WorkerRegistered(output) => match output {
                WorkerOutput::Registered { scope } => {
                    tracing::info!(%scope, "service worker registered");
                }
                WorkerOutput::Failed { reason } => {
                    tracing::warn!(%reason, "service worker registration failed");
                }
            },

            Event::TimerFired { id } => match model.scheduler.fire(id) {
                Some(task) => Self::run_task(model, caps, task),
                None => tracing::debug!(timer = id.0, "stale timer ignored"),
            },
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::project(model)
    }
}
