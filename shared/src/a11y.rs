//! Accessibility helpers: the live-region announcer, the keyboard shortcut
//! router and keyboard focus tracking.

use crate::config::SiteConfig;
use crate::dom::ElementId;
use crate::event::KeyInput;
use crate::filter::{self, CardLink, FilterControl, ProjectCard};
use crate::subscription::{DomEvent, ListenerSpec, ListenerTarget, Route};

/// Text in the polite live region. Cleared shortly after each announcement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Announcer {
    message: Option<String>,
}

impl Announcer {
    pub fn announce(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "announce");
        self.message = Some(message);
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct A11yState {
    pub announcer: Announcer,
    keyboard_navigation: bool,
    focus_visible: Option<ElementId>,
    pub high_contrast: bool,
}

impl A11yState {
    pub fn new(high_contrast: bool) -> Self {
        Self {
            high_contrast,
            ..Self::default()
        }
    }

    /// Any key press switches to keyboard mode for the rest of the session.
    pub fn key_pressed(&mut self) {
        self.keyboard_navigation = true;
    }

    pub fn is_keyboard_navigation(&self) -> bool {
        self.keyboard_navigation
    }

    pub fn focus_in(&mut self, element: ElementId) {
        if self.keyboard_navigation {
            self.focus_visible = Some(element);
        }
    }

    pub fn focus_out(&mut self, element: &ElementId) {
        if self.focus_visible.as_ref() == Some(element) {
            self.focus_visible = None;
        }
    }

    pub fn focus_visible(&self) -> Option<&ElementId> {
        self.focus_visible.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    CloseMenu,
    ToggleTheme,
    NavigateTo(String),
    FocusFilter(ElementId),
    ActivateCard(CardLink),
}

impl KeyAction {
    /// Whether the browser's default handling of the key must be suppressed.
    pub fn consumes_key(&self) -> bool {
        !matches!(self, KeyAction::CloseMenu)
    }
}

pub struct KeyContext<'a> {
    pub menu_open: bool,
    pub config: &'a SiteConfig,
    pub filters: &'a [FilterControl],
    pub cards: &'a [ProjectCard],
}

/// Document-level keydown routing. Checked in order: Escape, Alt+T, Alt+digit
/// shortcuts, then keys on a focused filter control or project card.
pub fn route_key(input: &KeyInput, ctx: &KeyContext<'_>) -> Option<KeyAction> {
    if input.key == "Escape" {
        return ctx.menu_open.then_some(KeyAction::CloseMenu);
    }

    if input.alt {
        if input.key.eq_ignore_ascii_case("t") {
            return Some(KeyAction::ToggleTheme);
        }
        if let Some(section) = ctx.config.shortcut_section(&input.key) {
            return Some(KeyAction::NavigateTo(section.to_string()));
        }
        return None;
    }

    let active = input.active.as_ref()?;

    if let Some(index) = ctx.filters.iter().position(|f| &f.id == active) {
        let target = filter::roving_focus(index, ctx.filters.len(), &input.key)?;
        return Some(KeyAction::FocusFilter(ctx.filters[target].id.clone()));
    }

    if input.key == "Enter" || input.key == " " {
        let card = ctx.cards.iter().find(|c| &c.id == active)?;
        return card.link.clone().map(KeyAction::ActivateCard);
    }

    None
}

pub fn navigated_announcement(section: &str) -> String {
    format!("Navigated to {section} section")
}

pub fn opening_announcement(link: &CardLink) -> String {
    format!("Opening {}", link.text)
}

pub fn listeners() -> Vec<ListenerSpec> {
    vec![
        ListenerSpec::new(ListenerTarget::Document, DomEvent::KeyDown, Route::KeyRouter),
        ListenerSpec::new(ListenerTarget::Document, DomEvent::FocusIn, Route::FocusIn),
        ListenerSpec::new(ListenerTarget::Document, DomEvent::FocusOut, Route::FocusOut),
    ]
}
