//! Mobile menu state machine, focus trap and in-page navigation.

use serde::{Deserialize, Serialize};

use crate::dom::{self, ElementId};
use crate::event::KeyInput;
use crate::subscription::{DomEvent, ListenerSpec, ListenerTarget, Route, SubscriptionId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLayout {
    pub container: ElementId,
    /// Focusable descendants in tab order.
    pub focusables: Vec<ElementId>,
}

/// Where a document click landed, relative to the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickRegion {
    Menu,
    MenuToggle,
    Outside,
}

/// Confines Tab cycling to `[first, last]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusTrap {
    first: ElementId,
    last: ElementId,
}

impl FocusTrap {
    /// `None` for an empty focusable list: nothing to trap.
    pub fn over(focusables: &[ElementId]) -> Option<Self> {
        Some(Self {
            first: focusables.first()?.clone(),
            last: focusables.last()?.clone(),
        })
    }

    pub fn first(&self) -> &ElementId {
        &self.first
    }

    pub fn last(&self) -> &ElementId {
        &self.last
    }

    /// Element to move focus to instead of the browser default, if the key
    /// would leave the trap. Every other key passes through.
    pub fn redirect(&self, key: &KeyInput) -> Option<&ElementId> {
        if key.key != "Tab" {
            return None;
        }
        let active = key.active.as_ref()?;
        if key.shift && *active == self.first {
            Some(&self.last)
        } else if !key.shift && *active == self.last {
            Some(&self.first)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenMenu {
    previous_focus: Option<ElementId>,
    trap: Option<FocusTrap>,
    trap_subscription: Option<SubscriptionId>,
}

impl OpenMenu {
    pub fn trap(&self) -> Option<&FocusTrap> {
        self.trap.as_ref()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open(OpenMenu),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opened {
    pub first_item: Option<ElementId>,
    pub needs_trap: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Closed {
    pub restore_focus: Option<ElementId>,
    pub trap_subscription: Option<SubscriptionId>,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        matches!(self, MenuState::Open(_))
    }

    /// CLOSED -> OPEN. Captures `active` for later restoration. Returns `None`
    /// when the menu was already open.
    pub fn open(&mut self, active: Option<ElementId>, focusables: &[ElementId]) -> Option<Opened> {
        if self.is_open() {
            return None;
        }
        let trap = FocusTrap::over(focusables);
        let opened = Opened {
            first_item: trap.as_ref().map(|t| t.first.clone()),
            needs_trap: trap.is_some(),
        };
        *self = MenuState::Open(OpenMenu {
            previous_focus: active,
            trap,
            trap_subscription: None,
        });
        Some(opened)
    }

    /// OPEN -> CLOSED. Returns what must be undone, or `None` if already closed.
    pub fn close(&mut self) -> Option<Closed> {
        match std::mem::take(self) {
            MenuState::Closed => None,
            MenuState::Open(menu) => Some(Closed {
                restore_focus: menu.previous_focus,
                trap_subscription: menu.trap_subscription,
            }),
        }
    }

    pub fn attach_trap_subscription(&mut self, id: SubscriptionId) {
        if let MenuState::Open(menu) = self {
            menu.trap_subscription = Some(id);
        }
    }

    pub fn trap(&self) -> Option<&FocusTrap> {
        match self {
            MenuState::Open(menu) => menu.trap(),
            MenuState::Closed => None,
        }
    }

    pub fn has_trap_listener(&self) -> bool {
        matches!(
            self,
            MenuState::Open(OpenMenu {
                trap_subscription: Some(_),
                ..
            })
        )
    }
}

#[must_use]
pub fn should_close_for_width(viewport_width: f64, desktop_breakpoint: f64) -> bool {
    viewport_width >= desktop_breakpoint
}

/// Scroll offset that puts a section just below the fixed header.
#[must_use]
pub fn scroll_target(section_top: f64, header_height: f64, extra_offset: f64) -> f64 {
    (section_top - header_height - extra_offset).max(0.0)
}

pub fn listeners() -> Vec<ListenerSpec> {
    vec![
        ListenerSpec::on_selector(dom::MOBILE_MENU_TOGGLE_SELECTOR, DomEvent::Click, Route::MenuToggle),
        ListenerSpec::new(ListenerTarget::Document, DomEvent::Click, Route::DocumentClick),
        ListenerSpec::on_selector(dom::IN_PAGE_ANCHOR_SELECTOR, DomEvent::Click, Route::AnchorClick),
        ListenerSpec::on_selector(dom::SKIP_LINK_SELECTOR, DomEvent::Click, Route::SkipLink),
        ListenerSpec::new(ListenerTarget::Window, DomEvent::Resize, Route::Resize),
    ]
}

/// Keydown listener on the open menu; only exists while the trap is armed.
pub fn focus_trap_listener(container: &ElementId) -> ListenerSpec {
    ListenerSpec::new(
        ListenerTarget::Element(container.clone()),
        DomEvent::KeyDown,
        Route::FocusTrap,
    )
}
