//! DOM listener subscriptions.
//!
//! Setup code never attaches listeners implicitly: every component describes
//! the listeners it needs as [`ListenerSpec`]s, the app registers them here and
//! asks the shell to attach them. The returned [`Subscription`] handles are what
//! teardown releases.

use serde::{Deserialize, Serialize};

use crate::dom::ElementId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListenerTarget {
    Window,
    Document,
    Element(ElementId),
    /// Every element matching a CSS selector.
    Selector(String),
    MediaQuery(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomEvent {
    Click,
    KeyDown,
    Scroll,
    Resize,
    FocusIn,
    FocusOut,
    Blur,
    Input,
    Submit,
    Change,
    Load,
    Error,
    UnhandledRejection,
}

/// Which core event the shell should produce when the listener fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    ThemeToggle,
    SystemTheme,
    MenuToggle,
    DocumentClick,
    AnchorClick,
    SkipLink,
    KeyRouter,
    FocusTrap,
    FocusIn,
    FocusOut,
    Scroll,
    Resize,
    FilterSelect,
    FieldInput,
    FieldBlur,
    FormSubmit,
    PageLoad,
    ScriptError,
    UnhandledRejection,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerSpec {
    pub target: ListenerTarget,
    pub event: DomEvent,
    pub route: Route,
}

impl ListenerSpec {
    pub fn new(target: ListenerTarget, event: DomEvent, route: Route) -> Self {
        Self {
            target,
            event,
            route,
        }
    }

    pub fn on_element(id: &str, event: DomEvent, route: Route) -> Self {
        Self::new(ListenerTarget::Element(ElementId::new(id)), event, route)
    }

    pub fn on_selector(selector: &str, event: DomEvent, route: Route) -> Self {
        Self::new(ListenerTarget::Selector(selector.to_string()), event, route)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub spec: ListenerSpec,
}

#[derive(Debug, Default)]
pub struct SubscriptionSet {
    next_id: u64,
    active: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn register(&mut self, spec: ListenerSpec) -> Subscription {
        self.next_id += 1;
        let subscription = Subscription {
            id: SubscriptionId(self.next_id),
            spec,
        };
        self.active.push(subscription.clone());
        subscription
    }

    pub fn register_all(&mut self, specs: impl IntoIterator<Item = ListenerSpec>) -> Vec<Subscription> {
        specs.into_iter().map(|spec| self.register(spec)).collect()
    }

    pub fn release(&mut self, id: SubscriptionId) -> Option<Subscription> {
        let index = self.active.iter().position(|s| s.id == id)?;
        Some(self.active.remove(index))
    }

    pub fn release_all(&mut self) -> Vec<Subscription> {
        std::mem::take(&mut self.active)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
