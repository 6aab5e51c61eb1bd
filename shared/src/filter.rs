//! Project filter.

use serde::{Deserialize, Serialize};

use crate::dom::{self, ElementId};
use crate::subscription::{DomEvent, ListenerSpec, Route};

/// Filter key matching every category.
pub const ALL: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLink {
    pub id: ElementId,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCard {
    pub id: ElementId,
    pub category: String,
    pub link: Option<CardLink>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterControl {
    pub id: ElementId,
    /// Value of its `data-filter` attribute.
    pub key: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardPresence {
    /// Animating in after `delay_ms`.
    Shown { delay_ms: u64 },
    /// Fading out, still in layout.
    Leaving,
    /// `display: none`.
    Removed,
}

impl CardPresence {
    pub fn is_visible(self) -> bool {
        matches!(self, CardPresence::Shown { .. })
    }
}

#[must_use]
pub fn matches(filter: &str, category: &str) -> bool {
    filter == ALL || filter == category
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    pub visible: usize,
    /// Some card started fading out and needs a removal pass.
    pub leaving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    active: String,
    presence: Vec<(ElementId, CardPresence)>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active: ALL.to_string(),
            presence: Vec::new(),
        }
    }
}

impl FilterState {
    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn presence(&self, card: &ElementId) -> Option<CardPresence> {
        self.presence
            .iter()
            .find(|(id, _)| id == card)
            .map(|(_, presence)| *presence)
    }

    pub fn cards(&self) -> impl Iterator<Item = &(ElementId, CardPresence)> {
        self.presence.iter()
    }

    /// Shows the cards matching `key` with a stagger by their position in the
    /// full list, and starts fading out the rest.
    pub fn apply(&mut self, key: &str, cards: &[ProjectCard], stagger_ms: u64) -> FilterOutcome {
        self.active = key.to_string();
        let mut outcome = FilterOutcome {
            visible: 0,
            leaving: false,
        };
        let previous = std::mem::take(&mut self.presence);
        for (index, card) in (0u64..).zip(cards) {
            let presence = if matches(key, &card.category) {
                outcome.visible += 1;
                CardPresence::Shown {
                    delay_ms: index * stagger_ms,
                }
            } else {
                let was_removed = previous
                    .iter()
                    .any(|(id, p)| *id == card.id && *p == CardPresence::Removed);
                if was_removed {
                    CardPresence::Removed
                } else {
                    outcome.leaving = true;
                    CardPresence::Leaving
                }
            };
            self.presence.push((card.id.clone(), presence));
        }
        outcome
    }

    /// Takes fading cards out of layout. Returns how many were removed.
    pub fn settle(&mut self) -> usize {
        let mut removed = 0;
        for (_, presence) in &mut self.presence {
            if *presence == CardPresence::Leaving {
                *presence = CardPresence::Removed;
                removed += 1;
            }
        }
        removed
    }
}

pub fn announcement(key: &str, visible: usize) -> String {
    let noun = if visible == 1 { "project" } else { "projects" };
    let scope = if key == ALL { "all categories" } else { key };
    format!("Showing {visible} {noun} for {scope}")
}

/// Roving focus across the filter controls. Returns the index to focus when
/// `key` moves it.
pub fn roving_focus(index: usize, len: usize, key: &str) -> Option<usize> {
    if len == 0 || index >= len {
        return None;
    }
    let target = match key {
        "ArrowLeft" => index.checked_sub(1).unwrap_or(len - 1),
        "ArrowRight" => (index + 1) % len,
        "Home" => 0,
        "End" => len - 1,
        _ => return None,
    };
    (target != index).then_some(target)
}

pub fn listeners() -> Vec<ListenerSpec> {
    vec![ListenerSpec::on_selector(
        dom::FILTER_BUTTON_SELECTOR,
        DomEvent::Click,
        Route::FilterSelect,
    )]
}
