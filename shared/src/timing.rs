//! Rate limiting and scheduled tasks.
//!
//! Timers live in the shell; the core only hands out [`TimerId`]s and
//! remembers which task each pending id belongs to. A task kind has at most one
//! pending timer: scheduling it again supersedes the earlier handle, and a
//! fired id that is no longer pending is ignored.

use serde::{Deserialize, Serialize};

use crate::capabilities::TimerId;
use crate::config::SiteConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    FocusFirstMenuItem,
    /// Trailing edge of the resize debounce.
    ApplyResize,
    RemoveHiddenCards,
    ResetSubmitButton,
    DismissBanner,
    ClearAnnouncement,
}

impl Task {
    #[must_use]
    pub fn delay_ms(self, config: &SiteConfig) -> u64 {
        match self {
            Task::FocusFirstMenuItem => config.menu_focus_delay_ms,
            Task::ApplyResize => config.resize_debounce_ms,
            Task::RemoveHiddenCards => config.card_removal_delay_ms,
            Task::ResetSubmitButton => config.button_reset_ms,
            Task::DismissBanner => config.banner_dismiss_ms,
            Task::ClearAnnouncement => config.announcement_clear_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub id: TimerId,
    pub superseded: Option<TimerId>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    pending: Vec<(Task, TimerId)>,
}

impl Scheduler {
    pub fn schedule(&mut self, task: Task) -> Scheduled {
        let superseded = self.cancel(task);
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push((task, id));
        Scheduled { id, superseded }
    }

    pub fn cancel(&mut self, task: Task) -> Option<TimerId> {
        let index = self.pending.iter().position(|(t, _)| *t == task)?;
        Some(self.pending.remove(index).1)
    }

    /// Resolves a fired timer to its task, consuming the handle.
    pub fn fire(&mut self, id: TimerId) -> Option<Task> {
        let index = self.pending.iter().position(|(_, i)| *i == id)?;
        Some(self.pending.remove(index).0)
    }

    pub fn drain(&mut self) -> Vec<TimerId> {
        self.pending.drain(..).map(|(_, id)| id).collect()
    }
}

/// Leading-edge throttle: the first call in a window runs, the rest are dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    window_ms: u64,
    last_admitted: Option<u64>,
}

impl Throttle {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_admitted: None,
        }
    }

    pub fn admit(&mut self, now_ms: u64) -> bool {
        match self.last_admitted {
            Some(last) if now_ms.saturating_sub(last) < self.window_ms => false,
            _ => {
                self.last_admitted = Some(now_ms);
                true
            }
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(crate::config::SCROLL_THROTTLE_MS)
    }
}
