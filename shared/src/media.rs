//! Scroll-reveal animations and deferred image loading.
//!
//! Both ride on `IntersectionObserver`. Without it everything is revealed at
//! once and images keep whatever `src` the markup gave them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::dom::ElementId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObserverGroup {
    Reveal,
    LazyImages,
}

impl ObserverGroup {
    #[must_use]
    pub const fn root_margin(self) -> &'static str {
        match self {
            ObserverGroup::Reveal => "0px 0px -50px 0px",
            ObserverGroup::LazyImages => "50px",
        }
    }

    #[must_use]
    pub const fn threshold(self) -> f64 {
        match self {
            ObserverGroup::Reveal => 0.1,
            ObserverGroup::LazyImages => 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyImage {
    pub id: ElementId,
    /// Real source held in `data-src` until the image nears the viewport.
    pub data_src: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedImage {
    pub id: ElementId,
    pub src: String,
}

#[derive(Debug, Default)]
pub struct MediaState {
    pending_reveal: BTreeSet<ElementId>,
    revealed: BTreeSet<ElementId>,
    pending_images: Vec<LazyImage>,
    loaded: Vec<LoadedImage>,
}

impl MediaState {
    /// Registers reveal targets. Returns the targets to observe, or `None`
    /// when they were revealed immediately.
    pub fn track_reveal(
        &mut self,
        targets: &[ElementId],
        observer_supported: bool,
    ) -> Option<Vec<ElementId>> {
        if observer_supported {
            self.pending_reveal.extend(targets.iter().cloned());
            Some(targets.to_vec())
        } else {
            self.revealed.extend(targets.iter().cloned());
            None
        }
    }

    /// Registers images for deferred loading. Returns the ids to observe.
    pub fn track_images(&mut self, images: &[LazyImage], observer_supported: bool) -> Vec<ElementId> {
        if !observer_supported {
            return Vec::new();
        }
        self.pending_images.extend(images.iter().cloned());
        images.iter().map(|image| image.id.clone()).collect()
    }

    /// Marks reveal targets as animated in. Each target is revealed once;
    /// the returned ids should stop being observed.
    pub fn reveal(&mut self, targets: &[ElementId]) -> Vec<ElementId> {
        let mut done = Vec::new();
        for target in targets {
            if self.pending_reveal.remove(target) {
                self.revealed.insert(target.clone());
                done.push(target.clone());
            }
        }
        done
    }

    /// Swaps `data-src` into `src` for intersecting images.
    pub fn load_images(&mut self, targets: &[ElementId]) -> Vec<ElementId> {
        let mut done = Vec::new();
        for target in targets {
            let Some(index) = self.pending_images.iter().position(|i| &i.id == target) else {
                continue;
            };
            let image = self.pending_images.remove(index);
            self.loaded.push(LoadedImage {
                id: image.id.clone(),
                src: image.data_src,
            });
            done.push(image.id);
        }
        done
    }

    pub fn is_revealed(&self, id: &ElementId) -> bool {
        self.revealed.contains(id)
    }

    pub fn loaded(&self) -> &[LoadedImage] {
        &self.loaded
    }

    pub fn pending_images(&self) -> impl Iterator<Item = &LazyImage> {
        self.pending_images.iter()
    }

    pub fn clear_pending(&mut self) {
        self.pending_reveal.clear();
        self.pending_images.clear();
    }
}
