//! Light/dark display mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::dom;
use crate::subscription::{DomEvent, ListenerSpec, ListenerTarget, Route};

/// The one `localStorage` key the site owns.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme '{0}'")]
pub struct ThemeParseError(pub String);

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    #[must_use]
    pub const fn from_preference(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Label and title of the toggle controls: they name the *other* mode.
    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark mode",
            Theme::Dark => "Switch to light mode",
        }
    }

    /// `<meta name="theme-color">` for mobile browser chrome.
    #[must_use]
    pub const fn meta_color(self) -> &'static str {
        match self {
            Theme::Light => "#ffffff",
            Theme::Dark => "#1f2937",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ThemeParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThemeState {
    mode: Theme,
    persisted: Option<Theme>,
    system_prefers_dark: bool,
}

impl ThemeState {
    pub fn from_system(prefers_dark: bool) -> Self {
        Self {
            mode: Theme::from_preference(prefers_dark),
            persisted: None,
            system_prefers_dark: prefers_dark,
        }
    }

    pub fn mode(&self) -> Theme {
        self.mode
    }

    pub fn persisted(&self) -> Option<Theme> {
        self.persisted
    }

    /// Applies the stored value read at startup. Unknown values count as unset.
    ///
    /// A toggle made before the read completed has already been written
    /// back, so the late value is dropped and `Ok(None)` returned.
    pub fn restore(&mut self, stored: Option<&str>) -> Result<Option<Theme>, ThemeParseError> {
        if self.persisted.is_some() {
            return Ok(None);
        }
        let parsed = stored.map(str::parse::<Theme>).transpose();
        let persisted = match &parsed {
            Ok(theme) => *theme,
            Err(_) => None,
        };
        self.persisted = persisted;
        self.mode = persisted.unwrap_or(Theme::from_preference(self.system_prefers_dark));
        parsed.map(|_| Some(self.mode))
    }

    /// Flips the mode and pins it as the user's explicit choice.
    pub fn toggle(&mut self) -> Theme {
        self.mode = self.mode.toggled();
        self.persisted = Some(self.mode);
        self.mode
    }

    /// Follows the OS preference unless the user has chosen explicitly.
    /// Returns the new mode when it changed.
    pub fn system_changed(&mut self, prefers_dark: bool) -> Option<Theme> {
        self.system_prefers_dark = prefers_dark;
        if self.persisted.is_some() {
            return None;
        }
        let next = Theme::from_preference(prefers_dark);
        if next == self.mode {
            return None;
        }
        self.mode = next;
        Some(next)
    }
}

pub fn listeners() -> Vec<ListenerSpec> {
    let mut specs: Vec<ListenerSpec> = [
        dom::THEME_TOGGLE_FIXED,
        dom::THEME_TOGGLE_NAV,
        dom::THEME_TOGGLE_MOBILE,
    ]
    .into_iter()
    .map(|id| ListenerSpec::on_element(id, DomEvent::Click, Route::ThemeToggle))
    .collect();
    specs.push(ListenerSpec::new(
        ListenerTarget::MediaQuery(dom::PREFERS_DARK_QUERY.to_string()),
        DomEvent::Change,
        Route::SystemTheme,
    ));
    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trip() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(Theme::Light.as_str(), "light");
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn labels_name_the_other_mode() {
        assert_eq!(Theme::Dark.toggle_label(), "Switch to light mode");
        assert_eq!(Theme::Light.toggle_label(), "Switch to dark mode");
        assert_eq!(Theme::Dark.meta_color(), "#1f2937");
    }

    #[test]
    fn stored_value_wins_over_system_preference() {
        let mut state = ThemeState::from_system(true);
        assert_eq!(state.restore(Some("light")), Ok(Some(Theme::Light)));
        assert_eq!(state.mode(), Theme::Light);
        assert_eq!(state.persisted(), Some(Theme::Light));
    }

    #[test]
    fn missing_or_invalid_value_defers_to_system() {
        let mut state = ThemeState::from_system(true);
        assert_eq!(state.restore(None), Ok(Some(Theme::Dark)));

        let mut state = ThemeState::from_system(false);
        assert!(state.restore(Some("sepia")).is_err());
        assert_eq!(state.mode(), Theme::Light);
        assert_eq!(state.persisted(), None);
    }

    #[test]
    fn late_restore_keeps_an_explicit_toggle() {
        let mut state = ThemeState::from_system(false);
        assert_eq!(state.toggle(), Theme::Dark);
        assert_eq!(state.restore(None), Ok(None));
        assert_eq!(state.restore(Some("light")), Ok(None));
        assert_eq!(state.mode(), Theme::Dark);
        assert_eq!(state.persisted(), Some(Theme::Dark));
    }

    #[test]
    fn toggling_twice_returns_to_start_and_stays_pinned() {
        let mut state = ThemeState::from_system(false);
        let start = state.mode();
        state.toggle();
        assert_eq!(state.toggle(), start);
        assert_eq!(state.persisted(), Some(start));
    }

    #[test]
    fn system_changes_only_apply_when_unpinned() {
        let mut state = ThemeState::from_system(false);
        assert_eq!(state.system_changed(true), Some(Theme::Dark));
        assert_eq!(state.system_changed(true), None);

        state.toggle();
        assert_eq!(state.system_changed(false), None);
        assert_eq!(state.mode(), Theme::Light);
    }

    #[test]
    fn every_toggle_control_is_wired() {
        let specs = listeners();
        assert_eq!(
            specs.iter().filter(|s| s.route == Route::ThemeToggle).count(),
            3
        );
        assert!(specs.iter().any(|s| s.route == Route::SystemTheme));
    }
}
