//! Site configuration.
//!
//! Every value has a default matching the published site; the shell may hand
//! over a JSON document at startup to override any subset of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONTACT_ENDPOINT: &str = "/api/contact";
pub const DEFAULT_FALLBACK_EMAIL: &str = "thoratomkar018@gmail.com";
pub const DEFAULT_FALLBACK_SUBJECT: &str = "Contact from Portfolio";
pub const DEFAULT_SERVICE_WORKER: &str = "/sw.js";

pub const DESKTOP_BREAKPOINT_PX: f64 = 768.0;
pub const HEADER_COLLAPSE_PX: f64 = 50.0;
pub const SECTION_PROBE_OFFSET_PX: f64 = 100.0;
pub const SCROLL_TARGET_OFFSET_PX: f64 = 20.0;

pub const SCROLL_THROTTLE_MS: u64 = 16;
pub const RESIZE_DEBOUNCE_MS: u64 = 250;
pub const MENU_FOCUS_DELAY_MS: u64 = 100;
pub const CARD_STAGGER_MS: u64 = 100;
pub const CARD_REMOVAL_DELAY_MS: u64 = 300;
pub const BUTTON_RESET_MS: u64 = 3_000;
pub const BANNER_DISMISS_MS: u64 = 5_000;
pub const ANNOUNCEMENT_CLEAR_MS: u64 = 1_000;
pub const LONG_TASK_THRESHOLD_MS: f64 = 50.0;

pub const MESSAGE_MAX_CHARS: usize = 500;
pub const COUNTER_WARNING_RATIO: f64 = 0.9;
pub const DEFAULT_PARALLAX_SPEED: f64 = 0.5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid site configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid site configuration: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Alt+<digit> shortcut to an in-page section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionShortcut {
    pub key: char,
    pub section: String,
}

impl SectionShortcut {
    fn new(key: char, section: &str) -> Self {
        Self {
            key,
            section: section.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub contact_endpoint: String,
    pub fallback_email: String,
    pub fallback_subject: String,
    pub service_worker_url: String,

    pub desktop_breakpoint_px: f64,
    pub header_collapse_px: f64,
    pub section_probe_offset_px: f64,
    pub scroll_target_offset_px: f64,

    pub scroll_throttle_ms: u64,
    pub resize_debounce_ms: u64,
    pub menu_focus_delay_ms: u64,
    pub card_stagger_ms: u64,
    pub card_removal_delay_ms: u64,
    pub button_reset_ms: u64,
    pub banner_dismiss_ms: u64,
    pub announcement_clear_ms: u64,
    pub long_task_threshold_ms: f64,

    pub message_max_chars: usize,
    pub counter_warning_ratio: f64,

    pub section_shortcuts: Vec<SectionShortcut>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            contact_endpoint: DEFAULT_CONTACT_ENDPOINT.to_string(),
            fallback_email: DEFAULT_FALLBACK_EMAIL.to_string(),
            fallback_subject: DEFAULT_FALLBACK_SUBJECT.to_string(),
            service_worker_url: DEFAULT_SERVICE_WORKER.to_string(),
            desktop_breakpoint_px: DESKTOP_BREAKPOINT_PX,
            header_collapse_px: HEADER_COLLAPSE_PX,
            section_probe_offset_px: SECTION_PROBE_OFFSET_PX,
            scroll_target_offset_px: SCROLL_TARGET_OFFSET_PX,
            scroll_throttle_ms: SCROLL_THROTTLE_MS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            menu_focus_delay_ms: MENU_FOCUS_DELAY_MS,
            card_stagger_ms: CARD_STAGGER_MS,
            card_removal_delay_ms: CARD_REMOVAL_DELAY_MS,
            button_reset_ms: BUTTON_RESET_MS,
            banner_dismiss_ms: BANNER_DISMISS_MS,
            announcement_clear_ms: ANNOUNCEMENT_CLEAR_MS,
            long_task_threshold_ms: LONG_TASK_THRESHOLD_MS,
            message_max_chars: MESSAGE_MAX_CHARS,
            counter_warning_ratio: COUNTER_WARNING_RATIO,
            section_shortcuts: vec![
                SectionShortcut::new('1', "home"),
                SectionShortcut::new('2', "projects"),
                SectionShortcut::new('3', "about"),
                SectionShortcut::new('4', "contact"),
            ],
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if crate::capabilities::Endpoint::new(self.contact_endpoint.as_str()).is_err() {
            return Err(ConfigError::Invalid {
                field: "contact_endpoint",
                reason: format!("'{}' is not a usable endpoint", self.contact_endpoint),
            });
        }
        if !self.fallback_email.contains('@') {
            return Err(ConfigError::Invalid {
                field: "fallback_email",
                reason: "must be an e-mail address".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.counter_warning_ratio) {
            return Err(ConfigError::Invalid {
                field: "counter_warning_ratio",
                reason: format!("{} is outside 0..=1", self.counter_warning_ratio),
            });
        }
        if self.message_max_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "message_max_chars",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn shortcut_section(&self, key: &str) -> Option<&str> {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        self.section_shortcuts
            .iter()
            .find(|s| s.key == c)
            .map(|s| s.section.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SiteConfig::from_json(r#"{"contact_endpoint": "https://forms.example.com/send"}"#)
            .unwrap();
        assert_eq!(config.contact_endpoint, "https://forms.example.com/send");
        assert_eq!(config.button_reset_ms, BUTTON_RESET_MS);
        assert_eq!(config.message_max_chars, 500);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            SiteConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            SiteConfig::from_json(r#"{"contact_endpoint": "mailto:me@example.com"}"#),
            Err(ConfigError::Invalid { field: "contact_endpoint", .. })
        ));
        assert!(matches!(
            SiteConfig::from_json(r#"{"counter_warning_ratio": 1.5}"#),
            Err(ConfigError::Invalid { field: "counter_warning_ratio", .. })
        ));
    }

    #[test]
    fn default_shortcuts_cover_four_sections() {
        let config = SiteConfig::default();
        assert_eq!(config.shortcut_section("1"), Some("home"));
        assert_eq!(config.shortcut_section("4"), Some("contact"));
        assert_eq!(config.shortcut_section("5"), None);
        assert_eq!(config.shortcut_section("12"), None);
    }
}
