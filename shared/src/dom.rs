//! Identifiers the core exchanges with the shell, and the document contract
//! the shell resolves them against.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(ElementId);

// --- Document contract ---

pub const THEME_TOGGLE_FIXED: &str = "theme-toggle-fixed";
pub const THEME_TOGGLE_NAV: &str = "theme-toggle-nav";
pub const THEME_TOGGLE_MOBILE: &str = "theme-toggle-mobile";
pub const CONTACT_FORM: &str = "contact-form";

pub const MOBILE_MENU_TOGGLE_SELECTOR: &str = ".mobile-menu-toggle";
pub const IN_PAGE_ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
pub const SKIP_LINK_SELECTOR: &str = ".skip-link";
pub const FILTER_BUTTON_SELECTOR: &str = ".filter-btn";
pub const FORM_FIELD_SELECTOR: &str = "#contact-form input, #contact-form textarea";

pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// Error-message container for a named form field.
#[must_use]
pub fn field_error_id(field_name: &str) -> ElementId {
    ElementId(format!("{field_name}-error"))
}

/// Fragment identifier of an in-page link, if it names one.
#[must_use]
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}
