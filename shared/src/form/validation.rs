use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::{FieldKind, FieldSpec};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // local@domain.tld, no whitespace and a single '@' per part.
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid e-mail regex")
});

/// A failed field rule. `Display` is the message shown under the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{label} is required.")]
    Required { label: String },

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("{subject} must be at least {min} characters long.")]
    TooShort { subject: &'static str, min: usize },

    #[error("{subject} must not exceed {max} characters.")]
    TooLong { subject: &'static str, max: usize },
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Length bounds keyed by field name. A bounded rule takes its maximum from
/// configuration.
struct LengthRule {
    name: &'static str,
    subject: &'static str,
    min: usize,
    bounded: bool,
}

const LENGTH_RULES: [LengthRule; 3] = [
    LengthRule { name: "name", subject: "Name", min: 2, bounded: false },
    LengthRule { name: "subject", subject: "Subject", min: 5, bounded: false },
    LengthRule { name: "message", subject: "Message", min: 10, bounded: true },
];

/// Length in characters, as the user perceives it.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Runs the rule table in precedence order; the first failing rule wins.
/// The value is trimmed first, and only the required rule looks at empty
/// values.
pub fn validate_field(spec: &FieldSpec, raw: &str, message_max: usize) -> Result<(), ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return if spec.required {
            Err(ValidationError::Required {
                label: spec.label.clone(),
            })
        } else {
            Ok(())
        };
    }

    if spec.kind == FieldKind::Email && !is_valid_email(value) {
        return Err(ValidationError::InvalidEmail);
    }

    let len = char_len(value);
    if let Some(rule) = LENGTH_RULES.iter().find(|rule| rule.name == spec.name) {
        if len < rule.min {
            return Err(ValidationError::TooShort {
                subject: rule.subject,
                min: rule.min,
            });
        }
        if rule.bounded && len > message_max {
            return Err(ValidationError::TooLong {
                subject: rule.subject,
                max: message_max,
            });
        }
    }
    Ok(())
}
