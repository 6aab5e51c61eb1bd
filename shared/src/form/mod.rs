//! Contact form: field rules, submit gate and submission feedback.

mod submission;
mod validation;

pub use submission::{
    build_request, interpret, interpret_reply, mailto_link, Banner, BannerKind, ContactRequest,
    SubmissionError, SubmissionOutcome, SubmitButton, FAILURE_MESSAGE, INVALID_FORM_ANNOUNCEMENT,
    REQUESTED_WITH, SUCCESS_MESSAGE,
};
pub use validation::{char_len, is_valid_email, validate_field, ValidationError};

use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::dom::{self, ElementId};
use crate::subscription::{DomEvent, ListenerSpec, ListenerTarget, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Email,
    Textarea,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// Human label for a field name, used in "is required" messages.
pub fn field_label(name: &str) -> &str {
    match name {
        "name" => "Full Name",
        "email" => "Email Address",
        "subject" => "Subject",
        "message" => "Message",
        other => other,
    }
}

impl FieldSpec {
    /// A required field with the site's label and input type for `name`.
    pub fn standard(name: &str) -> Self {
        let kind = match name {
            "email" => FieldKind::Email,
            "message" => FieldKind::Textarea,
            _ => FieldKind::Text,
        };
        Self {
            name: name.to_string(),
            label: field_label(name).to_string(),
            kind,
            required: true,
        }
    }

    /// Inputs carry their field name as id.
    pub fn element_id(&self) -> ElementId {
        ElementId::new(self.name.as_str())
    }
}

pub fn default_fields() -> Vec<FieldSpec> {
    ["name", "email", "subject", "message"]
        .into_iter()
        .map(FieldSpec::standard)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: String,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    pub spec: FieldSpec,
    pub value: String,
    pub error: Option<ValidationError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub chars: usize,
    pub max: usize,
    pub warning: bool,
}

impl Counter {
    pub fn text(&self) -> String {
        format!("{}/{} characters", self.chars, self.max)
    }
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    fields: Vec<FieldState>,
    button: SubmitButton,
    banner: Option<Banner>,
    message_max: usize,
    warning_ratio: f64,
}

impl ContactForm {
    pub fn new(specs: Vec<FieldSpec>, config: &SiteConfig) -> Self {
        Self {
            fields: specs
                .into_iter()
                .map(|spec| FieldState {
                    spec,
                    value: String::new(),
                    error: None,
                })
                .collect(),
            button: SubmitButton::Default,
            banner: None,
            message_max: config.message_max_chars,
            warning_ratio: config.counter_warning_ratio,
        }
    }

    pub fn fields(&self) -> &[FieldState] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FieldState> {
        self.fields.iter_mut().find(|f| f.spec.name == name)
    }

    pub fn button(&self) -> SubmitButton {
        self.button
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Keystroke: record the value and drop any error without re-validating.
    /// Returns false for an unknown field.
    pub fn input(&mut self, name: &str, value: &str) -> bool {
        let Some(field) = self.field_mut(name) else {
            return false;
        };
        field.value = value.to_string();
        field.error = None;
        true
    }

    /// Focus left the field: validate it. Returns `None` for an unknown field.
    pub fn blur(&mut self, name: &str, value: &str) -> Option<bool> {
        let max = self.message_max;
        let field = self.field_mut(name)?;
        field.value = value.to_string();
        field.error = validate_field(&field.spec, &field.value, max).err();
        Some(field.error.is_none())
    }

    /// Whole-form gate over the submitted values. Validates every required
    /// field and returns the first invalid one in document order.
    pub fn validate_all(&mut self, values: &[FieldValue]) -> Result<(), ElementId> {
        let max = self.message_max;
        let mut first_invalid = None;
        for field in &mut self.fields {
            if let Some(submitted) = values.iter().find(|v| v.name == field.spec.name) {
                field.value.clone_from(&submitted.value);
            }
            if !field.spec.required {
                continue;
            }
            field.error = validate_field(&field.spec, &field.value, max).err();
            if field.error.is_some() && first_invalid.is_none() {
                first_invalid = Some(field.spec.element_id());
            }
        }
        first_invalid.map_or(Ok(()), Err)
    }

    pub fn values(&self) -> Vec<FieldValue> {
        self.fields
            .iter()
            .map(|f| FieldValue::new(f.spec.name.as_str(), f.value.as_str()))
            .collect()
    }

    pub fn value(&self, name: &str) -> &str {
        self.field(name).map_or("", |f| f.value.as_str())
    }

    pub fn is_busy(&self) -> bool {
        self.button.disabled()
    }

    pub fn begin_submission(&mut self) {
        self.button = SubmitButton::Loading;
    }

    /// Applies the outcome of the network call. Success clears the form.
    pub fn finish_submission(&mut self, succeeded: bool) {
        if succeeded {
            self.button = SubmitButton::Success;
            self.banner = Some(Banner::success());
            self.clear();
        } else {
            self.button = SubmitButton::Error;
            self.banner = Some(Banner::failure());
        }
    }

    pub fn reset_button(&mut self) {
        self.button = SubmitButton::Default;
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
            field.error = None;
        }
    }

    /// Live counter for the message field. Counts the raw value.
    #[allow(clippy::cast_precision_loss)]
    pub fn counter(&self) -> Option<Counter> {
        let message = self.field("message")?;
        let chars = char_len(&message.value);
        Some(Counter {
            chars,
            max: self.message_max,
            warning: chars as f64 > self.message_max as f64 * self.warning_ratio,
        })
    }
}

pub fn listeners() -> Vec<ListenerSpec> {
    vec![
        ListenerSpec::new(
            ListenerTarget::Element(ElementId::new(dom::CONTACT_FORM)),
            DomEvent::Submit,
            Route::FormSubmit,
        ),
        ListenerSpec::on_selector(dom::FORM_FIELD_SELECTOR, DomEvent::Input, Route::FieldInput),
        ListenerSpec::on_selector(dom::FORM_FIELD_SELECTOR, DomEvent::Blur, Route::FieldBlur),
    ]
}
