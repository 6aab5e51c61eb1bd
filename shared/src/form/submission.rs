use crux_http::{Http, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::{form_urlencoded, Url};

use super::FieldValue;
use crate::capabilities::{Endpoint, FormBody, HttpError};

pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent successfully.";
pub const FAILURE_MESSAGE: &str = "Sorry, there was an error sending your message. Please try again.";
pub const INVALID_FORM_ANNOUNCEMENT: &str = "Please fix the errors in the form before submitting.";

/// Marks the POST as scripted so the endpoint answers with JSON.
pub const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SubmissionError {
    #[error("could not build contact request: {0}")]
    Request(#[source] HttpError),

    #[error("could not encode contact form: {0}")]
    Encode(String),

    #[error("contact request failed: {0}")]
    Transport(String),

    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("contact endpoint returned an unreadable body: {0}")]
    Body(String),
}

/// Parsed JSON reply of a delivered message.
pub type SubmissionOutcome = Result<serde_json::Value, SubmissionError>;

/// The complete field set, addressed to an absolute endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRequest {
    pub url: Url,
    pub body: FormBody,
}

impl ContactRequest {
    /// POSTs the form through crux_http, reporting the interpreted reply.
    pub fn send<Ev, F>(&self, http: &Http<Ev>, make_event: F) -> Result<(), SubmissionError>
    where
        Ev: 'static,
        F: FnOnce(SubmissionOutcome) -> Ev + Send + Sync + 'static,
    {
        let (name, value) = REQUESTED_WITH;
        http.post(self.url.as_str())
            .header(name, value)
            .body_form(&self.body)
            .map_err(|e| SubmissionError::Encode(e.to_string()))?
            .send(move |result| make_event(interpret(result)));
        Ok(())
    }
}

pub fn build_request(
    endpoint: &str,
    page_url: Option<&str>,
    values: &[FieldValue],
) -> Result<ContactRequest, SubmissionError> {
    let url = Endpoint::new(endpoint)
        .and_then(|e| e.resolve(page_url))
        .map_err(SubmissionError::Request)?;
    let mut body = FormBody::default();
    for field in values {
        body.append(field.name.as_str(), field.value.as_str())
            .map_err(SubmissionError::Request)?;
    }
    Ok(ContactRequest { url, body })
}

pub fn interpret(result: crux_http::Result<Response<Vec<u8>>>) -> SubmissionOutcome {
    let response = result.map_err(|e| SubmissionError::Transport(e.to_string()))?;
    interpret_reply(response.status().into(), response.body().map(Vec::as_slice))
}

/// Success means a 2xx status carrying a JSON body.
pub fn interpret_reply(status: u16, body: Option<&[u8]>) -> SubmissionOutcome {
    if !(200..300).contains(&status) {
        return Err(SubmissionError::Status { status });
    }
    serde_json::from_slice(body.unwrap_or_default())
        .map_err(|e| SubmissionError::Body(format!("failed to parse JSON: {e}")))
}

fn encode_component(value: &str) -> String {
    // form_urlencoded writes spaces as '+'; a literal '+' is already %2B.
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Fallback delivery path when the endpoint cannot take the message.
pub fn mailto_link(email: &str, subject: &str, default_subject: &str, body: &str) -> String {
    let subject = if subject.trim().is_empty() {
        default_subject
    } else {
        subject
    };
    format!(
        "mailto:{email}?subject={}&body={}",
        encode_component(subject),
        encode_component(body)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubmitButton {
    #[default]
    Default,
    Loading,
    Success,
    Error,
}

impl SubmitButton {
    pub const fn text(self) -> &'static str {
        match self {
            SubmitButton::Default => "Send Message",
            SubmitButton::Loading => "Sending...",
            SubmitButton::Success => "Message Sent!",
            SubmitButton::Error => "Try Again",
        }
    }

    pub const fn disabled(self) -> bool {
        matches!(self, SubmitButton::Loading | SubmitButton::Success)
    }

    /// State class on the button, if any.
    pub const fn class(self) -> Option<&'static str> {
        match self {
            SubmitButton::Default => None,
            SubmitButton::Loading => Some("btn-loading"),
            SubmitButton::Success => Some("btn-success"),
            SubmitButton::Error => Some("btn-error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success() -> Self {
        Self {
            kind: BannerKind::Success,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn failure() -> Self {
        Self {
            kind: BannerKind::Error,
            message: FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn class(&self) -> String {
        let kind = match self.kind {
            BannerKind::Success => "success",
            BannerKind::Error => "error",
        };
        format!("form-message form-message--{kind}")
    }
}
