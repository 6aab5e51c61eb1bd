use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const MAX_URL_LENGTH: usize = 2048;
pub const MAX_FORM_FIELDS: usize = 32;

/// Request target: an absolute `http(s)` URL or a same-origin absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Result<Self, HttpError> {
        let url = url.into();
        Self::validate(&url)?;
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute URL for the request, joining a same-origin path onto the
    /// page it was submitted from.
    pub fn resolve(&self, page_url: Option<&str>) -> Result<Url, HttpError> {
        if !self.is_same_origin_path() {
            return Url::parse(&self.0).map_err(|e| HttpError::InvalidUrl {
                url: Self::truncate_url(&self.0),
                reason: e.to_string(),
            });
        }
        let base = page_url.ok_or_else(|| HttpError::InvalidUrl {
            url: Self::truncate_url(&self.0),
            reason: "relative endpoint without a page URL".to_string(),
        })?;
        let base = Url::parse(base).map_err(|e| HttpError::InvalidUrl {
            url: Self::truncate_url(base),
            reason: e.to_string(),
        })?;
        Self::check_parsed(&base, base.as_str())?;
        base.join(&self.0).map_err(|e| HttpError::InvalidUrl {
            url: Self::truncate_url(&self.0),
            reason: e.to_string(),
        })
    }

    fn is_same_origin_path(&self) -> bool {
        self.0.starts_with('/') && !self.0.starts_with("//")
    }

    fn validate(url: &str) -> Result<(), HttpError> {
        if url.trim().is_empty() {
            return Err(HttpError::InvalidUrl {
                url: String::new(),
                reason: "URL cannot be empty".to_string(),
            });
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: format!("URL exceeds maximum length of {MAX_URL_LENGTH} bytes"),
            });
        }

        if url.starts_with('/') && !url.starts_with("//") {
            return Ok(());
        }

        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl {
            url: Self::truncate_url(url),
            reason: e.to_string(),
        })?;
        Self::check_parsed(&parsed, url)
    }

    fn check_parsed(parsed: &Url, raw: &str) -> Result<(), HttpError> {
        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(raw),
                reason: format!("invalid scheme '{scheme}', only 'http' and 'https' are allowed"),
            });
        }

        if parsed.host_str().is_none() {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(raw),
                reason: "URL must have a host".to_string(),
            });
        }

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(raw),
                reason: "credentials in URL are not allowed".to_string(),
            });
        }

        Ok(())
    }

    fn truncate_url(url: &str) -> String {
        if url.len() > 100 {
            format!("{}...", url.chars().take(100).collect::<String>())
        } else {
            url.to_string()
        }
    }
}

/// Ordered name/value pairs, URL-encoded by crux_http's `body_form`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormBody {
    fields: Vec<(String, String)>,
}

impl FormBody {
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<(), HttpError> {
        if self.fields.len() >= MAX_FORM_FIELDS {
            return Err(HttpError::TooManyFields {
                count: self.fields.len() + 1,
                max: MAX_FORM_FIELDS,
            });
        }
        self.fields.push((name.into(), value.into()));
        Ok(())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("too many form fields: {count} exceeds maximum of {max}")]
    TooManyFields { count: usize, max: usize },
}
