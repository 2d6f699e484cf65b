use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a URL.")]
    EmptyUrl,
}

/// Body of the verification form, also accepted as a query string. A repeated `url` key keeps
/// the last value.
#[derive(Debug, Default, Deserialize)]
pub struct UrlForm {
    #[serde(default)]
    url: Vec<String>,
}

impl UrlForm {
    /// Whether the body carried a `url` key at all, even an empty one
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
    pub fn url(&self) -> &str {
        self.url.last().map(String::as_str).unwrap_or_default()
    }
    pub fn into_url(mut self) -> String {
        self.url.pop().unwrap_or_default()
    }

    /// Parses an urlencoded form body. Anything unparseable is treated as a body without a `url`.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        serde_html_form::from_bytes(body).unwrap_or_else(|err| {
            warn!("Unable to parse form body: {err}");
            Self::default()
        })
    }
}

/// Checks the submitted URL and returns it trimmed, ready to send to the backend
pub fn validate_url_input(input: &str) -> Result<String, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormError::EmptyUrl);
    }
    Ok(trimmed.to_string())
}
