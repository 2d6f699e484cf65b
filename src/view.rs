use tracing::{info, warn};

use crate::{
    api::{ApiError, VerificationApi},
    form_verification::validate_url_input,
    verification::VerificationResult,
};

pub const GENERIC_ERROR_MESSAGE: &str =
    "An error occurred while verifying the URL. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Transient state behind the verification page: the typed URL, the busy flag and a single
/// result/error slot that each submission overwrites wholesale.
#[derive(Debug, Default)]
pub struct VerificationView {
    url: String,
    busy: bool,
    error: Option<String>,
    result: Option<VerificationResult>,
}

impl VerificationView {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
    #[cfg(test)]
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }
    pub fn busy(&self) -> bool {
        self.busy
    }
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
    pub fn result(&self) -> Option<&VerificationResult> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Submitting
        } else if self.result.is_some() {
            Phase::Succeeded
        } else if self.error.is_some() {
            Phase::Failed
        } else {
            Phase::Idle
        }
    }

    /// Starts a submission. Returns the URL to send, or `None` when nothing should be sent: either a
    /// request is already in flight or the input failed validation (the message is stored in the
    /// error slot).
    pub fn begin_submission(&mut self) -> Option<String> {
        if self.busy {
            return None;
        }
        match validate_url_input(&self.url) {
            Ok(url) => {
                self.error = None;
                self.result = None;
                self.busy = true;
                Some(url)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }

    /// Settles the in-flight submission with the backend's answer
    pub fn complete(&mut self, outcome: Result<VerificationResult, ApiError>) {
        match outcome {
            Ok(result) => self.result = Some(result),
            Err(err) => {
                warn!("Verification failed: {err}");
                self.error = Some(String::from(GENERIC_ERROR_MESSAGE));
            }
        }
        self.busy = false;
    }

    pub async fn submit<A: VerificationApi>(&mut self, api: &A) {
        let Some(url) = self.begin_submission() else {
            return;
        };
        info!("Verifying {url}");
        let outcome = api.verify_url(&url).await;
        self.complete(outcome);
    }
}
