use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Verdict returned by the verification backend for a single URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    google_safe_browsing: String,
    virustotal: String,
    ssl: String,
    #[serde(default)]
    ssl_days_remaining: Option<i64>,
    tld: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phishtank: Option<String>,
    // Map keeps backend order because serde_json is built with preserve_order
    #[serde(default)]
    whois: Option<Map<String, Value>>,
}

impl VerificationResult {
    pub fn google_safe_browsing(&self) -> &str {
        self.google_safe_browsing.as_str()
    }
    pub fn virustotal(&self) -> &str {
        self.virustotal.as_str()
    }
    pub fn ssl(&self) -> &str {
        self.ssl.as_str()
    }
    pub fn tld(&self) -> &str {
        self.tld.as_str()
    }
    pub fn phishtank(&self) -> Option<&str> {
        self.phishtank.as_deref()
    }

    /// Days until the certificate expires. The backend reports `0` for an invalid certificate, so
    /// anything that is not strictly positive is treated the same as a missing value.
    pub fn ssl_days_remaining(&self) -> Option<u64> {
        self.ssl_days_remaining
            .filter(|days| *days > 0)
            .map(|days| days as u64)
    }

    /// WHOIS fields in the order the backend sent them, with values flattened to display strings
    pub fn whois_entries(&self) -> Option<Vec<(&str, String)>> {
        let whois = self.whois.as_ref()?;
        if whois.is_empty() {
            return None;
        }
        Some(
            whois
                .iter()
                .map(|(key, value)| (key.as_str(), display_value(value)))
                .collect(),
        )
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::from("N/A"),
        other => other.to_string(),
    }
}

/// Response of the backend liveness probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    status: String,
}

impl HealthStatus {
    pub fn status(&self) -> &str {
        self.status.as_str()
    }
}

/// The three visual buckets every check status falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Safe,
    Warning,
    Danger,
}

impl StatusClass {
    pub fn classify(status: &str) -> Self {
        match status {
            "Safe" | "Valid" => Self::Safe,
            "Warning" => Self::Warning,
            _ => Self::Danger,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Safe => "status-safe",
            Self::Warning => "status-warning",
            Self::Danger => "status-danger",
        }
    }
}
