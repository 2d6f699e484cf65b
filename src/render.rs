use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::{
    verification::{StatusClass, VerificationResult},
    view::{Phase, VerificationView},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardDetail {
    Description(&'static str),
    DaysRemaining(u64),
    CertificateMissing,
}

/// One labelled check on the results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    title: &'static str,
    status: String,
    class: StatusClass,
    detail: CardDetail,
}

impl ResultCard {
    fn new(title: &'static str, status: &str, detail: CardDetail) -> Self {
        Self {
            title,
            status: status.to_string(),
            class: StatusClass::classify(status),
            detail,
        }
    }
    pub fn title(&self) -> &str {
        self.title
    }
    pub fn status(&self) -> &str {
        self.status.as_str()
    }
    pub fn class(&self) -> StatusClass {
        self.class
    }
    pub fn detail(&self) -> &CardDetail {
        &self.detail
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoisRow {
    label: String,
    value: String,
}

impl WhoisRow {
    pub fn label(&self) -> &str {
        self.label.as_str()
    }
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

/// `creation_date` -> `CREATION DATE`
pub fn whois_label(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

#[derive(Debug, Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    cards: Vec<ResultCard>,
    whois: Option<Vec<WhoisRow>>,
}

#[cfg(test)]
impl ResultsTemplate {
    pub fn cards(&self) -> &[ResultCard] {
        &self.cards
    }
    pub fn whois(&self) -> Option<&[WhoisRow]> {
        self.whois.as_deref()
    }
}

impl From<&VerificationResult> for ResultsTemplate {
    fn from(result: &VerificationResult) -> Self {
        let ssl_detail = match result.ssl_days_remaining() {
            Some(days) => CardDetail::DaysRemaining(days),
            None => CardDetail::CertificateMissing,
        };
        let mut cards = vec![
            ResultCard::new(
                "Google Safe Browsing",
                result.google_safe_browsing(),
                CardDetail::Description("Checks URL against Google's blacklist."),
            ),
            ResultCard::new(
                "VirusTotal Analysis",
                result.virustotal(),
                CardDetail::Description("Aggregated antivirus engine results."),
            ),
            ResultCard::new("SSL Security", result.ssl(), ssl_detail),
            ResultCard::new(
                "Domain Extension",
                result.tld(),
                CardDetail::Description("Top-Level Domain validity check."),
            ),
        ];
        if let Some(phishtank) = result.phishtank() {
            cards.push(ResultCard::new(
                "PhishTank",
                phishtank,
                CardDetail::Description("Community-reported phishing database."),
            ));
        }

        let whois = result.whois_entries().map(|entries| {
            entries
                .into_iter()
                .map(|(key, value)| WhoisRow {
                    label: whois_label(key),
                    value,
                })
                .collect()
        });

        Self { cards, whois }
    }
}

#[derive(Debug, Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    url: String,
    busy: bool,
    error: Option<String>,
    results: Option<ResultsTemplate>,
}

impl From<&VerificationView> for IndexTemplate {
    fn from(view: &VerificationView) -> Self {
        Self {
            url: view.url().to_string(),
            busy: view.phase() == Phase::Submitting,
            error: view.error().map(str::to_string),
            results: view.result().map(ResultsTemplate::from),
        }
    }
}

impl IntoResponse for IndexTemplate {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                error!("Unable to render page: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Unable to render page").into_response()
            }
        }
    }
}
