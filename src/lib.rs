//! Server-rendered front-end for the PhishGuard URL verification service.
//!
//! A user submits a URL through the form served at `/`; the URL is posted to the verification
//! backend and the returned verdict is rendered as a set of status cards plus WHOIS data.

pub mod api;
pub mod form_verification;
pub mod preferences;
pub mod render;
pub mod routes;
pub mod verification;
pub mod view;
