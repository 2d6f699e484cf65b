use std::future::Future;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::verification::{HealthStatus, VerificationResult};

pub const VERIFY_PATH: &str = "verify-url";
pub const HEALTH_PATH: &str = "health";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base address: {0}")]
    InvalidBase(String),
    #[error("request to verification backend failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("verification backend answered with status {0}")]
    Status(StatusCode),
    #[error("malformed response from verification backend: {0}")]
    Decode(#[from] serde_json::Error),
}

type Result<T> = std::result::Result<T, ApiError>;

/// The remote verification service as seen by the rest of the front-end
pub trait VerificationApi {
    fn verify_url(&self, url: &str) -> impl Future<Output = Result<VerificationResult>> + Send;
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus>> + Send;
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    url: &'a str,
}

/// HTTP client for the verification backend. No timeout or retry is configured; a request runs
/// until the transport or the backend gives up.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(api_base: &str) -> Result<Self> {
        let base = normalize_base(api_base)?;
        let http = Client::builder()
            .user_agent(concat!("phishguard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }
}

/// Validates an API base address and strips any trailing slash so endpoint paths can be appended
pub fn normalize_base(api_base: &str) -> Result<String> {
    let parsed = Url::parse(api_base.trim())
        .map_err(|err| ApiError::InvalidBase(format!("{api_base}: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
        return Err(ApiError::InvalidBase(format!(
            "{api_base}: expected an http(s) address"
        )));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

impl VerificationApi for ApiClient {
    #[instrument(skip(self), fields(base = %self.base))]
    async fn verify_url(&self, url: &str) -> Result<VerificationResult> {
        let response = self
            .http
            .post(self.endpoint(VERIFY_PATH))
            .json(&VerifyRequest { url })
            .send()
            .await?;
        debug!("Backend answered {}", response.status());
        read_json(response).await
    }

    #[instrument(skip(self), fields(base = %self.base))]
    async fn health_check(&self) -> Result<HealthStatus> {
        let response = self.http.get(self.endpoint(HEALTH_PATH)).send().await?;
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::StatusCode as AxumStatus,
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;

    type Seen = Arc<Mutex<Vec<Value>>>;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn record_and_answer(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
        seen.lock().unwrap().push(body);
        Json(json!({
            "google_safe_browsing": "Safe",
            "virustotal": "Safe",
            "ssl": "Valid",
            "ssl_days_remaining": 120,
            "tld": "Valid",
            "whois": { "registrar": "Example Inc" }
        }))
    }

    #[test]
    fn base_normalization() {
        assert_eq!(
            normalize_base("http://127.0.0.1:8000").unwrap(),
            "http://127.0.0.1:8000"
        );
        assert_eq!(
            normalize_base("https://api.example.com/v1/").unwrap(),
            "https://api.example.com/v1"
        );
        assert!(matches!(
            normalize_base("not a url"),
            Err(ApiError::InvalidBase(_))
        ));
        assert!(matches!(
            normalize_base("ftp://example.com"),
            Err(ApiError::InvalidBase(_))
        ));
    }

    #[test]
    fn endpoints_keep_base_path() {
        let client = ApiClient::new("https://api.example.com/v1/").unwrap();
        assert_eq!(
            client.endpoint(VERIFY_PATH),
            "https://api.example.com/v1/verify-url"
        );
        assert_eq!(client.endpoint(HEALTH_PATH), "https://api.example.com/v1/health");
    }

    #[tokio::test]
    async fn verify_posts_url_as_json() {
        let seen: Seen = Arc::default();
        let router = Router::new()
            .route("/verify-url", post(record_and_answer))
            .with_state(seen.clone());
        let base = spawn_backend(router).await;

        let client = ApiClient::new(&base).unwrap();
        let result = client.verify_url("https://example.com").await.unwrap();

        assert_eq!(result.ssl_days_remaining(), Some(120));
        assert_eq!(seen.lock().unwrap().as_slice(), &[json!({ "url": "https://example.com" })]);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let router = Router::new().route(
            "/verify-url",
            post(|| async { (AxumStatus::TOO_MANY_REQUESTS, "slow down").into_response() }),
        );
        let base = spawn_backend(router).await;

        let client = ApiClient::new(&base).unwrap();
        let err = client.verify_url("example.com").await.unwrap_err();
        assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 429));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let router = Router::new().route(
            "/verify-url",
            post(|| async { Json(json!({ "detail": "nope" })) }),
        );
        let base = spawn_backend(router).await;

        let client = ApiClient::new(&base).unwrap();
        let err = client.verify_url("example.com").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{addr}")).unwrap();
        let err = client.verify_url("example.com").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn health_probe() {
        let router = Router::new().route(
            "/health",
            get(|| async { Json(json!({ "status": "healthy" })) }),
        );
        let base = spawn_backend(router).await;

        let client = ApiClient::new(&base).unwrap();
        let health = client.health_check().await.unwrap();
        assert_eq!(health.status(), "healthy");
    }

    #[tokio::test]
    async fn failing_health_probe_is_a_status_error() {
        let router = Router::new().route(
            "/health",
            get(|| async { AxumStatus::INTERNAL_SERVER_ERROR.into_response() }),
        );
        let base = spawn_backend(router).await;

        let client = ApiClient::new(&base).unwrap();
        let err = client.health_check().await.unwrap_err();
        assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn health_probe_of_unreachable_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{addr}")).unwrap();
        let err = client.health_check().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
