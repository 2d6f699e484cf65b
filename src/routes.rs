use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{instrument, warn};

use crate::{
    api::VerificationApi,
    form_verification::UrlForm,
    render::IndexTemplate,
    view::VerificationView,
};

pub struct AppState<A> {
    api: Arc<A>,
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

pub fn router<A>(api: Arc<A>) -> Router
where
    A: VerificationApi + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index::<A>).post(verify::<A>))
        .route("/health", get(health::<A>))
        .with_state(AppState { api })
}

/// Empty form, or a verification when the page is opened with `?url=`
async fn index<A>(State(state): State<AppState<A>>, RawQuery(query): RawQuery) -> Response
where
    A: VerificationApi + Send + Sync + 'static,
{
    let form = UrlForm::from_urlencoded(query.unwrap_or_default().as_bytes());
    if form.has_url() {
        run_verification(state.api.as_ref(), form).await
    } else {
        IndexTemplate::from(&VerificationView::new()).into_response()
    }
}

async fn verify<A>(State(state): State<AppState<A>>, body: Bytes) -> Response
where
    A: VerificationApi + Send + Sync + 'static,
{
    let form = UrlForm::from_urlencoded(&body);
    run_verification(state.api.as_ref(), form).await
}

#[instrument(skip_all, fields(url = form.url()))]
async fn run_verification<A: VerificationApi>(api: &A, form: UrlForm) -> Response {
    let mut view = VerificationView::with_url(form.into_url());
    view.submit(api).await;
    IndexTemplate::from(&view).into_response()
}

async fn health<A>(State(state): State<AppState<A>>) -> Response
where
    A: VerificationApi + Send + Sync + 'static,
{
    match state.api.health_check().await {
        Ok(backend) => Json(json!({ "status": "ok", "backend": backend.status() })).into_response(),
        Err(err) => {
            warn!("Backend health check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "backend": "unreachable" })),
            )
                .into_response()
        }
    }
}
