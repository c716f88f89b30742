use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static STORE_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static AI_FALLBACK_COUNT: AtomicU64 = AtomicU64::new(0);

/// Incremented by the error-bus listener in `main`
pub fn increment_store_error_count() {
    STORE_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_ai_fallback_count() {
    AI_FALLBACK_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub store_errors_total: u64,
    pub ai_fallbacks_total: u64,
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "System metrics", body = MetricsResponse)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let store_errors = STORE_ERROR_COUNT.load(Ordering::Relaxed);
    let ai_fallbacks = AI_FALLBACK_COUNT.load(Ordering::Relaxed);

    let metrics = format!(
        "# HELP store_errors_total Total number of document-store permission/access errors\n\
         # TYPE store_errors_total counter\n\
         store_errors_total {}\n\
         \n\
         # HELP ai_fallbacks_total Total number of AI calls that served a fallback value\n\
         # TYPE ai_fallbacks_total counter\n\
         ai_fallbacks_total {}\n",
        store_errors, ai_fallbacks
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics)
}
