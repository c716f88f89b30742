use crate::services::trial_service;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TrialsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

/// GET /api/v1/trials?search=immunotherapy&status=Recruiting
#[utoipa::path(
    get,
    path = "/api/v1/trials",
    tag = "Catalog",
    responses(
        (status = 200, description = "Clinical trials (registry or seed catalog)")
    )
)]
pub async fn get_trials(query: web::Query<TrialsQuery>) -> HttpResponse {
    log::info!(
        "🔬 GET /trials - search: {:?}, status: {:?}",
        query.search,
        query.status
    );

    let trials = trial_service::get_clinical_trials(query.search.as_deref()).await;
    let trials = trial_service::filter_trials(
        trials,
        query.search.as_deref(),
        query.status.as_deref(),
    );

    log::info!("✅ Returning {} trials", trials.len());

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "trials": trials,
        "count": trials.len()
    }))
}
