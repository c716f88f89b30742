use crate::database::MongoDB;
use crate::services::expert_service;
use crate::sync::ErrorBus;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ExpertsQuery {
    pub search: Option<String>,
}

/// GET /api/v1/experts?search=oncology
#[utoipa::path(
    get,
    path = "/api/v1/experts",
    tag = "Catalog",
    responses(
        (status = 200, description = "Researcher directory")
    )
)]
pub async fn get_experts(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    query: web::Query<ExpertsQuery>,
) -> HttpResponse {
    log::info!("🧑‍🔬 GET /experts - search: {:?}", query.search);

    let experts = expert_service::list_experts(&db, &bus).await;
    let experts = expert_service::filter_experts(experts, query.search.as_deref());

    log::info!("✅ Returning {} experts", experts.len());

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "experts": experts,
        "count": experts.len()
    }))
}
