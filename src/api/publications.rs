use crate::services::publication_service;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PublicationsQuery {
    pub search: Option<String>,
}

/// GET /api/v1/publications?search=glioblastoma
#[utoipa::path(
    get,
    path = "/api/v1/publications",
    tag = "Catalog",
    responses(
        (status = 200, description = "Publications (PubMed or seed catalog)")
    )
)]
pub async fn get_publications(query: web::Query<PublicationsQuery>) -> HttpResponse {
    log::info!("📚 GET /publications - search: {:?}", query.search);

    let publications = publication_service::get_publications(query.search.as_deref()).await;
    let publications =
        publication_service::filter_publications(publications, query.search.as_deref());

    log::info!("✅ Returning {} publications", publications.len());

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "publications": publications,
        "count": publications.len()
    }))
}
