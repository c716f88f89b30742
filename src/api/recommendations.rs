use crate::api::request_claims;
use crate::database::MongoDB;
use crate::services::recommendation_service::{self, RecommendationsResponse};
use crate::sync::ErrorBus;
use actix_web::{web, HttpRequest, HttpResponse};

/// GET /api/v1/recommendations
/// Personalized trials/publications/experts for the signed-in patient
#[utoipa::path(
    get,
    path = "/api/v1/recommendations",
    tag = "Catalog",
    responses(
        (status = 200, description = "Personalized recommendations", body = RecommendationsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_recommendations(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    req: HttpRequest,
) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    log::info!("✨ GET /recommendations - user: {}", claims.sub);

    match recommendation_service::get_recommendations(&db, &bus, &claims.sub).await {
        Ok(response) => {
            log::info!(
                "✅ Recommendations: {} trials, {} publications, {} experts",
                response.trials.len(),
                response.publications.len(),
                response.experts.len()
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::error!("❌ Failed to build recommendations: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}
