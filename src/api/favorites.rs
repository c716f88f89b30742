use crate::api::request_claims;
use crate::database::MongoDB;
use crate::models::{ToggleFavoriteRequest, ToggleFavoriteResponse};
use crate::services::favorite_service;
use crate::sync::ErrorBus;
use actix_web::{web, HttpRequest, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/v1/favorites/toggle",
    tag = "Favorites",
    request_body = ToggleFavoriteRequest,
    responses(
        (status = 200, description = "Toggle applied", body = ToggleFavoriteResponse),
        (status = 400, description = "Invalid item")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_favorite(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    req: HttpRequest,
    request: web::Json<ToggleFavoriteRequest>,
) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    log::info!(
        "⭐ POST /favorites/toggle - {} {}:{}",
        claims.sub,
        request.item_type,
        request.item_id
    );

    match favorite_service::toggle_favorite(&db, &bus, &claims.sub, &request).await {
        Ok(response) => {
            log::info!(
                "✅ {} {}:{}",
                if response.favorited { "Favorited" } else { "Unfavorited" },
                response.item_type,
                response.item_id
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Favorite toggle rejected: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

pub async fn list_favorites(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    log::info!("⭐ GET /favorites - user: {}", claims.sub);

    match favorite_service::list_favorites(&db, &claims.sub).await {
        Ok(favorites) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "favorites": favorites,
            "count": favorites.len()
        })),
        Err(e) => {
            log::error!("❌ Failed to list favorites: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}
