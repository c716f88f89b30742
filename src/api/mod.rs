pub mod ai;
pub mod auth;
pub mod experts;
pub mod favorites;
pub mod forums;
pub mod health;
pub mod meetings;
pub mod metrics;
pub mod profiles;
pub mod publications;
pub mod recommendations;
pub mod swagger;
pub mod trials;

use crate::services::auth_service::Claims;
use actix_web::{HttpMessage, HttpRequest, HttpResponse};

/// Claims injected by `AuthMiddleware`. Absent only if a handler is mounted
/// outside a guarded scope by mistake.
pub fn request_claims(req: &HttpRequest) -> Result<Claims, HttpResponse> {
    req.extensions().get::<Claims>().cloned().ok_or_else(|| {
        HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "error": "Missing authentication"
        }))
    })
}
