use crate::services::auth_service::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use crate::{database::MongoDB, services::auth_service};
use actix_web::{web, HttpRequest, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Invalid request or email already registered")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::RegisterRequest>,
) -> HttpResponse {
    log::info!(
        "📝 POST /auth/register - email: {}, type: {}",
        request.email,
        request.user_type
    );

    match auth_service::register(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Registration successful: {}", request.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.email, e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify_token(req: HttpRequest) -> HttpResponse {
    log::info!("✓ GET /auth/verify");

    // Extract token from Authorization header
    let auth_header = req.headers().get("Authorization");

    if let Some(auth_value) = auth_header {
        if let Ok(auth_str) = auth_value.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                match auth_service::verify_token(token) {
                    Ok(claims) => {
                        log::info!("✅ Token valid for user: {}", claims.sub);
                        return HttpResponse::Ok().json(serde_json::json!({
                            "success": true,
                            "valid": true,
                            "user_id": claims.sub,
                            "email": claims.email,
                            "user_type": claims.user_type,
                            "exp": claims.exp
                        }));
                    }
                    Err(e) => {
                        log::warn!("❌ Invalid token: {}", e);
                        return HttpResponse::Unauthorized().json(serde_json::json!({
                            "success": false,
                            "valid": false,
                            "error": e
                        }));
                    }
                }
            }
        }
    }

    HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": "No valid Authorization header"
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "User information retrieved", body = UserInfo),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("👤 GET /auth/me");

    // Extract token from Authorization header
    let auth_header = req.headers().get("Authorization");

    if let Some(auth_value) = auth_header {
        if let Ok(auth_str) = auth_value.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                match auth_service::verify_token(token) {
                    Ok(claims) => {
                        match auth_service::get_current_user(&db, &claims.sub).await {
                            Ok(user) => {
                                log::info!("✅ User info retrieved: {}", claims.sub);
                                return HttpResponse::Ok().json(serde_json::json!({
                                    "success": true,
                                    "user": user
                                }));
                            }
                            Err(e) => {
                                log::error!("❌ Failed to get user: {}", e);
                                return HttpResponse::InternalServerError().json(
                                    serde_json::json!({
                                        "success": false,
                                        "error": e
                                    }),
                                );
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("❌ Invalid token: {}", e);
                        return HttpResponse::Unauthorized().json(serde_json::json!({
                            "success": false,
                            "error": e
                        }));
                    }
                }
            }
        }
    }

    HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": "No valid Authorization header"
    }))
}
