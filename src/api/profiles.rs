use crate::api::request_claims;
use crate::database::MongoDB;
use crate::models::{PatientProfileRequest, ResearcherProfileRequest, UserType};
use crate::services::profile_service;
use crate::sync::ErrorBus;
use actix_web::{web, HttpRequest, HttpResponse};

pub async fn get_patient_profile(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    log::info!("👤 GET /profiles/patient - user: {}", claims.sub);

    match profile_service::get_patient_profile(&db, &claims.sub).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profile": profile
        })),
        Err(e) => {
            log::error!("❌ Failed to load patient profile: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/profiles/patient",
    tag = "Profiles",
    request_body = PatientProfileRequest,
    responses(
        (status = 202, description = "Profile write accepted"),
        (status = 400, description = "Validation failed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn put_patient_profile(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    req: HttpRequest,
    request: web::Json<PatientProfileRequest>,
) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    if claims.user_type != UserType::Patient {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Only patients can edit a patient profile"
        }));
    }

    log::info!("📝 PUT /profiles/patient - user: {}", claims.sub);

    match profile_service::upsert_patient_profile(&db, &bus, &claims.sub, &request) {
        Ok(profile) => {
            log::info!("✅ Patient profile write queued: {}", claims.sub);
            HttpResponse::Accepted().json(serde_json::json!({
                "success": true,
                "profile": profile
            }))
        }
        Err(e) => {
            log::warn!("❌ Patient profile rejected: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

pub async fn get_researcher_profile(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    log::info!("👤 GET /profiles/researcher - user: {}", claims.sub);

    match profile_service::get_researcher_profile(&db, &claims.sub).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profile": profile
        })),
        Err(e) => {
            log::error!("❌ Failed to load researcher profile: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/profiles/researcher",
    tag = "Profiles",
    request_body = ResearcherProfileRequest,
    responses(
        (status = 202, description = "Profile write accepted"),
        (status = 400, description = "Validation failed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn put_researcher_profile(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    req: HttpRequest,
    request: web::Json<ResearcherProfileRequest>,
) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    if claims.user_type != UserType::Researcher {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Only researchers can edit a researcher profile"
        }));
    }

    log::info!("📝 PUT /profiles/researcher - user: {}", claims.sub);

    match profile_service::upsert_researcher_profile(&db, &bus, &claims.sub, &request) {
        Ok(profile) => {
            log::info!("✅ Researcher profile write queued: {}", claims.sub);
            HttpResponse::Accepted().json(serde_json::json!({
                "success": true,
                "profile": profile
            }))
        }
        Err(e) => {
            log::warn!("❌ Researcher profile rejected: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}
