use crate::api::request_claims;
use crate::database::MongoDB;
use crate::models::{CreateMeetingRequest, MeetingRequestResponse, UpdateMeetingStatusRequest};
use crate::services::meeting_service;
use crate::sync::ErrorBus;
use actix_web::{web, HttpRequest, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/v1/meetings",
    tag = "Meetings",
    request_body = CreateMeetingRequest,
    responses(
        (status = 202, description = "Meeting request accepted"),
        (status = 400, description = "Validation failed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_meeting(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    req: HttpRequest,
    request: web::Json<CreateMeetingRequest>,
) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    log::info!(
        "📅 POST /meetings - patient {} -> researcher {}",
        claims.sub,
        request.researcher_id
    );

    match meeting_service::create_meeting_request(&db, &bus, &claims, &request) {
        Ok(()) => {
            log::info!("✅ Meeting request queued");
            HttpResponse::Accepted().json(serde_json::json!({
                "success": true,
                "status": "pending"
            }))
        }
        Err(e) => {
            log::warn!("❌ Meeting request rejected: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/meetings/pending",
    tag = "Meetings",
    responses(
        (status = 200, description = "Pending meeting requests", body = [MeetingRequestResponse])
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_pending_meetings(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    log::info!("📅 GET /meetings/pending - researcher: {}", claims.sub);

    match meeting_service::list_pending_requests(&db, &claims.sub).await {
        Ok(requests) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "requests": requests,
            "count": requests.len()
        })),
        Err(e) => {
            log::error!("❌ Failed to list meeting requests: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/meetings/{meeting_id}",
    tag = "Meetings",
    request_body = UpdateMeetingStatusRequest,
    responses(
        (status = 202, description = "Status update accepted", body = MeetingRequestResponse),
        (status = 404, description = "Meeting request not found"),
        (status = 409, description = "Request already decided")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_meeting_status(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UpdateMeetingStatusRequest>,
) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };
    let meeting_id = path.into_inner();

    log::info!(
        "📅 PATCH /meetings/{} -> {} by {}",
        meeting_id,
        request.status,
        claims.sub
    );

    match meeting_service::update_meeting_status(&db, &bus, &claims, &meeting_id, &request).await {
        Ok(meeting) => HttpResponse::Accepted().json(serde_json::json!({
            "success": true,
            "request": meeting
        })),
        Err(e) => {
            log::warn!("❌ Meeting status update rejected: {}", e);

            if e.contains("not found") || e.contains("Invalid meeting request id") {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "error": e
                }));
            }
            if e.contains("already") {
                return HttpResponse::Conflict().json(serde_json::json!({
                    "success": false,
                    "error": e
                }));
            }
            if e.contains("Only researchers") || e.contains("your own") {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "success": false,
                    "error": e
                }));
            }

            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}
