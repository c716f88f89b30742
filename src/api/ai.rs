use crate::api::metrics;
use crate::services::ai_service::{self, AiClient, ChatTurn};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ConditionsRequest {
    pub description: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TrialSummaryRequest {
    pub details: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PublicationSummaryRequest {
    pub text: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AssistantRequest {
    pub question: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// POST /api/v1/ai/conditions
/// Extract medical conditions from a patient's free-text story
#[utoipa::path(
    post,
    path = "/api/v1/ai/conditions",
    tag = "AI",
    request_body = ConditionsRequest,
    responses(
        (status = 200, description = "Extracted conditions (empty list on empty input or failure)")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn detect_conditions(
    ai: web::Data<AiClient>,
    request: web::Json<ConditionsRequest>,
) -> HttpResponse {
    log::info!(
        "🩺 POST /ai/conditions - {} chars",
        request.description.len()
    );

    let conditions = ai.detect_conditions(&request.description).await;

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "conditions": conditions
    }))
}

/// POST /api/v1/ai/trial-summary
pub async fn summarize_trial(
    ai: web::Data<AiClient>,
    request: web::Json<TrialSummaryRequest>,
) -> HttpResponse {
    log::info!("📝 POST /ai/trial-summary - {} chars", request.details.len());

    let summary = ai.summarize_trial(&request.details).await;
    if summary == ai_service::SUMMARY_FALLBACK {
        metrics::increment_ai_fallback_count();
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "summary": summary
    }))
}

/// POST /api/v1/ai/publication-summary
pub async fn summarize_publication(
    ai: web::Data<AiClient>,
    request: web::Json<PublicationSummaryRequest>,
) -> HttpResponse {
    log::info!(
        "📝 POST /ai/publication-summary - {} chars",
        request.text.len()
    );

    let summary = ai.summarize_publication(&request.text).await;
    if summary == ai_service::SUMMARY_FALLBACK {
        metrics::increment_ai_fallback_count();
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "summary": summary
    }))
}

/// POST /api/v1/ai/assistant
#[utoipa::path(
    post,
    path = "/api/v1/ai/assistant",
    tag = "AI",
    request_body = AssistantRequest,
    responses(
        (status = 200, description = "Assistant answer (fallback string on failure)")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn ask_assistant(
    ai: web::Data<AiClient>,
    request: web::Json<AssistantRequest>,
) -> HttpResponse {
    log::info!(
        "🤖 POST /ai/assistant - history: {} turns",
        request.history.len()
    );

    let answer = ai.ask_assistant(&request.question, &request.history).await;
    if answer == ai_service::ASSISTANT_FALLBACK {
        metrics::increment_ai_fallback_count();
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "answer": answer
    }))
}
