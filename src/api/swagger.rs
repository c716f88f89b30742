use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CuraLink Service API",
        version = "1.0.0",
        description = "API documentation for CuraLink, a platform connecting patients and researchers. \n\n**Authentication:** Most endpoints require JWT Bearer token authentication.\n\n**Features:**\n- Patient and researcher accounts with role-scoped profiles\n- Clinical trial and publication browsing with registry fallback\n- Expert directory and keyword-based recommendations\n- Community forums with live post streams\n- Meeting requests and favorites\n- AI condition extraction, summaries, and assistant",
        contact(
            name = "CuraLink Team",
            email = "support@curalink.example.com"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::login,
        crate::api::auth::register,
        crate::api::auth::verify_token,
        crate::api::auth::get_me,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Profiles
        crate::api::profiles::put_patient_profile,
        crate::api::profiles::put_researcher_profile,

        // Catalog
        crate::api::trials::get_trials,
        crate::api::publications::get_publications,
        crate::api::experts::get_experts,
        crate::api::recommendations::get_recommendations,

        // Forums
        crate::api::forums::create_forum,
        crate::api::forums::create_post,

        // Meetings
        crate::api::meetings::create_meeting,
        crate::api::meetings::get_pending_meetings,
        crate::api::meetings::update_meeting_status,

        // Favorites
        crate::api::favorites::toggle_favorite,

        // AI
        crate::api::ai::detect_conditions,
        crate::api::ai::ask_assistant,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,
            crate::models::UserType,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,

            // Profiles
            crate::models::PatientProfileRequest,
            crate::models::ResearcherProfileRequest,
            crate::models::Expert,

            // Catalog
            crate::models::ClinicalTrial,
            crate::models::Publication,
            crate::services::recommendation_service::RecommendationsResponse,

            // Forums
            crate::models::CreateForumRequest,
            crate::models::CreatePostRequest,
            crate::models::ForumResponse,
            crate::models::PostResponse,

            // Meetings
            crate::models::MeetingStatus,
            crate::models::CreateMeetingRequest,
            crate::models::UpdateMeetingStatusRequest,
            crate::models::MeetingRequestResponse,

            // Favorites
            crate::models::ToggleFavoriteRequest,
            crate::models::ToggleFavoriteResponse,
            crate::models::FavoriteResponse,

            // AI
            crate::api::ai::ConditionsRequest,
            crate::api::ai::TrialSummaryRequest,
            crate::api::ai::PublicationSummaryRequest,
            crate::api::ai::AssistantRequest,
            crate::services::ai_service::ChatTurn,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication and account endpoints. Email/password with patient or researcher roles."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
        (name = "Profiles", description = "Role-scoped profile endpoints. One profile per user per role, upserted with merge semantics."),
        (name = "Catalog", description = "Clinical trials, publications, experts, and personalized recommendations. External registries with seed fallback."),
        (name = "Forums", description = "Community Q&A. Creating a forum also creates its question post; replies stream live."),
        (name = "Meetings", description = "Patient-initiated meeting requests, accepted or rejected by the researcher."),
        (name = "Favorites", description = "Toggleable bookmarks for trials, publications, and experts."),
        (name = "AI", description = "Hosted-model features: condition extraction, summaries, and the platform assistant. Every operation degrades to a safe fallback."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
