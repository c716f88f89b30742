mod api;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod sync;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use services::ai_service::AiClient;
use std::env;
use sync::ErrorBus;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let database_url = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017/curalink".to_string());

    log::info!("🚀 Starting CuraLink Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // Error bus: one instance for the process, injected everywhere.
    // The listener below is the single place store failures surface.
    let bus = ErrorBus::new();
    {
        let mut events = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        api::metrics::increment_store_error_count();
                        log::error!("🔒 {}", event);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("🔒 Error-bus listener lagged, skipped {} events", skipped);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
    let bus_data = web::Data::new(bus);

    // Hosted model client (serves fallbacks when unconfigured)
    let ai_data = web::Data::new(AiClient::from_env());

    // Shared descriptor memo for the live posts stream
    let posts_memo_data: web::Data<api::forums::PostsQueryMemo> =
        web::Data::new(std::sync::Mutex::new(sync::QueryMemo::new()));

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000") // Frontend Web
            .allowed_origin("http://localhost:9002")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_origin("http://127.0.0.1:9002")
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CACHE_CONTROL,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(bus_data.clone())
            .app_data(ai_data.clone())
            .app_data(posts_memo_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Auth endpoints
            .service(
                web::scope("/api/v1/auth")
                    .route("/login", web::post().to(api::auth::login))
                    .route("/register", web::post().to(api::auth::register))
                    .route("/verify", web::get().to(api::auth::verify_token))
                    .route("/me", web::get().to(api::auth::get_me)),
            )
            // ==================== CATALOG DATA ====================
            // Trials & publications: external registries with seed fallback
            .service(
                web::scope("/api/v1/trials")
                    .route("", web::get().to(api::trials::get_trials)),
            )
            .service(
                web::scope("/api/v1/publications")
                    .route("", web::get().to(api::publications::get_publications)),
            )
            // Experts: researcher directory (users + profiles)
            .service(
                web::scope("/api/v1/experts")
                    .route("", web::get().to(api::experts::get_experts)),
            )
            // Recommendations: conditions matched against the catalog - Requires JWT
            .service(
                web::scope("/api/v1/recommendations")
                    .wrap(middleware::AuthMiddleware)
                    .route("", web::get().to(api::recommendations::get_recommendations)),
            )
            // ==================== USER DATA (JWT) ====================
            // Profiles: one per user per role
            .service(
                web::scope("/api/v1/profiles")
                    .wrap(middleware::AuthMiddleware)
                    .route("/patient", web::get().to(api::profiles::get_patient_profile))
                    .route("/patient", web::put().to(api::profiles::put_patient_profile))
                    .route(
                        "/researcher",
                        web::get().to(api::profiles::get_researcher_profile),
                    )
                    .route(
                        "/researcher",
                        web::put().to(api::profiles::put_researcher_profile),
                    ),
            )
            // Forums: community Q&A with live post streams
            .service(
                web::scope("/api/v1/forums")
                    .wrap(middleware::AuthMiddleware)
                    .route("", web::get().to(api::forums::list_forums))
                    .route("", web::post().to(api::forums::create_forum))
                    .route("/{forum_id}", web::get().to(api::forums::get_forum))
                    .route("/{forum_id}/live", web::get().to(api::forums::live_forum))
                    .route("/{forum_id}/posts", web::get().to(api::forums::list_posts))
                    .route("/{forum_id}/posts", web::post().to(api::forums::create_post))
                    .route(
                        "/{forum_id}/posts/live",
                        web::get().to(api::forums::live_posts),
                    ),
            )
            // Meetings: patient requests, researcher decisions
            .service(
                web::scope("/api/v1/meetings")
                    .wrap(middleware::AuthMiddleware)
                    .route("", web::post().to(api::meetings::create_meeting))
                    .route(
                        "/pending",
                        web::get().to(api::meetings::get_pending_meetings),
                    )
                    .route(
                        "/{meeting_id}",
                        web::patch().to(api::meetings::update_meeting_status),
                    ),
            )
            // Favorites: toggleable bookmarks
            .service(
                web::scope("/api/v1/favorites")
                    .wrap(middleware::AuthMiddleware)
                    .route("/toggle", web::post().to(api::favorites::toggle_favorite))
                    .route("", web::get().to(api::favorites::list_favorites)),
            )
            // ==================== AI FEATURES (JWT) ====================
            .service(
                web::scope("/api/v1/ai")
                    .wrap(middleware::AuthMiddleware)
                    .route("/conditions", web::post().to(api::ai::detect_conditions))
                    .route("/trial-summary", web::post().to(api::ai::summarize_trial))
                    .route(
                        "/publication-summary",
                        web::post().to(api::ai::summarize_publication),
                    )
                    .route("/assistant", web::post().to(api::ai::ask_assistant)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
