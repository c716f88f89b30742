use crate::api::request_claims;
use crate::database::MongoDB;
use crate::models::{
    CreateForumRequest, CreatePostRequest, Forum, ForumResponse, Post, PostResponse,
};
use crate::services::forum_service;
use crate::sync::{ErrorBus, LiveDoc, LiveQuery, QueryDescriptor, QueryMemo};
use actix_web::{web, HttpRequest, HttpResponse};
use mongodb::bson::{doc, oid::ObjectId};
use std::sync::Mutex;
use std::time::Duration;

/// Memoized posts-query descriptor, shared across live-stream requests so
/// repeat subscriptions to the same forum reuse the same descriptor.
pub type PostsQueryMemo = Mutex<QueryMemo<String, QueryDescriptor>>;

/// Snapshot cadence of the live posts stream
const LIVE_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub async fn list_forums(db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("💬 GET /forums");

    match forum_service::list_forums(&db).await {
        Ok(forums) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "forums": forums,
            "count": forums.len()
        })),
        Err(e) => {
            log::error!("❌ Failed to list forums: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/forums",
    tag = "Forums",
    request_body = CreateForumRequest,
    responses(
        (status = 201, description = "Forum created with its question post", body = ForumResponse),
        (status = 400, description = "Validation failed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_forum(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    req: HttpRequest,
    request: web::Json<CreateForumRequest>,
) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    log::info!("💬 POST /forums - '{}' by {}", request.name, claims.sub);

    match forum_service::create_forum(&db, &bus, &claims, &request).await {
        Ok(forum) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "forum": forum
        })),
        Err(e) => {
            log::warn!("❌ Forum creation rejected: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

pub async fn get_forum(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let forum_id = path.into_inner();
    log::info!("💬 GET /forums/{}", forum_id);

    match forum_service::get_forum(&db, &forum_id).await {
        Ok(forum) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "forum": forum
        })),
        Err(e) => {
            if e.contains("not found") || e.contains("Invalid forum id") {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "error": e
                }));
            }
            log::error!("❌ Failed to load forum: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

pub async fn list_posts(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let forum_id = path.into_inner();
    log::info!("💬 GET /forums/{}/posts", forum_id);

    match forum_service::list_posts(&db, &forum_id).await {
        Ok(posts) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "posts": posts,
            "count": posts.len()
        })),
        Err(e) => {
            log::error!("❌ Failed to list posts: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/forums/{forum_id}/posts",
    tag = "Forums",
    request_body = CreatePostRequest,
    responses(
        (status = 202, description = "Reply accepted", body = PostResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Forum not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_post(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<CreatePostRequest>,
) -> HttpResponse {
    let claims = match request_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };
    let forum_id = path.into_inner();

    log::info!("💬 POST /forums/{}/posts by {}", forum_id, claims.sub);

    match forum_service::create_post(&db, &bus, &claims, &forum_id, &request).await {
        Ok(post) => HttpResponse::Accepted().json(serde_json::json!({
            "success": true,
            "post": post
        })),
        Err(e) => {
            if e.contains("not found") || e.contains("Invalid forum id") {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "error": e
                }));
            }
            log::warn!("❌ Reply rejected: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

/// GET /api/v1/forums/{forum_id}/posts/live
/// Server-sent-events stream of post snapshots. The subscription lives
/// exactly as long as the response stream: client disconnect drops the
/// stream state, which stops the underlying LiveQuery.
pub async fn live_posts(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    memo: web::Data<PostsQueryMemo>,
    path: web::Path<String>,
) -> HttpResponse {
    let forum_id = path.into_inner();
    log::info!("📡 GET /forums/{}/posts/live", forum_id);

    if let Err(e) = forum_service::get_forum(&db, &forum_id).await {
        return HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        }));
    }

    let descriptor = memo
        .lock()
        .ok()
        .and_then(|mut memo| {
            memo.get_or_build(Some(forum_id.clone()), |id| {
                QueryDescriptor::new("posts", doc! { "forum_id": id })
                    .sorted(doc! { "timestamp": 1 })
                    .capped(500)
            })
        })
        .map(|descriptor| (*descriptor).clone());

    let mut live = LiveQuery::<Post>::new(
        db.collection("posts"),
        descriptor,
        bus.get_ref().clone(),
        LIVE_POLL_INTERVAL,
    );
    let rx = live.subscribe();
    live.start();

    let stream = futures::stream::unfold((rx, live, false), |(mut rx, live, done)| async move {
        if done {
            return None;
        }
        match rx.changed().await {
            Ok(()) => {
                let (event, errored) = {
                    let snapshot = rx.borrow_and_update();
                    let posts: Vec<PostResponse> = snapshot
                        .data
                        .clone()
                        .unwrap_or_default()
                        .into_iter()
                        .map(PostResponse::from)
                        .collect();
                    let payload = serde_json::json!({
                        "posts": posts,
                        "isLoading": snapshot.is_loading,
                        "error": snapshot.error,
                    });
                    (
                        format!("data: {}\n\n", payload),
                        snapshot.error.is_some(),
                    )
                };
                Some((
                    Ok::<_, actix_web::Error>(web::Bytes::from(event)),
                    (rx, live, errored),
                ))
            }
            Err(_) => None,
        }
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream)
}

/// GET /api/v1/forums/{forum_id}/live
/// Server-sent-events stream of the forum document itself (title and
/// description edits). Same lifecycle as the posts stream.
pub async fn live_forum(
    db: web::Data<MongoDB>,
    bus: web::Data<ErrorBus>,
    path: web::Path<String>,
) -> HttpResponse {
    let forum_id = path.into_inner();
    log::info!("📡 GET /forums/{}/live", forum_id);

    let oid = match ObjectId::parse_str(&forum_id) {
        Ok(oid) => oid,
        Err(_) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": format!("Invalid forum id: {}", forum_id)
            }));
        }
    };

    let descriptor =
        QueryDescriptor::new(format!("forums/{}", forum_id), doc! { "_id": oid });

    let mut live = LiveDoc::<Forum>::new(
        db.collection("forums"),
        Some(descriptor),
        bus.get_ref().clone(),
        LIVE_POLL_INTERVAL,
    );
    let rx = live.subscribe();
    live.start();

    let stream = futures::stream::unfold((rx, live, false), |(mut rx, live, done)| async move {
        if done {
            return None;
        }
        match rx.changed().await {
            Ok(()) => {
                let (event, errored) = {
                    let snapshot = rx.borrow_and_update();
                    let forum: Option<ForumResponse> =
                        snapshot.data.clone().map(ForumResponse::from);
                    let payload = serde_json::json!({
                        "forum": forum,
                        "isLoading": snapshot.is_loading,
                        "error": snapshot.error,
                    });
                    (
                        format!("data: {}\n\n", payload),
                        snapshot.error.is_some(),
                    )
                };
                Some((
                    Ok::<_, actix_web::Error>(web::Bytes::from(event)),
                    (rx, live, errored),
                ))
            }
            Err(_) => None,
        }
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream)
}
