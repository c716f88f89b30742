use crate::database::MongoDB;
use crate::models::{
    CreateForumRequest, CreatePostRequest, Forum, ForumResponse, Post, PostResponse,
};
use crate::services::auth_service::Claims;
use crate::sync::{create_non_blocking, ErrorBus};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};

/// Creates the forum document and immediately adds the question as its first
/// post. The forum insert is awaited (its id seeds the post); the post write
/// is non-blocking, with failures surfacing on the error bus.
pub async fn create_forum(
    db: &MongoDB,
    bus: &ErrorBus,
    claims: &Claims,
    request: &CreateForumRequest,
) -> Result<ForumResponse, String> {
    if request.name.trim().len() < 5 {
        return Err("Question title must be at least 5 characters.".to_string());
    }
    if request.description.trim().len() < 10 {
        return Err("Please provide more details for your question.".to_string());
    }

    let now = Utc::now().timestamp();

    let forum = Forum {
        id: None,
        name: request.name.clone(),
        description: request.description.clone(),
        creator_id: claims.sub.clone(),
        creator_type: claims.user_type,
        created_at: now,
    };

    let collection = db.collection::<Forum>("forums");
    let inserted = collection
        .insert_one(&forum)
        .await
        .map_err(|e| format!("Failed to create forum: {}", e))?;

    let forum_id = inserted
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .ok_or_else(|| "Store returned no id for new forum".to_string())?;

    let question = Post {
        id: None,
        forum_id: forum_id.clone(),
        content: request.description.clone(),
        user_id: claims.sub.clone(),
        user_type: claims.user_type,
        timestamp: now,
    };

    create_non_blocking(&db.collection::<Post>("posts"), question, bus);

    log::info!("✅ Forum created: '{}' by {}", forum.name, claims.sub);

    Ok(ForumResponse {
        id: forum_id,
        name: forum.name,
        description: forum.description,
        creator_id: forum.creator_id,
        creator_type: forum.creator_type,
        created_at: forum.created_at,
    })
}

/// All forums, ordered by name
pub async fn list_forums(db: &MongoDB) -> Result<Vec<ForumResponse>, String> {
    let collection = db.collection::<Forum>("forums");

    let forums: Vec<Forum> = collection
        .find(doc! {})
        .sort(doc! { "name": 1 })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .try_collect()
        .await
        .map_err(|e| format!("Failed to decode forums: {}", e))?;

    Ok(forums.into_iter().map(ForumResponse::from).collect())
}

pub async fn get_forum(db: &MongoDB, forum_id: &str) -> Result<ForumResponse, String> {
    let oid =
        ObjectId::parse_str(forum_id).map_err(|_| format!("Invalid forum id: {}", forum_id))?;

    let collection = db.collection::<Forum>("forums");

    let forum = collection
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Forum {} not found", forum_id))?;

    Ok(forum.into())
}

/// Posts for one forum, question first (timestamp ascending)
pub async fn list_posts(db: &MongoDB, forum_id: &str) -> Result<Vec<PostResponse>, String> {
    let collection = db.collection::<Post>("posts");

    let posts: Vec<Post> = collection
        .find(doc! { "forum_id": forum_id })
        .sort(doc! { "timestamp": 1 })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .try_collect()
        .await
        .map_err(|e| format!("Failed to decode posts: {}", e))?;

    Ok(posts.into_iter().map(PostResponse::from).collect())
}

/// Adds a reply. The forum is checked first so replies to deleted threads
/// fail loudly; the post write itself is non-blocking.
pub async fn create_post(
    db: &MongoDB,
    bus: &ErrorBus,
    claims: &Claims,
    forum_id: &str,
    request: &CreatePostRequest,
) -> Result<PostResponse, String> {
    if request.content.trim().is_empty() {
        return Err("Reply content cannot be empty.".to_string());
    }

    // existence check doubles as id validation
    get_forum(db, forum_id).await?;

    let post = Post {
        id: None,
        forum_id: forum_id.to_string(),
        content: request.content.clone(),
        user_id: claims.sub.clone(),
        user_type: claims.user_type,
        timestamp: Utc::now().timestamp(),
    };

    let response = PostResponse {
        id: String::new(),
        forum_id: post.forum_id.clone(),
        content: post.content.clone(),
        user_id: post.user_id.clone(),
        user_type: post.user_type,
        timestamp: post.timestamp,
    };

    create_non_blocking(&db.collection::<Post>("posts"), post, bus);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserType;
    use crate::sync::ErrorBus;
    use mongodb::Client;

    fn patient_claims() -> Claims {
        Claims {
            sub: "patient-1".to_string(),
            email: "john@example.com".to_string(),
            user_type: UserType::Patient,
            iat: 0,
            exp: usize::MAX,
            jti: "test".to_string(),
            aud: "curalink-api".to_string(),
            iss: "curalink-service".to_string(),
        }
    }

    async fn test_db() -> MongoDB {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/curalink_test".to_string());
        MongoDB::new(&uri).await.unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_create_forum_creates_exactly_one_forum_and_one_post() {
        let db = test_db().await;
        let bus = ErrorBus::new();
        let claims = patient_claims();

        let request = CreateForumRequest {
            name: "Test Question".to_string(),
            description: "What treatments exist?".to_string(),
        };

        let forum = create_forum(&db, &bus, &claims, &request).await.unwrap();
        assert!(!forum.id.is_empty());

        // the question post is written asynchronously; give it a moment
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let forums = db
            .collection::<Forum>("forums")
            .count_documents(doc! { "name": "Test Question" })
            .await
            .unwrap();
        assert_eq!(forums, 1);

        let posts = list_posts(&db, &forum.id).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "What treatments exist?");
        assert_eq!(posts[0].user_type, UserType::Patient);

        // cleanup
        let oid = ObjectId::parse_str(&forum.id).unwrap();
        db.collection::<Forum>("forums")
            .delete_one(doc! { "_id": oid })
            .await
            .unwrap();
        db.collection::<Post>("posts")
            .delete_many(doc! { "forum_id": &forum.id })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_forum_rejects_short_title() {
        // validation fails before any store access, so an offline client works
        let client = Client::with_uri_str("mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=100")
            .await
            .unwrap();
        let db = crate::database::MongoDB::from_client_for_tests(client, "curalink_test");

        let request = CreateForumRequest {
            name: "Hey".to_string(),
            description: "What treatments exist for glioma?".to_string(),
        };

        let result = create_forum(&db, &ErrorBus::new(), &patient_claims(), &request).await;
        assert_eq!(
            result.unwrap_err(),
            "Question title must be at least 5 characters."
        );
    }
}
