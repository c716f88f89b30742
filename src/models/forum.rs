use crate::models::UserType;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Forum thread (stored in the `forums` collection). The question itself is
/// the first post in the forum's posts collection, created together with the
/// forum document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forum {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub name: String,
    pub description: String,

    /// ID do usuário que abriu o fórum
    pub creator_id: String,
    pub creator_type: UserType,

    /// Unix timestamp
    pub created_at: i64,
}

/// Post inside a forum (stored in the `posts` collection, ordered by
/// `timestamp` ascending). `user_type` decides display grouping: the single
/// patient question vs. the replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub forum_id: String,
    pub content: String,
    pub user_id: String,
    pub user_type: UserType,

    /// Unix timestamp
    pub timestamp: i64,
}

/// Request para criar fórum (pergunta + descrição viram o primeiro post)
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateForumRequest {
    pub name: String,
    pub description: String,
}

/// Request para responder em um fórum
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    pub content: String,
}

/// Response de fórum
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ForumResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub creator_id: String,
    pub creator_type: UserType,
    pub created_at: i64,
}

impl From<Forum> for ForumResponse {
    fn from(forum: Forum) -> Self {
        ForumResponse {
            id: forum.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: forum.name,
            description: forum.description,
            creator_id: forum.creator_id,
            creator_type: forum.creator_type,
            created_at: forum.created_at,
        }
    }
}

/// Response de post
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: String,
    pub forum_id: String,
    pub content: String,
    pub user_id: String,
    pub user_type: UserType,
    pub timestamp: i64,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        PostResponse {
            id: post.id.map(|id| id.to_hex()).unwrap_or_default(),
            forum_id: post.forum_id,
            content: post.content,
            user_id: post.user_id,
            user_type: post.user_type,
            timestamp: post.timestamp,
        }
    }
}
