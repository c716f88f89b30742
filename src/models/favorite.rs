use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Valid favorite targets
pub const FAVORITE_ITEM_TYPES: [&str; 3] = ["trial", "publication", "expert"];

/// Bookmark join record (stored in the `favorites` collection). One document
/// per (user, item type, item id); toggled on and off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub user_id: String,

    /// "trial" | "publication" | "expert"
    pub item_type: String,
    pub item_id: String,

    /// Unix timestamp
    pub created_at: i64,
}

/// Response de favorito
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FavoriteResponse {
    pub id: String,
    pub item_type: String,
    pub item_id: String,
    pub created_at: i64,
}

impl From<Favorite> for FavoriteResponse {
    fn from(favorite: Favorite) -> Self {
        FavoriteResponse {
            id: favorite.id.map(|id| id.to_hex()).unwrap_or_default(),
            item_type: favorite.item_type,
            item_id: favorite.item_id,
            created_at: favorite.created_at,
        }
    }
}

/// Request para alternar favorito
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ToggleFavoriteRequest {
    pub item_type: String,
    pub item_id: String,
}

/// Response do toggle: estado final após a operação
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ToggleFavoriteResponse {
    pub success: bool,
    pub item_type: String,
    pub item_id: String,
    pub favorited: bool,
}
