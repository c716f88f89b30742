use crate::database::MongoDB;
use crate::models::{
    Favorite, FavoriteResponse, ToggleFavoriteRequest, ToggleFavoriteResponse,
    FAVORITE_ITEM_TYPES,
};
use crate::sync::{create_non_blocking, delete_non_blocking, ErrorBus};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;

/// Flip the bookmark for one item: absent -> created, present -> removed.
/// The read decides the direction; the write itself is non-blocking, so a
/// double toggle lands back on the original state.
pub async fn toggle_favorite(
    db: &MongoDB,
    bus: &ErrorBus,
    user_id: &str,
    request: &ToggleFavoriteRequest,
) -> Result<ToggleFavoriteResponse, String> {
    if !FAVORITE_ITEM_TYPES.contains(&request.item_type.as_str()) {
        return Err(format!(
            "Invalid item type: {}. Supported: trial, publication, expert",
            request.item_type
        ));
    }
    if request.item_id.trim().is_empty() {
        return Err("An item id is required.".to_string());
    }

    let collection = db.collection::<Favorite>("favorites");
    let filter = doc! {
        "user_id": user_id,
        "item_type": &request.item_type,
        "item_id": &request.item_id,
    };

    let existing = collection
        .find_one(filter.clone())
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let favorited = if existing.is_some() {
        delete_non_blocking(&collection, filter, bus);
        false
    } else {
        let favorite = Favorite {
            id: None,
            user_id: user_id.to_string(),
            item_type: request.item_type.clone(),
            item_id: request.item_id.clone(),
            created_at: Utc::now().timestamp(),
        };
        create_non_blocking(&collection, favorite, bus);
        true
    };

    Ok(ToggleFavoriteResponse {
        success: true,
        item_type: request.item_type.clone(),
        item_id: request.item_id.clone(),
        favorited,
    })
}

/// All of a user's saved items, most recent first
pub async fn list_favorites(
    db: &MongoDB,
    user_id: &str,
) -> Result<Vec<FavoriteResponse>, String> {
    let collection = db.collection::<Favorite>("favorites");

    let favorites: Vec<Favorite> = collection
        .find(doc! { "user_id": user_id })
        .sort(doc! { "created_at": -1 })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .try_collect()
        .await
        .map_err(|e| format!("Failed to decode favorites: {}", e))?;

    Ok(favorites.into_iter().map(FavoriteResponse::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_item_type_rejected() {
        let client = mongodb::Client::with_uri_str(
            "mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=100",
        )
        .await
        .unwrap();
        let db = MongoDB::from_client_for_tests(client, "curalink_test");

        let request = ToggleFavoriteRequest {
            item_type: "forum".to_string(),
            item_id: "forum-1".to_string(),
        };

        let result = toggle_favorite(&db, &ErrorBus::new(), "patient-1", &request).await;
        assert!(result.unwrap_err().starts_with("Invalid item type"));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_double_toggle_returns_to_original_state() {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/curalink_test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();
        let bus = ErrorBus::new();

        let request = ToggleFavoriteRequest {
            item_type: "trial".to_string(),
            item_id: "trial-toggle-test".to_string(),
        };

        let first = toggle_favorite(&db, &bus, "patient-parity", &request)
            .await
            .unwrap();
        assert!(first.favorited);
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let second = toggle_favorite(&db, &bus, "patient-parity", &request)
            .await
            .unwrap();
        assert!(!second.favorited);
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let remaining = db
            .collection::<Favorite>("favorites")
            .count_documents(doc! { "user_id": "patient-parity" })
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
