use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        // Timeouts
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("curalink");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        // 🚀 Create indexes for performance
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        // Index for users: unique (email) - signup duplicate check
        let users = self.database().collection::<mongodb::bson::Document>("users");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for users: (user_type) - expert directory listing
        let user_type_index = IndexModel::builder()
            .keys(doc! { "user_type": 1 })
            .build();

        match users.create_index(user_type_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(user_type)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Indexes for profiles: unique (user_id) - one profile per user per role
        for name in ["patient_profiles", "researcher_profiles"] {
            let profiles = self.database().collection::<mongodb::bson::Document>(name);

            let profile_index = IndexModel::builder()
                .keys(doc! { "user_id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();

            match profiles.create_index(profile_index).await {
                Ok(_) => log::info!("   ✅ Index created: {}(user_id) unique", name),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        // Index for forums: (name) - forum list is ordered by name
        let forums = self.database().collection::<mongodb::bson::Document>("forums");

        let forums_index = IndexModel::builder().keys(doc! { "name": 1 }).build();

        match forums.create_index(forums_index).await {
            Ok(_) => log::info!("   ✅ Index created: forums(name)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for posts: (forum_id, timestamp) - thread view, ascending order
        let posts = self.database().collection::<mongodb::bson::Document>("posts");

        let posts_index = IndexModel::builder()
            .keys(doc! { "forum_id": 1, "timestamp": 1 })
            .build();

        match posts.create_index(posts_index).await {
            Ok(_) => log::info!("   ✅ Index created: posts(forum_id, timestamp)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for meeting_requests: (researcher_id, status) - pending inbox
        let meetings = self
            .database()
            .collection::<mongodb::bson::Document>("meeting_requests");

        let meetings_index = IndexModel::builder()
            .keys(doc! { "researcher_id": 1, "status": 1 })
            .build();

        match meetings.create_index(meetings_index).await {
            Ok(_) => log::info!("   ✅ Index created: meeting_requests(researcher_id, status)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for favorites: (user_id, item_type, item_id) - toggle lookup
        let favorites = self
            .database()
            .collection::<mongodb::bson::Document>("favorites");

        let favorites_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "item_type": 1, "item_id": 1 })
            .build();

        match favorites.create_index(favorites_index).await {
            Ok(_) => log::info!("   ✅ Index created: favorites(user_id, item_type, item_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    /// Wraps an already-built client without connecting or creating indexes
    #[cfg(test)]
    pub fn from_client_for_tests(client: Client, db_name: &str) -> Self {
        let db = client.database(db_name);
        Self { client, db }
    }

    /// Check if the connection is healthy
    pub async fn health_check(&self) -> bool {
        self.db.list_collection_names().await.is_ok()
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
