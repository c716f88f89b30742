use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role. Every user is exactly one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Patient,
    Researcher,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Patient => write!(f, "patient"),
            UserType::Researcher => write!(f, "researcher"),
        }
    }
}

/// User account (stored in the `users` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// PRIMARY IDENTIFIER - referenced by profiles, posts, meetings, favorites
    pub user_id: String,

    pub user_type: UserType,
    pub email: String,

    /// bcrypt hash
    pub password: String,

    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,

    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
