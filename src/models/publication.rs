use serde::{Deserialize, Serialize};

/// Biomedical publication (read-mostly; fetched from PubMed or seeded).
/// `id` is the PMID when sourced externally.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Publication {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub journal: String,
    pub year: i32,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub keywords: Vec<String>,
}
