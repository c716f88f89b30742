use serde::{Deserialize, Serialize};

/// Clinical trial (read-mostly; fetched from the registry or seeded).
/// `id` is the NCT number when sourced from ClinicalTrials.gov.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ClinicalTrial {
    pub id: String,
    pub title: String,

    /// "Recruiting" | "Completed" | "Not yet recruiting"
    pub status: String,

    pub location: String,
    pub details: String,
    pub contact_email: String,
    pub keywords: Vec<String>,
}
