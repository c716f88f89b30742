use serde::{Deserialize, Serialize};

/// Patient profile (one document per user, keyed by `user_id`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    pub user_id: String,

    /// Free-text story written by the patient
    #[serde(default)]
    pub description: String,

    /// Extracted + manually added conditions. Order is preserved; the list is
    /// not deduplicated across sessions.
    #[serde(default)]
    pub conditions: Vec<String>,

    #[serde(default)]
    pub location: String,
}

/// Researcher profile (one document per user, keyed by `user_id`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearcherProfile {
    pub user_id: String,

    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub research_interests: Vec<String>,
    #[serde(default)]
    pub available_for_meetings: bool,

    #[serde(default)]
    pub orcid_id: String,
    #[serde(default)]
    pub research_gate_id: String,
    #[serde(default)]
    pub location: String,
}

/// Directory view of a researcher: `users` record joined with the
/// researcher profile. Also the shape of the seeded fallback experts.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Expert {
    pub id: String,
    pub name: String,
    pub specialties: Vec<String>,
    pub research_interests: Vec<String>,
    pub available_for_meetings: bool,
}

/// Request para criar/atualizar perfil de paciente
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PatientProfileRequest {
    pub name: String,
    pub description: String,
    pub conditions: Vec<String>,
    pub location: String,
}

/// Request para criar/atualizar perfil de pesquisador
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ResearcherProfileRequest {
    pub name: String,
    pub bio: String,
    pub specialties: Vec<String>,
    pub research_interests: Vec<String>,
    #[serde(default)]
    pub available_for_meetings: bool,
    #[serde(default)]
    pub orcid_id: String,
    #[serde(default)]
    pub research_gate_id: String,
    #[serde(default)]
    pub location: String,
}
