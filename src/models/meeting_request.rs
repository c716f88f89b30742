use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Meeting request lifecycle. `pending` is the only non-terminal state:
/// pending -> accepted or pending -> rejected, never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Pending,
    Accepted,
    Rejected,
}

impl MeetingStatus {
    /// Valid transitions: only out of `pending`, into a terminal state.
    pub fn can_transition_to(self, next: MeetingStatus) -> bool {
        matches!(
            (self, next),
            (MeetingStatus::Pending, MeetingStatus::Accepted)
                | (MeetingStatus::Pending, MeetingStatus::Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, MeetingStatus::Pending)
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingStatus::Pending => write!(f, "pending"),
            MeetingStatus::Accepted => write!(f, "accepted"),
            MeetingStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Meeting request (stored in the `meeting_requests` collection). Created
/// only by the patient; status mutated only by the researcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub patient_id: String,
    pub researcher_id: String,

    /// Requested meeting time (Unix timestamp)
    pub request_time: i64,

    pub status: MeetingStatus,

    /// Unix timestamp
    pub created_at: i64,
}

/// Request para solicitar reunião (paciente -> pesquisador)
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateMeetingRequest {
    pub researcher_id: String,
    pub request_time: i64,
}

/// Request para aceitar/rejeitar reunião
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateMeetingStatusRequest {
    pub status: MeetingStatus,
}

/// Response de solicitação de reunião
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MeetingRequestResponse {
    pub id: String,
    pub patient_id: String,
    pub researcher_id: String,
    pub request_time: i64,
    pub status: MeetingStatus,
    pub created_at: i64,
}

impl From<MeetingRequest> for MeetingRequestResponse {
    fn from(request: MeetingRequest) -> Self {
        MeetingRequestResponse {
            id: request.id.map(|id| id.to_hex()).unwrap_or_default(),
            patient_id: request.patient_id,
            researcher_id: request.researcher_id,
            request_time: request.request_time,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert!(MeetingStatus::Pending.can_transition_to(MeetingStatus::Accepted));
        assert!(MeetingStatus::Pending.can_transition_to(MeetingStatus::Rejected));
        assert!(!MeetingStatus::Pending.can_transition_to(MeetingStatus::Pending));
    }

    #[test]
    fn test_terminal_states_frozen() {
        for terminal in [MeetingStatus::Accepted, MeetingStatus::Rejected] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(MeetingStatus::Pending));
            assert!(!terminal.can_transition_to(MeetingStatus::Accepted));
            assert!(!terminal.can_transition_to(MeetingStatus::Rejected));
        }
    }
}
