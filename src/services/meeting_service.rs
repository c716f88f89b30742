use crate::database::MongoDB;
use crate::models::{
    CreateMeetingRequest, MeetingRequest, MeetingRequestResponse, MeetingStatus,
    UpdateMeetingStatusRequest, UserType,
};
use crate::services::auth_service::Claims;
use crate::sync::{create_non_blocking, update_non_blocking, ErrorBus};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};

/// Patient requests a meeting with a researcher. The write is non-blocking:
/// the dialog closes immediately and a failed insert surfaces on the bus.
pub fn create_meeting_request(
    db: &MongoDB,
    bus: &ErrorBus,
    claims: &Claims,
    request: &CreateMeetingRequest,
) -> Result<(), String> {
    if claims.user_type != UserType::Patient {
        return Err("Only patients can request meetings.".to_string());
    }
    if request.researcher_id.trim().is_empty() {
        return Err("A researcher id is required.".to_string());
    }
    if request.request_time <= Utc::now().timestamp() {
        return Err("Please pick a meeting time in the future.".to_string());
    }

    let meeting = MeetingRequest {
        id: None,
        patient_id: claims.sub.clone(),
        researcher_id: request.researcher_id.clone(),
        request_time: request.request_time,
        status: MeetingStatus::Pending,
        created_at: Utc::now().timestamp(),
    };

    create_non_blocking(
        &db.collection::<MeetingRequest>("meeting_requests"),
        meeting,
        bus,
    );

    Ok(())
}

/// Researcher's inbox: own requests still awaiting a decision
pub async fn list_pending_requests(
    db: &MongoDB,
    researcher_id: &str,
) -> Result<Vec<MeetingRequestResponse>, String> {
    let collection = db.collection::<MeetingRequest>("meeting_requests");

    let requests: Vec<MeetingRequest> = collection
        .find(doc! { "researcher_id": researcher_id, "status": "pending" })
        .sort(doc! { "request_time": 1 })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .try_collect()
        .await
        .map_err(|e| format!("Failed to decode meeting requests: {}", e))?;

    Ok(requests
        .into_iter()
        .map(MeetingRequestResponse::from)
        .collect())
}

/// Researcher accepts or rejects a pending request. The current status is
/// re-read and the transition validated before anything is written, so a
/// terminal request can never be flipped back or overwritten.
pub async fn update_meeting_status(
    db: &MongoDB,
    bus: &ErrorBus,
    claims: &Claims,
    meeting_id: &str,
    request: &UpdateMeetingStatusRequest,
) -> Result<MeetingRequestResponse, String> {
    if claims.user_type != UserType::Researcher {
        return Err("Only researchers can respond to meeting requests.".to_string());
    }

    let oid = ObjectId::parse_str(meeting_id)
        .map_err(|_| format!("Invalid meeting request id: {}", meeting_id))?;

    let collection = db.collection::<MeetingRequest>("meeting_requests");

    let meeting = collection
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Meeting request {} not found", meeting_id))?;

    if meeting.researcher_id != claims.sub {
        return Err("You can only respond to your own meeting requests.".to_string());
    }

    if !meeting.status.can_transition_to(request.status) {
        return Err(format!(
            "Meeting request is already {} and cannot change to {}.",
            meeting.status, request.status
        ));
    }

    update_non_blocking(
        &collection,
        doc! { "_id": oid, "status": "pending" },
        doc! { "status": request.status.to_string() },
        bus,
    );

    log::info!(
        "📅 Meeting request {} {} by {}",
        meeting_id,
        request.status,
        claims.sub
    );

    let mut updated = meeting;
    updated.status = request.status;
    Ok(updated.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(user_type: UserType) -> Claims {
        Claims {
            sub: "user-1".to_string(),
            email: "u@example.com".to_string(),
            user_type,
            iat: 0,
            exp: usize::MAX,
            jti: "test".to_string(),
            aud: "curalink-api".to_string(),
            iss: "curalink-service".to_string(),
        }
    }

    async fn offline_db() -> MongoDB {
        let client = mongodb::Client::with_uri_str(
            "mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=100",
        )
        .await
        .unwrap();
        MongoDB::from_client_for_tests(client, "curalink_test")
    }

    #[tokio::test]
    async fn test_researcher_cannot_create_request() {
        let db = offline_db().await;
        let request = CreateMeetingRequest {
            researcher_id: "researcher-1".to_string(),
            request_time: Utc::now().timestamp() + 3600,
        };

        let result = create_meeting_request(
            &db,
            &ErrorBus::new(),
            &claims(UserType::Researcher),
            &request,
        );
        assert_eq!(result.unwrap_err(), "Only patients can request meetings.");
    }

    #[tokio::test]
    async fn test_past_meeting_time_rejected() {
        let db = offline_db().await;
        let request = CreateMeetingRequest {
            researcher_id: "researcher-1".to_string(),
            request_time: Utc::now().timestamp() - 60,
        };

        let result = create_meeting_request(
            &db,
            &ErrorBus::new(),
            &claims(UserType::Patient),
            &request,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_terminal_status_cannot_be_overwritten() {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/curalink_test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();
        let bus = ErrorBus::new();
        let collection = db.collection::<MeetingRequest>("meeting_requests");

        let inserted = collection
            .insert_one(MeetingRequest {
                id: None,
                patient_id: "patient-1".to_string(),
                researcher_id: "user-1".to_string(),
                request_time: Utc::now().timestamp() + 3600,
                status: MeetingStatus::Pending,
                created_at: Utc::now().timestamp(),
            })
            .await
            .unwrap();
        let id = inserted.inserted_id.as_object_id().unwrap().to_hex();

        let researcher = claims(UserType::Researcher);

        // pending -> accepted succeeds
        let accept = UpdateMeetingStatusRequest {
            status: MeetingStatus::Accepted,
        };
        update_meeting_status(&db, &bus, &researcher, &id, &accept)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        // accepted -> rejected (or anything else) must fail
        let reject = UpdateMeetingStatusRequest {
            status: MeetingStatus::Rejected,
        };
        let result = update_meeting_status(&db, &bus, &researcher, &id, &reject).await;
        assert!(result.is_err());

        let stored = collection
            .find_one(doc! { "_id": ObjectId::parse_str(&id).unwrap() })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, MeetingStatus::Accepted);

        collection
            .delete_one(doc! { "_id": ObjectId::parse_str(&id).unwrap() })
            .await
            .unwrap();
    }
}
