use crate::database::MongoDB;
use crate::models::{
    PatientProfile, PatientProfileRequest, ResearcherProfile, ResearcherProfileRequest,
};
use crate::sync::{set_non_blocking, ErrorBus};
use mongodb::bson::{doc, to_document, DateTime as BsonDateTime};

/// Splits a display name into (first, last) the way the profile forms do
pub fn split_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or("").to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

pub async fn get_patient_profile(
    db: &MongoDB,
    user_id: &str,
) -> Result<Option<PatientProfile>, String> {
    let collection = db.collection::<PatientProfile>("patient_profiles");

    collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| format!("Database error: {}", e))
}

pub async fn get_researcher_profile(
    db: &MongoDB,
    user_id: &str,
) -> Result<Option<ResearcherProfile>, String> {
    let collection = db.collection::<ResearcherProfile>("researcher_profiles");

    collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| format!("Database error: {}", e))
}

/// Upserts the patient profile and the account name. Both writes are
/// non-blocking: the caller gets the optimistic profile back immediately and
/// failures surface on the error bus.
pub fn upsert_patient_profile(
    db: &MongoDB,
    bus: &ErrorBus,
    user_id: &str,
    request: &PatientProfileRequest,
) -> Result<PatientProfile, String> {
    if request.name.trim().len() < 2 {
        return Err("Please enter your name.".to_string());
    }
    if request.description.trim().len() < 10 {
        return Err("Please provide a more detailed description.".to_string());
    }
    if request.location.trim().len() < 2 {
        return Err("Please enter a valid location.".to_string());
    }

    let profile = PatientProfile {
        user_id: user_id.to_string(),
        description: request.description.clone(),
        conditions: request.conditions.clone(),
        location: request.location.clone(),
    };

    let profile_doc =
        to_document(&profile).map_err(|e| format!("Failed to encode profile: {}", e))?;

    set_non_blocking(
        &db.collection::<PatientProfile>("patient_profiles"),
        doc! { "user_id": user_id },
        profile_doc,
        true,
        bus,
    );

    update_account_name(db, bus, user_id, &request.name);

    Ok(profile)
}

/// Same contract as `upsert_patient_profile`, for the researcher role
pub fn upsert_researcher_profile(
    db: &MongoDB,
    bus: &ErrorBus,
    user_id: &str,
    request: &ResearcherProfileRequest,
) -> Result<ResearcherProfile, String> {
    if request.name.trim().len() < 2 {
        return Err("Please enter your name.".to_string());
    }
    if request.bio.trim().len() < 10 {
        return Err("Please provide a professional bio.".to_string());
    }
    if request.location.trim().len() < 2 {
        return Err("Please enter your location (e.g., university, city).".to_string());
    }

    let profile = ResearcherProfile {
        user_id: user_id.to_string(),
        bio: request.bio.clone(),
        specialties: request.specialties.clone(),
        research_interests: request.research_interests.clone(),
        available_for_meetings: request.available_for_meetings,
        orcid_id: request.orcid_id.clone(),
        research_gate_id: request.research_gate_id.clone(),
        location: request.location.clone(),
    };

    let profile_doc =
        to_document(&profile).map_err(|e| format!("Failed to encode profile: {}", e))?;

    set_non_blocking(
        &db.collection::<ResearcherProfile>("researcher_profiles"),
        doc! { "user_id": user_id },
        profile_doc,
        true,
        bus,
    );

    update_account_name(db, bus, user_id, &request.name);

    Ok(profile)
}

fn update_account_name(db: &MongoDB, bus: &ErrorBus, user_id: &str, name: &str) {
    let (first_name, last_name) = split_name(name);

    set_non_blocking(
        &db.collection::<mongodb::bson::Document>("users"),
        doc! { "user_id": user_id },
        doc! {
            "first_name": first_name,
            "last_name": last_name,
            "updated_at": BsonDateTime::now(),
        },
        true,
        bus,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        assert_eq!(
            split_name("Jane Doe"),
            ("Jane".to_string(), "Doe".to_string())
        );
        assert_eq!(
            split_name("Dr. Alan Grant Jr."),
            ("Dr.".to_string(), "Alan Grant Jr.".to_string())
        );
        assert_eq!(split_name(""), ("".to_string(), "".to_string()));
    }
}
