use crate::database::MongoDB;
use crate::models::{Expert, ResearcherProfile, User};
use crate::seeds;
use crate::sync::{ErrorBus, PermissionError, StoreOperation};
use futures::TryStreamExt;
use mongodb::bson::doc;

/// Directory of researchers: every `users` record with the researcher role,
/// joined with its profile. A failed profile read is reported on the error
/// bus and that expert is skipped; a failed directory read falls back to the
/// seed experts so the page still renders.
pub async fn list_experts(db: &MongoDB, bus: &ErrorBus) -> Vec<Expert> {
    let users = db.collection::<User>("users");

    let researcher_users: Vec<User> = match users
        .find(doc! { "user_type": "researcher" })
        .await
    {
        Ok(cursor) => match cursor.try_collect().await {
            Ok(list) => list,
            Err(e) => {
                log::error!("❌ Failed to decode researcher users: {} - serving seed experts", e);
                bus.publish(PermissionError {
                    operation: StoreOperation::List,
                    path: "users".to_string(),
                    message: e.to_string(),
                });
                return seeds::seed_experts();
            }
        },
        Err(e) => {
            log::error!("❌ Failed to list researchers: {} - serving seed experts", e);
            bus.publish(PermissionError {
                operation: StoreOperation::List,
                path: "users".to_string(),
                message: e.to_string(),
            });
            return seeds::seed_experts();
        }
    };

    let profiles = db.collection::<ResearcherProfile>("researcher_profiles");
    let mut experts = Vec::new();

    for user in researcher_users {
        let path = format!("users/{}/researcher_profile", user.user_id);

        match profiles.find_one(doc! { "user_id": &user.user_id }).await {
            Ok(Some(profile)) => experts.push(Expert {
                id: user.user_id.clone(),
                name: user.display_name(),
                specialties: profile.specialties,
                research_interests: profile.research_interests,
                available_for_meetings: profile.available_for_meetings,
            }),
            Ok(None) => {
                // registered but never filled in a profile - not listed
            }
            Err(e) => {
                log::error!("❌ Could not fetch profile for {}: {}", path, e);
                bus.publish(PermissionError {
                    operation: StoreOperation::Get,
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    experts
}

/// Case-normalized substring filter over name, specialties and interests
pub fn filter_experts(experts: Vec<Expert>, search: Option<&str>) -> Vec<Expert> {
    let term = search.map(|s| s.to_lowercase()).unwrap_or_default();
    if term.is_empty() {
        return experts;
    }

    experts
        .into_iter()
        .filter(|expert| {
            expert.name.to_lowercase().contains(&term)
                || expert
                    .specialties
                    .iter()
                    .any(|s| s.to_lowercase().contains(&term))
                || expert
                    .research_interests
                    .iter()
                    .any(|i| i.to_lowercase().contains(&term))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_experts;

    #[test]
    fn test_filter_by_specialty() {
        let filtered = filter_experts(seed_experts(), Some("oncology"));
        let ids: Vec<&str> = filtered.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["researcher-1", "researcher-4"]);
    }

    #[test]
    fn test_filter_by_name() {
        let filtered = filter_experts(seed_experts(), Some("adams"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "researcher-2");
    }

    #[test]
    fn test_filter_without_term_keeps_all() {
        assert_eq!(filter_experts(seed_experts(), None).len(), 4);
    }
}
