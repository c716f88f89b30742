use crate::models::ClinicalTrial;
use crate::seeds;
use serde::Deserialize;

const CLINICALTRIALS_API_BASE: &str = "https://clinicaltrials.gov/api/v2";

/// Hardcoded result-size cap for registry fetches
const TRIALS_PAGE_SIZE: u32 = 20;

// ClinicalTrials.gov v2 study shape (only the fields we read)
#[derive(Debug, Deserialize)]
struct StudiesResponse {
    #[serde(default)]
    studies: Vec<Study>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Study {
    protocol_section: ProtocolSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProtocolSection {
    identification_module: IdentificationModule,
    #[serde(default)]
    status_module: Option<StatusModule>,
    #[serde(default)]
    description_module: Option<DescriptionModule>,
    #[serde(default)]
    conditions_module: Option<ConditionsModule>,
    #[serde(default)]
    contacts_locations_module: Option<ContactsLocationsModule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentificationModule {
    nct_id: String,
    #[serde(default)]
    brief_title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusModule {
    #[serde(default)]
    overall_status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptionModule {
    #[serde(default)]
    brief_summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConditionsModule {
    #[serde(default)]
    conditions: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactsLocationsModule {
    #[serde(default)]
    central_contacts: Vec<CentralContact>,
    #[serde(default)]
    locations: Vec<TrialLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CentralContact {
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrialLocation {
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
}

/// Registry statuses are SCREAMING_SNAKE; the catalog uses display casing
fn map_status(raw: &str) -> String {
    match raw {
        "RECRUITING" => "Recruiting".to_string(),
        "COMPLETED" => "Completed".to_string(),
        "NOT_YET_RECRUITING" => "Not yet recruiting".to_string(),
        other => other.to_string(),
    }
}

fn map_study(study: Study) -> ClinicalTrial {
    let section = study.protocol_section;

    let status = section
        .status_module
        .map(|m| map_status(&m.overall_status))
        .unwrap_or_default();

    let details = section
        .description_module
        .map(|m| m.brief_summary)
        .unwrap_or_default();

    let (conditions, registry_keywords) = section
        .conditions_module
        .map(|m| (m.conditions, m.keywords))
        .unwrap_or_default();
    let mut keywords = conditions;
    keywords.extend(registry_keywords);

    let (contact_email, location) = section
        .contacts_locations_module
        .map(|m| {
            let email = m
                .central_contacts
                .into_iter()
                .map(|c| c.email)
                .find(|e| !e.is_empty())
                .unwrap_or_default();
            let location = m
                .locations
                .into_iter()
                .next()
                .map(|l| {
                    if l.country.is_empty() {
                        l.city
                    } else if l.city.is_empty() {
                        l.country
                    } else {
                        format!("{}, {}", l.city, l.country)
                    }
                })
                .unwrap_or_default();
            (email, location)
        })
        .unwrap_or_default();

    ClinicalTrial {
        id: section.identification_module.nct_id,
        title: section.identification_module.brief_title,
        status,
        location,
        details,
        contact_email,
        keywords,
    }
}

fn parse_studies_response(body: &str) -> Result<Vec<ClinicalTrial>, String> {
    let response: StudiesResponse = serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse ClinicalTrials.gov response: {}", e))?;

    Ok(response.studies.into_iter().map(map_study).collect())
}

/// Busca estudos em recrutamento no ClinicalTrials.gov (sem autenticação)
async fn fetch_recruiting_trials(search: Option<&str>) -> Result<Vec<ClinicalTrial>, String> {
    let mut url = format!(
        "{}/studies?filter.overallStatus=RECRUITING&pageSize={}",
        CLINICALTRIALS_API_BASE, TRIALS_PAGE_SIZE
    );
    if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
        url.push_str(&format!("&query.term={}", urlencoding::encode(term)));
    }

    log::info!("🔬 Fetching recruiting trials from ClinicalTrials.gov");

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| format!("Failed to fetch trials: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("ClinicalTrials.gov API error: {}", response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read trials response: {}", e))?;

    let trials = parse_studies_response(&body)?;

    log::info!("✅ Retrieved {} trials from registry", trials.len());

    Ok(trials)
}

/// Registry fetch with seed fallback: browsing never comes back empty-handed
/// because the registry is down.
pub async fn get_clinical_trials(search: Option<&str>) -> Vec<ClinicalTrial> {
    match fetch_recruiting_trials(search).await {
        Ok(trials) if !trials.is_empty() => trials,
        Ok(_) => {
            log::info!("ℹ️  Registry returned no trials - serving seed catalog");
            seeds::seed_trials()
        }
        Err(e) => {
            log::error!("❌ Trial registry fetch failed: {} - serving seed catalog", e);
            seeds::seed_trials()
        }
    }
}

/// Case-normalized substring filter over title + keywords, plus exact status
pub fn filter_trials(
    trials: Vec<ClinicalTrial>,
    search: Option<&str>,
    status: Option<&str>,
) -> Vec<ClinicalTrial> {
    let term = search.map(|s| s.to_lowercase()).unwrap_or_default();
    let status = status.unwrap_or("all");

    trials
        .into_iter()
        .filter(|trial| {
            let matches_search = term.is_empty()
                || trial.title.to_lowercase().contains(&term)
                || trial
                    .keywords
                    .iter()
                    .any(|k| k.to_lowercase().contains(&term));
            let matches_status = status == "all" || status.is_empty() || trial.status == status;
            matches_search && matches_status
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_trials;

    #[test]
    fn test_map_status() {
        assert_eq!(map_status("RECRUITING"), "Recruiting");
        assert_eq!(map_status("COMPLETED"), "Completed");
        assert_eq!(map_status("NOT_YET_RECRUITING"), "Not yet recruiting");
        assert_eq!(map_status("TERMINATED"), "TERMINATED");
    }

    #[test]
    fn test_parse_studies_response() {
        let body = r#"{
            "studies": [{
                "protocolSection": {
                    "identificationModule": {
                        "nctId": "NCT01234567",
                        "briefTitle": "Immunotherapy Study"
                    },
                    "statusModule": { "overallStatus": "RECRUITING" },
                    "descriptionModule": { "briefSummary": "A phase II trial." },
                    "conditionsModule": {
                        "conditions": ["Glioblastoma"],
                        "keywords": ["Immunotherapy"]
                    },
                    "contactsLocationsModule": {
                        "centralContacts": [{ "email": "study@example.com" }],
                        "locations": [{ "city": "Boston", "country": "United States" }]
                    }
                }
            }]
        }"#;

        let trials = parse_studies_response(body).unwrap();
        assert_eq!(trials.len(), 1);
        let trial = &trials[0];
        assert_eq!(trial.id, "NCT01234567");
        assert_eq!(trial.status, "Recruiting");
        assert_eq!(trial.location, "Boston, United States");
        assert_eq!(trial.contact_email, "study@example.com");
        assert_eq!(trial.keywords, vec!["Glioblastoma", "Immunotherapy"]);
    }

    #[test]
    fn test_parse_tolerates_missing_modules() {
        let body = r#"{
            "studies": [{
                "protocolSection": {
                    "identificationModule": { "nctId": "NCT00000001" }
                }
            }]
        }"#;

        let trials = parse_studies_response(body).unwrap();
        assert_eq!(trials[0].id, "NCT00000001");
        assert!(trials[0].keywords.is_empty());
    }

    #[test]
    fn test_filter_by_keyword_substring() {
        let filtered = filter_trials(seed_trials(), Some("immunotherapy"), None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "trial-1");
    }

    #[test]
    fn test_filter_by_status() {
        let filtered = filter_trials(seed_trials(), None, Some("Recruiting"));
        let ids: Vec<&str> = filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["trial-1", "trial-3"]);
    }

    #[test]
    fn test_filter_all_passes_everything() {
        assert_eq!(filter_trials(seed_trials(), None, Some("all")).len(), 4);
    }

    #[tokio::test]
    #[ignore] // Hits the live ClinicalTrials.gov API
    async fn test_fetch_recruiting_trials_live() {
        let trials = fetch_recruiting_trials(Some("glioblastoma")).await.unwrap();
        assert!(!trials.is_empty());
        assert!(trials.iter().all(|t| t.id.starts_with("NCT")));
    }
}
