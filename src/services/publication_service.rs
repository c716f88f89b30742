use crate::models::Publication;
use crate::seeds;
use serde::Deserialize;

const EUTILS_API_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Hardcoded result-size cap for literature fetches
const PUBMED_RESULT_CAP: u32 = 10;

/// Default search when the caller gives no term
const DEFAULT_QUERY: &str = "clinical trial patient outcomes";

#[derive(Debug, Deserialize)]
struct EsearchResponse {
    esearchresult: EsearchResult,
}

#[derive(Debug, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// Extracts publications from a PubMed esummary JSON payload. The `result`
/// object is keyed by PMID with a sibling `uids` array giving the order.
fn parse_esummary(body: &str) -> Result<Vec<Publication>, String> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| format!("Failed to parse esummary: {}", e))?;

    let result = value
        .get("result")
        .ok_or_else(|| "esummary payload missing 'result'".to_string())?;

    let uids = result
        .get("uids")
        .and_then(|u| u.as_array())
        .ok_or_else(|| "esummary payload missing 'uids'".to_string())?;

    let mut publications = Vec::new();
    for uid in uids {
        let Some(pmid) = uid.as_str() else { continue };
        let Some(entry) = result.get(pmid) else { continue };

        let title = entry
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();
        if title.is_empty() {
            continue;
        }

        let journal = entry
            .get("fulljournalname")
            .and_then(|j| j.as_str())
            .unwrap_or_default()
            .to_string();

        // pubdate looks like "2023 Jan 5"
        let year = entry
            .get("pubdate")
            .and_then(|d| d.as_str())
            .and_then(|d| d.split_whitespace().next())
            .and_then(|y| y.parse::<i32>().ok())
            .unwrap_or(0);

        let authors = entry
            .get("authors")
            .and_then(|a| a.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|a| a.get("name").and_then(|n| n.as_str()))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        publications.push(Publication {
            id: pmid.to_string(),
            title,
            authors,
            journal,
            year,
            url: format!("https://pubmed.ncbi.nlm.nih.gov/{}/", pmid),
            summary: None,
            keywords: Vec::new(),
        });
    }

    Ok(publications)
}

/// Two-step PubMed lookup (no auth): esearch returns PMIDs, esummary returns
/// the metadata for those ids.
async fn fetch_publications(term: &str) -> Result<Vec<Publication>, String> {
    log::info!("📚 Searching PubMed for '{}'", term);

    let client = reqwest::Client::new();

    let esearch_url = format!(
        "{}/esearch.fcgi?db=pubmed&retmode=json&retmax={}&term={}",
        EUTILS_API_BASE,
        PUBMED_RESULT_CAP,
        urlencoding::encode(term)
    );

    let response = client
        .get(&esearch_url)
        .header("Accept", "application/json")
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| format!("Failed to search PubMed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("PubMed esearch error: {}", response.status()));
    }

    let search: EsearchResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse esearch response: {}", e))?;

    if search.esearchresult.idlist.is_empty() {
        return Ok(Vec::new());
    }

    let esummary_url = format!(
        "{}/esummary.fcgi?db=pubmed&retmode=json&id={}",
        EUTILS_API_BASE,
        search.esearchresult.idlist.join(",")
    );

    let response = client
        .get(&esummary_url)
        .header("Accept", "application/json")
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| format!("Failed to fetch PubMed summaries: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("PubMed esummary error: {}", response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read esummary response: {}", e))?;

    let publications = parse_esummary(&body)?;

    log::info!("✅ Retrieved {} publications from PubMed", publications.len());

    Ok(publications)
}

/// Literature fetch with seed fallback
pub async fn get_publications(search: Option<&str>) -> Vec<Publication> {
    let term = search
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_QUERY);

    match fetch_publications(term).await {
        Ok(publications) if !publications.is_empty() => publications,
        Ok(_) => {
            log::info!("ℹ️  PubMed returned no results - serving seed catalog");
            seeds::seed_publications()
        }
        Err(e) => {
            log::error!("❌ PubMed fetch failed: {} - serving seed catalog", e);
            seeds::seed_publications()
        }
    }
}

/// Case-normalized substring filter over title, authors and keywords
pub fn filter_publications(
    publications: Vec<Publication>,
    search: Option<&str>,
) -> Vec<Publication> {
    let term = search.map(|s| s.to_lowercase()).unwrap_or_default();
    if term.is_empty() {
        return publications;
    }

    publications
        .into_iter()
        .filter(|publication| {
            publication.title.to_lowercase().contains(&term)
                || publication
                    .authors
                    .iter()
                    .any(|a| a.to_lowercase().contains(&term))
                || publication
                    .keywords
                    .iter()
                    .any(|k| k.to_lowercase().contains(&term))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_publications;

    #[test]
    fn test_parse_esummary() {
        let body = r#"{
            "result": {
                "uids": ["36000001", "36000002"],
                "36000001": {
                    "title": "CAR-T Therapy Outcomes in Glioblastoma",
                    "fulljournalname": "Journal of Clinical Oncology",
                    "pubdate": "2023 Mar 14",
                    "authors": [{ "name": "Carter E" }, { "name": "Lee S" }]
                },
                "36000002": {
                    "title": "Neuroinflammation Review",
                    "fulljournalname": "Nature Neuroscience",
                    "pubdate": "2022",
                    "authors": []
                }
            }
        }"#;

        let publications = parse_esummary(body).unwrap();
        assert_eq!(publications.len(), 2);
        assert_eq!(publications[0].id, "36000001");
        assert_eq!(publications[0].year, 2023);
        assert_eq!(publications[0].authors, vec!["Carter E", "Lee S"]);
        assert_eq!(
            publications[0].url,
            "https://pubmed.ncbi.nlm.nih.gov/36000001/"
        );
        assert_eq!(publications[1].year, 2022);
    }

    #[test]
    fn test_parse_esummary_skips_entries_without_title() {
        let body = r#"{
            "result": {
                "uids": ["1", "2"],
                "1": { "title": "" },
                "2": { "title": "Kept", "pubdate": "2020" }
            }
        }"#;

        let publications = parse_esummary(body).unwrap();
        assert_eq!(publications.len(), 1);
        assert_eq!(publications[0].title, "Kept");
    }

    #[test]
    fn test_filter_by_author_substring() {
        let filtered = filter_publications(seed_publications(), Some("carter"));
        let ids: Vec<&str> = filtered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["pub-1", "pub-3"]);
    }

    #[test]
    fn test_filter_without_term_keeps_all() {
        assert_eq!(filter_publications(seed_publications(), None).len(), 4);
    }

    #[tokio::test]
    #[ignore] // Hits the live PubMed E-utilities API
    async fn test_fetch_publications_live() {
        let publications = fetch_publications("glioblastoma immunotherapy")
            .await
            .unwrap();
        assert!(!publications.is_empty());
    }
}
