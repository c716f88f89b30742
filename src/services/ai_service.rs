use serde::{Deserialize, Serialize};
use serde_json::json;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Fallback when a summary cannot be produced
pub const SUMMARY_FALLBACK: &str = "Could not generate summary.";

/// Fallback when the assistant cannot answer
pub const ASSISTANT_FALLBACK: &str =
    "Sorry, I could not come up with an answer right now. Please try again.";

const ASSISTANT_SYSTEM_PROMPT: &str = "You are a friendly and helpful AI assistant for CuraLink, \
a platform that connects patients and researchers. Your role is to answer user questions about \
the platform's features and guide them on how to use it. Be concise and helpful.\n\n\
Here are the platform's main features:\n\
- Patients can find clinical trials, connect with health experts, and read simplified research papers.\n\
- Researchers can manage their trials, find collaborators, and answer patient questions in forums.\n\
- Both can save their favorite items.";

/// One turn of assistant conversation history
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatTurn {
    /// "user" | "model"
    pub role: String,
    pub content: String,
}

// generateContent response shape (only the fields we read)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

// Structured output of the condition-extraction prompt
#[derive(Debug, Deserialize)]
struct ConditionsOutput {
    #[serde(rename = "medicalConditions", default)]
    medical_conditions: Vec<String>,
}

/// Thin wrapper over the hosted model's generateContent endpoint. Every
/// operation is a single attempt - no retry, no backoff - and every failure
/// degrades to a safe default instead of reaching the caller as an error.
#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AiClient {
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            log::warn!("⚠️ GEMINI_API_KEY not set - AI features will serve fallbacks");
        }
        Self::new(api_key)
    }

    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GEMINI_API_BASE.to_string(),
            api_key,
            model: GEMINI_MODEL.to_string(),
        }
    }

    /// Point at a different endpoint (used by tests to simulate failures)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate(
        &self,
        system: Option<&str>,
        contents: serde_json::Value,
        json_output: bool,
    ) -> Result<String, String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let mut body = json!({ "contents": contents });
        if let Some(system) = system {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        if json_output {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let response = self
            .http
            .post(&url)
            .json(&body)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| format!("Failed to reach model API: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Model API error: {}", response.status()));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse model response: {}", e))?;

        let text = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.is_empty() {
            return Err("Model returned no text".to_string());
        }

        Ok(text)
    }

    fn user_prompt(text: String) -> serde_json::Value {
        json!([{ "role": "user", "parts": [{ "text": text }] }])
    }

    /// Extracts medical conditions from a patient's free-text story. Empty or
    /// whitespace-only input returns an empty list without invoking the
    /// model; so does any invocation or schema failure.
    pub async fn detect_conditions(&self, description: &str) -> Vec<String> {
        if description.trim().is_empty() {
            return Vec::new();
        }

        match self.extract_conditions(description).await {
            Ok(conditions) => {
                log::info!("🩺 Detected {} conditions", conditions.len());
                conditions
            }
            Err(e) => {
                log::error!("❌ Error detecting patient conditions: {}", e);
                Vec::new()
            }
        }
    }

    async fn extract_conditions(&self, description: &str) -> Result<Vec<String>, String> {
        let prompt = format!(
            "You are a medical expert. Extract the medical conditions from the following \
             patient description. Respond with JSON of the form \
             {{\"medicalConditions\": [\"...\"]}}.\n\nPatient description: {}",
            description
        );

        let text = self
            .generate(None, Self::user_prompt(prompt), true)
            .await?;

        let output: ConditionsOutput = serde_json::from_str(&text)
            .map_err(|e| format!("Model output did not match schema: {}", e))?;

        Ok(output.medical_conditions)
    }

    /// Concise summary of clinical trial details, or the fixed fallback
    pub async fn summarize_trial(&self, details: &str) -> String {
        if details.trim().is_empty() {
            return SUMMARY_FALLBACK.to_string();
        }

        let prompt = format!(
            "You are an expert medical summarizer. Please provide a concise summary of the \
             following clinical trial details:\n\n{}",
            details
        );

        match self.generate(None, Self::user_prompt(prompt), false).await {
            Ok(summary) => summary,
            Err(e) => {
                log::error!("❌ Error summarizing clinical trial: {}", e);
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    /// Concise summary of a publication, or the fixed fallback
    pub async fn summarize_publication(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return SUMMARY_FALLBACK.to_string();
        }

        let prompt = format!(
            "Summarize the following publication text in a concise and informative manner:\n\n{}",
            text
        );

        match self.generate(None, Self::user_prompt(prompt), false).await {
            Ok(summary) => summary,
            Err(e) => {
                log::error!("❌ Error summarizing publication: {}", e);
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    /// Platform assistant: answers a question given the conversation so far
    pub async fn ask_assistant(&self, question: &str, history: &[ChatTurn]) -> String {
        if question.trim().is_empty() {
            return ASSISTANT_FALLBACK.to_string();
        }

        let mut contents: Vec<serde_json::Value> = history
            .iter()
            .map(|turn| {
                let role = if turn.role == "model" { "model" } else { "user" };
                json!({ "role": role, "parts": [{ "text": turn.content }] })
            })
            .collect();
        contents.push(json!({ "role": "user", "parts": [{ "text": question }] }));

        match self
            .generate(
                Some(ASSISTANT_SYSTEM_PROMPT),
                serde_json::Value::Array(contents),
                false,
            )
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                log::error!("❌ Assistant error: {}", e);
                ASSISTANT_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens here, so every model call fails fast
    fn failing_client() -> AiClient {
        AiClient::new("test-key".to_string()).with_base_url("http://127.0.0.1:9")
    }

    #[tokio::test]
    async fn test_empty_description_returns_empty_without_model_call() {
        let client = failing_client();
        assert!(client.detect_conditions("").await.is_empty());
        assert!(client.detect_conditions("   \n\t ").await.is_empty());
    }

    #[tokio::test]
    async fn test_detect_conditions_failure_returns_empty_list() {
        let client = failing_client();
        let conditions = client
            .detect_conditions("I was diagnosed with brain cancer two years ago")
            .await;
        assert!(conditions.is_empty());
    }

    #[tokio::test]
    async fn test_trial_summary_failure_returns_fallback() {
        let client = failing_client();
        let summary = client.summarize_trial("A phase II trial of...").await;
        assert_eq!(summary, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_publication_summary_failure_returns_fallback() {
        let client = failing_client();
        let summary = client.summarize_publication("This landmark study...").await;
        assert_eq!(summary, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_assistant_failure_returns_fallback() {
        let client = failing_client();
        let history = vec![ChatTurn {
            role: "user".to_string(),
            content: "Hi!".to_string(),
        }];
        let answer = client.ask_assistant("How do I find trials?", &history).await;
        assert_eq!(answer, ASSISTANT_FALLBACK);
    }

    #[test]
    fn test_conditions_output_schema() {
        let output: ConditionsOutput =
            serde_json::from_str(r#"{"medicalConditions": ["Glioma", "Lung Cancer"]}"#).unwrap();
        assert_eq!(output.medical_conditions, vec!["Glioma", "Lung Cancer"]);

        // missing key decodes to an empty list rather than failing
        let output: ConditionsOutput = serde_json::from_str("{}").unwrap();
        assert!(output.medical_conditions.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires GEMINI_API_KEY and network access
    async fn test_detect_conditions_live() {
        dotenv::dotenv().ok();
        let client = AiClient::from_env();
        let conditions = client
            .detect_conditions("I was diagnosed with glioma and also have asthma.")
            .await;
        assert!(!conditions.is_empty());
    }
}
