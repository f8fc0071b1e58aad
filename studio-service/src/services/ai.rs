/// LLM-backed helpers: email parsing, rate suggestion, content repurposing
///
/// Thin proxy over two hosted providers. Structured helpers ask the model
/// for JSON; when the model's output cannot be decoded, the caller receives
/// a soft `parse_failed` outcome carrying the raw text instead of an HTTP
/// error.
use crate::config::AiConfig;
use crate::error::{AppError, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const OPENAI_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_MESSAGES_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Result of a structured AI helper call.
#[derive(Debug)]
pub enum AiOutcome<T> {
    Parsed(T),
    /// Model replied but the reply was not decodable; surfaced to the
    /// caller as a soft failure with the raw text.
    ParseFailed { raw: String },
}

/// Sponsorship terms extracted from a brand email.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParsedEmail {
    pub brand_name: Option<String>,
    pub contact_email: Option<String>,
    pub offer_amount: Option<f64>,
    #[serde(default)]
    pub deliverables: Vec<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateSuggestion {
    pub low: f64,
    pub high: f64,
    pub recommended: f64,
    pub rationale: Option<String>,
}

#[derive(Clone)]
pub struct AiService {
    http: Client,
    config: AiConfig,
}

impl AiService {
    pub fn new(config: AiConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    pub fn provider(&self) -> &str {
        &self.config.provider
    }

    /// Parse a pasted (or fetched) brand email into structured deal terms.
    pub async fn parse_email(&self, email_text: &str) -> Result<AiOutcome<ParsedEmail>> {
        let system = "You extract sponsorship terms from brand outreach emails. \
                      Reply with a single JSON object with keys: brand_name, contact_email, \
                      offer_amount (number or null), deliverables (array of strings), summary.";
        let raw = self.complete(system, email_text).await?;
        Ok(decode_structured(&raw))
    }

    /// Suggest a sponsorship rate range for a creator profile.
    pub async fn suggest_rate(
        &self,
        platform: &str,
        followers: i64,
        engagement_rate: f64,
        niche: &str,
    ) -> Result<AiOutcome<RateSuggestion>> {
        let system = "You price sponsored content for creators. Reply with a single JSON \
                      object with keys: low, high, recommended (numbers, USD), rationale.";
        let prompt = format!(
            "Platform: {platform}\nFollowers: {followers}\nEngagement rate: {engagement_rate}\nNiche: {niche}"
        );
        let raw = self.complete(system, &prompt).await?;
        Ok(decode_structured(&raw))
    }

    /// Rewrite content for another platform. Free-form text, no decoding.
    pub async fn repurpose(&self, body: &str, target_platform: &str) -> Result<String> {
        let system = "You adapt creator content between social platforms, preserving the \
                      message while matching the target platform's tone and length norms.";
        let prompt = format!("Target platform: {target_platform}\n\nContent:\n{body}");
        self.complete(system, &prompt).await
    }

    /// Dispatch one completion request to the configured provider.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        match self.config.provider.as_str() {
            "anthropic" => self.complete_anthropic(system, prompt).await,
            "openai" => self.complete_openai(system, prompt).await,
            other => Err(AppError::Internal(format!(
                "unknown AI provider '{other}'"
            ))),
        }
    }

    async fn complete_openai(&self, system: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .openai_api_key
            .as_deref()
            .ok_or_else(|| AppError::Internal("OPENAI_API_KEY not configured".to_string()))?;

        let resp = self
            .http
            .post(OPENAI_CHAT_ENDPOINT)
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.config.openai_model,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": prompt },
                ],
            }))
            .send()
            .await?;

        let value = crate::platforms::expect_json(resp).await?;
        crate::platforms::json_str(&value, "/choices/0/message/content")
    }

    async fn complete_anthropic(&self, system: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .anthropic_api_key
            .as_deref()
            .ok_or_else(|| AppError::Internal("ANTHROPIC_API_KEY not configured".to_string()))?;

        let resp = self
            .http
            .post(ANTHROPIC_MESSAGES_ENDPOINT)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": self.config.anthropic_model,
                "max_tokens": 1024,
                "system": system,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await?;

        let value = crate::platforms::expect_json(resp).await?;
        crate::platforms::json_str(&value, "/content/0/text")
    }
}

/// Decode a model reply into `T`, tolerating prose around the JSON object.
fn decode_structured<T: DeserializeOwned>(raw: &str) -> AiOutcome<T> {
    match extract_json(raw).and_then(|json| serde_json::from_str::<T>(json).ok()) {
        Some(parsed) => AiOutcome::Parsed(parsed),
        None => AiOutcome::ParseFailed {
            raw: raw.to_string(),
        },
    }
}

/// Slice the outermost JSON object out of a model reply.
fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end > start {
        Some(&raw[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_json() {
        let raw = r#"{"low": 500, "high": 1500, "recommended": 900, "rationale": "mid-tier"}"#;
        match decode_structured::<RateSuggestion>(raw) {
            AiOutcome::Parsed(s) => {
                assert_eq!(s.recommended, 900.0);
            }
            AiOutcome::ParseFailed { .. } => panic!("should parse"),
        }
    }

    #[test]
    fn test_decode_json_wrapped_in_prose() {
        let raw = "Sure! Here is the result:\n{\"brand_name\": \"Acme\", \"contact_email\": null, \
                   \"offer_amount\": 2500, \"deliverables\": [\"1 video\"], \"summary\": \"ok\"}\nLet me know.";
        match decode_structured::<ParsedEmail>(raw) {
            AiOutcome::Parsed(p) => {
                assert_eq!(p.brand_name.as_deref(), Some("Acme"));
                assert_eq!(p.offer_amount, Some(2500.0));
            }
            AiOutcome::ParseFailed { .. } => panic!("should parse"),
        }
    }

    #[test]
    fn test_decode_garbage_is_soft_failure() {
        let raw = "I'm sorry, I can't help with that.";
        match decode_structured::<ParsedEmail>(raw) {
            AiOutcome::ParseFailed { raw: text } => assert!(text.contains("sorry")),
            AiOutcome::Parsed(_) => panic!("should not parse"),
        }
    }
}
