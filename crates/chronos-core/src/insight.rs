//! Coaching insight from a text-generation API.
//!
//! Purely advisory: nothing here reads or writes session or progress state,
//! and [`generate_insight`] turns every failure into a fixed message.

use std::time::Duration;

use indoc::formatdoc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::error::InsightError;
use crate::protocol::{last_milestone, normalize_hours, resolve_phase, FastingPhase, Milestone};
use crate::storage::InsightConfig;

/// Shown when no API key is configured.
pub const MISSING_KEY_MESSAGE: &str =
    "API Key not found in environment variables. Please configure the app correctly.";

/// Shown for every other failure.
pub const FALLBACK_MESSAGE: &str =
    "Unable to connect to your AI coach right now. Remember: Drink 3L water + Electrolytes.";

/// Safety context prepended to every prompt.
pub const MEDICAL_PROFILE_CONTEXT: &str = "\
USER MEDICAL PROFILE (STRICT ADHERENCE REQUIRED):
1. KIDNEYS: Sediment in renal pelvis. Prescription: >2L water/day. GOAL: 3 Liters/48h.
   - RISK: Dehydration causes stone formation.
   - REQUIREMENT: Must add Electrolytes (Himalayan salt/powder) to prevent mineral flush.
2. URIC ACID: High (7.29 mg/dL).
   - RISK: Gout attack (Joint pain/Big Toe).
   - ACTION: Stop fast immediately if joint pain occurs.
3. LIVER: Grade 2 Fatty Liver, Hepatomegaly.
4. GALLBLADDER: Multiple Polyps.
   - RISK: Rapid contraction on refeeding.
   - REQUIREMENT: Very low fat on break-fast.

REFEEDING RULES (CRITICAL):
- BANNED: Seafood, Red Meat, Organs (High Purine -> Uric Acid Spike). Fried/High Fat (Gallbladder Pain). Sugar.
- APPROVED: Bone/Veg Broth, Tofu, Chicken Breast, Steamed Veggies. Small portions (50%).
";

/// Build the coaching prompt for the current session position.
pub fn build_prompt(
    elapsed_hours: f64,
    phase: &FastingPhase,
    last_milestone: Option<&Milestone>,
) -> String {
    let milestone = match last_milestone {
        Some(m) => format!("{} ({})", m.title, m.benefit),
        None => "none yet".to_string(),
    };

    formatdoc! {"
        ACT AS A SPECIALIZED MEDICAL FASTING COACH.

        {context}
        CURRENT STATUS:
        - Elapsed Time: {hours:.1} hours.
        - Phase: {phase}.
        - Last Milestone: {milestone}.

        TASK:
        Give a concise, scientifically accurate, and medically safe insight for this user right now.
        1. Mention specific internal organ states (Liver/Kidneys).
        2. IF hydration is relevant now, remind them to add ELECTROLYTES.
        3. IF refeeding is near (>40h), remind them of the BANNED foods (Seafood/Red Meat).

        Keep it under 3 sentences. Be motivating but strictly safe.
        ",
        context = MEDICAL_PROFILE_CONTEXT,
        hours = normalize_hours(elapsed_hours),
        phase = phase.name,
        milestone = milestone,
    }
}

/// A text-generation backend.
#[allow(async_fn_in_trait)]
pub trait InsightProvider {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError>;
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiInsight {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    /// Environment variable the key was read from, for error messages.
    key_env: String,
    enabled: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiInsight {
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, InsightError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            key_env: "API_KEY".to_string(),
            enabled: true,
        })
    }

    /// Build from config, reading the key from `config.api_key_env`.
    pub fn from_config(config: &InsightConfig) -> Result<Self, InsightError> {
        let api_key = std::env::var(&config.api_key_env).ok();
        let mut insight = Self::new(
            &config.endpoint,
            &config.model,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )?;
        insight.key_env = config.api_key_env.clone();
        insight.enabled = config.enabled;
        Ok(insight)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_url(&self) -> Result<Url, InsightError> {
        let raw = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        Url::parse(&raw).map_err(|e| InsightError::Http {
            status: 0,
            body: format!("invalid endpoint {raw}: {e}"),
        })
    }
}

impl InsightProvider for GeminiInsight {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        if !self.enabled {
            return Err(InsightError::Disabled);
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| InsightError::MissingCredential(self.key_env.clone()))?;

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let resp = self
            .client
            .post(self.request_url()?)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InsightError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect();

        let text = text.trim();
        if text.is_empty() {
            return Err(InsightError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Ask `provider` for an insight at `elapsed_hours`. Never fails.
pub async fn generate_insight<P: InsightProvider>(provider: &P, elapsed_hours: f64) -> String {
    let hours = normalize_hours(elapsed_hours);
    let prompt = build_prompt(hours, resolve_phase(hours), last_milestone(hours));

    match provider.generate(&prompt).await {
        Ok(text) => text,
        Err(InsightError::MissingCredential(_)) => MISSING_KEY_MESSAGE.to_string(),
        Err(e) => {
            tracing::error!(error = %e, "insight generation failed");
            FALLBACK_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{phase_by_id, MILESTONES};

    struct Fixed(fn() -> Result<String, InsightError>);

    impl InsightProvider for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<String, InsightError> {
            (self.0)()
        }
    }

    fn gemini(endpoint: &str, key: Option<&str>) -> GeminiInsight {
        GeminiInsight::new(
            endpoint,
            "gemini-2.5-flash",
            key.map(String::from),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn prompt_carries_status_and_context() {
        let phase = phase_by_id(2).unwrap();
        let prompt = build_prompt(12.345, phase, Some(&MILESTONES[11]));
        assert!(prompt.starts_with("ACT AS A SPECIALIZED MEDICAL FASTING COACH."));
        assert!(prompt.contains("USER MEDICAL PROFILE"));
        assert!(prompt.contains("- Elapsed Time: 12.3 hours."));
        assert!(prompt.contains("- Phase: Glycogen Exhaustion."));
        assert!(prompt.contains(&format!("- Last Milestone: {} (", MILESTONES[11].title)));
    }

    #[test]
    fn prompt_without_milestone() {
        let prompt = build_prompt(0.1, phase_by_id(1).unwrap(), None);
        assert!(prompt.contains("- Last Milestone: none yet."));
    }

    #[tokio::test]
    async fn missing_key_has_its_own_message() {
        let provider = gemini("http://127.0.0.1:9", None);
        assert!(!provider.has_credential());
        assert_eq!(generate_insight(&provider, 10.0).await, MISSING_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn disabled_provider_without_key_reports_disabled() {
        let config = InsightConfig {
            enabled: false,
            api_key_env: "CHRONOS_TEST_UNSET_KEY".into(),
            ..InsightConfig::default()
        };
        let provider = GeminiInsight::from_config(&config).unwrap();
        assert!(!provider.has_credential());
        assert!(matches!(
            provider.generate("prompt").await,
            Err(InsightError::Disabled)
        ));
        assert_eq!(generate_insight(&provider, 10.0).await, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn other_failures_use_fallback() {
        let provider = Fixed(|| Err(InsightError::EmptyResponse));
        assert_eq!(generate_insight(&provider, 10.0).await, FALLBACK_MESSAGE);

        let provider = Fixed(|| Err(InsightError::Disabled));
        assert_eq!(generate_insight(&provider, f64::NAN).await, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn returns_generated_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":" Stay hydrated. "}]}}]}"#)
            .create_async()
            .await;

        let provider = gemini(&server.url(), Some("secret"));
        assert_eq!(generate_insight(&provider, 20.0).await, "Stay hydrated.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_uses_fallback() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(503)
            .with_body("overloaded")
            .expect(2)
            .create_async()
            .await;

        let provider = gemini(&server.url(), Some("secret"));
        match provider.generate("hi").await {
            Err(InsightError::Http { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
        assert_eq!(generate_insight(&provider, 20.0).await, FALLBACK_MESSAGE);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let provider = gemini(&server.url(), Some("secret"));
        assert!(matches!(
            provider.generate("hi").await,
            Err(InsightError::EmptyResponse)
        ));
    }
}
