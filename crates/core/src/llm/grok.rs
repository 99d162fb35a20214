use crate::config::Settings;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::{GenerationParams, LlmClient, Provider};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.grok.ai";
const DEFAULT_MODEL: &str = "grok-1";

/// Text-completion client. The credential is always injected; there is no
/// built-in key.
#[derive(Debug, Clone)]
pub struct GrokClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GrokClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_grok_api_key()?.to_string();
        let base_url = settings
            .grok_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = settings
            .grok_model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout = settings.grok_timeout_secs.map(Duration::from_secs);

        Self::with_config(api_key, base_url, model, timeout)
    }

    /// `timeout: None` leaves the HTTP client default in place.
    pub fn with_config(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let api_key = api_key.into();
        anyhow::ensure!(!api_key.trim().is_empty(), "Grok API key must be non-empty");

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn create_completion(
        &self,
        req: &CompletionRequest<'_>,
    ) -> anyhow::Result<(serde_json::Value, CompletionResponse)> {
        let url = format!("{}/v1/completions", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await
            .context("Grok request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Grok response body")?;
        if !status.is_success() {
            let raw_response_json = serde_json::from_str::<serde_json::Value>(&text).ok();
            return Err(LlmDiagnosticsError {
                provider: Provider::Grok,
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
                raw_response_json,
            }
            .into());
        }

        let raw_json = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(v) => v,
            Err(err) => {
                return Err(LlmDiagnosticsError {
                    provider: Provider::Grok,
                    stage: "decode",
                    detail: format!("response body is not JSON: {err}"),
                    raw_output: Some(text),
                    raw_response_json: None,
                }
                .into())
            }
        };
        let parsed = serde_json::from_value::<CompletionResponse>(raw_json.clone())
            .context("failed to decode Grok response into CompletionResponse")?;
        Ok((raw_json, parsed))
    }

    fn first_choice_text(
        raw_json: serde_json::Value,
        res: CompletionResponse,
    ) -> anyhow::Result<String> {
        let text = res
            .choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|choice| choice.text);

        match text {
            Some(text) => Ok(text.trim().to_string()),
            None => Err(LlmDiagnosticsError {
                provider: Provider::Grok,
                stage: "choices",
                detail: "response has no choices[0].text".to_string(),
                raw_output: None,
                raw_response_json: Some(raw_json),
            }
            .into()),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for GrokClient {
    fn provider(&self) -> Provider {
        Provider::Grok
    }

    async fn complete(&self, prompt: &str, params: GenerationParams) -> anyhow::Result<String> {
        let req = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        tracing::debug!(
            model = %self.model,
            max_tokens = params.max_tokens,
            prompt_len = prompt.len(),
            "calling Grok completions"
        );
        let (raw_json, res) = self.create_completion(&req).await?;
        let text = Self::first_choice_text(raw_json, res)?;
        tracing::debug!(completion_len = text.len(), "Grok completion received");
        Ok(text)
    }
}

#[derive(Debug, Clone, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    #[serde(default)]
    text: Option<String>,
}
