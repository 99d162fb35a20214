pub mod error;
pub mod grok;
pub mod json;

/// Sampling parameters for one completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationParams {
    pub const TIME_AUDIT: Self = Self {
        max_tokens: 1500,
        temperature: 0.5,
    };

    pub const ECOMMERCE: Self = Self {
        max_tokens: 2500,
        temperature: 0.7,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Grok,
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// One completion request, no retries. Returns the raw completion text.
    async fn complete(&self, prompt: &str, params: GenerationParams) -> anyhow::Result<String>;
}
