pub mod contingency;
pub mod dispatch;
pub mod domain;
pub mod llm;
pub mod prompt;
pub mod ranking;
pub mod report;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub grok_api_key: Option<String>,
        pub grok_base_url: Option<String>,
        pub grok_model: Option<String>,
        pub grok_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let grok_timeout_secs = match non_empty_var("GROK_TIMEOUT_SECS") {
                Some(s) => Some(
                    s.parse::<u64>()
                        .with_context(|| format!("GROK_TIMEOUT_SECS is not a number: {s}"))?,
                ),
                None => None,
            };

            Ok(Self {
                grok_api_key: non_empty_var("GROK_API_KEY"),
                grok_base_url: non_empty_var("GROK_BASE_URL"),
                grok_model: non_empty_var("GROK_MODEL"),
                grok_timeout_secs,
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_grok_api_key(&self) -> anyhow::Result<&str> {
            self.grok_api_key
                .as_deref()
                .context("GROK_API_KEY is required")
        }
    }

    fn non_empty_var(name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
