//! Drafting service configuration.

use std::time::Duration;

/// Configuration for the external drafting service and the retry policy
/// around it.
#[derive(Debug, Clone)]
pub struct DraftingConfig {
    /// OpenAI-compatible chat completions URL.
    pub endpoint: String,
    /// Bearer token. `None` sends no `Authorization` header.
    pub api_key: Option<String>,
    pub model: String,
    /// System message sent with every section prompt.
    pub system_prompt: String,
    /// Output-length hint for sections that do not set their own
    /// (default: 800 tokens).
    pub max_tokens: u32,
    /// Sampling temperature (default: 0.2, factual drafting).
    pub temperature: f32,
    /// Per-attempt timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Retries after the first failed attempt (default: 1).
    pub max_retries: u32,
    /// Delay before a retry, multiplied by the attempt number
    /// (default: 750 ms).
    pub retry_backoff_ms: u64,
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8081/v1/chat/completions".into(),
            api_key: None,
            model: "gpt-4o-mini".into(),
            system_prompt: "You draft sections of legal documents for a licensed attorney \
                            to review. Write plain, factual prose. Do not invent facts, \
                            parties, dates or citations."
                .into(),
            max_tokens: 800,
            temperature: 0.2,
            timeout_secs: 30,
            max_retries: 1,
            retry_backoff_ms: 750,
        }
    }
}

/// Timing and sampling knobs the section generator applies to every call.
#[derive(Debug, Clone)]
pub struct DraftingPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub default_max_tokens: u32,
    pub temperature: f32,
}

impl Default for DraftingPolicy {
    fn default() -> Self {
        Self::from(&DraftingConfig::default())
    }
}

impl From<&DraftingConfig> for DraftingPolicy {
    fn from(config: &DraftingConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            default_max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}
