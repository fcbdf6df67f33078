//! rig-core backed analyzer.
//!
//! Supports Anthropic, OpenAI, Gemini, Groq and any OpenAI-compatible
//! endpoint (Azure OpenAI behind a gateway, Ollama, local servers).
//! One completion per call, no retries.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers;

use super::{Analyzer, AnalyzerError};
use crate::config::AnalyzerConfig;
use crate::constants::ENV_API_KEY;
use crate::models::ProviderName;

/// System prompt sent with every bundle.
pub const SYSTEM_PROMPT: &str = "You are an automated code reviewer. The user message is a review \
bundle split into chunks. Follow the REVIEW INSTRUCTIONS chunk and answer strictly in the \
REVIEW OUTPUT FORMAT chunk.";

/// Build an agent on a rig-core client and prompt it once.
macro_rules! prompt_once {
    ($client:expr, $config:expr, $user:expr, $label:expr) => {{
        let agent = $client
            .agent($config.model.as_str())
            .preamble(SYSTEM_PROMPT)
            .temperature($config.temperature)
            .max_tokens($config.max_tokens)
            .build();
        agent
            .prompt($user)
            .await
            .map_err(|e| AnalyzerError::ApiError(format!("{} API error: {e}", $label)))
    }};
}

/// Create a rig-core client using the `Client::new(api_key)` convention.
macro_rules! new_client {
    ($provider_mod:path, $api_key:expr, $label:expr) => {{
        <$provider_mod>::new($api_key).map_err(|e| {
            AnalyzerError::ApiError(format!("failed to create {} client: {e}", $label))
        })
    }};
}

/// Analyzer calling an LLM through rig-core.
pub struct RigAnalyzer {
    config: AnalyzerConfig,
}

impl RigAnalyzer {
    /// Fails when no API key is configured, so a misconfigured server
    /// refuses to start instead of failing every event.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        if config.api_key.is_none() {
            return Err(AnalyzerError::NotConfigured(format!(
                "no API key found for provider '{}'. Set {} or {}.",
                config.provider,
                ENV_API_KEY,
                config.provider.api_key_env_var()
            )));
        }
        if config.provider == ProviderName::OpenAICompatible && config.base_url.is_none() {
            return Err(AnalyzerError::NotConfigured(
                "openai-compatible provider requires base_url to be set".to_string(),
            ));
        }
        Ok(Self { config })
    }

    fn api_key(&self) -> Result<&str, AnalyzerError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AnalyzerError::NotConfigured("missing API key".to_string()))
    }

    fn build_openai_client(
        &self,
        api_key: &str,
        label: &str,
    ) -> Result<providers::openai::CompletionsClient, AnalyzerError> {
        let mut builder = providers::openai::CompletionsClient::builder().api_key(api_key);
        if let Some(ref base_url) = self.config.base_url {
            builder = builder.base_url(base_url);
        }
        builder
            .build()
            .map_err(|e| AnalyzerError::ApiError(format!("failed to create {label} client: {e}")))
    }
}

#[async_trait]
impl Analyzer for RigAnalyzer {
    async fn analyze(&self, prompt: &str) -> Result<String, AnalyzerError> {
        let api_key = self.api_key()?;
        let config = &self.config;

        tracing::info!(
            provider = %config.provider,
            model = %config.model,
            prompt_bytes = prompt.len(),
            "sending bundle for analysis"
        );

        match config.provider {
            ProviderName::Anthropic => {
                let client: providers::anthropic::Client = providers::anthropic::Client::builder()
                    .api_key(api_key)
                    .build()
                    .map_err(|e| {
                        AnalyzerError::ApiError(format!("failed to create Anthropic client: {e}"))
                    })?;
                prompt_once!(client, config, prompt, "Anthropic")
            }
            ProviderName::OpenAI => {
                let client = self.build_openai_client(api_key, "OpenAI")?;
                prompt_once!(client, config, prompt, "OpenAI")
            }
            ProviderName::OpenAICompatible => {
                let client = self.build_openai_client(api_key, "OpenAI-compatible")?;
                prompt_once!(client, config, prompt, "OpenAI-compatible")
            }
            ProviderName::Gemini => {
                let client = new_client!(providers::gemini::Client, api_key, "Gemini")?;
                prompt_once!(client, config, prompt, "Gemini")
            }
            ProviderName::Groq => {
                let client = new_client!(providers::groq::Client, api_key, "Groq")?;
                prompt_once!(client, config, prompt, "Groq")
            }
        }
    }
}
