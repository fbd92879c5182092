//! Model-backed judgment provider over an OpenAI-compatible chat completions API

use super::prompt::{build_prompt, parse_judgment, SYSTEM_PROMPT};
use super::{CaseDescription, Judgment, JudgmentError, JudgmentProvider};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

pub const ENV_LLM_MODEL: &str = "DOSE_LLM_MODEL";
pub const ENV_LLM_BASE_URL: &str = "DOSE_LLM_BASE_URL";
pub const ENV_LLM_API_KEY: &str = "DOSE_LLM_API_KEY";
pub const ENV_LLM_TIMEOUT_MS: &str = "DOSE_LLM_TIMEOUT_MS";

pub const DEFAULT_CONFIG_FILE_NAME: &str = "judgment.toml";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Connection settings for the judgment service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentClientConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl JudgmentClientConfig {
    /// `judgment.toml` in the working directory if present, else the environment
    pub fn from_default_sources() -> Result<Self, JudgmentError> {
        let path = Path::new(DEFAULT_CONFIG_FILE_NAME);
        if path.exists() {
            return Self::from_config_file(path);
        }
        Self::from_env()
    }

    pub fn from_config_file(path: &Path) -> Result<Self, JudgmentError> {
        crate::config::load_toml(path).map_err(|err| JudgmentError::ReadConfig {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, JudgmentError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    fn from_env_with<F>(mut getter: F) -> Result<Self, JudgmentError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let model = required(&mut getter, ENV_LLM_MODEL)?;
        let base_url = required(&mut getter, ENV_LLM_BASE_URL)?;
        let api_key = required(&mut getter, ENV_LLM_API_KEY)?;
        let timeout_ms = match getter(ENV_LLM_TIMEOUT_MS) {
            Some(value) => value
                .parse::<u64>()
                .map_err(|_| JudgmentError::InvalidTimeout(value))?,
            None => DEFAULT_TIMEOUT_MS,
        };

        Ok(JudgmentClientConfig {
            model,
            base_url,
            api_key,
            timeout_ms,
        })
    }
}

fn required<F>(getter: &mut F, key: &'static str) -> Result<String, JudgmentError>
where
    F: FnMut(&str) -> Option<String>,
{
    getter(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or(JudgmentError::MissingSetting(key))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Transport for one prompt/response exchange
pub trait CompletionClient: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, JudgmentError>;
}

#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenAiChatClient {
    pub fn from_config(config: &JudgmentClientConfig) -> Result<Self, JudgmentError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms.max(1)))
            .build()
            .map_err(|err| JudgmentError::BuildClient(err.to_string()))?;

        Ok(OpenAiChatClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionClient for OpenAiChatClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, JudgmentError> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = ChatCompletionRequest {
            model: request.model.as_str(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system_prompt.as_str(),
                },
                ChatMessage {
                    role: "user",
                    content: request.user_prompt.as_str(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(|err| JudgmentError::Http(err.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().unwrap_or_else(|_| "<no body>".to_string());
            return Err(JudgmentError::HttpStatus {
                code: status.as_u16(),
                message,
            });
        }

        let response: ChatCompletionResponse = response
            .json()
            .map_err(|err| JudgmentError::Decode(err.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(JudgmentError::EmptyResponse)
    }
}

/// Judgment provider that asks a language model
#[derive(Debug)]
pub struct LlmJudgmentProvider<C: CompletionClient> {
    model: String,
    client: C,
}

impl LlmJudgmentProvider<OpenAiChatClient> {
    pub fn from_config(config: &JudgmentClientConfig) -> Result<Self, JudgmentError> {
        let client = OpenAiChatClient::from_config(config)?;
        Ok(Self::new(config.model.clone(), client))
    }
}

impl<C: CompletionClient> LlmJudgmentProvider<C> {
    pub fn new(model: impl Into<String>, client: C) -> Self {
        LlmJudgmentProvider {
            model: model.into(),
            client,
        }
    }
}

impl<C: CompletionClient> JudgmentProvider for LlmJudgmentProvider<C> {
    fn name(&self) -> &str {
        &self.model
    }

    fn evaluate(&self, case: &CaseDescription) -> Result<Judgment, JudgmentError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_prompt(case),
        };

        let started_at = Instant::now();
        let output = self.client.complete(&request)?;
        debug!(
            model = %self.model,
            latency_ms = started_at.elapsed().as_millis() as u64,
            "judgment completion returned"
        );
        parse_judgment(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Protocol;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct ScriptedClient {
        reply: Result<String, JudgmentError>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl CompletionClient for ScriptedClient {
        fn complete(&self, request: &CompletionRequest) -> Result<String, JudgmentError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    fn case() -> CaseDescription {
        CaseDescription {
            diagnosis: "Lyme Disease".to_string(),
            pathogen: "Borrelia burgdorferi".to_string(),
            clinical_context: "Erythema migrans".to_string(),
            reference_drug_name: "Doxycycline".to_string(),
            reference: Protocol::new("doxy", 100.0, 12.0, 10),
            prescribed_drug_name: "Amoxicillin".to_string(),
            prescribed: Protocol::new("amox", 500.0, 8.0, 14),
            susceptible_to: vec!["doxy".to_string(), "amox".to_string()],
        }
    }

    #[test]
    fn test_env_config_reads_all_settings() {
        let env: HashMap<&str, &str> = [
            (ENV_LLM_MODEL, "examiner-1"),
            (ENV_LLM_BASE_URL, "https://llm.local/v1/"),
            (ENV_LLM_API_KEY, "secret"),
            (ENV_LLM_TIMEOUT_MS, "2500"),
        ]
        .into_iter()
        .collect();

        let config =
            JudgmentClientConfig::from_env_with(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.model, "examiner-1");
        assert_eq!(config.timeout_ms, 2500);
    }

    #[test]
    fn test_env_config_requires_api_key() {
        let result = JudgmentClientConfig::from_env_with(|key| match key {
            ENV_LLM_MODEL => Some("m".to_string()),
            ENV_LLM_BASE_URL => Some("http://x".to_string()),
            ENV_LLM_API_KEY => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(result, Err(JudgmentError::MissingSetting(ENV_LLM_API_KEY)));
    }

    #[test]
    fn test_env_config_rejects_bad_timeout() {
        let result = JudgmentClientConfig::from_env_with(|key| match key {
            ENV_LLM_TIMEOUT_MS => Some("soon".to_string()),
            _ => Some("value".to_string()),
        });
        assert_eq!(result, Err(JudgmentError::InvalidTimeout("soon".to_string())));
    }

    #[test]
    fn test_config_file_defaults_timeout() {
        let config: JudgmentClientConfig = crate::config::parse_toml(
            "model = \"m\"\nbase_url = \"http://x\"\napi_key = \"k\"\n",
        )
        .unwrap();
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_provider_sends_prompt_and_parses_reply() {
        let client = ScriptedClient {
            reply: Ok(r#"{"approved": true, "efficacyScore": 90, "safetyScore": 100, "title": "Valid Alternative", "reasoning": "Amoxicillin treats early Lyme."}"#.to_string()),
            seen: Mutex::new(Vec::new()),
        };
        let provider = LlmJudgmentProvider::new("examiner-1", client);

        let judgment = provider.evaluate(&case()).unwrap();
        assert!(judgment.approved);
        assert_eq!(judgment.efficacy_score, 90.0);

        let seen = provider.client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "examiner-1");
        assert!(seen[0].user_prompt.contains("Amoxicillin"));
    }

    #[test]
    fn test_provider_propagates_transport_error() {
        let client = ScriptedClient {
            reply: Err(JudgmentError::HttpStatus {
                code: 503,
                message: "overloaded".to_string(),
            }),
            seen: Mutex::new(Vec::new()),
        };
        let provider = LlmJudgmentProvider::new("examiner-1", client);
        assert!(matches!(
            provider.evaluate(&case()),
            Err(JudgmentError::HttpStatus { code: 503, .. })
        ));
    }
}
