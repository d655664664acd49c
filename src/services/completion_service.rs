use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    config::Config,
    constants::prompts::STRUCTURED_OUTPUT_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").expect("CODE_FENCE is a valid regex pattern")
});

/// Generative completion: a prompt plus the JSON schema the answer must follow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn invoke(&self, prompt: &str, response_schema: &Value) -> AppResult<Value>;
}

pub struct OpenAiCompletionClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(config: &Config) -> Self {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(config.openai_api_key.expose_secret().to_string());
        if let Some(api_base) = &config.openai_api_base {
            openai_config = openai_config.with_api_base(api_base.clone());
        }

        Self {
            client: Client::with_config(openai_config),
            model: config.openai_model.clone(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn invoke(&self, prompt: &str, response_schema: &Value) -> AppResult<Value> {
        let request = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": STRUCTURED_OUTPUT_SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "structured_response",
                    "schema": response_schema,
                    "strict": false
                }
            }
        });

        let response: Value = self.client.chat().create_byot(request).await.map_err(|e| {
            log::error!("Completion request to model '{}' failed: {}", self.model, e);
            AppError::from(e)
        })?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AppError::MalformedResponse("completion contained no message content".to_string())
            })?;

        parse_json_content(content)
    }
}

/// Parses model output as JSON, tolerating a surrounding markdown code fence.
pub fn parse_json_content(content: &str) -> AppResult<Value> {
    let body = CODE_FENCE
        .captures(content)
        .and_then(|c| c.get(1))
        .map_or(content, |m| m.as_str());

    serde_json::from_str(body.trim())
        .map_err(|e| AppError::MalformedResponse(format!("completion was not valid JSON: {}", e)))
}

pub fn response_schema<T: JsonSchema>() -> AppResult<Value> {
    serde_json::to_value(schemars::schema_for!(T))
        .map_err(|e| AppError::InternalError(format!("failed to build response schema: {}", e)))
}

/// Invokes the completion client with `T`'s schema and validates the answer
/// against `T`. Shape mismatches fail here rather than downstream.
pub async fn generate_structured<T>(client: &dyn CompletionClient, prompt: &str) -> AppResult<T>
where
    T: JsonSchema + DeserializeOwned,
{
    let schema = response_schema::<T>()?;
    let value = client.invoke(prompt, &schema).await?;

    serde_json::from_value(value).map_err(|e| {
        log::warn!("Completion response did not match expected shape: {}", e);
        AppError::MalformedResponse(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema, PartialEq)]
    struct Tagline {
        text: String,
        words: u32,
    }

    #[test]
    fn parses_plain_and_fenced_json() {
        let plain = parse_json_content(r#"{"a": 1}"#).expect("plain");
        assert_eq!(plain["a"], 1);

        let fenced = parse_json_content("```json\n{\"a\": 2}\n```").expect("fenced");
        assert_eq!(fenced["a"], 2);

        let bare_fence = parse_json_content("```\n[1, 2]\n```").expect("bare fence");
        assert_eq!(bare_fence[1], 2);
    }

    #[test]
    fn rejects_prose() {
        let result = parse_json_content("Sure! Here is your roadmap.");
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[test]
    fn schema_lists_struct_properties() {
        let schema = response_schema::<Tagline>().expect("schema");
        assert!(schema["properties"]["text"].is_object());
        assert!(schema["properties"]["words"].is_object());
    }

    #[tokio::test]
    async fn generate_structured_validates_shape() {
        let mut client = MockCompletionClient::new();
        client
            .expect_invoke()
            .withf(|prompt, schema| prompt == "tagline please" && schema["properties"].is_object())
            .times(1)
            .returning(|_, _| Ok(json!({"text": "Build worlds", "words": 2})));

        let tagline: Tagline = generate_structured(&client, "tagline please")
            .await
            .expect("valid response");
        assert_eq!(
            tagline,
            Tagline {
                text: "Build worlds".to_string(),
                words: 2
            }
        );
    }

    #[tokio::test]
    async fn generate_structured_reports_shape_mismatch() {
        let mut client = MockCompletionClient::new();
        client
            .expect_invoke()
            .returning(|_, _| Ok(json!({"text": 42})));

        let result = generate_structured::<Tagline>(&client, "tagline please").await;
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn generate_structured_passes_upstream_errors_through() {
        let mut client = MockCompletionClient::new();
        client
            .expect_invoke()
            .returning(|_, _| Err(AppError::UpstreamError("timeout".to_string())));

        let result = generate_structured::<Tagline>(&client, "tagline please").await;
        assert!(matches!(result, Err(AppError::UpstreamError(_))));
    }
}
