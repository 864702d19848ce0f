//! services/api/src/adapters/generation_llm.rs
//!
//! This module contains the adapter for the study-material generation LLM.
//! It implements the `ContentGenerationService` port from the `core` crate.
//!
//! The adapter walks a fixed ordered list of model identifiers, stopping at
//! the first success. A classifier decides per failure whether the next model
//! should be tried (model-access errors) or the loop must abort and propagate
//! (bad credential, rate limit, anything else).

const SYSTEM_INSTRUCTIONS: &str = "You are a study-material assistant. You turn document text into the exact study format the user requests. Output only the requested material, with no introduction and no closing remarks.";

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use studygen_core::{
    domain::OutputKind,
    ports::{ContentGenerationService, PortError, PortResult},
    prompt::build_prompt,
};
use tracing::warn;

//=========================================================================================
// Failure Classification
//=========================================================================================

/// What the fallback loop should do with a failed model call.
enum FailureDisposition {
    /// An access-class failure: this model is unavailable to the caller's
    /// credential, the next one in the list may not be.
    TryNextModel(String),
    /// Any other failure aborts the loop immediately.
    Abort(PortError),
}

fn classify_failure(err: OpenAIError) -> FailureDisposition {
    match err {
        OpenAIError::ApiError(api) => {
            let message = api.message.clone();
            let lower = message.to_lowercase();
            let err_type = api.r#type.unwrap_or_default();

            if (lower.contains("model") && lower.contains("does not exist"))
                || lower.contains("does not have access")
                || lower.contains("model_not_found")
            {
                FailureDisposition::TryNextModel(message)
            } else if lower.contains("incorrect api key") || lower.contains("invalid api key") {
                FailureDisposition::Abort(PortError::InvalidApiKey(message))
            } else if err_type.contains("rate_limit")
                || lower.contains("rate limit")
                || lower.contains("quota")
            {
                FailureDisposition::Abort(PortError::RateLimited(message))
            } else {
                FailureDisposition::Abort(PortError::Unexpected(message))
            }
        }
        other => FailureDisposition::Abort(PortError::Unexpected(other.to_string())),
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ContentGenerationService` using an
/// OpenAI-compatible LLM with sequential model fallback.
#[derive(Clone)]
pub struct OpenAiGenerationAdapter {
    default_api_key: Option<String>,
    models: Vec<String>,
}

impl OpenAiGenerationAdapter {
    /// Creates a new `OpenAiGenerationAdapter`.
    pub fn new(default_api_key: Option<String>, models: Vec<String>) -> Self {
        Self {
            default_api_key,
            models,
        }
    }
}

//=========================================================================================
// `ContentGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentGenerationService for OpenAiGenerationAdapter {
    /// Generates raw study-material text, trying each configured model in
    /// order until one succeeds or a fatal failure aborts the loop.
    async fn generate(
        &self,
        kind: OutputKind,
        document_text: &str,
        api_key: Option<&str>,
    ) -> PortResult<String> {
        let key = api_key
            .map(str::to_string)
            .or_else(|| self.default_api_key.clone())
            .ok_or_else(|| {
                PortError::InvalidInput("An API key is required for generation".to_string())
            })?;

        // The credential can change per request, so the client is built here
        // rather than at startup.
        let client = Client::with_config(OpenAIConfig::new().with_api_key(key));
        let prompt = build_prompt(kind, document_text);

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let mut last_access_error: Option<String> = None;

        for model in &self.models {
            let request = CreateChatCompletionRequestArgs::default()
                .model(model)
                .messages(messages.clone())
                .n(1)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?;

            // Call the API and manually map the error if it occurs, which
            // respects the orphan rule.
            match client.chat().create(request).await {
                Ok(response) => {
                    if let Some(choice) = response.choices.into_iter().next() {
                        if let Some(content) = choice.message.content {
                            return Ok(content);
                        }
                    }
                    return Err(PortError::Unexpected(
                        "Generation LLM response contained no text content.".to_string(),
                    ));
                }
                Err(e) => match classify_failure(e) {
                    FailureDisposition::TryNextModel(message) => {
                        warn!("Model '{}' unavailable, trying next: {}", model, message);
                        last_access_error = Some(message);
                    }
                    FailureDisposition::Abort(port_error) => return Err(port_error),
                },
            }
        }

        Err(PortError::ModelAccess(last_access_error.unwrap_or_else(
            || "No generation models are configured".to_string(),
        )))
    }
}
