// Proxy module - maps models and translates between OpenAI and NIM formats

pub mod mapping;
pub mod translator;

use serde::Serialize;

use crate::api::nim::NimClient;
use crate::error::ProxyError;
use mapping::ModelMapping;
use translator::{ChatCompletionRequest, ChatCompletionResponse, TranslationOptions};

pub const MODEL_OWNER: &str = "railway-nim";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelInfo {
    pub id: String,
    pub object: &'static str,
    pub owned_by: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub object: &'static str,
    pub data: Vec<ModelInfo>,
}

/// Stateless translation gateway. Shared read-only across requests.
#[derive(Debug)]
pub struct Gateway {
    mapping: ModelMapping,
    options: TranslationOptions,
    client: NimClient,
}

impl Gateway {
    pub fn new(mapping: ModelMapping, options: TranslationOptions, client: NimClient) -> Self {
        Self {
            mapping,
            options,
            client,
        }
    }

    pub fn mapping(&self) -> &ModelMapping {
        &self.mapping
    }

    /// Every alias in the mapping, wrapped as an OpenAI model descriptor
    pub fn list_models(&self) -> ModelsResponse {
        ModelsResponse {
            object: "list",
            data: self
                .mapping
                .aliases()
                .map(|id| ModelInfo {
                    id: id.to_string(),
                    object: "model",
                    owned_by: MODEL_OWNER,
                })
                .collect(),
        }
    }

    /// Forward one chat completion to NIM and reshape the answer
    pub async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProxyError> {
        let nim_model = self.mapping.resolve(request.alias());
        tracing::debug!("Resolved model {:?} -> {}", request.model, nim_model);

        let payload = translator::openai_to_nim_request(&request, nim_model, self.options);
        let response = self.client.chat_completions(&payload).await?;

        Ok(translator::nim_to_openai_response(
            response,
            request.model,
            self.options,
            chrono::Utc::now(),
        ))
    }
}
