pub mod fake;
pub mod openai;
pub mod retry;
pub mod tracing;

use crate::config::{EvaluatorConfig, ProviderKind};
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::sync::Arc;

/// The text-generation capability: a prompt in, generated text or a failure out.
///
/// Output is untrusted; callers route it through `json_extract` before reading
/// any field.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;

    fn model_id(&self) -> &str;
}

/// Builds the configured client wrapped in the request-tracing decorator.
pub fn build_client(cfg: &EvaluatorConfig) -> anyhow::Result<Arc<dyn LlmClient>> {
    let inner: Arc<dyn LlmClient> = match cfg.provider {
        ProviderKind::OpenAi => Arc::new(openai::OpenAIClient::from_config(cfg)?),
        ProviderKind::Fake => Arc::new(fake::FakeLlmClient::scripted(
            cfg.model.clone(),
            cfg.fake_responses.clone(),
        )),
    };
    Ok(Arc::new(tracing::TracingLlmClient::new(inner)))
}
