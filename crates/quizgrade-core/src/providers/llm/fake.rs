use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Offline client replaying scripted responses in order.
#[derive(Debug)]
pub struct FakeLlmClient {
    model: String,
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    always_fail: bool,
}

impl FakeLlmClient {
    pub fn scripted<I, S>(model: impl Into<String>, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            model: model.into(),
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
            always_fail: false,
        }
    }

    /// A client whose every call fails, standing in for an unreachable service.
    pub fn unreachable(model: impl Into<String>) -> Self {
        Self {
            always_fail: true,
            ..Self::scripted(model, Vec::<String>::new())
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn complete(
        &self,
        prompt: &str,
        _system: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse> {
        if let Ok(mut seen) = self.prompts.lock() {
            seen.push(prompt.to_string());
        }
        if self.always_fail {
            anyhow::bail!("fake provider: service unreachable");
        }
        let next = self
            .responses
            .lock()
            .map_err(|_| anyhow::anyhow!("fake provider: script lock poisoned"))?
            .pop_front();
        let text = next.ok_or_else(|| anyhow::anyhow!("fake provider: no scripted responses left"))?;

        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
            cached: false,
            meta: serde_json::json!({}),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_fails() {
        let client = FakeLlmClient::scripted("m", ["one", "two"]);
        assert_eq!(client.complete("p1", None).await.unwrap().text, "one");
        assert_eq!(client.complete("p2", None).await.unwrap().text, "two");
        assert!(client.complete("p3", None).await.is_err());
        assert_eq!(client.prompts(), vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn unreachable_always_fails() {
        let client = FakeLlmClient::unreachable("m");
        let err = client.complete("p", None).await.unwrap_err();
        assert!(err.to_string().contains("unreachable"));
        assert_eq!(client.prompts().len(), 1);
    }
}
