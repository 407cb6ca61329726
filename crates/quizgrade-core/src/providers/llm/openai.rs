use super::retry::RetryPolicy;
use super::LlmClient;
use crate::config::EvaluatorConfig;
use crate::errors::{ConfigError, GenerationError};
use crate::model::LlmResponse;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

const PROVIDER: &str = "openai";

/// OpenAI-compatible chat-completions client.
pub struct OpenAIClient {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub retry: RetryPolicy,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(
        model: String,
        api_key: String,
        base_url: String,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            model,
            api_key,
            base_url,
            temperature,
            max_tokens,
            retry,
            client,
        })
    }

    /// Reads the API key from the environment variable named in the config.
    pub fn from_config(cfg: &EvaluatorConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(cfg.api_key_env.clone(), PROVIDER.into()))?;
        Self::new(
            cfg.model.clone(),
            api_key,
            cfg.base_url.clone(),
            cfg.temperature,
            cfg.max_tokens,
            Duration::from_secs(cfg.timeout_secs),
            cfg.retry,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, prompt: &str, system: Option<&[String]>) -> Value {
        let mut messages: Vec<Value> = system
            .unwrap_or_default()
            .iter()
            .map(|s| json!({"role": "system", "content": s}))
            .collect();
        messages.push(json!({"role": "user", "content": prompt}));
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    async fn post_with_retry(&self, body: &Value) -> Result<Value, GenerationError> {
        let url = self.endpoint();
        let mut attempt = 0u32;
        loop {
            let sent = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await;

            let resp = match sent {
                Ok(resp) => resp,
                Err(e) if self.retry.has_next(attempt) => {
                    tracing::warn!(attempt, error = %e, "generation request failed, retrying");
                    tokio::time::sleep(self.retry.transport_delay()).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => {
                    return Err(GenerationError::Transport {
                        provider: PROVIDER.into(),
                        detail: e.to_string(),
                    })
                }
            };

            let status = resp.status();
            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                if self.retry.has_next(attempt) {
                    let wait = self.retry.loading_delay(attempt);
                    tracing::info!(attempt, wait_ms = wait.as_millis() as u64, "model loading, waiting");
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    continue;
                }
                return Err(GenerationError::RetriesExhausted {
                    provider: PROVIDER.into(),
                    attempts: attempt + 1,
                });
            }

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(GenerationError::Status {
                    provider: PROVIDER.into(),
                    status: status.as_u16(),
                    body,
                });
            }

            return resp.json::<Value>().await.map_err(|e| GenerationError::Transport {
                provider: PROVIDER.into(),
                detail: format!("invalid response body: {}", e),
            });
        }
    }
}

/// Generated text from a chat-completions body, or from the Hugging Face
/// text-generation shapes `[{"generated_text": ..}]` / `{"generated_text": ..}`.
pub fn extract_generated_text(body: &Value) -> Option<&str> {
    body.pointer("/choices/0/message/content")
        .or_else(|| body.pointer("/0/generated_text"))
        .or_else(|| body.get("generated_text"))
        .and_then(Value::as_str)
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse> {
        let body = self.request_body(prompt, system);
        let json = self.post_with_retry(&body).await?;

        let text = extract_generated_text(&json)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GenerationError::EmptyResponse {
                provider: PROVIDER.into(),
            })?
            .to_string();

        let meta = match json.get("usage") {
            Some(usage) => json!({
                "usage": {
                    "input_tokens": usage.get("prompt_tokens"),
                    "output_tokens": usage.get("completion_tokens"),
                }
            }),
            None => json!({}),
        };

        Ok(LlmResponse {
            text,
            provider: PROVIDER.to_string(),
            model: self.model.clone(),
            cached: false,
            meta,
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response per accepted connection.
    /// Status 0 reads the request and hangs up without replying.
    async fn serve(responses: Vec<(u16, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut sock, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 16 * 1024];
                let _ = sock.read(&mut buf).await;
                if status == 0 {
                    drop(sock);
                    continue;
                }
                let reply = format!(
                    "HTTP/1.1 {} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                sock.write_all(reply.as_bytes()).await.unwrap();
                let _ = sock.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String, retry: RetryPolicy) -> OpenAIClient {
        OpenAIClient::new(
            "test-model".into(),
            "sk-test".into(),
            base_url,
            0.0,
            64,
            Duration::from_secs(5),
            retry,
        )
        .unwrap()
    }

    #[test]
    fn generated_text_shapes() {
        let chat = json!({"choices": [{"message": {"content": "hi"}}]});
        let hf_list = json!([{"generated_text": "there"}]);
        let hf_obj = json!({"generated_text": "friend"});
        assert_eq!(extract_generated_text(&chat), Some("hi"));
        assert_eq!(extract_generated_text(&hf_list), Some("there"));
        assert_eq!(extract_generated_text(&hf_obj), Some("friend"));
        assert_eq!(extract_generated_text(&json!({"error": "x"})), None);
    }

    #[test]
    fn system_messages_precede_prompt() {
        let c = client("http://localhost".into(), RetryPolicy::immediate(1));
        let body = c.request_body("question", Some(&["be strict".to_string()]));
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "question");
        assert_eq!(c.endpoint(), "http://localhost/chat/completions");
    }

    #[tokio::test]
    async fn retries_through_model_loading() {
        let url = serve(vec![
            (503, r#"{"error": "loading"}"#),
            (200, r#"{"choices": [{"message": {"content": " ok "}}], "usage": {"prompt_tokens": 3, "completion_tokens": 1}}"#),
        ])
        .await;
        let resp = client(url, RetryPolicy::immediate(3))
            .complete("p", None)
            .await
            .unwrap();
        assert_eq!(resp.text, "ok");
        assert_eq!(resp.meta["usage"]["input_tokens"], 3);
    }

    #[tokio::test]
    async fn loading_beyond_ceiling_fails() {
        let url = serve(vec![(503, "{}"), (503, "{}")]).await;
        let err = client(url, RetryPolicy::immediate(2))
            .complete("p", None)
            .await
            .unwrap_err();
        let gen = err.downcast_ref::<GenerationError>().unwrap();
        assert!(matches!(gen, GenerationError::RetriesExhausted { attempts: 2, .. }));
    }

    #[tokio::test]
    async fn retries_after_dropped_connection() {
        let url = serve(vec![
            (0, ""),
            (200, r#"{"choices": [{"message": {"content": "recovered"}}]}"#),
        ])
        .await;
        let resp = client(url, RetryPolicy::immediate(3))
            .complete("p", None)
            .await
            .unwrap();
        assert_eq!(resp.text, "recovered");
    }

    #[tokio::test]
    async fn transport_failures_beyond_ceiling_fail() {
        let url = serve(vec![(0, ""), (0, "")]).await;
        let err = client(url, RetryPolicy::immediate(2))
            .complete("p", None)
            .await
            .unwrap_err();
        let gen = err.downcast_ref::<GenerationError>().unwrap();
        assert!(matches!(gen, GenerationError::Transport { .. }), "{}", gen);
    }

    #[tokio::test]
    async fn non_success_status_is_not_retried() {
        let url = serve(vec![(401, r#"{"error": "bad key"}"#)]).await;
        let err = client(url, RetryPolicy::immediate(3))
            .complete("p", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn missing_key_is_config_error() {
        let cfg = EvaluatorConfig {
            api_key_env: "QUIZGRADE_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..Default::default()
        };
        let err = OpenAIClient::from_config(&cfg).err().unwrap();
        assert!(err.to_string().contains("QUIZGRADE_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
