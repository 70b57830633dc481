//! HTTP client for the chat-completions API.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::error::{ClientError, Result};
use crate::models::{ChatRequest, ChatResponse};
use crate::sse;

/// Per-request timeout. Bounds the worst-case hang of a single call,
/// including the whole lifetime of a streamed response body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Capacity of the content-fragment queue handed to streaming consumers.
/// A fast producer blocks on a full queue instead of dropping fragments.
pub const STREAM_CHANNEL_CAPACITY: usize = 100;

/// Client for an OpenAI-style chat-completions endpoint.
///
/// `base_url` is the full endpoint URL; authentication is a bearer header
/// built from the configured API key. No retries happen at this layer: a
/// single failed attempt is a single reported error.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    /// Create a client with the default request timeout.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_timeout(api_key, base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// The configured endpoint URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let response = self
            .http
            .post(&self.base_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "chat request rejected");
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Send a request and wait for the complete response.
    pub async fn send_chat(&self, mut request: ChatRequest) -> Result<ChatResponse> {
        request.stream = false;
        let response = self.post_chat(&request).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(ClientError::MalformedResponse)
    }

    /// Send a streaming request.
    ///
    /// The response body is consumed on a background task; content fragments
    /// arrive in wire order on the bounded queue, and a terminal error (if
    /// any) on the single-slot receiver. When the task finishes, cleanly or
    /// not, both senders are dropped: queue closure is the end-of-stream
    /// signal, and at most one error is ever published.
    pub fn send_chat_stream(
        &self,
        mut request: ChatRequest,
    ) -> (mpsc::Receiver<String>, oneshot::Receiver<ClientError>) {
        request.stream = true;
        let (fragment_tx, fragment_rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let (error_tx, error_rx) = oneshot::channel();

        let client = self.clone();
        tokio::spawn(async move {
            let outcome: Result<()> = async {
                let response = client.post_chat(&request).await?;
                sse::read_stream(response, &fragment_tx).await
            }
            .await;

            if let Err(err) = outcome {
                let _ = error_tx.send(err);
            }
        });

        (fragment_rx, error_rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatMessage;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(content: &str) -> ChatRequest {
        ChatRequest::new("test-model", vec![ChatMessage::user(content)])
    }

    #[tokio::test]
    async fn test_send_chat_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer secret-key"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                serde_json::json!({
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "hello!"}
                    }]
                })
                .to_string(),
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = ChatClient::new("secret-key", format!("{}/v1/chat/completions", server.uri()));
        let response = client.send_chat(request("hi")).await.expect("send chat");
        assert_eq!(response.content(), Some("hello!"));
    }

    #[tokio::test]
    async fn test_send_chat_non_success_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_raw(r#"{"error":"rate limited"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new("secret-key", server.uri());
        let err = client.send_chat(request("hi")).await.unwrap_err();
        match err {
            ClientError::Api { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("rate limited"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_chat_malformed_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"choices": 42}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new("secret-key", server.uri());
        let err = client.send_chat(request("hi")).await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_stream_fragments_arrive_in_order() {
        let body = concat!(
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hello\"}}]}\n",
            "\n",
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\" world\"}}]}\n",
            "\n",
            "data: {\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}]}\n",
        );
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"stream": true})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let client = ChatClient::new("secret-key", server.uri());
        let (mut fragments, error_slot) = client.send_chat_stream(request("hi"));

        let mut accumulated = String::new();
        while let Some(text) = fragments.recv().await {
            accumulated.push_str(&text);
        }
        assert_eq!(accumulated, "Hello world");
        // Queue closed cleanly; no error was published.
        assert!(error_slot.await.is_err());
    }

    #[tokio::test]
    async fn test_stream_tolerates_malformed_chunks() {
        let body = concat!(
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"ok\"}}]}\n",
            "data: {broken\n",
            ": comment line\n",
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"!\"}}]}\n",
            "data: [DONE]\n",
        );
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let client = ChatClient::new("secret-key", server.uri());
        let (mut fragments, _error_slot) = client.send_chat_stream(request("hi"));

        let mut accumulated = String::new();
        while let Some(text) = fragments.recv().await {
            accumulated.push_str(&text);
        }
        assert_eq!(accumulated, "ok!");
    }

    #[tokio::test]
    async fn test_stream_transport_failure_reaches_error_slot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_raw("boom", "text/plain"))
            .mount(&server)
            .await;

        let client = ChatClient::new("secret-key", server.uri());
        let (mut fragments, error_slot) = client.send_chat_stream(request("hi"));

        assert_eq!(fragments.recv().await, None);
        let err = error_slot.await.expect("an error should be published");
        assert!(matches!(err, ClientError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_stream_ends_cleanly_without_terminal_marker() {
        let body = "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"partial\"}}]}\n";
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let client = ChatClient::new("secret-key", server.uri());
        let (mut fragments, error_slot) = client.send_chat_stream(request("hi"));

        assert_eq!(fragments.recv().await.as_deref(), Some("partial"));
        assert_eq!(fragments.recv().await, None);
        assert!(error_slot.await.is_err());
    }
}
