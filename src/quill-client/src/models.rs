//! Wire types for the chat-completions API.

use serde::{Deserialize, Serialize};

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only message history for one chat session.
///
/// The whole history is replayed as context on every request, so ordering is
/// significant and messages are never edited once appended.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the history.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn first(&self) -> Option<&ChatMessage> {
        self.messages.first()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Snapshot the history for inclusion in a request payload.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }
}

/// A chat-completion request.
///
/// `max_tokens` and `temperature` are omitted from the wire payload when
/// unset; zero is not a valid override value and means "use the provider
/// default".
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Create a new buffered (non-streaming) request.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set the token limit. Zero leaves the field unset.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        if max_tokens > 0 {
            self.max_tokens = Some(max_tokens);
        }
        self
    }

    /// Set the sampling temperature. Zero leaves the field unset.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        if temperature > 0.0 {
            self.temperature = Some(temperature);
        }
        self
    }

    /// Set the streaming flag.
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Choice in a buffered chat-completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessage,
}

/// A buffered chat-completion response.
///
/// More than one choice is legal; only the first is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// The first choice's message content, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    /// Take ownership of the first choice's message, if any.
    pub fn into_message(self) -> Option<ChatMessage> {
        self.choices.into_iter().next().map(|c| c.message)
    }
}

/// Incremental content carried by one streaming event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Choice in a streaming chat-completion event.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: StreamDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// One decoded streaming event.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

/// One incremental piece of assistant text delivered during streaming.
///
/// Fragments concatenate in arrival order to reconstruct the full message.
/// A final fragment may still carry text when the provider sends content and
/// a finish reason in the same event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFragment {
    pub text: String,
    pub is_final: bool,
}

impl StreamFragment {
    /// A content-bearing fragment.
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    /// A terminal fragment with no content.
    pub fn done() -> Self {
        Self {
            text: String::new(),
            is_final: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zero_tunables_are_omitted_from_payload() {
        let request = ChatRequest::new("test-model", vec![ChatMessage::user("hi")])
            .with_max_tokens(0)
            .with_temperature(0.0);
        let payload = serde_json::to_value(&request).unwrap();
        assert!(payload.get("max_tokens").is_none());
        assert!(payload.get("temperature").is_none());
        assert_eq!(payload["stream"], serde_json::json!(false));
        assert_eq!(payload["model"], serde_json::json!("test-model"));
    }

    #[test]
    fn test_positive_tunables_are_encoded() {
        let request = ChatRequest::new("test-model", vec![ChatMessage::user("hi")])
            .with_max_tokens(256)
            .with_temperature(0.7);
        let payload = serde_json::to_value(&request).unwrap();
        assert_eq!(payload["max_tokens"], serde_json::json!(256));
        assert!((payload["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let payload = serde_json::to_value(ChatMessage::assistant("ok")).unwrap();
        assert_eq!(payload["role"], serde_json::json!("assistant"));
        let payload = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(payload["role"], serde_json::json!("user"));
    }

    #[test]
    fn test_response_first_choice_wins() {
        let raw = r#"{"choices":[
            {"index":0,"message":{"role":"assistant","content":"first"}},
            {"index":1,"message":{"role":"assistant","content":"second"}}
        ]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.content(), Some("first"));
    }

    #[test]
    fn test_response_without_choices_is_empty() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.content(), None);
    }

    #[test]
    fn test_conversation_append_only_ordering() {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::user("one"));
        conversation.push(ChatMessage::assistant("two"));
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.messages()[0].content, "one");
        assert_eq!(conversation.last().unwrap().content, "two");
    }
}
