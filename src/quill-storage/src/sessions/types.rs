//! Session data types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat session stored on disk, messages included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    /// Unique session identifier.
    pub id: String,
    /// Session title, derived from the first user message.
    #[serde(default)]
    pub title: Option<String>,
    /// Model used for this session.
    pub model: String,
    /// Creation timestamp (Unix seconds).
    pub created_at: i64,
    /// Last update timestamp (Unix seconds).
    pub updated_at: i64,
    /// Message history in conversation order.
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
}

impl StoredSession {
    /// Create a new session with a generated id.
    pub fn new(model: impl Into<String>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            title: None,
            model: model.into(),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        }
    }

    /// Update the timestamp to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().timestamp();
    }

    /// Append a message.
    pub fn push_message(&mut self, message: StoredMessage) {
        self.messages.push(message);
        self.touch();
    }
}

/// A message stored in session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Role: "user" or "assistant".
    pub role: String,
    /// Message content.
    pub content: String,
    /// Timestamp (Unix seconds).
    pub timestamp: i64,
}

impl StoredMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            timestamp: Utc::now().timestamp(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            timestamp: Utc::now().timestamp(),
        }
    }
}

/// Session summary for listings (lighter than the full session).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: Option<String>,
    pub model: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub message_count: usize,
}

impl From<StoredSession> for SessionSummary {
    fn from(session: StoredSession) -> Self {
        Self {
            id: session.id,
            title: session.title,
            model: session.model,
            created_at: session.created_at,
            updated_at: session.updated_at,
            message_count: session.messages.len(),
        }
    }
}
