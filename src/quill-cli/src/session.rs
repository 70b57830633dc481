//! Interactive chat turns over a shared conversation.

use anyhow::{Result, bail};
use quill_client::{ChatClient, ChatMessage, ChatRequest, Conversation};
use quill_common::clean_response;

use crate::stream::StreamPresenter;

/// One chat session: the conversation plus the request parameters that stay
/// fixed across turns.
///
/// The conversation is append-only and replayed as context on every turn. A
/// turn commits its user message and the assistant reply only when the
/// request succeeds, so a failed turn leaves the history exactly as it was.
pub struct ChatSession {
    client: ChatClient,
    conversation: Conversation,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatSession {
    pub fn new(
        client: ChatClient,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            conversation: Conversation::new(),
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    fn request_with(&self, input: &str) -> ChatRequest {
        let mut messages = self.conversation.snapshot();
        messages.push(ChatMessage::user(input));
        ChatRequest::new(&self.model, messages)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }

    fn commit(&mut self, input: &str, reply: ChatMessage) -> ChatMessage {
        self.conversation.push(ChatMessage::user(input));
        self.conversation.push(reply.clone());
        reply
    }

    /// Send one buffered turn and return the assistant reply.
    pub async fn send_buffered(&mut self, input: &str) -> Result<ChatMessage> {
        let request = self.request_with(input);
        let response = self.client.send_chat(request).await?;
        let Some(message) = response.into_message() else {
            bail!("no response received");
        };
        let reply = ChatMessage::assistant(clean_response(&message.content));
        Ok(self.commit(input, reply))
    }

    /// Send one streaming turn; the presenter renders fragments as they
    /// arrive and resolves cancellation.
    pub async fn send_streaming(
        &mut self,
        input: &str,
        presenter: StreamPresenter<'_>,
    ) -> Result<ChatMessage> {
        let request = self.request_with(input).with_stream(true);
        let (fragments, error_slot) = self.client.send_chat_stream(request);
        let outcome = presenter.consume(fragments, error_slot).await;
        if let Some(err) = outcome.error {
            return Err(err.into());
        }
        let reply = ChatMessage::assistant(outcome.text);
        Ok(self.commit(input, reply))
    }
}
