//! Chat-completions API client for quill.
//!
//! Talks to an OpenAI-style chat endpoint in two modes:
//! - buffered: one request, one decoded [`ChatResponse`]
//! - streaming: the response body is consumed as server-sent-event lines on a
//!   background task and republished through a bounded fragment queue plus a
//!   single-slot error output, so a slow consumer never loses data and the
//!   network read never blocks the UI.

mod client;
mod error;
mod models;
mod sse;

pub use client::{ChatClient, DEFAULT_REQUEST_TIMEOUT, STREAM_CHANNEL_CAPACITY};
pub use error::{ClientError, Result};
pub use models::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, Conversation, MessageRole, StreamChoice,
    StreamChunk, StreamDelta, StreamFragment,
};
pub use sse::decode_stream_event;
