//! Decoder for the streaming chat response.
//!
//! The streaming endpoint delivers newline-delimited server-sent-event
//! lines. Only `data: `-prefixed lines carry payloads; everything else
//! (blank keep-alives, comments) is ignored. A payload that fails to decode
//! is skipped rather than aborting the stream, so one bad keep-alive or
//! partial line cannot ruin an otherwise good response.

use futures::TryStreamExt;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;

use crate::error::{ClientError, Result};
use crate::models::{StreamChunk, StreamFragment};

/// Prefix of data-bearing event lines.
const DATA_PREFIX: &str = "data: ";

/// Payload marking the end of the stream.
const DONE_SENTINEL: &str = "[DONE]";

/// Decode a single event line into a fragment.
///
/// Returns `None` for lines that carry nothing: blank lines, lines without
/// the data prefix, undecodable payloads, and events whose first choice has
/// neither content nor a finish reason.
pub fn decode_stream_event(line: &str) -> Option<StreamFragment> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let payload = line.strip_prefix(DATA_PREFIX)?;
    if payload == DONE_SENTINEL {
        return Some(StreamFragment::done());
    }

    let chunk: StreamChunk = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(err) => {
            tracing::debug!(error = %err, "skipping undecodable stream line");
            return None;
        }
    };

    let choice = chunk.choices.into_iter().next()?;
    let text = choice.delta.content.unwrap_or_default();
    let is_final = choice.finish_reason.as_deref().is_some_and(|r| !r.is_empty());
    if text.is_empty() && !is_final {
        return None;
    }

    Some(StreamFragment { text, is_final })
}

/// Read the response body line by line, publishing content fragments.
///
/// Stops on the done sentinel, on a finish reason, or on clean end of
/// stream; all three are normal completion. A read error mid-stream is the
/// only failure path. Fragment order matches wire order; a full queue blocks
/// this reader rather than dropping anything.
pub(crate) async fn read_stream(
    response: reqwest::Response,
    fragments: &mpsc::Sender<String>,
) -> Result<()> {
    let bytes = response.bytes_stream().map_err(std::io::Error::other);
    let reader = StreamReader::new(Box::pin(bytes));
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            // End of stream without a terminal marker is a normal completion.
            Ok(None) => break,
            Err(err) => return Err(ClientError::StreamRead(err)),
        };

        let Some(fragment) = decode_stream_event(&line) else {
            continue;
        };
        if !fragment.text.is_empty() && fragments.send(fragment.text).await.is_err() {
            // Receiver is gone; nobody is listening anymore.
            break;
        }
        if fragment.is_final {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_done_sentinel_yields_terminal_fragment() {
        let fragment = decode_stream_event("data: [DONE]").unwrap();
        assert!(fragment.is_final);
        assert!(fragment.text.is_empty());
    }

    #[test]
    fn test_line_without_data_prefix_is_ignored() {
        assert_eq!(decode_stream_event("event: ping"), None);
        assert_eq!(decode_stream_event(": keep-alive"), None);
        assert_eq!(decode_stream_event(""), None);
        assert_eq!(decode_stream_event("   "), None);
    }

    #[test]
    fn test_malformed_json_is_skipped_silently() {
        assert_eq!(decode_stream_event("data: {not json"), None);
        assert_eq!(decode_stream_event("data: "), None);
    }

    #[test]
    fn test_content_delta_yields_fragment() {
        let line = r#"data: {"choices":[{"index":0,"delta":{"content":"Hello"}}]}"#;
        let fragment = decode_stream_event(line).unwrap();
        assert_eq!(fragment.text, "Hello");
        assert!(!fragment.is_final);
    }

    #[test]
    fn test_finish_reason_marks_final() {
        let line = r#"data: {"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#;
        let fragment = decode_stream_event(line).unwrap();
        assert!(fragment.is_final);
        assert!(fragment.text.is_empty());
    }

    #[test]
    fn test_content_and_finish_in_one_event() {
        let line = r#"data: {"choices":[{"index":0,"delta":{"content":"bye"},"finish_reason":"stop"}]}"#;
        let fragment = decode_stream_event(line).unwrap();
        assert_eq!(fragment.text, "bye");
        assert!(fragment.is_final);
    }

    #[test]
    fn test_empty_choices_yields_nothing() {
        assert_eq!(decode_stream_event(r#"data: {"choices":[]}"#), None);
    }

    #[test]
    fn test_empty_delta_without_finish_is_suppressed() {
        let line = r#"data: {"choices":[{"index":0,"delta":{"content":""}}]}"#;
        assert_eq!(decode_stream_event(line), None);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let fragment = decode_stream_event("  data: [DONE]\r").unwrap();
        assert!(fragment.is_final);
    }
}
