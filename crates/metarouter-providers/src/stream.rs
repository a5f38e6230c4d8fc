//! Server-sent-events decoding for streamed chat completions.
//!
//! The wire looks like:
//!
//! ```text
//! : OPENROUTER PROCESSING
//!
//! data: {"choices":[{"delta":{"content":"Hola"}}]}
//!
//! data: [DONE]
//! ```
//!
//! [`sse_delta_stream`] turns the raw body into a lazy stream that yields
//! only the non-empty `delta.content` strings, in arrival order.

use std::pin::Pin;

use futures_util::stream::{self, Stream, StreamExt};
use tracing::{debug, warn};

use metarouter_core::types::ChatCompletionChunk;

use crate::error::ProviderError;

/// Lazy, finite stream of text deltas from a chat backend.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// What a single SSE line means for the delta stream.
#[derive(Debug, PartialEq)]
pub enum SseEvent {
    /// A piece of generated text.
    Delta(String),
    /// `data: [DONE]` — end of stream.
    Done,
    /// Comments, blank separators, other fields, or chunks without text.
    Ignore,
}

/// Interpret one line of an SSE body (without its trailing newline).
pub fn parse_sse_line(line: &str) -> Result<SseEvent, ProviderError> {
    let line = line.trim_end_matches('\r');
    if line.is_empty() || line.starts_with(':') {
        return Ok(SseEvent::Ignore);
    }

    let Some(data) = line.strip_prefix("data:") else {
        // event:, id:, retry: carry nothing we use
        return Ok(SseEvent::Ignore);
    };
    let data = data.trim_start();
    if data == "[DONE]" {
        return Ok(SseEvent::Done);
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(data).map_err(ProviderError::Decode)?;
    if let Some(err) = chunk.error {
        return Err(ProviderError::Stream(err.describe()));
    }
    if let Some(reason) = chunk.finish_reason() {
        debug!(finish_reason = reason, "stream choice finished");
    }

    Ok(match chunk.content() {
        Some(text) => SseEvent::Delta(text.to_string()),
        None => SseEvent::Ignore,
    })
}

struct SseState<S> {
    body: Pin<Box<S>>,
    buffer: Vec<u8>,
    finished: bool,
}

/// Decode a byte stream of SSE into a [`DeltaStream`].
///
/// Lines are split on raw bytes so multi-byte characters cut across network
/// chunks are reassembled before decoding. The stream ends at `[DONE]`, at
/// end of body, or right after yielding the first error.
pub fn sse_delta_stream<S, B>(body: S) -> DeltaStream
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = SseState {
        body: Box::pin(body),
        buffer: Vec::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        loop {
            if st.finished {
                return None;
            }

            while let Some(pos) = st.buffer.iter().position(|b| *b == b'\n') {
                let raw: Vec<u8> = st.buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&raw[..raw.len() - 1]).into_owned();
                match parse_sse_line(&line) {
                    Ok(SseEvent::Delta(text)) => return Some((Ok(text), st)),
                    Ok(SseEvent::Done) => return None,
                    Ok(SseEvent::Ignore) => {}
                    Err(e) => {
                        st.finished = true;
                        return Some((Err(e), st));
                    }
                }
            }

            match st.body.next().await {
                Some(Ok(bytes)) => st.buffer.extend_from_slice(bytes.as_ref()),
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((Err(ProviderError::Transport(e)), st));
                }
                None => {
                    st.finished = true;
                    let rest = std::mem::take(&mut st.buffer);
                    if rest.iter().all(|b| b.is_ascii_whitespace()) {
                        return None;
                    }
                    let line = String::from_utf8_lossy(&rest).into_owned();
                    return match parse_sse_line(line.trim_end()) {
                        Ok(SseEvent::Delta(text)) => Some((Ok(text), st)),
                        Ok(_) => None,
                        Err(e) => {
                            warn!(error = %e, "unparsed data at end of stream");
                            Some((Err(e), st))
                        }
                    };
                }
            }
        }
    }))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
