//! Streaming Message Buffer
//!
//! Accumulates the chunks of one assistant message as they arrive and
//! recomposes the whole buffer after each push. Composition is stateless, so
//! the buffer only has to own the text; a block that is still arriving stays
//! hidden until its closing fence shows up.
//!
//! ```text
//! chunk ──► push() ──► buffer ──► Composer::compose() ──► segments
//!                                      ▲
//!                      finish() ───────┘  (warns on an unclosed block)
//! ```

use thiserror::Error;

use crate::composer::{Composer, ContentSegment};
use crate::extractor::extract_blocks;

/// Default cap on a single message buffer (1 MiB)
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 1024 * 1024;

/// Errors from feeding a streaming message
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    /// The chunk would push the buffer past its limit
    #[error("Message buffer full: {attempted} bytes exceeds limit of {limit}")]
    BufferFull {
        /// Configured limit in bytes
        limit: usize,
        /// Size the buffer would have reached
        attempted: usize,
    },

    /// The message was already finished
    #[error("Message stream already finished")]
    Finished,
}

/// One assistant message being streamed in
#[derive(Clone, Debug)]
pub struct StreamingMessage {
    composer: Composer,
    buffer: String,
    max_buffer_bytes: usize,
    finished: bool,
}

impl StreamingMessage {
    /// Start an empty message with the default size limit
    #[must_use]
    pub fn new(composer: Composer) -> Self {
        Self::with_limit(composer, DEFAULT_MAX_BUFFER_BYTES)
    }

    /// Start an empty message with an explicit size limit in bytes
    #[must_use]
    pub fn with_limit(composer: Composer, max_buffer_bytes: usize) -> Self {
        Self {
            composer,
            buffer: String::new(),
            max_buffer_bytes,
            finished: false,
        }
    }

    /// Append a chunk and recompose
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::BufferFull`] if the chunk would exceed the size
    /// limit (the buffer is left unchanged) and [`StreamError::Finished`]
    /// after [`finish`](Self::finish).
    pub fn push(&mut self, chunk: &str) -> Result<Vec<ContentSegment>, StreamError> {
        if self.finished {
            return Err(StreamError::Finished);
        }

        let attempted = self.buffer.len() + chunk.len();
        if attempted > self.max_buffer_bytes {
            tracing::warn!(
                limit = self.max_buffer_bytes,
                attempted,
                "Rejecting chunk, message buffer full"
            );
            return Err(StreamError::BufferFull {
                limit: self.max_buffer_bytes,
                attempted,
            });
        }

        self.buffer.push_str(chunk);
        tracing::trace!(bytes = chunk.len(), total = self.buffer.len(), "Chunk appended");
        Ok(self.segments())
    }

    /// Compose the current buffer without appending
    #[must_use]
    pub fn segments(&self) -> Vec<ContentSegment> {
        self.composer.compose(&self.buffer)
    }

    /// Mark the message complete and return the final composition
    ///
    /// A block left open at this point never closes; it stays hidden and a
    /// warning is logged.
    pub fn finish(&mut self) -> Vec<ContentSegment> {
        self.finished = true;
        if self.has_pending_block() {
            tracing::warn!(
                bytes = self.buffer.len(),
                "Message finished inside an unclosed UICP block"
            );
        }
        self.segments()
    }

    /// Whether the buffer currently ends inside an unclosed block
    #[must_use]
    pub fn has_pending_block(&self) -> bool {
        extract_blocks(&self.buffer).truncated
    }

    /// Raw accumulated text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Whether [`finish`](Self::finish) was called
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
