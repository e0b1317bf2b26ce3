//! Block Extractor
//!
//! Scans agent text for fenced protocol blocks and swaps each successfully
//! parsed block for a positional placeholder token.
//!
//! The extractor is a pure function over the full accumulated text. It keeps no
//! state between calls, so a streaming surface simply calls it again on the
//! longer buffer every time new tokens arrive.
//!
//! # Streaming policy
//!
//! An opening marker with no closing fence after it is a block that is still
//! arriving. The output is then cut at the earliest opening marker that was not
//! replaced by a placeholder (and right-trimmed), so no protocol syntax reaches
//! the screen while a block is pending. When nothing is pending, closed blocks
//! that fail to parse stay in the text as-is.

use serde_json::Value;

use crate::block::{placeholder, ComponentBlock, FENCE, OPENING_MARKER};

/// Result of scanning a piece of text
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    /// Successfully parsed blocks, in order of appearance
    pub blocks: Vec<ComponentBlock>,
    /// Input text with each parsed block replaced by its placeholder
    pub content_with_placeholders: String,
    /// Whether a trailing incomplete block was cut off
    pub truncated: bool,
}

/// Outcome of looking at one occurrence of the opening marker
enum Fence<'a> {
    /// Opening line and closing fence are both present
    Complete { body: &'a str, end: usize },
    /// The block is still being written
    Incomplete,
    /// The marker is followed by something other than whitespace + newline
    NotAFence,
}

/// Check whether text contains a protocol block, complete or not
#[must_use]
pub fn has_blocks(content: &str) -> bool {
    content.contains(OPENING_MARKER)
}

/// Extract protocol blocks from text
///
/// Never fails: malformed blocks are logged and left in place, and an
/// incomplete trailing block is truncated away.
#[must_use]
pub fn extract_blocks(content: &str) -> Extraction {
    let mut blocks = Vec::new();
    let mut output = String::with_capacity(content.len());
    let mut copied_to = 0;
    let mut cursor = 0;
    let mut truncated = false;

    while let Some(offset) = content[cursor..].find(OPENING_MARKER) {
        let start = cursor + offset;

        match scan_fence(content, start) {
            Fence::Complete { body, end } => {
                if let Some(block) = parse_body(body, blocks.len()) {
                    output.push_str(&content[copied_to..start]);
                    output.push_str(&placeholder(blocks.len()));
                    blocks.push(block);
                    copied_to = end;
                }
                cursor = end;
            }
            Fence::Incomplete => {
                output.push_str(&content[copied_to..start]);
                let cut = output.find(OPENING_MARKER).unwrap_or(output.len());
                output.truncate(output[..cut].trim_end().len());
                copied_to = content.len();
                truncated = true;
                tracing::trace!(offset = start, "Truncated incomplete UICP block");
                break;
            }
            Fence::NotAFence => cursor = start + OPENING_MARKER.len(),
        }
    }

    if !truncated {
        output.push_str(&content[copied_to..]);
    }

    Extraction {
        blocks,
        content_with_placeholders: output,
        truncated,
    }
}

/// Classify the marker at `start`
///
/// The opening line is the tag followed by optional whitespace and a newline;
/// the body runs from after the last newline of that whitespace to the first
/// closing fence.
fn scan_fence(content: &str, start: usize) -> Fence<'_> {
    let after_tag = start + OPENING_MARKER.len();
    let rest = &content[after_tag..];

    let mut body_start = None;
    let mut reached_end = true;
    for (i, c) in rest.char_indices() {
        if c == '\n' {
            body_start = Some(after_tag + i + 1);
        } else if !c.is_whitespace() {
            reached_end = false;
            break;
        }
    }

    let Some(body_start) = body_start else {
        return if reached_end {
            Fence::Incomplete
        } else {
            Fence::NotAFence
        };
    };

    match content[body_start..].find(FENCE) {
        Some(close) => Fence::Complete {
            body: &content[body_start..body_start + close],
            end: body_start + close + FENCE.len(),
        },
        None => Fence::Incomplete,
    }
}

/// Parse a block body, logging why it was rejected
fn parse_body(body: &str, index: usize) -> Option<ComponentBlock> {
    let value: Value = match serde_json::from_str(body.trim()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(index, error = %e, "Failed to parse UICP block");
            return None;
        }
    };

    let block = ComponentBlock::from_value(value);
    if block.is_none() {
        tracing::debug!(index, "Skipping UICP block without `uid` and `data`");
    }
    block
}
