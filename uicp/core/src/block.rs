//! Protocol Block Wire Format
//!
//! A protocol block is a fenced code block tagged `uicp` whose body is a JSON
//! object with a `uid` string and a `data` object:
//!
//! ````text
//! ```uicp
//! {"uid": "NBAGameScore", "data": {"homeTeam": "Lakers", ...}}
//! ```
//! ````
//!
//! This module owns the literal markers, the [`ComponentBlock`] type and the
//! placeholder tokens the extractor substitutes for resolved blocks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::JsonMap;

/// Code fence delimiter
pub const FENCE: &str = "```";

/// Info-string tag that marks a fence as a protocol block
pub const PROTOCOL_TAG: &str = "uicp";

/// Opening fence marker (fence + tag)
pub const OPENING_MARKER: &str = "```uicp";

/// Placeholder delimiters live in the Unicode private use area so that no
/// ordinary model output can produce them by accident.
const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';
const PLACEHOLDER_LABEL: &str = "UICP_BLOCK_";

/// A parsed protocol block
///
/// Ephemeral: built from text, consumed by validation and rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentBlock {
    /// Component identifier
    pub uid: String,
    /// Component data; undeclared fields pass through
    pub data: JsonMap,
}

impl ComponentBlock {
    /// Create a block
    #[must_use]
    pub fn new(uid: impl Into<String>, data: JsonMap) -> Self {
        Self {
            uid: uid.into(),
            data,
        }
    }

    /// Build a block from a parsed JSON body
    ///
    /// Returns `None` unless the value is an object with a non-empty string
    /// `uid` and an object `data`. Other top-level keys are ignored.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut body) = value else {
            return None;
        };

        let uid = match body.remove("uid") {
            Some(Value::String(uid)) if !uid.is_empty() => uid,
            _ => return None,
        };
        let data = match body.remove("data") {
            Some(Value::Object(data)) => data,
            _ => return None,
        };

        Some(Self { uid, data })
    }

    /// JSON body of this block
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut body = JsonMap::new();
        body.insert("uid".to_string(), Value::String(self.uid.clone()));
        body.insert("data".to_string(), Value::Object(self.data.clone()));
        Value::Object(body)
    }

    /// Serialize as a fenced protocol block, ready to embed in text
    ///
    /// The body is pretty-printed with two-space indentation. Backticks can
    /// only occur inside JSON strings, so they are written as `\u0060`; a
    /// string containing a fence then cannot close the block early.
    #[must_use]
    pub fn to_fenced(&self) -> String {
        let body = format!("{:#}", self.to_value()).replace('`', "\\u0060");
        format!("{OPENING_MARKER}\n{body}\n{FENCE}")
    }
}

/// Placeholder token for the block at `index`
#[must_use]
pub fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_OPEN}{PLACEHOLDER_LABEL}{index}{PLACEHOLDER_CLOSE}")
}

/// Parse a string that is exactly one placeholder token
///
/// Returns the block index, or `None` for anything else.
#[must_use]
pub fn parse_placeholder(part: &str) -> Option<usize> {
    let digits = part
        .strip_prefix(PLACEHOLDER_OPEN)?
        .strip_prefix(PLACEHOLDER_LABEL)?
        .strip_suffix(PLACEHOLDER_CLOSE)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Split text into alternating text and placeholder parts, in order
///
/// Placeholder tokens are kept as their own parts. Empty text parts are
/// preserved so callers can number parts by position.
#[must_use]
pub fn split_placeholders(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut part_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(PLACEHOLDER_OPEN) {
        let start = cursor + offset;
        let after_open = start + PLACEHOLDER_OPEN.len_utf8();
        let token_end = text[after_open..]
            .find(PLACEHOLDER_CLOSE)
            .map(|i| after_open + i + PLACEHOLDER_CLOSE.len_utf8());

        match token_end {
            Some(end) if parse_placeholder(&text[start..end]).is_some() => {
                parts.push(&text[part_start..start]);
                parts.push(&text[start..end]);
                part_start = end;
                cursor = end;
            }
            // Stray delimiter: stays inside the surrounding text part.
            _ => cursor = after_open,
        }
    }

    parts.push(&text[part_start..]);
    parts
}
