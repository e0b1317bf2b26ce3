//! Content Composer
//!
//! Turns one message's raw text into an ordered list of [`ContentSegment`]s a
//! surface can display directly: plain text interleaved with resolved
//! components.
//!
//! The composer has no incremental state. Surfaces call [`Composer::compose`]
//! on the full accumulated text on every render pass while a response streams
//! in; incomplete trailing blocks are hidden by the extractor until they close.
//!
//! Every block ends up as exactly one component segment, even when it cannot
//! be drawn:
//!
//! | Block state | Display |
//! |-------------|---------|
//! | valid, renderer registered | [`ComponentDisplay::Rendered`] |
//! | unknown uid / missing fields | [`ComponentDisplay::Invalid`] |
//! | valid, no renderer | [`ComponentDisplay::Unavailable`] |

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::block::{parse_placeholder, split_placeholders, ComponentBlock};
use crate::extractor::extract_blocks;
use crate::registry::Registry;
use crate::resolver::ComponentResolver;
use crate::validator::validate_block;

/// How a component segment should be shown
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComponentDisplay {
    /// Output produced by the registered renderer
    Rendered {
        /// Renderer output
        output: String,
    },
    /// The block failed validation; never carries the raw JSON
    Invalid {
        /// Identifier from the block
        uid: String,
        /// Validation errors
        errors: Vec<String>,
    },
    /// The block is valid but this surface has no renderer for it
    Unavailable {
        /// Identifier from the block
        uid: String,
    },
}

impl ComponentDisplay {
    /// Check if the component was rendered
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

/// One ordered unit of display output
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentSegment {
    /// Plain text, untrimmed
    Text {
        /// Stable key (`text-<part index>`)
        key: String,
        /// The text
        text: String,
    },
    /// A protocol block resolved for display
    Component {
        /// Stable key (`component-<block index>`)
        key: String,
        /// The originating block
        block: ComponentBlock,
        /// What to show for it
        display: ComponentDisplay,
    },
}

impl ContentSegment {
    /// Stable key for list rendering
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Text { key, .. } | Self::Component { key, .. } => key,
        }
    }

    /// Text content, if this is a text segment
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Component { .. } => None,
        }
    }

    /// Component display, if this is a component segment
    #[must_use]
    pub fn display(&self) -> Option<&ComponentDisplay> {
        match self {
            Self::Component { display, .. } => Some(display),
            Self::Text { .. } => None,
        }
    }
}

/// Composes message text into display segments
#[derive(Clone, Debug)]
pub struct Composer {
    registry: Arc<Registry>,
    resolver: ComponentResolver,
}

impl Composer {
    /// Create a composer over a registry and a resolver
    #[must_use]
    pub fn new(registry: Arc<Registry>, resolver: ComponentResolver) -> Self {
        Self { registry, resolver }
    }

    /// The registry used for validation
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The resolver used for rendering
    #[must_use]
    pub fn resolver(&self) -> &ComponentResolver {
        &self.resolver
    }

    /// Compose the full text of a message
    #[must_use]
    pub fn compose(&self, content: &str) -> Vec<ContentSegment> {
        let extraction = extract_blocks(content);

        // With no blocks the placeholder text is the input itself, minus any
        // incomplete trailing block.
        if extraction.blocks.is_empty() {
            return vec![ContentSegment::Text {
                key: "text-0".to_string(),
                text: extraction.content_with_placeholders,
            }];
        }

        let mut segments = Vec::new();
        for (index, part) in split_placeholders(&extraction.content_with_placeholders)
            .into_iter()
            .enumerate()
        {
            let block = parse_placeholder(part)
                .and_then(|i| extraction.blocks.get(i).map(|block| (i, block)));

            if let Some((block_index, block)) = block {
                segments.push(ContentSegment::Component {
                    key: format!("component-{block_index}"),
                    block: block.clone(),
                    display: self.resolve_block(block),
                });
            } else if !part.trim().is_empty() {
                segments.push(ContentSegment::Text {
                    key: format!("text-{index}"),
                    text: part.to_string(),
                });
            }
        }

        segments
    }

    /// Validate a block and resolve what to display for it
    #[must_use]
    pub fn resolve_block(&self, block: &ComponentBlock) -> ComponentDisplay {
        let validation = validate_block(&self.registry, block);
        if !validation.is_valid() {
            tracing::debug!(
                uid = %block.uid,
                errors = ?validation.errors,
                "Invalid UICP component"
            );
            return ComponentDisplay::Invalid {
                uid: block.uid.clone(),
                errors: validation.errors,
            };
        }

        match self.resolver.lookup(&block.uid) {
            Some(renderer) => ComponentDisplay::Rendered {
                output: renderer.render(&block.data),
            },
            None => {
                tracing::debug!(uid = %block.uid, "No renderer registered for component");
                ComponentDisplay::Unavailable {
                    uid: block.uid.clone(),
                }
            }
        }
    }
}
