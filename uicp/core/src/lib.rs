//! UICP Core - Embedded UI Component Blocks for Agent Output
//!
//! This crate implements the UI Component Protocol: a language model embeds
//! fenced, JSON-bodied component blocks in its free-form text, and a surface
//! extracts, validates and displays them while the text is still streaming in.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────── Agent side ────────────────────────────┐
//! │   get_ui_components ──► discover()      create_ui_component        │
//! │                                              │                     │
//! │                                         construct() ──► ```uicp    │
//! └──────────────────────────────────────────────┼─────────────────────┘
//!                                                │ streamed text
//! ┌────────────────────────── Surface side ──────┼─────────────────────┐
//! │                                              ▼                     │
//! │  StreamingMessage ──► Composer ──► extract_blocks ──► placeholders │
//! │                          │                                         │
//! │                          ├──► validate_block ◄── Registry          │
//! │                          └──► ComponentResolver ──► renderer       │
//! │                          │                                         │
//! │                          ▼                                         │
//! │                 Vec<ContentSegment>                                │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Registry`]: Immutable catalog of component definitions and schemas
//! - [`ComponentResolver`]: Runtime identifier -> renderer mapping
//! - [`Composer`]: Turns message text into ordered [`ContentSegment`]s
//! - [`StreamingMessage`]: Accumulates chunks and recomposes on each push
//! - [`ToolSet`]: Discover/Construct tools for an agent runtime
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use uicp_core::{ComponentResolver, Composer, JsonMap, Registry};
//!
//! let registry = Arc::new(Registry::builtin().unwrap());
//! let resolver = ComponentResolver::new();
//! resolver.register("NewsArticlePreview", |data: &JsonMap| {
//!     format!("[{}]", data["headline"].as_str().unwrap_or_default())
//! });
//!
//! let composer = Composer::new(registry, resolver);
//! let segments = composer.compose(
//!     "Top story:\n```uicp\n{\"uid\":\"NewsArticlePreview\",\"data\":{\
//!      \"headline\":\"Hi\",\"source\":\"S\",\"description\":\"D\",\"publishedDate\":\"today\"}}\n```",
//! );
//! assert_eq!(segments.len(), 2);
//! ```
//!
//! # Module Overview
//!
//! - [`block`]: Wire format, markers and placeholder tokens
//! - [`extractor`]: Fenced block extraction with streaming truncation
//! - [`registry`]: Component definitions loaded from a JSON document
//! - [`validator`]: Block validation against the registry
//! - [`resolver`]: Renderer lookup by identifier
//! - [`composer`]: Text -> segments composition
//! - [`stream`]: Per-message streaming buffer
//! - [`tools`]: Discover/Construct operations and tool dispatch
//! - [`config`]: TOML + environment configuration
//!
//! # No Async, No I/O in the Protocol Path
//!
//! Extraction, validation and composition are synchronous and pure apart from
//! `tracing` diagnostics. Files are only read by the start-up loaders in
//! [`config`] and [`registry`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod block;
pub mod composer;
pub mod config;
pub mod extractor;
pub mod registry;
pub mod resolver;
pub mod stream;
pub mod tools;
pub mod validator;

// Re-exports for convenience
pub use block::{ComponentBlock, FENCE, OPENING_MARKER, PROTOCOL_TAG};
pub use composer::{ComponentDisplay, Composer, ContentSegment};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, UicpConfig, DEFAULT_LOG_FILTER, ENV_DEFINITIONS, ENV_LOG, ENV_MAX_BUFFER_BYTES,
};
pub use extractor::{extract_blocks, has_blocks, Extraction};
pub use registry::{
    ComponentDefinition, FieldSchema, InputSchema, JsonMap, Registry, RegistryDocument,
    RegistryError,
};
pub use resolver::{ComponentRenderer, ComponentResolver};
pub use stream::{StreamError, StreamingMessage, DEFAULT_MAX_BUFFER_BYTES};
pub use tools::{
    construct, discover, ConstructParams, ConstructResponse, DiscoverParams, DiscoverResponse,
    ToolDescriptor, ToolError, ToolSet, CONSTRUCT_TOOL_NAME, DISCOVER_TOOL_NAME,
};
pub use validator::{missing_required_fields, validate_block, ValidationResult};
