//! Agent Tools - Discover and Construct
//!
//! The two operations an agent runtime exposes to the language model:
//!
//! - **Discover** (`get_ui_components`): query the registry by identifier or
//!   category and get back schemas, examples and usage hints.
//! - **Construct** (`create_ui_component`): validate data for a component and
//!   get back a ready-to-embed fenced block.
//!
//! Both operations are total. A failed lookup or a schema violation is a
//! structured payload with `success: false`, which the model reads like any
//! other tool result. Only malformed call arguments and unknown tool names
//! surface as [`ToolError`], through [`ToolSet::call`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::block::ComponentBlock;
use crate::registry::{ComponentDefinition, InputSchema, JsonMap, Registry};
use crate::validator::missing_required_fields;

/// Tool name of the Discover operation
pub const DISCOVER_TOOL_NAME: &str = "get_ui_components";

/// Tool name of the Construct operation
pub const CONSTRUCT_TOOL_NAME: &str = "create_ui_component";

// =============================================================================
// Parameters
// =============================================================================

/// Discover arguments; `uid` wins when both are given
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverParams {
    /// Category filter (`sports`, `news`, `chart`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    /// Exact identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl DiscoverParams {
    /// Look up a single identifier
    #[must_use]
    pub fn by_uid(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            ..Self::default()
        }
    }

    /// Filter by category
    #[must_use]
    pub fn by_type(component_type: impl Into<String>) -> Self {
        Self {
            component_type: Some(component_type.into()),
            ..Self::default()
        }
    }
}

/// Construct arguments
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructParams {
    /// Component identifier
    pub uid: String,
    /// Component data, passed through as given
    pub data: JsonMap,
}

// =============================================================================
// Responses
// =============================================================================

/// Usage hints returned with a successful discovery
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoverUsage {
    /// What to do next
    pub instructions: String,
    /// Block format reminder
    pub format: String,
}

/// Discovery found at least one component
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoverFound {
    /// Always `true`
    pub success: bool,
    /// Registry version tag
    pub version: String,
    /// Matching definitions, in registry order
    pub components: Vec<ComponentDefinition>,
    /// Usage hints
    pub usage: DiscoverUsage,
}

/// Discovery matched nothing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoverNotFound {
    /// Always `false`
    pub success: bool,
    /// Which filter failed
    pub message: String,
    /// Distinct category tags present in the registry
    pub available_types: Vec<String>,
}

/// Discover result payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiscoverResponse {
    /// Components found
    Found(DiscoverFound),
    /// Nothing matched
    NotFound(DiscoverNotFound),
}

impl DiscoverResponse {
    /// Whether discovery matched anything
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Where to put a constructed block
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructInstructions {
    /// How to use the block
    pub usage: String,
    /// What happens to it
    pub note: String,
}

/// Construction succeeded
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructCreated {
    /// Always `true`
    pub success: bool,
    /// Human-readable summary
    pub message: String,
    /// Fenced block to embed verbatim
    pub uicp_block: String,
    /// Usage hints
    pub instructions: ConstructInstructions,
}

/// Construction named an identifier the registry does not have
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructUnknown {
    /// Always `false`
    pub success: bool,
    /// `Unknown component UID: <uid>`
    pub error: String,
    /// Every identifier in the registry
    pub available_components: Vec<String>,
}

/// Construction was missing required fields
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructMissingFields {
    /// Always `false`
    pub success: bool,
    /// `Missing required fields`
    pub error: String,
    /// Missing field names, in schema order
    pub missing_fields: Vec<String>,
    /// The component's full input schema
    pub component_schema: InputSchema,
}

/// Construct result payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstructResponse {
    /// Block created
    Created(ConstructCreated),
    /// Unknown identifier
    Unknown(ConstructUnknown),
    /// Required fields missing
    MissingFields(ConstructMissingFields),
}

impl ConstructResponse {
    /// Whether a block was created
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// The fenced block, if one was created
    #[must_use]
    pub fn block(&self) -> Option<&str> {
        match self {
            Self::Created(created) => Some(&created.uicp_block),
            Self::Unknown(_) | Self::MissingFields(_) => None,
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Discover components by identifier or category
///
/// Empty filter strings count as absent.
#[must_use]
pub fn discover(registry: &Registry, params: &DiscoverParams) -> DiscoverResponse {
    let uid = params.uid.as_deref().filter(|uid| !uid.is_empty());
    let category = params
        .component_type
        .as_deref()
        .filter(|category| !category.is_empty());

    let components: Vec<ComponentDefinition> = match (uid, category) {
        (Some(uid), _) => registry.get(uid).cloned().into_iter().collect(),
        (None, Some(category)) => registry.by_category(category).cloned().collect(),
        (None, None) => registry.components().to_vec(),
    };

    if components.is_empty() {
        let message = match (uid, category) {
            (Some(uid), _) => format!("No component found with UID: {uid}"),
            (None, Some(category)) => format!("No components found with type: {category}"),
            (None, None) => "No components available".to_string(),
        };
        tracing::debug!(%message, "Component discovery matched nothing");

        return DiscoverResponse::NotFound(DiscoverNotFound {
            success: false,
            message,
            available_types: registry.categories().into_iter().map(String::from).collect(),
        });
    }

    tracing::debug!(count = components.len(), "Components discovered");
    DiscoverResponse::Found(DiscoverFound {
        success: true,
        version: registry.version().to_string(),
        components,
        usage: DiscoverUsage {
            instructions: format!(
                "Use the {CONSTRUCT_TOOL_NAME} tool to generate a UICP block with the component data"
            ),
            format: "UICP blocks are code blocks with ```uicp prefix containing JSON with uid and data"
                .to_string(),
        },
    })
}

/// Validate component data and build a fenced block
#[must_use]
pub fn construct(registry: &Registry, params: &ConstructParams) -> ConstructResponse {
    let Some(definition) = registry.get(&params.uid) else {
        tracing::debug!(uid = %params.uid, "Construct called with unknown component");
        return ConstructResponse::Unknown(ConstructUnknown {
            success: false,
            error: format!("Unknown component UID: {}", params.uid),
            available_components: registry.identifiers().into_iter().map(String::from).collect(),
        });
    };

    let missing = missing_required_fields(definition, &params.data);
    if !missing.is_empty() {
        tracing::debug!(uid = %params.uid, missing = ?missing, "Construct missing required fields");
        return ConstructResponse::MissingFields(ConstructMissingFields {
            success: false,
            error: "Missing required fields".to_string(),
            missing_fields: missing.into_iter().map(String::from).collect(),
            component_schema: definition.inputs.clone(),
        });
    }

    let block = ComponentBlock::new(params.uid.clone(), params.data.clone());
    tracing::debug!(uid = %params.uid, "Component block constructed");

    ConstructResponse::Created(ConstructCreated {
        success: true,
        message: format!(
            "Successfully created {} component: {}",
            definition.category, params.uid
        ),
        uicp_block: block.to_fenced(),
        instructions: ConstructInstructions {
            usage: "Include the uicp_block string directly in your response text".to_string(),
            note: "The UICP block will be automatically parsed and rendered as a visual component"
                .to_string(),
        },
    })
}

// =============================================================================
// Tool Dispatch
// =============================================================================

/// Errors from dispatching a raw tool call
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments do not match the tool's parameters
    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        /// Tool that was called
        tool: String,
        /// Deserialization failure
        source: serde_json::Error,
    },
}

/// Model-facing description of a tool
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name
    pub name: String,
    /// What the tool does and when to call it
    pub description: String,
    /// JSON Schema for the arguments
    pub parameters: Value,
}

/// Both tools bound to one registry
#[derive(Clone, Debug)]
pub struct ToolSet {
    registry: Arc<Registry>,
}

impl ToolSet {
    /// Bind the tools to a registry
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Descriptors for every tool, Discover first
    #[must_use]
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        vec![discover_descriptor(), construct_descriptor()]
    }

    /// Dispatch a call by tool name with raw JSON arguments
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for an unrecognized name and
    /// [`ToolError::InvalidArguments`] if the arguments do not deserialize.
    pub fn call(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let invalid = |source: serde_json::Error| ToolError::InvalidArguments {
            tool: name.to_string(),
            source,
        };

        let response = match name {
            DISCOVER_TOOL_NAME => {
                // Some runtimes send `null` for a call with no arguments.
                let arguments = if arguments.is_null() { json!({}) } else { arguments };
                let params: DiscoverParams = serde_json::from_value(arguments).map_err(invalid)?;
                serde_json::to_value(discover(&self.registry, &params))
            }
            CONSTRUCT_TOOL_NAME => {
                let params: ConstructParams = serde_json::from_value(arguments).map_err(invalid)?;
                serde_json::to_value(construct(&self.registry, &params))
            }
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        response.map_err(invalid)
    }
}

fn discover_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: DISCOVER_TOOL_NAME.to_string(),
        description: "Discover available UI components that can be used in responses. \
            Use this tool to find out what custom UI components are available, their input \
            schemas, and examples. This is useful when you want to display rich content like \
            sports scores, charts, or other visual elements."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "component_type": {
                    "type": "string",
                    "description": "Filter by component type (e.g., \"sports\", \"chart\", \"news\")"
                },
                "uid": {
                    "type": "string",
                    "description": "Get a specific component by its unique identifier"
                }
            }
        }),
    }
}

fn construct_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: CONSTRUCT_TOOL_NAME.to_string(),
        description: "Create a UICP (User Interface Context Protocol) block for rendering a \
            custom UI component. Validates the component data against the schema and returns a \
            formatted code block that will be rendered as a rich UI component. Always use this \
            tool after discovering components with get_ui_components."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "uid": {
                    "type": "string",
                    "description": "The unique identifier of the component (e.g., \"NBAGameScore\")"
                },
                "data": {
                    "type": "object",
                    "description": "The data object containing all required and optional fields for the component"
                }
            },
            "required": ["uid", "data"]
        }),
    }
}
