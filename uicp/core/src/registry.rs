//! Definition Registry
//!
//! Static catalog of the UI components an agent is allowed to embed. Each
//! [`ComponentDefinition`] carries an ordered input schema, a category tag and
//! an example payload.
//!
//! The registry is built once at start-up from a JSON document
//! (`{"version": ..., "components": [...]}`) and is read-only afterwards.
//! Share it as `Arc<Registry>`; there is no interior mutability.
//!
//! ```text
//! definitions.json ──► RegistryDocument ──► Registry (uid -> definition)
//!                                              │
//!                          ┌───────────────────┼──────────────────┐
//!                          ▼                   ▼                  ▼
//!                      Validator           Composer        Discover/Construct
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// JSON object type used for component data and schema metadata
pub type JsonMap = serde_json::Map<String, Value>;

/// Ordered field name -> field schema mapping
///
/// Order is the order of declaration in the registry document and is the
/// order in which validation reports missing fields.
pub type InputSchema = IndexMap<String, FieldSchema>;

/// Registry document shipped with the crate
pub const BUILTIN_DEFINITIONS: &str = include_str!("../definitions.json");

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while loading a registry document
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to read the definitions file
    #[error("Failed to read definitions file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// The document is not valid registry JSON
    #[error("Failed to parse definitions document: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Two definitions share the same identifier
    #[error("Duplicate component UID in registry: {0}")]
    DuplicateIdentifier(String),

    /// A definition has an empty identifier
    #[error("Component definition at index {index} has an empty UID")]
    EmptyIdentifier {
        /// Position of the offending definition in the document
        index: usize,
    },
}

// =============================================================================
// Definition Types
// =============================================================================

/// Schema metadata for a single input field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Value type hint (`string`, `number`, `array`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Whether the field must be present in a block's data
    #[serde(default)]
    pub required: bool,

    /// Human-readable description shown to the agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Any other schema keys (`enum`, `default`, ...), passed through untouched
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl FieldSchema {
    /// Create a required field of the given type
    #[must_use]
    pub fn required(kind: &str) -> Self {
        Self {
            kind: Some(kind.to_string()),
            required: true,
            description: None,
            extra: JsonMap::new(),
        }
    }

    /// Create an optional field of the given type
    #[must_use]
    pub fn optional(kind: &str) -> Self {
        Self {
            required: false,
            ..Self::required(kind)
        }
    }
}

/// A component the agent may embed in its output
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    /// Unique identifier
    pub uid: String,

    /// Category tag (`sports`, `news`, `chart`, ...)
    #[serde(rename = "type")]
    pub category: String,

    /// What the component displays
    #[serde(default)]
    pub description: String,

    /// Input schema
    #[serde(default)]
    pub inputs: InputSchema,

    /// Example data payload
    #[serde(default)]
    pub example: Value,
}

impl ComponentDefinition {
    /// Names of the required fields, in schema order
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.inputs
            .iter()
            .filter(|(_, schema)| schema.required)
            .map(|(name, _)| name.as_str())
    }
}

/// On-disk shape of a registry source
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Version tag of the catalog
    pub version: String,
    /// All component definitions
    pub components: Vec<ComponentDefinition>,
}

// =============================================================================
// Registry
// =============================================================================

/// Immutable catalog of component definitions
#[derive(Clone, Debug)]
pub struct Registry {
    version: String,
    components: Vec<ComponentDefinition>,
    by_uid: HashMap<String, usize>,
}

impl Registry {
    /// Build a registry from a parsed document
    ///
    /// # Errors
    ///
    /// Returns an error if an identifier is empty or appears more than once.
    pub fn from_document(document: RegistryDocument) -> Result<Self, RegistryError> {
        let mut by_uid = HashMap::with_capacity(document.components.len());

        for (index, component) in document.components.iter().enumerate() {
            if component.uid.trim().is_empty() {
                return Err(RegistryError::EmptyIdentifier { index });
            }
            if by_uid.insert(component.uid.clone(), index).is_some() {
                return Err(RegistryError::DuplicateIdentifier(component.uid.clone()));
            }
        }

        Ok(Self {
            version: document.version,
            components: document.components,
            by_uid,
        })
    }

    /// Parse a registry from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the catalog is inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let document: RegistryDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Load a registry from a JSON file
    ///
    /// Intended for start-up only; this performs blocking file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path).map_err(|e| RegistryError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let registry = Self::from_json_str(&json)?;

        tracing::info!(
            path = %path.display(),
            version = %registry.version,
            components = registry.len(),
            "Loaded component registry"
        );
        Ok(registry)
    }

    /// The catalog embedded in the crate
    ///
    /// # Errors
    ///
    /// Only fails if the embedded document itself is broken.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json_str(BUILTIN_DEFINITIONS)
    }

    /// Version tag of the catalog
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Look up a definition by identifier
    #[must_use]
    pub fn get(&self, uid: &str) -> Option<&ComponentDefinition> {
        self.by_uid.get(uid).map(|&i| &self.components[i])
    }

    /// Check whether an identifier is known
    #[must_use]
    pub fn contains(&self, uid: &str) -> bool {
        self.by_uid.contains_key(uid)
    }

    /// All definitions in document order
    #[must_use]
    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }

    /// Definitions with the given category tag, in document order
    pub fn by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a ComponentDefinition> + 'a {
        self.components
            .iter()
            .filter(move |c| c.category == category)
    }

    /// All identifiers in document order
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.uid.as_str()).collect()
    }

    /// Distinct category tags, in order of first appearance
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.components
            .iter()
            .map(|c| c.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Number of definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
