//! Block Validation
//!
//! Checks a [`ComponentBlock`] against the [`Registry`] before its data is
//! trusted:
//! - the identifier must exist in the registry
//! - every required field of the component's schema must be present
//!
//! Undeclared fields are allowed and passed through. A field that is present
//! with a `null` value counts as present.

use serde::{Deserialize, Serialize};

use crate::block::ComponentBlock;
use crate::registry::{ComponentDefinition, JsonMap, Registry};

/// Outcome of validating one block
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the block may be rendered
    pub valid: bool,
    /// Error messages, in the order they were found
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// A passing result
    #[must_use]
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Build a result from collected errors; valid iff there are none
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Check if the block passed validation
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Required fields of `definition` that are absent from `data`, in schema order
///
/// This is the single rule shared by block validation and the Construct tool.
#[must_use]
pub fn missing_required_fields<'a>(
    definition: &'a ComponentDefinition,
    data: &JsonMap,
) -> Vec<&'a str> {
    definition
        .required_fields()
        .filter(|field| !data.contains_key(*field))
        .collect()
}

/// Validate a block against the registry
///
/// An unknown identifier yields exactly one error and no field checks.
/// Otherwise there is one error per missing required field.
#[must_use]
pub fn validate_block(registry: &Registry, block: &ComponentBlock) -> ValidationResult {
    let Some(definition) = registry.get(&block.uid) else {
        return ValidationResult::from_errors(vec![format!(
            "Unknown component UID: {}",
            block.uid
        )]);
    };

    let errors = missing_required_fields(definition, &block.data)
        .into_iter()
        .map(|field| format!("Missing required field: {field}"))
        .collect();

    ValidationResult::from_errors(errors)
}
