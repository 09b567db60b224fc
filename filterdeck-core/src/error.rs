//! Error types for filter engine operations.

use thiserror::Error;

/// Result type for filter engine operations.
pub type Result<T> = std::result::Result<T, FilterError>;

/// Error types for filter engine operations.
#[derive(Error, Debug)]
pub enum FilterError {
    /// No filter group with this id is loaded.
    #[error("Unknown filter group: '{group_id}'")]
    UnknownGroup { group_id: String },

    /// Flat index does not address an item of the group.
    #[error("Item index {index} out of range for '{group_id}' ({len} items)")]
    IndexOutOfRange {
        group_id: String,
        index: usize,
        len: usize,
    },

    /// No item with this group/label key exists in the group.
    #[error("Unknown item '{key}' in filter group '{group_id}'")]
    UnknownItem { group_id: String, key: String },

    /// No item in the filter group carries this group tag.
    #[error("Unknown group label '{label}' in filter group '{group_id}'")]
    UnknownGroupLabel { group_id: String, label: String },

    /// Payload could not be parsed.
    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document does not satisfy its JSON Schema.
    #[error("Schema violation: {}", .0.join("; "))]
    Schema(Vec<String>),

    /// Invalid engine or API configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Field-level validation failed.
    #[error("Validation failed:\n{}", .0.join("\n"))]
    Validation(Vec<String>),
}

impl FilterError {
    pub(crate) fn unknown_group(group_id: &str) -> Self {
        FilterError::UnknownGroup {
            group_id: group_id.to_string(),
        }
    }
}
