use crate::error::{FilterError, Result};
use crate::models::KeyedMap;
use crate::schema_validation::validate_against_schema;
use crate::selection::SelectionMode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Incremental rendering window for long option lists
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowConfig {
    /// Items shown when a list is first opened or re-searched
    pub initial: usize,
    /// Items added each time the scroll container nears its bottom
    pub increment: usize,
    /// Distance from the bottom, in pixels, that triggers growth
    pub threshold: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            initial: 50,
            increment: 50,
            threshold: 100.0,
        }
    }
}

/// Options the caller hands to the filter engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    /// Serialize grouped data back to keyed maps on commit
    pub grouped: bool,
    pub single_select: bool,
    /// Explicit group taxonomy per filter group, used as a layout hint
    pub publisher_groups: HashMap<String, KeyedMap>,
    pub window: WindowConfig,
}

impl EngineOptions {
    pub fn mode(&self) -> SelectionMode {
        if self.single_select {
            SelectionMode::Single
        } else {
            SelectionMode::Multi
        }
    }

    /// Parse options from JSON, checking them against [`options_schema`] first
    pub fn from_json_value(value: Value) -> Result<Self> {
        validate_against_schema(&options_schema(), &value).map_err(FilterError::Schema)?;
        let options: EngineOptions = serde_json::from_value(value)?;
        if options.window.increment == 0 {
            return Err(FilterError::InvalidConfiguration {
                message: "window.increment must be greater than zero".to_string(),
            });
        }
        Ok(options)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(contents)?)
    }
}

/// JSON Schema for engine option files
pub fn options_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "grouped": {"type": "boolean"},
            "singleSelect": {"type": "boolean"},
            "publisherGroups": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "array",
                        "items": {"type": "string"}
                    }
                }
            },
            "window": {
                "type": "object",
                "properties": {
                    "initial": {"type": "integer", "minimum": 1},
                    "increment": {"type": "integer", "minimum": 1},
                    "threshold": {"type": "number", "minimum": 0}
                }
            }
        },
        "additionalProperties": false
    })
}
