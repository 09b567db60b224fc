//! Report definitions as edited on the generate/edit pages.

use crate::api::{ApiConfig, ApiRequest, Endpoint};
use crate::error::{FilterError, Result};
use crate::mailing_list::is_valid_email;
use crate::models::FilterMap;
use crate::normalize::checked_labels;
use crate::schema_validation::validate_against_schema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Delivery {
    Email {
        #[serde(default)]
        recipients: Vec<String>,
        #[serde(default, rename = "mailingLists")]
        mailing_lists: Vec<String>,
    },
    Cloud {
        provider: String,
        path: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<String>,
    /// Committed filter groups, keyed by dimension
    #[serde(default)]
    pub filters: FilterMap,
    #[serde(default)]
    pub frequency: Frequency,
    pub delivery: Delivery,
}

impl ReportDraft {
    /// Validate the draft the way the generate page does before submitting
    /// Returns Ok(()) if valid, or Err(Vec<String>) with validation errors
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Report name cannot be empty".to_string());
        }
        if self.category.as_deref().map_or(true, |c| c.trim().is_empty()) {
            errors.push("A category must be selected".to_string());
        }
        if self.template.as_deref().map_or(true, |t| t.trim().is_empty()) {
            errors.push("A template must be selected".to_string());
        }
        if self.dimensions.is_empty() {
            errors.push("At least one dimension must be selected".to_string());
        }
        if self.metrics.is_empty() {
            errors.push("At least one metric must be selected".to_string());
        }

        let mut filter_ids: Vec<&String> = self.filters.keys().collect();
        filter_ids.sort();
        for id in filter_ids {
            if !self.dimensions.contains(id) {
                errors.push(format!("Filter '{}' is not one of the selected dimensions", id));
            }
            let state = &self.filters[id];
            if !state.is_loading() && state.selected_count == 0 {
                errors.push(format!("Filter '{}' has no values selected", id));
            }
        }

        match &self.delivery {
            Delivery::Email {
                recipients,
                mailing_lists,
            } => {
                if recipients.is_empty() && mailing_lists.is_empty() {
                    errors.push("Email delivery needs a recipient or a mailing list".to_string());
                }
                for recipient in recipients {
                    if !is_valid_email(recipient) {
                        errors.push(format!("Invalid recipient email: '{}'", recipient));
                    }
                }
            }
            Delivery::Cloud { provider, path } => {
                if provider.trim().is_empty() {
                    errors.push("Cloud delivery needs a provider".to_string());
                }
                if path.trim().is_empty() {
                    errors.push("Cloud delivery needs a destination path".to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Values chosen per dimension. Groups left fully selected put no
    /// restriction on the report and are omitted.
    pub fn filter_values(&self) -> BTreeMap<String, Vec<String>> {
        self.filters
            .iter()
            .filter(|(_, state)| !state.is_select_all && !state.is_loading())
            .map(|(id, state)| (id.clone(), checked_labels(state)))
            .collect()
    }

    /// Request body for the create/edit call, checked against [`request_schema`]
    pub fn request_body(&self, mode: RequestMode) -> Result<Value> {
        self.validate().map_err(FilterError::Validation)?;

        let mut body = json!({
            "name": self.name.trim(),
            "category": self.category,
            "template": self.template,
            "dimensions": self.dimensions,
            "metrics": self.metrics,
            "filters": self.filter_values(),
            "frequency": self.frequency,
            "delivery": self.delivery,
        });

        if mode == RequestMode::Edit {
            let id = self.id.as_ref().ok_or_else(|| {
                FilterError::Validation(vec!["Only saved reports can be edited".to_string()])
            })?;
            body["id"] = json!(id);
        }

        validate_against_schema(&request_schema(), &body).map_err(FilterError::Schema)?;
        Ok(body)
    }

    pub fn to_request(&self, api: &ApiConfig, mode: RequestMode) -> Result<ApiRequest> {
        let endpoint = match mode {
            RequestMode::Create => Endpoint::CreateReport,
            RequestMode::Edit => Endpoint::EditReport,
        };
        Ok(api.request(endpoint, self.request_body(mode)?))
    }
}

/// JSON Schema of the create/edit report request body
pub fn request_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["name", "category", "template", "dimensions", "metrics", "filters", "frequency", "delivery"],
        "properties": {
            "id": {"type": "string"},
            "name": {"type": "string", "minLength": 1},
            "category": {"type": "string"},
            "template": {"type": "string"},
            "dimensions": {"type": "array", "items": {"type": "string"}, "minItems": 1},
            "metrics": {"type": "array", "items": {"type": "string"}, "minItems": 1},
            "filters": {
                "type": "object",
                "additionalProperties": {"type": "array", "items": {"type": "string"}}
            },
            "frequency": {"enum": ["once", "daily", "weekly", "monthly"]},
            "delivery": {
                "type": "object",
                "required": ["type"],
                "properties": {"type": {"enum": ["email", "cloud"]}}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterItem, FilterState};

    fn draft() -> ReportDraft {
        let mut filters = FilterMap::new();
        filters.insert(
            "Country".to_string(),
            FilterState::from_items(vec![FilterItem::new("US", true), FilterItem::new("IN", false)]),
        );
        filters.insert(
            "Publisher".to_string(),
            FilterState::from_items(vec![FilterItem::new("Alpha", true)]),
        );

        ReportDraft {
            id: None,
            name: "Weekly installs".to_string(),
            category: Some("Acquisition".to_string()),
            template: Some("Installs by geo".to_string()),
            dimensions: vec!["Country".to_string(), "Publisher".to_string()],
            metrics: vec!["installs".to_string()],
            filters,
            frequency: Frequency::Weekly,
            delivery: Delivery::Email {
                recipients: vec!["ops@example.com".to_string()],
                mailing_lists: Vec::new(),
            },
        }
    }

    #[test]
    fn test_valid_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_page_level_rules() {
        let mut draft = draft();
        draft.dimensions = vec!["Country".to_string()];
        draft.metrics.clear();
        draft.filters.get_mut("Country").unwrap().selected_count = 0;
        draft.delivery = Delivery::Cloud {
            provider: "s3".to_string(),
            path: " ".to_string(),
        };

        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("'Publisher' is not one of")));
        assert!(errors.iter().any(|e| e.contains("'Country' has no values")));
    }

    #[test]
    fn test_filter_values_skip_fully_selected_groups() {
        let values = draft().filter_values();
        assert_eq!(values.len(), 1);
        assert_eq!(values["Country"], vec!["US"]);
    }

    #[test]
    fn test_request_body_and_endpoint() {
        let api = ApiConfig::new("https://api.example.com").unwrap();
        let request = draft().to_request(&api, RequestMode::Create).unwrap();
        assert_eq!(request.url, "https://api.example.com/create_report");
        assert_eq!(request.body["frequency"], json!("weekly"));
        assert_eq!(request.body["delivery"]["type"], json!("email"));
        assert_eq!(request.body["filters"], json!({"Country": ["US"]}));
        assert!(request.body.get("id").is_none());
    }

    #[test]
    fn test_edit_requires_id() {
        let mut draft = draft();
        assert!(matches!(
            draft.request_body(RequestMode::Edit),
            Err(FilterError::Validation(_))
        ));

        draft.id = Some("r-9".to_string());
        assert_eq!(draft.request_body(RequestMode::Edit).unwrap()["id"], json!("r-9"));
    }
}
