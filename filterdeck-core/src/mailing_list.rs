use crate::api::{ApiConfig, ApiRequest, Endpoint};
use crate::error::{FilterError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::sync::OnceLock;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Pragmatic address check: something@domain.tld without whitespace
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .get_or_init(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
        })
        .is_match(email.trim())
}

/// Split free-form input (commas, semicolons, whitespace) into addresses
pub fn parse_emails(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub emails: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl MailingList {
    pub fn new(name: impl Into<String>, emails: Vec<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            emails,
            active: true,
        }
    }

    /// Validate before create/edit
    /// Returns Ok(()) if valid, or Err(Vec<String>) with validation errors
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Mailing list name cannot be empty".to_string());
        }

        if self.emails.is_empty() {
            errors.push("Mailing list must contain at least one email".to_string());
        }

        let mut seen = HashSet::new();
        for email in &self.emails {
            if !is_valid_email(email) {
                errors.push(format!("Invalid email address: '{}'", email));
            }
            if !seen.insert(email.trim().to_lowercase()) {
                errors.push(format!("Duplicate email address: '{}'", email));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Flip active/inactive, returning the new status
    pub fn toggle_status(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    /// Create request for a new list, or edit request when the list has an id
    pub fn save_request(&self, api: &ApiConfig) -> Result<ApiRequest> {
        self.validate().map_err(FilterError::Validation)?;
        let endpoint = if self.id.is_some() {
            Endpoint::EditMailingList
        } else {
            Endpoint::CreateMailingList
        };
        Ok(api.request(endpoint, serde_json::to_value(self)?))
    }

    pub fn status_request(&self, api: &ApiConfig) -> Result<ApiRequest> {
        let id = self.id.as_ref().ok_or_else(|| {
            FilterError::Validation(vec!["Mailing list has not been saved yet".to_string()])
        })?;
        Ok(api.request(
            Endpoint::ToggleMailingListStatus,
            json!({"id": id, "active": self.active}),
        ))
    }
}
