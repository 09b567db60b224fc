//! Backend endpoint catalogue and request envelopes.
//!
//! Every call is a JSON POST against a base URL taken from the environment.
//! Sending requests is left to the caller.

use crate::error::{FilterError, Result};
use serde::Serialize;
use serde_json::Value;

/// Environment variable holding the backend base URL
pub const BASE_URL_ENV: &str = "FILTERDECK_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Categories,
    Templates,
    TemplateFields,
    /// Filter values for one dimension
    FilterValues { field_id: String },
    CreateReport,
    EditReport,
    ViewReport,
    DeleteReport,
    ToggleReportStatus,
    MailingLists,
    CreateMailingList,
    EditMailingList,
    ToggleMailingListStatus,
    ReengagementConfig,
    SaveReengagementConfig,
}

impl Endpoint {
    pub fn path(&self) -> String {
        let path = match self {
            Endpoint::Categories => "get_category",
            Endpoint::Templates => "get_template",
            Endpoint::TemplateFields => "get_template_fields",
            Endpoint::FilterValues { field_id } => return format!("fields/filters/{}", field_id),
            Endpoint::CreateReport => "create_report",
            Endpoint::EditReport => "edit_report",
            Endpoint::ViewReport => "view_report",
            Endpoint::DeleteReport => "delete_report",
            Endpoint::ToggleReportStatus => "report_status",
            Endpoint::MailingLists => "mailing_list",
            Endpoint::CreateMailingList => "create_mailing_list",
            Endpoint::EditMailingList => "edit_mailing_list",
            Endpoint::ToggleMailingListStatus => "mailing_list_status",
            Endpoint::ReengagementConfig => "get_reengagement_config",
            Endpoint::SaveReengagementConfig => "save_reengagement_config",
        };
        path.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(FilterError::InvalidConfiguration {
                message: format!("API base URL must be http(s), got '{}'", base_url),
            });
        }
        Ok(Self {
            base_url: base_url.to_string(),
        })
    }

    /// Read the base URL from [`BASE_URL_ENV`]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(BASE_URL_ENV).ok_or_else(|| FilterError::InvalidConfiguration {
            message: format!("{} is not set", BASE_URL_ENV),
        })?;
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    pub fn request(&self, endpoint: Endpoint, body: Value) -> ApiRequest {
        ApiRequest {
            url: self.url(&endpoint),
            endpoint,
            body,
        }
    }
}

/// A POST request ready to be sent by the caller's transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    #[serde(skip)]
    pub endpoint: Endpoint,
    pub url: String,
    pub body: Value,
}

impl ApiRequest {
    pub fn method(&self) -> &'static str {
        "POST"
    }
}
