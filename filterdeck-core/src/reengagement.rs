use crate::api::{ApiConfig, ApiRequest, Endpoint};
use crate::error::{FilterError, Result};
use crate::models::FilterMap;
use crate::normalize::checked_labels;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Allowed attribution window, in days
pub const ATTRIBUTION_WINDOW_DAYS: RangeInclusive<u32> = 1..=90;

const PERCENT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutSplit {
    pub party: String,
    pub percent: f64,
}

/// Targeting for one side of a configuration: everything, or an explicit list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "values", rename_all = "lowercase")]
pub enum Targeting {
    All,
    Only(Vec<String>),
}

impl Targeting {
    /// Read targeting from a committed filter group
    pub fn from_filter(filters: &FilterMap, group_id: &str) -> Self {
        match filters.get(group_id) {
            None => Targeting::All,
            Some(state) if state.is_select_all => Targeting::All,
            Some(state) => Targeting::Only(checked_labels(state)),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Targeting::Only(values) if values.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReengagementConfig {
    pub attribution_window_days: u32,
    pub payout_splits: Vec<PayoutSplit>,
    pub publishers: Targeting,
    pub countries: Targeting,
}

impl ReengagementConfig {
    /// Build a configuration whose publisher allow-list and geo selection come
    /// from the configuration page's filter groups
    pub fn from_filters(
        attribution_window_days: u32,
        payout_splits: Vec<PayoutSplit>,
        filters: &FilterMap,
        publisher_group: &str,
        country_group: &str,
    ) -> Self {
        Self {
            attribution_window_days,
            payout_splits,
            publishers: Targeting::from_filter(filters, publisher_group),
            countries: Targeting::from_filter(filters, country_group),
        }
    }

    /// Returns Ok(()) if valid, or Err(Vec<String>) with validation errors
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !ATTRIBUTION_WINDOW_DAYS.contains(&self.attribution_window_days) {
            errors.push(format!(
                "Attribution window must be between {} and {} days, got {}",
                ATTRIBUTION_WINDOW_DAYS.start(),
                ATTRIBUTION_WINDOW_DAYS.end(),
                self.attribution_window_days
            ));
        }

        if self.payout_splits.is_empty() {
            errors.push("At least one payout split is required".to_string());
        } else {
            let mut parties = HashSet::new();
            for split in &self.payout_splits {
                if split.party.trim().is_empty() {
                    errors.push("Payout split party cannot be empty".to_string());
                } else if !parties.insert(split.party.trim().to_lowercase()) {
                    errors.push(format!("Duplicate payout split party: '{}'", split.party));
                }
                if !(0.0..=100.0).contains(&split.percent) {
                    errors.push(format!(
                        "Payout split for '{}' must be between 0 and 100, got {}",
                        split.party, split.percent
                    ));
                }
            }

            let total: f64 = self.payout_splits.iter().map(|split| split.percent).sum();
            if (total - 100.0).abs() > PERCENT_TOLERANCE {
                errors.push(format!("Payout splits must total 100%, got {}%", total));
            }
        }

        if self.publishers.is_empty() {
            errors.push("Select at least one publisher".to_string());
        }
        if self.countries.is_empty() {
            errors.push("Select at least one country".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn save_request(&self, api: &ApiConfig) -> Result<ApiRequest> {
        self.validate().map_err(FilterError::Validation)?;
        Ok(api.request(Endpoint::SaveReengagementConfig, serde_json::to_value(self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterItem, FilterState};
    use serde_json::json;

    fn splits(values: &[(&str, f64)]) -> Vec<PayoutSplit> {
        values
            .iter()
            .map(|(party, percent)| PayoutSplit {
                party: party.to_string(),
                percent: *percent,
            })
            .collect()
    }

    fn filters() -> FilterMap {
        let mut map = FilterMap::new();
        map.insert(
            "Publisher".to_string(),
            FilterState::from_items(vec![FilterItem::new("Alpha", true), FilterItem::new("Beta", false)]),
        );
        map.insert(
            "Country".to_string(),
            FilterState::from_items(vec![FilterItem::new("US", true), FilterItem::new("IN", true)]),
        );
        map
    }

    #[test]
    fn test_targeting_from_filters() {
        let config = ReengagementConfig::from_filters(
            30,
            splits(&[("network", 70.0), ("publisher", 30.0)]),
            &filters(),
            "Publisher",
            "Country",
        );
        assert_eq!(config.publishers, Targeting::Only(vec!["Alpha".to_string()]));
        assert_eq!(config.countries, Targeting::All);
        assert!(config.validate().is_ok());

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["publishers"], json!({"mode": "only", "values": ["Alpha"]}));
        assert_eq!(value["attributionWindowDays"], json!(30));
    }

    #[test]
    fn test_invalid_config() {
        let mut filters = filters();
        filters.insert(
            "Publisher".to_string(),
            FilterState::from_items(vec![FilterItem::new("Alpha", false)]),
        );

        let config = ReengagementConfig::from_filters(
            120,
            splits(&[("network", 70.0), ("Network", 20.0)]),
            &filters,
            "Publisher",
            "Country",
        );
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("between 1 and 90"));
        assert!(errors.iter().any(|e| e.contains("total 100%")));
        assert!(errors.iter().any(|e| e.contains("Duplicate")));
        assert!(errors.iter().any(|e| e.contains("publisher")));
    }

    #[test]
    fn test_missing_group_means_all() {
        assert_eq!(Targeting::from_filter(&FilterMap::new(), "Country"), Targeting::All);
    }
}
