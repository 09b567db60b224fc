use crate::models::{FilterMap, FilterState};
use crate::normalize::{count_checked, to_flat_array};
use crate::selection::SelectionMode;
use std::collections::HashSet;

/// Validate a filter payload map
/// Returns Ok(()) if consistent, or Err(Vec<String>) describing every problem
pub fn validate_filter_map(map: &FilterMap, mode: SelectionMode) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let mut group_ids: Vec<&String> = map.keys().collect();
    group_ids.sort();

    for group_id in group_ids {
        if group_id.trim().is_empty() {
            errors.push("Filter group ids cannot be empty".to_string());
        }
        validate_filter_state(group_id, &map[group_id], mode, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_filter_state(group_id: &str, state: &FilterState, mode: SelectionMode, errors: &mut Vec<String>) {
    if state.is_loading() {
        return; // Placeholder payloads carry no options yet
    }

    let items = to_flat_array(state);
    let checked = count_checked(&items);

    if state.selected_count != checked {
        errors.push(format!(
            "Group '{}': selectedCount is {} but {} items are checked",
            group_id, state.selected_count, checked
        ));
    }

    if state.is_select_all && checked != items.len() {
        errors.push(format!(
            "Group '{}': isSelectAll is set but only {} of {} items are checked",
            group_id,
            checked,
            items.len()
        ));
    }

    // A single-select pick of the only option is not a select-all
    if mode == SelectionMode::Multi && !state.is_select_all && !items.is_empty() && checked == items.len() {
        errors.push(format!(
            "Group '{}': all {} items are checked but isSelectAll is not set",
            group_id, checked
        ));
    }

    let mut seen = HashSet::new();
    for item in &items {
        if item.label.trim().is_empty() {
            errors.push(format!("Group '{}' contains an empty label", group_id));
        }
        if !seen.insert(item.key()) {
            errors.push(format!("Group '{}' has duplicate item: '{}'", group_id, item.key()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_consistent_map_passes() {
        let map: FilterMap = serde_json::from_value(json!({
            "Country": {"filters": [{"label": "US", "checked": true}], "isSelectAll": true, "selectedCount": 1},
            "Publisher": {"filters": {"Premium": ["Alpha", "Beta"]}, "isSelectAll": true, "selectedCount": 2}
        }))
        .unwrap();
        assert!(validate_filter_map(&map, SelectionMode::Multi).is_ok());
    }

    #[test]
    fn test_count_mismatch_and_duplicates_reported() {
        let map: FilterMap = serde_json::from_value(json!({
            "Country": {
                "filters": [{"label": "US", "checked": true}, {"label": "US", "checked": false}],
                "isSelectAll": true,
                "selectedCount": 2
            }
        }))
        .unwrap();

        let errors = validate_filter_map(&map, SelectionMode::Multi).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("selectedCount is 2"));
        assert!(errors[2].contains("duplicate item: 'US'"));
    }

    #[test]
    fn test_loading_groups_skipped() {
        let mut map = FilterMap::new();
        let mut state = FilterState::loading();
        state.selected_count = 3;
        map.insert("Publisher".to_string(), state);
        assert!(validate_filter_map(&map, SelectionMode::Multi).is_ok());
    }

    #[test]
    fn test_all_checked_without_select_all_flag() {
        let map: FilterMap = serde_json::from_value(json!({
            "Country": {
                "filters": [{"label": "US", "checked": true}, {"label": "IN", "checked": true}],
                "isSelectAll": false,
                "selectedCount": 2
            },
            "Device": {"filters": [], "isSelectAll": false, "selectedCount": 0}
        }))
        .unwrap();

        let errors = validate_filter_map(&map, SelectionMode::Multi).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("isSelectAll is not set"));

        assert!(validate_filter_map(&map, SelectionMode::Single).is_ok());
    }
}
