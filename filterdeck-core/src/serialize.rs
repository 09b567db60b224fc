//! Turning an edited working copy back into the payload callers expect.

use crate::grouping::bucket_key;
use crate::models::{FilterState, KeyedMap, RawFilterShape, ShapeKind};
use crate::selection::{SelectionGroup, SelectionMode};

/// Serialize one working group for the change callback.
///
/// - single-select: a flat list with the picked label (or the all/none state)
/// - grouped nested groups: keyed map of groups with at least one checked child
/// - other grouped data: keyed map seeded with the configured keys
/// - ungrouped: the working copy with every option and its checked flag; keyed
///   sources come back as a tagged flat list
pub fn serialize_group(group: &SelectionGroup, grouped: bool, config: Option<&KeyedMap>) -> FilterState {
    if group.mode() == SelectionMode::Single {
        return serialize_single(group);
    }

    let filters = match (grouped, group.source_kind()) {
        (true, ShapeKind::NestedGroups) => RawFilterShape::KeyedMap(checked_groups(group)),
        (true, _) => RawFilterShape::KeyedMap(checked_by_config(group, config)),
        (false, _) => return group.to_state(),
    };

    FilterState {
        filters,
        is_select_all: group.is_select_all(),
        selected_count: group.selected_count(),
        loading: group.loading(),
        grouped: Some(true),
    }
}

fn serialize_single(group: &SelectionGroup) -> FilterState {
    let items = group.items().to_vec();
    let (selected_count, is_select_all) = match group.selected_value() {
        Some(_) => (1, false),
        None => (group.selected_count(), group.is_select_all()),
    };
    FilterState {
        filters: RawFilterShape::FlatList(items),
        is_select_all,
        selected_count,
        loading: group.loading(),
        grouped: None,
    }
}

/// Group label -> checked child labels, omitting groups with none checked
fn checked_groups(group: &SelectionGroup) -> KeyedMap {
    let mut map = KeyedMap::new();
    for item in group.items().iter().filter(|item| item.checked) {
        if let Some(tag) = item.group.as_deref() {
            map.entry(tag).push(item.label.clone());
        }
    }
    map
}

fn checked_by_config(group: &SelectionGroup, config: Option<&KeyedMap>) -> KeyedMap {
    let mut map: KeyedMap = config
        .map(|config| config.keys().map(|key| (key.to_string(), Vec::new())).collect())
        .unwrap_or_default();
    for item in group.items().iter().filter(|item| item.checked) {
        map.entry(bucket_key(item, config)).push(item.label.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterItem;
    use crate::normalize::shape_from_value;
    use serde_json::json;

    fn nested(mode: SelectionMode) -> SelectionGroup {
        let state = FilterState::new(shape_from_value(json!([
            {"label": "EU", "subItems": [
                {"label": "DE", "checked": false},
                {"label": "FR", "checked": false}
            ]},
            {"label": "NA", "subItems": [
                {"label": "US", "checked": true},
                {"label": "CA", "checked": false}
            ]}
        ])));
        SelectionGroup::from_state("Country", &state, mode)
    }

    #[test]
    fn test_grouped_commit_omits_empty_groups() {
        let state = serialize_group(&nested(SelectionMode::Multi), true, None);
        assert_eq!(serde_json::to_value(&state.filters).unwrap(), json!({"NA": ["US"]}));
        assert_eq!(state.selected_count, 1);
    }

    #[test]
    fn test_grouped_commit_two_checked_in_one_group() {
        let mut group = nested(SelectionMode::Multi);
        group.toggle_item(2).unwrap();
        group.toggle_group("EU").unwrap();
        group.toggle_item(0).unwrap();

        // EU: only FR left checked, NA: nothing
        let state = serialize_group(&group, true, None);
        assert_eq!(serde_json::to_value(&state.filters).unwrap(), json!({"EU": ["FR"]}));
    }

    #[test]
    fn test_grouped_flat_commit_uses_config_keys() {
        let state = FilterState::from_items(vec![
            FilterItem::new("Alpha", true),
            FilterItem::new("Beta", true),
            FilterItem::new("Stray", true),
            FilterItem::new("Gamma", false),
        ]);
        let group = SelectionGroup::from_state("Publisher", &state, SelectionMode::Multi);
        let config: KeyedMap = serde_json::from_value(json!({
            "Premium": ["Alpha"],
            "Longtail": ["Beta", "Gamma"],
            "Unused": []
        }))
        .unwrap();

        let serialized = serialize_group(&group, true, Some(&config));
        assert_eq!(
            serde_json::to_value(&serialized.filters).unwrap(),
            json!({"Premium": ["Alpha"], "Longtail": ["Beta"], "Unused": [], "All": ["Stray"]})
        );
        assert_eq!(serialized.grouped, Some(true));
    }

    #[test]
    fn test_ungrouped_commit_keeps_shape() {
        let group = nested(SelectionMode::Multi);
        let state = serialize_group(&group, false, None);
        assert_eq!(state.filters.kind(), ShapeKind::NestedGroups);
        assert_eq!(state, group.to_state());
    }

    #[test]
    fn test_ungrouped_keyed_commit_keeps_unchecked_options() {
        let state = FilterState::new(RawFilterShape::KeyedMap(
            serde_json::from_value(json!({"Social": ["Meta", "Snap"], "Search": ["Google"]})).unwrap(),
        ));
        let mut group = SelectionGroup::from_state("Publisher", &state, SelectionMode::Multi);
        group.toggle_item(1).unwrap();

        let serialized = serialize_group(&group, false, None);
        assert_eq!(
            serialized.filters,
            RawFilterShape::FlatList(vec![
                FilterItem::in_group("Meta", true, "Social"),
                FilterItem::in_group("Snap", false, "Social"),
                FilterItem::in_group("Google", true, "Search"),
            ])
        );
        assert_eq!(serialized.selected_count, 2);
        assert!(!serialized.is_select_all);
        assert_eq!(serialized.grouped, Some(true));
    }

    #[test]
    fn test_single_select_commit_writes_flat_pick() {
        let mut group = nested(SelectionMode::Single);
        group.toggle_item(3).unwrap();
        let state = serialize_group(&group, true, None);

        assert_eq!(state.selected_count, 1);
        assert!(!state.is_select_all);
        match state.filters {
            RawFilterShape::FlatList(items) => {
                let checked: Vec<_> = items.iter().filter(|i| i.checked).map(|i| i.label.as_str()).collect();
                assert_eq!(checked, vec!["CA"]);
            }
            other => panic!("expected flat list, got {:?}", other),
        }
    }

    #[test]
    fn test_single_select_sentinel_commit() {
        let mut group = nested(SelectionMode::Single);
        group.toggle_select_all();
        let state = serialize_group(&group, false, None);
        assert!(state.is_select_all);
        assert_eq!(state.selected_count, 4);
    }
}
