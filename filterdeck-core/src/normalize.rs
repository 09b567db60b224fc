//! Conversion between the three backend payload shapes and the canonical
//! flat item list the selection engine works on.

use crate::models::{FilterItem, FilterState, GroupItem, KeyedMap, RawFilterShape, SubItem, ALL_BUCKET};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Sniff the payload shape from raw JSON.
///
/// Objects are keyed maps, arrays whose elements carry `subItems` are nested
/// groups, any other array is a flat list. Malformed fragments are dropped
/// with a warning instead of failing the whole group.
pub fn shape_from_value(value: Value) -> RawFilterShape {
    match value {
        Value::Object(map) => {
            let mut keyed = KeyedMap::new();
            for (group, labels) in map {
                let labels = match labels {
                    Value::Array(entries) => string_entries(&group, entries),
                    other => {
                        warn!(group = %group, found = %other, "keyed filter group is not an array");
                        Vec::new()
                    }
                };
                keyed.insert(group, labels);
            }
            RawFilterShape::KeyedMap(keyed)
        }
        Value::Array(entries) => {
            let nested = entries
                .iter()
                .any(|entry| entry.get("subItems").is_some());
            if nested {
                RawFilterShape::NestedGroups(entries.into_iter().filter_map(group_item).collect())
            } else {
                RawFilterShape::FlatList(entries.into_iter().filter_map(flat_item).collect())
            }
        }
        Value::Null => RawFilterShape::default(),
        other => {
            warn!(found = %other, "unrecognised filter payload, treating as empty");
            RawFilterShape::default()
        }
    }
}

fn string_entries(group: &str, entries: Vec<Value>) -> Vec<String> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s),
            other => {
                warn!(group = %group, found = %other, "skipping non-string filter label");
                None
            }
        })
        .collect()
}

fn flat_item(entry: Value) -> Option<FilterItem> {
    match serde_json::from_value::<FilterItem>(entry.clone()) {
        Ok(item) => Some(item),
        Err(err) => {
            warn!(found = %entry, error = %err, "skipping malformed filter item");
            None
        }
    }
}

fn group_item(entry: Value) -> Option<GroupItem> {
    let label = match entry.get("label").and_then(Value::as_str) {
        Some(label) => label.to_string(),
        None => {
            warn!(found = %entry, "skipping filter group without a label");
            return None;
        }
    };
    let checked = entry.get("checked").and_then(Value::as_bool);
    let sub_items = match entry.get("subItems") {
        None | Some(Value::Null) => None,
        Some(Value::Array(children)) => Some(
            children
                .iter()
                .filter_map(|child| {
                    let parsed = serde_json::from_value::<SubItem>(child.clone()).ok();
                    if parsed.is_none() {
                        warn!(group = %label, found = %child, "skipping malformed sub item");
                    }
                    parsed
                })
                .collect(),
        ),
        Some(other) => {
            warn!(group = %label, found = %other, "subItems is not an array, group contributes no items");
            Some(Vec::new())
        }
    };
    Some(GroupItem {
        label,
        checked,
        sub_items,
    })
}

/// Canonical flat form of a filter state
pub fn to_flat_array(state: &FilterState) -> Vec<FilterItem> {
    flatten(&state.filters)
}

/// Canonical flat form of a raw payload shape
pub fn flatten(shape: &RawFilterShape) -> Vec<FilterItem> {
    match shape {
        RawFilterShape::FlatList(items) => items.clone(),
        RawFilterShape::NestedGroups(groups) => groups
            .iter()
            .flat_map(|group| {
                group
                    .sub_items
                    .iter()
                    .flatten()
                    .map(move |sub| FilterItem::in_group(sub.label.clone(), sub.checked, group.label.clone()))
            })
            .collect(),
        // The backend only lists available options, so everything starts selected
        RawFilterShape::KeyedMap(map) => map
            .iter()
            .flat_map(|(group, labels)| {
                labels
                    .iter()
                    .map(move |label| FilterItem::in_group(label.clone(), true, group))
            })
            .collect(),
    }
}

pub fn count_checked(items: &[FilterItem]) -> usize {
    items.iter().filter(|item| item.checked).count()
}

/// Labels of every checked leaf, in flat order
pub fn checked_labels(state: &FilterState) -> Vec<String> {
    to_flat_array(state)
        .into_iter()
        .filter(|item| item.checked)
        .map(|item| item.label)
        .collect()
}

/// Rebuild the payload shape of `original` from an edited flat list.
///
/// Nested groups get each child's `checked` written back, matching on
/// group + label; repeated keys are matched positionally. Keyed maps come
/// back holding only the checked labels. Flat lists are returned as-is.
pub fn to_original_shape(original: &RawFilterShape, flat: &[FilterItem]) -> RawFilterShape {
    match original {
        RawFilterShape::FlatList(_) => RawFilterShape::FlatList(flat.to_vec()),
        RawFilterShape::NestedGroups(groups) => {
            let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
            let rebuilt = groups
                .iter()
                .map(|group| {
                    let sub_items = group.sub_items.as_ref().map(|children| {
                        children
                            .iter()
                            .map(|child| {
                                let occurrence = seen
                                    .entry((group.label.as_str(), child.label.as_str()))
                                    .or_insert(0);
                                let checked = nth_match(flat, &group.label, &child.label, *occurrence)
                                    .map(|item| item.checked)
                                    .unwrap_or(child.checked);
                                *occurrence += 1;
                                SubItem {
                                    label: child.label.clone(),
                                    checked,
                                }
                            })
                            .collect::<Vec<_>>()
                    });
                    let checked = match (&group.checked, &sub_items) {
                        (Some(_), Some(children)) if !children.is_empty() => {
                            Some(children.iter().all(|child| child.checked))
                        }
                        (checked, _) => *checked,
                    };
                    GroupItem {
                        label: group.label.clone(),
                        checked,
                        sub_items,
                    }
                })
                .collect();
            RawFilterShape::NestedGroups(rebuilt)
        }
        RawFilterShape::KeyedMap(map) => {
            let keys: Vec<String> = map.keys().map(str::to_string).collect();
            RawFilterShape::KeyedMap(selected_by_group(flat, &keys))
        }
    }
}

fn nth_match<'a>(flat: &'a [FilterItem], group: &str, label: &str, n: usize) -> Option<&'a FilterItem> {
    let mut matches = flat
        .iter()
        .filter(|item| item.label == label && item.group.as_deref() == Some(group));
    let first = matches.clone().next();
    matches.nth(n).or(first)
}

/// Keyed map of checked labels, seeded with `keys` as empty entries.
/// Untagged items land in the "All" bucket.
pub fn selected_by_group(flat: &[FilterItem], keys: &[String]) -> KeyedMap {
    let mut map: KeyedMap = keys.iter().map(|k| (k.clone(), Vec::new())).collect();
    for item in flat.iter().filter(|item| item.checked) {
        let group = item.group.as_deref().unwrap_or(ALL_BUCKET);
        map.entry(group).push(item.label.clone());
    }
    map
}
