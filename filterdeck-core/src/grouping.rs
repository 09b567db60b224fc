use crate::models::{FilterItem, KeyedMap, ALL_BUCKET};
use crate::sorting::sort_keys;
use std::collections::HashMap;

/// Bucket used for labels that do not start with a printable character
pub const OTHER_BUCKET: &str = "#";

/// Contiguous run of items rendered under one index header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBucket {
    pub key: String,
    /// Positions into the full flat item list
    pub entries: Vec<usize>,
}

impl IndexBucket {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: Vec::new(),
        }
    }
}

/// Find the explicit group taxonomy for a filter group.
///
/// Exact id match first, then a case-insensitive substring match in either
/// direction between the id and the configured keys (alphabetical key order
/// decides between several candidates).
pub fn resolve_group_config<'a>(
    group_id: &str,
    taxonomy: &'a HashMap<String, KeyedMap>,
) -> Option<&'a KeyedMap> {
    if let Some(config) = taxonomy.get(group_id) {
        return Some(config);
    }

    let needle = group_id.to_lowercase();
    let mut candidates: Vec<&String> = taxonomy
        .keys()
        .filter(|key| {
            let key = key.to_lowercase();
            !key.is_empty() && (key.contains(&needle) || needle.contains(&key))
        })
        .collect();
    candidates.sort();
    candidates.first().and_then(|key| taxonomy.get(*key))
}

/// Bucket an item belongs to: its own tag, else the configured key listing
/// its label, else "All"
pub fn bucket_key<'a>(item: &'a FilterItem, config: Option<&'a KeyedMap>) -> &'a str {
    if let Some(group) = item.group.as_deref() {
        return group;
    }
    config
        .and_then(|config| config.key_containing(&item.label))
        .unwrap_or(ALL_BUCKET)
}

/// Uppercased first character of a label
pub fn letter_key(label: &str) -> String {
    match label.trim().chars().next() {
        Some(c) if !c.is_control() => c.to_uppercase().collect(),
        _ => OTHER_BUCKET.to_string(),
    }
}

/// Alphabetical jump-list buckets, keys sorted accent-insensitively,
/// items keeping their input order inside a bucket
pub fn group_by_letter<'a>(entries: impl IntoIterator<Item = (usize, &'a FilterItem)>) -> Vec<IndexBucket> {
    let mut buckets: HashMap<String, IndexBucket> = HashMap::new();
    for (index, item) in entries {
        let key = letter_key(&item.label);
        buckets
            .entry(key.clone())
            .or_insert_with(|| IndexBucket::new(key))
            .entries
            .push(index);
    }

    let mut keys: Vec<String> = buckets.keys().cloned().collect();
    sort_keys(&mut keys);
    keys.into_iter()
        .filter_map(|key| buckets.remove(&key))
        .collect()
}

/// Buckets by group tag.
///
/// With a configuration, its keys come first in configured order; tags not
/// in the configuration are appended as they appear. Without one, buckets
/// follow first appearance. Empty buckets are dropped.
pub fn group_by_key<'a>(
    entries: impl IntoIterator<Item = (usize, &'a FilterItem)>,
    config: Option<&'a KeyedMap>,
) -> Vec<IndexBucket> {
    let mut buckets: Vec<IndexBucket> = config
        .map(|config| config.keys().map(IndexBucket::new).collect())
        .unwrap_or_default();

    for (index, item) in entries {
        let key = bucket_key(item, config);
        match buckets.iter_mut().find(|bucket| bucket.key == key) {
            Some(bucket) => bucket.entries.push(index),
            None => {
                let mut bucket = IndexBucket::new(key);
                bucket.entries.push(index);
                buckets.push(bucket);
            }
        }
    }

    buckets.retain(|bucket| !bucket.entries.is_empty());
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn taxonomy() -> HashMap<String, KeyedMap> {
        serde_json::from_value(json!({
            "Publisher": {"Premium": ["Alpha"], "Longtail": ["Beta", "Gamma"]},
            "Country Groups": {"EU": ["DE"]}
        }))
        .unwrap()
    }

    #[test]
    fn test_resolve_exact_then_substring() {
        let taxonomy = taxonomy();
        assert!(resolve_group_config("Publisher", &taxonomy).is_some());

        let fuzzy = resolve_group_config("sub_publisher", &taxonomy).unwrap();
        assert!(fuzzy.contains_key("Premium"));

        let reverse = resolve_group_config("country", &taxonomy).unwrap();
        assert!(reverse.contains_key("EU"));

        assert!(resolve_group_config("Device", &taxonomy).is_none());
    }

    #[test]
    fn test_group_by_letter() {
        let items = vec![
            FilterItem::new("beta", false),
            FilterItem::new("Alpha", false),
            FilterItem::new("Bravo", false),
            FilterItem::new("", false),
        ];
        let buckets = group_by_letter(items.iter().enumerate());
        let keys: Vec<_> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["#", "A", "B"]);
        assert_eq!(buckets[2].entries, vec![0, 2]);
    }

    #[test]
    fn test_group_by_key_with_config() {
        let taxonomy = taxonomy();
        let config = taxonomy.get("Publisher");
        let items = vec![
            FilterItem::new("Gamma", true),
            FilterItem::new("Unknown", false),
            FilterItem::new("Alpha", false),
            FilterItem::in_group("Delta", false, "Direct"),
        ];

        let buckets = group_by_key(items.iter().enumerate(), config);
        let keys: Vec<_> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["Premium", "Longtail", "All", "Direct"]);
        assert_eq!(buckets[1].entries, vec![0]);
    }

    #[test]
    fn test_group_by_key_dynamic_tags() {
        let items = vec![
            FilterItem::in_group("US", false, "NA"),
            FilterItem::in_group("DE", false, "EU"),
            FilterItem::in_group("CA", false, "NA"),
        ];
        let buckets = group_by_key(items.iter().enumerate(), None);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key, "NA");
        assert_eq!(buckets[0].entries, vec![0, 2]);
    }

    #[test]
    fn test_group_by_key_without_tags_is_single_all_bucket() {
        let items = vec![FilterItem::new("x", false), FilterItem::new("y", false)];
        let buckets = group_by_key(items.iter().enumerate(), None);
        assert_eq!(buckets, vec![IndexBucket { key: "All".to_string(), entries: vec![0, 1] }]);
    }
}
