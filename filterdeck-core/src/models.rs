use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Identifier of one filterable dimension ("Publisher", "Country", ...)
pub type GroupId = String;

/// Filter group id -> state, the map exchanged with callers
pub type FilterMap = HashMap<GroupId, FilterState>;

/// Bucket used for items that carry no group tag
pub const ALL_BUCKET: &str = "All";

/// An atomic, selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterItem {
    pub label: String,
    #[serde(default)]
    pub checked: bool,
    /// Secondary grouping tag, only present when flattened out of a grouped source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl FilterItem {
    pub fn new(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            checked,
            group: None,
        }
    }

    pub fn in_group(label: impl Into<String>, checked: bool, group: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked,
            group: Some(group.into()),
        }
    }

    /// Stable identity of this item, independent of its position
    pub fn key(&self) -> ItemKey {
        ItemKey {
            group: self.group.clone(),
            label: self.label.clone(),
        }
    }

    pub fn has_key(&self, key: &ItemKey) -> bool {
        self.label == key.label && self.group == key.group
    }
}

/// Composite group + label identity of a filter item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub label: String,
}

impl ItemKey {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            group: None,
            label: label.into(),
        }
    }

    pub fn in_group(group: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            label: label.into(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{}/{}", group, self.label),
            None => write!(f, "{}", self.label),
        }
    }
}

/// Child entry of a nested group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    pub label: String,
    #[serde(default)]
    pub checked: bool,
}

/// Two-level hierarchy node; `checked` on a parent mirrors "all children checked"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_items: Option<Vec<SubItem>>,
}

/// Group label -> labels, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedMap {
    entries: Vec<(String, Vec<String>)>,
}

impl KeyedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the labels stored under `key`
    pub fn insert(&mut self, key: impl Into<String>, labels: Vec<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = labels,
            None => self.entries.push((key, labels)),
        }
    }

    /// Labels under `key`, creating an empty entry at the end if missing
    pub fn entry(&mut self, key: &str) -> &mut Vec<String> {
        let position = match self.entries.iter().position(|(k, _)| k == key) {
            Some(position) => position,
            None => {
                self.entries.push((key.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }

    pub fn get(&self, key: &str) -> Option<&Vec<String>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, labels)| labels)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, labels)| (k.as_str(), labels.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of labels across every key
    pub fn label_count(&self) -> usize {
        self.entries.iter().map(|(_, labels)| labels.len()).sum()
    }

    /// First key whose label list contains `label`
    pub fn key_containing(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, labels)| labels.iter().any(|l| l == label))
            .map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, Vec<String>)> for KeyedMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut map = KeyedMap::new();
        for (key, labels) in iter {
            map.insert(key, labels);
        }
        map
    }
}

impl Serialize for KeyedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, labels) in &self.entries {
            map.serialize_entry(key, labels)?;
        }
        map.end()
    }
}

struct KeyedMapVisitor;

impl<'de> Visitor<'de> for KeyedMapVisitor {
    type Value = KeyedMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of group labels to label arrays")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<KeyedMap, A::Error> {
        let mut map = KeyedMap::new();
        while let Some((key, labels)) = access.next_entry::<String, Vec<String>>()? {
            map.insert(key, labels);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for KeyedMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(KeyedMapVisitor)
    }
}

/// The three payload shapes the backend returns for a filter group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFilterShape {
    FlatList(Vec<FilterItem>),
    KeyedMap(KeyedMap),
    NestedGroups(Vec<GroupItem>),
}

/// Discriminant of a [`RawFilterShape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    FlatList,
    KeyedMap,
    NestedGroups,
}

impl RawFilterShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            RawFilterShape::FlatList(_) => ShapeKind::FlatList,
            RawFilterShape::KeyedMap(_) => ShapeKind::KeyedMap,
            RawFilterShape::NestedGroups(_) => ShapeKind::NestedGroups,
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.kind() != ShapeKind::FlatList
    }
}

impl Default for RawFilterShape {
    fn default() -> Self {
        RawFilterShape::FlatList(Vec::new())
    }
}

impl Serialize for RawFilterShape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawFilterShape::FlatList(items) => items.serialize(serializer),
            RawFilterShape::KeyedMap(map) => map.serialize(serializer),
            RawFilterShape::NestedGroups(groups) => groups.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RawFilterShape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(crate::normalize::shape_from_value(value))
    }
}

/// State of one filter group as handed in by, and back to, the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub filters: RawFilterShape,
    #[serde(default)]
    pub is_select_all: bool,
    #[serde(default)]
    pub selected_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouped: Option<bool>,
}

impl FilterState {
    /// Build a state whose counts are derived from `filters`
    pub fn new(filters: RawFilterShape) -> Self {
        let items = crate::normalize::flatten(&filters);
        let selected_count = crate::normalize::count_checked(&items);
        Self {
            filters,
            is_select_all: selected_count == items.len(),
            selected_count,
            loading: None,
            grouped: None,
        }
    }

    /// Flat, ungrouped state
    pub fn from_items(items: Vec<FilterItem>) -> Self {
        Self::new(RawFilterShape::FlatList(items))
    }

    /// Placeholder for a group whose options are still being fetched
    pub fn loading() -> Self {
        Self {
            filters: RawFilterShape::default(),
            is_select_all: false,
            selected_count: 0,
            loading: Some(true),
            grouped: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.unwrap_or(false)
    }

    /// Number of leaf items in the canonical flattening
    pub fn total_count(&self) -> usize {
        crate::normalize::flatten(&self.filters).len()
    }
}
