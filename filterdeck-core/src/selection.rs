use crate::error::{FilterError, Result};
use crate::models::{FilterItem, FilterState, ItemKey, RawFilterShape, ShapeKind};
use crate::normalize::{count_checked, flatten, to_original_shape};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether a filter group allows one or many checked items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    #[default]
    Multi,
    Single,
}

/// Editable working copy of one filter group, held in canonical flat form.
///
/// In single-select mode `selected_value == None` together with
/// `is_select_all` is the "everything selected" sentinel.
#[derive(Debug, Clone)]
pub struct SelectionGroup {
    id: String,
    source: RawFilterShape,
    items: Vec<FilterItem>,
    mode: SelectionMode,
    is_select_all: bool,
    selected_count: usize,
    selected_value: Option<String>,
    loading: Option<bool>,
    grouped: Option<bool>,
}

impl SelectionGroup {
    pub fn from_state(id: impl Into<String>, state: &FilterState, mode: SelectionMode) -> Self {
        let mut group = Self {
            id: id.into(),
            source: state.filters.clone(),
            items: flatten(&state.filters),
            mode,
            is_select_all: false,
            selected_count: 0,
            selected_value: None,
            loading: state.loading,
            grouped: state.grouped,
        };

        match mode {
            SelectionMode::Multi => group.recount(),
            SelectionMode::Single if state.is_select_all => group.fill(true),
            SelectionMode::Single => {
                group.selected_count = count_checked(&group.items);
                if group.selected_count == 1 {
                    group.selected_value = group
                        .items
                        .iter()
                        .find(|item| item.checked)
                        .map(|item| item.label.clone());
                }
            }
        }

        group
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn items(&self) -> &[FilterItem] {
        &self.items
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn source(&self) -> &RawFilterShape {
        &self.source
    }

    pub fn source_kind(&self) -> ShapeKind {
        self.source.kind()
    }

    pub fn is_select_all(&self) -> bool {
        self.is_select_all
    }

    pub fn selected_count(&self) -> usize {
        self.selected_count
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    /// Label picked in single-select mode; `None` is "all" or "none"
    pub fn selected_value(&self) -> Option<&str> {
        self.selected_value.as_deref()
    }

    /// Single-select "all selected" sentinel, rendered read-only
    pub fn is_all_sentinel(&self) -> bool {
        self.mode == SelectionMode::Single && self.is_select_all && self.selected_value.is_none()
    }

    /// Whether the payload asked for grouped rendering
    pub fn is_grouped(&self) -> bool {
        self.grouped.unwrap_or(false) || self.source.is_grouped()
    }

    pub fn loading(&self) -> Option<bool> {
        self.loading
    }

    /// Position of the first item with this key
    pub fn position(&self, key: &ItemKey) -> Option<usize> {
        self.items.iter().position(|item| item.has_key(key))
    }

    /// Distinct group tags in order of first appearance
    pub fn group_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for tag in self.items.iter().filter_map(|item| item.group.as_ref()) {
            if !labels.contains(tag) {
                labels.push(tag.clone());
            }
        }
        labels
    }

    /// (checked, total) for the items tagged with `label`
    pub fn group_counts(&self, label: &str) -> (usize, usize) {
        self.items
            .iter()
            .filter(|item| item.group.as_deref() == Some(label))
            .fold((0, 0), |(checked, total), item| {
                (checked + usize::from(item.checked), total + 1)
            })
    }

    pub fn toggle_item(&mut self, index: usize) -> Result<()> {
        let len = self.items.len();
        if index >= len {
            return Err(FilterError::IndexOutOfRange {
                group_id: self.id.clone(),
                index,
                len,
            });
        }

        match self.mode {
            SelectionMode::Multi => {
                self.items[index].checked = !self.items[index].checked;
                self.recount();
            }
            SelectionMode::Single => {
                for (i, item) in self.items.iter_mut().enumerate() {
                    item.checked = i == index;
                }
                self.selected_count = 1;
                self.is_select_all = false;
                self.selected_value = Some(self.items[index].label.clone());
            }
        }

        debug!(
            group = %self.id,
            index,
            selected = self.selected_count,
            total = len,
            "toggled item"
        );
        Ok(())
    }

    /// Toggle by stable identity; repeated keys resolve to the first match
    pub fn toggle_key(&mut self, key: &ItemKey) -> Result<()> {
        let index = self.position(key).ok_or_else(|| FilterError::UnknownItem {
            group_id: self.id.clone(),
            key: key.to_string(),
        })?;
        self.toggle_item(index)
    }

    pub fn toggle_select_all(&mut self) {
        let target = !self.is_select_all;
        self.fill(target);
        debug!(
            group = %self.id,
            all = target,
            selected = self.selected_count,
            "toggled select all"
        );
    }

    /// Flip every item tagged `label` to the negation of "all of them checked".
    /// Single-select picks the group's first member instead.
    pub fn toggle_group(&mut self, label: &str) -> Result<()> {
        let members: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.group.as_deref() == Some(label))
            .map(|(i, _)| i)
            .collect();

        let Some(&first) = members.first() else {
            return Err(FilterError::UnknownGroupLabel {
                group_id: self.id.clone(),
                label: label.to_string(),
            });
        };

        if self.mode == SelectionMode::Single {
            return self.toggle_item(first);
        }

        let all_checked = members.iter().all(|&i| self.items[i].checked);
        for &i in &members {
            self.items[i].checked = !all_checked;
        }
        self.recount();

        debug!(
            group = %self.id,
            label,
            checked = !all_checked,
            selected = self.selected_count,
            "toggled group"
        );
        Ok(())
    }

    pub fn clear_all(&mut self) {
        for item in &mut self.items {
            item.checked = false;
        }
        self.selected_count = 0;
        self.is_select_all = false;
        self.selected_value = None;
        debug!(group = %self.id, "cleared selection");
    }

    /// Working copy with every option and its checked flag.
    ///
    /// Nested groups keep their shape. A keyed map cannot carry unchecked
    /// labels, so keyed sources come back as a tagged flat list marked
    /// grouped; flat lists stay flat.
    pub fn to_state(&self) -> FilterState {
        let (filters, grouped) = match &self.source {
            RawFilterShape::NestedGroups(_) => (to_original_shape(&self.source, &self.items), self.grouped),
            RawFilterShape::KeyedMap(_) => (RawFilterShape::FlatList(self.items.clone()), Some(true)),
            RawFilterShape::FlatList(_) => (RawFilterShape::FlatList(self.items.clone()), self.grouped),
        };
        FilterState {
            filters,
            is_select_all: self.is_select_all,
            selected_count: self.selected_count,
            loading: self.loading,
            grouped,
        }
    }

    fn fill(&mut self, checked: bool) {
        for item in &mut self.items {
            item.checked = checked;
        }
        self.selected_count = if checked { self.items.len() } else { 0 };
        self.is_select_all = checked;
        self.selected_value = None;
    }

    fn recount(&mut self) {
        self.selected_count = count_checked(&self.items);
        self.is_select_all = self.selected_count == self.items.len();
    }
}
