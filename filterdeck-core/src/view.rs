//! Search-filtered, index-bucketed views of a filter group for rendering.

use crate::filtering::{has_query, visible_indices};
use crate::grouping::{group_by_key, group_by_letter, IndexBucket};
use crate::models::KeyedMap;
use crate::selection::SelectionGroup;

/// How the index of a view is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStyle {
    /// Alphabetical jump list for ungrouped options
    Letters,
    /// One section per group tag
    Groups,
}

/// One rendered row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRow<'a> {
    Header(&'a str),
    /// Position into the group's flat item list
    Item(usize),
}

/// Pixel heights used to locate index headers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMetrics {
    pub header_height: f64,
    pub row_height: f64,
}

impl Default for RowMetrics {
    fn default() -> Self {
        Self {
            header_height: 28.0,
            row_height: 32.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    pub query: String,
    pub style: IndexStyle,
    pub buckets: Vec<IndexBucket>,
    /// Items in the underlying group, before searching
    pub total: usize,
}

impl SearchView {
    /// Build the view of `group` under `query`. Grouped rendering is used when
    /// asked for or when the payload itself is grouped.
    pub fn build(group: &SelectionGroup, query: &str, grouped: bool, config: Option<&KeyedMap>) -> Self {
        let indices = visible_indices(group.items(), group.source_kind(), query);
        let entries = indices.iter().map(|&i| (i, &group.items()[i]));

        let (style, buckets) = if grouped || group.is_grouped() {
            (IndexStyle::Groups, group_by_key(entries, config))
        } else {
            (IndexStyle::Letters, group_by_letter(entries))
        };

        Self {
            query: query.trim().to_string(),
            style,
            buckets,
            total: group.total_count(),
        }
    }

    pub fn match_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.entries.len()).sum()
    }

    /// Nothing matched; callers render an explicit "no results" state
    pub fn is_empty(&self) -> bool {
        self.match_count() == 0
    }

    pub fn is_searching(&self) -> bool {
        has_query(&self.query)
    }

    /// Keys of the navigation index, in render order
    pub fn index_keys(&self) -> Vec<&str> {
        self.buckets.iter().map(|bucket| bucket.key.as_str()).collect()
    }

    /// Headers and items in render order, limited to the first `limit` items
    pub fn rows(&self, limit: usize) -> Vec<ViewRow<'_>> {
        let mut rows = Vec::new();
        let mut remaining = limit;
        for bucket in &self.buckets {
            if remaining == 0 {
                break;
            }
            rows.push(ViewRow::Header(&bucket.key));
            for &index in bucket.entries.iter().take(remaining) {
                rows.push(ViewRow::Item(index));
            }
            remaining = remaining.saturating_sub(bucket.entries.len());
        }
        rows
    }

    /// Scroll offset that puts the header for `key` at the top of the list,
    /// or `None` if the key is not part of this view
    pub fn header_offset(&self, key: &str, metrics: RowMetrics) -> Option<f64> {
        let mut offset = 0.0;
        for bucket in &self.buckets {
            if bucket.key == key {
                return Some(offset);
            }
            offset += metrics.header_height + metrics.row_height * bucket.entries.len() as f64;
        }
        None
    }

    /// Item count that must be rendered for the header of `key` to exist
    pub fn items_through(&self, key: &str) -> Option<usize> {
        let mut count = 0;
        for bucket in &self.buckets {
            count += bucket.entries.len();
            if bucket.key == key {
                return Some(count);
            }
        }
        None
    }
}
