use crate::models::{FilterItem, ShapeKind};

/// Case-insensitive substring match of `query` against `label`.
/// A blank query matches everything.
pub fn matches(label: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    label.trim().to_lowercase().contains(&query)
}

/// Check if a query would filter anything out
pub fn has_query(query: &str) -> bool {
    !query.trim().is_empty()
}

/// Indices of the flat items visible under `query`.
///
/// Items flattened out of nested groups stay visible when their parent
/// group's label matches, even if their own label does not.
pub fn visible_indices(items: &[FilterItem], source: ShapeKind, query: &str) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            matches(&item.label, query)
                || (source == ShapeKind::NestedGroups
                    && item.group.as_deref().is_some_and(|group| matches(group, query)))
        })
        .map(|(i, _)| i)
        .collect()
}
