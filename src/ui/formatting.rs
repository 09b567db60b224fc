use filterdeck_core::{checked_labels, FilterItem, FilterMap, IndexStyle, SearchView, SelectionGroup, SelectionMode, ViewRow};

/// One-line summary of a group: counts, select-all and single-select state
pub fn format_group_summary(id: &str, group: &SelectionGroup, touched: bool) -> String {
    let marker = if touched { "*" } else { "" };

    if group.loading() == Some(true) {
        return format!("{}{}: loading", id, marker);
    }

    let selection = match group.mode() {
        SelectionMode::Single if group.is_all_sentinel() => "All".to_string(),
        SelectionMode::Single => group.selected_value().unwrap_or("none").to_string(),
        SelectionMode::Multi if group.is_select_all() => {
            format!("{}/{} selected (all)", group.selected_count(), group.total_count())
        }
        SelectionMode::Multi => format!("{}/{} selected", group.selected_count(), group.total_count()),
    };

    let mut line = format!("{}{}: {}", id, marker, selection);

    let tags = group.group_labels();
    if !tags.is_empty() {
        let counts: Vec<String> = tags
            .iter()
            .map(|tag| {
                let (checked, total) = group.group_counts(tag);
                format!("{} {}/{}", tag, checked, total)
            })
            .collect();
        line.push_str(&format!(" [{}]", counts.join(", ")));
    }

    line
}

/// Checkbox (or radio) row for one option
pub fn format_item(index: usize, item: &FilterItem, mode: SelectionMode) -> String {
    let mark = match (mode, item.checked) {
        (SelectionMode::Multi, true) => "[x]",
        (SelectionMode::Multi, false) => "[ ]",
        (SelectionMode::Single, true) => "(*)",
        (SelectionMode::Single, false) => "( )",
    };
    format!("{} {:>3}  {}", mark, index, item.label)
}

/// Rendered lines of a search/index view, limited to `limit` items
pub fn format_view(view: &SearchView, group: &SelectionGroup, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();

    if view.is_empty() {
        if view.is_searching() {
            lines.push(format!("No results for '{}'", view.query));
        } else {
            lines.push("No options available".to_string());
        }
        return lines;
    }

    let index_label = match view.style {
        IndexStyle::Letters => "Index",
        IndexStyle::Groups => "Groups",
    };
    lines.push(format!("{}: {}", index_label, view.index_keys().join(" ")));

    if group.is_all_sentinel() {
        lines.push("(*) All".to_string());
    }

    for row in view.rows(limit) {
        match row {
            ViewRow::Header(key) => lines.push(format!("## {}", key)),
            ViewRow::Item(index) => lines.push(format_item(index, &group.items()[index], group.mode())),
        }
    }

    let shown = limit.min(view.match_count());
    if view.is_searching() {
        lines.push(format!(
            "Showing {} of {} matches for '{}' ({} options)",
            shown,
            view.match_count(),
            view.query,
            view.total
        ));
    } else if shown < view.match_count() {
        lines.push(format!("Showing {} of {} options", shown, view.match_count()));
    }

    lines
}

/// Committed groups as "group: labels" lines, sorted by group id
pub fn format_filter_map(map: &FilterMap) -> Vec<String> {
    let mut ids: Vec<&String> = map.keys().collect();
    ids.sort();

    ids.into_iter()
        .map(|id| {
            let state = &map[id];
            if state.is_loading() {
                format!("{}: loading", id)
            } else if state.is_select_all {
                format!("{}: all ({})", id, state.selected_count)
            } else {
                let labels = checked_labels(state);
                if labels.is_empty() {
                    format!("{}: none", id)
                } else {
                    format!("{}: {}", id, labels.join(", "))
                }
            }
        })
        .collect()
}
