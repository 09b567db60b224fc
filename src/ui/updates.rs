use colored::Colorize;
use filterdeck_core::FilterMap;

use crate::state::AppState;
use crate::ui::formatting::{format_filter_map, format_group_summary, format_view};

/// Print every group's summary under the file title
pub fn print_snapshot(state: &AppState) {
    println!("{}", state.title().bold());
    let ids = state.group_ids();
    if ids.is_empty() {
        println!("  {}", "No filter groups".dimmed());
    }
    for id in ids {
        print_group(state, &id);
    }
}

/// Print one group's summary; unknown groups print nothing
pub fn print_group(state: &AppState, id: &str) {
    if let Ok(group) = state.engine.group(id) {
        println!("  {}", format_group_summary(id, &group, state.engine.is_touched(id)));
    }
}

/// Print the search/index view of a group
pub fn print_view(state: &AppState, id: &str, limit: Option<usize>) -> filterdeck_core::Result<()> {
    let group = state.engine.group(id)?;
    let view = state.engine.view(id)?;
    let limit = match limit {
        Some(limit) => limit,
        None => state.engine.visible_count(id)?,
    };

    println!("{}", format_group_summary(id, &group, state.engine.is_touched(id)).bold());
    for line in format_view(&view, &group, limit) {
        if line.starts_with("## ") {
            println!("{}", line.cyan());
        } else if line.starts_with("[x]") || line.starts_with("(*)") {
            println!("{}", line.green());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Listener output: the groups a commit changed
pub fn print_commit(updated: &FilterMap) {
    println!("{} {} group(s)", "committed".green().bold(), updated.len());
    for line in format_filter_map(updated) {
        println!("  {}", line);
    }
}
