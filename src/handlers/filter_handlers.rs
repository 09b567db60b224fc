use filterdeck_core::RowMetrics;
use tracing::debug;

use crate::operations::Command;
use crate::state::AppState;
use crate::ui::{print_group, print_view, set_status, StatusLevel};

/// Selection, search and commit commands
pub fn handle_filter_command(state: &mut AppState, command: Command) -> anyhow::Result<()> {
    debug!(?command, "running filter command");

    match command {
        Command::Toggle { group, index } => {
            state.engine.toggle_item(&group, index)?;
            print_group(state, &group);
        }
        Command::ToggleKey { group, key } => {
            state.engine.toggle_key(&group, &key)?;
            print_group(state, &group);
        }
        Command::SelectAll { group } => {
            state.engine.toggle_select_all(&group)?;
            print_group(state, &group);
        }
        Command::ToggleGroup { group, label } => {
            state.engine.toggle_group(&group, &label)?;
            print_group(state, &group);
        }
        Command::Clear { group } => {
            state.engine.clear_all(&group)?;
            print_group(state, &group);
        }
        Command::Search { group, query } => {
            state.engine.search(&group, &query)?;
            print_view(state, &group, None)?;
        }
        Command::View { group, limit } => {
            print_view(state, &group, limit)?;
        }
        Command::Scroll {
            group,
            top,
            viewport,
            content,
        } => {
            if state.engine.scroll(&group, top, viewport, content)? {
                set_status(
                    &format!("Showing {} options", state.engine.visible_count(&group)?),
                    StatusLevel::Info,
                );
            }
        }
        Command::Jump { group, key } => match state.engine.jump_to(&group, &key, RowMetrics::default())? {
            Some(offset) => set_status(&format!("'{}' starts at {}px", key, offset), StatusLevel::Info),
            None => set_status(&format!("'{}' is not in the index", key), StatusLevel::Warning),
        },
        Command::Commit { group } => {
            let updated = match group {
                Some(group) => state.engine.commit(&group)?,
                None => state.engine.commit_all(),
            };
            if updated.is_empty() {
                set_status("Nothing to commit", StatusLevel::Info);
            } else {
                state.dirty = true;
            }
        }
        Command::Discard => {
            state.engine.discard();
            set_status("Uncommitted edits discarded", StatusLevel::Info);
        }
        other => {
            anyhow::bail!("{:?} is not a filter command", other);
        }
    }

    Ok(())
}
