use filterdeck_core::validate_filter_map;
use std::path::Path;

use crate::operations::FileOperations;
use crate::state::AppState;
use crate::ui::{print_group, print_snapshot, set_status, StatusLevel};

/// save [path]
pub fn handle_save(state: &mut AppState, path: Option<&Path>) -> anyhow::Result<()> {
    let saved = match path {
        Some(path) => FileOperations::new(state).save_file_as(path),
        None => FileOperations::new(state).save(),
    };
    if !saved {
        anyhow::bail!("Save failed");
    }
    Ok(())
}

/// revert: reload the current file, dropping everything since the last save
pub fn handle_revert(state: &mut AppState) -> anyhow::Result<()> {
    if state.dirty || state.has_pending_edits() {
        set_status("Dropping unsaved changes", StatusLevel::Warning);
    }
    if !FileOperations::new(state).revert() {
        anyhow::bail!("Revert failed");
    }
    Ok(())
}

/// validate: check the committed snapshot
pub fn handle_validate(state: &AppState) -> anyhow::Result<()> {
    match validate_filter_map(state.engine.snapshot(), state.engine.options().mode()) {
        Ok(()) => {
            set_status("Filters are valid", StatusLevel::Success);
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                set_status(error, StatusLevel::Error);
            }
            Err(filterdeck_core::FilterError::Validation(errors).into())
        }
    }
}

/// show [group]
pub fn handle_show(state: &AppState, group: Option<&str>) -> anyhow::Result<()> {
    match group {
        Some(id) => {
            state.engine.group(id)?;
            print_group(state, id);
        }
        None => print_snapshot(state),
    }
    Ok(())
}
