use anyhow::Context;
use filterdeck_core::EngineOptions;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::{map_file_load_error, map_file_save_error, map_revert_error};
use crate::state::AppState;
use crate::ui::{set_status, show_error, StatusLevel};

/// File operations orchestration
/// Handles all file I/O with proper error reporting and status updates
pub struct FileOperations<'a> {
    state: &'a mut AppState,
}

impl<'a> FileOperations<'a> {
    pub fn new(state: &'a mut AppState) -> Self {
        Self { state }
    }

    /// Load a filter file from the given path; false when it failed and the
    /// error has been reported
    pub fn load_file(&mut self, path: &Path) -> bool {
        match self.state.load_from_file(path.to_path_buf()) {
            Ok(()) => {
                set_status(&format!("Loaded {}", self.state.title()), StatusLevel::Success);
                true
            }
            Err(e) => {
                let (title, message, details) = map_file_load_error(&e, path);
                show_error(&title, &message, &details);
                false
            }
        }
    }

    /// Save committed filters to the current file
    pub fn save(&mut self) -> bool {
        match self.state.save() {
            Ok(()) => {
                set_status("File saved successfully", StatusLevel::Success);
                true
            }
            Err(e) => {
                let path = self.state.current_file.clone();
                let (title, message, details) = map_file_save_error(&e, path.as_deref());
                show_error(&title, &message, &details);
                false
            }
        }
    }

    /// Save committed filters to a new file
    pub fn save_file_as(&mut self, path: &Path) -> bool {
        match self.state.save_as(path.to_path_buf()) {
            Ok(()) => {
                set_status(&format!("Saved to {}", path.display()), StatusLevel::Success);
                true
            }
            Err(e) => {
                let (title, message, details) = map_file_save_error(&e, Some(path));
                show_error(&title, &message, &details);
                false
            }
        }
    }

    /// Reload the current file, dropping committed and uncommitted edits
    pub fn revert(&mut self) -> bool {
        let Some(path) = self.state.current_file.clone() else {
            set_status("Nothing to revert: no file loaded", StatusLevel::Warning);
            return false;
        };

        match self.state.load_from_file(path.clone()) {
            Ok(()) => {
                set_status("Reverted to saved version", StatusLevel::Success);
                true
            }
            Err(e) => {
                let (title, message, details) = map_revert_error(&e, &path);
                show_error(&title, &message, &details);
                false
            }
        }
    }
}

/// Engine options from an optional config file, with command-line flags
/// layered on top
pub fn load_options(config: Option<&Path>, grouped: bool, single_select: bool) -> anyhow::Result<EngineOptions> {
    let mut options = match config {
        Some(path) => filterdeck_core::load_options(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => EngineOptions::default(),
    };

    if grouped {
        options.grouped = true;
    }
    if single_select {
        options.single_select = true;
    }

    debug!(grouped = options.grouped, single_select = options.single_select, "engine options resolved");
    Ok(options)
}

/// Command lines from a script file
pub fn read_script(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read script {}", path.display()))?;
    Ok(contents.lines().map(str::to_string).collect())
}
