use filterdeck_core::*;
use std::path::PathBuf;

use crate::ui::print_commit;

/// Application state management - Domain state only
/// The engine owns the committed snapshot and any working copies
pub struct AppState {
    pub engine: FilterEngine,
    /// Path to current filter file
    pub current_file: Option<PathBuf>,
    /// Whether committed changes have not been saved yet
    pub dirty: bool,
}

impl AppState {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            engine: FilterEngine::new(options).with_listener(|updated: &FilterMap| print_commit(updated)),
            current_file: None,
            dirty: false,
        }
    }

    /// Load a filter map and make it the committed snapshot
    pub fn load_from_file(&mut self, path: PathBuf) -> Result<()> {
        let map = load_filter_map(&path)?;
        validate_filter_map(&map, self.engine.options().mode()).map_err(FilterError::Validation)?;

        self.engine.load(map);
        self.current_file = Some(path);
        self.dirty = false;

        Ok(())
    }

    /// Save committed filters to the current file
    pub fn save(&mut self) -> Result<()> {
        let path = self.current_file.clone().ok_or_else(|| FilterError::InvalidConfiguration {
            message: "No file path set".to_string(),
        })?;
        save_filter_map(self.engine.snapshot(), &path)?;
        self.dirty = false;
        Ok(())
    }

    /// Save committed filters to a new file
    pub fn save_as(&mut self, path: PathBuf) -> Result<()> {
        save_filter_map(self.engine.snapshot(), &path)?;
        self.current_file = Some(path);
        self.dirty = false;
        Ok(())
    }

    /// Group ids of the committed snapshot, sorted for display
    pub fn group_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.engine.snapshot().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// True when some group has edits that were never committed
    pub fn has_pending_edits(&self) -> bool {
        self.engine.phase() == SessionPhase::Editing
            && self.group_ids().iter().any(|id| self.engine.is_touched(id))
    }

    pub fn title(&self) -> String {
        let name = self
            .current_file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());
        let dirty = if self.dirty { "*" } else { "" };
        format!("{}{} - Filter Deck", name, dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("filters.json");
        let payload = json!({
            "Country": {
                "filters": [
                    {"label": "US", "checked": true},
                    {"label": "IN", "checked": false}
                ],
                "isSelectAll": false,
                "selectedCount": 1
            }
        });
        fs::write(&path, serde_json::to_string_pretty(&payload).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_load_edit_and_save_as() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir);

        let mut state = AppState::new(EngineOptions::default());
        state.load_from_file(path).unwrap();
        assert_eq!(state.title(), "filters.json - Filter Deck");
        assert_eq!(state.group_ids(), vec!["Country"]);

        state.engine.toggle_item("Country", 1).unwrap();
        assert!(state.has_pending_edits());
        state.engine.commit("Country").unwrap();
        assert!(!state.has_pending_edits());

        let out = dir.path().join("out.json");
        state.save_as(out.clone()).unwrap();
        let saved = load_filter_map(&out).unwrap();
        assert_eq!(saved["Country"].selected_count, 2);
        assert!(saved["Country"].is_select_all);
    }

    #[test]
    fn test_grouped_save_reloads_every_option() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir);

        let options = EngineOptions {
            grouped: true,
            ..EngineOptions::default()
        };
        let mut state = AppState::new(options.clone());
        state.load_from_file(path).unwrap();
        state.engine.toggle_item("Country", 0).unwrap();
        state.engine.commit("Country").unwrap();

        let out = dir.path().join("out.json");
        state.save_as(out.clone()).unwrap();

        let mut reloaded = AppState::new(options);
        reloaded.load_from_file(out).unwrap();
        let group = reloaded.engine.group("Country").unwrap();
        assert_eq!(group.total_count(), 2);
        assert_eq!(group.selected_count(), 0);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{"Country": {"filters": [{"label": "US", "checked": true}], "isSelectAll": false, "selectedCount": 3}}"#,
        )
        .unwrap();

        let mut state = AppState::new(EngineOptions::default());
        assert!(matches!(state.load_from_file(path), Err(FilterError::Validation(_))));
        assert!(state.current_file.is_none());
    }

    #[test]
    fn test_save_without_path() {
        let mut state = AppState::new(EngineOptions::default());
        assert!(state.save().is_err());
    }
}
