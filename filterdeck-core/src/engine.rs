//! Editing sessions over a map of filter groups.
//!
//! A session starts from the last committed (or loaded) snapshot, edits
//! working copies of the groups it touches, and ends either in a commit that
//! merges the touched groups back and notifies the listener, or in a discard
//! that drops every working copy.

use crate::error::{FilterError, Result};
use crate::grouping::resolve_group_config;
use crate::models::{FilterMap, FilterState, ItemKey, KeyedMap};
use crate::options::EngineOptions;
use crate::selection::SelectionGroup;
use crate::serialize::serialize_group;
use crate::view::{RowMetrics, SearchView};
use crate::window::VisibleWindow;
use std::collections::HashMap;
use tracing::{debug, info};

/// Receives the engine's output
pub trait FilterListener {
    /// Touched groups after a commit; callers merge this into their own map
    fn on_change(&mut self, updated: &FilterMap);

    /// Search text typed for a group, so the caller can refetch options
    fn on_search(&mut self, _group_id: &str, _query: &str) {}
}

impl<F> FilterListener for F
where
    F: FnMut(&FilterMap),
{
    fn on_change(&mut self, updated: &FilterMap) {
        self(updated)
    }
}

/// Listener that ignores every event
#[derive(Debug, Default)]
pub struct NoopListener;

impl FilterListener for NoopListener {
    fn on_change(&mut self, _updated: &FilterMap) {}
}

/// Where the engine is in the load/edit/commit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loaded,
    Editing,
    Committed,
    Discarded,
}

#[derive(Debug)]
struct GroupSession {
    selection: SelectionGroup,
    query: String,
    window: VisibleWindow,
    touched: bool,
}

pub struct FilterEngine {
    options: EngineOptions,
    snapshot: FilterMap,
    working: HashMap<String, GroupSession>,
    phase: SessionPhase,
    listener: Box<dyn FilterListener>,
}

impl FilterEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            snapshot: FilterMap::new(),
            working: HashMap::new(),
            phase: SessionPhase::Loaded,
            listener: Box::new(NoopListener),
        }
    }

    pub fn with_listener(mut self, listener: impl FilterListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Last committed or loaded state
    pub fn snapshot(&self) -> &FilterMap {
        &self.snapshot
    }

    /// Replace the snapshot with a fresh backend payload, dropping any session
    pub fn load(&mut self, map: FilterMap) {
        info!(groups = map.len(), "loaded filter groups");
        self.snapshot = map;
        self.working.clear();
        self.phase = SessionPhase::Loaded;
    }

    /// Replace (or add) a single group, e.g. after a search refetch.
    /// A working copy of that group is discarded.
    pub fn load_group(&mut self, group_id: &str, state: FilterState) {
        self.working.remove(group_id);
        self.snapshot.insert(group_id.to_string(), state);
    }

    /// Start an editing session; implied by every editing operation
    pub fn begin(&mut self) {
        if self.phase != SessionPhase::Editing {
            debug!("editing session started");
            self.phase = SessionPhase::Editing;
        }
    }

    pub fn is_touched(&self, group_id: &str) -> bool {
        self.working.get(group_id).is_some_and(|session| session.touched)
    }

    /// Working copy of a group, if this session opened one
    pub fn working(&self, group_id: &str) -> Option<&SelectionGroup> {
        self.working.get(group_id).map(|session| &session.selection)
    }

    /// Current view of a group: the working copy, else the snapshot
    pub fn group(&self, group_id: &str) -> Result<SelectionGroup> {
        if let Some(session) = self.working.get(group_id) {
            return Ok(session.selection.clone());
        }
        self.snapshot
            .get(group_id)
            .map(|state| SelectionGroup::from_state(group_id, state, self.options.mode()))
            .ok_or_else(|| FilterError::unknown_group(group_id))
    }

    pub fn toggle_item(&mut self, group_id: &str, index: usize) -> Result<()> {
        let session = self.edit(group_id)?;
        session.selection.toggle_item(index)?;
        session.touched = true;
        Ok(())
    }

    pub fn toggle_key(&mut self, group_id: &str, key: &ItemKey) -> Result<()> {
        let session = self.edit(group_id)?;
        session.selection.toggle_key(key)?;
        session.touched = true;
        Ok(())
    }

    pub fn toggle_select_all(&mut self, group_id: &str) -> Result<()> {
        let session = self.edit(group_id)?;
        session.selection.toggle_select_all();
        session.touched = true;
        Ok(())
    }

    pub fn toggle_group(&mut self, group_id: &str, label: &str) -> Result<()> {
        let session = self.edit(group_id)?;
        session.selection.toggle_group(label)?;
        session.touched = true;
        Ok(())
    }

    pub fn clear_all(&mut self, group_id: &str) -> Result<()> {
        let session = self.edit(group_id)?;
        session.selection.clear_all();
        session.touched = true;
        Ok(())
    }

    /// Record the search text for a group and forward it to the listener
    pub fn search(&mut self, group_id: &str, query: &str) -> Result<()> {
        let session = self.edit(group_id)?;
        session.query = query.to_string();
        session.window.reset();
        self.listener.on_search(group_id, query);
        Ok(())
    }

    pub fn query(&self, group_id: &str) -> &str {
        self.working
            .get(group_id)
            .map(|session| session.query.as_str())
            .unwrap_or("")
    }

    /// Search/index view of a group under its current query
    pub fn view(&self, group_id: &str) -> Result<SearchView> {
        let group = self.group(group_id)?;
        Ok(SearchView::build(
            &group,
            self.query(group_id),
            self.options.grouped,
            self.group_config(group_id),
        ))
    }

    /// Feed a scroll position for a group's list; returns true when more rows
    /// should be rendered
    pub fn scroll(&mut self, group_id: &str, scroll_top: f64, viewport_height: f64, content_height: f64) -> Result<bool> {
        let total = self.view(group_id)?.match_count();
        let session = self.edit(group_id)?;
        Ok(session.window.on_scroll(scroll_top, viewport_height, content_height, total))
    }

    /// Items of the current view that should be rendered
    pub fn visible_count(&self, group_id: &str) -> Result<usize> {
        let total = self.view(group_id)?.match_count();
        Ok(match self.working.get(group_id) {
            Some(session) => session.window.visible(total),
            None => VisibleWindow::new(self.options.window).visible(total),
        })
    }

    /// Jump to an index key: grows the group's window far enough to render
    /// that header and returns its scroll offset. `None` when the key is not
    /// in the current view.
    pub fn jump_to(&mut self, group_id: &str, key: &str, metrics: RowMetrics) -> Result<Option<f64>> {
        let view = self.view(group_id)?;
        let (offset, through) = match (view.header_offset(key, metrics), view.items_through(key)) {
            (Some(offset), Some(through)) => (offset, through),
            _ => return Ok(None),
        };
        self.edit(group_id)?.window.ensure(through);
        Ok(Some(offset))
    }

    /// Explicit taxonomy configured for a group, if any
    pub fn group_config(&self, group_id: &str) -> Option<&KeyedMap> {
        resolve_group_config(group_id, &self.options.publisher_groups)
    }

    /// Commit one group. Returns the payload handed to the listener, which is
    /// empty when the group was not touched this session.
    pub fn commit(&mut self, group_id: &str) -> Result<FilterMap> {
        if !self.snapshot.contains_key(group_id) {
            return Err(FilterError::unknown_group(group_id));
        }
        let mut updated = FilterMap::new();
        let mut committed = Vec::new();
        if let Some(session) = self.working.remove(group_id) {
            if session.touched {
                updated.insert(group_id.to_string(), self.serialize(group_id, &session.selection));
                committed.push((group_id.to_string(), session.selection.to_state()));
            }
        }
        self.finish_commit(&updated, committed);
        Ok(updated)
    }

    /// Commit every touched group in one listener call
    pub fn commit_all(&mut self) -> FilterMap {
        let working = std::mem::take(&mut self.working);
        let mut updated = FilterMap::new();
        let mut committed = Vec::new();
        for (group_id, session) in working.into_iter().filter(|(_, session)| session.touched) {
            updated.insert(group_id.clone(), self.serialize(&group_id, &session.selection));
            committed.push((group_id, session.selection.to_state()));
        }
        self.finish_commit(&updated, committed);
        updated
    }

    /// Drop every working copy; the next session starts from the snapshot
    pub fn discard(&mut self) {
        info!(groups = self.working.len(), "discarded filter edits");
        self.working.clear();
        self.phase = SessionPhase::Discarded;
    }

    fn serialize(&self, group_id: &str, selection: &SelectionGroup) -> FilterState {
        serialize_group(selection, self.options.grouped, self.group_config(group_id))
    }

    /// The snapshot keeps every option of the committed groups; the listener
    /// only sees the wire payload.
    fn finish_commit(&mut self, updated: &FilterMap, committed: Vec<(String, FilterState)>) {
        self.snapshot.extend(committed);
        if self.working.is_empty() {
            self.phase = SessionPhase::Committed;
        }
        if !updated.is_empty() {
            info!(groups = updated.len(), "committed filter groups");
            self.listener.on_change(updated);
        }
    }

    fn edit(&mut self, group_id: &str) -> Result<&mut GroupSession> {
        self.begin();
        if !self.working.contains_key(group_id) {
            let state = self
                .snapshot
                .get(group_id)
                .ok_or_else(|| FilterError::unknown_group(group_id))?;
            let session = GroupSession {
                selection: SelectionGroup::from_state(group_id, state, self.options.mode()),
                query: String::new(),
                window: VisibleWindow::new(self.options.window),
                touched: false,
            };
            self.working.insert(group_id.to_string(), session);
        }
        self.working
            .get_mut(group_id)
            .ok_or_else(|| FilterError::unknown_group(group_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawFilterShape;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn payload() -> FilterMap {
        serde_json::from_value(json!({
            "Country": {
                "filters": [
                    {"label": "US", "checked": false},
                    {"label": "IN", "checked": false}
                ],
                "isSelectAll": false,
                "selectedCount": 0
            },
            "Region": {
                "filters": [
                    {"label": "EU", "subItems": [
                        {"label": "DE", "checked": false},
                        {"label": "FR", "checked": false}
                    ]},
                    {"label": "NA", "subItems": [
                        {"label": "US", "checked": true},
                        {"label": "CA", "checked": false}
                    ]}
                ],
                "isSelectAll": false,
                "selectedCount": 1
            }
        }))
        .unwrap()
    }

    fn recording_engine(options: EngineOptions) -> (FilterEngine, Rc<RefCell<Vec<FilterMap>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        let mut engine = FilterEngine::new(options)
            .with_listener(move |updated: &FilterMap| sink.borrow_mut().push(updated.clone()));
        engine.load(payload());
        (engine, calls)
    }

    #[test]
    fn test_commit_only_reports_touched_groups() {
        let (mut engine, calls) = recording_engine(EngineOptions::default());
        engine.toggle_item("Country", 1).unwrap();
        let _ = engine.view("Region").unwrap();

        let updated = engine.commit_all();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated["Country"].selected_count, 1);
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(engine.phase(), SessionPhase::Committed);

        // merged into the snapshot, untouched group kept
        assert_eq!(engine.snapshot()["Country"].selected_count, 1);
        assert_eq!(engine.snapshot()["Region"].selected_count, 1);
    }

    #[test]
    fn test_grouped_commit_scenario() {
        let options = EngineOptions {
            grouped: true,
            ..EngineOptions::default()
        };
        let (mut engine, calls) = recording_engine(options);
        engine.toggle_select_all("Region").unwrap();
        engine.toggle_select_all("Region").unwrap();
        engine.toggle_key("Region", &ItemKey::in_group("NA", "US")).unwrap();

        let updated = engine.commit("Region").unwrap();
        assert_eq!(serde_json::to_value(&updated["Region"].filters).unwrap(), json!({"NA": ["US"]}));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_grouped_commit_keeps_unchecked_options_in_snapshot() {
        let options = EngineOptions {
            grouped: true,
            ..EngineOptions::default()
        };
        let (mut engine, calls) = recording_engine(options);
        engine.toggle_key("Region", &ItemKey::in_group("NA", "CA")).unwrap();

        let updated = engine.commit("Region").unwrap();
        assert_eq!(
            serde_json::to_value(&updated["Region"].filters).unwrap(),
            json!({"NA": ["US", "CA"]})
        );
        assert_eq!(calls.borrow()[0], updated);

        let reopened = engine.group("Region").unwrap();
        assert_eq!(reopened.total_count(), 4);
        assert_eq!(reopened.selected_count(), 2);
        assert!(!reopened.is_select_all());
        assert!(!reopened.items()[0].checked);
        assert!(!reopened.items()[1].checked);

        engine.toggle_key("Region", &ItemKey::in_group("EU", "DE")).unwrap();
        let updated = engine.commit("Region").unwrap();
        assert_eq!(
            serde_json::to_value(&updated["Region"].filters).unwrap(),
            json!({"EU": ["DE"], "NA": ["US", "CA"]})
        );
        assert_eq!(engine.group("Region").unwrap().total_count(), 4);
    }

    #[test]
    fn test_cleared_keyed_group_reopens_with_every_option() {
        let (mut engine, calls) = recording_engine(EngineOptions::default());
        engine.load_group(
            "Publisher",
            FilterState::new(RawFilterShape::KeyedMap(
                serde_json::from_value(json!({"Social": ["Meta", "Snap"], "Search": ["Google"]})).unwrap(),
            )),
        );
        assert!(engine.group("Publisher").unwrap().is_select_all());

        engine.clear_all("Publisher").unwrap();
        engine.commit("Publisher").unwrap();
        assert_eq!(calls.borrow().len(), 1);

        let reopened = engine.group("Publisher").unwrap();
        assert_eq!(reopened.total_count(), 3);
        assert_eq!(reopened.selected_count(), 0);
        assert!(!reopened.is_select_all());
        assert_eq!(reopened.group_labels(), vec!["Social", "Search"]);

        engine.toggle_key("Publisher", &ItemKey::in_group("Search", "Google")).unwrap();
        let updated = engine.commit("Publisher").unwrap();
        assert_eq!(updated["Publisher"].selected_count, 1);
        assert_eq!(engine.snapshot()["Publisher"].total_count(), 3);
    }

    #[test]
    fn test_untouched_commit_skips_listener() {
        let (mut engine, calls) = recording_engine(EngineOptions::default());
        engine.search("Country", "u").unwrap();
        let updated = engine.commit("Country").unwrap();
        assert!(updated.is_empty());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_discard_restarts_from_committed_snapshot() {
        let (mut engine, _calls) = recording_engine(EngineOptions::default());
        engine.toggle_item("Country", 0).unwrap();
        engine.commit("Country").unwrap();

        engine.toggle_item("Country", 1).unwrap();
        engine.clear_all("Region").unwrap();
        engine.discard();
        assert_eq!(engine.phase(), SessionPhase::Discarded);
        assert!(engine.working("Country").is_none());

        let group = engine.group("Country").unwrap();
        assert!(group.items()[0].checked);
        assert!(!group.items()[1].checked);
        assert_eq!(engine.group("Region").unwrap().selected_count(), 1);
    }

    #[test]
    fn test_unknown_group() {
        let (mut engine, _calls) = recording_engine(EngineOptions::default());
        assert!(matches!(
            engine.toggle_item("Device", 0),
            Err(FilterError::UnknownGroup { .. })
        ));
        assert!(engine.commit("Device").is_err());
    }

    #[test]
    fn test_search_forwards_to_listener_and_narrows_view() {
        struct Recorder(Rc<RefCell<Vec<(String, String)>>>);
        impl FilterListener for Recorder {
            fn on_change(&mut self, _updated: &FilterMap) {}
            fn on_search(&mut self, group_id: &str, query: &str) {
                self.0.borrow_mut().push((group_id.to_string(), query.to_string()));
            }
        }

        let searches = Rc::new(RefCell::new(Vec::new()));
        let mut engine = FilterEngine::new(EngineOptions::default()).with_listener(Recorder(searches.clone()));
        engine.load(payload());

        engine.search("Region", "eu").unwrap();
        assert_eq!(searches.borrow()[0], ("Region".to_string(), "eu".to_string()));

        let view = engine.view("Region").unwrap();
        assert_eq!(view.index_keys(), vec!["EU"]);
        assert_eq!(view.match_count(), 2);
    }

    #[test]
    fn test_single_select_session() {
        let options = EngineOptions {
            single_select: true,
            ..EngineOptions::default()
        };
        let (mut engine, _calls) = recording_engine(options);
        engine.toggle_item("Region", 0).unwrap();
        engine.toggle_item("Region", 3).unwrap();

        let updated = engine.commit("Region").unwrap();
        let state = &updated["Region"];
        assert_eq!(state.selected_count, 1);
        match &state.filters {
            RawFilterShape::FlatList(items) => {
                assert_eq!(items.iter().filter(|i| i.checked).count(), 1);
                assert!(items[3].checked);
            }
            other => panic!("expected flat list, got {:?}", other),
        }
    }

    #[test]
    fn test_load_group_replaces_working_copy() {
        let (mut engine, _calls) = recording_engine(EngineOptions::default());
        engine.toggle_item("Country", 0).unwrap();
        engine.load_group(
            "Country",
            FilterState::from_items(vec![crate::models::FilterItem::new("JP", true)]),
        );
        assert!(!engine.is_touched("Country"));
        assert_eq!(engine.group("Country").unwrap().total_count(), 1);
    }

    #[test]
    fn test_visible_window_grows_on_scroll() {
        let mut options = EngineOptions::default();
        options.window.initial = 1;
        options.window.increment = 1;
        let (mut engine, _calls) = recording_engine(options);

        assert_eq!(engine.visible_count("Country").unwrap(), 1);
        assert!(engine.scroll("Country", 100.0, 100.0, 220.0).unwrap());
        assert_eq!(engine.visible_count("Country").unwrap(), 2);
    }

    #[test]
    fn test_jump_to_index_key_grows_window() {
        let mut options = EngineOptions::default();
        options.window.initial = 1;
        let (mut engine, _calls) = recording_engine(options);

        let offset = engine.jump_to("Country", "U", RowMetrics::default()).unwrap();
        assert_eq!(offset, Some(60.0));
        assert_eq!(engine.visible_count("Country").unwrap(), 2);
        assert_eq!(engine.jump_to("Country", "Z", RowMetrics::default()).unwrap(), None);
    }
}
