//! Selection engine: joins the app catalog with the saved list and keeps
//! both views consistent across toggle, reorder and rename.

use crate::record::{AppRecord, Change, IgnoreReason, SelectionEvent};
use capy_apps::CatalogReader;
use capy_prefs::{PrefsBackend, SavedAppsStore, SavedEntry};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use tokio::sync::broadcast::{self, Receiver, Sender};

/// Maximum number of apps on the home screen.
pub const MAX_SELECTED: usize = 10;

/// Broadcast channel capacity. Lagging receivers skip old events.
const EVENT_CAPACITY: usize = 64;

/// The launcher's selection state.
///
/// `catalog_view` holds every installed app sorted by label, `selected_view`
/// the chosen apps in launch order. Every applied mutation is written to the
/// store before it returns.
pub struct SelectionEngine<C, B> {
    catalog: C,
    store: SavedAppsStore<B>,
    migrated: bool,
    catalog_view: Vec<AppRecord>,
    selected_view: Vec<AppRecord>,
    events: Sender<SelectionEvent>,
}

impl<C: CatalogReader, B: PrefsBackend> SelectionEngine<C, B> {
    /// Create an engine with empty views. Call `load` to populate them.
    pub fn new(catalog: C, prefs: B) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            catalog,
            store: SavedAppsStore::new(prefs),
            migrated: false,
            catalog_view: Vec::new(),
            selected_view: Vec::new(),
            events,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn store(&self) -> &SavedAppsStore<B> {
        &self.store
    }

    /// Rebuild both views from the catalog and the saved list.
    pub fn load(&mut self) {
        self.ensure_migrated();

        let apps = match self.catalog.query_launchable_apps() {
            Ok(apps) => apps,
            Err(e) => {
                warn!("App catalog unavailable, showing no apps: {}", e);
                Vec::new()
            }
        };
        let saved = self.store.load();

        let saved_labels: HashMap<&str, Option<&String>> = saved
            .iter()
            .map(|s| (s.package_id.as_str(), s.custom_label.as_ref()))
            .collect();

        // Readers should not repeat ids; keep the first if one does.
        let mut seen = HashSet::new();
        let mut catalog_view: Vec<AppRecord> = apps
            .into_iter()
            .filter(|app| seen.insert(app.package_id.clone()))
            .map(|app| {
                let custom_label = saved_labels
                    .get(app.package_id.as_str())
                    .copied()
                    .flatten()
                    .cloned();
                AppRecord {
                    label: app.label,
                    package_id: app.package_id,
                    custom_label,
                    is_selected: false,
                }
            })
            .collect();
        catalog_view.sort_by_cached_key(|r| r.label.to_lowercase());

        let mut selected_view: Vec<AppRecord> = saved
            .iter()
            .filter_map(|s| {
                let found = catalog_view.iter().find(|r| r.package_id == s.package_id);
                if found.is_none() {
                    debug!("Saved app {} is not installed, skipping", s.package_id);
                }
                found.map(|r| AppRecord {
                    is_selected: true,
                    ..r.clone()
                })
            })
            .collect();

        if selected_view.len() > MAX_SELECTED {
            warn!(
                "Saved list has {} installed apps, keeping the first {}",
                selected_view.len(),
                MAX_SELECTED
            );
            selected_view.truncate(MAX_SELECTED);
        }

        // Only apps that made it into the selected view are marked selected.
        let selected_ids: HashSet<&str> = selected_view
            .iter()
            .map(|r| r.package_id.as_str())
            .collect();
        for record in &mut catalog_view {
            record.is_selected = selected_ids.contains(record.package_id.as_str());
        }

        self.catalog_view = catalog_view;
        self.selected_view = selected_view;

        info!(
            "Loaded {} apps, {} selected",
            self.catalog_view.len(),
            self.selected_view.len()
        );
        self.emit(SelectionEvent::Loaded {
            catalog: self.catalog_view.len(),
            selected: self.selected_view.len(),
        });
    }

    /// Select an unselected app (appending it) or unselect a selected one.
    pub fn toggle_selection(&mut self, package_id: &str) -> Change {
        let Some(pos) = self
            .catalog_view
            .iter()
            .position(|r| r.package_id == package_id)
        else {
            return Change::Ignored(IgnoreReason::UnknownApp);
        };

        let selecting = !self.catalog_view[pos].is_selected;
        if selecting && self.selected_view.len() >= MAX_SELECTED {
            debug!("Selection full, not adding {}", package_id);
            return Change::Ignored(IgnoreReason::SelectionFull);
        }

        self.catalog_view[pos].is_selected = selecting;
        if selecting {
            self.selected_view.push(self.catalog_view[pos].clone());
        } else {
            self.selected_view.retain(|r| r.package_id != package_id);
        }

        self.persist();
        self.emit(SelectionEvent::SelectionChanged {
            package_id: package_id.to_string(),
            selected: selecting,
        });
        Change::Applied
    }

    /// Swap two positions of the selected list.
    pub fn reorder(&mut self, from: usize, to: usize) -> Change {
        let len = self.selected_view.len();
        if from >= len || to >= len {
            return Change::Ignored(IgnoreReason::IndexOutOfRange);
        }
        if from == to {
            return Change::Ignored(IgnoreReason::SamePosition);
        }

        self.selected_view.swap(from, to);

        self.persist();
        self.emit(SelectionEvent::Reordered { from, to });
        Change::Applied
    }

    /// Move the selected app at `index` one place up.
    pub fn move_up(&mut self, index: usize) -> Change {
        match index.checked_sub(1) {
            Some(to) => self.reorder(index, to),
            None => Change::Ignored(IgnoreReason::IndexOutOfRange),
        }
    }

    /// Move the selected app at `index` one place down.
    pub fn move_down(&mut self, index: usize) -> Change {
        self.reorder(index, index.saturating_add(1))
    }

    /// Set a custom name. A blank name, or the app's own label, clears it.
    pub fn rename(&mut self, package_id: &str, new_name: &str) -> Change {
        let Some(record) = self.find(package_id) else {
            return Change::Ignored(IgnoreReason::UnknownApp);
        };

        let custom_label = if new_name.trim().is_empty() || new_name == record.label {
            None
        } else {
            Some(new_name.to_string())
        };

        for record in self
            .catalog_view
            .iter_mut()
            .chain(self.selected_view.iter_mut())
            .filter(|r| r.package_id == package_id)
        {
            record.custom_label = custom_label.clone();
        }

        self.persist();
        self.emit(SelectionEvent::Renamed {
            package_id: package_id.to_string(),
            custom_label,
        });
        Change::Applied
    }

    /// All installed apps, sorted by label.
    pub fn catalog_view(&self) -> &[AppRecord] {
        &self.catalog_view
    }

    /// Selected apps in launch order.
    pub fn selected_view(&self) -> &[AppRecord] {
        &self.selected_view
    }

    pub fn selected_count(&self) -> usize {
        self.selected_view.len()
    }

    pub fn remaining_slots(&self) -> usize {
        MAX_SELECTED.saturating_sub(self.selected_view.len())
    }

    pub fn is_full(&self) -> bool {
        self.selected_view.len() >= MAX_SELECTED
    }

    /// Look up an installed app.
    pub fn find(&self, package_id: &str) -> Option<&AppRecord> {
        self.catalog_view.iter().find(|r| r.package_id == package_id)
    }

    /// Subscribe to view changes.
    pub fn subscribe(&self) -> Receiver<SelectionEvent> {
        self.events.subscribe()
    }

    fn ensure_migrated(&mut self) {
        if self.migrated {
            return;
        }

        match self.store.migrate_legacy_if_needed() {
            Ok(_) => self.migrated = true,
            // Retried on the next load.
            Err(e) => warn!("Legacy selection migration failed: {}", e),
        }
    }

    fn persist(&self) {
        let entries: Vec<SavedEntry> = self
            .selected_view
            .iter()
            .map(|r| SavedEntry::new(r.package_id.clone(), r.custom_label.clone()))
            .collect();

        if let Err(e) = self.store.save(&entries) {
            warn!("Failed to save selected apps: {}", e);
        }
    }

    fn emit(&self, event: SelectionEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capy_apps::{CatalogError, LaunchableApp};
    use capy_prefs::{LEGACY_SELECTED_KEY, MemoryPrefs, SAVED_APPS_KEY};
    use std::sync::Arc;

    struct FakeCatalog {
        apps: Vec<LaunchableApp>,
        fail: bool,
    }

    impl FakeCatalog {
        fn new(apps: &[(&str, &str)]) -> Self {
            Self {
                apps: apps
                    .iter()
                    .map(|(id, label)| LaunchableApp {
                        package_id: id.to_string(),
                        label: label.to_string(),
                    })
                    .collect(),
                fail: false,
            }
        }

        fn numbered(count: usize) -> Self {
            let apps: Vec<(String, String)> = (0..count)
                .map(|i| (format!("p{i:02}"), format!("App {i:02}")))
                .collect();
            let refs: Vec<(&str, &str)> = apps
                .iter()
                .map(|(id, label)| (id.as_str(), label.as_str()))
                .collect();
            Self::new(&refs)
        }
    }

    impl CatalogReader for FakeCatalog {
        fn query_launchable_apps(&self) -> Result<Vec<LaunchableApp>, CatalogError> {
            if self.fail {
                return Err(CatalogError::NoApplicationDirectories);
            }
            Ok(self.apps.clone())
        }
    }

    type Engine = SelectionEngine<FakeCatalog, Arc<MemoryPrefs>>;

    fn engine_with(catalog: FakeCatalog, prefs: &Arc<MemoryPrefs>) -> Engine {
        let mut engine = SelectionEngine::new(catalog, Arc::clone(prefs));
        engine.load();
        engine
    }

    fn selected_labels(engine: &Engine) -> Vec<&str> {
        engine.selected_view().iter().map(|r| r.display_name()).collect()
    }

    fn saved_ids(prefs: &Arc<MemoryPrefs>) -> Vec<String> {
        SavedAppsStore::new(Arc::clone(prefs))
            .load()
            .into_iter()
            .map(|e| e.package_id)
            .collect()
    }

    fn assert_views_consistent(engine: &Engine) {
        assert!(engine.selected_count() <= MAX_SELECTED);
        let selected: HashSet<&str> = engine
            .selected_view()
            .iter()
            .map(|r| r.package_id.as_str())
            .collect();
        assert_eq!(selected.len(), engine.selected_count());
        assert!(engine.selected_view().iter().all(|r| r.is_selected));
        for record in engine.catalog_view() {
            assert_eq!(
                record.is_selected,
                selected.contains(record.package_id.as_str())
            );
        }
    }

    #[test]
    fn fresh_load_has_nothing_selected() {
        let prefs = Arc::new(MemoryPrefs::new());
        let engine = engine_with(FakeCatalog::new(&[("p2", "Beta"), ("p1", "Alpha")]), &prefs);

        assert!(engine.selected_view().is_empty());
        let labels: Vec<_> = engine.catalog_view().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Alpha", "Beta"]);
        assert!(engine.catalog_view().iter().all(|r| !r.is_selected));
    }

    #[test]
    fn catalog_sort_ignores_case() {
        let prefs = Arc::new(MemoryPrefs::new());
        let engine = engine_with(
            FakeCatalog::new(&[("z", "zulu"), ("b", "Bravo"), ("a", "alpha")]),
            &prefs,
        );
        let labels: Vec<_> = engine.catalog_view().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["alpha", "Bravo", "zulu"]);
    }

    #[test]
    fn selection_keeps_toggle_order_and_persists() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = engine_with(FakeCatalog::new(&[("p1", "Alpha"), ("p2", "Beta")]), &prefs);

        assert!(engine.toggle_selection("p2").is_applied());
        assert!(engine.toggle_selection("p1").is_applied());

        assert_eq!(selected_labels(&engine), ["Beta", "Alpha"]);
        assert_eq!(saved_ids(&prefs), ["p2", "p1"]);
        assert_views_consistent(&engine);
    }

    #[test]
    fn eleventh_selection_is_ignored() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = engine_with(FakeCatalog::numbered(12), &prefs);

        for i in 0..MAX_SELECTED {
            assert!(engine.toggle_selection(&format!("p{i:02}")).is_applied());
        }
        assert!(engine.is_full());
        assert_eq!(engine.remaining_slots(), 0);

        let before = engine.selected_view().to_vec();
        assert_eq!(
            engine.toggle_selection("p10"),
            Change::Ignored(IgnoreReason::SelectionFull)
        );
        assert_eq!(engine.selected_view(), &before[..]);
        assert!(!engine.find("p10").unwrap().is_selected);
        assert_eq!(saved_ids(&prefs).len(), MAX_SELECTED);

        // Unselecting still works at the cap.
        assert!(engine.toggle_selection("p03").is_applied());
        assert_eq!(engine.selected_count(), MAX_SELECTED - 1);
        assert_views_consistent(&engine);
    }

    #[test]
    fn toggle_sequences_respect_the_cap() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = engine_with(FakeCatalog::numbered(15), &prefs);

        // Deterministic pseudo-random walk over the ids.
        let mut state: u32 = 7;
        for _ in 0..300 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let id = format!("p{:02}", (state >> 16) % 15);
            engine.toggle_selection(&id);
            assert_views_consistent(&engine);
        }

        let persisted = saved_ids(&prefs);
        let in_memory: Vec<_> = engine
            .selected_view()
            .iter()
            .map(|r| r.package_id.clone())
            .collect();
        assert_eq!(persisted, in_memory);
    }

    #[test]
    fn double_toggle_restores_composition_not_position() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = engine_with(
            FakeCatalog::new(&[("a", "A"), ("b", "B"), ("c", "C")]),
            &prefs,
        );
        for id in ["a", "b", "c"] {
            engine.toggle_selection(id);
        }

        engine.toggle_selection("a");
        engine.toggle_selection("a");

        assert_eq!(selected_labels(&engine), ["B", "C", "A"]);
        assert_views_consistent(&engine);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = engine_with(FakeCatalog::new(&[("a", "A")]), &prefs);

        assert_eq!(
            engine.toggle_selection("ghost"),
            Change::Ignored(IgnoreReason::UnknownApp)
        );
        assert_eq!(
            engine.rename("ghost", "Boo"),
            Change::Ignored(IgnoreReason::UnknownApp)
        );
        assert!(!prefs.contains(SAVED_APPS_KEY));
    }

    #[test]
    fn reorder_swaps_exact_positions() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = engine_with(
            FakeCatalog::new(&[("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")]),
            &prefs,
        );
        for id in ["a", "b", "c", "d"] {
            engine.toggle_selection(id);
        }

        assert!(engine.reorder(0, 3).is_applied());
        assert_eq!(selected_labels(&engine), ["D", "B", "C", "A"]);
        assert_eq!(saved_ids(&prefs), ["d", "b", "c", "a"]);

        assert!(engine.move_up(2).is_applied());
        assert_eq!(selected_labels(&engine), ["D", "C", "B", "A"]);
        assert!(engine.move_down(0).is_applied());
        assert_eq!(selected_labels(&engine), ["C", "D", "B", "A"]);
    }

    #[test]
    fn invalid_reorders_are_ignored() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = engine_with(FakeCatalog::new(&[("a", "A"), ("b", "B")]), &prefs);
        engine.toggle_selection("a");
        engine.toggle_selection("b");

        assert_eq!(
            engine.reorder(1, 1),
            Change::Ignored(IgnoreReason::SamePosition)
        );
        assert_eq!(
            engine.reorder(0, 2),
            Change::Ignored(IgnoreReason::IndexOutOfRange)
        );
        assert_eq!(
            engine.reorder(usize::MAX, 0),
            Change::Ignored(IgnoreReason::IndexOutOfRange)
        );
        assert_eq!(
            engine.move_up(0),
            Change::Ignored(IgnoreReason::IndexOutOfRange)
        );
        assert_eq!(
            engine.move_down(1),
            Change::Ignored(IgnoreReason::IndexOutOfRange)
        );
        assert_eq!(selected_labels(&engine), ["A", "B"]);
    }

    #[test]
    fn rename_updates_both_views_and_survives_reload() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = engine_with(FakeCatalog::new(&[("a", "Alpha"), ("b", "Beta")]), &prefs);
        engine.toggle_selection("a");

        assert!(engine.rename("a", "Ärger").is_applied());
        assert_eq!(engine.find("a").unwrap().display_name(), "Ärger");
        assert_eq!(engine.selected_view()[0].display_name(), "Ärger");

        let reloaded = engine_with(FakeCatalog::new(&[("a", "Alpha"), ("b", "Beta")]), &prefs);
        assert_eq!(reloaded.selected_view()[0].display_name(), "Ärger");
        assert_eq!(reloaded.find("a").unwrap().custom_label.as_deref(), Some("Ärger"));
        assert!(reloaded.selected_view()[0].is_selected);
        assert_views_consistent(&reloaded);
    }

    #[test]
    fn blank_or_own_label_clears_custom_label() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = engine_with(FakeCatalog::new(&[("a", "Alpha")]), &prefs);
        engine.toggle_selection("a");

        engine.rename("a", "Mine");
        engine.rename("a", "");
        engine.load();
        assert_eq!(engine.selected_view()[0].display_name(), "Alpha");
        assert_eq!(engine.selected_view()[0].custom_label, None);

        engine.rename("a", "Mine");
        engine.rename("a", "   ");
        assert_eq!(engine.selected_view()[0].custom_label, None);

        engine.rename("a", "Mine");
        engine.rename("a", "Alpha");
        assert_eq!(engine.selected_view()[0].custom_label, None);
    }

    #[test]
    fn load_keeps_saved_order_and_skips_uninstalled() {
        let prefs = Arc::new(MemoryPrefs::new());
        SavedAppsStore::new(Arc::clone(&prefs))
            .save(&[
                SavedEntry::new("c", Some("Sea".into())),
                SavedEntry::new("gone", None),
                SavedEntry::new("a", None),
            ])
            .unwrap();

        let engine = engine_with(
            FakeCatalog::new(&[("a", "A"), ("b", "B"), ("c", "C")]),
            &prefs,
        );

        assert_eq!(selected_labels(&engine), ["Sea", "A"]);
        assert_views_consistent(&engine);
        // Uninstalled entries stay stored until the next save.
        assert_eq!(saved_ids(&prefs), ["c", "gone", "a"]);
    }

    #[test]
    fn loaded_selection_is_marked_selected() {
        let prefs = Arc::new(MemoryPrefs::new());
        SavedAppsStore::new(Arc::clone(&prefs))
            .save(&[SavedEntry::new("a", None)])
            .unwrap();

        let engine = engine_with(FakeCatalog::new(&[("a", "A"), ("b", "B")]), &prefs);

        assert!(engine.selected_view()[0].is_selected);
        assert_eq!(engine.selected_view()[0], *engine.find("a").unwrap());
        assert!(!engine.find("b").unwrap().is_selected);
    }

    #[test]
    fn load_is_idempotent() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = engine_with(FakeCatalog::new(&[("a", "A"), ("b", "B")]), &prefs);
        engine.toggle_selection("b");
        engine.rename("b", "Bee");

        engine.load();
        let catalog = engine.catalog_view().to_vec();
        let selected = engine.selected_view().to_vec();
        engine.load();

        assert_eq!(engine.catalog_view(), &catalog[..]);
        assert_eq!(engine.selected_view(), &selected[..]);
    }

    #[test]
    fn catalog_failure_yields_empty_views() {
        let prefs = Arc::new(MemoryPrefs::new());
        SavedAppsStore::new(Arc::clone(&prefs))
            .save(&[SavedEntry::new("a", None)])
            .unwrap();

        let mut catalog = FakeCatalog::new(&[("a", "A")]);
        catalog.fail = true;
        let engine = engine_with(catalog, &prefs);

        assert!(engine.catalog_view().is_empty());
        assert!(engine.selected_view().is_empty());
        assert_eq!(saved_ids(&prefs), ["a"]);
    }

    #[test]
    fn oversized_saved_list_is_capped() {
        let prefs = Arc::new(MemoryPrefs::new());
        let entries: Vec<SavedEntry> = (0..12)
            .map(|i| SavedEntry::new(format!("p{i:02}"), None))
            .collect();
        SavedAppsStore::new(Arc::clone(&prefs)).save(&entries).unwrap();

        let engine = engine_with(FakeCatalog::numbered(12), &prefs);
        assert_eq!(engine.selected_count(), MAX_SELECTED);
        assert!(!engine.find("p11").unwrap().is_selected);
        assert_views_consistent(&engine);
    }

    #[test]
    fn legacy_selection_is_migrated_on_first_load() {
        let prefs = Arc::new(MemoryPrefs::new());
        prefs
            .put_string_set(
                LEGACY_SELECTED_KEY,
                ["a", "b", "c"].iter().map(|s| s.to_string()).collect(),
            )
            .unwrap();

        let mut engine = engine_with(
            FakeCatalog::new(&[("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")]),
            &prefs,
        );

        let mut ids = saved_ids(&prefs);
        ids.sort();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(!prefs.contains(LEGACY_SELECTED_KEY));
        assert_eq!(engine.selected_count(), 3);
        assert!(engine.selected_view().iter().all(|r| r.custom_label.is_none()));
        assert_views_consistent(&engine);

        let before = engine.selected_view().to_vec();
        engine.load();
        assert_eq!(engine.selected_view(), &before[..]);
    }

    #[test]
    fn subscribers_receive_changes() {
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = SelectionEngine::new(FakeCatalog::new(&[("a", "A")]), Arc::clone(&prefs));
        let mut rx = engine.subscribe();

        engine.load();
        engine.toggle_selection("a");
        engine.rename("a", "Ay");
        engine.reorder(0, 0);

        assert_eq!(
            rx.try_recv().unwrap(),
            SelectionEvent::Loaded {
                catalog: 1,
                selected: 0
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SelectionEvent::SelectionChanged {
                package_id: "a".into(),
                selected: true
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SelectionEvent::Renamed {
                package_id: "a".into(),
                custom_label: Some("Ay".into())
            }
        );
        assert!(rx.try_recv().is_err());
    }
}
