// Application state management
//
// This module contains the main AppState struct and re-exports
// configuration types from the config submodule.

pub mod config;
pub mod event;

// Re-export config types for convenience
pub use config::{GroupingMode, RefreshConfig, UNGROUPED_ID};

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, info};

use crate::layout::RingConfig;
use crate::model::{self, Group, Interface, Snapshot};
use crate::scene::{self, Scene};
use config::{MAX_REFRESH_MS, MIN_REFRESH_MS, REFRESH_STEP};

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    /// Last successfully loaded snapshot
    pub snapshot: Snapshot,

    /// Snapshot file to reload from, if the data came from disk
    pub source: Option<PathBuf>,

    /// Active grouping mode
    pub grouping: GroupingMode,

    /// Distinct tag keys present in the snapshot, for cycling tag groupings
    tag_keys: Vec<String>,

    /// Currently selected interface index (into the scene's normalized order)
    pub selected: Option<usize>,

    /// Cached scene for the current snapshot and grouping
    pub scene: Option<Scene>,

    /// Scene build or reload error message (if any)
    pub scene_error: Option<String>,

    /// Ring geometry
    pub ring: RingConfig,

    /// Refresh interval configuration
    pub refresh_config: RefreshConfig,

    /// Last time the snapshot file was re-read
    last_reload: Instant,
}

impl AppState {
    /// Create a new AppState around an initial snapshot.
    pub fn new(snapshot: Snapshot, source: Option<PathBuf>, ring: RingConfig) -> Self {
        let mut state = Self {
            running: true,
            tag_keys: collect_tag_keys(&snapshot),
            snapshot,
            source,
            grouping: GroupingMode::default(),
            selected: None,
            scene: None,
            scene_error: None,
            ring,
            refresh_config: RefreshConfig::new(),
            last_reload: Instant::now(),
        };
        state.rebuild_scene();
        state
    }

    /// Rebuild the cached scene from the current snapshot and grouping.
    ///
    /// A failed build clears the previous scene so the view shows an error
    /// placeholder instead of stale geometry.
    pub fn rebuild_scene(&mut self) {
        let effective = self.effective_snapshot();
        match scene::build_scene(&effective, Utc::now(), &self.ring) {
            Ok(scene) => {
                // Clamp the selection to the new interface count.
                let count = scene.normalized.interfaces.len();
                self.selected = self.selected.filter(|&s| s < count);
                if count == 0 {
                    self.selected = None;
                }
                self.scene = Some(scene);
                self.scene_error = None;
            }
            Err(e) => {
                error!(error = %e, "scene build failed");
                self.scene = None;
                self.selected = None;
                self.scene_error = Some(e.to_string());
            }
        }
    }

    /// The snapshot with the active grouping mode applied.
    ///
    /// `Declared` passes the snapshot through untouched; the other modes
    /// synthesize groups from an interface metadata field and reassign each
    /// interface accordingly. Interfaces missing the field land in a
    /// catch-all group.
    pub fn effective_snapshot(&self) -> Snapshot {
        let key = |iface: &Interface| -> Option<String> {
            match &self.grouping {
                GroupingMode::Declared => None,
                GroupingMode::Subnet => iface.subnet.clone(),
                GroupingMode::Az => iface.az.clone(),
                GroupingMode::Tag(k) => iface.tags.get(k).cloned(),
            }
        };
        if self.grouping == GroupingMode::Declared {
            return self.snapshot.clone();
        }

        let mut snapshot = self.snapshot.clone();
        let mut values: BTreeSet<String> = BTreeSet::new();
        let mut any_ungrouped = false;
        for iface in &mut snapshot.interfaces {
            match key(iface) {
                Some(value) => {
                    iface.group = value.clone();
                    values.insert(value);
                }
                None => {
                    iface.group = UNGROUPED_ID.to_string();
                    any_ungrouped = true;
                }
            }
        }
        snapshot.groups = values
            .into_iter()
            .map(|v| Group::new(v.clone(), v))
            .collect();
        if any_ungrouped {
            snapshot.groups.push(Group::new(UNGROUPED_ID, "Ungrouped"));
        }
        snapshot
    }

    /// Cycle to the next grouping mode: declared, subnet, az, then each tag
    /// key in order, and back to declared.
    pub fn cycle_grouping(&mut self) {
        self.grouping = match &self.grouping {
            GroupingMode::Declared => GroupingMode::Subnet,
            GroupingMode::Subnet => GroupingMode::Az,
            GroupingMode::Az => match self.tag_keys.first() {
                Some(k) => GroupingMode::Tag(k.clone()),
                None => GroupingMode::Declared,
            },
            GroupingMode::Tag(current) => {
                let next = self
                    .tag_keys
                    .iter()
                    .position(|k| k == current)
                    .and_then(|i| self.tag_keys.get(i + 1));
                match next {
                    Some(k) => GroupingMode::Tag(k.clone()),
                    None => GroupingMode::Declared,
                }
            }
        };
        info!(mode = %self.grouping.label(), "grouping changed");
        self.rebuild_scene();
    }

    /// Number of interfaces in the current scene.
    fn interface_count(&self) -> usize {
        self.scene
            .as_ref()
            .map_or(0, |s| s.normalized.interfaces.len())
    }

    /// Select the next interface, wrapping at the end.
    pub fn select_next(&mut self) {
        let count = self.interface_count();
        if count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % count,
            None => 0,
        });
    }

    /// Select the previous interface, wrapping at the start.
    pub fn select_previous(&mut self) {
        let count = self.interface_count();
        if count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        });
    }

    /// The currently selected interface, if any.
    pub fn selected_interface(&self) -> Option<&Interface> {
        let scene = self.scene.as_ref()?;
        scene.normalized.interfaces.get(self.selected?)
    }

    /// Re-read the snapshot file. A failed read keeps the previous data and
    /// records the error.
    pub fn reload(&mut self) {
        let Some(path) = self.source.clone() else {
            return;
        };
        match model::load_snapshot(&path) {
            Ok(snapshot) => {
                self.tag_keys = collect_tag_keys(&snapshot);
                self.snapshot = snapshot;
                self.rebuild_scene();
            }
            Err(e) => {
                error!(error = %e, "snapshot reload failed");
                self.scene_error = Some(e.to_string());
            }
        }
        self.last_reload = Instant::now();
    }

    /// Reload the snapshot file when the data interval has elapsed.
    pub fn maybe_reload(&mut self) {
        if self.source.is_some() && self.last_reload.elapsed() >= self.refresh_config.data_interval()
        {
            self.reload();
        }
    }

    /// Increase the refresh interval (slower updates)
    pub fn increase_refresh_rate(&mut self) {
        let new_ms = (self.refresh_config.refresh_ms + REFRESH_STEP).min(MAX_REFRESH_MS);
        if new_ms != self.refresh_config.refresh_ms {
            self.refresh_config.refresh_ms = new_ms;
            self.refresh_config.last_change = Some(Instant::now());
        }
    }

    /// Decrease the refresh interval (faster updates)
    pub fn decrease_refresh_rate(&mut self) {
        let new_ms = self
            .refresh_config
            .refresh_ms
            .saturating_sub(REFRESH_STEP)
            .max(MIN_REFRESH_MS);
        if new_ms != self.refresh_config.refresh_ms {
            self.refresh_config.refresh_ms = new_ms;
            self.refresh_config.last_change = Some(Instant::now());
        }
    }
}

/// Distinct tag keys across all interfaces, sorted.
fn collect_tag_keys(snapshot: &Snapshot) -> Vec<String> {
    let keys: BTreeSet<&String> = snapshot
        .interfaces
        .iter()
        .flat_map(|i| i.tags.keys())
        .collect();
    keys.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InterfaceKind;
    use std::collections::BTreeMap;

    fn iface(id: &str, group: &str, subnet: Option<&str>, az: Option<&str>) -> Interface {
        Interface {
            id: id.into(),
            name: id.into(),
            group: group.into(),
            ips: vec![],
            public_ips: vec![],
            kind: InterfaceKind::Standard,
            status: Default::default(),
            created_at: None,
            subnet: subnet.map(Into::into),
            az: az.map(Into::into),
            tags: BTreeMap::new(),
        }
    }

    fn snapshot() -> Snapshot {
        let mut a = iface("eni-a", "app", Some("subnet-1"), Some("us-east-1a"));
        a.tags.insert("env".into(), "prod".into());
        a.tags.insert("team".into(), "core".into());
        let b = iface("eni-b", "app", Some("subnet-2"), None);
        Snapshot {
            groups: vec![Group::new("app", "Application")],
            interfaces: vec![a, b],
            traffic: vec![],
        }
    }

    fn state() -> AppState {
        AppState::new(snapshot(), None, RingConfig::default())
    }

    #[test]
    fn test_initial_scene_is_built() {
        let state = state();
        assert!(state.scene.is_some());
        assert!(state.scene_error.is_none());
        assert_eq!(state.interface_count(), 2);
    }

    #[test]
    fn test_grouping_cycle_visits_tags_and_returns() {
        let mut state = state();
        assert_eq!(state.grouping, GroupingMode::Declared);
        state.cycle_grouping();
        assert_eq!(state.grouping, GroupingMode::Subnet);
        state.cycle_grouping();
        assert_eq!(state.grouping, GroupingMode::Az);
        state.cycle_grouping();
        assert_eq!(state.grouping, GroupingMode::Tag("env".into()));
        state.cycle_grouping();
        assert_eq!(state.grouping, GroupingMode::Tag("team".into()));
        state.cycle_grouping();
        assert_eq!(state.grouping, GroupingMode::Declared);
    }

    #[test]
    fn test_grouping_cycle_without_tags_skips_tag_modes() {
        let mut snap = snapshot();
        for iface in &mut snap.interfaces {
            iface.tags.clear();
        }
        let mut state = AppState::new(snap, None, RingConfig::default());
        state.cycle_grouping();
        state.cycle_grouping();
        state.cycle_grouping();
        assert_eq!(state.grouping, GroupingMode::Declared);
    }

    #[test]
    fn test_subnet_regrouping_synthesizes_groups() {
        let mut state = state();
        state.grouping = GroupingMode::Subnet;
        let effective = state.effective_snapshot();
        let ids: Vec<&str> = effective.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["subnet-1", "subnet-2"]);
        assert!(effective.interfaces.iter().all(|i| i.group.starts_with("subnet-")));
    }

    #[test]
    fn test_missing_field_lands_in_catch_all_group() {
        let mut state = state();
        state.grouping = GroupingMode::Az;
        let effective = state.effective_snapshot();
        let b = effective.interfaces.iter().find(|i| i.id == "eni-b").unwrap();
        assert_eq!(b.group, UNGROUPED_ID);
        assert!(effective.groups.iter().any(|g| g.id == UNGROUPED_ID));
    }

    #[test]
    fn test_tag_regrouping_uses_tag_value() {
        let mut state = state();
        state.grouping = GroupingMode::Tag("env".into());
        let effective = state.effective_snapshot();
        let a = effective.interfaces.iter().find(|i| i.id == "eni-a").unwrap();
        assert_eq!(a.group, "prod");
    }

    #[test]
    fn test_selection_wraps_both_directions() {
        let mut state = state();
        state.select_next();
        assert_eq!(state.selected, Some(0));
        state.select_next();
        assert_eq!(state.selected, Some(1));
        state.select_next();
        assert_eq!(state.selected, Some(0));
        state.select_previous();
        assert_eq!(state.selected, Some(1));
    }

    #[test]
    fn test_selection_noop_on_empty_scene() {
        let mut state = AppState::new(Snapshot::default(), None, RingConfig::default());
        state.select_next();
        assert_eq!(state.selected, None);
        state.select_previous();
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_selection_clamped_after_regroup() {
        let mut state = state();
        state.selected = Some(1);
        state.cycle_grouping();
        // Both interfaces survive regrouping, selection stays valid.
        assert_eq!(state.selected, Some(1));
    }

    #[test]
    fn test_refresh_rate_clamps() {
        let mut state = state();
        state.refresh_config.refresh_ms = MIN_REFRESH_MS;
        state.decrease_refresh_rate();
        assert_eq!(state.refresh_config.refresh_ms, MIN_REFRESH_MS);
        assert!(state.refresh_config.last_change.is_none());

        state.refresh_config.refresh_ms = MAX_REFRESH_MS;
        state.increase_refresh_rate();
        assert_eq!(state.refresh_config.refresh_ms, MAX_REFRESH_MS);

        state.decrease_refresh_rate();
        assert_eq!(state.refresh_config.refresh_ms, MAX_REFRESH_MS - REFRESH_STEP);
        assert!(state.refresh_config.last_change.is_some());
    }

    #[test]
    fn test_scene_build_error_clears_view() {
        let mut snap = snapshot();
        snap.groups.push(Group::new("app", "Duplicate"));
        let state = AppState::new(snap, None, RingConfig::default());
        assert!(state.scene.is_none());
        assert!(state.selected.is_none());
        assert!(state.scene_error.is_some());
    }

    #[test]
    fn test_reload_missing_file_keeps_previous_scene() {
        let mut state = AppState::new(
            snapshot(),
            Some(PathBuf::from("/nonexistent/snapshot.json")),
            RingConfig::default(),
        );
        assert!(state.scene.is_some());
        state.reload();
        assert!(state.scene.is_some());
        assert!(state.scene_error.is_some());
        assert_eq!(state.interface_count(), 2);
    }
}
