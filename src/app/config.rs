// Application configuration types
//
// This module contains configuration structs and enums for:
// - Interface grouping modes
// - Refresh intervals

use std::time::{Duration, Instant};

// ============================================================================
// Constants
// ============================================================================

/// Minimum refresh interval in milliseconds
pub const MIN_REFRESH_MS: u64 = 250;

/// Maximum refresh interval in milliseconds
pub const MAX_REFRESH_MS: u64 = 30000;

/// Refresh interval adjustment step in milliseconds
pub const REFRESH_STEP: u64 = 250;

/// Data reload multiplier (the snapshot file is re-read at N times the UI
/// interval)
pub const DATA_REFRESH_MULTIPLIER: u64 = 10;

/// Duration to highlight recently changed refresh intervals
pub const CHANGE_HIGHLIGHT_DURATION: Duration = Duration::from_millis(500);

/// Group id assigned to interfaces missing the active grouping field.
pub const UNGROUPED_ID: &str = "ungrouped";

// ============================================================================
// Enums
// ============================================================================

/// Which interface field drives sector grouping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupingMode {
    /// The `group` field from the snapshot (default)
    #[default]
    Declared,
    /// Regroup by subnet
    Subnet,
    /// Regroup by availability zone
    Az,
    /// Regroup by the value of one tag
    Tag(String),
}

impl GroupingMode {
    /// Short name shown in the status line.
    pub fn label(&self) -> String {
        match self {
            GroupingMode::Declared => "group".to_string(),
            GroupingMode::Subnet => "subnet".to_string(),
            GroupingMode::Az => "az".to_string(),
            GroupingMode::Tag(key) => format!("tag:{}", key),
        }
    }
}

impl std::str::FromStr for GroupingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // "type" is accepted as an alias for the declared grouping.
            "group" | "type" => Ok(GroupingMode::Declared),
            "subnet" => Ok(GroupingMode::Subnet),
            "az" => Ok(GroupingMode::Az),
            other => match other.strip_prefix("tag:") {
                Some(key) if !key.is_empty() => Ok(GroupingMode::Tag(key.to_string())),
                _ => Err(format!(
                    "unknown grouping {:?} (expected group, subnet, az, or tag:<key>)",
                    other
                )),
            },
        }
    }
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Configuration for refresh intervals (unified)
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// UI refresh interval in milliseconds
    /// Snapshot reload uses this * DATA_REFRESH_MULTIPLIER
    pub refresh_ms: u64,

    /// Timestamp of last interval change (for visual feedback)
    pub last_change: Option<Instant>,
}

impl RefreshConfig {
    pub fn new() -> Self {
        Self {
            refresh_ms: 1000,
            last_change: None,
        }
    }

    /// Get UI refresh interval as Duration
    pub fn ui_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    /// Get snapshot reload interval as Duration
    pub fn data_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms * DATA_REFRESH_MULTIPLIER)
    }

    /// Whether the interval changed recently enough to highlight.
    pub fn recently_changed(&self) -> bool {
        self.last_change
            .is_some_and(|t| t.elapsed() < CHANGE_HIGHLIGHT_DURATION)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_refresh_config() {
        let config = RefreshConfig::new();
        assert_eq!(config.refresh_ms, 1000);
        assert!(config.last_change.is_none());
        assert_eq!(config.ui_interval(), Duration::from_millis(1000));
        assert_eq!(config.data_interval(), Duration::from_millis(10000));
    }

    #[test]
    fn test_grouping_mode_labels() {
        assert_eq!(GroupingMode::Declared.label(), "group");
        assert_eq!(GroupingMode::Subnet.label(), "subnet");
        assert_eq!(GroupingMode::Az.label(), "az");
        assert_eq!(GroupingMode::Tag("env".into()).label(), "tag:env");
    }

    #[test]
    fn test_grouping_mode_parse_round_trips() {
        for mode in [
            GroupingMode::Declared,
            GroupingMode::Subnet,
            GroupingMode::Az,
            GroupingMode::Tag("env".into()),
        ] {
            assert_eq!(mode.label().parse::<GroupingMode>().unwrap(), mode);
        }
        assert!("bogus".parse::<GroupingMode>().is_err());
        assert!("tag:".parse::<GroupingMode>().is_err());
    }
}
