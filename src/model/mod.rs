// Snapshot data contract
//
// Deserialized shape of one {groups, interfaces, traffic} snapshot as
// produced by the discovery/ingestion pipeline. All top-level arrays are
// optional on the wire: a missing array means "empty", never an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Reserved group id for shared network plumbing (gateways, endpoints, DNS).
/// Interfaces of non-standard kind are always forced into this group so the
/// diagram has a fixed visual anchor at the bottom of the circle.
pub const INFRA_GROUP_ID: &str = "infrastructure";

/// One angular sector of the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Display name: name if non-empty, else the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn infrastructure() -> Self {
        Self::new(INFRA_GROUP_ID, "Infrastructure")
    }
}

/// Kind of network attachment point.
///
/// Anything other than `Standard` represents shared/static network plumbing
/// (a "virtual appliance" in the discovery pipeline) and is regrouped into
/// the reserved infrastructure sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    #[default]
    Standard,
    Endpoint,
    Dns,
    Igw,
    Vgw,
    Peering,
}

impl InterfaceKind {
    /// Whether this kind belongs in the infrastructure sector.
    pub fn is_infra(self) -> bool {
        !matches!(self, InterfaceKind::Standard)
    }
}

/// Derived health status of an interface. Never read from input; recomputed
/// on every render pass from `created_at` and the traffic records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceStatus {
    #[default]
    Good,
    Bad,
    New,
}

/// One network attachment point (ENI or virtual appliance).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Interface {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub group: String,
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default, rename = "publicIps")]
    pub public_ips: Vec<String>,
    #[serde(default, rename = "type")]
    pub kind: InterfaceKind,
    /// Derived field; tolerated on input but always recomputed.
    #[serde(default)]
    pub status: InterfaceStatus,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    // Passthrough metadata from the discovery pipeline, used for regrouping.
    #[serde(default)]
    pub subnet: Option<String>,
    #[serde(default)]
    pub az: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Interface {
    /// Display name: name if non-empty, else the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Whether this interface owns the given private address.
    pub fn owns_ip(&self, addr: &str) -> bool {
        self.ips.iter().any(|ip| ip == addr)
    }
}

/// One observed flow aggregate. `id` names the source interface; the
/// destination interface is resolved indirectly by matching `dstaddr`
/// against interface private addresses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrafficRecord {
    pub id: String,
    pub srcaddr: String,
    pub dstaddr: String,
    #[serde(default)]
    pub srcport: Option<u16>,
    #[serde(default)]
    pub dstport: Option<u16>,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub bytes: f64,
    #[serde(default)]
    pub packets: u64,
    #[serde(default)]
    pub success: f64,
    #[serde(default)]
    pub failed: f64,
    #[serde(default, rename = "connectionStrength")]
    pub connection_strength: Option<i32>,
}

/// One full render input: immutable for the duration of a render pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    #[serde(default)]
    pub traffic: Vec<TrafficRecord>,
}

/// Load a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read snapshot file {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("malformed snapshot JSON in {}", path.display()))?;
    Ok(snapshot)
}
