// Data normalizer
//
// First stage of the render pass: derives per-interface status from traffic,
// forces virtual appliances into the infrastructure group, sorts interfaces
// with a type-aware rule, and computes contiguous index ranges per group over
// the globally sorted interface sequence.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::model::{Group, Interface, InterfaceKind, InterfaceStatus, TrafficRecord, INFRA_GROUP_ID};

/// An interface created within this window is shown as "new".
const NEW_INTERFACE_WINDOW_MINUTES: i64 = 5;

/// Half-open index range `[start, end)` into the normalized interface
/// sequence. `None` means the group currently has no interfaces and must be
/// skipped by every downstream consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRange {
    pub group: Group,
    pub range: Option<std::ops::Range<usize>>,
}

impl GroupRange {
    pub fn len(&self) -> usize {
        self.range.as_ref().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalizer output: the globally sorted interface sequence plus one range
/// per group, infrastructure first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub interfaces: Vec<Interface>,
    pub ranges: Vec<GroupRange>,
}

impl Normalized {
    /// Ranges that actually contain interfaces, in placement order.
    pub fn non_empty_ranges(&self) -> impl Iterator<Item = &GroupRange> {
        self.ranges.iter().filter(|r| !r.is_empty())
    }
}

/// Derive the status of one interface from its age and the traffic records.
///
/// Priority: recently created wins over failure evidence; failure evidence
/// (any record with failed >= 1 that originates at this interface or targets
/// one of its private addresses) wins over the healthy default.
pub fn derive_status(
    iface: &Interface,
    traffic: &[TrafficRecord],
    now: DateTime<Utc>,
) -> InterfaceStatus {
    if let Some(created) = iface.created_at {
        if now.signed_duration_since(created) <= Duration::minutes(NEW_INTERFACE_WINDOW_MINUTES)
            && created <= now
        {
            return InterfaceStatus::New;
        }
    }

    let has_failure = traffic
        .iter()
        .filter(|rec| rec.failed >= 1.0)
        .any(|rec| rec.id == iface.id || iface.owns_ip(&rec.dstaddr));

    if has_failure {
        InterfaceStatus::Bad
    } else {
        InterfaceStatus::Good
    }
}

/// Sort the infrastructure group so that gateways sit in the middle of the
/// sector and endpoints bracket them symmetrically:
/// first half of endpoints, peering, igw, dns, vgw, second half of endpoints.
fn sort_infrastructure(interfaces: &mut Vec<Interface>) {
    let mut endpoints: Vec<Interface> = Vec::new();
    let mut peering: Vec<Interface> = Vec::new();
    let mut igw: Vec<Interface> = Vec::new();
    let mut dns: Vec<Interface> = Vec::new();
    let mut vgw: Vec<Interface> = Vec::new();
    let mut rest: Vec<Interface> = Vec::new();

    for iface in interfaces.drain(..) {
        match iface.kind {
            InterfaceKind::Endpoint => endpoints.push(iface),
            InterfaceKind::Peering => peering.push(iface),
            InterfaceKind::Igw => igw.push(iface),
            InterfaceKind::Dns => dns.push(iface),
            InterfaceKind::Vgw => vgw.push(iface),
            InterfaceKind::Standard => rest.push(iface),
        }
    }

    endpoints.sort_by(|a, b| a.display_name().cmp(b.display_name()));
    let half = endpoints.len() / 2;
    let back_endpoints = endpoints.split_off(half);

    interfaces.extend(endpoints);
    interfaces.extend(peering);
    interfaces.extend(igw);
    interfaces.extend(dns);
    interfaces.extend(vgw);
    interfaces.extend(back_endpoints);
    // Standard interfaces explicitly placed in the infrastructure group sort
    // after the appliances, by name.
    rest.sort_by(|a, b| a.display_name().cmp(b.display_name()));
    interfaces.extend(rest);
}

/// Run the full normalization pass.
///
/// `now` is passed in explicitly so the pass stays a pure function of its
/// inputs (and so status derivation is reproducible in tests).
pub fn normalize(
    groups: &[Group],
    interfaces: &[Interface],
    traffic: &[TrafficRecord],
    now: DateTime<Utc>,
) -> Normalized {
    // Infrastructure anchors the bottom of the circle and is always present
    // in the range list, even when no input group declares it.
    let infra = groups
        .iter()
        .find(|g| g.id == INFRA_GROUP_ID)
        .cloned()
        .unwrap_or_else(Group::infrastructure);
    let other_groups: Vec<&Group> = groups.iter().filter(|g| g.id != INFRA_GROUP_ID).collect();

    // Derive status and reassign virtual appliances into infrastructure.
    let mut assigned: Vec<Interface> = Vec::with_capacity(interfaces.len());
    for raw in interfaces {
        let mut iface = raw.clone();
        iface.status = derive_status(&iface, traffic, now);
        if iface.kind.is_infra() {
            iface.group = INFRA_GROUP_ID.to_string();
        }
        if iface.group != INFRA_GROUP_ID && !other_groups.iter().any(|g| g.id == iface.group) {
            // Unknown group reference: excluded from layout, not an error.
            warn!(interface = %iface.id, group = %iface.group, "dropping interface with unknown group");
            continue;
        }
        assigned.push(iface);
    }

    // Concatenate group by group, infrastructure first, recording [start, end).
    let mut sorted: Vec<Interface> = Vec::with_capacity(assigned.len());
    let mut ranges: Vec<GroupRange> = Vec::with_capacity(other_groups.len() + 1);

    let mut infra_members: Vec<Interface> = assigned
        .iter()
        .filter(|i| i.group == INFRA_GROUP_ID)
        .cloned()
        .collect();
    sort_infrastructure(&mut infra_members);
    ranges.push(push_group(&mut sorted, infra, infra_members));

    for group in other_groups {
        let mut members: Vec<Interface> = assigned
            .iter()
            .filter(|i| i.group == group.id)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.display_name().cmp(b.display_name()));
        ranges.push(push_group(&mut sorted, group.clone(), members));
    }

    Normalized {
        interfaces: sorted,
        ranges,
    }
}

fn push_group(sorted: &mut Vec<Interface>, group: Group, members: Vec<Interface>) -> GroupRange {
    if members.is_empty() {
        return GroupRange { group, range: None };
    }
    let start = sorted.len();
    sorted.extend(members);
    GroupRange {
        group,
        range: Some(start..sorted.len()),
    }
}
