// Scene assembly
//
// Runs the full pipeline for one snapshot: normalization, sector allocation,
// glyph placement, anchor derivation, and traffic-curve construction. The
// output is a backend-neutral list of drawable primitives in the y-down
// center-origin frame.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::encode::{self, CurveStyle};
use crate::layout::geometry::{can_connect, traffic_curve, GlyphOutline, Point, QuadCurve};
use crate::layout::{self, RingConfig};
use crate::model::{InterfaceStatus, Snapshot};
use crate::normalize::{normalize, Normalized};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("duplicate group id {0:?}")]
    DuplicateGroup(String),
}

/// One interface glyph, positioned on its row.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Index into [`Scene::normalized`] interfaces.
    pub iface: usize,
    pub outline: GlyphOutline,
    pub status: InterfaceStatus,
    pub label: String,
}

/// Small fixed marker on the front ring, one per occupied front slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontMarker {
    pub angle: f64,
    pub radius: f64,
}

/// One rendered traffic flow.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficCurve {
    pub src: usize,
    pub dst: usize,
    pub curve: QuadCurve,
    pub style: CurveStyle,
}

/// Group name positioned on an arc outside the group's outermost row.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLabel {
    pub text: String,
    pub mid_angle: f64,
    pub radius: f64,
}

/// Complete drawable description of one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub normalized: Normalized,
    pub glyphs: Vec<Glyph>,
    pub markers: Vec<FrontMarker>,
    pub curves: Vec<TrafficCurve>,
    pub labels: Vec<GroupLabel>,
    /// Radius the canvas must cover so nothing is clipped.
    pub canvas_radius: f64,
}

/// Build the scene for one snapshot at time `now`.
pub fn build_scene(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    cfg: &RingConfig,
) -> Result<Scene, SceneError> {
    let mut seen = HashMap::new();
    for group in &snapshot.groups {
        if seen.insert(group.id.as_str(), ()).is_some() {
            return Err(SceneError::DuplicateGroup(group.id.clone()));
        }
    }

    let normalized = normalize(&snapshot.groups, &snapshot.interfaces, &snapshot.traffic, now);
    let sectors = layout::compute_sectors(&normalized, cfg);
    let placements = layout::place_interfaces(&sectors, cfg);

    // Resolve each traffic record to a (src, dst) interface pair up front;
    // the pair list drives both anchor eligibility and curve construction.
    let by_id: HashMap<&str, usize> = normalized
        .interfaces
        .iter()
        .enumerate()
        .map(|(i, iface)| (iface.id.as_str(), i))
        .collect();
    let mut pairs: Vec<(usize, usize, usize)> = Vec::new();
    for (rec_index, rec) in snapshot.traffic.iter().enumerate() {
        let Some(&src) = by_id.get(rec.id.as_str()) else {
            debug!(record = %rec.id, "traffic source not in layout, skipping");
            continue;
        };
        let Some(dst) = normalized
            .interfaces
            .iter()
            .position(|iface| iface.owns_ip(&rec.dstaddr))
        else {
            debug!(record = %rec.id, dstaddr = %rec.dstaddr, "traffic destination unresolved, skipping");
            continue;
        };
        if src == dst {
            continue;
        }
        let src_kind = normalized.interfaces[src].kind;
        let dst_kind = normalized.interfaces[dst].kind;
        if !can_connect(src_kind, dst_kind) {
            debug!(record = %rec.id, "kind pair cannot connect, skipping");
            continue;
        }
        pairs.push((src, dst, rec_index));
    }

    let mut connected = vec![false; normalized.interfaces.len()];
    for &(src, dst, _) in &pairs {
        connected[src] = true;
        connected[dst] = true;
    }

    let anchors = layout::compute_anchors(&sectors, &placements, &connected, cfg);
    let anchor_points: HashMap<usize, Point> =
        anchors.iter().map(|a| (a.iface, a.point)).collect();

    let ring_radius = cfg.ring_radius();
    let top = encode::top_traffic(&snapshot.traffic);
    let mut curves = Vec::with_capacity(pairs.len());
    for (src, dst, rec_index) in pairs {
        // Both ends have anchors by construction of `connected`.
        let (Some(&from), Some(&to)) = (anchor_points.get(&src), anchor_points.get(&dst)) else {
            continue;
        };
        let rec = &snapshot.traffic[rec_index];
        curves.push(TrafficCurve {
            src,
            dst,
            curve: traffic_curve(from, to, ring_radius),
            style: encode::encode(rec, top),
        });
    }

    let glyphs = placements
        .iter()
        .map(|p| {
            let iface = &normalized.interfaces[p.iface];
            Glyph {
                iface: p.iface,
                outline: GlyphOutline::new(p.angle, p.radius, cfg.glyph_width, cfg.glyph_height, p.row),
                status: iface.status,
                label: iface.display_name().to_string(),
            }
        })
        .collect();

    // One front-ring marker per occupied front slot in each sector.
    let slot = cfg.slot_angle();
    let front_radius = cfg.front_ring_radius();
    let mut markers = Vec::new();
    for (sector_index, sector) in sectors.iter().enumerate() {
        let occupied = placements
            .iter()
            .filter(|p| p.sector == sector_index)
            .map(|p| p.pos_in_row)
            .max();
        if let Some(max_pos) = occupied {
            for pos in 0..=max_pos {
                markers.push(FrontMarker {
                    angle: sector.start_angle + pos as f64 * slot + slot / 2.0,
                    radius: front_radius,
                });
            }
        }
    }

    let labels = sectors
        .iter()
        .enumerate()
        .map(|(i, sector)| GroupLabel {
            text: normalized.ranges[sector.range_index]
                .group
                .display_name()
                .to_string(),
            mid_angle: sector.mid_angle(),
            radius: layout::label_radius(i, &placements, cfg),
        })
        .collect();

    let canvas_radius = layout::required_canvas_radius(&placements, cfg);

    Ok(Scene {
        normalized,
        glyphs,
        markers,
        curves,
        labels,
        canvas_radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Group, Interface, InterfaceKind, TrafficRecord};
    use std::f64::consts::PI;

    fn iface(id: &str, group: &str, ip: &str, kind: InterfaceKind) -> Interface {
        Interface {
            id: id.into(),
            name: id.into(),
            group: group.into(),
            ips: vec![ip.into()],
            public_ips: vec![],
            kind,
            status: Default::default(),
            created_at: None,
            subnet: None,
            az: None,
            tags: Default::default(),
        }
    }

    fn record(id: &str, dstaddr: &str, bytes: f64, failed: f64) -> TrafficRecord {
        TrafficRecord {
            id: id.into(),
            srcaddr: "10.0.0.0".into(),
            dstaddr: dstaddr.into(),
            srcport: None,
            dstport: Some(443),
            protocol: "6".into(),
            bytes,
            packets: 1,
            success: 1.0,
            failed,
            connection_strength: None,
        }
    }

    fn two_group_snapshot() -> Snapshot {
        Snapshot {
            groups: vec![Group::new("app", "Application")],
            interfaces: vec![
                iface("eni-c", "app", "10.0.0.3", InterfaceKind::Standard),
                iface("eni-a", "app", "10.0.0.1", InterfaceKind::Standard),
                iface("eni-b", "app", "10.0.0.2", InterfaceKind::Standard),
            ],
            traffic: vec![record("eni-a", "10.0.0.2", 1000.0, 0.0)],
        }
    }

    #[test]
    fn test_two_group_scene_end_to_end() {
        let cfg = RingConfig::default();
        let scene = build_scene(&two_group_snapshot(), Utc::now(), &cfg).unwrap();

        // Infrastructure is empty, so one sector and three glyphs sorted
        // lexicographically by name.
        assert_eq!(scene.glyphs.len(), 3);
        let names: Vec<&str> = scene
            .glyphs
            .iter()
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(names, vec!["eni-a", "eni-b", "eni-c"]);

        // One curve between a and b; endpoints on the front ring.
        assert_eq!(scene.curves.len(), 1);
        let c = &scene.curves[0];
        let front = cfg.front_ring_radius();
        let from_r = (c.curve.from.x.powi(2) + c.curve.from.y.powi(2)).sqrt();
        let to_r = (c.curve.to.x.powi(2) + c.curve.to.y.powi(2)).sqrt();
        assert!((from_r - front).abs() < 1e-6);
        assert!((to_r - front).abs() < 1e-6);
        assert_eq!(c.style.width, 4);
        assert!(!c.style.alert);

        // Labels and markers exist for the single sector.
        assert_eq!(scene.labels.len(), 1);
        assert_eq!(scene.labels[0].text, "Application");
        assert_eq!(scene.markers.len(), 3);

        assert!(scene.canvas_radius > cfg.ring_radius());
    }

    #[test]
    fn test_unresolvable_destination_yields_no_curve() {
        let mut snap = two_group_snapshot();
        snap.traffic = vec![record("eni-a", "192.168.99.99", 500.0, 0.0)];
        let scene = build_scene(&snap, Utc::now(), &RingConfig::default()).unwrap();
        assert!(scene.curves.is_empty());
        // No connected interfaces means no anchors were needed either.
        assert_eq!(scene.glyphs.len(), 3);
    }

    #[test]
    fn test_unknown_source_yields_no_curve() {
        let mut snap = two_group_snapshot();
        snap.traffic = vec![record("eni-missing", "10.0.0.1", 500.0, 0.0)];
        let scene = build_scene(&snap, Utc::now(), &RingConfig::default()).unwrap();
        assert!(scene.curves.is_empty());
    }

    #[test]
    fn test_self_traffic_is_ignored() {
        let mut snap = two_group_snapshot();
        snap.traffic = vec![record("eni-a", "10.0.0.1", 500.0, 0.0)];
        let scene = build_scene(&snap, Utc::now(), &RingConfig::default()).unwrap();
        assert!(scene.curves.is_empty());
    }

    #[test]
    fn test_infra_to_infra_traffic_filtered() {
        let snap = Snapshot {
            groups: vec![],
            interfaces: vec![
                iface("vpce-1", "x", "10.1.0.1", InterfaceKind::Endpoint),
                iface("igw-1", "x", "10.1.0.2", InterfaceKind::Igw),
            ],
            traffic: vec![record("vpce-1", "10.1.0.2", 100.0, 0.0)],
        };
        let scene = build_scene(&snap, Utc::now(), &RingConfig::default()).unwrap();
        assert!(scene.curves.is_empty());
        assert_eq!(scene.glyphs.len(), 2);
    }

    #[test]
    fn test_failed_traffic_marks_alert() {
        let mut snap = two_group_snapshot();
        snap.traffic = vec![record("eni-a", "10.0.0.2", 100.0, 2.0)];
        let scene = build_scene(&snap, Utc::now(), &RingConfig::default()).unwrap();
        assert!(scene.curves[0].style.alert);
    }

    #[test]
    fn test_duplicate_group_id_rejected() {
        let snap = Snapshot {
            groups: vec![Group::new("app", "A"), Group::new("app", "B")],
            interfaces: vec![],
            traffic: vec![],
        };
        let err = build_scene(&snap, Utc::now(), &RingConfig::default()).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateGroup(id) if id == "app"));
    }

    #[test]
    fn test_empty_snapshot_is_a_valid_scene() {
        let scene =
            build_scene(&Snapshot::default(), Utc::now(), &RingConfig::default()).unwrap();
        assert!(scene.glyphs.is_empty());
        assert!(scene.curves.is_empty());
        assert!(scene.labels.is_empty());
        assert!(scene.canvas_radius.is_finite());
    }

    #[test]
    fn test_infra_sector_label_centered_at_bottom() {
        let snap = Snapshot {
            groups: vec![Group::new("app", "Application")],
            interfaces: vec![
                iface("vpce-1", "x", "10.1.0.1", InterfaceKind::Endpoint),
                iface("eni-a", "app", "10.0.0.1", InterfaceKind::Standard),
            ],
            traffic: vec![],
        };
        let scene = build_scene(&snap, Utc::now(), &RingConfig::default()).unwrap();
        let infra = scene
            .labels
            .iter()
            .find(|l| l.text == "Infrastructure")
            .unwrap();
        assert!((infra.mid_angle - PI / 2.0).abs() < 1e-6);
    }
}
