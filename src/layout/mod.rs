// Layout engine
//
// Converts group index-ranges into angular sectors proportional to
// front-row density, computes per-interface (angle, radius, row) placement
// with row wrapping, and derives connection-anchor coordinates.

pub mod geometry;

use std::f64::consts::PI;

use crate::normalize::Normalized;
use geometry::Point;

/// Angle at which the infrastructure sector is centered: the bottom of the
/// circle in the y-down clockwise frame.
pub const INFRA_CENTER_ANGLE: f64 = PI / 2.0;

/// Geometric constants of the ring layout.
///
/// The front-row cap of 10 is inherited from the reference layout; it is a
/// tunable constant, not a hard rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingConfig {
    /// Base ring radius (R0).
    pub base_radius: f64,
    /// Interface glyph tangential width.
    pub glyph_width: f64,
    /// Interface glyph radial height.
    pub glyph_height: f64,
    /// Tangential margin between adjacent glyphs.
    pub glyph_margin: f64,
    /// Maximum number of interfaces per row.
    pub front_row_cap: usize,
    /// Radial distance from a group's outermost row to its label arc.
    pub label_offset: f64,
    /// Outer safety margin added to the required canvas radius.
    pub safety_margin: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            base_radius: 300.0,
            glyph_width: 34.0,
            glyph_height: 16.0,
            glyph_margin: 2.0,
            front_row_cap: 10,
            label_offset: 30.0,
            safety_margin: 20.0,
        }
    }
}

impl RingConfig {
    /// Radius of the first interface row.
    pub fn ring_radius(&self) -> f64 {
        self.base_radius + 10.0
    }

    /// Radius of the always-present front-ring marker glyphs.
    pub fn front_ring_radius(&self) -> f64 {
        self.base_radius - 3.0
    }

    /// Radial distance between consecutive rows.
    pub fn row_pitch(&self) -> f64 {
        self.glyph_height + 4.0
    }

    /// Angular gap between adjacent sectors.
    pub fn gap_angle(&self) -> f64 {
        10.0 / self.base_radius
    }

    /// Angular width consumed by one glyph slot (glyph plus margin) on the
    /// first row's ring.
    pub fn slot_angle(&self) -> f64 {
        (self.glyph_width + self.glyph_margin) / self.ring_radius()
    }

    /// Row and position-in-row for the interface at `local_index` within a
    /// sector of the given angular span.
    ///
    /// This is the single row-layout rule shared by glyph placement and
    /// anchor computation, so anchors can never drift from their glyphs.
    pub fn row_slot(&self, local_index: usize, span: f64) -> RowSlot {
        let uncapped = (span / self.slot_angle()).floor() as usize;
        let max_per_row = uncapped.clamp(1, self.front_row_cap.max(1));
        RowSlot {
            row: local_index / max_per_row,
            pos_in_row: local_index % max_per_row,
            max_per_row,
        }
    }
}

/// Resolved row assignment for one interface within its sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlot {
    pub row: usize,
    pub pos_in_row: usize,
    pub max_per_row: usize,
}

/// One group's angular allocation plus the interfaces placed within it, in
/// placement order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    /// Index into the normalizer's range list.
    pub range_index: usize,
    /// Global interface indices in placement order.
    pub iface_indices: Vec<usize>,
    pub start_angle: f64,
    pub end_angle: f64,
    pub span: f64,
}

impl Sector {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Allocate angular sectors for every non-empty group.
///
/// Spans are proportional to front-row density (`min(count, cap)`), so glyph
/// density stays roughly uniform around the ring. The infrastructure group,
/// when populated, is centered at the bottom of the circle; the remaining
/// groups run clockwise after it. When infrastructure is empty no centering
/// is applied and the first group starts at the bottom instead.
pub fn compute_sectors(normalized: &Normalized, cfg: &RingConfig) -> Vec<Sector> {
    let non_empty: Vec<(usize, std::ops::Range<usize>)> = normalized
        .ranges
        .iter()
        .enumerate()
        .filter_map(|(i, gr)| gr.range.clone().map(|r| (i, r)))
        .collect();
    if non_empty.is_empty() {
        return Vec::new();
    }

    let gap = cfg.gap_angle();
    let available = 2.0 * PI - gap * non_empty.len() as f64;

    let fronts: Vec<f64> = non_empty
        .iter()
        .map(|(_, r)| r.len().min(cfg.front_row_cap) as f64)
        .collect();
    let front_total: f64 = fronts.iter().sum();

    let spans: Vec<f64> = if front_total > 0.0 {
        fronts.iter().map(|f| available * f / front_total).collect()
    } else {
        // Degenerate fallback: equal division.
        vec![available / non_empty.len() as f64; non_empty.len()]
    };

    let mut sectors = Vec::with_capacity(non_empty.len());
    // Range index 0 is always the infrastructure group.
    let infra_populated = non_empty[0].0 == 0;
    let mut cursor = if infra_populated {
        let span = spans[0];
        let (range_index, range) = non_empty[0].clone();
        sectors.push(Sector {
            range_index,
            iface_indices: range.collect(),
            start_angle: INFRA_CENTER_ANGLE - span / 2.0,
            end_angle: INFRA_CENTER_ANGLE + span / 2.0,
            span,
        });
        INFRA_CENTER_ANGLE + span / 2.0 + gap
    } else {
        INFRA_CENTER_ANGLE
    };

    let skip = usize::from(infra_populated);
    for ((range_index, range), span) in non_empty.into_iter().zip(spans).skip(skip) {
        sectors.push(Sector {
            range_index,
            iface_indices: range.collect(),
            start_angle: cursor,
            end_angle: cursor + span,
            span,
        });
        cursor += span + gap;
    }

    sectors
}

/// Placement of one interface glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Global interface index.
    pub iface: usize,
    /// Index into the sector list.
    pub sector: usize,
    pub row: usize,
    pub pos_in_row: usize,
    /// Glyph center angle.
    pub angle: f64,
    /// Radius of the glyph's inner edge.
    pub radius: f64,
}

/// Place every interface within its sector, wrapping into outer rows when
/// the front row is full.
pub fn place_interfaces(sectors: &[Sector], cfg: &RingConfig) -> Vec<Placement> {
    let slot = cfg.slot_angle();
    let mut placements = Vec::new();
    for (sector_index, sector) in sectors.iter().enumerate() {
        for (local, &iface) in sector.iface_indices.iter().enumerate() {
            let rs = cfg.row_slot(local, sector.span);
            placements.push(Placement {
                iface,
                sector: sector_index,
                row: rs.row,
                pos_in_row: rs.pos_in_row,
                angle: sector.start_angle + rs.pos_in_row as f64 * slot + slot / 2.0,
                radius: cfg.ring_radius() + rs.row as f64 * cfg.row_pitch(),
            });
        }
    }
    placements
}

/// Fixed point where traffic curves touching one interface begin and end.
/// Carries explicit polar coordinates alongside the cartesian point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Global interface index.
    pub iface: usize,
    pub angle: f64,
    pub radius: f64,
    pub point: Point,
}

/// Compute connection anchors for every connected interface.
///
/// `connected` is indexed by global interface index and marks interfaces
/// with at least one associated traffic record. Interfaces in different
/// rows that share a `pos_in_row` share one front-ring slot; their anchors
/// are spread evenly across that slot's glyph width at fractions
/// `(i+1)/(n+1)`, in placement order, so no two anchors coincide and all
/// lie strictly inside the glyph span.
pub fn compute_anchors(
    sectors: &[Sector],
    placements: &[Placement],
    connected: &[bool],
    cfg: &RingConfig,
) -> Vec<Anchor> {
    let radius = cfg.front_ring_radius();
    let glyph_angle = cfg.glyph_width / radius;
    let slot = cfg.slot_angle();

    let mut anchors = Vec::new();
    for (sector_index, sector) in sectors.iter().enumerate() {
        // Group connected placements by front-ring slot, preserving
        // placement (row-major) order within each slot.
        let max_pos = placements
            .iter()
            .filter(|p| p.sector == sector_index)
            .map(|p| p.pos_in_row)
            .max();
        let Some(max_pos) = max_pos else { continue };

        for pos in 0..=max_pos {
            let members: Vec<&Placement> = placements
                .iter()
                .filter(|p| {
                    p.sector == sector_index
                        && p.pos_in_row == pos
                        && connected.get(p.iface).copied().unwrap_or(false)
                })
                .collect();
            if members.is_empty() {
                continue;
            }

            let slot_center = sector.start_angle + pos as f64 * slot + slot / 2.0;
            let glyph_start = slot_center - glyph_angle / 2.0;
            let n = members.len();
            for (i, p) in members.iter().enumerate() {
                let fraction = (i + 1) as f64 / (n + 1) as f64;
                let angle = glyph_start + fraction * glyph_angle;
                anchors.push(Anchor {
                    iface: p.iface,
                    angle,
                    radius,
                    point: Point::from_polar(angle, radius),
                });
            }
        }
    }
    anchors
}

/// Radius the canvas must accommodate so no outer row or group label is
/// clipped: the outermost label radius across all groups, plus the glyph
/// height of the outermost row, plus the safety margin.
pub fn required_canvas_radius(placements: &[Placement], cfg: &RingConfig) -> f64 {
    let max_row = placements.iter().map(|p| p.row).max().unwrap_or(0);
    let outermost = cfg.ring_radius() + max_row as f64 * cfg.row_pitch();
    outermost + cfg.glyph_height + cfg.label_offset + cfg.safety_margin
}

/// Label arc radius for one sector, just outside its outermost row.
pub fn label_radius(sector_index: usize, placements: &[Placement], cfg: &RingConfig) -> f64 {
    let max_row = placements
        .iter()
        .filter(|p| p.sector == sector_index)
        .map(|p| p.row)
        .max()
        .unwrap_or(0);
    cfg.ring_radius() + max_row as f64 * cfg.row_pitch() + cfg.glyph_height + cfg.label_offset
}
