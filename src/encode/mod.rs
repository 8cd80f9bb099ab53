// Traffic visual encoding
//
// Maps flow-record magnitudes onto stroke attributes. Width and opacity are
// relative to the largest observed traffic volume, alert coloring is binary
// on any failed connection attempt.

use crate::model::TrafficRecord;

// ── Width bands, as a percentage of the top traffic volume ─────────────────
const NARROW_BELOW_PCT: f64 = 0.1;
const WIDTH_1_BELOW_PCT: f64 = 10.0;
const WIDTH_2_BELOW_PCT: f64 = 33.0;
const WIDTH_3_BELOW_PCT: f64 = 66.0;

const OPACITY_NARROW: f64 = 0.25;
const OPACITY_BASE: f64 = 0.5;
/// Failed-attempt count at which a curve reaches full opacity.
const OPACITY_FAILED_CAP: f64 = 50.0;

/// Stroke attributes for one traffic curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveStyle {
    /// Stroke width in the 1..=4 scale.
    pub width: u8,
    /// Whiskers below the narrow threshold render dashed.
    pub dashed: bool,
    /// At least one failed connection attempt on this flow.
    pub alert: bool,
    pub opacity: f64,
}

/// Largest traffic volume across all records, floored at 1 so percentage
/// math is defined even for an all-zero snapshot.
pub fn top_traffic(records: &[TrafficRecord]) -> f64 {
    records.iter().map(|r| r.bytes).fold(1.0, f64::max)
}

/// Encode one record's magnitude relative to `top` (see [`top_traffic`]).
///
/// Bands are half-open on the upper side: a flow at exactly 10% of top
/// falls in the 2-wide band, not the 1-wide one.
pub fn encode(record: &TrafficRecord, top: f64) -> CurveStyle {
    let pct = record.bytes / top * 100.0;
    let (width, dashed) = if pct < NARROW_BELOW_PCT {
        (1, true)
    } else if pct < WIDTH_1_BELOW_PCT {
        (1, false)
    } else if pct < WIDTH_2_BELOW_PCT {
        (2, false)
    } else if pct < WIDTH_3_BELOW_PCT {
        (3, false)
    } else {
        (4, false)
    };

    let alert = record.failed > 0.0;
    // Opacity ramps with the failure count, saturating at the cap; the
    // narrow bucket overrides everything so whiskers stay faint.
    let opacity = if dashed {
        OPACITY_NARROW
    } else if record.failed >= OPACITY_FAILED_CAP {
        1.0
    } else if alert {
        OPACITY_BASE + (record.failed / OPACITY_FAILED_CAP) * OPACITY_BASE
    } else {
        OPACITY_BASE
    };

    CurveStyle {
        width,
        dashed,
        alert,
        opacity,
    }
}
