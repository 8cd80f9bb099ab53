// Diagram canvas rendering
//
// Projects the backend-neutral scene onto a ratatui Braille canvas. The
// scene lives in a y-down center-origin frame; the canvas is y-up, so every
// point is flipped on the way in. Curve width and opacity have no direct
// terminal equivalent: width becomes parallel stroke passes, opacity is
// pre-baked into the stroke color by the theme.

use super::DiagramBackend;
use crate::app::AppState;
use crate::layout::geometry::{Point, QuadCurve};
use crate::scene::Scene;
use crate::theme::{
    curve_color, status_color, LABEL_TEXT, RING_GRAY, STATUS_BAD, STATUS_NEW, TRAFFIC_NORMAL,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, BorderType, Borders, Paragraph,
    },
    Frame,
};

/// Segments sampled per quadratic curve.
const CURVE_SAMPLES: usize = 24;

/// Arc samples per glyph edge.
const GLYPH_ARC_SAMPLES: usize = 6;

/// Dash pattern period in curve segments: 2 on, 2 off.
const DASH_PERIOD: usize = 4;
const DASH_ON: usize = 2;

/// Perpendicular spacing between parallel passes emulating stroke width.
const WIDTH_PASS_OFFSET: f64 = 1.2;

/// Tangential half-length of a front-ring marker tick.
const MARKER_HALF_LEN: f64 = 3.0;

pub fn render_diagram(f: &mut Frame, area: Rect, app: &mut AppState) {
    let title = match &app.scene_error {
        Some(_) => " VPC Map (stale) ".to_string(),
        None => format!(" VPC Map [{}] ", app.grouping.label()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(TRAFFIC_NORMAL));

    let Some(scene) = app.scene.clone() else {
        // Error placeholder: no geometry to show.
        let message = match &app.scene_error {
            Some(err) => format!("\n\ncannot render snapshot\n\n{}", err),
            None => "\n\nno data".to_string(),
        };
        let placeholder = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(STATUS_BAD))
            .block(block);
        f.render_widget(placeholder, area);
        return;
    };

    // Terminal cells are roughly twice as tall as wide; widen or heighten
    // the bounds so the ring stays circular instead of collapsing into an
    // ellipse.
    let r = scene.canvas_radius;
    let cell_aspect = if area.height > 0 {
        area.width as f64 / (area.height as f64 * 2.0)
    } else {
        1.0
    };
    let (x_bound, y_bound) = if cell_aspect >= 1.0 {
        (r * cell_aspect, r)
    } else {
        (r, r / cell_aspect)
    };

    let selected = app.selected;
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-x_bound, x_bound])
        .y_bounds([-y_bound, y_bound])
        .paint(move |ctx| {
            CanvasBackend { ctx }.draw_scene(&scene, selected);
        });

    f.render_widget(canvas, area);
}

/// Flip a scene point into the canvas frame.
fn to_canvas(p: Point) -> (f64, f64) {
    (p.x, -p.y)
}

/// `DiagramBackend` over a ratatui canvas context.
struct CanvasBackend<'a, 'b> {
    ctx: &'a mut Context<'b>,
}

impl DiagramBackend for CanvasBackend<'_, '_> {
    fn draw_scene(&mut self, scene: &Scene, selected: Option<usize>) {
        // Curves first, glyphs and labels on top.
        for curve in &scene.curves {
            self.stroke_curve(
                &curve.curve,
                curve_color(&curve.style),
                curve.style.width,
                curve.style.dashed,
            );
        }

        for marker in &scene.markers {
            let center = Point::from_polar(marker.angle, marker.radius);
            // Short tangential tick.
            let tangent = Point::new(-marker.angle.sin(), marker.angle.cos());
            let a = to_canvas(center.add(tangent.scale(-MARKER_HALF_LEN)));
            let b = to_canvas(center.add(tangent.scale(MARKER_HALF_LEN)));
            self.segment(a, b, RING_GRAY);
        }

        for glyph in &scene.glyphs {
            let color = if selected == Some(glyph.iface) {
                STATUS_NEW
            } else {
                status_color(glyph.status)
            };
            self.stroke_polygon(&glyph.outline.to_polygon(GLYPH_ARC_SAMPLES), color);
        }

        // Selected interface gets its name printed at the glyph center.
        if let Some(sel) = selected {
            if let Some(glyph) = scene.glyphs.iter().find(|g| g.iface == sel) {
                let mid_radius = (glyph.outline.radius_inner + glyph.outline.radius_outer) / 2.0;
                let (x, y) = to_canvas(Point::from_polar(glyph.outline.center_angle, mid_radius));
                self.ctx.print(
                    x,
                    y,
                    Span::styled(glyph.label.clone(), Style::default().fg(STATUS_NEW)),
                );
            }
        }

        for label in &scene.labels {
            let (x, y) = to_canvas(Point::from_polar(label.mid_angle, label.radius));
            self.ctx.print(
                x,
                y,
                Span::styled(label.text.clone(), Style::default().fg(LABEL_TEXT)),
            );
        }
    }
}

impl CanvasBackend<'_, '_> {
    /// Sample a quadratic curve into line segments, with optional dashing
    /// and width emulated by parallel passes.
    fn stroke_curve(&mut self, curve: &QuadCurve, color: Color, width: u8, dashed: bool) {
        for pass in 0..width.max(1) {
            // Passes fan out symmetrically around the true curve.
            let offset = (pass as f64 - (width.saturating_sub(1)) as f64 / 2.0) * WIDTH_PASS_OFFSET;
            let mut prev: Option<(f64, f64)> = None;
            for i in 0..=CURVE_SAMPLES {
                let t = i as f64 / CURVE_SAMPLES as f64;
                let p = offset_point(curve, t, offset);
                let here = to_canvas(p);
                if let Some(last) = prev {
                    let visible = !dashed || (i - 1) % DASH_PERIOD < DASH_ON;
                    if visible {
                        self.segment(last, here, color);
                    }
                }
                prev = Some(here);
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[Point], color: Color) {
        for window in points.windows(2) {
            self.segment(to_canvas(window[0]), to_canvas(window[1]), color);
        }
        if points.len() > 2 {
            if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
                self.segment(to_canvas(last), to_canvas(first), color);
            }
        }
    }

    fn segment(&mut self, a: (f64, f64), b: (f64, f64), color: Color) {
        self.ctx.draw(&CanvasLine {
            x1: a.0,
            y1: a.1,
            x2: b.0,
            y2: b.1,
            color,
        });
    }
}

/// Point on the curve displaced perpendicular to its tangent.
fn offset_point(curve: &QuadCurve, t: f64, offset: f64) -> Point {
    let p = curve.point_at(t);
    if offset == 0.0 {
        return p;
    }
    let dt = 1e-3;
    let ahead = curve.point_at((t + dt).min(1.0));
    let behind = curve.point_at((t - dt).max(0.0));
    let dx = ahead.x - behind.x;
    let dy = ahead.y - behind.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < f64::EPSILON {
        return p;
    }
    Point::new(p.x - dy / len * offset, p.y + dx / len * offset)
}
