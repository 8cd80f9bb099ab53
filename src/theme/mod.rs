// Theme module - Color constants and palette functions
//
// Provides the color palette for the diagram: interface status colors,
// traffic-curve colors, and the neutral chrome used for the front ring and
// group labels.

use ratatui::style::Color;

use crate::encode::CurveStyle;
use crate::model::InterfaceStatus;

// Core palette

/// Healthy interfaces.
/// RGB: (158, 206, 106)
pub const STATUS_GOOD: Color = Color::Rgb(158, 206, 106);

/// Interfaces with failed connection attempts.
/// RGB: (247, 118, 142)
pub const STATUS_BAD: Color = Color::Rgb(247, 118, 142);

/// Recently created interfaces.
/// RGB: (125, 207, 255)
pub const STATUS_NEW: Color = Color::Rgb(125, 207, 255);

/// Front-ring markers and anchor chrome.
/// RGB: (86, 95, 137)
pub const RING_GRAY: Color = Color::Rgb(86, 95, 137);

/// Normal traffic curves.
/// RGB: (187, 154, 247)
pub const TRAFFIC_NORMAL: Color = Color::Rgb(187, 154, 247);

/// Traffic curves carrying failed connection attempts.
/// RGB: (255, 158, 100)
pub const TRAFFIC_ALERT: Color = Color::Rgb(255, 158, 100);

/// Group labels and general text.
/// RGB: (169, 177, 214)
pub const LABEL_TEXT: Color = Color::Rgb(169, 177, 214);

/// Canvas background, also the fade target for translucent strokes.
pub const BACKGROUND: (u8, u8, u8) = (26, 27, 38);

/// Glyph fill color for an interface status.
pub fn status_color(status: InterfaceStatus) -> Color {
    match status {
        InterfaceStatus::Good => STATUS_GOOD,
        InterfaceStatus::Bad => STATUS_BAD,
        InterfaceStatus::New => STATUS_NEW,
    }
}

/// Stroke color for a traffic curve, with its opacity baked in.
///
/// Terminal cells have no alpha channel, so opacity is emulated by fading
/// the stroke color toward the background.
pub fn curve_color(style: &CurveStyle) -> Color {
    let base = if style.alert { TRAFFIC_ALERT } else { TRAFFIC_NORMAL };
    fade(base, style.opacity)
}

/// Interpolate between two RGB colors based on a ratio (0.0 ~ 1.0).
pub fn interpolate_color(color1: (u8, u8, u8), color2: (u8, u8, u8), ratio: f32) -> Color {
    let ratio = ratio.clamp(0.0, 1.0);
    let r = (color1.0 as f32 + (color2.0 as f32 - color1.0 as f32) * ratio) as u8;
    let g = (color1.1 as f32 + (color2.1 as f32 - color1.1 as f32) * ratio) as u8;
    let b = (color1.2 as f32 + (color2.2 as f32 - color1.2 as f32) * ratio) as u8;
    Color::Rgb(r, g, b)
}

/// Fade a color toward the background. `opacity` 1.0 leaves it unchanged,
/// 0.0 dissolves it entirely.
pub fn fade(color: Color, opacity: f64) -> Color {
    let Color::Rgb(r, g, b) = color else {
        return color;
    };
    interpolate_color(BACKGROUND, (r, g, b), opacity as f32)
}
