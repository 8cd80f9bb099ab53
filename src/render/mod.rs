// UI rendering module
//
// This module contains all terminal rendering components for vpcmap.
// The main draw() function orchestrates rendering of the diagram canvas,
// the interface inspector, and the status bar.

mod diagram;
mod inspector;
mod status_bar;

use crate::app::AppState;
use crate::scene::Scene;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

/// A drawing surface that can paint a scene. The shipped implementation
/// projects onto a ratatui Braille canvas; anything that can stroke line
/// segments and place text can implement this instead.
pub trait DiagramBackend {
    fn draw_scene(&mut self, scene: &Scene, selected: Option<usize>);
}

use diagram::render_diagram;
use inspector::render_inspector;
use status_bar::render_status_bar;

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let size = f.area();

    // Main layout: body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    // Body: diagram canvas + inspector
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(72), // Diagram
            Constraint::Percentage(28), // Inspector
        ])
        .split(chunks[0]);

    render_diagram(f, body_chunks[0], app);
    render_inspector(f, body_chunks[1], app);

    render_status_bar(f, chunks[1], app);
}
