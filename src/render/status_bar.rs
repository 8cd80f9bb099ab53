// Status Bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts, the active
// grouping mode, and any reload or scene error.

use crate::app::AppState;
use crate::theme::{LABEL_TEXT, STATUS_BAD, STATUS_GOOD, TRAFFIC_NORMAL};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans = vec![
        Span::styled("Q:", Style::default().fg(STATUS_BAD).add_modifier(Modifier::BOLD)),
        Span::styled("Quit | ", Style::default().fg(LABEL_TEXT)),
        Span::styled("↑↓:", Style::default().fg(TRAFFIC_NORMAL).add_modifier(Modifier::BOLD)),
        Span::styled("Navigate | ", Style::default().fg(LABEL_TEXT)),
        Span::styled("G:", Style::default().fg(TRAFFIC_NORMAL).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("Grouping ({}) | ", app.grouping.label()),
            Style::default().fg(LABEL_TEXT),
        ),
        Span::styled("R:", Style::default().fg(TRAFFIC_NORMAL).add_modifier(Modifier::BOLD)),
        Span::styled("Reload | ", Style::default().fg(LABEL_TEXT)),
        Span::styled("+/-:", Style::default().fg(TRAFFIC_NORMAL).add_modifier(Modifier::BOLD)),
    ];

    let refresh_style = if app.refresh_config.recently_changed() {
        Style::default().fg(STATUS_GOOD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(LABEL_TEXT)
    };
    spans.push(Span::styled(
        format!("Refresh {}ms", app.refresh_config.refresh_ms),
        refresh_style,
    ));

    if let Some(err) = &app.scene_error {
        spans.push(Span::styled(
            format!("  ⚠ {}", err),
            Style::default().fg(STATUS_BAD).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(TRAFFIC_NORMAL)),
        );
    f.render_widget(paragraph, area);
}
