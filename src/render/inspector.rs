// Interface inspector rendering module
//
// Renders the detail panel for the currently selected interface: identity,
// status, addresses, placement metadata, and the traffic flows touching it.

use crate::app::AppState;
use crate::model::{InterfaceKind, InterfaceStatus, TrafficRecord};
use crate::theme::{status_color, LABEL_TEXT, TRAFFIC_ALERT, TRAFFIC_NORMAL};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

/// View model for the inspector panel, extracted from AppState so rendering
/// stays a pure function of its inputs.
#[derive(Debug, Clone)]
struct InspectorView {
    title: String,
    lines: Vec<Line<'static>>,
}

pub fn render_inspector(f: &mut Frame, area: Rect, app: &AppState) {
    let view = build_view(app);
    let paragraph = Paragraph::new(view.lines)
        .block(
            Block::default()
                .title(view.title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(TRAFFIC_NORMAL)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn build_view(app: &AppState) -> InspectorView {
    let Some(iface) = app.selected_interface() else {
        return InspectorView {
            title: " Inspector ".to_string(),
            lines: vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No interface selected",
                    Style::default().fg(LABEL_TEXT),
                )),
                Line::from(Span::styled(
                    "  Use Up/Down to navigate",
                    Style::default().fg(LABEL_TEXT),
                )),
            ],
        };
    };

    let mut lines = vec![
        field("Id", &iface.id),
        field("Name", iface.display_name()),
        field("Group", &iface.group),
        field("Kind", kind_name(iface.kind)),
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(LABEL_TEXT)),
            Span::styled(
                status_name(iface.status),
                Style::default()
                    .fg(status_color(iface.status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        field("IPs", &iface.ips.join(", ")),
    ];
    if !iface.public_ips.is_empty() {
        lines.push(field("Public", &iface.public_ips.join(", ")));
    }
    if let Some(subnet) = &iface.subnet {
        lines.push(field("Subnet", subnet));
    }
    if let Some(az) = &iface.az {
        lines.push(field("AZ", az));
    }
    for (k, v) in &iface.tags {
        lines.push(field(&format!("tag:{}", k), v));
    }

    // Flows where this interface is source or destination.
    let flows: Vec<&TrafficRecord> = app
        .snapshot
        .traffic
        .iter()
        .filter(|r| r.id == iface.id || iface.owns_ip(&r.dstaddr))
        .collect();
    if !flows.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Traffic",
            Style::default()
                .fg(TRAFFIC_NORMAL)
                .add_modifier(Modifier::BOLD),
        )));
        for rec in flows.iter().take(8) {
            let color = if rec.failed > 0.0 {
                TRAFFIC_ALERT
            } else {
                LABEL_TEXT
            };
            lines.push(Line::from(Span::styled(
                format!("  {} -> {} ({:.0} B)", rec.srcaddr, rec.dstaddr, rec.bytes),
                Style::default().fg(color),
            )));
        }
        if flows.len() > 8 {
            lines.push(Line::from(Span::styled(
                format!("  ... and {} more", flows.len() - 8),
                Style::default().fg(LABEL_TEXT),
            )));
        }
    }

    InspectorView {
        title: format!(" {} ", iface.display_name()),
        lines,
    }
}

fn field(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(LABEL_TEXT)),
        Span::raw(value.to_string()),
    ])
}

fn kind_name(kind: InterfaceKind) -> &'static str {
    match kind {
        InterfaceKind::Standard => "standard",
        InterfaceKind::Endpoint => "endpoint",
        InterfaceKind::Dns => "dns",
        InterfaceKind::Igw => "igw",
        InterfaceKind::Vgw => "vgw",
        InterfaceKind::Peering => "peering",
    }
}

fn status_name(status: InterfaceStatus) -> &'static str {
    match status {
        InterfaceStatus::Good => "good",
        InterfaceStatus::Bad => "bad",
        InterfaceStatus::New => "new",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::RingConfig;
    use crate::model::{Group, Interface, Snapshot};

    fn app_with_selection() -> AppState {
        let snapshot = Snapshot {
            groups: vec![Group::new("app", "Application")],
            interfaces: vec![Interface {
                id: "eni-a".into(),
                name: "web".into(),
                group: "app".into(),
                ips: vec!["10.0.0.1".into()],
                public_ips: vec![],
                kind: InterfaceKind::Standard,
                status: Default::default(),
                created_at: None,
                subnet: Some("subnet-1".into()),
                az: None,
                tags: Default::default(),
            }],
            traffic: vec![],
        };
        let mut app = AppState::new(snapshot, None, RingConfig::default());
        app.selected = Some(0);
        app
    }

    #[test]
    fn test_view_without_selection() {
        let app = AppState::new(Snapshot::default(), None, RingConfig::default());
        let view = build_view(&app);
        assert_eq!(view.title, " Inspector ");
    }

    #[test]
    fn test_view_shows_selected_interface() {
        let view = build_view(&app_with_selection());
        assert_eq!(view.title, " web ");
        let text: String = view
            .lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.clone()))
            .collect();
        assert!(text.contains("eni-a"));
        assert!(text.contains("subnet-1"));
    }
}
