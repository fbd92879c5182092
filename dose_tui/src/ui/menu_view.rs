//! Title menu

use crate::app::{App, MenuItem};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Title
            Constraint::Length(7), // Menu
            Constraint::Min(0),    // Info
        ])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "DOSE DEFENDER",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Antimicrobial Stewardship Arcade",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = MenuItem::all()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.menu_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(format!("  {}  ", item.label()), style)))
        })
        .collect();

    let menu = List::new(items).block(Block::default().borders(Borders::ALL).title(" Start "));
    f.render_widget(menu, chunks[1]);

    let info = Paragraph::new(vec![
        Line::from(format!(
            "{} cases across {} textbook sections",
            app.catalog.diseases.len(),
            app.catalog.sections.len()
        )),
        Line::from(Span::styled(
            format!("Clinical review: {}", app.provider_name()),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(info, chunks[2]);
}
