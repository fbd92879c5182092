//! Case selection grouped by textbook section

use crate::app::{App, ChapterRow};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let rows = app.chapter_rows();

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| match *row {
            ChapterRow::Section(index) => {
                let section = &app.catalog.sections[index];
                let marker = if app.expanded_section == Some(index) {
                    "▾"
                } else {
                    "▸"
                };
                ListItem::new(Line::from(Span::styled(
                    format!("{} {}", marker, section.title),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )))
            }
            ChapterRow::Case(index) => {
                let disease = &app.catalog.diseases[index];
                let chapter = app
                    .catalog
                    .chapter(&disease.chapter_id)
                    .map(|c| c.title.as_str())
                    .unwrap_or("");
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("    {}", disease.name),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        format!("  ({})", chapter),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Textbook Chapters "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.chapter_cursor.min(rows.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}
