//! UI rendering

pub mod arena_view;
mod chapter_view;
mod menu_view;
mod prescription_view;
mod result_view;
mod vitals_view;

use crate::app::{App, Screen};
use dose_core::types::Rgb;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

struct ScreenLayout {
    header: Rect,
    main: Rect,
    sidebar: Option<Rect>,
    footer: Rect,
}

fn has_sidebar(screen: Screen) -> bool {
    !matches!(
        screen,
        Screen::Menu | Screen::ChapterSelect | Screen::GameOver
    )
}

fn screen_layout(area: Rect, sidebar: bool) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Keybindings footer
        ])
        .split(area);

    if !sidebar {
        return ScreenLayout {
            header: rows[0],
            main: rows[1],
            sidebar: None,
            footer: rows[2],
        };
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(rows[1]);

    ScreenLayout {
        header: rows[0],
        main: columns[0],
        sidebar: Some(columns[1]),
        footer: rows[2],
    }
}

/// Where the arena canvas lands for a terminal of this size
pub fn arena_area(area: Rect) -> Rect {
    arena_view::canvas_area(screen_layout(area, true).main)
}

pub fn draw(f: &mut Frame, app: &App) {
    let layout = screen_layout(f.area(), has_sidebar(app.screen));

    draw_header(f, app, layout.header);

    match app.screen {
        Screen::Menu => menu_view::draw(f, app, layout.main),
        Screen::ChapterSelect => chapter_view::draw(f, app, layout.main),
        Screen::Prescription | Screen::Analyzing => prescription_view::draw(f, app, layout.main),
        Screen::Playing => arena_view::draw(f, app, layout.main),
        Screen::RoundResult => result_view::draw(f, app, layout.main),
        Screen::GameOver => result_view::draw_game_over(f, app, layout.main),
    }

    if let Some(sidebar) = layout.sidebar {
        vitals_view::draw(f, app, sidebar);
    }

    draw_keybindings(f, app, layout.footer);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            app.screen.name(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if app.screen != Screen::Menu {
        spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("Level {}", app.vitals.level()),
            Style::default().fg(Color::White),
        ));
        if let Some(disease) = app.current_disease() {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                disease.name.clone(),
                Style::default().fg(Color::Cyan),
            ));
        }
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Dose Defender "),
    );
    f.render_widget(header, area);
}

fn draw_keybindings(f: &mut Frame, app: &App, area: Rect) {
    let common_keys = vec![("Esc", "Home"), ("q", "Quit")];

    let screen_keys: Vec<(&str, &str)> = match app.screen {
        Screen::Menu => vec![("↑/↓", "Choose"), ("Enter", "Select")],
        Screen::ChapterSelect => vec![("↑/↓", "Move"), ("Enter", "Expand / Play")],
        Screen::Prescription => vec![
            ("↑/↓", "Field"),
            ("←/→", "Change"),
            ("Enter", "Prescribe"),
        ],
        Screen::Analyzing => vec![],
        Screen::Playing => vec![
            ("Mouse", "Aim"),
            ("←/→", "Turn"),
            ("Space/Click", "Fire"),
            ("r", "Reasoning"),
        ],
        Screen::RoundResult => vec![("Enter", "Next case")],
        Screen::GameOver => vec![("Enter", "Restart")],
    };

    let mut spans: Vec<Span> = Vec::new();

    for (i, (key, desc)) in screen_keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", desc),
            Style::default().fg(Color::White),
        ));
    }

    if !screen_keys.is_empty() {
        spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
    }

    for (i, (key, desc)) in common_keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::styled(
            format!(" {}", desc),
            Style::default().fg(Color::Gray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Keys "))
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

pub fn rgb_color(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

pub fn progress_bar(current: f64, max: f64, width: u16, filled_color: Color) -> Paragraph<'static> {
    let percent = if max > 0.0 {
        (current / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (percent * width as f64) as usize;
    let empty = (width as usize).saturating_sub(filled);

    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(empty));

    Paragraph::new(bar).style(Style::default().fg(filled_color))
}

pub fn value_line(name: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:16}", name), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

/// Rectangle of the given percentage size centered in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
