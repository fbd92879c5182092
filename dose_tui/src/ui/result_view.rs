//! Round verdict and game over screens

use super::{centered_rect, value_line};
use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(outcome) = app.outcome.as_ref() else {
        return;
    };

    let (headline, color) = if outcome.success {
        ("Treatment Successful", Color::Green)
    } else {
        ("Treatment Failed", Color::Red)
    };
    let delta = &outcome.vitals_delta;

    let mut lines = vec![
        Line::from(Span::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            outcome.message.clone(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Attending's note",
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            outcome.reasoning.clone(),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        value_line("BP drop", format!("-{:.0} mmHg", delta.pressure_drop), Color::Red),
        value_line(
            "Creatinine",
            format!("+{:.2} mg/dL", delta.kidney_rise),
            Color::Yellow,
        ),
    ];
    if delta.resistance_rise > 0.0 {
        lines.push(value_line(
            "Resistance",
            format!("+{:.0}", delta.resistance_rise),
            Color::Magenta,
        ));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Round Result "));
    f.render_widget(paragraph, centered_rect(80, 80, area));
}

pub fn draw_game_over(f: &mut Frame, app: &App, area: Rect) {
    let cause = app
        .vitals
        .game_over_cause()
        .map(|cause| cause.to_string())
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "PATIENT LOST",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Cause: {}", cause),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(format!("Reached level {}", app.vitals.level())),
    ];
    if let Some(outcome) = app.outcome.as_ref() {
        lines.push(Line::from(Span::styled(
            format!("Last round: {}", outcome.message),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Game Over "));
    f.render_widget(paragraph, centered_rect(60, 50, area));
}
