//! Patient vitals panel

use super::{progress_bar, value_line};
use crate::app::{App, Screen};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Systolic shown as a full bar
const PRESSURE_SCALE: f64 = 140.0;
/// Creatinine shown as a full bar
const KIDNEY_SCALE: f64 = 3.0;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Vitals ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // BP
            Constraint::Length(1), // BP bar
            Constraint::Length(1), // Creatinine
            Constraint::Length(1), // Creatinine bar
            Constraint::Length(3), // Resistance / warnings
            Constraint::Min(0),    // Judgment
        ])
        .split(inner);

    let vitals = &app.vitals;
    let pressure_color = if vitals.pressure_warning() {
        Color::Red
    } else {
        Color::Green
    };
    let kidney_color = if vitals.kidney_warning() {
        Color::Red
    } else {
        Color::Yellow
    };

    f.render_widget(
        Paragraph::new(value_line(
            "BP",
            format!(
                "{:.0}/{:.0}",
                vitals.systolic_pressure(),
                vitals.diastolic_pressure()
            ),
            pressure_color,
        )),
        chunks[0],
    );
    f.render_widget(
        progress_bar(
            vitals.systolic_pressure(),
            PRESSURE_SCALE,
            chunks[1].width,
            pressure_color,
        ),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(value_line(
            "Creatinine",
            format!("{:.2} mg/dL", vitals.displayed_kidney_marker()),
            kidney_color,
        )),
        chunks[2],
    );
    f.render_widget(
        progress_bar(
            vitals.displayed_kidney_marker(),
            KIDNEY_SCALE,
            chunks[3].width,
            kidney_color,
        ),
        chunks[3],
    );

    let mut status = vec![value_line(
        "Resistance",
        format!("{:.0}", vitals.resistance_score()),
        Color::Magenta,
    )];
    if vitals.pressure_warning() {
        status.push(Line::from(Span::styled(
            "! Hypotension",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }
    if vitals.kidney_warning() {
        status.push(Line::from(Span::styled(
            "! Kidney injury",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }
    f.render_widget(Paragraph::new(status), chunks[4]);

    if app.screen != Screen::Playing {
        return;
    }
    let Some(judgment) = app.judgment.as_ref() else {
        return;
    };
    let verdict_color = if judgment.approved {
        Color::Green
    } else {
        Color::Red
    };
    let lines = vec![
        Line::from(Span::styled(
            judgment.title.clone(),
            Style::default()
                .fg(verdict_color)
                .add_modifier(Modifier::BOLD),
        )),
        value_line(
            "Efficacy",
            format!("{:.0}", judgment.efficacy_score),
            Color::White,
        ),
        value_line("Safety", format!("{:.0}", judgment.safety_score), Color::White),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[5]);
}
