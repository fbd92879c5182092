//! Prescription form and the analyzing overlay

use super::{centered_rect, value_line};
use crate::app::{App, RxField, Screen};
use dose_core::types::Drug;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Case
            Constraint::Length(7), // Form
            Constraint::Min(0),    // Preview
        ])
        .split(area);

    draw_case(f, app, chunks[0]);
    draw_form(f, app, chunks[1]);
    draw_preview(f, app, chunks[2]);

    if app.screen == Screen::Analyzing {
        draw_analyzing(f, app, area);
    }
}

fn draw_case(f: &mut Frame, app: &App, area: Rect) {
    let Some(disease) = app.current_disease() else {
        return;
    };

    let text = vec![
        Line::from(Span::styled(
            format!("Rx: {}", disease.name),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("\"{}\"", disease.description),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
        Line::from(vec![
            Span::styled("Suspected pathogen: ", Style::default().fg(Color::DarkGray)),
            Span::styled(disease.pathogen.clone(), Style::default().fg(Color::White)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Case "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let (dose, interval, duration) = app.draft_values();

    let lines: Vec<Line> = RxField::all()
        .iter()
        .map(|field| {
            let value = match field {
                RxField::Family => app
                    .selected_family()
                    .map(|family| family.name.clone())
                    .unwrap_or_else(|| "Select class...".to_string()),
                RxField::Drug => app
                    .selected_drug()
                    .map(|drug| drug.name.clone())
                    .unwrap_or_else(|| "Select agent...".to_string()),
                RxField::Dose => format!("{} mg", dose),
                RxField::Interval => format!("q{}h", interval),
                RxField::Duration => format!("{} days", duration),
            };

            let selected = *field == app.draft.field;
            let marker = if selected { "▶ " } else { "  " };
            let label_style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(format!("{}{:12}", marker, field.name()), label_style),
                Span::styled(format!("◀ {} ▶", value), Style::default().fg(Color::White)),
            ])
        })
        .collect();

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Prescription "));
    f.render_widget(paragraph, area);
}

fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let (total, ammo) = app.draft_preview();

    let mut lines = vec![
        value_line("Total load", format!("{:.0} mg", total), Color::White),
        value_line("Base power", format!("{} shots", ammo), Color::Green),
    ];
    if let Some(drug) = app.selected_drug() {
        lines.extend(drug_lines(drug));
    } else {
        lines.push(Line::from(Span::styled(
            "Choose a drug class and agent to prescribe",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Preview "));
    f.render_widget(paragraph, area);
}

/// Catalog ratings of the chosen agent
fn drug_lines(drug: &Drug) -> Vec<Line<'static>> {
    let toxicity_color = if drug.nephrotoxicity >= 7 {
        Color::Red
    } else if drug.nephrotoxicity >= 4 {
        Color::Yellow
    } else {
        Color::Green
    };
    vec![
        value_line(
            "Nephrotoxicity",
            format!("{}/10", drug.nephrotoxicity),
            toxicity_color,
        ),
        value_line("Potency", format!("{}", drug.base_damage), Color::Cyan),
        value_line("Resistance cost", format!("{}", drug.cost), Color::Magenta),
    ]
}

fn draw_analyzing(f: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(50, 30, area);
    let frame = (app.analyzing_time * 8.0) as usize % SPINNER.len();

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Consulting attending physician...", SPINNER[frame]),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{:.1}s", app.analyzing_time),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" Analyzing "));

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
