//! Live round: canvas arena, ammo and the reasoning overlay

use super::{centered_rect, rgb_color};
use crate::app::App;
use dose_core::config::ArenaConstants;
use dose_core::engine::{Engine, WOBBLE_AMPLITUDE};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

const STATUS_HEIGHT: u16 = 3;
const BARREL_LENGTH: f64 = 70.0;

fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(STATUS_HEIGHT), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Canvas rectangle inside the main area
pub fn canvas_area(main: Rect) -> Rect {
    split(main).1
}

/// Terminal cell to arena coordinates; `None` outside the canvas border
pub fn to_arena(area: Rect, arena: &ArenaConstants, column: u16, row: u16) -> Option<(f64, f64)> {
    let inner = Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    );
    if inner.width == 0
        || inner.height == 0
        || column < inner.x
        || row < inner.y
        || column >= inner.x + inner.width
        || row >= inner.y + inner.height
    {
        return None;
    }

    let x = ((column - inner.x) as f64 + 0.5) / inner.width as f64 * arena.width;
    let y = ((row - inner.y) as f64 + 0.5) / inner.height as f64 * arena.height;
    Some((x, y))
}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(engine) = app.engine.as_ref() else {
        return;
    };
    let (status, canvas) = split(area);

    draw_status(f, engine, status);
    draw_canvas(f, engine, canvas);

    if app.show_reasoning {
        draw_reasoning(f, app, canvas);
    }
}

fn draw_status(f: &mut Frame, engine: &Engine, area: Rect) {
    let ammo_color = if engine.ammo() == 0 {
        Color::Red
    } else {
        Color::White
    };
    let line = Line::from(vec![
        Span::styled("Ammo: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}", engine.ammo()),
            Style::default().fg(ammo_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
        Span::styled("Bacteria: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}", engine.active_target_count()),
            Style::default().fg(rgb_color(engine.config().target_color)),
        ),
        Span::raw("    "),
        Span::styled("Missed-dose toxicity: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("+{:.2}", engine.accumulated_toxicity()),
            Style::default().fg(Color::Yellow),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn draw_canvas(f: &mut Frame, engine: &Engine, area: Rect) {
    let arena = engine.arena();
    let (width, height) = (arena.width, arena.height);
    // Arena y grows downward, canvas y grows upward
    let flip = |y: f64| height - y;

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Infection Site "),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            // Kidney zone along the top edge
            ctx.draw(&CanvasLine {
                x1: 0.0,
                y1: height - 2.0,
                x2: width,
                y2: height - 2.0,
                color: Color::Red,
            });

            let target_color = rgb_color(engine.config().target_color);
            for target in engine.targets().iter().filter(|t| t.active) {
                let at = target.wobble_position(WOBBLE_AMPLITUDE);
                ctx.draw(&Circle {
                    x: at.x,
                    y: flip(at.y),
                    radius: target.radius,
                    color: target_color,
                });
                if target.hit_points > 1 {
                    ctx.draw(&Circle {
                        x: at.x,
                        y: flip(at.y),
                        radius: target.radius + 4.0,
                        color: Color::White,
                    });
                }
            }
            ctx.layer();

            for shot in shot_marks(engine) {
                ctx.draw(&shot);
            }

            for particle in engine.particles() {
                let color = if particle.life > 0.4 {
                    rgb_color(particle.color)
                } else {
                    Color::DarkGray
                };
                ctx.draw(&Points {
                    coords: &[(particle.position.x, flip(particle.position.y))],
                    color,
                });
            }

            let origin = engine.origin();
            let angle = engine.aim_angle();
            ctx.draw(&CanvasLine {
                x1: origin.x,
                y1: flip(origin.y),
                x2: origin.x + angle.cos() * BARREL_LENGTH,
                y2: flip(origin.y + angle.sin() * BARREL_LENGTH),
                color: Color::Blue,
            });
        });

    f.render_widget(canvas, area);
}

/// In-flight shots as canvas circles, y already flipped
fn shot_marks(engine: &Engine) -> Vec<Circle> {
    let height = engine.arena().height;
    let radius = engine.arena().projectile_radius;
    engine
        .projectiles()
        .iter()
        .filter(|p| p.active)
        .map(|p| Circle {
            x: p.position.x,
            y: height - p.position.y,
            radius,
            color: Color::White,
        })
        .collect()
}

fn draw_reasoning(f: &mut Frame, app: &App, area: Rect) {
    let Some(judgment) = app.judgment.as_ref() else {
        return;
    };
    let popup = centered_rect(70, 50, area);

    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(
            judgment.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(judgment.reasoning.clone()),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Attending's Reasoning "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_arena_maps_cells_inside_border() {
        let arena = ArenaConstants::default();
        let area = Rect::new(0, 0, 82, 42);

        let (x, y) = to_arena(area, &arena, 1, 1).unwrap();
        assert!((x - 5.0).abs() < 1e-9);
        assert!((y - 7.5).abs() < 1e-9);

        let (x, y) = to_arena(area, &arena, 80, 40).unwrap();
        assert!((x - 795.0).abs() < 1e-9);
        assert!((y - 592.5).abs() < 1e-9);
    }

    #[test]
    fn test_to_arena_rejects_border_cells() {
        let arena = ArenaConstants::default();
        let area = Rect::new(0, 0, 82, 42);
        assert_eq!(to_arena(area, &arena, 0, 5), None);
        assert_eq!(to_arena(area, &arena, 81, 5), None);
        assert_eq!(to_arena(area, &arena, 5, 41), None);
    }

    #[test]
    fn test_shots_drawn_at_projectile_radius() {
        use dose_core::{SimulationConfig, Rgb};

        let config = SimulationConfig {
            ammo_count: 2,
            damage_per_shot: 1,
            toxicity_per_shot: 0.0,
            target_count: 1,
            target_speed: 0.0,
            target_color: Rgb::default(),
            is_correct_drug: true,
        };
        let arena = ArenaConstants {
            projectile_radius: 7.5,
            ..ArenaConstants::default()
        };
        let mut engine = Engine::new(config, arena, 42);
        engine.start();
        assert!(shot_marks(&engine).is_empty());

        assert!(engine.fire());
        let shots = shot_marks(&engine);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].radius, 7.5);
        assert_eq!(shots[0].x, 400.0);
        assert_eq!(shots[0].y, 0.0);
    }
}
