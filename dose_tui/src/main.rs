//! dose_tui - Terminal front end for Dose Defender

mod app;
mod ui;

use app::{provider_from_environment, App, Screen};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dose_core::config::{default_catalog, load_catalog, load_tuning, ConfigError};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "dose_defender.log";
const FRAME_TIME: Duration = Duration::from_millis(16);

#[derive(Error, Debug)]
enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn init_logging() -> Result<(), AppError> {
    let file = File::create(LOG_FILE)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn build_app() -> Result<App, AppError> {
    let tuning_path = std::env::var("DOSE_TUNING").unwrap_or_else(|_| "tuning.toml".to_string());
    let tuning = load_tuning(&PathBuf::from(tuning_path))?;

    let catalog = match std::env::var("DOSE_CATALOG") {
        Ok(path) => load_catalog(&PathBuf::from(path))?,
        Err(_) => default_catalog(),
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    info!(
        cases = catalog.diseases.len(),
        drugs = catalog.families.iter().map(|f| f.drugs.len()).sum::<usize>(),
        "catalog loaded"
    );
    Ok(App::new(catalog, tuning, provider_from_environment(), seed))
}

fn main() -> Result<(), AppError> {
    init_logging()?;
    let mut app = build_app()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), AppError> {
    let mut last_frame = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = FRAME_TIME.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match (key.code, key.modifiers) {
                        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                            break
                        }
                        (KeyCode::Esc, _) | (KeyCode::Char('h'), _) => app.on_escape(),
                        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.on_up(),
                        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.on_down(),
                        (KeyCode::Left, _) => app.on_left(),
                        (KeyCode::Right, _) => app.on_right(),
                        (KeyCode::Enter, _) => app.on_enter(),
                        (KeyCode::Char(' '), _) => app.on_space(),
                        (KeyCode::Char('r'), _) => app.toggle_reasoning(),
                        _ => {}
                    }
                }
                Event::Mouse(mouse) if app.screen == Screen::Playing => {
                    let size = terminal.size()?;
                    let area = ui::arena_area(Rect::new(0, 0, size.width, size.height));
                    let point = ui::arena_view::to_arena(area, &app.tuning.arena, mouse.column, mouse.row);
                    if let Some((x, y)) = point {
                        match mouse.kind {
                            MouseEventKind::Moved | MouseEventKind::Drag(_) => app.aim_at(x, y),
                            MouseEventKind::Down(MouseButton::Left) => {
                                app.aim_at(x, y);
                                app.fire();
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;
        app.tick(dt);
    }

    info!("session ended");
    Ok(())
}
