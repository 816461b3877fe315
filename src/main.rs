//! RETRIS - a classic falling-block puzzle for the terminal
//!
//! The driver owns the terminal, the clock, and the input mapping; the game
//! engine only ever sees `tick(elapsed, intent)`.

mod board;
mod game;
mod input;
mod piece;
mod score;
mod settings;
mod tetromino;
mod ui;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Game, Intent};
use input::{Command, InputMap};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

/// Target frame rate for the driving loop
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

fn main() -> io::Result<()> {
    // Log to a file; stdout belongs to the TUI
    let log_dir = std::env::temp_dir().join("retris");
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::never(&log_dir, "retris.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("retris=debug".parse().expect("valid directive")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(log = %log_dir.join("retris.log").display(), "retris starting up");

    let settings = Settings::load();

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = settings.save() {
        tracing::warn!("could not save settings: {}", e);
    }

    if let Ok(game) = &result {
        println!("Thanks for playing RETRIS!");
        println!("Final Score: {}", game.score());
        println!("Level: {} | Lines: {}", game.level(), game.lines());
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
) -> io::Result<Game> {
    let mut game = Game::new();
    let input = InputMap::from_settings(settings);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::render_game(frame, &game, settings))?;

        // Drain events until the frame deadline; intents arriving in the
        // same frame coalesce to the latest one (no queueing).
        let mut intent = Intent::None;
        let deadline = last_tick + FRAME_DURATION;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match input.map_key(&key) {
                    Some(Command::Quit) => return Ok(game),
                    Some(Command::Play(mapped)) => intent = mapped,
                    None => {}
                }
            }
            if Instant::now() >= deadline {
                break;
            }
        }

        let now = Instant::now();
        game.tick(now.duration_since(last_tick).as_secs_f64(), intent);
        last_tick = now;
    }
}
