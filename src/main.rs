//! Letter Cascade terminal runner (default binary).
//!
//! Keys and mouse clicks are read with crossterm and handed to the engine,
//! which advances once per `TICK_MS`. `--headless` plays an unattended game
//! with the headless renderer and logs the result instead.

use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use letter_cascade::core::{install_panic_hook, Dictionary};
use letter_cascade::engine::{EngineConfig, GameApp};
use letter_cascade::input::{handle_key_event, history_step, should_quit, HistoryStep};
use letter_cascade::term::{create_renderer, GameView, RendererMode, Viewport};
use letter_cascade::types::{GameCommand, GameStatus, TICK_MS};

/// Frame budget for an unattended `--headless` game.
const HEADLESS_MAX_FRAMES: u32 = 100_000;
/// Frames between hard drops while playing unattended.
const HEADLESS_DROP_EVERY: u32 = 20;

fn main() -> Result<()> {
    let _guard = setup_logging()?;
    install_panic_hook();

    let mode = if env::args().skip(1).any(|arg| arg == "--headless") {
        RendererMode::Headless
    } else {
        RendererMode::Terminal
    };
    let config = EngineConfig::from_env();
    info!(?config, mode = mode.as_str(), "starting letter-cascade");

    let mut app =
        GameApp::new(config, Dictionary::builtin())?.with_renderer(create_renderer(mode))?;

    let result = match mode {
        RendererMode::Terminal => run(&mut app),
        RendererMode::Headless => run_headless(&mut app),
    };

    // Always tear down the renderer so the terminal is restored.
    let engine = app.shutdown();
    let stats = engine.store().stats();
    info!(
        score = stats.score,
        level = stats.level,
        words = stats.words_completed,
        max_combo = stats.max_combo,
        "session finished"
    );
    result
}

fn run(app: &mut GameApp) -> Result<()> {
    let view = GameView::default();
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut viewport = Viewport::new(w, h);

    let tick_duration = Duration::from_millis(u64::from(TICK_MS));
    let mut last_tick = Instant::now();

    loop {
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            let engine = app.engine_mut();
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    match history_step(key) {
                        Some(HistoryStep::Undo) => {
                            engine.undo();
                        }
                        Some(HistoryStep::Redo) => {
                            engine.redo();
                        }
                        None => {
                            if let Some(command) = handle_key_event(key) {
                                engine.send(command);
                            }
                        }
                    }
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let grid = &engine.state().grid;
                    if let Some(col) = view.column_at(grid, viewport, mouse.column, mouse.row) {
                        engine.click(col);
                    }
                }
                Event::Resize(width, height) => {
                    viewport = Viewport::new(width, height);
                    engine.resize(width, height);
                }
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
            app.frame(elapsed_ms);
        }
    }
}

/// Play without a terminal: start, hard-drop on a fixed cadence, stop at
/// game over or when the frame budget runs out.
fn run_headless(app: &mut GameApp) -> Result<()> {
    app.engine_mut().send(GameCommand::Start);

    for frame in 1..=HEADLESS_MAX_FRAMES {
        app.frame(TICK_MS);
        let engine = app.engine_mut();
        if engine.status() == GameStatus::GameOver {
            info!(frame, "headless game over");
            return Ok(());
        }
        if frame % HEADLESS_DROP_EVERY == 0 && engine.state().falling_letter.is_some() {
            engine.send(GameCommand::Drop);
        }
    }

    info!(frames = HEADLESS_MAX_FRAMES, "headless frame budget exhausted");
    Ok(())
}

/// Log to a file, never to the terminal the game draws on.
///
/// Directory from `LETTER_CASCADE_LOG_DIR` (default: the system temp dir);
/// filter from `RUST_LOG` (default: `info`).
fn setup_logging() -> Result<WorkerGuard> {
    let log_dir = env::var_os("LETTER_CASCADE_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "letter-cascade.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    info!(log_dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}
