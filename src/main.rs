//! Terminal Tetris runner (default binary).
//!
//! Reads keys with crossterm, feeds them through the dispatcher together with
//! the fall timer, and redraws after every pass.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tetris_cli::config::Args;
use tetris_cli::core::GameSession;
use tetris_cli::engine::{Dispatcher, FallTimer, Flow};
use tetris_cli::input::map_key;
use tetris_cli::term::{GameView, Renderer, TerminalRenderer};

/// Upper bound on a single input wait, so resizes are picked up while idle.
const MAX_POLL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut term = TerminalRenderer::new(GameView::new().monochrome(args.mono));
    term.enter()?;

    let result = run(&mut term, &args);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Stdout belongs to the renderer, so logs only go to an explicit file.
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

fn run(term: &mut TerminalRenderer, args: &Args) -> Result<()> {
    let seed = args.resolve_seed();
    info!(seed, fall_ms = args.fall_ms, "starting session");

    let mut dispatcher = Dispatcher::new(
        GameSession::new(seed),
        FallTimer::new(args.fall_interval()),
    );
    dispatcher.start(Instant::now());

    loop {
        term.render(&dispatcher.snapshot())?;

        // Input with timeout until the next fall.
        let timeout = dispatcher
            .timer()
            .time_until_due(Instant::now())
            .map_or(MAX_POLL, |d| d.min(MAX_POLL));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = map_key(key) {
                        dispatcher.push_command(command);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if dispatcher.dispatch(Instant::now()) == Flow::Quit {
            info!(score = dispatcher.session().score(), "quit");
            return Ok(());
        }
    }
}
