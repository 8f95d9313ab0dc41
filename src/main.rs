//! Gloomcrawl - Entry Point
//!
//! Initializes logging, the scripting layer and the terminal, then feeds
//! key presses and clock ticks into the state machine until the game stops.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event as TermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use gloomcrawl::config::GameConfig;
use gloomcrawl::game::{Event, Game, StateMachine, TickClock};
use gloomcrawl::scripting::lua::GAME_SCRIPT;
use gloomcrawl::scripting::LuaScripts;
use gloomcrawl::ui::{map_key, App, Palette};

const LOG_FILE: &str = "gloomcrawl.log";

/// Command-line switches
#[derive(Parser, Debug)]
#[command(name = "gloomcrawl", version)]
#[command(about = "A script-driven, turn-based terminal dungeon crawler")]
struct Args {
    /// Extra diagnostics in the message log
    #[arg(short, long)]
    debug: bool,

    /// Path to a RON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging() {
    let target: Box<dyn io::Write + Send> = match OpenOptions::new().create(true).write(true).truncate(true).open(LOG_FILE) {
        Ok(file) => Box::new(file),
        Err(_) => Box::new(io::sink()),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(target))
        .init();
}

fn main() -> Result<()> {
    // Log to a file so output does not fight the TUI
    init_logging();
    log::info!("Starting Gloomcrawl v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = GameConfig::discover(args.config.as_deref());
    config.debug |= args.debug;

    if !config.scripts_dir.join(GAME_SCRIPT).exists() {
        bail!("{} not found in {}", GAME_SCRIPT, config.scripts_dir.display());
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    let scripts = LuaScripts::new(config.scripts_dir.clone(), seed).context("failed to start the Lua runtime")?;
    let mut game = Game::new(config, Box::new(scripts));
    let app = App::new(Palette::from_theme(&game.scripts().theme()));
    let mut machine = StateMachine::new(&game);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_game_loop(&mut terminal, &app, &mut game, &mut machine);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("Game exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Gloomcrawl shut down cleanly");
    result
}

/// Main game loop
fn run_game_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &App,
    game: &mut Game,
    machine: &mut StateMachine,
) -> Result<()> {
    let mut clock = TickClock::new(std::time::Duration::from_millis(game.config.tick_ms));
    let mut last_frame = Instant::now();

    while game.is_running() {
        terminal.draw(|frame| app.render(frame, game, machine))?;

        // Wait for input, but no longer than the next tick
        if event::poll(clock.until_next())? {
            if let TermEvent::Key(key) = event::read()? {
                // Only handle key press events, not releases
                if key.kind == KeyEventKind::Press {
                    if let Some(key) = map_key(key) {
                        machine.handle_event(game, Event::Key(key));
                    }
                }
            }
        }

        let now = Instant::now();
        let due = clock.update(now.duration_since(last_frame));
        last_frame = now;
        for _ in 0..due {
            if !game.is_running() {
                break;
            }
            machine.handle_event(game, Event::Tick);
        }
    }

    log::info!("Session lasted {} ticks", clock.ticks());
    Ok(())
}
