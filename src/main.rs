use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use terminal_worm::clock::{SystemClock, TimeSource};
use terminal_worm::config::{GameConfig, THEME_ARCADE};
use terminal_worm::error::AppError;
use terminal_worm::input::{InputEvent, InputHandler};
use terminal_worm::logging;
use terminal_worm::renderer::{grid_for_area, render};
use terminal_worm::round::RoundController;
use terminal_worm::terminal_runtime::TerminalSession;
use tracing::info;

/// Input poll timeout, which also paces frames at roughly 60 per second.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file. Defaults to the per-user config when it exists.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file (`RUST_LOG` sets the filter).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Seed for reproducible item placement.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("terminal-worm: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    logging::init(cli.log_file.as_deref())?;
    let config = GameConfig::load(cli.config.as_deref())?;
    info!(?config, seed = cli.seed, "configuration loaded");

    let mut session = TerminalSession::enter()?;
    let bounds = grid_for_area(session.area()?);
    let mut controller = match cli.seed {
        Some(seed) => RoundController::with_seed(config, bounds, seed),
        None => RoundController::new(config, bounds),
    };
    let mut input = InputHandler::new(FRAME_INTERVAL);
    let clock = SystemClock::new();

    loop {
        let bounds = grid_for_area(session.area()?);
        controller.on_viewport_changed(bounds.width, bounds.height);

        let _ = controller.pump(clock.now());

        session
            .terminal_mut()
            .draw(|frame| render(frame, &controller, &THEME_ARCADE))?;

        match input.poll_input()? {
            Some(InputEvent::Quit) => break,
            Some(InputEvent::Intent(intent)) => controller.submit(intent),
            Some(InputEvent::Resize) | None => {}
        }
    }

    info!(
        score = controller.state().score,
        status = ?controller.status(),
        "quitting"
    );
    Ok(())
}
