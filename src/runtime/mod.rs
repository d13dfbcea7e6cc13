use std::path::PathBuf;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, error, info, warn};

use crate::app::Controller;
use crate::audio::{RodioEngine, Volume};
use crate::config::GroupingSetting;
use crate::library::expand_paths;
use crate::logging;

mod event_loop;
mod settings;

/// Command line arguments. Anything given here wins over the config file.
#[derive(Debug, Parser)]
#[command(name = "trackdeck", version, about)]
pub struct Args {
    /// Audio files or directories to load into the playlist.
    pub paths: Vec<PathBuf>,

    /// Connect to an http(s) audio stream instead of loading files.
    #[arg(long, value_name = "URL", conflicts_with = "paths")]
    pub stream: Option<String>,

    /// How the playlist tree is grouped on startup.
    #[arg(long, value_enum)]
    pub grouping: Option<GroupingSetting>,

    /// Starting volume, 0-100.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (settings, config_problem) = settings::load_settings();

    let _log_guard = logging::init(&settings.logging)?;
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let engine = RodioEngine::open_default(&settings.stream).inspect_err(|e| {
        error!(error = %e, "no audio output available");
    })?;

    let volume = Volume::new(args.volume.unwrap_or(settings.audio.initial_volume));
    let grouping = args.grouping.unwrap_or(settings.ui.grouping).into();
    let mut controller = Controller::new(engine, volume, grouping);

    if let Some(url) = args.stream.as_deref() {
        // Failures also end up in the status line.
        if let Err(e) = controller.connect_stream(url) {
            debug!(error = %e, "stream from the command line rejected");
        }
    } else if !args.paths.is_empty() {
        let files = expand_paths(&args.paths, &settings.library);
        if let Err(e) = controller.load_local(files) {
            warn!(error = %e, "nothing playable on the command line");
        }
    }
    info!(
        tracks = controller.playlist().len(),
        volume = volume.level(),
        "starting ui"
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&controller);
        event_loop::run(&mut terminal, &settings, &mut controller, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.stop();
    info!("shutting down");
    run_result
}
