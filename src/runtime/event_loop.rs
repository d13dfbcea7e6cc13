use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::Controller;
use crate::audio::PlaybackEngine;
use crate::config;
use crate::library::expand_paths;
use crate::ui::{self, Prompt, PromptKind};

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Highlighted row of the playlist tree.
    pub cursor: usize,
    /// Text prompt being typed into, if any.
    pub prompt: Option<Prompt>,
    last_tick: Instant,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` with the cursor on the current track.
    pub fn new<E: PlaybackEngine>(controller: &Controller<E>) -> Self {
        let mut state = Self {
            cursor: 0,
            prompt: None,
            last_tick: Instant::now(),
        };
        state.follow_current(controller);
        state
    }

    fn follow_current<E: PlaybackEngine>(&mut self, controller: &Controller<E>) {
        self.cursor = controller
            .current()
            .and_then(|i| controller.view().row_of(i))
            .unwrap_or(0);
    }

    fn move_cursor(&mut self, delta: isize, rows: usize) {
        let last = rows.saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }
}

/// Main terminal event loop: handles input, ticks the controller and draws.
/// Returns `Ok(())` when shutdown is requested.
pub fn run<E: PlaybackEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut Controller<E>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_every = Duration::from_millis(settings.audio.tick_ms);

    loop {
        if state.last_tick.elapsed() >= tick_every {
            controller.tick();
            state.last_tick = Instant::now();
        }

        terminal.draw(|f| {
            ui::draw(
                f,
                controller,
                state.cursor,
                state.prompt.as_ref(),
                &settings.ui,
                &settings.controls,
            )
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, controller, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the user asked to quit.
///
/// Controller errors are already reflected in its status line, so they are
/// only logged here.
fn handle_key_event<E: PlaybackEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    controller: &mut Controller<E>,
    state: &mut EventLoopState,
) -> bool {
    if state.prompt.is_some() {
        handle_prompt_key(key, settings, controller, state);
        return false;
    }

    let rows = controller.view().rows().len();
    let seek_step = f64::from(settings.controls.seek_step_percent) / 100.0;
    let volume_step = i16::from(settings.controls.volume_step);

    let result = match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            state.move_cursor(1, rows);
            Ok(())
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.move_cursor(-1, rows);
            Ok(())
        }
        KeyCode::Enter => controller.select_row(state.cursor),
        KeyCode::Char(' ') | KeyCode::Char('p') => controller.play(),
        KeyCode::Char('s') => {
            controller.stop();
            Ok(())
        }
        KeyCode::Char('n') | KeyCode::Char('l') => {
            let result = controller.next();
            state.follow_current(controller);
            result
        }
        KeyCode::Char('b') | KeyCode::Char('h') => {
            let result = controller.previous();
            state.follow_current(controller);
            result
        }
        KeyCode::Char('L') => {
            controller.seek_by(seek_step);
            Ok(())
        }
        KeyCode::Char('H') => {
            controller.seek_by(-seek_step);
            Ok(())
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            controller.adjust_volume(volume_step);
            Ok(())
        }
        KeyCode::Char('-') => {
            controller.adjust_volume(-volume_step);
            Ok(())
        }
        KeyCode::Char('g') => {
            controller.cycle_grouping();
            state.follow_current(controller);
            Ok(())
        }
        KeyCode::Char('o') => {
            state.prompt = Some(Prompt::new(PromptKind::OpenPath));
            Ok(())
        }
        KeyCode::Char('u') => {
            state.prompt = Some(Prompt::new(PromptKind::StreamUrl));
            Ok(())
        }
        _ => Ok(()),
    };

    if let Err(e) = result {
        debug!(error = %e, "key action failed");
    }
    false
}

fn handle_prompt_key<E: PlaybackEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    controller: &mut Controller<E>,
    state: &mut EventLoopState,
) {
    let Some(prompt) = state.prompt.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => state.prompt = None,
        KeyCode::Backspace => {
            prompt.input.pop();
        }
        KeyCode::Char(c) if !c.is_control() => prompt.input.push(c),
        KeyCode::Enter => {
            let Some(Prompt { kind, input }) = state.prompt.take() else {
                return;
            };
            let input = input.trim();
            let result = match kind {
                PromptKind::OpenPath => {
                    let files = if input.is_empty() {
                        Vec::new()
                    } else {
                        expand_paths(&[PathBuf::from(input)], &settings.library)
                    };
                    controller.load_local(files)
                }
                PromptKind::StreamUrl => controller.connect_stream(input),
            };
            match result {
                Ok(()) => state.follow_current(controller),
                Err(e) => debug!(error = %e, "prompt input rejected"),
            }
        }
        _ => {}
    }
}
