//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::Controller;
use crate::audio::{PlaybackEngine, SessionState};
use crate::config::{ControlsSettings, UiSettings};
use crate::library::{CoverArt, PlaybackMode};
use crate::view::ViewRow;

const GROUP_ICON: &str = "📁";
const TRACK_ICON: &str = "🎵";

/// What a text prompt collects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromptKind {
    OpenPath,
    StreamUrl,
}

impl PromptKind {
    fn title(self) -> &'static str {
        match self {
            PromptKind::OpenPath => " open file or directory (enter to load, esc to cancel) ",
            PromptKind::StreamUrl => " stream URL (enter to connect, esc to cancel) ",
        }
    }
}

/// A text prompt being typed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }
}

/// One entry of the controls footer.
struct Control {
    keys: &'static str,
    label: String,
    enabled: bool,
}

fn controls<E: PlaybackEngine>(
    controller: &Controller<E>,
    settings: &ControlsSettings,
) -> Vec<Control> {
    let c = |keys, label: &str, enabled| Control {
        keys,
        label: label.to_string(),
        enabled,
    };
    vec![
        c("j/k", "up/down", !controller.view().is_empty()),
        c("enter", "play selected", !controller.view().is_empty()),
        c("space/p", "play", controller.can_play()),
        c("s", "stop", controller.can_stop()),
        c("b/h", "previous", controller.can_previous()),
        c("n/l", "next", controller.can_next()),
        Control {
            keys: "H/L",
            label: format!("seek -/+{}%", settings.seek_step_percent),
            enabled: controller.can_seek(),
        },
        Control {
            keys: "-/+",
            label: format!("volume -/+{}", settings.volume_step),
            enabled: true,
        },
        c("g", "grouping", true),
        c("o", "open", true),
        c("u", "stream", true),
        c("q", "quit", true),
    ]
}

/// Render the controls help line, dimming the ones that do nothing right now.
fn controls_line(controls: &[Control]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, control) in controls.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        let style = if control.enabled {
            Style::default()
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(
            format!("[{}] {}", control.keys, control.label),
            style,
        ));
    }
    Line::from(spans)
}

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "Idle",
        SessionState::Playing => "Playing",
        SessionState::Stopped => "Stopped",
    }
}

fn mode_label(mode: PlaybackMode) -> &'static str {
    match mode {
        PlaybackMode::Local => "Local files",
        PlaybackMode::Stream => "Network stream",
    }
}

/// Human readable byte count, e.g. `12.3 KiB`.
fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64;
    let mut unit = "B";
    for u in UNITS {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = u;
    }
    format!("{size:.1} {unit}")
}

fn art_summary(art: Option<&CoverArt>) -> String {
    match art {
        Some(art) => format!(
            "{} ({})",
            format_size(art.data.len()),
            art.mime_type.as_deref().unwrap_or("unknown type")
        ),
        None => "none".to_string(),
    }
}

/// Text of one tree row: indentation, icon and label, marking the current track.
fn row_text(row: &ViewRow, current: Option<usize>) -> String {
    let indent = "  ".repeat(row.depth);
    match row.index {
        None => format!("{indent}{GROUP_ICON} {}", row.label),
        Some(i) if Some(i) == current => format!("{indent}▶ {}", row.label),
        Some(_) => format!("{indent}{TRACK_ICON} {}", row.label),
    }
}

/// Window of `len` rows of height `height` that keeps `selected` centered when possible.
fn visible_window(len: usize, height: usize, selected: usize) -> (usize, usize) {
    if len <= height || height == 0 {
        return (0, len);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > len {
        start = len - height;
    }
    (start, start + height)
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame`.
pub fn draw<E: PlaybackEngine>(
    frame: &mut Frame,
    controller: &Controller<E>,
    cursor: usize,
    prompt: Option<&Prompt>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let prompt_height = if prompt.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(prompt_height),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" trackdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = format!(
        "{}\n{} • {} • {} • Volume: {}",
        controller.status(),
        state_label(controller.session_state()),
        mode_label(controller.mode()),
        controller.grouping().label(),
        controller.volume().level()
    );
    let status_par = Paragraph::new(status)
        .block(padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    draw_tree(frame, controller, cursor, body[0]);
    draw_now_playing(frame, controller, body[1]);

    let progress = controller.progress();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(progress.ratio.clamp(0.0, 1.0))
        .label(format!("{} / {}", progress.elapsed, progress.remaining));
    frame.render_widget(gauge, chunks[3]);

    if let Some(prompt) = prompt {
        let input = Paragraph::new(format!("{}_", prompt.input)).block(padded(prompt.kind.title()));
        frame.render_widget(input, chunks[4]);
    }

    let footer = Paragraph::new(controls_line(&controls(controller, controls_settings)))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}

fn draw_tree<E: PlaybackEngine>(
    frame: &mut Frame,
    controller: &Controller<E>,
    cursor: usize,
    area: Rect,
) {
    let rows = controller.view().rows();
    let title = format!(" {} ", controller.grouping().label());

    if rows.is_empty() {
        let empty = Paragraph::new("Nothing loaded. Press o to open files or u for a stream.")
            .block(padded(&title))
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    // Only build ListItems for the visible window.
    let height = area.height.saturating_sub(2) as usize;
    let cursor = cursor.min(rows.len() - 1);
    let (start, end) = visible_window(rows.len(), height, cursor);
    let current = controller.current();

    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .map(|row| {
            let item = ListItem::new(row_text(row, current));
            if row.index.is_none() {
                item.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(cursor - start));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing<E: PlaybackEngine>(frame: &mut Frame, controller: &Controller<E>, area: Rect) {
    let now = controller.now_playing();
    let text = match &now.metadata {
        Some(meta) => format!(
            "Title: {}\nArtist: {}\nAlbum: {}\nTrack: {}\nCover art: {}",
            meta.title,
            meta.artist,
            meta.album,
            meta.track_number,
            art_summary(now.art.as_ref())
        ),
        None => "No track selected".to_string(),
    };
    let panel = Paragraph::new(text)
        .block(padded(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(panel, area);
}
