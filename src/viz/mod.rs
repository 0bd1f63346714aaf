//! Terminal control surface for the sculpture
//!
//! Provides a TUI showing:
//! - Four envelope sliders with their formatted values
//! - A play/stop toggle and audio status
//! - The derived oscillator settings and scene size
//! - The envelope outline
//! - A slowly rotating side view of the sculpture

mod envelope;
mod view;

pub use envelope::{EnvelopeOutline, EnvelopeShape};
pub use view::SculptureView;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, LevelFilter};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame, Terminal,
};

use crate::controls::{Playback, SLIDERS};
use crate::engine::{AudioError, Engine, Player};
use crate::envelope::EnvelopeParameters;
use crate::sculpture::Sculpture;

/// Rotation added every frame, in radians
const ROTATION_PER_FRAME: f64 = 0.01;

/// Time between frames
const FRAME: Duration = Duration::from_millis(33);

/// Steps moved by PageUp/PageDown
const COARSE_STEPS: i32 = 10;

/// Whether the audio backend came up
pub enum AudioStatus {
    Ready(Player),
    Unavailable(String),
}

/// State behind the terminal UI
pub struct App {
    sculpture: Sculpture,
    engine: Arc<Mutex<Engine>>,
    audio: AudioStatus,
    defaults: EnvelopeParameters,
    selected: usize,
    rotation: f64,
    running: bool,
}

impl App {
    /// Build the app from an opened (or failed) audio output
    ///
    /// A failed output is logged and leaves playback unavailable for the
    /// session.
    pub fn new(
        sculpture: Sculpture,
        engine: Arc<Mutex<Engine>>,
        player: std::result::Result<Player, AudioError>,
    ) -> Self {
        let audio = match player {
            Ok(player) => AudioStatus::Ready(player),
            Err(e) => {
                error!("audio unavailable: {}", e);
                AudioStatus::Unavailable(e.to_string())
            }
        };

        let app = Self {
            defaults: sculpture.params(),
            sculpture,
            engine,
            audio,
            selected: 0,
            rotation: 0.0,
            running: true,
        };
        app.push_audio();
        app
    }

    pub fn sculpture(&self) -> &Sculpture {
        &self.sculpture
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn audio_available(&self) -> bool {
        matches!(self.audio, AudioStatus::Ready(_))
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => self.running = false,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.running = false,
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
                self.selected = (self.selected + SLIDERS.len() - 1) % SLIDERS.len();
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
                self.selected = (self.selected + 1) % SLIDERS.len();
            }
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => self.nudge(-1),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => self.nudge(1),
            (KeyCode::PageDown, _) => self.nudge(-COARSE_STEPS),
            (KeyCode::PageUp, _) => self.nudge(COARSE_STEPS),
            (KeyCode::Char(' '), _) | (KeyCode::Enter, _) => self.toggle_playback(),
            (KeyCode::Char('r'), _) => {
                self.sculpture.set_params(self.defaults);
                self.push_audio();
            }
            _ => {}
        }
    }

    /// Move the selected slider by some steps
    pub fn nudge(&mut self, steps: i32) {
        let slider = &SLIDERS[self.selected];
        let params = slider.nudge(self.sculpture.params(), steps);
        self.sculpture.set_params(params);
        self.push_audio();
    }

    /// Toggle playback; does nothing when audio is unavailable
    pub fn toggle_playback(&mut self) {
        if !self.audio_available() {
            return;
        }

        let playback = self.sculpture.toggle_playback();
        if let Ok(mut engine) = self.engine.lock() {
            engine.apply(self.sculpture.audio_settings());
            match playback {
                Playback::Playing => engine.start(),
                Playback::Stopped => engine.stop(),
            }
        }
        info!("playback {}", playback);
    }

    /// Advance the display rotation by one frame
    pub fn tick(&mut self) {
        self.rotation = (self.rotation + ROTATION_PER_FRAME) % std::f64::consts::TAU;
    }

    /// Stop the oscillator and close the output
    pub fn shutdown(&mut self) {
        if let Ok(mut engine) = self.engine.lock() {
            engine.stop();
        }
        if let AudioStatus::Ready(player) = &mut self.audio {
            player.close();
        }
        self.running = false;
    }

    fn push_audio(&self) {
        if let Ok(mut engine) = self.engine.lock() {
            engine.apply(self.sculpture.audio_settings());
        }
    }
}

/// Run the terminal UI until the user quits
pub fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Log lines would scribble over the alternate screen
    let log_level = log::max_level();
    log::set_max_level(LevelFilter::Off);

    let result = event_loop(&mut terminal, &mut app);

    log::set_max_level(log_level);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    app.shutdown();

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    while app.is_running() {
        terminal.draw(|f| draw_ui(f, app))?;

        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.tick();
    }
    Ok(())
}

fn draw_ui(f: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(42), Constraint::Min(20)])
        .split(f.area());

    let panel = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3 * SLIDERS.len() as u16), // Sliders
            Constraint::Length(3),                        // Toggle
            Constraint::Min(7),                           // Readout
        ])
        .split(columns[0]);

    draw_sliders(f, panel[0], app);
    draw_toggle(f, panel[1], app);
    draw_readout(f, panel[2], app);

    let stage = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(10)])
        .split(columns[1]);

    let shape = EnvelopeShape::new(&app.sculpture.params())
        .block(Block::default().borders(Borders::ALL).title(" Envelope "));
    f.render_widget(shape, stage[0]);
    draw_sculpture(f, stage[1], app);
}

fn draw_sliders(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(SLIDERS.iter().map(|_| Constraint::Length(3)))
        .split(area);

    let params = app.sculpture.params();
    for (i, (slider, row)) in SLIDERS.iter().zip(rows.iter()).enumerate() {
        let value = slider.value(&params);
        let selected = i == app.selected;
        let border = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_style(border).title(format!(" {} ", slider.label)))
            .gauge_style(Style::default().fg(Color::Gray))
            .ratio(slider.fill(value).clamp(0.0, 1.0))
            .label(slider.format(value));
        f.render_widget(gauge, *row);
    }
}

fn draw_toggle(f: &mut Frame, area: Rect, app: &App) {
    let (status, color) = match (&app.audio, app.sculpture.playback()) {
        (AudioStatus::Unavailable(_), _) => ("AUDIO UNAVAILABLE", Color::Red),
        (_, Playback::Playing) => ("PLAYING", Color::Green),
        (_, Playback::Stopped) => ("STOPPED", Color::Yellow),
    };

    let text = Line::from(vec![
        Span::styled(
            format!(" [{}] ", app.sculpture.playback().button_label()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(status, Style::default().fg(color)),
    ]);

    f.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL)), area);
}

fn draw_readout(f: &mut Frame, area: Rect, app: &App) {
    let audio = app.sculpture.audio_settings();
    let curve = app.sculpture.curve();
    let stats = app.sculpture.stats();

    let mut lines = vec![
        Line::from(format!(" Frequency  {:.1} Hz", audio.frequency)),
        Line::from(format!(" Waveform   {}", audio.waveform)),
        Line::from(format!(" Detune     {:.0} cents", audio.detune_cents)),
        Line::from(format!(" Gain       {:.3}", audio.gain)),
        Line::from(format!(" Height {:.2}  Turns {:.2}", curve.max_height, curve.spiral_turns)),
        Line::from(format!(" Objects {}  Triangles {}", stats.objects, stats.triangles)),
    ];
    if let AudioStatus::Unavailable(reason) = &app.audio {
        lines.push(Line::styled(format!(" {}", reason), Style::default().fg(Color::Red)));
    }
    lines.push(Line::styled(
        " ↑↓ select  ←→ adjust  space play  r reset  q quit",
        Style::default().add_modifier(Modifier::DIM),
    ));

    f.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL)), area);
}

fn draw_sculpture(f: &mut Frame, area: Rect, app: &App) {
    let view = SculptureView::new(app.sculpture.curve(), app.sculpture.details())
        .rotation(app.rotation)
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title(" Sculpture "));

    f.render_widget(view, area);
}
