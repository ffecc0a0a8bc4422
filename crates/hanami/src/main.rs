mod cli;
mod cursor;
mod logging;
mod terminal_surface;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use hanami_config::Config;
use hanami_core::VisualTheme;
use hanami_field::{
    FieldConfig, FrameLoop, FrameTicker, IntervalTicker, ParticleFieldAnimator, Rgba,
};
use rand::rngs::StdRng;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};

use crate::cli::Args;
use crate::cursor::{CursorFollower, MouseCapture, Spring};
use crate::terminal_surface::TerminalSurface;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let log_path = logging::init();

    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => Config::default_path().ok(),
    };
    let (file_config, config_path) = load_file_config(config_path);
    let mut config = file_config.clone();
    args.apply(&mut config);
    config.validate().wrap_err("invalid command-line option")?;
    tracing::info!(?log_path, theme = %config.theme, "starting hanami");

    let terminal = ratatui::init();
    let result = App::new(config, file_config, config_path).run(terminal);
    ratatui::restore();
    result
}

/// Read the config file at `path`. A file that fails to load is left alone:
/// defaults are used and no path is returned, so nothing is written back.
fn load_file_config(path: Option<PathBuf>) -> (Config, Option<PathBuf>) {
    let Some(path) = path else {
        return (Config::default(), None);
    };
    match Config::load_from(&path) {
        Ok(config) => (config, Some(path)),
        Err(e) => {
            tracing::warn!(error = %e, "could not load config, using defaults");
            (Config::default(), None)
        }
    }
}

/// Cell background behind each theme's particles.
fn backdrop(theme: VisualTheme) -> Rgba {
    match theme {
        VisualTheme::Light => Rgba::rgb(58, 42, 56),
        VisualTheme::Dark => Rgba::rgb(4, 6, 20),
        VisualTheme::Alternate => Rgba::rgb(75, 85, 99),
    }
}

/// Accent for the help line and cursor follower.
fn accent(theme: VisualTheme) -> Color {
    match theme {
        VisualTheme::Light => Color::Rgb(255, 192, 222),
        VisualTheme::Dark => Color::Rgb(153, 187, 255),
        VisualTheme::Alternate => Color::Rgb(229, 231, 235),
    }
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Effective settings (file plus command-line overrides).
    config: Config,
    /// Settings as read from disk, written back with the current theme and speed.
    file_config: Config,
    config_path: Option<PathBuf>,
    frames: FrameLoop<StdRng>,
    surface: TerminalSurface,
    ticker: IntervalTicker,
    cursor: CursorFollower,
    /// Has the particle field been started on the surface?
    started: bool,
    /// A resize event arrived since the last frame.
    needs_resize: bool,
    /// Timestamp of the previous frame.
    last_frame: Duration,
    show_help: bool,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, file_config: Config, config_path: Option<PathBuf>) -> Self {
        let field = FieldConfig {
            density_divisor: config.density_divisor,
            speed: config.speed,
            ..FieldConfig::default()
        };
        let animator = match config.seed {
            Some(seed) => ParticleFieldAnimator::seeded(config.theme, field, seed),
            None => ParticleFieldAnimator::new(config.theme, field),
        };

        Self {
            running: false,
            surface: TerminalSurface::new(config.device_pixel_ratio, backdrop(config.theme)),
            ticker: IntervalTicker::new(config.frame_rate),
            frames: FrameLoop::new(animator),
            cursor: CursorFollower::new(Spring::default()),
            started: false,
            needs_resize: false,
            last_frame: Duration::ZERO,
            show_help: true,
            config,
            file_config,
            config_path,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let _mouse = if self.config.cursor {
            Some(MouseCapture::enable()?)
        } else {
            None
        };

        self.running = true;
        while self.running {
            if self.ticker.remaining().is_zero() {
                let now = self.ticker.next_frame().unwrap_or_default();
                terminal.draw(|frame| self.render(frame, now))?;
            }
            self.handle_crossterm_events()?;
        }

        self.frames.stop();
        self.persist_settings();
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame, now: Duration) {
        let area = frame.area();

        let area_changed = self.surface.set_area(area);
        if self.started && (area_changed || self.needs_resize) {
            self.frames.animator_mut().handle_resize(&mut self.surface);
        }
        self.needs_resize = false;
        if !self.started {
            self.started = self.frames.start(&mut self.surface);
        }

        self.frames.tick(&mut self.surface, now);
        self.cursor.update(now.saturating_sub(self.last_frame));
        self.last_frame = now;

        frame.render_widget(&self.surface, area);

        let color = accent(self.config.theme);
        self.cursor.render(area, frame.buffer_mut(), color, now);

        if self.show_help {
            let [_, help_area] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
            let help = Line::from(vec![
                "q".bold().fg(color),
                " quit  ".dark_gray(),
                "t".bold().fg(color),
                format!(" theme ({})  ", self.config.theme).dark_gray(),
                "b".bold().fg(color),
                " burst  ".dark_gray(),
                "s".bold().fg(color),
                format!(" speed ({})  ", self.config.speed).dark_gray(),
                "h".bold().fg(color),
                " hide help".dark_gray(),
            ])
            .centered();
            frame.render_widget(help, help_area);
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls until the next frame is due.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.ticker.remaining())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(_, _) => self.needs_resize = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('t')) => self.cycle_theme(),
            (_, KeyCode::Char('b')) => self.frames.animator_mut().burst(),
            (_, KeyCode::Char('s')) => self.cycle_speed(),
            (_, KeyCode::Char('h')) => self.show_help = !self.show_help,
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            self.cursor.set_target(mouse.column, mouse.row);
        }
    }

    /// Cycle through visual themes, bursting the field into the new shape.
    fn cycle_theme(&mut self) {
        self.config.theme = self.config.theme.next();
        self.surface.set_background(backdrop(self.config.theme));
        self.frames.animator_mut().set_theme(self.config.theme);
    }

    /// Cycle through animation speeds.
    fn cycle_speed(&mut self) {
        self.config.speed = self.config.speed.next();
        self.frames.animator_mut().set_speed(self.config.speed);
    }

    /// Write the chosen theme and speed back to the config file.
    fn persist_settings(&mut self) {
        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        self.file_config.theme = self.config.theme;
        self.file_config.speed = self.config.speed;
        if let Err(e) = self.file_config.save_to(path) {
            tracing::warn!(error = %e, "could not save config");
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use hanami_field::AnimatorState;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn app(theme: VisualTheme) -> App {
        let config = Config {
            theme,
            seed: Some(1),
            ..Config::default()
        };
        App::new(config.clone(), config, None)
    }

    fn draw(app: &mut App, terminal: &mut Terminal<TestBackend>, now: Duration) {
        terminal.draw(|frame| app.render(frame, now)).unwrap();
    }

    #[test]
    fn test_first_frame_starts_field() {
        let mut app = app(VisualTheme::Light);
        let mut terminal = Terminal::new(TestBackend::new(100, 38)).unwrap();
        draw(&mut app, &mut terminal, Duration::ZERO);

        let animator = app.frames.animator();
        assert!(app.started);
        assert_eq!(animator.state(), AnimatorState::Running);
        // 100x38 cells -> 800x608 px -> 24 petals.
        assert_eq!(animator.particles().len(), 24);
        assert_eq!(animator.frame_count(), 1);
    }

    #[test]
    fn test_theme_key_triggers_burst() {
        let mut app = app(VisualTheme::Light);
        let mut terminal = Terminal::new(TestBackend::new(100, 38)).unwrap();
        draw(&mut app, &mut terminal, Duration::ZERO);

        app.on_key_event(KeyEvent::from(KeyCode::Char('t')));
        draw(&mut app, &mut terminal, Duration::from_millis(16));

        assert_eq!(app.config.theme, VisualTheme::Dark);
        assert_eq!(app.frames.animator().burst_count(), 1);
    }

    #[test]
    fn test_resize_reseeds_for_new_area() {
        let mut app = app(VisualTheme::Alternate);
        let mut terminal = Terminal::new(TestBackend::new(100, 38)).unwrap();
        draw(&mut app, &mut terminal, Duration::ZERO);

        terminal.backend_mut().resize(200, 76);
        draw(&mut app, &mut terminal, Duration::from_millis(16));
        assert_eq!(app.frames.animator().particles().len(), 97);
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            KeyEvent::from(KeyCode::Char('q')),
            KeyEvent::from(KeyCode::Esc),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = app(VisualTheme::Dark);
            app.running = true;
            app.on_key_event(key);
            assert!(!app.running);
        }
    }

    #[test]
    fn test_persist_writes_theme_and_speed_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let file_config = Config::default();
        let config = Config {
            density_divisor: 5_000.0,
            ..Config::default()
        };
        let mut app = App::new(config, file_config, Some(path.clone()));
        app.cycle_theme();
        app.cycle_speed();
        app.persist_settings();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.theme, VisualTheme::Dark);
        assert_eq!(saved.speed, hanami_core::AnimationSpeed::Fast);
        assert_eq!(saved.density_divisor, hanami_config::DEFAULT_DENSITY_DIVISOR);
    }

    #[test]
    fn test_unloadable_config_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let original = "cursor = false\nseed = 5\nframe_rate = 1000\n";
        std::fs::write(&path, original).unwrap();

        let (file_config, config_path) = load_file_config(Some(path.clone()));
        assert_eq!(file_config, Config::default());
        assert_eq!(config_path, None);

        let mut app = App::new(file_config.clone(), file_config, config_path);
        app.cycle_theme();
        app.persist_settings();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_loadable_config_keeps_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "seed = 5\n").unwrap();

        let (file_config, config_path) = load_file_config(Some(path.clone()));
        assert_eq!(file_config.seed, Some(5));
        assert_eq!(config_path, Some(path));
    }
}
