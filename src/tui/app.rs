//! Main application loop for the map viewer.

use std::io::{self, stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::{Frame, Terminal};

use crate::config::Config;
use crate::navigation::{DisplaySize, Navigator};
use crate::service::MapService;
use crate::tui::error::Result;
use crate::tui::input::{Action, InputHandler};
use crate::tui::widget::{header_text, HelpPopup, InfoBar, MapWidget};
use crate::viewport::Viewport;

/// Padding applied when fitting the view to the loaded geometry.
pub const FIT_PADDING: f64 = 1.05;

/// The interactive map viewer.
#[derive(Debug)]
pub struct App {
    service: MapService,
    viewport: Viewport,
    navigator: Navigator,
    input: InputHandler,
    /// Map area size from the last draw.
    display: DisplaySize,
    fitted: bool,
    show_help: bool,
    should_quit: bool,
}

impl App {
    /// Creates an application over a loaded map service.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured initial viewport is invalid.
    pub fn new(config: &Config, service: MapService) -> Result<Self> {
        Ok(Self {
            service,
            viewport: config.initial_viewport()?,
            navigator: config.navigator(),
            input: InputHandler::new(config.navigation.vim_keys),
            display: DisplaySize::default(),
            fitted: false,
            show_help: false,
            should_quit: false,
        })
    }

    /// Runs the application main loop.
    ///
    /// The terminal is restored even when the loop fails.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, drawing or event polling fails.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        stdout().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let poll_timeout = Duration::from_millis(250);

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(poll_timeout)? {
                // Resize events need no handling: the next draw reads the new size.
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let action = self.input.handle_key(key);
                        self.handle_action(action)?;
                    }
                }
            }
        }

        tracing::info!("quit");
        Ok(())
    }

    /// Handles an input action.
    ///
    /// # Errors
    ///
    /// Propagates navigation errors.
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = !self.show_help,
            Action::None => {}
            _ => {
                if let Some(command) = action.command() {
                    self.navigator.apply(command, &mut self.viewport, self.display)?;
                }
            }
        }
        Ok(())
    }

    /// Splits the frame into header, map and status rows.
    fn layout(area: Rect) -> [Rect; 3] {
        Layout::vertical([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .areas(area)
    }

    /// Draws one frame. The first draw with a non-empty map area fits the
    /// view to the geometry.
    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let [header, map, status] = Self::layout(frame.area());
        self.display = DisplaySize::new(u32::from(map.width), u32::from(map.height));

        if !self.fitted && map.width > 0 && map.height > 0 {
            self.fit_to_geometry();
        }

        let text = self.service.render(&self.viewport, i32::from(map.width), i32::from(map.height));
        frame.render_widget(MapWidget::new(&text), map);
        let header_line = header_text(&self.service, &self.viewport, map.width, map.height);
        frame.render_widget(InfoBar::header(header_line), header);
        frame.render_widget(InfoBar::status(), status);

        if self.show_help {
            frame.render_widget(HelpPopup, map);
        }
    }

    /// Centers the view on the geometry bounds at a scale that shows all of it.
    fn fit_to_geometry(&mut self) {
        self.fitted = true;
        let Some(bounds) = self.service.geometry_bounds() else {
            return;
        };
        let (w, h) = (self.display.width_px(), self.display.height_px());
        if self.viewport.fit_bounds(&bounds, w, h, FIT_PADDING) {
            tracing::debug!(
                center_x = self.viewport.center_x,
                center_y = self.viewport.center_y,
                scale = self.viewport.scale(),
                "fitted view to geometry"
            );
        }
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Returns whether help is visible.
    #[must_use]
    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Returns whether the app should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
