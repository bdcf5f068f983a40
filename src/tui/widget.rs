//! Widgets for the map viewer: map canvas, header line, status bar, help.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::service::MapService;
use crate::viewport::Viewport;

/// Equatorial circumference used for the web-map zoom level readout (meters).
const EARTH_CIRCUMFERENCE: f64 = 40_075_017.0;

/// Web-map tile size in pixels.
const TILE_SIZE: f64 = 256.0;

/// Key bindings shown in the status bar.
pub const STATUS_BINDINGS: [&str; 5] =
    ["W/A/S/D: Pan", "[/]: Zoom", "R: Reset", "?: Help", "Q: Quit"];

const HELP_LINES: [(&str, &str); 6] = [
    ("a / Left", "pan left"),
    ("d / Right", "pan right"),
    ("w / Up  s / Down", "pan up / down"),
    ("] + =  /  [ -", "zoom in / out"),
    ("r", "reset view"),
    ("q / Esc / Ctrl+Q", "quit"),
];

const BAR_STYLE: Style = Style::new().fg(Color::Gray).bg(Color::Rgb(30, 30, 30));

/// Truncate `text` to `width` columns with a trailing `...`, or pad it with spaces.
#[must_use]
pub fn fit_to_width(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        if width <= 3 {
            return ".".repeat(width);
        }
        let mut out: String = text.chars().take(width - 3).collect();
        out.push_str("...");
        out
    } else {
        let mut out = text.to_string();
        out.extend(std::iter::repeat(' ').take(width - len));
        out
    }
}

/// Web-map zoom level for a scale in meters per pixel.
#[must_use]
pub fn zoom_level(scale: f64) -> f64 {
    if scale > 0.0 {
        (EARTH_CIRCUMFERENCE / (scale * TILE_SIZE)).log2()
    } else {
        0.0
    }
}

/// `12.3456°N, 4.5678°W` style coordinate.
#[must_use]
pub fn format_coord(lon: f64, lat: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}°{ns}, {:.4}°{ew}", lat.abs(), lon.abs())
}

/// Header text: zoom level, center and corner coordinates.
#[must_use]
pub fn header_text(service: &MapService, viewport: &Viewport, cols: u16, rows: u16) -> String {
    let projection = service.projection();
    let (center_lon, center_lat) = projection.inverse(viewport.center_x, viewport.center_y);
    let (west, south, east, north) =
        service.viewport_lon_lat_bounds(viewport, i32::from(cols), i32::from(rows));
    format!(
        "Zoom: {:.2} | Center: {} | Top-Left: {} | Bottom-Right: {}",
        zoom_level(viewport.scale()),
        format_coord(center_lon, center_lat),
        format_coord(west, north),
        format_coord(east, south),
    )
}

/// Draws pre-rendered braille text, one line per row.
#[derive(Debug, Clone)]
pub struct MapWidget<'a> {
    text: &'a str,
    style: Style,
}

impl<'a> MapWidget<'a> {
    /// Widget for rendered map text.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self { text, style: Style::default().fg(Color::Green) }
    }

    /// Sets the line color.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        for (i, line) in self.text.lines().take(area.height as usize).enumerate() {
            buf.set_stringn(area.x, area.y + i as u16, line, area.width as usize, self.style);
        }
    }
}

/// One-line bar with text fitted to the area width.
#[derive(Debug, Clone)]
pub struct InfoBar {
    text: String,
    style: Style,
}

impl InfoBar {
    /// Header bar showing `text` in bold.
    #[must_use]
    pub fn header(text: impl Into<String>) -> Self {
        Self { text: text.into(), style: BAR_STYLE.fg(Color::White).add_modifier(Modifier::BOLD) }
    }

    /// Status bar listing the key bindings.
    #[must_use]
    pub fn status() -> Self {
        Self { text: STATUS_BINDINGS.join("  "), style: BAR_STYLE }
    }

    /// Text before fitting.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for InfoBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let fitted = fit_to_width(&self.text, area.width as usize);
        buf.set_string(area.x, area.y, fitted, self.style);
    }
}

/// Centered popup listing the key bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpPopup;

impl HelpPopup {
    fn area(outer: Rect) -> Rect {
        let width = outer.width.min(44);
        let height = outer.height.min(HELP_LINES.len() as u16 + 2);
        Rect {
            x: outer.x + (outer.width - width) / 2,
            y: outer.y + (outer.height - height) / 2,
            width,
            height,
        }
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = Self::area(area);
        if popup.width == 0 || popup.height == 0 {
            return;
        }
        Clear.render(popup, buf);
        let lines: Vec<Line<'_>> = HELP_LINES
            .iter()
            .map(|(keys, what)| Line::from(format!(" {keys:<18} {what}")))
            .collect();
        Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" Keys ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .render(popup, buf);
    }
}
