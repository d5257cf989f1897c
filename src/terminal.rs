// SPDX-License-Identifier: GPL-3.0-only

//! Terminal display sink
//!
//! Renders frames to the terminal using Unicode half-block characters for
//! improved vertical resolution. The bottom line is a status bar showing the
//! latest notification. Raw mode is enabled for the lifetime of the display,
//! so Ctrl+C arrives as a key press rather than a signal.

use crate::backends::display::{DisplaySink, Key};
use crate::errors::DisplayError;
use crate::media::Frame;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, Stdout, stdout};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Full-screen terminal view of the processed camera feed
pub struct TerminalDisplay {
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
    title: String,
    status: String,
}

impl TerminalDisplay {
    /// Switch the terminal to raw mode and the alternate screen
    pub fn new(title: &str) -> Result<Self, DisplayError> {
        enable_raw_mode().map_err(|e| DisplayError::Init(e.to_string()))?;
        let mut stdout = stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, SetTitle(title)) {
            let _ = disable_raw_mode();
            return Err(DisplayError::Init(e.to_string()));
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(DisplayError::Init(e.to_string()));
            }
        };

        info!(title, "Terminal display ready");
        Ok(Self {
            terminal: Some(terminal),
            title: title.to_string(),
            status: String::new(),
        })
    }
}

impl DisplaySink for TerminalDisplay {
    fn show_frame(&mut self, window: &str, frame: &Frame) -> Result<(), DisplayError> {
        let Some(terminal) = self.terminal.as_mut() else {
            return Err(DisplayError::Io("display already closed".into()));
        };

        if window != self.title {
            execute!(terminal.backend_mut(), SetTitle(window))?;
            self.title = window.to_string();
        }

        let status = StatusBar {
            message: &self.status,
        };
        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let frame_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };
            f.render_widget(FrameWidget { frame }, frame_area);

            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };
            f.render_widget(status, status_area);
        })?;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>, DisplayError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(map_key(key))),
            _ => Ok(None),
        }
    }

    fn notify(&mut self, message: &str) {
        debug!(message, "Status");
        self.status = message.to_string();
    }

    fn close_all(&mut self) {
        let Some(mut terminal) = self.terminal.take() else {
            return;
        };

        if let Err(e) = disable_raw_mode() {
            warn!(%e, "Failed to disable raw mode");
        }
        if let Err(e) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
            warn!(%e, "Failed to leave alternate screen");
        }
        if let Err(e) = terminal.show_cursor() {
            warn!(%e, "Failed to show cursor");
        }
        info!("Terminal restored");
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        self.close_all();
    }
}

/// Translate a crossterm key press into a loop command key
fn map_key(key: KeyEvent) -> Key {
    match key.code {
        // Ctrl+C to quit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Escape,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        _ => Key::Other,
    }
}

/// Widget that renders a BGR frame using half-block characters
struct FrameWidget<'a> {
    frame: &'a Frame,
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let frame = self.frame;
        if frame.width() == 0 || frame.height() == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        // Calculate display dimensions maintaining aspect ratio
        // Each terminal cell displays 2 vertical pixels using half-block characters
        let frame_aspect = frame.width() as f64 / frame.height() as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = frame.width() as f64 / display_width as f64;
        let y_scale = frame.height() as f64 / (display_height * 2) as f64;

        // Upper half (▀) in fg, lower half in bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;
                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(bgr_color(frame.pixel(src_x, src_y_top)));
                    cell.set_bg(bgr_color(frame.pixel(src_x, src_y_bottom)));
                }
            }
        }
    }
}

fn bgr_color([b, g, r]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

/// Status bar widget
#[derive(Clone, Copy)]
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(
            area.x,
            area.y,
            text,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}
