//! Read-only status badge with filename readout.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::status::Status;

/// Filename shown when there is nothing to display.
pub const NO_FILENAME: &str = "---";

/// Presentation of one status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub color: Color,
    pub label: &'static str,
    pub pulse: bool,
}

const STATUS_TABLE: [(Status, StatusStyle); 5] = [
    (
        Status::Unsaved,
        StatusStyle {
            color: Color::Yellow,
            label: "Not saved",
            pulse: true,
        },
    ),
    (
        Status::Saved,
        StatusStyle {
            color: Color::Green,
            label: "Saved",
            pulse: false,
        },
    ),
    (
        Status::Changed,
        StatusStyle {
            color: Color::Blue,
            label: "Changed",
            pulse: true,
        },
    ),
    (
        Status::NotGeneratable,
        StatusStyle {
            color: Color::Red,
            label: "Cannot generate filename",
            pulse: false,
        },
    ),
    (
        Status::Loading,
        StatusStyle {
            color: Color::Gray,
            label: "Loading...",
            pulse: true,
        },
    ),
];

/// Look up the presentation for a status.
pub fn style_for(status: Status) -> StatusStyle {
    STATUS_TABLE
        .iter()
        .find(|(s, _)| *s == status)
        .map(|(_, style)| *style)
        .unwrap_or(STATUS_TABLE[3].1)
}

pub struct StatusIndicator {
    status: Status,
    filename: String,
    rendered: Paragraph<'static>,
}

impl StatusIndicator {
    pub fn new() -> Self {
        let mut indicator = Self {
            status: Status::NotGeneratable,
            filename: NO_FILENAME.to_string(),
            rendered: Paragraph::new(""),
        };
        indicator.render();
        indicator
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn widget(&self) -> &Paragraph<'static> {
        &self.rendered
    }

    pub fn set_status(&mut self, status: Status) {
        if self.status != status {
            self.status = status;
            self.render();
        }
    }

    /// Set the displayed filename. An empty string shows the placeholder.
    pub fn set_filename(&mut self, filename: &str) {
        let filename = if filename.is_empty() {
            NO_FILENAME
        } else {
            filename
        };
        if self.filename != filename {
            self.filename = filename.to_string();
            self.render();
        }
    }

    fn render(&mut self) {
        let style = style_for(self.status);

        let mut dot = Style::default().fg(style.color);
        if style.pulse {
            dot = dot.add_modifier(Modifier::SLOW_BLINK);
        }

        let badge = Line::from(vec![
            Span::styled("● ", dot),
            Span::styled(
                style.label,
                Style::default().fg(style.color).add_modifier(Modifier::BOLD),
            ),
        ]);
        let filename = Line::from(Span::styled(
            self.filename.clone(),
            Style::default().fg(style.color),
        ));

        let block = Block::bordered()
            .title("Filename")
            .border_style(Style::default().fg(style.color));

        self.rendered = Paragraph::new(vec![badge, filename]).block(block);
    }
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new()
    }
}
