//! # TitleBar Component
//!
//! Single-line breadcrumb of the root stack, plus a status message.
//!
//! ```text
//! Home › Detail 1 › Wizard 1/3 | opened https://example.com/help
//! ```
//!
//! When the breadcrumb is wider than the terminal, leading entries are
//! collapsed into `…` so the current screen stays visible.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

const SEPARATOR: &str = " › ";
const ELLIPSIS: &str = "…";

pub struct TitleBar {
    /// Titles of the root stack, bottom first
    pub breadcrumb: Vec<String>,
    pub status_message: String,
    /// Draw in the error color (a haptic error just fired)
    pub alert: bool,
}

impl TitleBar {
    pub fn new(breadcrumb: Vec<String>, status_message: String, alert: bool) -> Self {
        Self {
            breadcrumb,
            status_message,
            alert,
        }
    }

    /// Title text that fits in `width` columns.
    pub fn text(&self, width: usize) -> String {
        let status = if self.status_message.is_empty() {
            String::new()
        } else {
            format!(" | {}", self.status_message)
        };
        let budget = width.saturating_sub(status.width());

        let mut skipped = 0;
        let mut crumb = self.breadcrumb.join(SEPARATOR);
        while crumb.width() > budget && skipped + 1 < self.breadcrumb.len() {
            skipped += 1;
            let rest = self.breadcrumb[skipped..].join(SEPARATOR);
            crumb = format!("{ELLIPSIS}{SEPARATOR}{rest}");
        }
        format!("{crumb}{status}")
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = if self.alert {
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let text = self.text(area.width as usize);
        frame.render_widget(Span::styled(text, style), area);
    }
}
