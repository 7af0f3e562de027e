//! # ScreenPanel Component
//!
//! The top screen of the root stack, drawn in the main area.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::tui::component::Component;

pub struct ScreenPanel {
    pub title: String,
    pub lines: Vec<String>,
    /// Number of screens below this one in the stack
    pub depth: usize,
}

impl Component for ScreenPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.depth == 0 {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(border);
        if self.depth > 0 {
            block = block.title_bottom(Line::from(" ← Back ").right_aligned());
        }
        let text: Vec<Line> = self.lines.iter().map(|l| Line::from(l.as_str())).collect();
        frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: false }), area);
    }
}
