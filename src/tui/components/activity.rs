//! # Activity Component
//!
//! The last few device calls (URLs opened, haptics), newest at the bottom.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::Component;

pub struct ActivityPanel {
    pub entries: Vec<String>,
}

impl Component for ActivityPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let skip = self.entries.len().saturating_sub(visible);
        let lines: Vec<Line> = self.entries[skip..]
            .iter()
            .map(|e| Line::from(e.as_str()))
            .collect();
        let block = Block::bordered()
            .title(" Device ")
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .style(Style::default().fg(Color::Gray)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_only_newest_entries_fit() {
        let mut terminal = Terminal::new(TestBackend::new(30, 4)).unwrap();
        let mut panel = ActivityPanel {
            entries: vec!["first".into(), "second".into(), "third".into()],
        };
        terminal.draw(|f| panel.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(!text.contains("first"));
        assert!(text.contains("second"));
        assert!(text.contains("third"));
    }
}
