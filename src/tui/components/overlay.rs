//! # Overlay Component
//!
//! One presented screen drawn as a floating panel over whatever is below
//! it. Deeper overlays are inset further so the presentation chain stays
//! visible. Choice prompts render as a selectable list.
//!
//! Follows the persistent state + transient wrapper pattern: the prompt
//! selection lives in `TuiState`, `OverlayPanel` is built each frame.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap};

use crate::core::action::Tint;
use crate::host::screen::PresentationStyle;
use crate::tui::component::Component;

/// What the overlay is, as far as drawing is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayKind {
    Page,
    Browser { tint: Option<Tint> },
    Prompt,
    Composer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub title: String,
    pub kind: OverlayKind,
    pub style: PresentationStyle,
    pub lines: Vec<String>,
}

pub struct OverlayPanel<'a> {
    view: &'a OverlayView,
    depth: u16,
    /// Highlighted row, prompts only
    selected: Option<usize>,
}

impl<'a> OverlayPanel<'a> {
    pub fn new(view: &'a OverlayView, depth: u16, selected: Option<usize>) -> Self {
        Self {
            view,
            depth,
            selected,
        }
    }

    fn help_text(&self) -> &'static str {
        match self.view.kind {
            OverlayKind::Prompt => " ↑↓ Move  Enter Choose ",
            _ => " Esc Dismiss ",
        }
    }

    fn border_color(&self) -> Color {
        match &self.view.kind {
            OverlayKind::Browser { tint: Some(tint) } => Color::Rgb(tint.r, tint.g, tint.b),
            OverlayKind::Browser { tint: None } => Color::Blue,
            OverlayKind::Prompt => Color::Yellow,
            OverlayKind::Composer => Color::Green,
            OverlayKind::Page => Color::DarkGray,
        }
    }
}

impl Component for OverlayPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = overlay_rect(self.view.style, self.depth, area);

        // Clear underlying content
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color()))
            .title(format!(" {} ", self.view.title))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(self.help_text()).centered())
            .padding(Padding::horizontal(1));

        if self.view.kind == OverlayKind::Prompt {
            let last = self.view.lines.len().saturating_sub(1);
            let items: Vec<ListItem> = self
                .view
                .lines
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    // Cancel is always the last option
                    let style = if i == last {
                        Style::default().fg(Color::Red)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    ListItem::new(label.as_str()).style(style)
                })
                .collect();
            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            );
            let mut state = ListState::default().with_selected(self.selected);
            frame.render_stateful_widget(list, overlay, &mut state);
            return;
        }

        let text: Vec<Line> = self.view.lines.iter().map(|l| Line::from(l.as_str())).collect();
        let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, overlay);
    }
}

/// Where a presented screen goes. Sheets are smaller than full-screen
/// styles; each level of depth insets by two cells.
pub fn overlay_rect(style: PresentationStyle, depth: u16, area: Rect) -> Rect {
    let (percent_x, percent_y) = match style {
        PresentationStyle::FullScreen | PresentationStyle::OverFullScreen => (100, 100),
        PresentationStyle::PageSheet | PresentationStyle::Automatic => (80, 80),
        PresentationStyle::FormSheet | PresentationStyle::OverCurrentContext => (60, 60),
        PresentationStyle::Popover => (40, 40),
    };
    let outer = centered_rect(percent_x, percent_y, area);
    let inset = depth.saturating_mul(2);
    Rect {
        x: outer.x + inset.min(outer.width / 4),
        y: outer.y + (inset / 2).min(outer.height / 4),
        width: outer.width.saturating_sub(inset.min(outer.width / 4) * 2),
        height: outer.height.saturating_sub((inset / 2).min(outer.height / 4) * 2),
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(view: &OverlayView, selected: Option<usize>) -> String {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                OverlayPanel::new(view, 0, selected).render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_page_overlay_shows_title_and_lines() {
        let view = OverlayView {
            title: "Sheet".into(),
            kind: OverlayKind::Page,
            style: PresentationStyle::FormSheet,
            lines: vec!["hello".into()],
        };
        let text = render(&view, None);
        assert!(text.contains("Sheet"));
        assert!(text.contains("hello"));
        assert!(text.contains("Esc Dismiss"));
    }

    #[test]
    fn test_prompt_overlay_lists_options() {
        let view = OverlayView {
            title: "Open mail app".into(),
            kind: OverlayKind::Prompt,
            style: PresentationStyle::Automatic,
            lines: vec!["Gmail".into(), "Cancel".into()],
        };
        let text = render(&view, Some(0));
        assert!(text.contains("Gmail"));
        assert!(text.contains("Cancel"));
        assert!(text.contains("Enter Choose"));
    }

    #[test]
    fn test_deeper_overlays_are_inset() {
        let area = Rect::new(0, 0, 100, 40);
        let first = overlay_rect(PresentationStyle::FullScreen, 0, area);
        let second = overlay_rect(PresentationStyle::FullScreen, 1, area);
        assert_eq!(first, area);
        assert!(second.width < first.width);
        assert!(second.x > first.x);
    }

    #[test]
    fn test_sheet_smaller_than_full_screen() {
        let area = Rect::new(0, 0, 100, 40);
        let sheet = overlay_rect(PresentationStyle::FormSheet, 0, area);
        let full = overlay_rect(PresentationStyle::FullScreen, 0, area);
        assert!(sheet.width < full.width);
        assert!(sheet.height < full.height);
    }
}
