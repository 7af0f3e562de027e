use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::host::scene::{Scene, ScreenKind};
use crate::host::screen::{Screen, ScreenRef};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    ActivityPanel, OverlayKind, OverlayPanel, OverlayView, ScreenPanel, TitleBar,
};

const ACTIVITY_HEIGHT: u16 = 6;

/// Everything one frame needs, copied out of the live scene.
#[derive(Debug, Clone, Default)]
pub struct SceneView {
    pub breadcrumb: Vec<String>,
    pub top_title: String,
    pub top_lines: Vec<String>,
    pub overlays: Vec<OverlayView>,
    pub activity: Vec<String>,
}

impl SceneView {
    pub fn capture(scene: &Scene, root: &ScreenRef, activity: Vec<String>) -> Self {
        let stack = root
            .as_stack()
            .map(|stack| stack.screens())
            .unwrap_or_else(|| vec![root.clone()]);
        let breadcrumb = stack.iter().map(|s| s.title()).collect();
        let (top_title, top_lines) = match stack.last() {
            Some(top) => (
                top.title(),
                scene.find(top).map(|s| s.lines().to_vec()).unwrap_or_default(),
            ),
            None => (root.title(), Vec::new()),
        };

        let overlays = scene
            .overlays()
            .iter()
            .filter_map(|screen| scene.find(screen))
            .map(|screen| OverlayView {
                title: screen.title(),
                kind: match screen.kind() {
                    ScreenKind::Browser { tint, .. } => OverlayKind::Browser { tint: *tint },
                    ScreenKind::Prompt => OverlayKind::Prompt,
                    ScreenKind::Composer => OverlayKind::Composer,
                    ScreenKind::Page | ScreenKind::Stack => OverlayKind::Page,
                },
                style: screen.style().unwrap_or_default(),
                lines: screen.lines().to_vec(),
            })
            .collect();

        Self {
            breadcrumb,
            top_title,
            top_lines,
            overlays,
            activity,
        }
    }

    /// Number of options if the topmost overlay is a prompt.
    pub fn prompt_len(&self) -> Option<usize> {
        self.overlays
            .last()
            .filter(|o| o.kind == OverlayKind::Prompt)
            .map(|o| o.lines.len())
    }
}

pub fn draw_ui(frame: &mut Frame, view: &SceneView, tui: &TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(ACTIVITY_HEIGHT)]);
    let [title_area, main_area, activity_area] = layout.areas(frame.area());

    TitleBar::new(view.breadcrumb.clone(), tui.status_message.clone(), tui.alert)
        .render(frame, title_area);

    ScreenPanel {
        title: view.top_title.clone(),
        lines: view.top_lines.clone(),
        depth: view.breadcrumb.len().saturating_sub(1),
    }
    .render(frame, main_area);

    ActivityPanel {
        entries: view.activity.clone(),
    }
    .render(frame, activity_area);

    let top = view.overlays.len().saturating_sub(1);
    for (depth, overlay) in view.overlays.iter().enumerate() {
        let selected = (depth == top && overlay.kind == OverlayKind::Prompt)
            .then_some(tui.prompt_selected);
        OverlayPanel::new(overlay, depth as u16, selected).render(frame, main_area);
    }
}
