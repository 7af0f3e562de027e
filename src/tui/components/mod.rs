//! # TUI Components
//!
//! ## Component Architecture
//!
//! Components receive all data as props and render into a `Rect`:
//! - `TitleBar`: breadcrumb of the root stack plus status
//! - `ScreenPanel`: the top screen of the root stack
//! - `OverlayPanel`: one presented screen (sheet, browser, prompt, composer)
//! - `ActivityPanel`: recent device calls
//!
//! Props come from a `SceneView` snapshot taken once per frame (see
//! `ui.rs`), so no component ever touches the live scene.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top breadcrumb bar)
//! ├── screen_panel.rs  (Main screen)
//! ├── overlay.rs       (Presented screens)
//! └── activity.rs      (Device log)
//! ```

mod activity;
mod overlay;
mod screen_panel;
mod title_bar;

pub use activity::ActivityPanel;
pub use overlay::{OverlayKind, OverlayPanel, OverlayView};
pub use screen_panel::ScreenPanel;
pub use title_bar::TitleBar;
