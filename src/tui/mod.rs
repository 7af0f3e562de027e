//! # TUI Adapter
//!
//! The ratatui-specific layer. Hosts a `Scene` in the terminal, wires the
//! navigator to terminal stand-ins for the device, and translates key
//! presses into demo steps for the root coordinator.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! ```text
//! loop
//! ├── draw (only when something changed)
//! ├── poll keys → prompt selection, or DemoStep → root.perform()
//! ├── navigator.run_pending()   ← jobs posted by tokio tasks via NavigatorHandle
//! └── scene.finish_transitions() (animated mode completes pushes one tick later)
//! ```

mod component;
mod components;
mod demo;
mod device;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::rc::Rc;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::config::ResolvedConfig;
use crate::core::coordinator::{Coordinator, CoordinatorId};
use crate::core::navigator::{Navigator, NavigatorHandle};
use crate::host::Host;
use crate::host::scene::Scene;
use crate::host::screen::ScreenRef;
use crate::tui::demo::{DemoStep, HOME_TAG, HomeFlow, WizardFlow, WizardStep};
use crate::tui::device::{ActivityLog, TerminalComposer, TerminalHaptics, TerminalOs};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::SceneView;

/// Delay before the simulated startup deep link arrives.
const STARTUP_LINK_DELAY: Duration = Duration::from_secs(2);
const ACTIVITY_LINES: usize = 20;

/// TUI-specific presentation state (not part of the navigation core)
#[derive(Debug, Default)]
pub struct TuiState {
    pub status_message: String,
    /// Error flash on the title bar
    pub alert: bool,
    /// Highlighted option when the top overlay is a prompt
    pub prompt_selected: usize,
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            Hide,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
        info!("Terminal modes enabled (hidden cursor, key event types)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, Show);
    }
}

/// What the key loop decided.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Continue,
    Quit,
}

/// The navigator, scene and root coordinator of the demo app.
struct Demo {
    scene: Scene,
    root: ScreenRef,
    home: Coordinator<DemoStep>,
    navigator: Navigator,
    activity: ActivityLog,
    haptics: Rc<TerminalHaptics>,
}

impl Demo {
    fn new(config: &ResolvedConfig) -> Self {
        let scene = if config.animated {
            Scene::deferred()
        } else {
            Scene::new()
        };
        let activity = ActivityLog::default();
        let haptics = Rc::new(TerminalHaptics::new(activity.clone()));
        let host = Host {
            os: Rc::new(TerminalOs::new(activity.clone())),
            composer: Rc::new(TerminalComposer::new(scene.clone())),
            haptics: haptics.clone(),
            factory: Rc::new(scene.clone()),
            mail: config.mail_directory(),
        };
        let navigator = Navigator::new(host, config.router_options());

        let home_lines: Vec<String> = HomeFlow::home_lines();
        let lines: Vec<&str> = home_lines.iter().map(String::as_str).collect();
        let root: ScreenRef = scene.stack("nav", vec![scene.page("Home", &lines) as ScreenRef]);
        let flow = HomeFlow::new(config.default_style, config.browser_style, config.browser_tint);
        let home = Coordinator::new(&navigator, HOME_TAG, Some(root.clone()), flow);
        home.start(DemoStep::Home);

        Self {
            scene,
            root,
            home,
            navigator,
            activity,
            haptics,
        }
    }

    fn view(&self) -> SceneView {
        SceneView::capture(&self.scene, &self.root, self.activity.recent(ACTIVITY_LINES))
    }

    /// Apply one key event. `spawn_link` is called for the deep-link key.
    fn handle(
        &self,
        tui: &mut TuiState,
        event: TuiEvent,
        spawn_link: &dyn Fn(CoordinatorId),
    ) -> Outcome {
        // A prompt on top takes the cursor keys and Enter
        if let Some(len) = self.view().prompt_len() {
            match event {
                TuiEvent::CursorUp => {
                    tui.prompt_selected = tui.prompt_selected.saturating_sub(1);
                    return Outcome::Continue;
                }
                TuiEvent::CursorDown => {
                    tui.prompt_selected = (tui.prompt_selected + 1).min(len.saturating_sub(1));
                    return Outcome::Continue;
                }
                TuiEvent::Submit => {
                    if let Some(prompt) = self.scene.top_overlay() {
                        prompt.choose(tui.prompt_selected);
                    }
                    tui.prompt_selected = 0;
                    return Outcome::Continue;
                }
                // Esc on a prompt is Cancel, which is always last
                TuiEvent::Escape => {
                    if let Some(prompt) = self.scene.top_overlay() {
                        prompt.choose(len.saturating_sub(1));
                    }
                    tui.prompt_selected = 0;
                    return Outcome::Continue;
                }
                _ => {}
            }
        }

        let step = match event {
            TuiEvent::ForceQuit | TuiEvent::Command('q') => return Outcome::Quit,
            TuiEvent::Resize | TuiEvent::CursorUp | TuiEvent::CursorDown | TuiEvent::Submit => {
                return Outcome::Continue;
            }
            TuiEvent::Escape if self.scene.overlays().is_empty() => DemoStep::Back,
            TuiEvent::Escape => DemoStep::Dismiss,
            TuiEvent::Back => DemoStep::Back,
            TuiEvent::Command('l') => {
                spawn_link(self.home.id());
                tui.status_message = "deep link requested from a worker".to_string();
                return Outcome::Continue;
            }
            TuiEvent::Command(c) => match DemoStep::from_key(c) {
                Some(step) => step,
                None => return Outcome::Continue,
            },
        };
        tui.status_message = format!("{step:?}");
        self.home.perform(step);
        Outcome::Continue
    }

    /// Per-tick housekeeping. Returns true if anything changed.
    fn tick(&self, tui: &mut TuiState) -> bool {
        let jobs = self.navigator.run_pending();
        let transitions = self.scene.finish_transitions();
        let flash = self.haptics.take_flash();
        if tui.alert != flash {
            tui.alert = flash;
            return true;
        }
        jobs > 0 || transitions > 0
    }
}

/// A deep link that arrives on a tokio worker, the way a push
/// notification would.
fn spawn_deep_link(handle: NavigatorHandle, home: CoordinatorId, path: String, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        debug!("Worker posting deep link {}", path);
        handle.perform(home, DemoStep::DeepLink(path));
    });
}

/// Starting the wizard from a worker goes through the executor on the UI thread.
fn spawn_wizard(handle: NavigatorHandle, home: CoordinatorId) {
    tokio::spawn(async move {
        handle.execute::<WizardFlow>(home, WizardStep::Next);
    });
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let demo = Demo::new(&config);
    let mut tui = TuiState::default();
    let handle = demo.navigator.handle();

    spawn_deep_link(
        handle.clone(),
        demo.home.id(),
        "orders/42".to_string(),
        STARTUP_LINK_DELAY,
    );
    let link_handle = handle.clone();
    let spawn_link = move |home: CoordinatorId| {
        spawn_deep_link(link_handle.clone(), home, "inbox/7".to_string(), Duration::ZERO);
        spawn_wizard(link_handle.clone(), home);
    };

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            let view = demo.view();
            terminal.draw(|f| ui::draw_ui(f, &view, &tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(100));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if demo.handle(&mut tui, event, &spawn_link) == Outcome::Quit {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break;
        }

        if demo.tick(&mut tui) {
            needs_redraw = true;
        }
    }

    info!("Shutting down with {} live coordinator(s)", demo.navigator.live_count());
    ratatui::restore();
    Ok(())
}
