//! # Screen Host Interfaces
//!
//! The core never builds or draws a screen. It receives opaque `ScreenRef`
//! handles and drives them through these traits, which mirror what a
//! retained-mode view-controller host offers:
//!
//! ```text
//! root (Screen)                       presentation chain
//! ├── as_stack() → ScreenStack        root ─presented→ A ─presented→ B
//! │   push / pop / pop_to / set                                     ▲
//! │   transition() → notifier                                   topmost
//! └── presented() / present() / dismiss()
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A one-shot callback. Every callback in this crate fires at most once.
pub type Callback = Box<dyn FnOnce()>;

/// A one-shot callback reporting success or failure.
pub type ResultCallback = Box<dyn FnOnce(bool)>;

/// Shared, opaque handle to a host screen. Identity is pointer identity.
pub type ScreenRef = Rc<dyn Screen>;

/// How an overlay is shown. Hosts map these onto whatever they support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStyle {
    #[default]
    Automatic,
    FullScreen,
    PageSheet,
    FormSheet,
    OverFullScreen,
    OverCurrentContext,
    Popover,
}

impl PresentationStyle {
    pub fn label(&self) -> &'static str {
        match self {
            PresentationStyle::Automatic => "automatic",
            PresentationStyle::FullScreen => "full screen",
            PresentationStyle::PageSheet => "page sheet",
            PresentationStyle::FormSheet => "form sheet",
            PresentationStyle::OverFullScreen => "over full screen",
            PresentationStyle::OverCurrentContext => "over current context",
            PresentationStyle::Popover => "popover",
        }
    }
}

/// A screen the host can show, present from, and dismiss.
pub trait Screen {
    /// Human-readable name, used in logs.
    fn title(&self) -> String;

    /// The overlay this screen is currently presenting, if any.
    fn presented(&self) -> Option<ScreenRef>;

    /// Present `screen` as an overlay on top of this one.
    fn present(
        &self,
        screen: ScreenRef,
        style: PresentationStyle,
        animated: bool,
        completion: Option<Callback>,
    );

    /// Dismiss the overlay this screen presents, or this screen itself
    /// when it presents nothing.
    fn dismiss(&self, animated: bool, completion: Option<Callback>);

    /// Attach a custom transition to be used when this screen is presented.
    fn set_transition(&self, _customizer: Rc<dyn TransitionCustomizer>) {}

    /// Stack-shaped containers return themselves here.
    fn as_stack(&self) -> Option<&dyn ScreenStack> {
        None
    }

    /// Keep `owner` alive for as long as this screen lives.
    fn retain(&self, _owner: Rc<dyn Any>) {}
}

/// A push/pop screen container.
pub trait ScreenStack {
    fn push(&self, screen: ScreenRef, animated: bool);
    fn pop(&self, animated: bool) -> Option<ScreenRef>;
    fn pop_to(&self, screen: &ScreenRef, animated: bool) -> Vec<ScreenRef>;
    fn pop_to_root(&self, animated: bool) -> Vec<ScreenRef>;
    fn set(&self, screens: Vec<ScreenRef>, animated: bool);
    fn screens(&self) -> Vec<ScreenRef>;

    fn top(&self) -> Option<ScreenRef> {
        self.screens().last().cloned()
    }

    /// Notifier for the transition currently in flight, if the host animates.
    fn transition(&self) -> Option<Rc<dyn TransitionNotifier>> {
        None
    }
}

/// Reports the end of an in-flight stack transition.
pub trait TransitionNotifier {
    fn on_complete(&self, callback: Callback);
}

/// Opaque transition customization. The core only attaches it to a screen.
pub trait TransitionCustomizer {
    fn name(&self) -> &str;
}

impl fmt::Debug for dyn Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Screen({})", self.title())
    }
}

/// Pointer identity for screen handles.
pub fn same_screen(a: &ScreenRef, b: &ScreenRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Walk the presentation chain from `root` to the screen presenting nothing.
pub fn topmost(root: &ScreenRef) -> ScreenRef {
    let mut current = root.clone();
    while let Some(next) = current.presented() {
        current = next;
    }
    current
}
