//! # Scene
//!
//! An in-memory screen host. A `Scene` is one window: a set of screens it
//! created plus a single presentation chain of overlays.
//!
//! ```text
//! base screens (roots, stacks, pushed pages)
//!   └─presented→ overlays[0] ─presented→ overlays[1] ─ ... ─→ topmost
//! ```
//!
//! The terminal adapter renders a scene, and tests drive one directly.
//! In deferred mode, stack pushes report an in-flight transition whose
//! callbacks run on `finish_transitions()`.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, warn};
use url::Url;

use crate::core::action::Tint;
use crate::host::ScreenFactory;
use crate::host::mail::ChoicePrompt;
use crate::host::screen::{
    Callback, PresentationStyle, Screen, ScreenRef, ScreenStack, TransitionCustomizer,
    TransitionNotifier, same_screen,
};

#[derive(Default)]
struct SceneState {
    overlays: RefCell<Vec<ScreenRef>>,
    screens: RefCell<Vec<Weak<SceneScreen>>>,
    deferred: Cell<bool>,
    pending: RefCell<Vec<Callback>>,
}

impl SceneState {
    fn position(&self, me: &SceneScreen) -> Option<usize> {
        self.overlays
            .borrow()
            .iter()
            .position(|o| std::ptr::addr_eq(Rc::as_ptr(o), me as *const SceneScreen))
    }

    fn presented_by(&self, me: &SceneScreen) -> Option<ScreenRef> {
        let overlays = self.overlays.borrow();
        match self.position(me) {
            Some(i) => overlays.get(i + 1).cloned(),
            None => overlays.first().cloned(),
        }
    }

    fn find(&self, screen: &ScreenRef) -> Option<Rc<SceneScreen>> {
        self.screens
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .find(|s| std::ptr::addr_eq(Rc::as_ptr(screen), Rc::as_ptr(s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenKind {
    Page,
    Stack,
    Browser { url: Url, tint: Option<Tint> },
    Prompt,
    Composer,
}

/// A screen living in a `Scene`.
pub struct SceneScreen {
    scene: Weak<SceneState>,
    title: String,
    kind: ScreenKind,
    lines: Vec<String>,
    style: Cell<Option<PresentationStyle>>,
    transition: RefCell<Option<Rc<dyn TransitionCustomizer>>>,
    retained: RefCell<Vec<Rc<dyn Any>>>,
    stack: RefCell<Vec<ScreenRef>>,
    prompt: RefCell<Option<ChoicePrompt>>,
}

#[derive(Clone, Default)]
pub struct Scene {
    state: Rc<SceneState>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene whose stack pushes complete only on `finish_transitions()`.
    pub fn deferred() -> Self {
        let scene = Self::default();
        scene.state.deferred.set(true);
        scene
    }

    pub fn set_deferred(&self, deferred: bool) {
        self.state.deferred.set(deferred);
    }

    fn make(&self, title: &str, kind: ScreenKind, lines: Vec<String>) -> Rc<SceneScreen> {
        let screen = Rc::new(SceneScreen {
            scene: Rc::downgrade(&self.state),
            title: title.to_string(),
            kind,
            lines,
            style: Cell::new(None),
            transition: RefCell::new(None),
            retained: RefCell::new(Vec::new()),
            stack: RefCell::new(Vec::new()),
            prompt: RefCell::new(None),
        });
        let mut screens = self.state.screens.borrow_mut();
        screens.retain(|s| s.strong_count() > 0);
        screens.push(Rc::downgrade(&screen));
        screen
    }

    pub fn page(&self, title: &str, lines: &[&str]) -> Rc<SceneScreen> {
        let lines = lines.iter().map(|l| l.to_string()).collect();
        self.make(title, ScreenKind::Page, lines)
    }

    /// A stack-shaped container holding `screens`, bottom first.
    pub fn stack(&self, title: &str, screens: Vec<ScreenRef>) -> Rc<SceneScreen> {
        let stack = self.make(title, ScreenKind::Stack, Vec::new());
        *stack.stack.borrow_mut() = screens;
        stack
    }

    pub fn composer(&self, title: &str, lines: Vec<String>) -> Rc<SceneScreen> {
        self.make(title, ScreenKind::Composer, lines)
    }

    /// Find the scene screen behind a handle.
    pub fn find(&self, screen: &ScreenRef) -> Option<Rc<SceneScreen>> {
        self.state.find(screen)
    }

    pub fn overlays(&self) -> Vec<ScreenRef> {
        self.state.overlays.borrow().clone()
    }

    pub fn top_overlay(&self) -> Option<Rc<SceneScreen>> {
        let last = self.state.overlays.borrow().last().cloned()?;
        self.find(&last)
    }

    pub fn pending_transitions(&self) -> usize {
        self.state.pending.borrow().len()
    }

    /// Complete every in-flight transition. Returns how many callbacks ran.
    pub fn finish_transitions(&self) -> usize {
        let pending: Vec<Callback> = self.state.pending.borrow_mut().drain(..).collect();
        let count = pending.len();
        for callback in pending {
            callback();
        }
        count
    }
}

impl ScreenFactory for Scene {
    fn screen(&self, title: &str, lines: Vec<String>) -> ScreenRef {
        self.make(title, ScreenKind::Page, lines)
    }

    fn browser(&self, url: &Url, style: PresentationStyle, tint: Option<Tint>) -> ScreenRef {
        let screen = self.make(
            url.host_str().unwrap_or("Browser"),
            ScreenKind::Browser {
                url: url.clone(),
                tint,
            },
            vec![url.to_string()],
        );
        screen.style.set(Some(style));
        screen
    }

    fn choice_prompt(&self, prompt: ChoicePrompt) -> ScreenRef {
        let lines = prompt.labels().iter().map(|l| l.to_string()).collect();
        let screen = self.make(&prompt.title, ScreenKind::Prompt, lines);
        *screen.prompt.borrow_mut() = Some(prompt);
        screen
    }
}

impl SceneScreen {
    pub fn kind(&self) -> &ScreenKind {
        &self.kind
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn style(&self) -> Option<PresentationStyle> {
        self.style.get()
    }

    pub fn transition_name(&self) -> Option<String> {
        self.transition.borrow().as_ref().map(|t| t.name().to_string())
    }

    pub fn retained_count(&self) -> usize {
        self.retained.borrow().len()
    }

    /// Pick option `index` of a prompt screen: the prompt dismisses itself,
    /// then runs the option's handler.
    pub fn choose(&self, index: usize) -> bool {
        let Some(prompt) = self.prompt.borrow_mut().take() else {
            return false;
        };
        self.dismiss(false, None);
        prompt.choose(index)
    }

    fn fire(&self, completion: Option<Callback>) {
        if let Some(completion) = completion {
            completion();
        }
    }
}

impl Screen for SceneScreen {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn presented(&self) -> Option<ScreenRef> {
        self.scene.upgrade()?.presented_by(self)
    }

    fn present(
        &self,
        screen: ScreenRef,
        style: PresentationStyle,
        _animated: bool,
        completion: Option<Callback>,
    ) {
        let Some(scene) = self.scene.upgrade() else {
            return;
        };
        if let Some(existing) = scene.presented_by(self) {
            warn!(
                "{} is already presenting {}, ignoring present of {}",
                self.title,
                existing.title(),
                screen.title()
            );
            return;
        }
        debug!("{} presents {} ({})", self.title, screen.title(), style.label());
        if let Some(target) = scene.find(&screen)
            && target.style.get().is_none()
        {
            target.style.set(Some(style));
        }
        scene.overlays.borrow_mut().push(screen);
        self.fire(completion);
    }

    fn dismiss(&self, _animated: bool, completion: Option<Callback>) {
        let Some(scene) = self.scene.upgrade() else {
            return;
        };
        let keep = match scene.position(self) {
            Some(i) if scene.overlays.borrow().len() > i + 1 => i + 1,
            Some(i) => i,
            None => 0,
        };
        let removed: Vec<ScreenRef> = scene.overlays.borrow_mut().drain(keep..).collect();
        debug!("{} dismissed {} overlay(s)", self.title, removed.len());
        // Dropped outside the borrow: a released screen may release a coordinator.
        drop(removed);
        self.fire(completion);
    }

    fn set_transition(&self, customizer: Rc<dyn TransitionCustomizer>) {
        *self.transition.borrow_mut() = Some(customizer);
    }

    fn as_stack(&self) -> Option<&dyn ScreenStack> {
        match self.kind {
            ScreenKind::Stack => Some(self),
            _ => None,
        }
    }

    fn retain(&self, owner: Rc<dyn Any>) {
        self.retained.borrow_mut().push(owner);
    }
}

impl ScreenStack for SceneScreen {
    fn push(&self, screen: ScreenRef, _animated: bool) {
        debug!("{} push {}", self.title, screen.title());
        self.stack.borrow_mut().push(screen);
    }

    fn pop(&self, _animated: bool) -> Option<ScreenRef> {
        let mut stack = self.stack.borrow_mut();
        if stack.len() > 1 { stack.pop() } else { None }
    }

    fn pop_to(&self, screen: &ScreenRef, _animated: bool) -> Vec<ScreenRef> {
        let mut stack = self.stack.borrow_mut();
        match stack.iter().position(|s| same_screen(s, screen)) {
            Some(i) => stack.drain(i + 1..).collect(),
            None => Vec::new(),
        }
    }

    fn pop_to_root(&self, _animated: bool) -> Vec<ScreenRef> {
        let mut stack = self.stack.borrow_mut();
        if stack.len() > 1 {
            stack.drain(1..).collect()
        } else {
            Vec::new()
        }
    }

    fn set(&self, screens: Vec<ScreenRef>, _animated: bool) {
        let old = std::mem::replace(&mut *self.stack.borrow_mut(), screens);
        drop(old);
    }

    fn screens(&self) -> Vec<ScreenRef> {
        self.stack.borrow().clone()
    }

    fn transition(&self) -> Option<Rc<dyn TransitionNotifier>> {
        let scene = self.scene.upgrade()?;
        if !scene.deferred.get() {
            return None;
        }
        Some(Rc::new(DeferredTransition {
            scene: Rc::downgrade(&scene),
        }))
    }
}

struct DeferredTransition {
    scene: Weak<SceneState>,
}

impl TransitionNotifier for DeferredTransition {
    fn on_complete(&self, callback: Callback) {
        match self.scene.upgrade() {
            Some(scene) => scene.pending.borrow_mut().push(callback),
            None => callback(),
        }
    }
}
