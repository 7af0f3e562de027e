//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use url::Url;

use crate::core::action::StepAction;
use crate::core::coordinator::CoordinatorRef;
use crate::core::navigator::Navigator;
use crate::core::router::RouterOptions;
use crate::core::step::StepTranslator;
use crate::host::Host;
use crate::host::composer::{MailDraft, MessageComposer, SmsDraft};
use crate::host::mail::MailClientDirectory;
use crate::host::os::{Haptics, OpenOptions, OsBridge};
use crate::host::scene::Scene;
use crate::host::screen::{ResultCallback, ScreenRef};

/// An OS bridge that records every URL it is asked to open.
pub struct RecordingOs {
    schemes: Vec<String>,
    opened: RefCell<Vec<(String, OpenOptions)>>,
    pub succeed: Cell<bool>,
}

impl RecordingOs {
    /// `can_open` answers true for these schemes only.
    pub fn with_schemes(schemes: &[&str]) -> Self {
        Self {
            schemes: schemes.iter().map(|s| s.to_string()).collect(),
            opened: RefCell::new(Vec::new()),
            succeed: Cell::new(true),
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn last_options(&self) -> Option<OpenOptions> {
        self.opened.borrow().last().map(|(_, options)| *options)
    }
}

impl OsBridge for RecordingOs {
    fn open(&self, url: &Url, options: OpenOptions, completion: Option<ResultCallback>) {
        self.opened.borrow_mut().push((url.to_string(), options));
        if let Some(completion) = completion {
            completion(self.succeed.get());
        }
    }

    fn can_open(&self, url: &Url) -> bool {
        self.schemes.iter().any(|s| s == url.scheme())
    }
}

pub struct FakeComposer {
    pub scene: Scene,
    pub mail: Cell<bool>,
    pub sms: Cell<bool>,
}

impl MessageComposer for FakeComposer {
    fn can_compose_mail(&self) -> bool {
        self.mail.get()
    }

    fn can_compose_sms(&self) -> bool {
        self.sms.get()
    }

    fn compose_mail(&self, draft: &MailDraft) -> Option<ScreenRef> {
        Some(self.scene.composer("mail", vec![draft.subject.clone()]))
    }

    fn compose_sms(&self, draft: &SmsDraft) -> Option<ScreenRef> {
        Some(self.scene.composer("sms", vec![draft.body.clone()]))
    }
}

#[derive(Default)]
pub struct RecordingHaptics {
    pub errors: Cell<u32>,
}

impl Haptics for RecordingHaptics {
    fn error(&self) {
        self.errors.set(self.errors.get() + 1);
    }
}

/// A navigator wired to a `Scene` and recording fakes.
pub struct Fixture {
    pub scene: Scene,
    pub os: Rc<RecordingOs>,
    pub composer: Rc<FakeComposer>,
    pub haptics: Rc<RecordingHaptics>,
    pub navigator: Navigator,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_scene(Scene::new())
    }

    pub fn with_scene(scene: Scene) -> Self {
        Self::build(scene, MailClientDirectory::default())
    }

    /// A fixture whose host probes `mail` instead of the default directory.
    pub fn with_mail(mail: MailClientDirectory) -> Self {
        Self::build(Scene::new(), mail)
    }

    fn build(scene: Scene, mail: MailClientDirectory) -> Self {
        let os = Rc::new(RecordingOs::with_schemes(&["googlegmail", "ms-outlook"]));
        let composer = Rc::new(FakeComposer {
            scene: scene.clone(),
            mail: Cell::new(true),
            sms: Cell::new(true),
        });
        let haptics = Rc::new(RecordingHaptics::default());
        let host = Host {
            os: os.clone(),
            composer: composer.clone(),
            haptics: haptics.clone(),
            factory: Rc::new(scene.clone()),
            mail,
        };
        Self {
            scene,
            os,
            composer,
            haptics,
            navigator: Navigator::new(host, RouterOptions::default()),
        }
    }

    /// A stack container with one page per title.
    pub fn stack(&self, titles: &[&str]) -> ScreenRef {
        let pages = titles
            .iter()
            .map(|t| self.scene.page(t, &[]) as ScreenRef)
            .collect();
        self.scene.stack("nav", pages)
    }

    pub fn page(&self, title: &str) -> ScreenRef {
        self.scene.page(title, &[])
    }
}

/// Records every step a translator receives and answers with a fixed action.
pub struct Recorder<S> {
    steps: Rc<RefCell<Vec<S>>>,
    action: fn() -> StepAction,
}

impl<S: Clone + 'static> Recorder<S> {
    pub fn new() -> Self {
        Self::with_action(|| StepAction::None)
    }

    pub fn with_action(action: fn() -> StepAction) -> Self {
        Self {
            steps: Rc::new(RefCell::new(Vec::new())),
            action,
        }
    }

    pub fn steps(&self) -> Vec<S> {
        self.steps.borrow().clone()
    }

    pub fn translator(&self) -> impl StepTranslator<S> + 'static {
        let steps = self.steps.clone();
        let action = self.action;
        move |step: S, _coordinator: &CoordinatorRef| {
            steps.borrow_mut().push(step);
            action()
        }
    }
}
