//! # Terminal Device
//!
//! Stand-ins for the platform services a phone would provide. A terminal
//! can't open `googlegmail://` or vibrate, so each call is written to the
//! activity log shown at the bottom of the screen.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use log::info;
use url::Url;

use crate::host::composer::{MailDraft, MessageComposer, SmsDraft};
use crate::host::os::{Haptics, OpenOptions, OsBridge};
use crate::host::scene::Scene;
use crate::host::screen::{ResultCallback, ScreenRef};

const ACTIVITY_CAPACITY: usize = 50;

/// Mail apps the demo pretends are installed.
pub const INSTALLED_SCHEMES: &[&str] = &["googlegmail", "ms-outlook", "fastmail"];

/// Bounded, shared log of device activity.
#[derive(Clone, Default)]
pub struct ActivityLog {
    entries: Rc<RefCell<VecDeque<String>>>,
}

impl ActivityLog {
    pub fn push(&self, entry: impl Into<String>) {
        let entry = entry.into();
        info!("Device: {}", entry);
        let mut entries = self.entries.borrow_mut();
        if entries.len() == ACTIVITY_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        let entries = self.entries.borrow();
        entries.iter().skip(entries.len().saturating_sub(n)).cloned().collect()
    }
}

pub struct TerminalOs {
    log: ActivityLog,
    installed: Vec<String>,
}

impl TerminalOs {
    pub fn new(log: ActivityLog) -> Self {
        Self {
            log,
            installed: INSTALLED_SCHEMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl OsBridge for TerminalOs {
    fn open(&self, url: &Url, options: OpenOptions, completion: Option<ResultCallback>) {
        if options.universal_links_only {
            self.log.push(format!("open {url} (universal links only)"));
        } else {
            self.log.push(format!("open {url}"));
        }
        if let Some(completion) = completion {
            completion(true);
        }
    }

    fn can_open(&self, url: &Url) -> bool {
        self.installed.iter().any(|s| s == url.scheme())
    }
}

/// Mail composes into a scene screen. The terminal has no SMS.
pub struct TerminalComposer {
    scene: Scene,
}

impl TerminalComposer {
    pub fn new(scene: Scene) -> Self {
        Self { scene }
    }
}

impl MessageComposer for TerminalComposer {
    fn can_compose_mail(&self) -> bool {
        true
    }

    fn can_compose_sms(&self) -> bool {
        false
    }

    fn compose_mail(&self, draft: &MailDraft) -> Option<ScreenRef> {
        let lines = vec![
            format!("To: {}", draft.recipients.join(", ")),
            format!("Subject: {}", draft.subject),
            String::new(),
            draft.body.clone(),
        ];
        Some(self.scene.composer("New Message", lines))
    }

    fn compose_sms(&self, _draft: &SmsDraft) -> Option<ScreenRef> {
        None
    }
}

pub struct TerminalHaptics {
    log: ActivityLog,
    pending: Cell<bool>,
}

impl TerminalHaptics {
    pub fn new(log: ActivityLog) -> Self {
        Self {
            log,
            pending: Cell::new(false),
        }
    }

    /// True once after each error buzz; the title bar flashes on it.
    pub fn take_flash(&self) -> bool {
        self.pending.replace(false)
    }
}

impl Haptics for TerminalHaptics {
    fn error(&self) {
        self.log.push("haptic: error");
        self.pending.set(true);
    }
}
