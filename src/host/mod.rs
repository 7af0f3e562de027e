//! # Host Collaborators
//!
//! Everything the coordinator core needs from the platform, expressed as
//! traits. The core holds these behind one shared `Host` so that every
//! coordinator on a UI thread talks to the same instances.
//!
//! ## Modules
//!
//! - [`screen`]: `Screen` / `ScreenStack`, the retained screen hierarchy
//! - [`os`]: URL opening, scheme probing, haptics
//! - [`composer`]: mail and SMS compose screens
//! - [`mail`]: installed mail client directory and the inbox picker
//! - [`scene`]: an in-memory host implementing the screen traits

pub mod composer;
pub mod mail;
pub mod os;
pub mod scene;
pub mod screen;

use std::rc::Rc;

use url::Url;

use crate::core::action::Tint;
use crate::host::composer::MessageComposer;
use crate::host::mail::{ChoicePrompt, MailClientDirectory};
use crate::host::os::{Haptics, OsBridge};
use crate::host::screen::{PresentationStyle, ScreenRef};

/// Builds screens for the core and for flows that only know the host.
pub trait ScreenFactory {
    /// A plain content screen.
    fn screen(&self, title: &str, lines: Vec<String>) -> ScreenRef;

    /// An in-app browser showing `url`.
    fn browser(&self, url: &Url, style: PresentationStyle, tint: Option<Tint>) -> ScreenRef;

    /// A sheet listing the options of `prompt`.
    fn choice_prompt(&self, prompt: ChoicePrompt) -> ScreenRef;
}

/// The process-wide collaborators shared by every coordinator.
#[derive(Clone)]
pub struct Host {
    pub os: Rc<dyn OsBridge>,
    pub composer: Rc<dyn MessageComposer>,
    pub haptics: Rc<dyn Haptics>,
    pub factory: Rc<dyn ScreenFactory>,
    pub mail: MailClientDirectory,
}
