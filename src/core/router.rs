//! # Action Router
//!
//! Executes a `StepAction` against a coordinator's root screen.
//!
//! ```text
//! route(action)
//! ├── Flow   → handle_flow   root.as_stack()? else MissingRoot
//! ├── Modal  → handle_modal  topmost(root) for present / dismiss
//! └── None   → logged, nothing happens
//! ```
//!
//! Device failures (no mail account, no SMS) are reported through the
//! callbacks carried by the action. Only `MissingRoot` comes back as an
//! error, and the coordinator logs it.

use std::rc::Rc;

use log::{debug, info, warn};

use crate::core::action::{FlowAction, ModalAction, StepAction, Tint};
use crate::core::error::NavigationError;
use crate::host::Host;
use crate::host::composer::Draft;
use crate::host::os::{self, OpenOptions};
use crate::host::screen::{
    Callback, PresentationStyle, ScreenRef, ScreenStack, TransitionCustomizer, topmost,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterOptions {
    /// Ask the host to animate transitions.
    pub animated: bool,
    /// Tint for in-app browsers that don't specify one.
    pub browser_tint: Option<Tint>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            animated: true,
            browser_tint: None,
        }
    }
}

pub struct ActionRouter {
    host: Host,
    options: RouterOptions,
}

fn missing_root(owner: &str) -> NavigationError {
    NavigationError::MissingRoot {
        coordinator: owner.to_string(),
    }
}

impl ActionRouter {
    pub fn new(host: Host, options: RouterOptions) -> Self {
        Self { host, options }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn options(&self) -> RouterOptions {
        self.options
    }

    /// Route `action` on behalf of the coordinator labelled `owner`.
    pub fn route(
        &self,
        owner: &str,
        root: Option<&ScreenRef>,
        action: StepAction,
    ) -> Result<(), NavigationError> {
        match action {
            StepAction::Flow(action) => self.handle_flow(owner, root, action),
            StepAction::Modal(action) => self.handle_modal(owner, root, action),
            StepAction::None => {
                debug!("{owner}: action not routed (neither flow nor modal)");
                Ok(())
            }
        }
    }

    // ========================================================================
    // Flow
    // ========================================================================

    pub fn handle_flow(
        &self,
        owner: &str,
        root: Option<&ScreenRef>,
        action: FlowAction,
    ) -> Result<(), NavigationError> {
        let root = root.ok_or_else(|| missing_root(owner))?;
        let stack = root.as_stack().ok_or_else(|| missing_root(owner))?;
        let animated = self.options.animated;
        debug!("{owner}: flow {}", action.name());

        match action {
            FlowAction::Push(screen) => stack.push(screen, animated),
            FlowAction::PushWithCompletion(screen, completion) => {
                stack.push(screen, animated);
                match stack.transition() {
                    Some(notifier) => notifier.on_complete(completion),
                    None => completion(),
                }
            }
            FlowAction::Pop => {
                if !at_root(stack) {
                    stack.pop(animated);
                }
            }
            FlowAction::PopTo(screen) => {
                if !at_root(stack) {
                    stack.pop_to(&screen, animated);
                }
            }
            FlowAction::PopToRoot => {
                stack.pop_to_root(animated);
            }
            FlowAction::Set(screens) => stack.set(screens, animated),
        }
        Ok(())
    }

    // ========================================================================
    // Modal
    // ========================================================================

    pub fn handle_modal(
        &self,
        owner: &str,
        root: Option<&ScreenRef>,
        action: ModalAction,
    ) -> Result<(), NavigationError> {
        debug!("{owner}: modal {}", action.name());
        let require = || root.ok_or_else(|| missing_root(owner));

        match action {
            ModalAction::Present {
                screen,
                style,
                transition,
            } => self.present(require()?, screen, style, transition),
            ModalAction::Dismiss => self.dismiss(require()?, None),
            ModalAction::DismissWithCompletion(completion) => {
                self.dismiss(require()?, Some(completion))
            }
            ModalAction::Close => {
                // Any flow failure falls back to dismiss, whatever the error.
                if let Err(e) = self.handle_flow(owner, root, FlowAction::Pop) {
                    debug!("{owner}: close falls back to dismiss ({e})");
                    self.dismiss(require()?, None);
                }
            }
            ModalAction::OpenBrowser { url, style, tint } => {
                let root = require()?;
                let tint = tint.or(self.options.browser_tint);
                let screen = self.host.factory.browser(&url, style, tint);
                info!("{owner}: opening in-app browser at {url}");
                self.present(root, screen, style, None);
            }
            ModalAction::OpenUniversalLink {
                url,
                universal_links_only,
                completion,
            } => {
                info!("{owner}: opening link {url} (universal only: {universal_links_only})");
                self.host.os.open(
                    &url,
                    OpenOptions {
                        universal_links_only,
                    },
                    completion,
                );
            }
            ModalAction::PlaceCall(number) => match os::dial_url(&number) {
                Some(url) => self.host.os.open(&url, OpenOptions::default(), None),
                None => debug!("{owner}: could not build a dial URL, ignoring"),
            },
            ModalAction::SendSms { draft, on_failure } => {
                self.compose(owner, root, Draft::Sms(draft), on_failure)?
            }
            ModalAction::SendMail { draft, on_failure } => {
                self.compose(owner, root, Draft::Mail(draft), on_failure)?
            }
            ModalAction::OpenMailInbox {
                selection,
                completion,
            } => {
                let prompt = self.host.mail.pick(self.host.os.clone(), selection, completion);
                if let Some(prompt) = prompt {
                    let Some(root) = root else {
                        // Nowhere to show the picker; cancelling still fires the completion.
                        prompt.cancel();
                        return Err(missing_root(owner));
                    };
                    let screen = self.host.factory.choice_prompt(prompt);
                    self.present(root, screen, PresentationStyle::Automatic, None);
                }
            }
            ModalAction::OpenSystemSettings => self.open_fixed(os::SETTINGS_URL),
            ModalAction::OpenMessagingApp => self.open_fixed(os::MESSAGING_URL),
        }
        Ok(())
    }

    /// Present `screen` from the topmost overlay above `root`.
    fn present(
        &self,
        root: &ScreenRef,
        screen: ScreenRef,
        style: PresentationStyle,
        transition: Option<Rc<dyn TransitionCustomizer>>,
    ) {
        if let Some(transition) = transition {
            screen.set_transition(transition);
        }
        topmost(root).present(screen, style, self.options.animated, None);
    }

    /// Dismiss whatever is on top right now, resolved fresh from `root`.
    fn dismiss(&self, root: &ScreenRef, completion: Option<Callback>) {
        topmost(root).dismiss(self.options.animated, completion);
    }

    fn compose(
        &self,
        owner: &str,
        root: Option<&ScreenRef>,
        draft: Draft,
        on_failure: Option<Callback>,
    ) -> Result<(), NavigationError> {
        match draft.compose(self.host.composer.as_ref()) {
            Some(screen) => {
                let root = root.ok_or_else(|| missing_root(owner))?;
                self.present(root, screen, PresentationStyle::Automatic, None);
            }
            None => {
                info!("{owner}: this device cannot compose {}", draft.kind());
                self.host.haptics.error();
                if let Some(on_failure) = on_failure {
                    on_failure();
                }
            }
        }
        Ok(())
    }

    fn open_fixed(&self, url: &str) {
        match url::Url::parse(url) {
            Ok(url) => self.host.os.open(&url, OpenOptions::default(), None),
            Err(e) => warn!("Invalid system URL {url}: {e}"),
        }
    }
}

fn at_root(stack: &dyn ScreenStack) -> bool {
    stack.screens().len() <= 1
}
