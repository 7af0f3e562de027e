//! # Step Actions
//!
//! A coordinator translates each step into exactly one `StepAction`.
//! Actions fall into three families:
//!
//! ```text
//! StepAction
//! ├── Flow(FlowAction)    push / pop / pop_to / pop_to_root / set   (needs a stack)
//! ├── Modal(ModalAction)  present / dismiss / close / device actions (needs a root)
//! └── None                nothing to do (the step only spawned a child flow)
//! ```
//!
//! Actions own their callbacks (`FnOnce`), so an action can only ever be
//! routed once.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::host::composer::{MailDraft, SmsDraft};
use crate::host::mail::MailSelection;
use crate::host::screen::{
    Callback, PresentationStyle, ResultCallback, ScreenRef, TransitionCustomizer,
};

/// Which handler an action is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFamily {
    Flow,
    Modal,
    None,
}

pub enum StepAction {
    Flow(FlowAction),
    Modal(ModalAction),
    None,
}

/// Stack-mutating actions.
pub enum FlowAction {
    Push(ScreenRef),
    PushWithCompletion(ScreenRef, Callback),
    Pop,
    PopTo(ScreenRef),
    PopToRoot,
    Set(Vec<ScreenRef>),
}

/// Overlay-mutating and device-integration actions.
pub enum ModalAction {
    Present {
        screen: ScreenRef,
        style: PresentationStyle,
        transition: Option<Rc<dyn TransitionCustomizer>>,
    },
    Dismiss,
    DismissWithCompletion(Callback),
    /// Pop if the root is a stack, otherwise dismiss.
    Close,
    OpenBrowser {
        url: Url,
        style: PresentationStyle,
        tint: Option<Tint>,
    },
    OpenUniversalLink {
        url: Url,
        universal_links_only: bool,
        completion: Option<ResultCallback>,
    },
    PlaceCall(String),
    SendSms {
        draft: SmsDraft,
        on_failure: Option<Callback>,
    },
    SendMail {
        draft: MailDraft,
        on_failure: Option<Callback>,
    },
    OpenMailInbox {
        selection: MailSelection,
        completion: Option<Callback>,
    },
    OpenSystemSettings,
    OpenMessagingApp,
}

impl StepAction {
    pub fn family(&self) -> ActionFamily {
        match self {
            StepAction::Flow(_) => ActionFamily::Flow,
            StepAction::Modal(_) => ActionFamily::Modal,
            StepAction::None => ActionFamily::None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StepAction::Flow(action) => action.name(),
            StepAction::Modal(action) => action.name(),
            StepAction::None => "none",
        }
    }

    // ── Flow constructors ───────────────────────────────────────────────

    pub fn push(screen: ScreenRef) -> Self {
        FlowAction::Push(screen).into()
    }

    pub fn push_then(screen: ScreenRef, completion: impl FnOnce() + 'static) -> Self {
        FlowAction::PushWithCompletion(screen, Box::new(completion)).into()
    }

    pub fn pop() -> Self {
        FlowAction::Pop.into()
    }

    pub fn pop_to(screen: ScreenRef) -> Self {
        FlowAction::PopTo(screen).into()
    }

    pub fn pop_to_root() -> Self {
        FlowAction::PopToRoot.into()
    }

    pub fn set(screens: Vec<ScreenRef>) -> Self {
        FlowAction::Set(screens).into()
    }

    // ── Modal constructors ──────────────────────────────────────────────

    pub fn present(screen: ScreenRef, style: PresentationStyle) -> Self {
        ModalAction::Present {
            screen,
            style,
            transition: None,
        }
        .into()
    }

    pub fn present_with(
        screen: ScreenRef,
        style: PresentationStyle,
        transition: Rc<dyn TransitionCustomizer>,
    ) -> Self {
        ModalAction::Present {
            screen,
            style,
            transition: Some(transition),
        }
        .into()
    }

    pub fn dismiss() -> Self {
        ModalAction::Dismiss.into()
    }

    pub fn dismiss_then(completion: impl FnOnce() + 'static) -> Self {
        ModalAction::DismissWithCompletion(Box::new(completion)).into()
    }

    pub fn close() -> Self {
        ModalAction::Close.into()
    }

    pub fn open_browser(url: Url, style: PresentationStyle, tint: Option<Tint>) -> Self {
        ModalAction::OpenBrowser { url, style, tint }.into()
    }

    pub fn open_link(
        url: Url,
        universal_links_only: bool,
        completion: Option<ResultCallback>,
    ) -> Self {
        ModalAction::OpenUniversalLink {
            url,
            universal_links_only,
            completion,
        }
        .into()
    }

    pub fn call(number: impl Into<String>) -> Self {
        ModalAction::PlaceCall(number.into()).into()
    }

    pub fn send_sms(draft: SmsDraft, on_failure: Option<Callback>) -> Self {
        ModalAction::SendSms { draft, on_failure }.into()
    }

    pub fn send_mail(draft: MailDraft, on_failure: Option<Callback>) -> Self {
        ModalAction::SendMail { draft, on_failure }.into()
    }

    pub fn open_mail_inbox(selection: MailSelection, completion: Option<Callback>) -> Self {
        ModalAction::OpenMailInbox {
            selection,
            completion,
        }
        .into()
    }

    pub fn open_settings() -> Self {
        ModalAction::OpenSystemSettings.into()
    }

    pub fn open_messaging() -> Self {
        ModalAction::OpenMessagingApp.into()
    }
}

impl FlowAction {
    pub fn name(&self) -> &'static str {
        match self {
            FlowAction::Push(_) => "push",
            FlowAction::PushWithCompletion(..) => "push_with_completion",
            FlowAction::Pop => "pop",
            FlowAction::PopTo(_) => "pop_to",
            FlowAction::PopToRoot => "pop_to_root",
            FlowAction::Set(_) => "set",
        }
    }
}

impl ModalAction {
    pub fn name(&self) -> &'static str {
        match self {
            ModalAction::Present { .. } => "present",
            ModalAction::Dismiss => "dismiss",
            ModalAction::DismissWithCompletion(_) => "dismiss_with_completion",
            ModalAction::Close => "close",
            ModalAction::OpenBrowser { .. } => "open_browser",
            ModalAction::OpenUniversalLink { .. } => "open_universal_link",
            ModalAction::PlaceCall(_) => "place_call",
            ModalAction::SendSms { .. } => "send_sms",
            ModalAction::SendMail { .. } => "send_mail",
            ModalAction::OpenMailInbox { .. } => "open_mail_inbox",
            ModalAction::OpenSystemSettings => "open_system_settings",
            ModalAction::OpenMessagingApp => "open_messaging_app",
        }
    }
}

impl From<FlowAction> for StepAction {
    fn from(action: FlowAction) -> Self {
        StepAction::Flow(action)
    }
}

impl From<ModalAction> for StepAction {
    fn from(action: ModalAction) -> Self {
        StepAction::Modal(action)
    }
}

impl fmt::Debug for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StepAction::{}", self.name())
    }
}

// ============================================================================
// Tint
// ============================================================================

/// An RGB accent color, written `#RRGGBB` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TintParseError(String);

impl fmt::Display for TintParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid tint '{}': expected #RRGGBB", self.0)
    }
}

impl std::error::Error for TintParseError {}

impl FromStr for Tint {
    type Err = TintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(TintParseError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| TintParseError(s.to_string()))
        };
        Ok(Tint {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for Tint {
    type Error = TintParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tint> for String {
    fn from(tint: Tint) -> Self {
        tint.to_string()
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
