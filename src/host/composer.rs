//! # Message Composer
//!
//! Builds mail and SMS compose screens. The navigator shares a single
//! composer instance with every coordinator it creates.

use crate::host::screen::ScreenRef;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailDraft {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmsDraft {
    pub recipients: Vec<String>,
    pub body: String,
}

pub trait MessageComposer {
    fn can_compose_mail(&self) -> bool;
    fn can_compose_sms(&self) -> bool;
    fn compose_mail(&self, draft: &MailDraft) -> Option<ScreenRef>;
    fn compose_sms(&self, draft: &SmsDraft) -> Option<ScreenRef>;
}

/// Which kind of message a compose request is for.
#[derive(Debug, Clone)]
pub enum Draft {
    Mail(MailDraft),
    Sms(SmsDraft),
}

impl Draft {
    pub fn kind(&self) -> &'static str {
        match self {
            Draft::Mail(_) => "mail",
            Draft::Sms(_) => "sms",
        }
    }

    /// The compose screen, or `None` if this device cannot send this kind.
    pub fn compose(&self, composer: &dyn MessageComposer) -> Option<ScreenRef> {
        match self {
            Draft::Mail(draft) if composer.can_compose_mail() => composer.compose_mail(draft),
            Draft::Sms(draft) if composer.can_compose_sms() => composer.compose_sms(draft),
            _ => None,
        }
    }
}
