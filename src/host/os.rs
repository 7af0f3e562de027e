//! # Host OS Bridge
//!
//! One-shot, side-effecting calls into the operating system: opening URLs,
//! probing URL schemes, and haptic feedback.

use url::Url;

use crate::host::screen::ResultCallback;

/// URL opened by `OpenSystemSettings`.
pub const SETTINGS_URL: &str = "app-settings:";
/// URL opened by `OpenMessagingApp`.
pub const MESSAGING_URL: &str = "sms:";
/// Scheme used to prompt before dialing.
pub const DIAL_PROMPT_SCHEME: &str = "telprompt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    /// Only succeed if an installed native app claims the URL.
    pub universal_links_only: bool,
}

pub trait OsBridge {
    /// Ask the OS to open `url`. The completion fires exactly once.
    fn open(&self, url: &Url, options: OpenOptions, completion: Option<ResultCallback>);

    fn can_open(&self, url: &Url) -> bool;
}

/// Fire-and-forget haptic signals.
pub trait Haptics {
    fn error(&self);
}

/// Build the dial-prompt URL for a phone number. Whitespace is stripped.
pub fn dial_url(number: &str) -> Option<Url> {
    let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return None;
    }
    Url::parse(&format!("{DIAL_PROMPT_SCHEME}://{digits}")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dial_url_strips_whitespace() {
        let url = dial_url(" 555 123\t4567 ").unwrap();
        assert_eq!(url.scheme(), "telprompt");
        assert_eq!(url.as_str(), "telprompt://5551234567");
    }

    #[test]
    fn test_dial_url_empty_number() {
        assert!(dial_url("   ").is_none());
    }

    #[test]
    fn test_fixed_urls_parse() {
        assert!(Url::parse(SETTINGS_URL).is_ok());
        assert!(Url::parse(MESSAGING_URL).is_ok());
    }
}
