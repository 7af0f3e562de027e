//! # Demo Flows
//!
//! The sample application the terminal host drives. `HomeFlow` owns the
//! root stack; `WizardFlow` is a child flow started through the executor,
//! so pressing `w` twice reuses the same wizard instead of stacking two.
//!
//! ```text
//! HomeFlow (root stack)
//! ├── push / present / browser / mail / call / settings ...
//! └── execute::<WizardFlow>  ── pushes wizard pages, each retaining the wizard
//!                               (popping them all releases it)
//! ```

use log::{debug, info};
use url::Url;

use crate::core::action::{StepAction, Tint};
use crate::core::coordinator::{CoordinatorRef, FlowTag};
use crate::core::executor::Flow;
use crate::core::step::StepTranslator;
use crate::host::composer::{MailDraft, SmsDraft};
use crate::host::mail::MailSelection;
use crate::host::screen::{PresentationStyle, ScreenRef};

pub const HOME_TAG: FlowTag = FlowTag::new("home");

const HELP_URL: &str = "https://example.com/help";
const SUPPORT_PHONE: &str = "+1 555 0100";
const SUPPORT_EMAIL: &str = "support@example.com";

/// Everything the home flow can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoStep {
    Home,
    Detail,
    Sheet,
    Browser,
    Inbox(MailSelection),
    Email,
    Sms,
    Call,
    Settings,
    Messages,
    Wizard(WizardStep),
    /// A path arriving from outside the app, e.g. `orders/42`.
    DeepLink(String),
    Back,
    Dismiss,
    PopToRoot,
}

impl DemoStep {
    /// The key bindings shown on the home screen.
    pub const KEYS: &'static [(char, &'static str)] = &[
        ('d', "push a detail page"),
        ('p', "present a sheet"),
        ('b', "open help in the in-app browser"),
        ('a', "open mail inbox (automatic)"),
        ('m', "open mail inbox (choose app)"),
        ('e', "compose an email"),
        ('s', "send an SMS (unsupported here)"),
        ('c', "call support"),
        ('o', "open system settings"),
        ('t', "open messages"),
        ('w', "start or continue the wizard"),
        ('l', "simulate a deep link from a worker thread"),
        ('r', "pop to root"),
    ];

    pub fn from_key(c: char) -> Option<DemoStep> {
        let step = match c {
            'd' => DemoStep::Detail,
            'p' => DemoStep::Sheet,
            'b' => DemoStep::Browser,
            'a' => DemoStep::Inbox(MailSelection::Automatic),
            'm' => DemoStep::Inbox(MailSelection::Manual),
            'e' => DemoStep::Email,
            's' => DemoStep::Sms,
            'c' => DemoStep::Call,
            'o' => DemoStep::Settings,
            't' => DemoStep::Messages,
            'w' => DemoStep::Wizard(WizardStep::Next),
            'r' => DemoStep::PopToRoot,
            _ => return None,
        };
        Some(step)
    }
}

pub struct HomeFlow {
    default_style: PresentationStyle,
    browser_style: PresentationStyle,
    browser_tint: Option<Tint>,
    details: u32,
}

impl HomeFlow {
    pub fn new(
        default_style: PresentationStyle,
        browser_style: PresentationStyle,
        browser_tint: Option<Tint>,
    ) -> Self {
        Self {
            default_style,
            browser_style,
            browser_tint,
            details: 0,
        }
    }

    /// The first screen of the root stack.
    pub fn home_lines() -> Vec<String> {
        let mut lines = vec!["Press a key:".to_string(), String::new()];
        lines.extend(
            DemoStep::KEYS
                .iter()
                .map(|(key, what)| format!("  {key}  {what}")),
        );
        lines.push(String::new());
        lines.push("  ←  back    Esc  dismiss    q  quit".to_string());
        lines
    }
}

fn screen(coordinator: &CoordinatorRef, title: &str, lines: Vec<String>) -> ScreenRef {
    coordinator.host().factory.screen(title, lines)
}

impl StepTranslator<DemoStep> for HomeFlow {
    fn navigate(&mut self, step: DemoStep, coordinator: &CoordinatorRef) -> StepAction {
        debug!("HomeFlow: {:?}", step);
        match step {
            DemoStep::Home => StepAction::None,
            DemoStep::Detail => {
                self.details += 1;
                let n = self.details;
                StepAction::push(screen(
                    coordinator,
                    &format!("Detail {n}"),
                    vec![format!("Detail page number {n}."), "Press d for another.".into()],
                ))
            }
            DemoStep::Sheet => StepAction::present(
                screen(
                    coordinator,
                    "Sheet",
                    vec![
                        format!("Presented as {}.", self.default_style.label()),
                        "Press p again to stack another on top.".into(),
                    ],
                ),
                self.default_style,
            ),
            DemoStep::Browser => match Url::parse(HELP_URL) {
                Ok(url) => StepAction::open_browser(url, self.browser_style, self.browser_tint),
                Err(_) => StepAction::None,
            },
            DemoStep::Inbox(selection) => StepAction::open_mail_inbox(
                selection,
                Some(Box::new(|| info!("Mail inbox picker finished"))),
            ),
            DemoStep::Email => StepAction::send_mail(
                MailDraft {
                    recipients: vec![SUPPORT_EMAIL.to_string()],
                    subject: "Help with my order".to_string(),
                    body: "Hi, ...".to_string(),
                    is_html: false,
                },
                None,
            ),
            DemoStep::Sms => StepAction::send_sms(
                SmsDraft {
                    recipients: vec![SUPPORT_PHONE.to_string()],
                    body: "Hi".to_string(),
                },
                Some(Box::new(|| info!("SMS unavailable, told the user"))),
            ),
            DemoStep::Call => StepAction::call(SUPPORT_PHONE),
            DemoStep::Settings => StepAction::open_settings(),
            DemoStep::Messages => StepAction::open_messaging(),
            DemoStep::Wizard(step) => {
                coordinator.execute::<WizardFlow>(step);
                StepAction::None
            }
            DemoStep::DeepLink(path) => StepAction::push(screen(
                coordinator,
                &path,
                vec![format!("Opened from a link to '{path}'.")],
            )),
            DemoStep::Back => StepAction::close(),
            DemoStep::Dismiss => StepAction::dismiss(),
            DemoStep::PopToRoot => StepAction::pop_to_root(),
        }
    }
}

// ============================================================================
// Wizard
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Show the next page, or the first one if none is showing.
    Next,
    Finish,
}

pub const WIZARD_PAGES: u32 = 3;

/// A three-page child flow. Each page it pushes keeps the wizard alive.
pub struct WizardFlow {
    page: u32,
}

impl Flow for WizardFlow {
    type Step = WizardStep;
    const TAG: FlowTag = FlowTag::new("wizard");

    fn build(parent: &CoordinatorRef) -> Self {
        debug!("Building wizard under {}", parent.label());
        Self { page: 0 }
    }
}

impl StepTranslator<WizardStep> for WizardFlow {
    fn navigate(&mut self, step: WizardStep, coordinator: &CoordinatorRef) -> StepAction {
        match step {
            WizardStep::Next if self.page < WIZARD_PAGES => {
                self.page += 1;
                let page = screen(
                    coordinator,
                    &format!("Wizard {}/{}", self.page, WIZARD_PAGES),
                    vec![
                        format!("Wizard page {} served by {}.", self.page, coordinator.label()),
                        "Press w to continue.".into(),
                    ],
                );
                coordinator.retain_in(&page);
                let shown = self.page;
                StepAction::push_then(page, move || debug!("Wizard page {shown} on screen"))
            }
            WizardStep::Next | WizardStep::Finish => {
                info!("{} finished", coordinator.label());
                StepAction::pop_to_root()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinator::Coordinator;
    use crate::test_support::Fixture;

    fn home(fx: &Fixture) -> (ScreenRef, Coordinator<DemoStep>) {
        let root = fx.stack(&["Home"]);
        let flow = HomeFlow::new(PresentationStyle::FormSheet, PresentationStyle::PageSheet, None);
        let coordinator = Coordinator::new(&fx.navigator, HOME_TAG, Some(root.clone()), flow);
        coordinator.start(DemoStep::Home);
        (root, coordinator)
    }

    fn titles(root: &ScreenRef) -> Vec<String> {
        root.as_stack().unwrap().screens().iter().map(|s| s.title()).collect()
    }

    #[test]
    fn test_every_listed_key_maps_to_a_step() {
        for (key, _) in DemoStep::KEYS {
            if *key == 'l' {
                continue;
            }
            assert!(DemoStep::from_key(*key).is_some(), "key {key}");
        }
        assert!(DemoStep::from_key('z').is_none());
    }

    #[test]
    fn test_detail_pages_are_numbered() {
        let fx = Fixture::new();
        let (root, home) = home(&fx);
        home.perform(DemoStep::Detail);
        home.perform(DemoStep::Detail);
        assert_eq!(titles(&root), vec!["Home", "Detail 1", "Detail 2"]);

        home.perform(DemoStep::Back);
        assert_eq!(titles(&root), vec!["Home", "Detail 1"]);
    }

    #[test]
    fn test_sheet_uses_configured_style() {
        let fx = Fixture::new();
        let (_root, home) = home(&fx);
        home.perform(DemoStep::Sheet);
        let top = fx.scene.top_overlay().unwrap();
        assert_eq!(top.style(), Some(PresentationStyle::FormSheet));

        home.perform(DemoStep::Dismiss);
        assert!(fx.scene.overlays().is_empty());
    }

    #[test]
    fn test_wizard_is_reused_then_released() {
        let fx = Fixture::new();
        let (root, home) = home(&fx);

        home.perform(DemoStep::Wizard(WizardStep::Next));
        home.perform(DemoStep::Wizard(WizardStep::Next));
        assert_eq!(home.child_count(), 1);
        assert_eq!(titles(&root), vec!["Home", "Wizard 1/3", "Wizard 2/3"]);

        home.perform(DemoStep::Wizard(WizardStep::Finish));
        assert_eq!(titles(&root), vec!["Home"]);
        assert_eq!(home.child_count(), 0);
    }

    #[test]
    fn test_wizard_past_last_page_finishes() {
        let fx = Fixture::new();
        let (root, home) = home(&fx);
        for _ in 0..WIZARD_PAGES + 1 {
            home.perform(DemoStep::Wizard(WizardStep::Next));
        }
        assert_eq!(titles(&root), vec!["Home"]);
    }

    #[test]
    fn test_sms_failure_path() {
        let fx = Fixture::new();
        fx.composer.sms.set(false);
        let (_root, home) = home(&fx);
        home.perform(DemoStep::Sms);
        assert_eq!(fx.haptics.errors.get(), 1);
        assert!(fx.scene.overlays().is_empty());
    }

    #[test]
    fn test_deep_link_pushes_named_page() {
        let fx = Fixture::new();
        let (root, home) = home(&fx);
        home.perform(DemoStep::DeepLink("orders/42".into()));
        assert_eq!(titles(&root), vec!["Home", "orders/42"]);
    }

    #[test]
    fn test_call_and_settings_reach_the_os() {
        let fx = Fixture::new();
        let (_root, home) = home(&fx);
        home.perform(DemoStep::Call);
        home.perform(DemoStep::Settings);
        assert_eq!(
            fx.os.opened(),
            vec!["telprompt://+15550100".to_string(), "app-settings:".to_string()]
        );
    }
}
