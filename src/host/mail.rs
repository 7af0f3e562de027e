//! # Mail Client Directory
//!
//! A static, ordered mapping from client name to the URL scheme used to
//! probe for (and launch) that client. The order is significant: automatic
//! selection always opens the first installed client.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::host::os::{OpenOptions, OsBridge};
use crate::host::screen::Callback;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MailClient {
    pub name: String,
    pub url: Url,
}

/// How the inbox picker chooses a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MailSelection {
    /// Open the first installed client without asking.
    #[default]
    Automatic,
    /// Ask the user with a choice prompt.
    Manual,
}

const DEFAULT_CLIENTS: &[(&str, &str)] = &[
    ("Mail", "message://"),
    ("Gmail", "googlegmail://"),
    ("Outlook", "ms-outlook://"),
    ("Yahoo Mail", "ymail://"),
    ("Spark", "readdle-spark://"),
    ("Airmail", "airmail://"),
    ("Proton Mail", "protonmail://"),
    ("Fastmail", "fastmail://"),
];

#[derive(Debug, Clone)]
pub struct MailClientDirectory {
    clients: Vec<MailClient>,
}

impl Default for MailClientDirectory {
    fn default() -> Self {
        let clients = DEFAULT_CLIENTS
            .iter()
            .filter_map(|(name, url)| {
                Url::parse(url).ok().map(|url| MailClient {
                    name: name.to_string(),
                    url,
                })
            })
            .collect();
        Self { clients }
    }
}

impl MailClientDirectory {
    pub fn new(clients: Vec<MailClient>) -> Self {
        Self { clients }
    }

    pub fn clients(&self) -> &[MailClient] {
        &self.clients
    }

    /// Clients whose scheme the OS can open, in declared order.
    pub fn installed_clients(&self, os: &dyn OsBridge) -> Vec<MailClient> {
        self.clients
            .iter()
            .filter(|client| os.can_open(&client.url))
            .cloned()
            .collect()
    }

    pub fn open(&self, os: &dyn OsBridge, url: &Url) {
        info!("Opening mail client at {}", url);
        os.open(url, OpenOptions::default(), None);
    }

    /// Run the inbox picker.
    ///
    /// Returns a prompt only in `Manual` mode with at least one installed
    /// client. In every other case the completion has already fired.
    pub fn pick(
        &self,
        os: Rc<dyn OsBridge>,
        selection: MailSelection,
        completion: Option<Callback>,
    ) -> Option<ChoicePrompt> {
        let installed = self.installed_clients(os.as_ref());
        let completion = SharedCompletion::new(completion);

        if installed.is_empty() {
            debug!("No mail clients installed");
            completion.fire();
            return None;
        }

        match selection {
            MailSelection::Automatic => {
                self.open(os.as_ref(), &installed[0].url);
                completion.fire();
                None
            }
            MailSelection::Manual => {
                let mut options: Vec<ChoiceOption> = installed
                    .into_iter()
                    .map(|client| {
                        let os = os.clone();
                        let completion = completion.clone();
                        let url = client.url;
                        ChoiceOption {
                            label: client.name,
                            style: ChoiceStyle::Default,
                            handler: Box::new(move || {
                                info!("Opening mail client at {}", url);
                                os.open(&url, OpenOptions::default(), None);
                                completion.fire();
                            }),
                        }
                    })
                    .collect();
                let cancel = completion.clone();
                options.push(ChoiceOption {
                    label: "Cancel".to_string(),
                    style: ChoiceStyle::Destructive,
                    handler: Box::new(move || cancel.fire()),
                });
                Some(ChoicePrompt {
                    title: "Open mail app".to_string(),
                    options,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    Default,
    Destructive,
}

pub struct ChoiceOption {
    pub label: String,
    pub style: ChoiceStyle,
    pub handler: Callback,
}

/// A list of mutually exclusive options, shown by the host as a sheet.
pub struct ChoicePrompt {
    pub title: String,
    pub options: Vec<ChoiceOption>,
}

impl ChoicePrompt {
    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }

    /// Consume the prompt, running the handler of option `index`.
    pub fn choose(mut self, index: usize) -> bool {
        if index >= self.options.len() {
            return false;
        }
        let option = self.options.swap_remove(index);
        (option.handler)();
        true
    }

    /// Consume the prompt, running its last option, which is the cancel choice.
    pub fn cancel(self) -> bool {
        match self.options.len().checked_sub(1) {
            Some(last) => self.choose(last),
            None => false,
        }
    }
}

/// A completion shared by several handlers. Only the first `fire` runs it.
#[derive(Clone)]
struct SharedCompletion(Rc<RefCell<Option<Callback>>>);

impl SharedCompletion {
    fn new(callback: Option<Callback>) -> Self {
        Self(Rc::new(RefCell::new(callback)))
    }

    fn fire(&self) {
        let callback = self.0.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingOs;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Callback) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, Box::new(move || c.set(c.get() + 1)))
    }

    #[test]
    fn test_default_directory_order() {
        let dir = MailClientDirectory::default();
        assert_eq!(dir.clients()[0].name, "Mail");
        assert_eq!(dir.clients()[1].name, "Gmail");
        assert_eq!(dir.clients().len(), DEFAULT_CLIENTS.len());
    }

    #[test]
    fn test_installed_clients_keep_declared_order() {
        let os = RecordingOs::with_schemes(&["ms-outlook", "googlegmail"]);
        let installed = MailClientDirectory::default().installed_clients(&os);
        let names: Vec<_> = installed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Gmail", "Outlook"]);
    }

    #[test]
    fn test_automatic_with_no_clients_fires_completion() {
        let os = Rc::new(RecordingOs::with_schemes(&[]));
        let (count, completion) = counter();
        let prompt = MailClientDirectory::default().pick(os.clone(), MailSelection::Automatic, Some(completion));
        assert!(prompt.is_none());
        assert_eq!(count.get(), 1);
        assert!(os.opened().is_empty());
    }

    #[test]
    fn test_manual_with_no_clients_fires_completion() {
        let os = Rc::new(RecordingOs::with_schemes(&[]));
        let (count, completion) = counter();
        let prompt = MailClientDirectory::default().pick(os.clone(), MailSelection::Manual, Some(completion));
        assert!(prompt.is_none());
        assert_eq!(count.get(), 1);
        assert!(os.opened().is_empty());
    }

    #[test]
    fn test_automatic_opens_first_installed() {
        let os = Rc::new(RecordingOs::with_schemes(&["ymail", "googlegmail"]));
        let (count, completion) = counter();
        let prompt = MailClientDirectory::default().pick(os.clone(), MailSelection::Automatic, Some(completion));
        assert!(prompt.is_none());
        assert_eq!(count.get(), 1);
        assert_eq!(os.opened(), vec!["googlegmail://".to_string()]);
    }

    #[test]
    fn test_manual_builds_prompt_with_cancel_last() {
        let os = Rc::new(RecordingOs::with_schemes(&["message", "fastmail"]));
        let (count, completion) = counter();
        let prompt = MailClientDirectory::default()
            .pick(os.clone(), MailSelection::Manual, Some(completion))
            .unwrap();
        assert_eq!(prompt.labels(), vec!["Mail", "Fastmail", "Cancel"]);
        assert_eq!(prompt.options[2].style, ChoiceStyle::Destructive);
        assert_eq!(prompt.options[0].style, ChoiceStyle::Default);
        // Nothing fires until a choice is made
        assert_eq!(count.get(), 0);

        assert!(prompt.choose(1));
        assert_eq!(count.get(), 1);
        assert_eq!(os.opened(), vec!["fastmail://".to_string()]);
    }

    #[test]
    fn test_manual_cancel_fires_completion_without_opening() {
        let os = Rc::new(RecordingOs::with_schemes(&["message"]));
        let (count, completion) = counter();
        let prompt = MailClientDirectory::default()
            .pick(os.clone(), MailSelection::Manual, Some(completion))
            .unwrap();
        assert!(prompt.choose(1));
        assert_eq!(count.get(), 1);
        assert!(os.opened().is_empty());
    }

    #[test]
    fn test_cancel_runs_last_option_once() {
        let os = Rc::new(RecordingOs::with_schemes(&["message", "ymail"]));
        let (count, completion) = counter();
        let prompt = MailClientDirectory::default()
            .pick(os.clone(), MailSelection::Manual, Some(completion))
            .unwrap();
        assert!(prompt.cancel());
        assert_eq!(count.get(), 1);
        assert!(os.opened().is_empty());
    }

    #[test]
    fn test_shared_completion_fires_once() {
        let (count, completion) = counter();
        let shared = SharedCompletion::new(Some(completion));
        let other = shared.clone();
        shared.fire();
        other.fire();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_choose_out_of_range() {
        let prompt = ChoicePrompt {
            title: "t".into(),
            options: Vec::new(),
        };
        assert!(!prompt.choose(0));
    }

    #[test]
    fn test_cancel_empty_prompt() {
        let prompt = ChoicePrompt {
            title: "t".into(),
            options: Vec::new(),
        };
        assert!(!prompt.cancel());
    }
}
