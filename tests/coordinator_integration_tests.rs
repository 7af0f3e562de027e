use std::cell::{Cell, RefCell};
use std::rc::Rc;

use url::Url;

use waypoint::core::action::StepAction;
use waypoint::core::router::RouterOptions;
use waypoint::core::{Coordinator, CoordinatorRef, Flow, FlowTag, Navigator};
use waypoint::host::Host;
use waypoint::host::composer::{MailDraft, MessageComposer, SmsDraft};
use waypoint::host::mail::{MailClientDirectory, MailSelection};
use waypoint::host::os::{Haptics, OpenOptions, OsBridge};
use waypoint::host::scene::Scene;
use waypoint::host::screen::{Callback, PresentationStyle, Screen, ScreenRef, ScreenStack};

// ============================================================================
// Helper Functions
// ============================================================================

#[derive(Default)]
struct FakeOs {
    installed: Vec<&'static str>,
    opened: RefCell<Vec<String>>,
}

impl OsBridge for FakeOs {
    fn open(&self, url: &Url, _options: OpenOptions, completion: Option<Box<dyn FnOnce(bool)>>) {
        self.opened.borrow_mut().push(url.to_string());
        if let Some(completion) = completion {
            completion(true);
        }
    }

    fn can_open(&self, url: &Url) -> bool {
        self.installed.contains(&url.scheme())
    }
}

struct NoComposer;

impl MessageComposer for NoComposer {
    fn can_compose_mail(&self) -> bool {
        false
    }
    fn can_compose_sms(&self) -> bool {
        false
    }
    fn compose_mail(&self, _draft: &MailDraft) -> Option<ScreenRef> {
        None
    }
    fn compose_sms(&self, _draft: &SmsDraft) -> Option<ScreenRef> {
        None
    }
}

#[derive(Default)]
struct CountingHaptics(Cell<u32>);

impl Haptics for CountingHaptics {
    fn error(&self) {
        self.0.set(self.0.get() + 1);
    }
}

struct World {
    scene: Scene,
    os: Rc<FakeOs>,
    haptics: Rc<CountingHaptics>,
    navigator: Navigator,
}

fn world(installed: Vec<&'static str>) -> World {
    let scene = Scene::new();
    let os = Rc::new(FakeOs {
        installed,
        ..Default::default()
    });
    let haptics = Rc::new(CountingHaptics::default());
    let host = Host {
        os: os.clone(),
        composer: Rc::new(NoComposer),
        haptics: haptics.clone(),
        factory: Rc::new(scene.clone()),
        mail: MailClientDirectory::default(),
    };
    World {
        scene,
        os,
        haptics,
        navigator: Navigator::new(host, RouterOptions::default()),
    }
}

fn stack(scene: &Scene, titles: &[&str]) -> ScreenRef {
    let pages = titles
        .iter()
        .map(|t| scene.page(t, &[]) as ScreenRef)
        .collect();
    scene.stack("nav", pages)
}

fn titles(root: &ScreenRef) -> Vec<String> {
    root.as_stack()
        .map(|s| s.screens().iter().map(|s| s.title()).collect())
        .unwrap_or_default()
}

fn counter() -> (Rc<Cell<u32>>, Callback) {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    (count, Box::new(move || c.set(c.get() + 1)))
}

/// A coordinator whose translator turns every step into one fixed action.
fn coordinator_with(
    navigator: &Navigator,
    root: Option<ScreenRef>,
    action: fn() -> StepAction,
) -> (Coordinator<u32>, Rc<RefCell<Vec<u32>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let coordinator = Coordinator::new(
        navigator,
        FlowTag::new("main"),
        root,
        move |step: u32, _c: &CoordinatorRef| {
            log.borrow_mut().push(step);
            action()
        },
    );
    (coordinator, seen)
}

// ============================================================================
// Delivery
// ============================================================================

#[test]
fn test_each_perform_delivered_once_in_order() {
    let w = world(vec![]);
    let (coordinator, seen) = coordinator_with(&w.navigator, None, || StepAction::None);
    coordinator.start(1);
    for step in [2, 2, 3, 1] {
        coordinator.perform(step);
    }
    assert_eq!(*seen.borrow(), vec![1, 2, 2, 3, 1]);
}

#[test]
fn test_only_latest_step_survives_until_live() {
    let w = world(vec![]);
    let (coordinator, seen) = coordinator_with(&w.navigator, None, || StepAction::None);
    coordinator.perform(1);
    coordinator.perform(2);
    coordinator.perform(3);
    assert!(seen.borrow().is_empty());
    coordinator.start_headless();
    assert_eq!(*seen.borrow(), vec![3]);
}

#[test]
fn test_dropped_coordinator_stops_receiving() {
    let w = world(vec![]);
    let (coordinator, seen) = coordinator_with(&w.navigator, None, || StepAction::None);
    coordinator.start(1);
    let id = coordinator.id();
    let weak = coordinator.downgrade();
    drop(coordinator);

    assert!(!weak.perform(2));
    assert!(!w.navigator.perform(id, 3u32));
    assert_eq!(*seen.borrow(), vec![1]);
}

// ============================================================================
// Executor
// ============================================================================

thread_local! {
    static BUILT: Cell<u32> = const { Cell::new(0) };
}

struct Checkout;

impl waypoint::core::StepTranslator<&'static str> for Checkout {
    fn navigate(&mut self, _step: &'static str, _coordinator: &CoordinatorRef) -> StepAction {
        StepAction::None
    }
}

impl Flow for Checkout {
    type Step = &'static str;
    const TAG: FlowTag = FlowTag::new("checkout");

    fn build(_parent: &CoordinatorRef) -> Self {
        BUILT.with(|b| b.set(b.get() + 1));
        Checkout
    }
}

struct Support;

impl waypoint::core::StepTranslator<u8> for Support {
    fn navigate(&mut self, _step: u8, _coordinator: &CoordinatorRef) -> StepAction {
        StepAction::None
    }
}

impl Flow for Support {
    type Step = u8;
    const TAG: FlowTag = FlowTag::new("support");

    fn build(_parent: &CoordinatorRef) -> Self {
        Support
    }
}

#[test]
fn test_execute_twice_reuses_the_same_child() {
    BUILT.with(|b| b.set(0));
    let w = world(vec![]);
    let (parent, _) = coordinator_with(&w.navigator, None, || StepAction::None);
    parent.start_headless();

    let first = parent.execute::<Checkout>("cart");
    let second = parent.execute::<Checkout>("pay");

    assert!(first.ptr_eq(&second));
    assert_eq!(parent.child_count(), 1);
    assert_eq!(BUILT.with(|b| b.get()), 1);
}

#[test]
fn test_different_flows_are_siblings() {
    let w = world(vec![]);
    let (parent, _) = coordinator_with(&w.navigator, None, || StepAction::None);
    parent.start_headless();

    let _checkout = parent.execute::<Checkout>("cart");
    let _support = parent.execute::<Support>(1);
    assert_eq!(parent.child_count(), 2);
}

#[test]
fn test_off_thread_execute_runs_on_ui_tick() {
    let w = world(vec![]);
    let (parent, _) = coordinator_with(&w.navigator, None, || StepAction::None);
    parent.start_headless();

    let handle = w.navigator.handle();
    let parent_id = parent.id();
    std::thread::spawn(move || handle.execute::<Support>(parent_id, 7))
        .join()
        .unwrap();

    assert_eq!(parent.child_count(), 0);
    assert_eq!(w.navigator.run_pending(), 1);
    // The executor returned the only strong handle and the job dropped it.
    assert_eq!(parent.child_count(), 0);
}

#[test]
fn test_off_thread_execute_reuses_retained_child() {
    let w = world(vec![]);
    let (parent, _) = coordinator_with(&w.navigator, None, || StepAction::None);
    parent.start_headless();
    let child = parent.execute::<Support>(1);

    let handle = w.navigator.handle();
    let parent_id = parent.id();
    std::thread::spawn(move || handle.execute::<Support>(parent_id, 2))
        .join()
        .unwrap();
    w.navigator.run_pending();

    assert_eq!(parent.child_count(), 1);
    assert!(parent.find_child::<Support>().unwrap().ptr_eq(&child));
}

// ============================================================================
// Routing
// ============================================================================

#[test]
fn test_close_on_deep_stack_is_pop() {
    let w = world(vec![]);
    let root = stack(&w.scene, &["home", "list", "detail"]);
    let (coordinator, _) = coordinator_with(&w.navigator, Some(root.clone()), StepAction::close);
    coordinator.start(0);
    assert_eq!(titles(&root), vec!["home", "list"]);
}

#[test]
fn test_close_on_plain_root_is_dismiss() {
    let w = world(vec![]);
    let root: ScreenRef = w.scene.page("plain", &[]);
    root.present(w.scene.page("sheet", &[]), PresentationStyle::FormSheet, false, None);

    let (coordinator, _) = coordinator_with(&w.navigator, Some(root), StepAction::close);
    coordinator.start(0);
    assert!(w.scene.overlays().is_empty());
}

#[test]
fn test_dismiss_targets_topmost_whoever_asks() {
    let w = world(vec![]);
    let root = stack(&w.scene, &["home"]);
    let a: ScreenRef = w.scene.page("a", &[]);
    root.present(a.clone(), PresentationStyle::Automatic, false, None);
    a.present(w.scene.page("b", &[]), PresentationStyle::Automatic, false, None);

    let (coordinator, _) = coordinator_with(&w.navigator, Some(root), StepAction::dismiss);
    coordinator.start(0);
    let left: Vec<String> = w.scene.overlays().iter().map(|s| s.title()).collect();
    assert_eq!(left, vec!["a"]);
}

#[test]
fn test_mail_inbox_automatic_without_clients() {
    let w = world(vec![]);
    let root = stack(&w.scene, &["home"]);
    let (count, completion) = counter();
    w.navigator
        .router()
        .route(
            "main#1",
            Some(&root),
            StepAction::open_mail_inbox(MailSelection::Automatic, Some(completion)),
        )
        .unwrap();
    assert_eq!(count.get(), 1);
    assert!(w.os.opened.borrow().is_empty());
    assert!(w.scene.overlays().is_empty());
}

#[test]
fn test_mail_inbox_automatic_opens_first_declared() {
    let w = world(vec!["protonmail", "ymail", "readdle-spark"]);
    let root = stack(&w.scene, &["home"]);
    let (count, completion) = counter();
    w.navigator
        .router()
        .route(
            "main#1",
            Some(&root),
            StepAction::open_mail_inbox(MailSelection::Automatic, Some(completion)),
        )
        .unwrap();
    assert_eq!(count.get(), 1);
    assert_eq!(*w.os.opened.borrow(), vec!["ymail://".to_string()]);
}

#[test]
fn test_compose_failure_is_soft() {
    let w = world(vec![]);
    let root = stack(&w.scene, &["home"]);
    let (count, on_failure) = counter();
    let result = w.navigator.router().route(
        "main#1",
        Some(&root),
        StepAction::send_mail(MailDraft::default(), Some(on_failure)),
    );
    assert!(result.is_ok());
    assert_eq!(count.get(), 1);
    assert_eq!(w.haptics.0.get(), 1);
}

#[test]
fn test_missing_root_never_reaches_caller() {
    let w = world(vec![]);
    let (coordinator, seen) = coordinator_with(&w.navigator, None, StepAction::pop_to_root);
    coordinator.start(1);
    coordinator.perform(2);
    assert_eq!(*seen.borrow(), vec![1, 2]);
    assert!(w
        .navigator
        .router()
        .route("main#1", None, StepAction::pop_to_root())
        .is_err());
}
