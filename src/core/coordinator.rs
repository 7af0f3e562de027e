//! # Coordinator
//!
//! A coordinator owns one navigation flow. It holds a root screen handle,
//! an optional weak link to its parent, a weak registry of children, a
//! queue of pending steps, and the translator that turns steps into
//! actions.
//!
//! ```text
//!             perform(step)
//!                  │
//!                  ▼
//!   Constructed ─ hold (latest wins) ─┐
//!        │ start / start_headless     │
//!        ▼                            ▼
//!      Live ── push (FIFO) ── drain ──→ StepTranslator::navigate ──→ ActionRouter::route
//!        │
//!        ▼
//!   (last strong handle dropped: released, nothing more is delivered)
//! ```
//!
//! Ownership is external. The registry and the navigator directory only
//! hold weak references, so a coordinator lives exactly as long as some
//! `Coordinator` handle, `CoordinatorRef`, or retaining screen does.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, info, warn};

use crate::core::executor::{self, Flow};
use crate::core::navigator::{Navigator, Shared};
use crate::core::registry::ChildRegistry;
use crate::core::step::{StepQueue, StepTranslator};
use crate::host::Host;
use crate::host::screen::ScreenRef;

/// Stable identifier, unique per navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinatorId(pub(crate) u64);

impl fmt::Display for CoordinatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Names a kind of coordinator. Child lookup compares tags, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowTag(&'static str);

impl FlowTag {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FlowTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Built, steps are held but not delivered.
    Constructed,
    /// Draining its step slot.
    Live,
}

// ============================================================================
// Type-erased node
// ============================================================================

/// What the registry, the directory and the executor see of a coordinator,
/// whatever its step type.
pub(crate) trait Node {
    fn id(&self) -> CoordinatorId;
    fn tag(&self) -> FlowTag;
    fn root(&self) -> Option<ScreenRef>;
    fn parent(&self) -> Option<Rc<dyn Node>>;
    fn parent_id(&self) -> Option<CoordinatorId>;
    fn children(&self) -> &RefCell<ChildRegistry>;
    fn shared(&self) -> &Rc<Shared>;
    fn lifecycle(&self) -> Lifecycle;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;

    fn label(&self) -> String {
        format!("{}{}", self.tag(), self.id())
    }
}

pub(crate) struct Core<S: 'static> {
    id: CoordinatorId,
    tag: FlowTag,
    root: Option<ScreenRef>,
    parent: Option<Weak<dyn Node>>,
    parent_id: Option<CoordinatorId>,
    children: RefCell<ChildRegistry>,
    steps: StepQueue<S>,
    lifecycle: Cell<Lifecycle>,
    draining: Cell<bool>,
    translator: RefCell<Box<dyn StepTranslator<S>>>,
    shared: Rc<Shared>,
}

impl<S: 'static> Node for Core<S> {
    fn id(&self) -> CoordinatorId {
        self.id
    }

    fn tag(&self) -> FlowTag {
        self.tag
    }

    fn root(&self) -> Option<ScreenRef> {
        self.root.clone()
    }

    fn parent(&self) -> Option<Rc<dyn Node>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    fn parent_id(&self) -> Option<CoordinatorId> {
        self.parent_id
    }

    fn children(&self) -> &RefCell<ChildRegistry> {
        &self.children
    }

    fn shared(&self) -> &Rc<Shared> {
        &self.shared
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

impl<S: 'static> Drop for Core<S> {
    fn drop(&mut self) {
        debug!("{}{} released", self.tag, self.id);
        self.shared.forget(self.id);
    }
}

// ============================================================================
// Coordinator
// ============================================================================

/// Strong, typed handle to a coordinator whose steps are `S`.
pub struct Coordinator<S: 'static> {
    core: Rc<Core<S>>,
}

impl<S: 'static> Clone for Coordinator<S> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<S: 'static> fmt::Debug for Coordinator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("id", &self.core.id)
            .field("tag", &self.core.tag)
            .field("lifecycle", &self.core.lifecycle.get())
            .finish()
    }
}

impl<S: 'static> Coordinator<S> {
    /// A top-level coordinator driving `root`.
    pub fn new(
        navigator: &Navigator,
        tag: FlowTag,
        root: Option<ScreenRef>,
        translator: impl StepTranslator<S> + 'static,
    ) -> Self {
        Self::build(navigator.shared().clone(), tag, root, None, Box::new(translator))
    }

    /// A child of `parent`, sharing its root. The child is not registered
    /// with the parent; use `attach_child` or go through the executor.
    pub fn with_parent(
        parent: &CoordinatorRef,
        tag: FlowTag,
        translator: impl StepTranslator<S> + 'static,
    ) -> Self {
        Self::build(
            parent.node.shared().clone(),
            tag,
            parent.node.root(),
            Some(parent),
            Box::new(translator),
        )
    }

    fn build(
        shared: Rc<Shared>,
        tag: FlowTag,
        root: Option<ScreenRef>,
        parent: Option<&CoordinatorRef>,
        translator: Box<dyn StepTranslator<S>>,
    ) -> Self {
        let core = Rc::new(Core {
            id: shared.next_id(),
            tag,
            root,
            parent: parent.map(|p| Rc::downgrade(&p.node)),
            parent_id: parent.map(|p| p.id()),
            children: RefCell::new(ChildRegistry::new()),
            steps: StepQueue::new(),
            lifecycle: Cell::new(Lifecycle::Constructed),
            draining: Cell::new(false),
            translator: RefCell::new(translator),
            shared,
        });
        let node: Rc<dyn Node> = core.clone();
        core.shared.remember(&node);
        debug!("{} constructed", node.label());
        Self { core }
    }

    pub fn id(&self) -> CoordinatorId {
        self.core.id
    }

    pub fn tag(&self) -> FlowTag {
        self.core.tag
    }

    pub fn label(&self) -> String {
        self.core.label()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.core.lifecycle.get()
    }

    pub fn is_live(&self) -> bool {
        self.lifecycle() == Lifecycle::Live
    }

    pub fn root(&self) -> Option<ScreenRef> {
        self.core.root.clone()
    }

    /// The host collaborators shared by every coordinator of this navigator.
    pub fn host(&self) -> &Host {
        self.core.shared.router.host()
    }

    pub fn parent(&self) -> Option<CoordinatorRef> {
        self.core.parent().map(|node| CoordinatorRef { node })
    }

    /// Type-erased strong handle to this coordinator.
    pub fn handle(&self) -> CoordinatorRef {
        CoordinatorRef {
            node: self.core.clone(),
        }
    }

    pub fn downgrade(&self) -> WeakCoordinator<S> {
        WeakCoordinator {
            core: Rc::downgrade(&self.core),
        }
    }

    pub fn ptr_eq(&self, other: &Coordinator<S>) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    /// Queue `step`, then go live.
    pub fn start(&self, step: S) {
        self.perform(step);
        self.start_headless();
    }

    /// Go live without a step of our own. Delivers the latest pending step.
    pub fn start_headless(&self) {
        if self.is_live() {
            debug!("{} already live", self.label());
            return;
        }
        self.core.lifecycle.set(Lifecycle::Live);
        info!("{} is live", self.label());
        self.drain();
    }

    /// Request navigation. Delivered now if live, otherwise held until start.
    ///
    /// A perform made while a step is being delivered is queued and
    /// delivered, in call order, once the current delivery returns.
    pub fn perform(&self, step: S) {
        if self.is_live() {
            self.core.steps.push(step);
        } else {
            let dropped = self.core.steps.hold(step);
            if dropped > 0 {
                debug!("{}: unread step replaced", self.label());
            }
        }
        self.drain();
    }

    /// Live children, most recently added last. Dead entries are compacted out.
    pub fn children(&self) -> Vec<CoordinatorRef> {
        self.core.children.borrow_mut().live()
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// The most recently added live child of flow `T`.
    pub fn find_child<T: Flow>(&self) -> Option<Coordinator<T::Step>> {
        let found = self.core.children.borrow_mut().find_last(T::TAG);
        found.and_then(|child| child.downcast::<T::Step>())
    }

    /// Register `child` in this coordinator's registry.
    ///
    /// Refused when `child` was built for another parent or is already here.
    pub fn attach_child(&self, child: &CoordinatorRef) -> bool {
        self.handle().attach_child(child)
    }

    /// Reuse a live `T` child or start a new one, then forward `step`.
    pub fn execute<T: Flow>(&self, step: T::Step) -> Coordinator<T::Step> {
        executor::execute::<T>(&self.handle(), step)
    }

    /// Let `screen` keep this coordinator alive.
    pub fn retain_in(&self, screen: &ScreenRef) {
        self.handle().retain_in(screen);
    }

    fn drain(&self) {
        let core = &self.core;
        if core.lifecycle.get() != Lifecycle::Live || core.draining.get() {
            return;
        }
        core.draining.set(true);
        let this = self.handle();
        let label = this.label();
        while let Some(step) = core.steps.take() {
            let action = core.translator.borrow_mut().navigate(step, &this);
            debug!("{label}: routing {:?}", action);
            if let Err(e) = core.shared.router.route(&label, core.root.as_ref(), action) {
                warn!("{label}: navigation failed: {e}");
            }
        }
        core.draining.set(false);
    }
}

/// Non-owning typed handle.
pub struct WeakCoordinator<S: 'static> {
    core: Weak<Core<S>>,
}

impl<S: 'static> Clone for WeakCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<S: 'static> WeakCoordinator<S> {
    pub fn upgrade(&self) -> Option<Coordinator<S>> {
        self.core.upgrade().map(|core| Coordinator { core })
    }

    pub fn is_released(&self) -> bool {
        self.core.strong_count() == 0
    }

    /// Perform on the coordinator if it is still alive.
    pub fn perform(&self, step: S) -> bool {
        match self.upgrade() {
            Some(coordinator) => {
                coordinator.perform(step);
                true
            }
            None => {
                debug!("Step dropped: coordinator already released");
                false
            }
        }
    }
}

// ============================================================================
// CoordinatorRef
// ============================================================================

/// Strong, type-erased handle. This is what translators, registries and the
/// executor pass around.
#[derive(Clone)]
pub struct CoordinatorRef {
    pub(crate) node: Rc<dyn Node>,
}

impl fmt::Debug for CoordinatorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoordinatorRef({})", self.label())
    }
}

impl CoordinatorRef {
    pub fn id(&self) -> CoordinatorId {
        self.node.id()
    }

    pub fn tag(&self) -> FlowTag {
        self.node.tag()
    }

    pub fn label(&self) -> String {
        self.node.label()
    }

    pub fn root(&self) -> Option<ScreenRef> {
        self.node.root()
    }

    pub fn host(&self) -> &Host {
        self.node.shared().router.host()
    }

    pub fn parent(&self) -> Option<CoordinatorRef> {
        self.node.parent().map(|node| CoordinatorRef { node })
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.node.lifecycle()
    }

    pub fn ptr_eq(&self, other: &CoordinatorRef) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.node), Rc::as_ptr(&other.node))
    }

    pub fn children(&self) -> Vec<CoordinatorRef> {
        self.node.children().borrow_mut().live()
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Recover the typed handle, if this coordinator's steps are `S`.
    pub fn downcast<S: 'static>(&self) -> Option<Coordinator<S>> {
        self.node
            .clone()
            .into_any()
            .downcast::<Core<S>>()
            .ok()
            .map(|core| Coordinator { core })
    }

    pub fn attach_child(&self, child: &CoordinatorRef) -> bool {
        if child.node.parent_id() != Some(self.id()) {
            warn!(
                "{}: refusing to adopt {} built for another parent",
                self.label(),
                child.label()
            );
            return false;
        }
        let mut registry = self.node.children().borrow_mut();
        if registry.contains(child.id()) {
            return false;
        }
        registry.add(child);
        true
    }

    /// Reuse a live `T` child or start a new one, then forward `step`.
    pub fn execute<T: Flow>(&self, step: T::Step) -> Coordinator<T::Step> {
        executor::execute::<T>(self, step)
    }

    pub fn retain_in(&self, screen: &ScreenRef) {
        let owner: Rc<dyn Any> = Rc::new(self.clone());
        screen.retain(owner);
    }

    pub(crate) fn downgrade_node(&self) -> Weak<dyn Node> {
        Rc::downgrade(&self.node)
    }
}
