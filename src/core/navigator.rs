//! # Navigator
//!
//! The per-UI-thread context every coordinator hangs off. It owns the host
//! collaborators (through the router), hands out coordinator ids, and keeps
//! a weak directory of live coordinators so other threads can address them
//! by id.
//!
//! ```text
//! worker thread                         UI thread
//! ─────────────                         ─────────
//! NavigatorHandle::execute::<T>(id, s)
//!        │  (Send job)
//!        └──────── mpsc ───────────→ Navigator::run_pending()
//!                                        └→ execute::<T>(directory[id], s)
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, ThreadId};

use log::{debug, warn};

use crate::core::coordinator::{Coordinator, CoordinatorId, CoordinatorRef, Node};
use crate::core::executor::{self, Flow};
use crate::core::router::{ActionRouter, RouterOptions};
use crate::host::Host;

type Job = Box<dyn FnOnce(&Navigator) + Send>;

/// State shared by a navigator and all of its coordinators.
pub(crate) struct Shared {
    pub(crate) router: ActionRouter,
    next_id: Cell<u64>,
    directory: RefCell<HashMap<CoordinatorId, Weak<dyn Node>>>,
}

impl Shared {
    pub(crate) fn next_id(&self) -> CoordinatorId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        CoordinatorId(id)
    }

    pub(crate) fn remember(&self, node: &Rc<dyn Node>) {
        self.directory
            .borrow_mut()
            .insert(node.id(), Rc::downgrade(node));
    }

    /// Called from a coordinator's drop. A busy directory keeps the dead
    /// entry; lookups ignore it and the next `remember` or lookup is fine.
    pub(crate) fn forget(&self, id: CoordinatorId) {
        if let Ok(mut directory) = self.directory.try_borrow_mut() {
            directory.remove(&id);
        }
    }

    fn lookup(&self, id: CoordinatorId) -> Option<CoordinatorRef> {
        let node = self.directory.borrow().get(&id).and_then(Weak::upgrade);
        node.map(|node| CoordinatorRef { node })
    }
}

pub struct Navigator {
    shared: Rc<Shared>,
    ui_thread: ThreadId,
    jobs_tx: Sender<Job>,
    jobs_rx: Receiver<Job>,
}

impl Navigator {
    /// Create the navigator for the current thread, which becomes its UI thread.
    pub fn new(host: Host, options: RouterOptions) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel();
        Self {
            shared: Rc::new(Shared {
                router: ActionRouter::new(host, options),
                next_id: Cell::new(0),
                directory: RefCell::new(HashMap::new()),
            }),
            ui_thread: thread::current().id(),
            jobs_tx,
            jobs_rx,
        }
    }

    pub(crate) fn shared(&self) -> &Rc<Shared> {
        &self.shared
    }

    pub fn router(&self) -> &ActionRouter {
        &self.shared.router
    }

    pub fn host(&self) -> &Host {
        self.shared.router.host()
    }

    /// A `Send` handle for reaching this navigator from other threads.
    pub fn handle(&self) -> NavigatorHandle {
        NavigatorHandle {
            ui_thread: self.ui_thread,
            jobs: self.jobs_tx.clone(),
        }
    }

    pub fn coordinator(&self, id: CoordinatorId) -> Option<CoordinatorRef> {
        self.shared.lookup(id)
    }

    pub fn live_count(&self) -> usize {
        self.shared
            .directory
            .borrow()
            .values()
            .filter(|node| node.strong_count() > 0)
            .count()
    }

    /// Perform `step` on coordinator `target`. False if it is gone or takes
    /// a different step type.
    pub fn perform<S: 'static>(&self, target: CoordinatorId, step: S) -> bool {
        let Some(coordinator) = self.lookup_typed::<S>(target) else {
            return false;
        };
        coordinator.perform(step);
        true
    }

    /// `execute::<T>` from the coordinator with id `parent`, if still alive.
    pub fn execute<T: Flow>(
        &self,
        parent: CoordinatorId,
        step: T::Step,
    ) -> Option<Coordinator<T::Step>> {
        match self.coordinator(parent) {
            Some(parent) => Some(executor::execute::<T>(&parent, step)),
            None => {
                warn!("Cannot start {}: parent {} is gone", T::TAG, parent);
                None
            }
        }
    }

    /// Run every job posted from other threads. Call once per UI loop tick.
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        while let Ok(job) = self.jobs_rx.try_recv() {
            job(self);
            count += 1;
        }
        if count > 0 {
            debug!("Ran {} posted navigation job(s)", count);
        }
        count
    }

    fn lookup_typed<S: 'static>(&self, id: CoordinatorId) -> Option<Coordinator<S>> {
        let Some(coordinator) = self.coordinator(id) else {
            warn!("Coordinator {} is gone", id);
            return None;
        };
        let typed = coordinator.downcast::<S>();
        if typed.is_none() {
            warn!("Coordinator {} does not take this step type", coordinator.label());
        }
        typed
    }
}

/// Thread-safe handle to a navigator.
///
/// Calls never run inline: they are re-posted to the UI thread and run on
/// its next `Navigator::run_pending`. The call itself returns immediately.
#[derive(Clone)]
pub struct NavigatorHandle {
    ui_thread: ThreadId,
    jobs: Sender<Job>,
}

impl NavigatorHandle {
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    pub fn execute<T: Flow>(&self, parent: CoordinatorId, step: T::Step)
    where
        T::Step: Send,
    {
        self.post(T::TAG.name(), move |navigator| {
            navigator.execute::<T>(parent, step);
        });
    }

    pub fn perform<S: Send + 'static>(&self, target: CoordinatorId, step: S) {
        self.post("perform", move |navigator| {
            navigator.perform(target, step);
        });
    }

    fn post(&self, what: &str, job: impl FnOnce(&Navigator) + Send + 'static) {
        if self.is_ui_thread() {
            debug!("Queueing {what} for the next UI tick");
        } else {
            debug!("Rescheduling {what} onto the UI thread");
        }
        if self.jobs.send(Box::new(job)).is_err() {
            warn!("Failed to post {what}: navigator dropped");
        }
    }
}
