//! # Static Executor
//!
//! The reuse-or-create entry point for child flows.
//!
//! ```text
//! execute::<T>(parent, step)
//! ├── live child tagged T::TAG?  → perform(step) on it, return it
//! └── none                       → prune registry
//!                                  build T, start headless, register
//!                                  perform(step), return it
//! ```
//!
//! Re-entering a flow from different trigger points therefore never stacks
//! duplicate coordinators of one kind, while different kinds coexist as
//! siblings.
//!
//! The returned handle is the only strong reference to a new child. Keep it,
//! or let the screen the child pushes hold it (`CoordinatorRef::retain_in`).
//!
//! Everything here runs on the UI thread: `CoordinatorRef` is `!Send`. Other
//! threads go through `NavigatorHandle::execute`, which re-posts the call.

use log::{debug, info, warn};

use crate::core::coordinator::{Coordinator, CoordinatorRef, FlowTag};
use crate::core::step::StepTranslator;

/// A kind of coordinator the executor can build on demand.
pub trait Flow: StepTranslator<Self::Step> + Sized + 'static {
    type Step: 'static;

    /// Identifies this flow among a parent's children.
    const TAG: FlowTag;

    /// Build the translator for a new child of `parent`.
    fn build(parent: &CoordinatorRef) -> Self;
}

pub fn execute<T: Flow>(parent: &CoordinatorRef, step: T::Step) -> Coordinator<T::Step> {
    let existing = parent.node.children().borrow_mut().find_last(T::TAG);
    if let Some(existing) = existing {
        match existing.downcast::<T::Step>() {
            Some(child) => {
                debug!("{}: reusing {}", parent.label(), child.label());
                child.perform(step);
                return child;
            }
            None => warn!(
                "{}: child {} is tagged {} but takes other steps",
                parent.label(),
                existing.label(),
                T::TAG
            ),
        }
    }

    parent.node.children().borrow_mut().prune();
    let child = Coordinator::with_parent(parent, T::TAG, T::build(parent));
    child.start_headless();
    parent.node.children().borrow_mut().add(&child.handle());
    info!("{}: started child {}", parent.label(), child.label());
    child.perform(step);
    child
}
