//! # Steps
//!
//! A step is whatever value the application uses to say "go here next".
//! The core never looks inside one. It parks steps in a `StepQueue` and
//! hands them, one at a time, to the coordinator's `StepTranslator`.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::core::action::StepAction;
use crate::core::coordinator::CoordinatorRef;

/// Turns a step into the action that carries it out.
///
/// Each coordinator owns exactly one translator. `coordinator` is the
/// coordinator doing the translating, so a translator can spawn child flows
/// from it (`coordinator.execute::<Child>(step)`) and return
/// `StepAction::None`.
pub trait StepTranslator<S> {
    fn navigate(&mut self, step: S, coordinator: &CoordinatorRef) -> StepAction;
}

impl<S, F> StepTranslator<S> for F
where
    F: FnMut(S, &CoordinatorRef) -> StepAction,
{
    fn navigate(&mut self, step: S, coordinator: &CoordinatorRef) -> StepAction {
        self(step, coordinator)
    }
}

/// Pending steps of one coordinator.
///
/// Before the coordinator is live only the latest step is kept (`hold`).
/// Once live every write is queued (`push`) and taken in write order.
pub struct StepQueue<S> {
    steps: RefCell<VecDeque<S>>,
}

impl<S> Default for StepQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StepQueue<S> {
    pub fn new() -> Self {
        Self {
            steps: RefCell::new(VecDeque::new()),
        }
    }

    /// Replace everything pending with `step`. Returns how many were dropped.
    pub fn hold(&self, step: S) -> usize {
        let mut steps = self.steps.borrow_mut();
        let dropped = steps.len();
        steps.clear();
        steps.push_back(step);
        dropped
    }

    /// Queue `step` behind the ones already pending.
    pub fn push(&self, step: S) {
        self.steps.borrow_mut().push_back(step);
    }

    pub fn take(&self) -> Option<S> {
        self.steps.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.steps.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.borrow().is_empty()
    }
}
