//! # Coordinator Core
//!
//! This module contains the navigation logic. It knows nothing about any
//! specific UI technology: screens reach it as opaque handles, and all
//! platform work goes through the `host` traits.
//!
//! ```text
//!   caller ── perform(step) ──┐
//!                             ▼
//!                    ┌─────────────────────────┐
//!                    │      Coordinator        │
//!                    │ StepQueue → Translator  │──execute::<T>──→ child Coordinator
//!                    └───────────┬─────────────┘                  (ChildRegistry, weak)
//!                                │ StepAction
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │      ActionRouter       │
//!                    │  flow │ modal │ none    │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │ ScreenStack│      │  OsBridge  │      │  Composer  │
//!     │  (Scene /  │      │  Haptics   │      │ MailClient │
//!     │  terminal) │      │            │      │  Directory │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`action`]: `StepAction`, the closed set of navigation intents
//! - [`router`]: `ActionRouter`, executes actions against a root screen
//! - [`coordinator`]: `Coordinator`, the per-flow state machine
//! - [`registry`]: `ChildRegistry`, weak child bookkeeping
//! - [`executor`]: `execute::<T>`, reuse-or-create for child flows
//! - [`navigator`]: `Navigator`, the per-UI-thread context
//! - [`step`]: `StepTranslator` and the single-slot step holder
//! - [`config`]: settings file and override resolution

pub mod action;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod executor;
pub mod navigator;
pub mod registry;
pub mod router;
pub mod step;

// Re-export commonly used types for convenience
pub use action::StepAction;
pub use coordinator::{Coordinator, CoordinatorId, CoordinatorRef, FlowTag, WeakCoordinator};
pub use error::NavigationError;
pub use executor::{Flow, execute};
pub use navigator::{Navigator, NavigatorHandle};
pub use step::StepTranslator;
