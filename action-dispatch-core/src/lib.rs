//! Core traits and types for action-dispatch
//!
//! This crate provides identifier-driven action dispatch for GUI and TUI
//! applications: commands are registered once against text identifiers,
//! triggers fire by name from anywhere in the UI, and per-invocation state
//! is gathered into a context rather than threaded through call sites.
//!
//! # Core Concepts
//!
//! - **Action**: A named unit of validate/perform behavior
//! - **ActionManager**: Registry and dispatcher keyed by identifier
//! - **ActionContext**: Per-dispatch envelope carrying the info bag
//! - **ContextProvider / Responder**: Collaborators contributing context
//! - **ActionNotification**: Lifecycle listeners around execution
//!
//! # Basic Example
//!
//! ```
//! use action_dispatch_core::prelude::*;
//! use std::sync::Arc;
//!
//! struct ExportAction;
//!
//! impl Action for ExportAction {
//!     fn validate(&self, context: &ActionContext) -> Validation {
//!         let mut validation = Validation::new(self.identifier());
//!         validation.set_enabled(context.get(&ActionKey::DOCUMENT).is_some());
//!         validation
//!     }
//!
//!     fn perform(&self, context: &ActionContext) {
//!         let _format = context.string(&ActionKey::new("format"));
//!         // export the current document
//!     }
//! }
//!
//! let manager = ActionManager::new();
//! manager.register(vec![Arc::new(ExportAction)]);
//!
//! // a menu item fires by identifier, with inline arguments
//! manager.perform("menu.Export(\"format\": \"pdf\")");
//! ```
//!
//! # Context Gathering
//!
//! Before validation or performing, the manager walks the sender and any
//! responder chains supplied by a [`ChainSource`], letting every
//! [`ContextProvider`] it finds contribute key/value data. UI code never
//! passes state to actions directly; it exposes providers and lets the
//! gather phase assemble the context.

pub mod action;
pub mod context;
pub mod identifier;
pub mod info;
pub mod key;
pub mod manager;
pub mod notification;
pub mod provider;
pub mod testing;
pub mod value;

// Action exports
pub use action::{
    Action, ActionError, Completion, DelegatedAction, Validation, ValidationState,
};

// Dispatch exports
pub use context::ActionContext;
pub use identifier::ParsedIdentifier;
pub use manager::ActionManager;

// Info bag exports
pub use info::ActionInfo;
pub use key::ActionKey;
pub use value::{ActionObserver, Value};

// Provider chain exports
pub use provider::{ChainSource, ContextProvider, NoopChainSource, Responder, Sender};

// Notification exports
pub use notification::{
    ActionNotification, NotificationCallback, NotificationStage, NotificationToken,
};

// Testing exports
pub use testing::{perform_and_wait, StageRecorder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{
        Action, ActionError, Completion, DelegatedAction, Validation, ValidationState,
    };
    pub use crate::context::ActionContext;
    pub use crate::info::ActionInfo;
    pub use crate::key::ActionKey;
    pub use crate::manager::ActionManager;
    pub use crate::notification::{ActionNotification, NotificationStage, NotificationToken};
    pub use crate::provider::{ChainSource, ContextProvider, Responder, Sender};
    pub use crate::value::Value;
}
