//! action-dispatch: identifier-driven command dispatch for UI apps
//!
//! Register actions once, trigger them by name from menus, buttons and key
//! handlers, and let a provider chain assemble the context each invocation
//! needs. Call sites stay decoupled from the objects that do the work.
//!
//! # Example
//! ```
//! use action_dispatch::prelude::*;
//! use std::sync::Arc;
//!
//! struct SaveAction;
//!
//! impl Action for SaveAction {
//!     fn perform(&self, context: &ActionContext) {
//!         let _path = context.string(&ActionKey::new("path"));
//!     }
//! }
//!
//! let manager = ActionManager::new();
//! manager.register(vec![Arc::new(SaveAction)]);
//! manager.perform("toolbar.Save(\"path\": \"/tmp/out.txt\")");
//! ```

// Re-export everything from core
pub use action_dispatch_core::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use action_dispatch_core::prelude::*;
}
