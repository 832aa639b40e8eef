//! Test utilities for action-dispatch applications
//!
//! The completion-callback model means `didPerform`/`didFail` may arrive
//! after `perform` returns, so tests need a way to block until a dispatch
//! settles:
//!
//! - [`StageRecorder`]: registers a global listener, records every stage it
//!   sees, and can block until an outcome stage arrives
//! - [`perform_and_wait`]: one-shot perform that blocks for the outcome
//!
//! # Example
//!
//! ```
//! use action_dispatch_core::prelude::*;
//! use action_dispatch_core::testing::StageRecorder;
//! use std::sync::Arc;
//!
//! struct PingAction;
//! impl Action for PingAction {
//!     fn perform(&self, _context: &ActionContext) {}
//! }
//!
//! let manager = ActionManager::new();
//! manager.register(vec![Arc::new(PingAction)]);
//!
//! let recorder = StageRecorder::attach(&manager, "Ping");
//! manager.perform("Ping");
//! assert!(matches!(
//!     recorder.wait_for_outcome(),
//!     NotificationStage::DidPerform
//! ));
//! ```

use crate::manager::ActionManager;
use crate::notification::{NotificationStage, NotificationToken};
use parking_lot::Mutex;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

/// How long the wait helpers block before giving up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A global notification listener that records stages and can block until
/// a dispatch settles.
///
/// Attach before performing; every matching stage is recorded in arrival
/// order, and each outcome stage (`DidPerform` or `DidFail`) is also queued
/// for the wait methods. The listener is unregistered when the recorder is
/// dropped.
pub struct StageRecorder {
    manager: ActionManager,
    token: NotificationToken,
    stages: Arc<Mutex<Vec<NotificationStage>>>,
    outcomes: mpsc::Receiver<NotificationStage>,
}

impl StageRecorder {
    /// Attach a recorder to a manager.
    ///
    /// `action` is an exact action identifier, or the empty string to
    /// record every action.
    pub fn attach(manager: &ActionManager, action: impl Into<String>) -> Self {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let (outcome_tx, outcomes) = mpsc::channel();
        let recorded = Arc::clone(&stages);
        let token = manager.register_notification(action, move |stage, _| {
            recorded.lock().push(stage.clone());
            if !matches!(stage, NotificationStage::WillPerform) {
                let _ = outcome_tx.send(stage.clone());
            }
        });
        Self {
            manager: manager.clone(),
            token,
            stages,
            outcomes,
        }
    }

    /// Block until the next outcome stage arrives, up to [`DEFAULT_TIMEOUT`].
    ///
    /// # Panics
    ///
    /// Panics on timeout, making a never-called completion show up as a
    /// test failure instead of a hang.
    pub fn wait_for_outcome(&self) -> NotificationStage {
        self.wait_with_timeout(DEFAULT_TIMEOUT)
    }

    /// Block until the next outcome stage arrives, up to `timeout`.
    ///
    /// # Panics
    ///
    /// Panics on timeout.
    pub fn wait_with_timeout(&self, timeout: Duration) -> NotificationStage {
        self.outcomes
            .recv_timeout(timeout)
            .unwrap_or_else(|_| panic!("no didPerform or didFail within {timeout:?}"))
    }

    /// Every stage recorded so far, in arrival order.
    pub fn stages(&self) -> Vec<NotificationStage> {
        self.stages.lock().clone()
    }
}

impl Drop for StageRecorder {
    fn drop(&mut self) {
        self.manager.unregister_notification(self.token);
    }
}

/// Perform an identifier and block until the dispatch settles.
///
/// Records every action, so with nested dispatches (a delegated action's
/// forward, say) the first outcome observed is returned.
///
/// # Panics
///
/// Panics if no outcome arrives within [`DEFAULT_TIMEOUT`]; note that an
/// unresolved identifier never produces one.
pub fn perform_and_wait(manager: &ActionManager, identifier: &str) -> NotificationStage {
    let recorder = StageRecorder::attach(manager, "");
    manager.perform(identifier);
    recorder.wait_for_outcome()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::context::ActionContext;
    use std::borrow::Cow;

    struct QuickAction;

    impl Action for QuickAction {
        fn identifier(&self) -> Cow<'_, str> {
            Cow::Borrowed("quick")
        }

        fn perform(&self, _context: &ActionContext) {}
    }

    fn quick_manager() -> ActionManager {
        let manager = ActionManager::new();
        manager.register(vec![std::sync::Arc::new(QuickAction)]);
        manager
    }

    #[test]
    fn test_recorder_captures_both_stages() {
        let manager = quick_manager();
        let recorder = StageRecorder::attach(&manager, "quick");

        manager.perform("quick");
        assert!(matches!(
            recorder.wait_for_outcome(),
            NotificationStage::DidPerform
        ));

        let stages = recorder.stages();
        assert_eq!(stages.len(), 2);
        assert!(matches!(stages[0], NotificationStage::WillPerform));
        assert!(matches!(stages[1], NotificationStage::DidPerform));
    }

    #[test]
    fn test_recorder_detaches_on_drop() {
        let manager = quick_manager();
        let recorder = StageRecorder::attach(&manager, "quick");
        let token = recorder.token;
        drop(recorder);
        // the listener is already gone, so the token removes nothing
        assert!(!manager.unregister_notification(token));
    }

    #[test]
    fn test_perform_and_wait() {
        let manager = quick_manager();
        assert!(matches!(
            perform_and_wait(&manager, "quick"),
            NotificationStage::DidPerform
        ));
    }
}
