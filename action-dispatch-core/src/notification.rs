//! Lifecycle notifications around action execution
//!
//! Listeners can be attached to a single dispatch (via the context's info)
//! or globally to the manager. Each listener carries an action-identifier
//! filter; the empty string matches every action. For one dispatch the
//! stages always arrive in the order willPerform, then didPerform or
//! didFail, with context-scoped listeners invoked before global ones at
//! each stage.

use crate::action::ActionError;
use crate::context::ActionContext;
use std::fmt;
use std::sync::Arc;

/// Lifecycle checkpoint around an action's execution.
#[derive(Debug, Clone)]
pub enum NotificationStage {
    /// About to invoke the action.
    WillPerform,
    /// The action's completion reported success.
    DidPerform,
    /// The action's completion reported failure.
    DidFail(ActionError),
}

/// Callback invoked at each lifecycle stage.
pub type NotificationCallback = Arc<dyn Fn(&NotificationStage, &ActionContext) + Send + Sync>;

/// An action-identifier filter paired with a callback.
#[derive(Clone)]
pub struct ActionNotification {
    action: String,
    callback: NotificationCallback,
}

impl ActionNotification {
    /// Create a notification listener.
    ///
    /// `action` is either an exact action identifier or the empty string
    /// to match any action.
    pub fn new(
        action: impl Into<String>,
        callback: impl Fn(&NotificationStage, &ActionContext) + Send + Sync + 'static,
    ) -> Self {
        Self {
            action: action.into(),
            callback: Arc::new(callback),
        }
    }

    /// Whether this listener applies to the given action identifier.
    pub fn matches(&self, identifier: &str) -> bool {
        self.action.is_empty() || self.action == identifier
    }

    /// Invoke the callback.
    pub fn invoke(&self, stage: &NotificationStage, context: &ActionContext) {
        (self.callback)(stage, context);
    }
}

impl fmt::Debug for ActionNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionNotification(action: {:?})", self.action)
    }
}

/// Handle returned when registering a global notification listener,
/// usable to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationToken(u64);

impl NotificationToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matching() {
        let notification = ActionNotification::new("Save", |_, _| {});
        assert!(notification.matches("Save"));
        assert!(!notification.matches("Open"));

        let any = ActionNotification::new("", |_, _| {});
        assert!(any.matches("Save"));
        assert!(any.matches("Open"));
    }
}
