//! The per-dispatch envelope passed to actions
//!
//! One context is created per dispatch attempt, immediately before the
//! gather phase, and carries the resolved action, the raw trigger
//! identifier, any leftover path components, and the mutable info bag.
//! Many contexts may reference the same action and manager at once; the
//! info bag is exclusively owned by its dispatch.

use crate::action::Action;
use crate::info::ActionInfo;
use crate::key::ActionKey;
use crate::manager::ActionManager;
use crate::notification::{ActionNotification, NotificationStage};
use crate::provider::Sender;
use crate::value::Value;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;

/// Records the context in which an action was invoked.
pub struct ActionContext {
    manager: ActionManager,
    action: Arc<dyn Action>,
    identifier: String,
    parameters: Vec<String>,
    info: RwLock<ActionInfo>,
}

impl ActionContext {
    /// Create a context for a given action, identifier, parameters and info.
    ///
    /// Normally the manager constructs contexts during resolution; direct
    /// construction is useful for tests and for drivers that bypass the
    /// identifier parser.
    pub fn new(
        manager: ActionManager,
        action: Arc<dyn Action>,
        identifier: impl Into<String>,
        parameters: Vec<String>,
        info: ActionInfo,
    ) -> Self {
        Self {
            manager,
            action,
            identifier: identifier.into(),
            parameters,
            info: RwLock::new(info),
        }
    }

    /// The manager handling this dispatch.
    pub fn manager(&self) -> &ActionManager {
        &self.manager
    }

    /// The action being invoked.
    pub fn action(&self) -> &Arc<dyn Action> {
        &self.action
    }

    /// The full identifier that triggered the action.
    ///
    /// This is the unparsed trigger, which may contain prefixes and
    /// arguments; it can differ from the action's own identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Components of the trigger identifier not consumed by action lookup.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Read access to the info bag.
    pub fn info(&self) -> RwLockReadGuard<'_, ActionInfo> {
        self.info.read()
    }

    /// Write access to the info bag.
    pub fn info_mut(&self) -> RwLockWriteGuard<'_, ActionInfo> {
        self.info.write()
    }

    /// Read a value from the info bag, cloned out of the lock.
    pub fn get(&self, key: &ActionKey) -> Option<Value> {
        self.info.read().get(key).cloned()
    }

    /// Store a value into the info bag.
    pub fn set(&self, key: ActionKey, value: impl Into<Value>) {
        self.info.write().set(key, value);
    }

    /// Interpret an info value as a boolean flag.
    pub fn flag(&self, key: &ActionKey) -> bool {
        self.info.read().flag(key)
    }

    /// An info value as an owned string, if it holds one.
    pub fn string(&self, key: &ActionKey) -> Option<String> {
        self.info.read().string(key).map(str::to_string)
    }

    /// The sender that triggered this dispatch.
    pub fn sender(&self) -> Sender {
        self.info.read().sender()
    }

    /// Send a lifecycle notification to all matching listeners.
    ///
    /// Listeners registered on this context's info fire first, then the
    /// supplied global listeners, never interleaved. Listeners whose
    /// filter does not match the action are skipped.
    pub fn notify(&self, stage: &NotificationStage, global: &[ActionNotification]) {
        let identifier = self.action.identifier().into_owned();

        // Collect before invoking so callbacks are free to touch the info.
        let mut scoped = Vec::new();
        self.info
            .read()
            .for_each::<ActionNotification>(&ActionKey::NOTIFICATION, |notification| {
                if notification.matches(&identifier) {
                    scoped.push(notification.clone());
                }
            });

        for notification in &scoped {
            notification.invoke(stage, self);
        }
        for notification in global {
            if notification.matches(&identifier) {
                notification.invoke(stage, self);
            }
        }
    }

    /// Export a plain representation of this dispatch.
    ///
    /// Contains the resolved action identifier and the serializable subset
    /// of the info entries, enough to log or replay the invocation.
    pub fn serialized(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(
            ActionKey::ACTION.to_string(),
            self.action.identifier().as_ref().into(),
        );
        map.insert(ActionKey::INFO.to_string(), self.info.read().serialized());
        serde_json::Value::Object(map)
    }
}

impl fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("action", &self.action.identifier())
            .field("identifier", &self.identifier)
            .field("parameters", &self.parameters)
            .field("info", &*self.info.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Validation;
    use std::borrow::Cow;

    struct TestAction;

    impl Action for TestAction {
        fn identifier(&self) -> Cow<'_, str> {
            Cow::Borrowed("Test")
        }
    }

    fn test_context(info: ActionInfo) -> ActionContext {
        ActionContext::new(
            ActionManager::new(),
            Arc::new(TestAction),
            "Test",
            vec!["p1".to_string(), "p2".to_string()],
            info,
        )
    }

    #[test]
    fn test_accessors() {
        let context = test_context(ActionInfo::new());
        assert_eq!(context.identifier(), "Test");
        assert_eq!(context.parameters(), ["p1", "p2"]);
        assert_eq!(context.action().identifier(), "Test");
    }

    #[test]
    fn test_info_round_trip() {
        let context = test_context(ActionInfo::new());
        context.set(ActionKey::new("foo"), "bar");
        assert_eq!(context.string(&ActionKey::new("foo")), Some("bar".into()));
        assert!(context.get(&ActionKey::new("missing")).is_none());
    }

    #[test]
    fn test_explicit_sender() {
        let context = test_context(ActionInfo::with_sender(Sender::object(7_i64)));
        match context.sender() {
            Sender::Object(object) => {
                assert_eq!(object.downcast_ref::<i64>(), Some(&7));
            }
            other => panic!("expected object sender, got {other:?}"),
        }
    }

    #[test]
    fn test_default_sender_is_none() {
        let context = test_context(ActionInfo::new());
        assert!(context.sender().is_none());
    }

    #[test]
    fn test_notify_matches_context_listeners() {
        let mut info = ActionInfo::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let recorder = Arc::clone(&seen);
        info.register_notification("Test", move |stage, _| {
            recorder.lock().push(format!("{stage:?}"));
        });
        let recorder = Arc::clone(&seen);
        info.register_notification("Other", move |_, _| {
            recorder.lock().push("wrong".to_string());
        });

        let context = test_context(info);
        context.notify(&NotificationStage::WillPerform, &[]);
        context.notify(&NotificationStage::DidPerform, &[]);

        let seen = seen.lock();
        assert_eq!(seen.as_slice(), ["WillPerform", "DidPerform"]);
    }

    #[test]
    fn test_serialized_contents() {
        let context = test_context(ActionInfo::new());
        context.set(ActionKey::new("format"), "pdf");
        context.set(ActionKey::new("window"), Value::object(std::sync::Mutex::new(0)));

        let json = context.serialized();
        assert_eq!(json["action"], "Test");
        assert_eq!(json["info"]["format"], "pdf");
        assert!(json["info"].get("window").is_none());
    }

    #[test]
    fn test_validation_unused_context_param() {
        // default validate ignores the context entirely
        let context = test_context(ActionInfo::new());
        let validation: Validation = context.action().validate(&context);
        assert!(validation.enabled());
    }
}
