//! Per-dispatch key/value context store
//!
//! One [`ActionInfo`] is created per dispatch attempt (or supplied by the
//! caller to pre-seed values such as the sender). Context providers write
//! into it during the gather phase; the action reads from it to decide
//! whether and how to run. Keys hold scalars, ordered append-lists, or
//! deduplicated observer sets.

use crate::context::ActionContext;
use crate::key::ActionKey;
use crate::notification::{ActionNotification, NotificationStage};
use crate::provider::Sender;
use crate::value::{ActionObserver, Value};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Ordered, typed key/value store attached to an [`ActionContext`].
#[derive(Clone, Default)]
pub struct ActionInfo {
    values: IndexMap<ActionKey, Value>,
}

impl ActionInfo {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a sender under [`ActionKey::SENDER`].
    pub fn with_sender(sender: Sender) -> Self {
        let mut info = Self::new();
        info.set(ActionKey::SENDER, Value::object(sender));
        info
    }

    /// The sender stored in this info, or [`Sender::None`] if absent.
    pub fn sender(&self) -> Sender {
        self.get(&ActionKey::SENDER)
            .and_then(|value| value.downcast_ref::<Sender>())
            .cloned()
            .unwrap_or(Sender::None)
    }

    /// Read the value stored under a key.
    pub fn get(&self, key: &ActionKey) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store a value under a key, replacing any previous value.
    pub fn set(&mut self, key: ActionKey, value: impl Into<Value>) {
        self.values.insert(key, value.into());
    }

    /// Whether the key holds any value.
    pub fn contains(&self, key: &ActionKey) -> bool {
        self.values.contains_key(key)
    }

    /// Treat the key as a list and append a value to it.
    ///
    /// If the key held no list, a one-element list is started. Insertion
    /// order is preserved.
    pub fn append(&mut self, key: ActionKey, value: impl Into<Value>) {
        match self.values.get_mut(&key) {
            Some(Value::List(items)) => items.push(value.into()),
            _ => {
                self.values.insert(key, Value::List(vec![value.into()]));
            }
        }
    }

    /// Iterate the list under a key, visiting elements of the expected type.
    ///
    /// Does nothing if the key is absent or holds a different shape;
    /// elements of other types are skipped. Soft failure is deliberate.
    pub fn for_each<T: Any>(&self, key: &ActionKey, mut visit: impl FnMut(&T)) {
        if let Some(Value::List(items)) = self.values.get(key) {
            for item in items {
                if let Some(typed) = item.downcast_ref::<T>() {
                    visit(typed);
                }
            }
        }
    }

    /// Insert an observer into the set under [`ActionKey::OBSERVER`].
    pub fn add_observer(&mut self, observer: Arc<dyn ActionObserver>) {
        self.add_observer_for(ActionKey::OBSERVER, observer);
    }

    /// Insert an observer into the set under a key.
    ///
    /// The set is keyed by the observer's own equality, so re-adding an
    /// equal observer leaves the set unchanged.
    pub fn add_observer_for(&mut self, key: ActionKey, observer: Arc<dyn ActionObserver>) {
        match self.values.get_mut(&key) {
            Some(Value::Observers(observers)) => {
                let duplicate = observers
                    .iter()
                    .any(|existing| existing.observer_eq(observer.as_ref()));
                if !duplicate {
                    observers.push(observer);
                }
            }
            _ => {
                self.values.insert(key, Value::Observers(vec![observer]));
            }
        }
    }

    /// Iterate observers of type `T` under [`ActionKey::OBSERVER`].
    pub fn for_observers<T: Any>(&self, visit: impl FnMut(&T)) {
        self.for_observers_at(&ActionKey::OBSERVER, visit);
    }

    /// Iterate observers of type `T` under a key.
    ///
    /// Observers of other types are skipped; heterogeneous sets under one
    /// key are legal.
    pub fn for_observers_at<T: Any>(&self, key: &ActionKey, mut visit: impl FnMut(&T)) {
        if let Some(Value::Observers(observers)) = self.values.get(key) {
            for observer in observers {
                if let Some(typed) = observer.as_any().downcast_ref::<T>() {
                    visit(typed);
                }
            }
        }
    }

    /// Interpret the value under a key as a boolean flag.
    ///
    /// An absent key or an uncoercible value is `false`; see
    /// [`Value::truthy`] for the coercion rules.
    pub fn flag(&self, key: &ActionKey) -> bool {
        self.get(key).map(Value::truthy).unwrap_or(false)
    }

    /// Interpret the value under a key as a file/resource locator.
    ///
    /// A stored path passes through; a string is coerced; anything else
    /// yields `None`.
    pub fn path(&self, key: &ActionKey) -> Option<PathBuf> {
        match self.get(key)? {
            Value::Path(path) => Some(path.clone()),
            Value::String(string) => Some(PathBuf::from(string)),
            _ => None,
        }
    }

    /// The value under a key as a string slice, if it holds one.
    pub fn string(&self, key: &ActionKey) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Register a per-dispatch notification listener.
    ///
    /// The listener is appended to the list under
    /// [`ActionKey::NOTIFICATION`] and fires for lifecycle stages of this
    /// dispatch only. An empty `action` filter matches any action.
    pub fn register_notification(
        &mut self,
        action: impl Into<String>,
        callback: impl Fn(&NotificationStage, &ActionContext) + Send + Sync + 'static,
    ) {
        let notification = ActionNotification::new(action, callback);
        self.append(ActionKey::NOTIFICATION, Value::object(notification));
    }

    /// Number of keys in the store.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ActionKey> {
        self.values.keys()
    }

    /// Export the serializable subset of the store as a JSON object.
    ///
    /// Entries holding live references are dropped silently.
    pub fn serialized(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.values {
            if let Some(json) = value.to_json() {
                map.insert(key.to_string(), json);
            }
        }
        serde_json::Value::Object(map)
    }
}

impl fmt::Debug for ActionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.values.keys().map(ActionKey::as_str).collect();
        write!(f, "ActionInfo(keys: {})", keys.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut info = ActionInfo::new();
        let key = ActionKey::new("k");
        info.append(key.clone(), "item1");
        info.append(key.clone(), "item2");

        let mut items = Vec::new();
        info.for_each::<String>(&key, |item| items.push(item.clone()));
        assert_eq!(items, vec!["item1", "item2"]);
    }

    #[test]
    fn test_append_replaces_scalar_with_fresh_list() {
        let mut info = ActionInfo::new();
        let key = ActionKey::new("k");
        info.set(key.clone(), "scalar");
        info.append(key.clone(), "item");

        let mut items = Vec::new();
        info.for_each::<String>(&key, |item| items.push(item.clone()));
        assert_eq!(items, vec!["item"]);
    }

    #[test]
    fn test_for_each_soft_fails() {
        let info = ActionInfo::new();
        let mut visited = 0;
        info.for_each::<String>(&ActionKey::new("missing"), |_| visited += 1);
        assert_eq!(visited, 0);

        let mut info = ActionInfo::new();
        info.set(ActionKey::new("scalar"), 1);
        info.for_each::<String>(&ActionKey::new("scalar"), |_| visited += 1);
        assert_eq!(visited, 0);
    }

    #[derive(PartialEq)]
    struct TestObserver {
        name: String,
    }

    impl TestObserver {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
            })
        }
    }

    #[test]
    fn test_observers_iterate() {
        let mut info = ActionInfo::new();
        info.add_observer(TestObserver::new("one"));
        info.add_observer(TestObserver::new("two"));

        let mut names = Vec::new();
        info.for_observers::<TestObserver>(|observer| names.push(observer.name.clone()));
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"one".to_string()));
        assert!(names.contains(&"two".to_string()));
    }

    #[test]
    fn test_observers_deduplicate() {
        let mut info = ActionInfo::new();
        info.add_observer(TestObserver::new("same"));
        info.add_observer(TestObserver::new("same"));

        let mut count = 0;
        info.for_observers::<TestObserver>(|_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_observers_skip_other_types() {
        let mut info = ActionInfo::new();
        info.add_observer(TestObserver::new("one"));
        info.add_observer(Arc::new("plain string".to_string()));

        let mut count = 0;
        info.for_observers::<TestObserver>(|_| count += 1);
        assert_eq!(count, 1);

        let mut strings = 0;
        info.for_observers::<String>(|_| strings += 1);
        assert_eq!(strings, 1);
    }

    #[test]
    fn test_flag_truth_table() {
        let key = ActionKey::new("test");
        let mut info = ActionInfo::new();
        assert!(!info.flag(&key));

        info.set(key.clone(), 0);
        assert!(!info.flag(&key));

        info.set(key.clone(), false);
        assert!(!info.flag(&key));

        info.set(key.clone(), "false");
        assert!(!info.flag(&key));

        info.set(key.clone(), "NO");
        assert!(!info.flag(&key));

        info.set(key.clone(), 1);
        assert!(info.flag(&key));

        info.set(key.clone(), true);
        assert!(info.flag(&key));

        info.set(key.clone(), "true");
        assert!(info.flag(&key));

        info.set(key.clone(), "YES");
        assert!(info.flag(&key));
    }

    #[test]
    fn test_path_coercion() {
        let key = ActionKey::new("file");
        let mut info = ActionInfo::new();
        assert_eq!(info.path(&key), None);

        info.set(key.clone(), PathBuf::from("/tmp/a"));
        assert_eq!(info.path(&key), Some(PathBuf::from("/tmp/a")));

        info.set(key.clone(), "/tmp/b");
        assert_eq!(info.path(&key), Some(PathBuf::from("/tmp/b")));

        info.set(key.clone(), 3);
        assert_eq!(info.path(&key), None);
    }

    #[test]
    fn test_serialized_drops_live_references() {
        let mut info = ActionInfo::new();
        info.set(ActionKey::new("name"), "value");
        info.set(ActionKey::new("count"), 3);
        info.set(ActionKey::new("object"), Value::object(std::sync::Mutex::new(0)));

        let json = info.serialized();
        assert_eq!(json["name"], "value");
        assert_eq!(json["count"], 3);
        assert!(json.get("object").is_none());
    }

    #[test]
    fn test_sender_round_trip() {
        let info = ActionInfo::with_sender(Sender::object("button"));
        match info.sender() {
            Sender::Object(object) => {
                assert_eq!(object.downcast_ref::<&str>(), Some(&"button"));
            }
            other => panic!("expected object sender, got {other:?}"),
        }

        assert!(matches!(ActionInfo::new().sender(), Sender::None));
    }
}
