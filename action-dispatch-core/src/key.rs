//! Interned string keys for context info slots

use std::borrow::{Borrow, Cow};
use std::fmt;

/// A key identifying one slot in an [`ActionInfo`](crate::ActionInfo) store.
///
/// Keys compare and hash by their underlying string, so a key built at
/// runtime with [`ActionKey::new`] is interchangeable with the `const`
/// well-known keys below.
///
/// # Example
/// ```
/// use action_dispatch_core::ActionKey;
///
/// assert_eq!(ActionKey::new("sender"), ActionKey::SENDER);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ActionKey(Cow<'static, str>);

impl ActionKey {
    /// Create a key from a static string without allocating.
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Create a key from an owned or borrowed string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    /// The underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Well-known keys used as conventions between providers and actions.
impl ActionKey {
    pub const ACTION: ActionKey = ActionKey::from_static("action");
    pub const COMPONENTS: ActionKey = ActionKey::from_static("components");
    pub const DOCUMENT: ActionKey = ActionKey::from_static("document");
    pub const INFO: ActionKey = ActionKey::from_static("info");
    pub const MODEL: ActionKey = ActionKey::from_static("model");
    pub const NOTIFICATION: ActionKey = ActionKey::from_static("notification");
    pub const OBJECT: ActionKey = ActionKey::from_static("object");
    pub const OBSERVER: ActionKey = ActionKey::from_static("observer");
    pub const ROOT: ActionKey = ActionKey::from_static("root");
    pub const SELECTION: ActionKey = ActionKey::from_static("selection");
    pub const SENDER: ActionKey = ActionKey::from_static("sender");
    pub const SKIP_VALIDATION: ActionKey = ActionKey::from_static("skipValidation");
    pub const TARGET: ActionKey = ActionKey::from_static("target");
    pub const VIEW_MODEL: ActionKey = ActionKey::from_static("viewModel");
    pub const WINDOW: ActionKey = ActionKey::from_static("window");
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionKey({})", self.0)
    }
}

impl From<&str> for ActionKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ActionKey {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl Borrow<str> for ActionKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(key: &ActionKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(ActionKey::new("sender"), ActionKey::SENDER);
        assert_ne!(ActionKey::new("sender"), ActionKey::TARGET);
    }

    #[test]
    fn test_hash_matches_for_equal_strings() {
        assert_eq!(
            hash_of(&ActionKey::new("skipValidation")),
            hash_of(&ActionKey::SKIP_VALIDATION)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ActionKey::VIEW_MODEL.to_string(), "viewModel");
    }
}
