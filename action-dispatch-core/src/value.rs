//! Dynamically-typed values stored in a context info bag
//!
//! Rather than an open-ended `Any` bag, the info store holds a tagged union
//! with explicit variants for the kinds of data actions actually exchange:
//! primitives, file locators, ordered lists, observer sets, and opaque
//! references to live objects. Typed reads return `Option` instead of
//! casting unchecked.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// An observer stored in an info bag's observer set.
///
/// Deduplication uses the observer's own notion of equality, so re-adding
/// an equal observer is a no-op. A blanket implementation covers any
/// `'static` type with `PartialEq`.
pub trait ActionObserver: Send + Sync {
    /// View the observer as `Any` for typed iteration.
    fn as_any(&self) -> &dyn Any;

    /// Compare against another observer of possibly different type.
    fn observer_eq(&self, other: &dyn ActionObserver) -> bool;
}

impl<T> ActionObserver for T
where
    T: Any + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn observer_eq(&self, other: &dyn ActionObserver) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| self == o)
    }
}

/// A single value held under one info key.
///
/// A key holds at most one of the scalar, list, or set shapes at a time;
/// callers are responsible for using consistent accessors per key.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// File or resource locator.
    Path(PathBuf),
    /// Append-list shape, insertion order preserved.
    List(Vec<Value>),
    /// Observer-set shape, deduplicated by observer equality.
    Observers(Vec<Arc<dyn ActionObserver>>),
    /// Opaque reference to a live object. Dropped from serialization.
    Object(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap an arbitrary object as an opaque reference.
    pub fn object(value: impl Any + Send + Sync) -> Self {
        Value::Object(Arc::new(value))
    }

    /// View the value as a `&T` where the stored shape agrees.
    ///
    /// Works for primitive variants holding exactly `T`, and for `Object`
    /// references via downcast. Returns `None` otherwise.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Bool(v) => (v as &dyn Any).downcast_ref(),
            Value::Int(v) => (v as &dyn Any).downcast_ref(),
            Value::Float(v) => (v as &dyn Any).downcast_ref(),
            Value::String(v) => (v as &dyn Any).downcast_ref(),
            Value::Path(v) => (v as &dyn Any).downcast_ref(),
            Value::Object(v) => v.as_ref().downcast_ref(),
            _ => None,
        }
    }

    /// The value as a string slice, if it holds one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer, if it holds one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Interpret the value as a boolean flag.
    ///
    /// Booleans pass through, numbers are true when nonzero, and the
    /// strings `"true"` and `"YES"` are true. Everything else is false.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => matches!(s.as_str(), "true" | "YES"),
            _ => false,
        }
    }

    /// Convert to the serializable subset as JSON.
    ///
    /// Live references and observer sets are not serializable and yield
    /// `None`; an `Object` that happens to hold a `serde_json::Value`
    /// passes through. List elements that cannot be serialized are dropped.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            Value::Null => Some(serde_json::Value::Null),
            Value::Bool(b) => Some((*b).into()),
            Value::Int(i) => Some((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number),
            Value::String(s) => Some(s.clone().into()),
            Value::Path(p) => Some(p.to_string_lossy().into_owned().into()),
            Value::List(items) => Some(serde_json::Value::Array(
                items.iter().filter_map(Value::to_json).collect(),
            )),
            Value::Observers(_) => None,
            Value::Object(o) => o.as_ref().downcast_ref::<serde_json::Value>().cloned(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::String(v) => write!(f, "String({v:?})"),
            Value::Path(v) => write!(f, "Path({v:?})"),
            Value::List(v) => f.debug_tuple("List").field(v).finish(),
            Value::Observers(v) => write!(f, "Observers(len: {})", v.len()),
            Value::Object(_) => write!(f, "Object(..)"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Value::Path(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            object @ serde_json::Value::Object(_) => Value::Object(Arc::new(object)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_primitives() {
        let value = Value::from("hello");
        assert_eq!(value.downcast_ref::<String>().unwrap(), "hello");
        assert!(value.downcast_ref::<i64>().is_none());

        let value = Value::from(42);
        assert_eq!(*value.downcast_ref::<i64>().unwrap(), 42);
    }

    #[test]
    fn test_downcast_object() {
        #[derive(Debug, PartialEq)]
        struct Model {
            name: String,
        }

        let value = Value::object(Model {
            name: "m".to_string(),
        });
        assert_eq!(value.downcast_ref::<Model>().unwrap().name, "m");
        assert!(value.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_to_json_drops_live_references() {
        let value = Value::object(std::sync::Mutex::new(0));
        assert!(value.to_json().is_none());

        let value = Value::List(vec![
            Value::from("kept"),
            Value::object(std::sync::Mutex::new(0)),
        ]);
        let json = value.to_json().unwrap();
        assert_eq!(json, serde_json::json!(["kept"]));
    }

    #[test]
    fn test_json_object_round_trips() {
        let json = serde_json::json!({"a": 1});
        let value = Value::from(json.clone());
        assert_eq!(value.to_json().unwrap(), json);
    }

    #[test]
    fn test_from_json_numbers() {
        let value = Value::from(serde_json::json!(3));
        assert_eq!(value.as_int(), Some(3));

        let value = Value::from(serde_json::json!(1.5));
        assert!(matches!(value, Value::Float(f) if f == 1.5));
    }
}
