use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};

/// Log representation of a single field value.
///
/// A value is either a scalar, a nested [`Group`](Value::Group) of
/// key/value pairs, or an [`Any`](Value::Any) blob produced by
/// structural serialization of a type that does not participate in the
/// [`ToLogValue`] protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Group(Vec<Attr>),
    Any(JsonValue),
}

impl Value {
    /// Build a nested group value from an ordered attribute list.
    pub fn group(attrs: Vec<Attr>) -> Value {
        Value::Group(attrs)
    }

    /// Serialize a value structurally, field by field.
    ///
    /// This is the path taken by types that do *not* implement
    /// [`ToLogValue`]: every public field ends up in the output. Types
    /// holding secrets should implement the protocol instead and emit a
    /// curated subset.
    pub fn from_serialize<T: Serialize>(value: &T) -> Value {
        match serde_json::to_value(value) {
            Ok(v) => Value::Any(v),
            Err(_) => Value::Any(JsonValue::Null),
        }
    }

    /// Borrow the inner string if this value is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert into the JSON shape the sink writes out.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Bool(b) => json!(b),
            Value::Int(i) => json!(i),
            Value::Uint(u) => json!(u),
            Value::Float(f) => json!(f),
            Value::String(s) => json!(s),
            Value::Group(attrs) => {
                let mut map = Map::new();
                for attr in attrs {
                    map.insert(attr.key.clone(), attr.value.to_json());
                }
                JsonValue::Object(map)
            }
            Value::Any(v) => v.clone(),
        }
    }
}

/// Capability to control one's own log representation.
///
/// Implementations decide what, if anything, of the underlying value is
/// serialized: collapse to a single scalar (hiding every field), or
/// expand to a [`Value::Group`] carrying an explicitly selected subset.
/// Anything not selected here is never written, even if present in the
/// value's memory.
pub trait ToLogValue {
    fn to_log_value(&self) -> Value;
}

impl ToLogValue for Value {
    fn to_log_value(&self) -> Value {
        self.clone()
    }
}

impl<T: ToLogValue + ?Sized> ToLogValue for &T {
    fn to_log_value(&self) -> Value {
        (**self).to_log_value()
    }
}

impl ToLogValue for str {
    fn to_log_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToLogValue for String {
    fn to_log_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToLogValue for bool {
    fn to_log_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToLogValue for i32 {
    fn to_log_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }
}

impl ToLogValue for i64 {
    fn to_log_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl ToLogValue for u32 {
    fn to_log_value(&self) -> Value {
        Value::Uint(u64::from(*self))
    }
}

impl ToLogValue for u64 {
    fn to_log_value(&self) -> Value {
        Value::Uint(*self)
    }
}

impl ToLogValue for f64 {
    fn to_log_value(&self) -> Value {
        Value::Float(*self)
    }
}

/// One key/value pair of a record's ordered attribute sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    /// Build an attribute, resolving the value through [`ToLogValue`].
    ///
    /// Resolution happens here, at field-capture time, so a type that
    /// redacts itself is redacted before the record ever reaches a sink.
    pub fn new(key: impl Into<String>, value: impl ToLogValue) -> Attr {
        Attr {
            key: key.into(),
            value: value.to_log_value(),
        }
    }
}
