//! Engine-side values that can carry a binding key.
//!
//! The host engine transports native identities through an opaque
//! "external" value whose payload is a single pointer. This module models
//! that value ([`External`]), a tagged engine value that may or may not be an
//! external ([`Value`]), and the [`ScriptValue`] seam through which real
//! engine handle types plug into the binding API.

use std::ffi::c_void;
use std::fmt;

use crate::{BindError, BindKey};

/// Opaque external value: a single pointer-sized payload owned by the engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct External {
    payload: *const c_void,
}

impl External {
    /// Wrap a raw payload pointer.
    pub fn new<T: ?Sized>(payload: *const T) -> Self {
        Self {
            payload: payload.cast(),
        }
    }

    /// Wrap a binding key as an external payload.
    pub fn from_key(key: BindKey) -> Self {
        Self::new(key.as_ptr())
    }

    /// The raw payload.
    pub fn value(&self) -> *const c_void {
        self.payload
    }

    /// The payload as a binding key, or `None` if it is null.
    pub fn key(&self) -> Option<BindKey> {
        BindKey::from_ptr(self.payload)
    }
}

impl fmt::Debug for External {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "External({:p})", self.payload)
    }
}

/// A tagged engine-side value.
///
/// Only [`Value::External`] can carry a binding key; every other kind is
/// rejected by key extraction without touching a registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Undefined
    Undefined,
    /// Null
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// String value (owned)
    String(String),
    /// Opaque external carrying a native identity
    External(External),
}

impl Value {
    /// Get a human-readable name for this value's kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::External(_) => "external",
        }
    }

    /// Check if this value is an external.
    pub fn is_external(&self) -> bool {
        matches!(self, Value::External(_))
    }
}

impl From<External> for Value {
    fn from(external: External) -> Self {
        Value::External(external)
    }
}

/// An engine value handle that may carry an external.
///
/// Engine bindings implement this for their handle types. `Option<V>` stands
/// in for a possibly-empty handle.
pub trait ScriptValue {
    /// Whether the handle holds no value at all.
    fn is_empty(&self) -> bool {
        false
    }

    /// The external this value is tagged as, if any.
    fn as_external(&self) -> Option<&External>;

    /// Name of the value's kind, for error reporting.
    fn type_name(&self) -> &'static str;
}

impl ScriptValue for External {
    fn as_external(&self) -> Option<&External> {
        Some(self)
    }

    fn type_name(&self) -> &'static str {
        "external"
    }
}

impl ScriptValue for Value {
    fn as_external(&self) -> Option<&External> {
        match self {
            Value::External(external) => Some(external),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        Value::type_name(self)
    }
}

impl<V: ScriptValue> ScriptValue for Option<V> {
    fn is_empty(&self) -> bool {
        self.as_ref().is_none_or(ScriptValue::is_empty)
    }

    fn as_external(&self) -> Option<&External> {
        self.as_ref().and_then(ScriptValue::as_external)
    }

    fn type_name(&self) -> &'static str {
        match self {
            Some(value) => value.type_name(),
            None => "empty",
        }
    }
}

impl<V: ScriptValue + ?Sized> ScriptValue for &V {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn as_external(&self) -> Option<&External> {
        (**self).as_external()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

/// Extract the binding key carried by an engine value.
///
/// Fails with [`BindError::EmptyHandle`] for an empty handle,
/// [`BindError::NotExternal`] for any non-external value and
/// [`BindError::NullKey`] for an external whose payload is null.
pub fn external_key<V: ScriptValue + ?Sized>(value: &V) -> Result<BindKey, BindError> {
    if value.is_empty() {
        return Err(BindError::EmptyHandle);
    }
    let external = value.as_external().ok_or(BindError::NotExternal {
        kind: value.type_name(),
    })?;
    external.key().ok_or(BindError::NullKey)
}
