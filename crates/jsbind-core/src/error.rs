//! Binding error types.
//!
//! Every failure of a bind or unbind is a local precondition violation.
//! [`BindError`] names which one; there are no other failure causes.
//!
//! ```text
//! BindError
//! ├── NullKey       - key (or external payload) is null
//! ├── EmptyHandle   - engine handle holds no value
//! ├── NotExternal   - engine value is not an opaque external
//! ├── AlreadyBound  - key already bound for this native type
//! ├── NotBound      - key not bound for this native type
//! └── Mismatch      - key bound, but to a different native object
//! ```

use thiserror::Error;

use crate::BindKey;

/// Why a bind or unbind was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The binding key was null.
    #[error("binding key is null")]
    NullKey,

    /// The engine handle was empty.
    #[error("engine handle is empty")]
    EmptyHandle,

    /// The engine value was not tagged as an opaque external.
    #[error("expected an external value, found {kind}")]
    NotExternal { kind: &'static str },

    /// The key already has a binding for this native type.
    #[error("key {key} is already bound for native type `{type_name}`")]
    AlreadyBound {
        key: BindKey,
        type_name: &'static str,
    },

    /// The key has no binding for this native type.
    #[error("key {key} is not bound for native type `{type_name}`")]
    NotBound {
        key: BindKey,
        type_name: &'static str,
    },

    /// The key is bound, but to a different native object.
    #[error("key {key} is bound to a different `{type_name}` instance")]
    Mismatch {
        key: BindKey,
        type_name: &'static str,
    },
}

impl BindError {
    /// The key involved, for errors raised after a key was resolved.
    pub fn key(&self) -> Option<BindKey> {
        match self {
            BindError::AlreadyBound { key, .. }
            | BindError::NotBound { key, .. }
            | BindError::Mismatch { key, .. } => Some(*key),
            BindError::NullKey | BindError::EmptyHandle | BindError::NotExternal { .. } => None,
        }
    }

    /// Short, stable name for this error kind (used as a log field).
    pub fn kind(&self) -> &'static str {
        match self {
            BindError::NullKey => "null_key",
            BindError::EmptyHandle => "empty_handle",
            BindError::NotExternal { .. } => "not_external",
            BindError::AlreadyBound { .. } => "already_bound",
            BindError::NotBound { .. } => "not_bound",
            BindError::Mismatch { .. } => "mismatch",
        }
    }
}

/// Result alias for binding operations.
pub type BindResult<T = ()> = Result<T, BindError>;
