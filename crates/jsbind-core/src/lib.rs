//! Core types for jsbind.
//!
//! This crate holds the vocabulary shared by the registry and the embedding
//! facade:
//!
//! - [`BindKey`] / [`AsBindKey`]: opaque, non-null identity keys
//! - [`External`] / [`Value`] / [`ScriptValue`]: engine values that carry keys
//! - [`BindError`]: why a bind or unbind was rejected

mod error;
mod key;
mod value;

pub use error::{BindError, BindResult};
pub use key::{AsBindKey, BindKey};
pub use value::{External, ScriptValue, Value, external_key};
