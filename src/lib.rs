//! Type-safe binding of native objects to script-engine identity keys.
//!
//! Script engines hand native identities around as untyped "external"
//! values: a single opaque pointer. This crate maps such keys back to typed
//! native pointers, with one independent namespace of bindings per native
//! type.
//!
//! ## Key Types
//!
//! - [`BindContext`]: binding state for one engine instance
//! - [`ScopedBinder`]: binds on construction, unbinds on drop
//! - [`BindKey`] / [`AsBindKey`]: opaque, non-null identity keys
//! - [`External`] / [`Value`] / [`ScriptValue`]: engine values carrying keys
//! - [`BindError`]: why a bind or unbind was rejected
//!
//! ## Example
//!
//! ```
//! use std::ptr::NonNull;
//! use jsbind::prelude::*;
//!
//! struct Widget {
//!     name: String,
//! }
//!
//! let ctx = BindContext::new();
//! let widget = Widget { name: "button".into() };
//! let ptr = NonNull::from(&widget);
//!
//! assert!(bind_native_self(&ctx, ptr).is_ok());
//! assert_eq!(get_bound_native::<Widget>(&ctx, ptr), Some(ptr));
//! assert!(bind_native_self(&ctx, ptr).is_err());
//! assert!(unbind_native_self(&ctx, ptr).is_ok());
//! assert!(get_bound_native::<Widget>(&ctx, ptr).is_none());
//! # let _ = &widget.name;
//! ```
//!
//! ## Safety
//!
//! A binding never owns its native object. Lookups return `NonNull<T>`;
//! dereferencing one is only sound while the object is alive, which is the
//! caller's responsibility (or use [`ScopedBinder::for_ref`], which borrows
//! the object for as long as it is bound).

mod config;
mod context;
mod scoped;

use std::ptr::NonNull;

pub use config::ContextConfig;
pub use context::BindContext;
pub use scoped::ScopedBinder;

pub use jsbind_core::{
    AsBindKey, BindError, BindKey, BindResult, External, ScriptValue, Value, external_key,
};
pub use jsbind_registry::{Binding, BindingTable, NativeRegistry};

/// Bind `native` under `key` in `ctx`. See [`BindContext::bind`].
pub fn bind_native<T: 'static>(
    ctx: &BindContext,
    key: impl AsBindKey,
    native: NonNull<T>,
) -> BindResult {
    ctx.bind(key, native)
}

/// Bind `native` under its own address. See [`BindContext::bind_self`].
pub fn bind_native_self<T: 'static>(ctx: &BindContext, native: NonNull<T>) -> BindResult {
    ctx.bind_self(native)
}

/// The `T` bound under `key` in `ctx`. See [`BindContext::get`].
pub fn get_bound_native<T: 'static>(ctx: &BindContext, key: impl AsBindKey) -> Option<NonNull<T>> {
    ctx.get(key)
}

/// Remove the binding of `native` under `key`. See [`BindContext::unbind`].
pub fn unbind_native<T: 'static>(
    ctx: &BindContext,
    key: impl AsBindKey,
    native: NonNull<T>,
) -> BindResult {
    ctx.unbind(key, native)
}

/// Remove the self-keyed binding of `native`. See [`BindContext::unbind_self`].
pub fn unbind_native_self<T: 'static>(ctx: &BindContext, native: NonNull<T>) -> BindResult {
    ctx.unbind_self(native)
}

// Re-export main types
pub mod prelude {
    pub use crate::{
        AsBindKey, BindContext, BindError, BindKey, BindResult, ContextConfig, External,
        ScopedBinder, ScriptValue, Value, bind_native, bind_native_self, get_bound_native,
        unbind_native, unbind_native_self,
    };
}
