//! BindContext - the binding state of one engine instance.
//!
//! A [`BindContext`] owns a [`BindingTable`] and exposes type-directed bind,
//! lookup and unbind through `&self`, so a [`ScopedBinder`] can hold the
//! context while other code keeps using it.
//!
//! # Thread Safety
//!
//! The table sits in a `RefCell` and stores raw native pointers, so a context
//! is neither `Send` nor `Sync`. That matches the host engine's rule of one
//! thread at a time per execution context.
//!
//! A context cannot be moved to another thread:
//!
//! ```compile_fail
//! use jsbind::BindContext;
//!
//! let ctx = BindContext::new();
//! std::thread::spawn(move || {
//!     let _ = ctx.len();
//! });
//! ```
//!
//! Nor shared with one:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use jsbind::BindContext;
//!
//! let ctx = Arc::new(BindContext::new());
//! let shared = Arc::clone(&ctx);
//! std::thread::spawn(move || {
//!     let _ = shared.len();
//! });
//! ```
//!
//! # Teardown
//!
//! All bindings should be unbound before the context is dropped. Dropping a
//! context with live bindings frees the mapping entries (never the natives)
//! and, unless disabled in [`ContextConfig`], logs a warning per native type.
//!
//! # Example
//!
//! ```
//! use std::ptr::NonNull;
//! use jsbind::{BindContext, External, Value};
//!
//! struct Widget {
//!     id: u32,
//! }
//!
//! let ctx = BindContext::new();
//! let widget = Widget { id: 7 };
//! let ptr = NonNull::from(&widget);
//!
//! ctx.bind_self(ptr).unwrap();
//!
//! let handle = Value::from(External::new(ptr.as_ptr()));
//! let found = ctx.get_from_value::<Widget, _>(&handle).unwrap();
//! assert_eq!(unsafe { found.as_ref() }.id, 7);
//!
//! ctx.unbind_self(ptr).unwrap();
//! assert!(ctx.is_empty());
//! ```

use std::any::type_name;
use std::cell::RefCell;
use std::fmt;
use std::ptr::NonNull;

use jsbind_core::{AsBindKey, BindError, BindKey, BindResult, ScriptValue, external_key};
use jsbind_registry::BindingTable;

use crate::{ContextConfig, ScopedBinder};

/// Binding state for one engine instance.
pub struct BindContext {
    table: RefCell<BindingTable>,
    config: ContextConfig,
}

impl BindContext {
    /// Create a context with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ContextConfig::default())
    }

    /// Create a context with the given configuration.
    pub fn with_config(config: ContextConfig) -> Self {
        Self {
            table: RefCell::new(BindingTable::with_capacity(config.capacity_hint)),
            config,
        }
    }

    /// The configuration this context was created with.
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    // ==========================================================================
    // Bind
    // ==========================================================================

    /// Bind `native` under `key`.
    ///
    /// Fails if the key is null or already bound for `T`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn bind<T: 'static>(&self, key: impl AsBindKey, native: NonNull<T>) -> BindResult {
        let key = key.bind_key();
        let result = match key {
            Some(key) => self.table.borrow_mut().bind(key, native),
            None => Err(BindError::NullKey),
        };
        self.record::<T>("bind", key, &result);
        result
    }

    /// Bind `native` under its own address.
    pub fn bind_self<T: 'static>(&self, native: NonNull<T>) -> BindResult {
        self.bind(native, native)
    }

    /// Bind `native` under the key carried by an engine external handle.
    ///
    /// Fails if the handle is empty, is not an external, or carries a null
    /// payload.
    pub fn bind_external<T: 'static, V: ScriptValue + ?Sized>(
        &self,
        handle: &V,
        native: NonNull<T>,
    ) -> BindResult {
        match external_key(handle) {
            Ok(key) => self.bind(key, native),
            Err(err) => self.reject::<T>("bind", err),
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// The `T` bound under `key`, if any. A null key yields `None`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn get<T: 'static>(&self, key: impl AsBindKey) -> Option<NonNull<T>> {
        self.table.borrow().get(key)
    }

    /// The `T` bound under the key an engine value carries.
    ///
    /// Yields `None` without consulting the table unless `value` is an
    /// external.
    pub fn get_from_value<T: 'static, V: ScriptValue + ?Sized>(
        &self,
        value: &V,
    ) -> Option<NonNull<T>> {
        let key = external_key(value).ok()?;
        self.get(key)
    }

    /// Check if `key` is bound for `T`.
    pub fn contains<T: 'static>(&self, key: impl AsBindKey) -> bool {
        self.table.borrow().contains::<T>(key)
    }

    // ==========================================================================
    // Unbind
    // ==========================================================================

    /// Remove the binding of `native` under `key`.
    ///
    /// Fails if the key is null, unbound, or bound to a different object; in
    /// the last case the existing binding stays in place.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn unbind<T: 'static>(&self, key: impl AsBindKey, native: NonNull<T>) -> BindResult {
        let key = key.bind_key();
        let result = match key {
            Some(key) => self.table.borrow_mut().unbind(key, native),
            None => Err(BindError::NullKey),
        };
        self.record::<T>("unbind", key, &result);
        result
    }

    /// Remove the binding of `native` under its own address.
    pub fn unbind_self<T: 'static>(&self, native: NonNull<T>) -> BindResult {
        self.unbind(native, native)
    }

    /// Remove the binding of `native` under the key an engine value carries.
    pub fn unbind_external<T: 'static, V: ScriptValue + ?Sized>(
        &self,
        handle: &V,
        native: NonNull<T>,
    ) -> BindResult {
        match external_key(handle) {
            Ok(key) => self.unbind(key, native),
            Err(err) => self.reject::<T>("unbind", err),
        }
    }

    // ==========================================================================
    // Scoped Bindings
    // ==========================================================================

    /// Bind `native` under `key` until the returned guard drops.
    pub fn scoped<T: 'static>(
        &self,
        key: impl AsBindKey,
        native: NonNull<T>,
    ) -> ScopedBinder<'_, T> {
        ScopedBinder::new(self, key, native)
    }

    // ==========================================================================
    // Introspection
    // ==========================================================================

    /// Number of live bindings for `T`.
    pub fn count<T: 'static>(&self) -> usize {
        self.table.borrow().count::<T>()
    }

    /// Total number of live bindings.
    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    /// Check if no bindings are live.
    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }

    /// Native types with live bindings and their counts, sorted by name.
    pub fn bound_types(&self) -> Vec<(&'static str, usize)> {
        self.table.borrow().bound_types()
    }

    /// Drop every binding. Native objects are untouched.
    ///
    /// Outstanding [`ScopedBinder`]s will find their binding gone when they
    /// drop; that is logged and otherwise ignored.
    pub fn clear(&self) {
        let mut table = self.table.borrow_mut();
        let dropped = table.len();
        table.clear();
        tracing::debug!(context = self.config.label(), dropped, "bindings cleared");
    }

    // ==========================================================================
    // Logging
    // ==========================================================================

    fn record<T>(&self, op: &'static str, key: Option<BindKey>, result: &BindResult) {
        let native = type_name::<T>();
        match result {
            Ok(()) => {
                tracing::trace!(
                    context = self.config.label(),
                    op,
                    native,
                    key = ?key,
                    "binding updated"
                );
            }
            Err(err) => {
                tracing::debug!(
                    context = self.config.label(),
                    op,
                    native,
                    key = ?key,
                    kind = err.kind(),
                    %err,
                    "binding rejected"
                );
            }
        }
    }

    fn reject<T>(&self, op: &'static str, err: BindError) -> BindResult {
        let result = Err(err);
        self.record::<T>(op, None, &result);
        result
    }
}

impl Default for BindContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BindContext {
    fn drop(&mut self) {
        if !self.config.report_leaks {
            return;
        }
        for (native, count) in self.table.get_mut().bound_types() {
            tracing::warn!(
                context = self.config.label(),
                native,
                count,
                "binding context dropped with live bindings"
            );
        }
    }
}

impl fmt::Debug for BindContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindContext")
            .field("name", &self.config.name)
            .field("bindings", &self.len())
            .finish()
    }
}
