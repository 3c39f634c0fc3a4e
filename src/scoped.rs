//! Scope-bound bindings.
//!
//! A [`ScopedBinder`] binds on construction and, only if that bind succeeded,
//! unbinds the same (key, native) pair when it drops. Embed one as a field to
//! tie a binding to its owner's lifetime.
//!
//! A guard is one unbind obligation. It is neither `Clone` nor `Copy`:
//!
//! ```compile_fail
//! use std::ptr::NonNull;
//! use jsbind::{BindContext, ScopedBinder};
//!
//! let ctx = BindContext::new();
//! let value = 1u32;
//! let guard = ScopedBinder::new_self(&ctx, NonNull::from(&value));
//! let second = guard.clone();
//! ```
//!
//! A guard created with [`ScopedBinder::for_ref`] borrows the native object,
//! so the object cannot be dropped while it is bound:
//!
//! ```compile_fail
//! use jsbind::{BindContext, ScopedBinder};
//!
//! let ctx = BindContext::new();
//! let guard = {
//!     let value = 1u32;
//!     ScopedBinder::for_ref(&ctx, &value)
//! };
//! drop(guard);
//! ```

use std::fmt;
use std::ptr::NonNull;

use jsbind_core::{AsBindKey, BindError, BindKey};

use crate::BindContext;

/// Binds on construction, unbinds on drop.
pub struct ScopedBinder<'ctx, T: 'static> {
    ctx: &'ctx BindContext,
    key: Option<BindKey>,
    native: NonNull<T>,
    outcome: Result<(), BindError>,
}

impl<'ctx, T: 'static> ScopedBinder<'ctx, T> {
    /// Bind `native` under `key` for the lifetime of the guard.
    ///
    /// A failed bind is recorded rather than returned; check
    /// [`is_bound`](Self::is_bound) or [`error`](Self::error).
    pub fn new(ctx: &'ctx BindContext, key: impl AsBindKey, native: NonNull<T>) -> Self {
        let key = key.bind_key();
        let outcome = ctx.bind(key, native);
        Self {
            ctx,
            key,
            native,
            outcome,
        }
    }

    /// Bind `native` under its own address for the lifetime of the guard.
    pub fn new_self(ctx: &'ctx BindContext, native: NonNull<T>) -> Self {
        Self::new(ctx, native, native)
    }

    /// Self-keyed binding that also borrows `native` for the guard's lifetime.
    pub fn for_ref(ctx: &'ctx BindContext, native: &'ctx T) -> Self {
        Self::new_self(ctx, NonNull::from(native))
    }

    /// Whether the construction-time bind succeeded.
    pub fn is_bound(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Why the construction-time bind failed, if it did.
    pub fn error(&self) -> Option<&BindError> {
        self.outcome.as_ref().err()
    }

    /// The key this guard bound (or tried to bind).
    pub fn key(&self) -> Option<BindKey> {
        self.key
    }

    /// The guarded native pointer.
    pub fn native(&self) -> NonNull<T> {
        self.native
    }
}

impl<T: 'static> Drop for ScopedBinder<'_, T> {
    fn drop(&mut self) {
        if self.outcome.is_err() {
            return;
        }
        // The binding may already be gone if the context was cleared.
        if let Err(err) = self.ctx.unbind(self.key, self.native) {
            tracing::debug!(%err, "scoped binding was removed before its guard");
        }
    }
}

impl<T: 'static> fmt::Debug for ScopedBinder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedBinder")
            .field("key", &self.key)
            .field("native", &self.native)
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget {
        _id: u32,
    }

    #[test]
    fn binds_for_scope_then_unbinds() {
        let ctx = BindContext::new();
        let widget = Widget { _id: 1 };
        let ptr = NonNull::from(&widget);

        {
            let guard = ScopedBinder::new_self(&ctx, ptr);
            assert!(guard.is_bound());
            assert_eq!(guard.key(), Some(BindKey::of(&widget)));
            assert_eq!(ctx.get::<Widget>(ptr), Some(ptr));
        }

        assert!(ctx.get::<Widget>(ptr).is_none());
    }

    #[test]
    fn failed_bind_does_not_unbind_existing() {
        let ctx = BindContext::new();
        let a = Widget { _id: 1 };
        let b = Widget { _id: 2 };
        let key = BindKey::of(&a);
        ctx.bind(key, NonNull::from(&a)).unwrap();

        {
            let guard = ScopedBinder::new(&ctx, key, NonNull::from(&b));
            assert!(!guard.is_bound());
            assert!(matches!(
                guard.error(),
                Some(BindError::AlreadyBound { .. })
            ));
        }

        assert_eq!(ctx.get::<Widget>(key), Some(NonNull::from(&a)));
    }

    #[test]
    fn failed_bind_of_bound_native_does_not_unbind_it() {
        let ctx = BindContext::new();
        let widget = Widget { _id: 1 };
        let ptr = NonNull::from(&widget);
        ctx.bind_self(ptr).unwrap();

        drop(ScopedBinder::new_self(&ctx, ptr));

        assert_eq!(ctx.get::<Widget>(ptr), Some(ptr));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn null_key_guard_is_unbound() {
        let ctx = BindContext::new();
        let widget = Widget { _id: 1 };

        let guard = ScopedBinder::new(&ctx, 0usize, NonNull::from(&widget));
        assert_eq!(guard.error(), Some(&BindError::NullKey));
        assert_eq!(guard.key(), None);
        drop(guard);
        assert!(ctx.is_empty());
    }

    #[test]
    fn for_ref_binds_borrowed_native() {
        let ctx = BindContext::new();
        let widget = Widget { _id: 1 };

        let guard = ScopedBinder::for_ref(&ctx, &widget);
        assert_eq!(guard.native(), NonNull::from(&widget));
        assert!(ctx.contains::<Widget>(BindKey::of(&widget)));
        drop(guard);
        assert!(ctx.is_empty());
    }

    #[test]
    fn guard_survives_context_clear() {
        let ctx = BindContext::new();
        let widget = Widget { _id: 1 };

        let guard = ctx.scoped(BindKey::of(&widget), NonNull::from(&widget));
        ctx.clear();
        drop(guard);
        assert!(ctx.is_empty());
    }

    #[test]
    fn moving_a_guard_keeps_one_obligation() {
        let ctx = BindContext::new();
        let widget = Widget { _id: 1 };

        let guard = ScopedBinder::for_ref(&ctx, &widget);
        let moved = guard;
        assert!(moved.is_bound());
        assert_eq!(ctx.len(), 1);
        drop(moved);
        assert!(ctx.is_empty());
    }

    #[test]
    fn guard_debug() {
        let ctx = BindContext::new();
        let widget = Widget { _id: 1 };
        let guard = ScopedBinder::for_ref(&ctx, &widget);
        let debug = format!("{:?}", guard);
        assert!(debug.contains("ScopedBinder"));
        assert!(debug.contains("bound: true"));
    }
}
