//! NativeRegistry - bindings for a single native type.
//!
//! A [`NativeRegistry<T>`] maps [`BindKey`]s to `NonNull<T>`. It never owns
//! the native objects it points at; both the key object and the native object
//! must outlive their binding.
//!
//! Entries are kept in key order so lookups and iteration are deterministic.
//!
//! # Example
//!
//! ```
//! use std::ptr::NonNull;
//! use jsbind_core::BindKey;
//! use jsbind_registry::NativeRegistry;
//!
//! struct Widget {
//!     id: u32,
//! }
//!
//! let widget = Widget { id: 7 };
//! let ptr = NonNull::from(&widget);
//! let mut registry = NativeRegistry::<Widget>::new();
//!
//! registry.bind(ptr, ptr).unwrap();
//! assert_eq!(registry.get(BindKey::of(&widget)), Some(ptr));
//!
//! registry.unbind(ptr, ptr).unwrap();
//! assert!(registry.is_empty());
//! ```

use std::any::type_name;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::ptr::NonNull;

use jsbind_core::{AsBindKey, BindError, BindKey, BindResult};

/// A single (key, native) association.
pub struct Binding<T> {
    key: BindKey,
    native: NonNull<T>,
}

impl<T> Binding<T> {
    /// Create a binding. Does not insert it anywhere.
    pub fn new(key: BindKey, native: NonNull<T>) -> Self {
        Self { key, native }
    }

    /// The binding's key.
    pub fn key(&self) -> BindKey {
        self.key
    }

    /// The bound native pointer.
    pub fn native(&self) -> NonNull<T> {
        self.native
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Binding<T> {}

impl<T> PartialEq for Binding<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.native == other.native
    }
}

impl<T> Eq for Binding<T> {}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("native", &self.native)
            .finish()
    }
}

/// Key-ordered bindings for native type `T`.
pub struct NativeRegistry<T> {
    entries: BTreeMap<BindKey, Binding<T>>,
}

impl<T> NativeRegistry<T> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Name of the native type this registry binds.
    pub fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    // ==========================================================================
    // Bind / Lookup / Unbind
    // ==========================================================================

    /// Bind `native` under `key`.
    ///
    /// Fails if the key is null or already bound; an existing binding is
    /// never overwritten.
    pub fn bind(&mut self, key: impl AsBindKey, native: NonNull<T>) -> BindResult {
        let key = key.bind_key().ok_or(BindError::NullKey)?;
        match self.entries.entry(key) {
            Entry::Occupied(_) => Err(BindError::AlreadyBound {
                key,
                type_name: type_name::<T>(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(Binding::new(key, native));
                Ok(())
            }
        }
    }

    /// Look up the native bound under `key`. A null key yields `None`.
    pub fn get(&self, key: impl AsBindKey) -> Option<NonNull<T>> {
        let key = key.bind_key()?;
        self.entries.get(&key).map(Binding::native)
    }

    /// Look up the full binding under `key`.
    pub fn binding(&self, key: impl AsBindKey) -> Option<&Binding<T>> {
        self.entries.get(&key.bind_key()?)
    }

    /// Remove the binding under `key`, but only if it points at `native`.
    ///
    /// A mismatched pointer leaves the existing binding intact.
    pub fn unbind(&mut self, key: impl AsBindKey, native: NonNull<T>) -> BindResult {
        let key = key.bind_key().ok_or(BindError::NullKey)?;
        match self.entries.entry(key) {
            Entry::Vacant(_) => Err(BindError::NotBound {
                key,
                type_name: type_name::<T>(),
            }),
            Entry::Occupied(slot) if slot.get().native != native => Err(BindError::Mismatch {
                key,
                type_name: type_name::<T>(),
            }),
            Entry::Occupied(slot) => {
                slot.remove();
                Ok(())
            }
        }
    }

    // ==========================================================================
    // Introspection
    // ==========================================================================

    /// Check if `key` is bound.
    pub fn contains(&self, key: impl AsBindKey) -> bool {
        key.bind_key()
            .is_some_and(|key| self.entries.contains_key(&key))
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no live bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate bindings in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding<T>> + '_ {
        self.entries.values()
    }

    /// Drop every binding. Native objects are untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for NativeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for NativeRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRegistry")
            .field("type", &type_name::<T>())
            .field("bindings", &self.entries.len())
            .finish()
    }
}
