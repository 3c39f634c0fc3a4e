//! BindingTable - one [`NativeRegistry`] per native type.
//!
//! The table partitions bindings by `TypeId`, so the same key can be bound for
//! two different native types without the bindings aliasing. A type's
//! registry is created lazily on its first bind and lives as long as the
//! table.
//!
//! # Thread Safety
//!
//! `BindingTable` holds raw native pointers and is neither `Send` nor `Sync`.
//! It is meant to live inside one engine instance's embedding context and be
//! driven from the thread that runs that engine.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::ptr::NonNull;

use rustc_hash::FxHashMap;

use jsbind_core::{AsBindKey, BindError, BindResult};

use crate::NativeRegistry;

/// Type-erased view of a `NativeRegistry<T>`.
trait ErasedRegistry: Any {
    fn type_name(&self) -> &'static str;
    fn len(&self) -> usize;
    fn clear(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedRegistry for NativeRegistry<T> {
    fn type_name(&self) -> &'static str {
        NativeRegistry::type_name(self)
    }

    fn len(&self) -> usize {
        NativeRegistry::len(self)
    }

    fn clear(&mut self) {
        NativeRegistry::clear(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-type binding registries, keyed by `TypeId`.
///
/// Every entry is a `NativeRegistry<T>` stored under `TypeId::of::<T>()`, so
/// downcasting an entry to the registry of its key's type always succeeds.
#[derive(Default)]
pub struct BindingTable {
    registries: FxHashMap<TypeId, Box<dyn ErasedRegistry>>,
}

impl BindingTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with room for `capacity` native types.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            registries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    // ==========================================================================
    // Registry Access
    // ==========================================================================

    /// The registry for `T`, if `T` has ever been bound.
    pub fn registry<T: 'static>(&self) -> Option<&NativeRegistry<T>> {
        self.registries
            .get(&TypeId::of::<T>())
            .and_then(|registry| registry.as_any().downcast_ref())
    }

    /// The registry for `T`, created on first use.
    pub fn registry_mut<T: 'static>(&mut self) -> &mut NativeRegistry<T> {
        self.registries
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(NativeRegistry::<T>::new()))
            .as_any_mut()
            .downcast_mut()
            .expect("registry stored under its own TypeId")
    }

    // ==========================================================================
    // Bind / Lookup / Unbind
    // ==========================================================================

    /// Bind `native` under `key` in `T`'s registry.
    pub fn bind<T: 'static>(&mut self, key: impl AsBindKey, native: NonNull<T>) -> BindResult {
        let key = key.bind_key().ok_or(BindError::NullKey)?;
        self.registry_mut::<T>().bind(key, native)
    }

    /// Look up the `T` bound under `key`.
    pub fn get<T: 'static>(&self, key: impl AsBindKey) -> Option<NonNull<T>> {
        self.registry::<T>()?.get(key)
    }

    /// Remove the binding of `native` under `key` from `T`'s registry.
    ///
    /// Does not create a registry for `T` if none exists yet.
    pub fn unbind<T: 'static>(&mut self, key: impl AsBindKey, native: NonNull<T>) -> BindResult {
        let key = key.bind_key().ok_or(BindError::NullKey)?;
        match self
            .registries
            .get_mut(&TypeId::of::<T>())
            .and_then(|registry| registry.as_any_mut().downcast_mut::<NativeRegistry<T>>())
        {
            Some(registry) => registry.unbind(key, native),
            None => Err(BindError::NotBound {
                key,
                type_name: type_name::<T>(),
            }),
        }
    }

    // ==========================================================================
    // Introspection
    // ==========================================================================

    /// Check if `key` is bound for `T`.
    pub fn contains<T: 'static>(&self, key: impl AsBindKey) -> bool {
        self.registry::<T>()
            .is_some_and(|registry| registry.contains(key))
    }

    /// Number of live bindings for `T`.
    pub fn count<T: 'static>(&self) -> usize {
        self.registry::<T>().map_or(0, NativeRegistry::len)
    }

    /// Total number of live bindings across all native types.
    pub fn len(&self) -> usize {
        self.registries
            .values()
            .map(|registry| registry.len())
            .sum()
    }

    /// Check if no bindings are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of native types that have a registry (live or emptied).
    pub fn type_count(&self) -> usize {
        self.registries.len()
    }

    /// Native types with live bindings, paired with their binding counts,
    /// sorted by type name.
    pub fn bound_types(&self) -> Vec<(&'static str, usize)> {
        let mut types: Vec<_> = self
            .registries
            .values()
            .filter(|registry| registry.len() > 0)
            .map(|registry| (registry.type_name(), registry.len()))
            .collect();
        types.sort_unstable();
        types
    }

    /// Drop every binding of every type. Native objects are untouched.
    pub fn clear(&mut self) {
        for registry in self.registries.values_mut() {
            registry.clear();
        }
    }
}

impl fmt::Debug for BindingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingTable")
            .field("types", &self.registries.len())
            .field("bindings", &self.len())
            .finish()
    }
}
