//! Opaque identity keys for native bindings.
//!
//! A [`BindKey`] is an address used purely for equality and ordering. It is
//! never dereferenced. Keys are non-null by construction; conversions from
//! raw inputs go through [`AsBindKey`], which reports a null input as `None`
//! so callers can reject it before touching any registry.
//!
//! # Examples
//!
//! ```
//! use jsbind_core::{AsBindKey, BindKey};
//!
//! let widget = 7u32;
//! let key = BindKey::of(&widget);
//! assert_eq!(key.addr(), &widget as *const u32 as usize);
//!
//! let null: *const u32 = std::ptr::null();
//! assert!(null.bind_key().is_none());
//! ```

use std::fmt;
use std::num::NonZeroUsize;
use std::ptr::NonNull;

/// Non-null identity token for a binding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindKey(NonZeroUsize);

impl BindKey {
    /// Create a key from a raw address. Returns `None` for `0`.
    #[inline]
    pub const fn from_addr(addr: usize) -> Option<Self> {
        match NonZeroUsize::new(addr) {
            Some(addr) => Some(Self(addr)),
            None => None,
        }
    }

    /// Create a key from a raw pointer. Returns `None` for null.
    ///
    /// Only the address is kept; metadata of wide pointers is discarded.
    #[inline]
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Option<Self> {
        Self::from_addr(ptr.cast::<()>() as usize)
    }

    /// Key for an object's own address (self-keyed binding).
    #[inline]
    pub fn of<T: ?Sized>(obj: &T) -> Self {
        Self::from_non_null(NonNull::from(obj))
    }

    /// Key for a non-null pointer.
    #[inline]
    pub fn from_non_null<T: ?Sized>(ptr: NonNull<T>) -> Self {
        Self(ptr.cast::<()>().addr())
    }

    /// The raw address this key represents.
    #[inline]
    pub const fn addr(self) -> usize {
        self.0.get()
    }

    /// The key as an untyped pointer, e.g. to hand to an engine as an
    /// external payload.
    #[inline]
    pub fn as_ptr(self) -> *const () {
        self.0.get() as *const ()
    }
}

impl fmt::Debug for BindKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BindKey({:#x})", self.0)
    }
}

impl fmt::Display for BindKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Conversion into an optional [`BindKey`].
///
/// Implemented for the inputs an embedding layer typically has at hand: raw
/// pointers, `NonNull`, plain addresses and keys themselves. A null input
/// converts to `None`.
pub trait AsBindKey {
    /// The key for this value, or `None` if it is null.
    fn bind_key(&self) -> Option<BindKey>;
}

impl AsBindKey for BindKey {
    #[inline]
    fn bind_key(&self) -> Option<BindKey> {
        Some(*self)
    }
}

impl AsBindKey for Option<BindKey> {
    #[inline]
    fn bind_key(&self) -> Option<BindKey> {
        *self
    }
}

impl AsBindKey for usize {
    #[inline]
    fn bind_key(&self) -> Option<BindKey> {
        BindKey::from_addr(*self)
    }
}

impl<T: ?Sized> AsBindKey for *const T {
    #[inline]
    fn bind_key(&self) -> Option<BindKey> {
        BindKey::from_ptr(*self)
    }
}

impl<T: ?Sized> AsBindKey for *mut T {
    #[inline]
    fn bind_key(&self) -> Option<BindKey> {
        BindKey::from_ptr(self.cast_const())
    }
}

impl<T: ?Sized> AsBindKey for NonNull<T> {
    #[inline]
    fn bind_key(&self) -> Option<BindKey> {
        Some(BindKey::from_non_null(*self))
    }
}
