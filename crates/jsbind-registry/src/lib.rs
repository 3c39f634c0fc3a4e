//! Binding registries for jsbind.
//!
//! - [`NativeRegistry<T>`]: key-ordered bindings for one native type
//! - [`BindingTable`]: one `NativeRegistry` per native type, keyed by `TypeId`

mod registry;
mod table;

pub use registry::{Binding, NativeRegistry};
pub use table::BindingTable;
