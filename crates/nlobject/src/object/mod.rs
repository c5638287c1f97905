//! Attribute-tracked objects.
//!
//! Every netlink object (a family, a link, a route...) is a payload of
//! optional fields plus a 32-bit presence mask: bit *i* is set exactly when
//! field *i* holds a meaningful value. Absence is a normal state and is
//! resolved by each getter's documented default.
//!
//! Behavior that generic code needs (allocation, deep copy, comparison,
//! dumping) lives in a per-type [`ObjectOps`] table. Generic code handles
//! `&dyn Object` and dispatches through the table, never through the
//! concrete type.
//!
//! ```text
//! ┌──────────────────────┐        ┌────────────────────────┐
//! │ NlObject<T>          │  ops   │ static ObjectOps       │
//! │   mask: u32          │───────►│ alloc / clone / compare│
//! │   data: T            │        │ dump line/details/stats│
//! └──────────────────────┘        └────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use nlobject::genl::{FAMILY_ATTR_VERSION, GenlFamily};
//! use nlobject::object::{self, CompareFlags, DumpType};
//!
//! let mut a = GenlFamily::new();
//! a.set_name("nlctrl");
//! a.set_version(1);
//!
//! let b = object::clone_object(&a).unwrap();
//! a.set_version(2);
//!
//! let diff = object::compare(&a, b.as_ref(), !0, CompareFlags::empty()).unwrap();
//! assert_eq!(diff, FAMILY_ATTR_VERSION);
//!
//! let text = object::dump_to_string(&a, DumpType::Line).unwrap();
//! assert_eq!(text, "nlctrl version 2\n");
//! ```

mod dump;
mod ops;

pub use dump::{DumpParams, DumpType};
pub use ops::{AttrDiff, CloneFn, CompareFlags, CompareFn, DumpFn, DumpOps, ObjectOps};

use std::any::{Any, type_name};
use std::fmt;

use crate::error::{Error, Result};

/// Type-erased view of an attribute-tracked object.
///
/// Implemented by [`NlObject`]; generic code takes `&dyn Object`.
pub trait Object: Any + Send {
    /// Operations table of the concrete type.
    fn ops(&self) -> &'static ObjectOps;

    /// Presence mask.
    fn attrs(&self) -> u32;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Owned upcast for downcasting to the concrete type.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

/// An object with payload `T` and a presence mask.
///
/// Created by [`alloc`](Self::alloc), which zero-initializes the payload
/// (`T::default()`), clears the mask and runs the table's constructor.
/// Dropping the object runs the table's `free_data` hook.
pub struct NlObject<T: Any + Send> {
    ops: &'static ObjectOps,
    mask: u32,
    data: T,
}

impl<T: Any + Send + Default> NlObject<T> {
    /// Allocate an object of the type described by `ops`.
    pub fn alloc(ops: &'static ObjectOps) -> Self {
        debug_assert_eq!(ops.size, std::mem::size_of::<T>(), "{}: payload size", ops.name);

        let mut obj = Self {
            ops,
            mask: 0,
            data: T::default(),
        };
        if let Some(constructor) = ops.constructor {
            constructor(&mut obj);
        }
        tracing::trace!(object = ops.name, "allocated object");
        obj
    }

    /// Allocate a boxed object. Suitable as [`ObjectOps::alloc`].
    pub fn alloc_boxed(ops: &'static ObjectOps) -> Box<dyn Object> {
        Box::new(Self::alloc(ops))
    }
}

impl<T: Any + Send> NlObject<T> {
    /// Operations table.
    pub fn ops(&self) -> &'static ObjectOps {
        self.ops
    }

    /// Type tag from the operations table.
    pub fn type_name(&self) -> &'static str {
        self.ops.name
    }

    /// Presence mask.
    pub fn attrs(&self) -> u32 {
        self.mask
    }

    /// Check if every bit in `attrs` is present.
    pub fn has(&self, attrs: u32) -> bool {
        self.mask & attrs == attrs
    }

    /// Store a value through `store` and mark `attr` present.
    pub fn set(&mut self, attr: u32, store: impl FnOnce(&mut T)) {
        store(&mut self.data);
        self.mask |= attr;
    }

    /// Load a value through `load` if `attr` is present, else `default`.
    pub fn get<'a, V>(&'a self, attr: u32, default: V, load: impl FnOnce(&'a T) -> V) -> V {
        if self.has(attr) {
            load(&self.data)
        } else {
            default
        }
    }

    /// Mark `attr` absent. The stored value is kept but no longer readable.
    pub fn unset(&mut self, attr: u32) {
        self.mask &= !attr;
    }

    /// Raw payload, regardless of presence.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Mutable raw payload. Does not touch the presence mask.
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Make `self` attribute-for-attribute equal to `src`.
    pub fn copy_from(&mut self, src: &Self)
    where
        T: Clone,
    {
        self.data = src.data.clone();
        self.mask = src.mask;
    }
}

impl<T: Any + Send> Object for NlObject<T> {
    fn ops(&self) -> &'static ObjectOps {
        self.ops
    }

    fn attrs(&self) -> u32 {
        self.mask
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl<T: Any + Send> Drop for NlObject<T> {
    fn drop(&mut self) {
        if let Some(free_data) = self.ops.free_data {
            free_data(self);
        }
        tracing::trace!(object = self.ops.name, "freed object");
    }
}

impl<T: Any + Send + fmt::Debug> fmt::Debug for NlObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NlObject")
            .field("type", &self.ops.name)
            .field("mask", &format_args!("0x{:x}", self.mask))
            .field("data", &self.data)
            .finish()
    }
}

/// Check if two objects share an operations table.
pub fn same_type(a: &dyn Object, b: &dyn Object) -> bool {
    std::ptr::eq(a.ops(), b.ops())
}

/// Downcast a generic object to its concrete type.
pub fn downcast_ref<T: Object>(obj: &dyn Object) -> Result<&T> {
    let actual = obj.ops().name;
    obj.as_any()
        .downcast_ref::<T>()
        .ok_or(Error::TypeMismatch {
            expected: type_name::<T>(),
            actual,
        })
}

/// Mutable downcast of a generic object to its concrete type.
pub fn downcast_mut<T: Object>(obj: &mut dyn Object) -> Result<&mut T> {
    let actual = obj.ops().name;
    obj.as_any_mut()
        .downcast_mut::<T>()
        .ok_or(Error::TypeMismatch {
            expected: type_name::<T>(),
            actual,
        })
}

/// Downcast a boxed generic object, e.g. the result of [`clone_object`].
pub fn downcast<T: Object>(obj: Box<dyn Object>) -> Result<Box<T>> {
    let actual = obj.ops().name;
    obj.into_any()
        .downcast::<T>()
        .map_err(|_| Error::TypeMismatch {
            expected: type_name::<T>(),
            actual,
        })
}

fn missing(ops: &ObjectOps, operation: &'static str) -> Error {
    Error::MissingOperation {
        object: ops.name,
        operation,
    }
}

/// Allocate a new object of the same type and deep-copy `src` into it.
pub fn clone_object(src: &dyn Object) -> Result<Box<dyn Object>> {
    let ops = src.ops();
    let clone = ops.clone.ok_or_else(|| missing(ops, "clone"))?;

    let mut dst = (ops.alloc)(ops);
    clone(dst.as_mut(), src)?;
    tracing::trace!(object = ops.name, attrs = src.attrs(), "cloned object");
    Ok(dst)
}

/// Return the subset of `attrs` whose values differ between `a` and `b`.
///
/// Attributes missing from one object are handled per [`CompareFlags`].
pub fn compare(a: &dyn Object, b: &dyn Object, attrs: u32, flags: CompareFlags) -> Result<u32> {
    if !same_type(a, b) {
        return Err(Error::TypeMismatch {
            expected: a.ops().name,
            actual: b.ops().name,
        });
    }
    let ops = a.ops();
    let compare = ops.compare.ok_or_else(|| missing(ops, "compare"))?;
    Ok(compare(a, b, attrs, flags)? & attrs)
}

/// Check if `a` and `b` describe the same object.
///
/// Both must be of the same type, carry the same identity attributes
/// (`ObjectOps::id_attrs`) and agree on their values.
pub fn identical(a: &dyn Object, b: &dyn Object) -> bool {
    if !same_type(a, b) {
        return false;
    }
    let id_attrs = a.ops().id_attrs;
    if a.attrs() & id_attrs != b.attrs() & id_attrs {
        return false;
    }
    matches!(compare(a, b, id_attrs, CompareFlags::PRESENCE), Ok(0))
}

/// Render `obj` at the verbosity in `params`.
pub fn dump(obj: &dyn Object, params: &mut DumpParams) -> Result<()> {
    let ops = obj.ops();
    let kind = params.kind();
    let hook = ops
        .dump_hook(kind)
        .ok_or_else(|| missing(ops, kind.hook_name()))?;
    hook(obj, params)
}

/// Render `obj` at verbosity `kind` into a new string.
pub fn dump_to_string(obj: &dyn Object, kind: DumpType) -> Result<String> {
    let mut params = DumpParams::new(kind);
    dump(obj, &mut params)?;
    Ok(params.into_output())
}

/// Render the presence mask of `obj`.
pub fn attrs_to_string(obj: &dyn Object) -> String {
    obj.ops().attrs_to_string(obj.attrs())
}
