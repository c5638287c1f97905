//! Per-type operations table.

use std::fmt;

use bitflags::bitflags;

use super::Object;
use super::dump::{DumpParams, DumpType};
use crate::error::Result;

/// Hook rendering an object at one verbosity level.
pub type DumpFn = fn(&dyn Object, &mut DumpParams) -> Result<()>;

/// Hook deep-copying `src` into a freshly allocated `dst` of the same type.
pub type CloneFn = fn(&mut dyn Object, &dyn Object) -> Result<()>;

/// Hook returning the subset of `attrs` whose values differ.
pub type CompareFn = fn(&dyn Object, &dyn Object, u32, CompareFlags) -> Result<u32>;

bitflags! {
    /// Options for attribute comparison.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompareFlags: u32 {
        /// Report an attribute present in only one of the two objects as
        /// differing. Without it such attributes are left out.
        const PRESENCE = 0x01;
    }
}

/// Dump hooks, one per [`DumpType`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpOps {
    /// Single line summary.
    pub line: Option<DumpFn>,
    /// Full attribute listing.
    pub details: Option<DumpFn>,
    /// Statistics. Falls back to `details` when absent.
    pub stats: Option<DumpFn>,
}

/// Operations table shared by every object of one type.
///
/// Generic code never touches concrete fields; it allocates, clones,
/// compares and dumps objects by following this table. Tables are
/// `static`s, and two objects are of the same type exactly when they point
/// at the same table.
///
/// Absent `constructor`/`free_data` hooks are no-ops and an absent
/// `dump.stats` falls back to `dump.details`. Every other absent hook makes
/// the operation fail with [`Error::MissingOperation`](crate::Error::MissingOperation).
pub struct ObjectOps {
    /// Type tag, e.g. `"genl/family"`.
    pub name: &'static str,
    /// Size of the concrete payload.
    pub size: usize,
    /// Allocate a zero-initialized object of this type.
    pub alloc: fn(&'static ObjectOps) -> Box<dyn Object>,
    /// Runs after allocation.
    pub constructor: Option<fn(&mut dyn Object)>,
    /// Runs before the object is released.
    pub free_data: Option<fn(&mut dyn Object)>,
    /// Deep copy.
    pub clone: Option<CloneFn>,
    /// Rendering hooks.
    pub dump: DumpOps,
    /// Attribute-wise comparison.
    pub compare: Option<CompareFn>,
    /// Names for presence bits.
    pub attrs2str: Option<fn(u32) -> String>,
    /// Attributes forming the identity of an object.
    pub id_attrs: u32,
}

impl ObjectOps {
    /// Hook serving `kind`, after fallbacks.
    pub fn dump_hook(&self, kind: DumpType) -> Option<DumpFn> {
        match kind {
            DumpType::Line => self.dump.line,
            DumpType::Details => self.dump.details,
            DumpType::Stats => self.dump.stats.or(self.dump.details),
        }
    }

    /// Render a presence mask, by name if the type provides names.
    pub fn attrs_to_string(&self, attrs: u32) -> String {
        match self.attrs2str {
            Some(f) => f(attrs),
            None => format!("0x{:x}", attrs),
        }
    }
}

impl fmt::Debug for ObjectOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectOps")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("id_attrs", &format_args!("0x{:x}", self.id_attrs))
            .finish_non_exhaustive()
    }
}

/// Accumulator for compare hooks.
///
/// Only attributes requested in `attrs` are looked at. When both objects
/// carry an attribute its values are compared; when only one does, the
/// outcome depends on [`CompareFlags::PRESENCE`].
///
/// ```
/// use nlobject::object::{AttrDiff, CompareFlags};
///
/// let diff = AttrDiff::new(0b011, 0b011, 0b111, CompareFlags::empty())
///     .check(0b001, || false)
///     .check(0b010, || true)
///     .finish();
/// assert_eq!(diff, 0b010);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AttrDiff {
    a: u32,
    b: u32,
    attrs: u32,
    flags: CompareFlags,
    diff: u32,
}

impl AttrDiff {
    /// Start comparing objects whose presence masks are `a` and `b`.
    pub fn new(a: u32, b: u32, attrs: u32, flags: CompareFlags) -> Self {
        Self {
            a,
            b,
            attrs,
            flags,
            diff: 0,
        }
    }

    /// Compare one attribute. `differs` only runs if both objects have it.
    pub fn check(mut self, attr: u32, differs: impl FnOnce() -> bool) -> Self {
        if self.attrs & attr == 0 {
            return self;
        }
        let in_a = self.a & attr != 0;
        let in_b = self.b & attr != 0;
        if in_a && in_b {
            if differs() {
                self.diff |= attr;
            }
        } else if in_a != in_b && self.flags.contains(CompareFlags::PRESENCE) {
            self.diff |= attr;
        }
        self
    }

    /// The differing attributes.
    pub fn finish(self) -> u32 {
        self.diff
    }
}
