//! User-space object model for Linux Generic Netlink.
//!
//! This crate provides the data layer under a netlink socket: attribute
//! tracked objects with per-type operation tables, the generic netlink
//! family descriptor, and helpers for fixed and pointer-bearing C struct
//! layouts. It does no I/O; a socket layer encodes and decodes messages
//! with it.
//!
//! # Features
//!
//! - `output` - JSON/text output formatting
//! - `full` - All features enabled
//!
//! # Example
//!
//! ```
//! use nlobject::genl::{GenlFamily, GenlOpFlags};
//! use nlobject::object::DumpType;
//!
//! let mut family = GenlFamily::new();
//! family.set_id(0x10);
//! family.set_name("nlctrl");
//! family.set_version(2);
//! family.add_group(0x10, "notify");
//! family.add_op(3, GenlOpFlags::CMD_CAP_DO);
//!
//! print!("{}", family.dump(DumpType::Details));
//! ```
//!
//! # Byte layouts
//!
//! ```
//! use nlobject::layout::{BoundedView, FixedLayoutStruct, SIZEOF_U16, SIZEOF_U32};
//!
//! let mut hdr = FixedLayoutStruct::new(&[SIZEOF_U16, SIZEOF_U16, SIZEOF_U32]);
//! hdr.write(2, 0xdead_beef_u32)?;
//! assert_eq!(hdr.read::<u32>(2)?, 0xdead_beef);
//!
//! let view = hdr.field_view(2)?;
//! assert_eq!(view.len(), 4);
//! # Ok::<(), nlobject::Error>(())
//! ```

pub mod ancillary;
mod error;
pub mod genl;
pub mod layout;
pub mod object;

// Feature-gated modules
#[cfg(feature = "output")]
pub mod output;

// Re-export common types at crate root for convenience
pub use ancillary::Ucred;
pub use error::{Error, Result};
pub use genl::GenlFamily;
pub use object::{NlObject, Object, ObjectOps};
