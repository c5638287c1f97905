//! Byte-buffer emulation of C struct layouts.
//!
//! Netlink payloads are fixed-layout C structs, some of which embed
//! pointers to variable-length data. This module reproduces both shapes
//! over plain byte buffers:
//!
//! ```text
//! FixedLayoutStruct                 IndirectLayoutStruct
//! ┌────┬────┬────┐                  ┌────────┬──────────────┐
//! │ f0 │ f1 │ f2 │  one buffer,     │ slot 0 │ slot 1 (ptr) │──┐
//! └────┴────┴────┘  signature       └────────┴──────────────┘  │
//!                   gives widths                    token table │
//!                                        ┌──────────┬────────┐  │
//!                                        │ token    │payload │◄─┘
//!                                        └──────────┴────────┘
//! ```
//!
//! [`BoundedView`] is a fixed-length window over either one, allowing
//! in-place edits but never a length change.

mod fixed;
mod indirect;
mod view;

pub use fixed::FixedLayoutStruct;
pub use indirect::{IndirectLayoutStruct, PointerToken};
pub use view::BoundedView;

use std::mem::size_of;

/// Size of a C `int`.
pub const SIZEOF_INT: usize = size_of::<libc::c_int>();
/// Size of a pointer on this platform (4 on 32-bit, 8 on 64-bit).
pub const SIZEOF_POINTER: usize = size_of::<*const libc::c_void>();
/// Size of a `u8`.
pub const SIZEOF_U8: usize = size_of::<u8>();
/// Size of a `u16`.
pub const SIZEOF_U16: usize = size_of::<u16>();
/// Size of a `u32`.
pub const SIZEOF_U32: usize = size_of::<u32>();
/// Size of a `u64`.
pub const SIZEOF_U64: usize = size_of::<u64>();
/// Size of a C `unsigned char`.
pub const SIZEOF_UBYTE: usize = size_of::<libc::c_uchar>();
/// Size of a C `unsigned int`.
pub const SIZEOF_UINT: usize = size_of::<libc::c_uint>();
/// Size of a C `unsigned short`.
pub const SIZEOF_USHORT: usize = size_of::<libc::c_ushort>();

/// Format bytes as a space separated hex dump.
pub(crate) fn hex_dump<'a>(bytes: impl IntoIterator<Item = &'a u8>) -> String {
    bytes
        .into_iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
