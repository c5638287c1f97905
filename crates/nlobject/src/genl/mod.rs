//! Generic Netlink (GENL) family objects.
//!
//! A family is the kernel-side endpoint of a generic netlink protocol
//! (e.g. `nlctrl`, `wireguard`, `nl80211`). The control family describes
//! every registered family with an id, name, version, header size, maximum
//! attribute number, command list and multicast groups:
//!
//! ```text
//! CTRL_CMD_NEWFAMILY
//! ├── CTRL_ATTR_FAMILY_ID      (u16)
//! ├── CTRL_ATTR_FAMILY_NAME    (string)
//! ├── CTRL_ATTR_VERSION        (u32)
//! ├── CTRL_ATTR_HDRSIZE        (u32)
//! ├── CTRL_ATTR_MAXATTR        (u32)
//! ├── CTRL_ATTR_OPS            (nested: id, flags)
//! └── CTRL_ATTR_MCAST_GROUPS   (nested: name, id)
//! ```
//!
//! [`GenlFamily`] holds that description as an attribute-tracked object.
//! Encoding it to and from these attributes is left to the message layer,
//! which uses the typed setters and getters plus
//! [`GenlFamily::ctrl_attrs`].

mod family;

pub use family::{
    FAMILY_ATTR_GROUPS, FAMILY_ATTR_HDRSIZE, FAMILY_ATTR_ID, FAMILY_ATTR_MAXATTR,
    FAMILY_ATTR_NAME, FAMILY_ATTR_OPS, FAMILY_ATTR_VERSION, FamilyGroup, FamilyOp, GENL_FAMILY_OPS,
    GenlFamily, GenlFamilyData, GenlOpFlags,
};

/// Family id requesting the kernel to allocate one.
pub const GENL_ID_GENERATE: u32 = 0;

/// Id of the control family (fixed, not dynamically assigned).
pub const GENL_ID_CTRL: u16 = 0x10;

/// Maximum family name length including the terminating NUL.
///
/// Not enforced by [`GenlFamily::set_name`]; the message layer validates.
pub const GENL_NAMSIZ: usize = 16;

/// Control family attributes
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrlAttr {
    Unspec = 0,
    FamilyId = 1,
    FamilyName = 2,
    Version = 3,
    HdrSize = 4,
    MaxAttr = 5,
    Ops = 6,
    McastGroups = 7,
    Policy = 8,
    OpPolicy = 9,
    Op = 10,
}

/// Control family command attributes (nested in `CTRL_ATTR_OPS`)
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrlAttrOp {
    Unspec = 0,
    Id = 1,
    Flags = 2,
}

/// Control family multicast group attributes
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrlAttrMcastGrp {
    Unspec = 0,
    Name = 1,
    Id = 2,
}

impl CtrlAttr {
    /// Control attribute carrying the family field behind presence bit `attr`.
    pub fn for_family_attr(attr: u32) -> Option<Self> {
        match attr {
            FAMILY_ATTR_ID => Some(Self::FamilyId),
            FAMILY_ATTR_NAME => Some(Self::FamilyName),
            FAMILY_ATTR_VERSION => Some(Self::Version),
            FAMILY_ATTR_HDRSIZE => Some(Self::HdrSize),
            FAMILY_ATTR_MAXATTR => Some(Self::MaxAttr),
            FAMILY_ATTR_OPS => Some(Self::Ops),
            FAMILY_ATTR_GROUPS => Some(Self::McastGroups),
            _ => None,
        }
    }
}
