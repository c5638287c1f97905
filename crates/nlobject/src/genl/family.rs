//! Generic netlink family descriptor.

use bitflags::bitflags;

use super::{CtrlAttr, GENL_ID_GENERATE};
use crate::error::Result;
use crate::object::{
    self, AttrDiff, CompareFlags, DumpOps, DumpParams, DumpType, NlObject, Object, ObjectOps,
};

/// Numeric family identifier.
pub const FAMILY_ATTR_ID: u32 = 0x01;
/// Human readable name.
pub const FAMILY_ATTR_NAME: u32 = 0x02;
/// Interface version.
pub const FAMILY_ATTR_VERSION: u32 = 0x04;
/// Size of the family specific header.
pub const FAMILY_ATTR_HDRSIZE: u32 = 0x08;
/// Highest attribute number.
pub const FAMILY_ATTR_MAXATTR: u32 = 0x10;
/// Multicast groups.
pub const FAMILY_ATTR_GROUPS: u32 = 0x20;
/// Commands.
pub const FAMILY_ATTR_OPS: u32 = 0x40;

const FAMILY_ATTR_NAMES: &[(u32, &str)] = &[
    (FAMILY_ATTR_ID, "id"),
    (FAMILY_ATTR_NAME, "name"),
    (FAMILY_ATTR_VERSION, "version"),
    (FAMILY_ATTR_HDRSIZE, "hdrsize"),
    (FAMILY_ATTR_MAXATTR, "maxattr"),
    (FAMILY_ATTR_GROUPS, "groups"),
    (FAMILY_ATTR_OPS, "ops"),
];

bitflags! {
    /// Command capability flags (`GENL_*` in `genetlink.h`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GenlOpFlags: u32 {
        /// Requires CAP_NET_ADMIN.
        const ADMIN_PERM = 0x01;
        /// Has a `doit` handler.
        const CMD_CAP_DO = 0x02;
        /// Has a `dumpit` handler.
        const CMD_CAP_DUMP = 0x04;
        /// Has an attribute policy.
        const CMD_CAP_HASPOL = 0x08;
    }
}

impl GenlOpFlags {
    /// Comma separated flag names.
    pub fn names(&self) -> String {
        let mut names = Vec::new();
        if self.contains(Self::ADMIN_PERM) {
            names.push("admin-perm");
        }
        if self.contains(Self::CMD_CAP_DO) {
            names.push("has-doit");
        }
        if self.contains(Self::CMD_CAP_DUMP) {
            names.push("has-dump");
        }
        if self.contains(Self::CMD_CAP_HASPOL) {
            names.push("has-policy");
        }
        names.join(",")
    }
}

/// A multicast group of a family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyGroup {
    /// Group id.
    pub id: u32,
    /// Group name.
    pub name: String,
}

impl FamilyGroup {
    /// Create a group.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A command supported by a family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyOp {
    /// Command id.
    pub id: u32,
    /// Capabilities.
    pub flags: GenlOpFlags,
}

/// Payload of a [`GenlFamily`]. Read it through the family's getters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenlFamilyData {
    id: u32,
    name: String,
    version: u32,
    hdrsize: u32,
    maxattr: u32,
    ops: Vec<FamilyOp>,
    groups: Vec<FamilyGroup>,
}

/// Generic netlink family descriptor.
///
/// # Example
///
/// ```
/// use nlobject::genl::{GENL_ID_GENERATE, GenlFamily, GenlOpFlags};
///
/// let mut family = GenlFamily::new();
/// assert_eq!(family.id(), GENL_ID_GENERATE);
///
/// family.set_name("wireguard");
/// family.set_version(1);
/// family.add_op(0, GenlOpFlags::ADMIN_PERM | GenlOpFlags::CMD_CAP_DUMP);
/// family.add_group(5, "wg_peers");
///
/// assert_eq!(family.name(), Some("wireguard"));
/// assert_eq!(family.group_by_name("wg_peers").map(|g| g.id), Some(5));
/// ```
pub type GenlFamily = NlObject<GenlFamilyData>;

/// Operations table of [`GenlFamily`].
pub static GENL_FAMILY_OPS: ObjectOps = ObjectOps {
    name: "genl/family",
    size: std::mem::size_of::<GenlFamilyData>(),
    alloc: GenlFamily::alloc_boxed,
    constructor: None,
    free_data: None,
    clone: Some(family_clone),
    dump: DumpOps {
        line: Some(family_dump_line),
        details: Some(family_dump_details),
        stats: Some(family_dump_stats),
    },
    compare: Some(family_compare),
    attrs2str: Some(family_attrs2str),
    id_attrs: FAMILY_ATTR_ID,
};

impl NlObject<GenlFamilyData> {
    /// Allocate an empty family descriptor.
    pub fn new() -> Self {
        Self::alloc(&GENL_FAMILY_OPS)
    }

    /// Numeric identifier, or [`GENL_ID_GENERATE`] if unset.
    pub fn id(&self) -> u32 {
        self.get(FAMILY_ATTR_ID, GENL_ID_GENERATE, |d| d.id)
    }

    /// Set the numeric identifier.
    pub fn set_id(&mut self, id: u32) {
        self.set(FAMILY_ATTR_ID, |d| d.id = id);
    }

    /// Forget the identifier, letting the kernel generate one.
    pub fn unset_id(&mut self) {
        self.unset(FAMILY_ATTR_ID);
    }

    /// Human readable name.
    pub fn name(&self) -> Option<&str> {
        self.get(FAMILY_ATTR_NAME, None, |d| Some(d.name.as_str()))
    }

    /// Set the human readable name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.set(FAMILY_ATTR_NAME, |d| d.name = name);
    }

    /// Interface version, or 0 if unset.
    pub fn version(&self) -> u32 {
        self.get(FAMILY_ATTR_VERSION, 0, |d| d.version)
    }

    /// Set the interface version.
    pub fn set_version(&mut self, version: u32) {
        self.set(FAMILY_ATTR_VERSION, |d| d.version = version);
    }

    /// Size of the family specific header, or 0 if unset.
    pub fn hdrsize(&self) -> u32 {
        self.get(FAMILY_ATTR_HDRSIZE, 0, |d| d.hdrsize)
    }

    /// Set the size of the family specific header.
    pub fn set_hdrsize(&mut self, hdrsize: u32) {
        self.set(FAMILY_ATTR_HDRSIZE, |d| d.hdrsize = hdrsize);
    }

    /// Highest attribute number, or 0 if unset.
    pub fn maxattr(&self) -> u32 {
        self.get(FAMILY_ATTR_MAXATTR, 0, |d| d.maxattr)
    }

    /// Set the highest attribute number.
    pub fn set_maxattr(&mut self, maxattr: u32) {
        self.set(FAMILY_ATTR_MAXATTR, |d| d.maxattr = maxattr);
    }

    /// Append a multicast group. Duplicates are kept.
    pub fn add_group(&mut self, id: u32, name: impl Into<String>) {
        let group = FamilyGroup::new(id, name);
        self.set(FAMILY_ATTR_GROUPS, |d| d.groups.push(group));
    }

    /// Multicast groups in insertion order.
    pub fn groups(&self) -> &[FamilyGroup] {
        self.get(FAMILY_ATTR_GROUPS, &[][..], |d| d.groups.as_slice())
    }

    /// First group called `name`.
    pub fn group_by_name(&self, name: &str) -> Option<&FamilyGroup> {
        self.groups().iter().find(|g| g.name == name)
    }

    /// Append a command. Duplicates are kept.
    pub fn add_op(&mut self, id: u32, flags: GenlOpFlags) {
        self.set(FAMILY_ATTR_OPS, |d| d.ops.push(FamilyOp { id, flags }));
    }

    /// Commands in insertion order.
    pub fn family_ops(&self) -> &[FamilyOp] {
        self.get(FAMILY_ATTR_OPS, &[][..], |d| d.ops.as_slice())
    }

    /// Check if the family supports command `id`.
    pub fn has_op(&self, id: u32) -> bool {
        self.family_ops().iter().any(|op| op.id == id)
    }

    /// Control attributes needed to encode the present fields, in
    /// attribute order.
    pub fn ctrl_attrs(&self) -> Vec<CtrlAttr> {
        let mut attrs: Vec<CtrlAttr> = FAMILY_ATTR_NAMES
            .iter()
            .filter(|(bit, _)| self.has(*bit))
            .filter_map(|(bit, _)| CtrlAttr::for_family_attr(*bit))
            .collect();
        attrs.sort_by_key(|a| *a as u16);
        attrs
    }

    /// Attributes in `attrs` whose values differ from `other`.
    pub fn diff(&self, other: &Self, attrs: u32, flags: CompareFlags) -> u32 {
        diff_families(self, other, attrs, flags)
    }

    /// Deep copy sharing nothing with `self`.
    pub fn clone_family(&self) -> Self {
        let mut dst = Self::new();
        dst.copy_from(self);
        dst
    }

    /// Render at verbosity `kind`.
    pub fn dump(&self, kind: DumpType) -> String {
        let mut params = DumpParams::new(kind);
        write_dump(self, kind, &mut params);
        params.into_output()
    }
}

impl Default for NlObject<GenlFamilyData> {
    fn default() -> Self {
        Self::new()
    }
}

fn diff_families(a: &GenlFamily, b: &GenlFamily, attrs: u32, flags: CompareFlags) -> u32 {
    let (x, y) = (a.data(), b.data());
    AttrDiff::new(a.attrs(), b.attrs(), attrs, flags)
        .check(FAMILY_ATTR_ID, || x.id != y.id)
        .check(FAMILY_ATTR_NAME, || x.name != y.name)
        .check(FAMILY_ATTR_VERSION, || x.version != y.version)
        .check(FAMILY_ATTR_HDRSIZE, || x.hdrsize != y.hdrsize)
        .check(FAMILY_ATTR_MAXATTR, || x.maxattr != y.maxattr)
        .check(FAMILY_ATTR_OPS, || x.ops != y.ops)
        .check(FAMILY_ATTR_GROUPS, || x.groups != y.groups)
        .finish()
}

fn write_line(family: &GenlFamily, p: &mut DumpParams) {
    let mut parts = Vec::new();
    if family.has(FAMILY_ATTR_ID) {
        parts.push(format!("0x{:04x}", family.id()));
    }
    if let Some(name) = family.name() {
        parts.push(name.to_string());
    }
    if family.has(FAMILY_ATTR_VERSION) {
        parts.push(format!("version {}", family.version()));
    }
    p.dump_line(format_args!("{}\n", parts.join(" ")));
}

fn write_details(family: &GenlFamily, p: &mut DumpParams) {
    write_line(family, p);

    let mut sizes = Vec::new();
    if family.has(FAMILY_ATTR_HDRSIZE) {
        sizes.push(format!("hdrsize {}", family.hdrsize()));
    }
    if family.has(FAMILY_ATTR_MAXATTR) {
        sizes.push(format!("maxattr {}", family.maxattr()));
    }
    if !sizes.is_empty() {
        p.dump_line(format_args!("    {}\n", sizes.join(" ")));
    }

    for op in family.family_ops() {
        p.dump_line(format_args!("      op 0x{:02x}", op.id));
        if !op.flags.is_empty() {
            p.dump(format_args!(" <{}>", op.flags.names()));
        }
        p.dump(format_args!("\n"));
    }

    for grp in family.groups() {
        p.dump_line(format_args!("      grp {} (0x{:02x})\n", grp.name, grp.id));
    }
}

fn write_dump(family: &GenlFamily, kind: DumpType, p: &mut DumpParams) {
    match kind {
        DumpType::Line => write_line(family, p),
        // Families have no statistics.
        DumpType::Details | DumpType::Stats => write_details(family, p),
    }
}

fn family_clone(dst: &mut dyn Object, src: &dyn Object) -> Result<()> {
    let src = object::downcast_ref::<GenlFamily>(src)?;
    object::downcast_mut::<GenlFamily>(dst)?.copy_from(src);
    Ok(())
}

fn family_compare(a: &dyn Object, b: &dyn Object, attrs: u32, flags: CompareFlags) -> Result<u32> {
    let a = object::downcast_ref::<GenlFamily>(a)?;
    let b = object::downcast_ref::<GenlFamily>(b)?;
    Ok(diff_families(a, b, attrs, flags))
}

fn family_dump_line(obj: &dyn Object, p: &mut DumpParams) -> Result<()> {
    write_line(object::downcast_ref::<GenlFamily>(obj)?, p);
    Ok(())
}

fn family_dump_details(obj: &dyn Object, p: &mut DumpParams) -> Result<()> {
    write_details(object::downcast_ref::<GenlFamily>(obj)?, p);
    Ok(())
}

fn family_dump_stats(obj: &dyn Object, p: &mut DumpParams) -> Result<()> {
    family_dump_details(obj, p)
}

fn family_attrs2str(attrs: u32) -> String {
    let mut names: Vec<String> = FAMILY_ATTR_NAMES
        .iter()
        .filter(|(bit, _)| attrs & bit != 0)
        .map(|(_, name)| name.to_string())
        .collect();
    let known = FAMILY_ATTR_NAMES.iter().fold(0u32, |acc, (bit, _)| acc | bit);
    if attrs & !known != 0 {
        names.push(format!("0x{:x}", attrs & !known));
    }
    names.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const ALL: u32 = !0;

    fn nlctrl() -> GenlFamily {
        let mut f = GenlFamily::new();
        f.set_id(0x10);
        f.set_name("nlctrl");
        f.set_version(2);
        f.set_hdrsize(0);
        f.set_maxattr(10);
        f.add_op(3, GenlOpFlags::CMD_CAP_DO | GenlOpFlags::CMD_CAP_DUMP);
        f.add_group(0x10, "notify");
        f
    }

    #[test]
    fn test_new_is_empty() {
        let f = GenlFamily::new();
        assert_eq!(f.attrs(), 0);
        assert_eq!(f.type_name(), "genl/family");
        assert_eq!(f.id(), GENL_ID_GENERATE);
        assert_eq!(f.name(), None);
        assert_eq!(f.version(), 0);
        assert_eq!(f.hdrsize(), 0);
        assert_eq!(f.maxattr(), 0);
        assert!(f.groups().is_empty());
        assert!(f.family_ops().is_empty());
    }

    #[test]
    fn test_setters_touch_only_their_bit() {
        let cases: [(u32, fn(&mut GenlFamily)); 7] = [
            (FAMILY_ATTR_ID, |f| f.set_id(7)),
            (FAMILY_ATTR_NAME, |f| f.set_name("x")),
            (FAMILY_ATTR_VERSION, |f| f.set_version(1)),
            (FAMILY_ATTR_HDRSIZE, |f| f.set_hdrsize(4)),
            (FAMILY_ATTR_MAXATTR, |f| f.set_maxattr(9)),
            (FAMILY_ATTR_GROUPS, |f| f.add_group(1, "g")),
            (FAMILY_ATTR_OPS, |f| f.add_op(1, GenlOpFlags::empty())),
        ];
        for (bit, set) in cases {
            let mut f = GenlFamily::new();
            set(&mut f);
            assert_eq!(f.attrs(), bit, "{}", family_attrs2str(bit));
        }
    }

    #[test]
    fn test_getters_after_set() {
        let f = nlctrl();
        assert_eq!(f.id(), 0x10);
        assert_eq!(f.name(), Some("nlctrl"));
        assert_eq!(f.version(), 2);
        assert_eq!(f.maxattr(), 10);
        assert!(f.has_op(3));
        assert!(!f.has_op(4));
        assert_eq!(f.groups(), &[FamilyGroup::new(0x10, "notify")]);
    }

    #[test]
    fn test_unset_id_restores_sentinel() {
        let mut f = nlctrl();
        f.unset_id();
        assert_eq!(f.id(), GENL_ID_GENERATE);
        assert!(!f.has(FAMILY_ATTR_ID));
    }

    #[test]
    fn test_duplicate_groups_kept() {
        let mut f = GenlFamily::new();
        f.add_group(1, "a");
        f.add_group(1, "a");
        assert_eq!(f.groups().len(), 2);
    }

    #[test]
    fn test_diff_version_only() {
        let a = nlctrl();
        let mut b = nlctrl();
        b.set_version(3);
        let attrs = FAMILY_ATTR_ID | FAMILY_ATTR_NAME | FAMILY_ATTR_VERSION;
        assert_eq!(a.diff(&b, attrs, CompareFlags::empty()), FAMILY_ATTR_VERSION);
    }

    #[test]
    fn test_diff_groups_and_ops() {
        let a = nlctrl();
        let mut b = nlctrl();
        b.add_group(0x11, "extra");
        b.add_op(4, GenlOpFlags::empty());
        assert_eq!(
            a.diff(&b, ALL, CompareFlags::empty()),
            FAMILY_ATTR_GROUPS | FAMILY_ATTR_OPS
        );
    }

    #[test]
    fn test_diff_presence_policy() {
        let a = nlctrl();
        let mut b = nlctrl();
        b.unset_id();
        assert_eq!(a.diff(&b, ALL, CompareFlags::empty()), 0);
        assert_eq!(a.diff(&b, ALL, CompareFlags::PRESENCE), FAMILY_ATTR_ID);
    }

    #[test]
    fn test_clone_is_deep() {
        let src = nlctrl();
        let mut dst = src.clone_family();
        assert_eq!(dst.attrs(), src.attrs());
        assert_eq!(dst.diff(&src, ALL, CompareFlags::PRESENCE), 0);

        dst.add_group(0x20, "other");
        assert_eq!(src.groups().len(), 1);
        assert_eq!(dst.groups().len(), 2);
    }

    #[test]
    fn test_clone_through_ops() {
        let src = nlctrl();
        let dst = object::clone_object(&src).unwrap();
        assert_eq!(object::compare(&src, dst.as_ref(), ALL, CompareFlags::empty()).unwrap(), 0);

        let mut dst = object::downcast::<GenlFamily>(dst).unwrap();
        dst.add_group(0x21, "more");
        assert_eq!(src.groups().len(), 1);
    }

    #[test]
    fn test_identical_by_id() {
        let a = nlctrl();
        let mut b = nlctrl();
        b.set_name("renamed");
        assert!(object::identical(&a, &b));
        b.set_id(0x11);
        assert!(!object::identical(&a, &b));
    }

    #[test]
    fn test_dump_line() {
        assert_eq!(nlctrl().dump(DumpType::Line), "0x0010 nlctrl version 2\n");
    }

    #[test]
    fn test_dump_details() {
        let expected = "0x0010 nlctrl version 2\n\
                        \x20   hdrsize 0 maxattr 10\n\
                        \x20     op 0x03 <has-doit,has-dump>\n\
                        \x20     grp notify (0x10)\n";
        assert_eq!(nlctrl().dump(DumpType::Details), expected);
    }

    #[test]
    fn test_dump_stats_matches_details() {
        let f = nlctrl();
        assert_eq!(f.dump(DumpType::Stats), f.dump(DumpType::Details));
        assert_eq!(
            object::dump_to_string(&f, DumpType::Stats).unwrap(),
            f.dump(DumpType::Details)
        );
    }

    #[test]
    fn test_dump_only_present_attrs() {
        let mut f = GenlFamily::new();
        f.set_name("wireguard");
        f.set_maxattr(8);
        assert_eq!(f.dump(DumpType::Details), "wireguard\n    maxattr 8\n");
    }

    #[test]
    fn test_dump_with_prefix() {
        let f = nlctrl();
        let mut p = DumpParams::new(DumpType::Line).with_prefix(2);
        object::dump(&f, &mut p).unwrap();
        assert_eq!(p.output(), "  0x0010 nlctrl version 2\n");
    }

    #[test]
    fn test_attrs2str() {
        let f = nlctrl();
        assert_eq!(
            object::attrs_to_string(&f),
            "id,name,version,hdrsize,maxattr,groups,ops"
        );
        assert_eq!(family_attrs2str(FAMILY_ATTR_NAME | 0x100), "name,0x100");
        assert_eq!(family_attrs2str(0), "");
    }

    #[test]
    fn test_ctrl_attrs() {
        let mut f = GenlFamily::new();
        f.add_group(1, "g");
        f.set_name("n");
        assert_eq!(f.ctrl_attrs(), vec![CtrlAttr::FamilyName, CtrlAttr::McastGroups]);
        assert_eq!(nlctrl().ctrl_attrs().len(), 7);
    }

    #[test]
    fn test_op_flag_names() {
        assert_eq!(GenlOpFlags::all().names(), "admin-perm,has-doit,has-dump,has-policy");
        assert_eq!(GenlOpFlags::empty().names(), "");
    }

    #[test]
    fn test_hooks_reject_other_types() {
        let other = NlObject::<u32>::alloc(&OTHER_OPS);
        let f = GenlFamily::new();
        let mut p = DumpParams::new(DumpType::Line);
        assert!(matches!(
            family_dump_line(&other, &mut p),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(object::compare(&f, &other, ALL, CompareFlags::empty()).is_err());
    }

    static OTHER_OPS: ObjectOps = ObjectOps {
        name: "test/other",
        size: std::mem::size_of::<u32>(),
        alloc: NlObject::<u32>::alloc_boxed,
        constructor: None,
        free_data: None,
        clone: None,
        dump: DumpOps {
            line: None,
            details: None,
            stats: None,
        },
        compare: None,
        attrs2str: None,
        id_attrs: 0,
    };
}
