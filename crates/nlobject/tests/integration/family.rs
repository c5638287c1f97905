//! Family descriptor tests through the generic object API.

use nlobject::Error;
use nlobject::genl::{
    FAMILY_ATTR_GROUPS, FAMILY_ATTR_ID, FAMILY_ATTR_NAME, FAMILY_ATTR_VERSION, GENL_FAMILY_OPS,
    GENL_ID_GENERATE, GenlFamily,
};
use nlobject::object::{self, CompareFlags, DumpParams, DumpType, Object};

use crate::common::{init_tracing, nlctrl};

#[test]
fn test_alloc_through_table() {
    init_tracing();

    let obj = (GENL_FAMILY_OPS.alloc)(&GENL_FAMILY_OPS);
    assert_eq!(obj.attrs(), 0);
    assert_eq!(obj.ops().name, "genl/family");

    let family = object::downcast::<GenlFamily>(obj).unwrap();
    assert_eq!(family.id(), GENL_ID_GENERATE);
    assert_eq!(family.name(), None);
}

#[test]
fn test_clone_is_independent() {
    init_tracing();

    let src = nlctrl();
    let copy = object::clone_object(&src).unwrap();
    assert_eq!(object::compare(&src, copy.as_ref(), !0, CompareFlags::PRESENCE).unwrap(), 0);

    let mut copy = object::downcast::<GenlFamily>(copy).unwrap();
    copy.add_group(0x11, "extra");
    copy.set_name("renamed");

    assert_eq!(src.groups().len(), 1);
    assert_eq!(src.name(), Some("nlctrl"));
    assert_eq!(
        object::compare(&src, copy.as_ref(), !0, CompareFlags::empty()).unwrap(),
        FAMILY_ATTR_NAME | FAMILY_ATTR_GROUPS
    );
}

#[test]
fn test_compare_restricted_mask() {
    let a = nlctrl();
    let mut b = nlctrl();
    b.set_version(3);
    b.set_id(0x20);

    let mask = FAMILY_ATTR_NAME | FAMILY_ATTR_VERSION;
    assert_eq!(object::compare(&a, &b, mask, CompareFlags::empty()).unwrap(), FAMILY_ATTR_VERSION);
    assert_eq!(
        object::compare(&a, &b, !0, CompareFlags::empty()).unwrap(),
        FAMILY_ATTR_VERSION | FAMILY_ATTR_ID
    );
}

#[test]
fn test_identical_requires_same_id() {
    let a = nlctrl();
    let mut b = nlctrl();
    b.set_version(9);
    assert!(object::identical(&a, &b));

    b.unset_id();
    assert!(!object::identical(&a, &b));
}

#[test]
fn test_dump_levels() {
    let family = nlctrl();
    let line = object::dump_to_string(&family, DumpType::Line).unwrap();
    assert_eq!(line, "0x0010 nlctrl version 2\n");

    let details = object::dump_to_string(&family, DumpType::Details).unwrap();
    let lines: Vec<&str> = details.lines().collect();
    assert_eq!(
        lines,
        [
            "0x0010 nlctrl version 2",
            "    hdrsize 0 maxattr 10",
            "      op 0x03 <has-doit,has-dump>",
            "      op 0x0a <has-dump>",
            "      grp notify (0x10)",
        ]
    );

    assert_eq!(object::dump_to_string(&family, DumpType::Stats).unwrap(), details);
}

#[test]
fn test_dump_params_count_lines() {
    let mut params = DumpParams::new(DumpType::Details).with_prefix(4);
    object::dump(&nlctrl(), &mut params).unwrap();
    assert_eq!(params.lines(), 5);
    assert!(params.output().lines().all(|l| l.starts_with("    ")));
}

#[test]
fn test_generic_code_over_trait_objects() {
    let families: Vec<Box<dyn Object>> = vec![Box::new(nlctrl()), Box::new(GenlFamily::new())];
    let names: Vec<String> = families.iter().map(|f| object::attrs_to_string(&**f)).collect();
    assert_eq!(names, ["id,name,version,hdrsize,maxattr,groups,ops", ""]);
}

#[test]
fn test_downcast_mismatch() {
    let family = nlctrl();
    let err = object::downcast_ref::<nlobject::NlObject<u8>>(&family).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { actual: "genl/family", .. }));
    assert!(!err.is_bug());
}
