//! Struct layout and bounded view tests.

use nlobject::Error;
use nlobject::layout::{
    BoundedView, FixedLayoutStruct, IndirectLayoutStruct, PointerToken, SIZEOF_POINTER,
    SIZEOF_U16, SIZEOF_U32,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::common::init_tracing;

// struct genlmsghdr { u8 cmd; u8 version; u16 reserved; }
static GENLMSGHDR: &[usize] = &[1, 1, SIZEOF_U16];

// struct { u32 len; char *data; }
const LEN: usize = 0;
const DATA: usize = 1;

#[test]
fn test_fixed_header_layout() {
    let mut hdr = FixedLayoutStruct::new(GENLMSGHDR);
    assert_eq!(hdr.size(), 4);
    assert!(hdr.is_empty());

    hdr.write(0, 3u8).unwrap();
    hdr.write(1, 2u8).unwrap();
    assert_eq!(hdr.as_bytes(), &[3, 2, 0, 0]);
    assert_eq!(hdr.to_string(), "03 02 00 00");

    let err = hdr.set_field(2, &[1, 2, 3]).unwrap_err();
    assert!(err.is_layout_violation());
    assert_eq!(hdr.as_bytes(), &[3, 2, 0, 0]);
}

#[test]
fn test_fixed_decode_ignores_trailing_bytes() {
    let hdr = FixedLayoutStruct::from_bytes(GENLMSGHDR, &[1, 1, 0, 0, 0xff, 0xff]).unwrap();
    assert_eq!(hdr.into_bytes(), vec![1, 1, 0, 0]);

    assert!(matches!(
        FixedLayoutStruct::from_bytes(GENLMSGHDR, &[1]),
        Err(Error::Truncated {
            expected: 4,
            actual: 1
        })
    ));
}

#[test]
fn test_field_view_edits_in_place() {
    let mut hdr = FixedLayoutStruct::new(GENLMSGHDR);
    let view = hdr.field_view(2).unwrap();
    assert_eq!((view.start(), view.len()), (2, SIZEOF_U16));

    view.write(hdr.as_bytes_mut(), &[0xaa, 0xbb]).unwrap();
    assert_eq!(hdr.field(2).unwrap(), &[0xaa, 0xbb]);

    let err = view.write(hdr.as_bytes_mut(), &[1]).unwrap_err();
    assert!(err.is_invalid_view_mutation());
    assert!(view.delete(hdr.as_bytes_mut(), 0).unwrap_err().is_invalid_view_mutation());
    assert_eq!(hdr.field(2).unwrap(), &[0xaa, 0xbb]);
}

#[test]
fn test_view_over_ten_bytes() {
    let mut buf = vec![0u8; 10];
    let view = BoundedView::new(&buf, 2, Some(5)).unwrap();

    view.write(&mut buf, &[7, 8, 9]).unwrap();
    assert_eq!(buf, [0, 0, 7, 8, 9, 0, 0, 0, 0, 0]);

    assert!(matches!(
        view.write(&mut buf, &[1, 2]),
        Err(Error::ViewLength {
            expected: 3,
            actual: 2
        })
    ));
    assert!(matches!(view.delete(&mut buf, 0), Err(Error::ViewDeletion)));
    assert_eq!(buf, [0, 0, 7, 8, 9, 0, 0, 0, 0, 0]);
}

#[test]
fn test_view_negative_bounds() {
    let buf: Vec<u8> = (0..10).collect();
    let view = BoundedView::new(&buf, -4, Some(-1)).unwrap();
    assert_eq!(view.read(&buf).unwrap(), &[6, 7, 8]);
    assert_eq!(view.get(&buf, -1).unwrap(), 8);
    assert!(view.get(&buf, 3).is_err());

    let tail = BoundedView::new(&buf, 7, None).unwrap();
    assert_eq!(tail.copy(&buf).unwrap(), vec![7, 8, 9]);

    assert!(BoundedView::new(&buf, 5, Some(11)).is_err());
    assert!(BoundedView::new(&buf, -11, None).is_err());
}

#[test]
fn test_view_replace_subrange() {
    let mut buf = vec![0u8; 8];
    let view = BoundedView::new(&buf, 4, None).unwrap();
    view.replace(&mut buf, 1..3, &[5, 6]).unwrap();
    assert_eq!(buf, [0, 0, 0, 0, 0, 5, 6, 0]);

    // Clipped to the view end.
    view.replace(&mut buf, 2..100, &[1, 1]).unwrap();
    assert_eq!(buf, [0, 0, 0, 0, 0, 5, 1, 1]);
    assert!(view.replace(&mut buf, 2..100, &[1, 1, 1]).is_err());
}

#[test]
fn test_indirect_resolve_and_raw() {
    init_tracing();

    let mut s = IndirectLayoutStruct::new(2);
    s.set_slot(LEN, &5u32.to_ne_bytes()).unwrap();
    let token = s.point_slot(DATA, b"hello".to_vec()).unwrap();

    assert_eq!(s.slot(DATA).unwrap(), token.as_bytes());
    assert_eq!(s.raw_bytes().len(), SIZEOF_U32 + SIZEOF_POINTER);

    let resolved = s.resolve();
    assert_eq!(&resolved[..SIZEOF_U32], &5u32.to_ne_bytes());
    assert_eq!(&resolved[SIZEOF_U32..], b"hello");

    s.pointee_mut(&token).unwrap().extend_from_slice(b" world");
    assert_eq!(&s.resolve()[SIZEOF_U32..], b"hello world");
}

#[test]
fn test_indirect_shared_payload() {
    let mut s = IndirectLayoutStruct::new(2);
    let token = s.point_slot(0, vec![1, 2]).unwrap();
    s.set_slot(1, token.as_bytes()).unwrap();

    assert_eq!(&s.resolve()[..], &[1, 2, 1, 2]);
    assert_eq!(s.slot(0).unwrap(), s.slot(1).unwrap());
    assert_eq!(s.pointer_count(), 1);

    assert_eq!(s.release(&token), Some(vec![1, 2]));
    assert_eq!(s.resolve(), s.raw_bytes());
}

#[test]
fn test_tokens_unique_and_nonzero() {
    let mut s = IndirectLayoutStruct::new(0);
    let mut rng = StdRng::seed_from_u64(7);
    let tokens: Vec<PointerToken> = (0..256).map(|_| s.new_token_with(&mut rng).unwrap()).collect();

    for (i, t) in tokens.iter().enumerate() {
        assert_ne!(t.value(), 0);
        assert!(!tokens[i + 1..].contains(t));
    }
    assert_eq!(s.pointer_count(), 256);
}

#[test]
fn test_indirect_slot_bounds() {
    let mut s = IndirectLayoutStruct::new(1);
    assert!(matches!(
        s.set_slot(1, &[0]),
        Err(Error::FieldIndex { index: 1, count: 1 })
    ));
    assert!(s.point_slot(3, vec![]).is_err());
    assert_eq!(s.pointer_count(), 0);
    assert!(s.is_empty());
}
