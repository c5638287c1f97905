//! Credential and message header tests.

use nlobject::Ucred;
use nlobject::ancillary::{MsgHdr, RawUcred, UCRED_SIZE};
use zerocopy::IntoBytes;

#[test]
fn test_decode_control_payload() {
    let raw = RawUcred {
        pid: 1234,
        uid: 1000,
        gid: 100,
    };
    let mut payload = raw.as_bytes().to_vec();
    payload.extend_from_slice(&[0; 4]);

    let cred = Ucred::from_bytes(&payload).unwrap();
    assert_eq!((cred.pid(), cred.uid(), cred.gid()), (1234, 1000, 100));
    assert_eq!(cred.to_raw(), raw);
    assert_eq!(cred.as_bytes(), raw.as_bytes());
}

#[test]
fn test_truncated_payload() {
    let err = Ucred::from_bytes(&[0; UCRED_SIZE - 1]).unwrap_err();
    assert!(err.is_layout_violation());
}

#[test]
fn test_libc_conversion() {
    let cred = Ucred::new(42, 0, 0);
    let raw: libc::ucred = (&cred).into();
    assert_eq!(raw.pid, 42);
    assert_eq!(Ucred::from(raw), cred);
}

#[test]
fn test_field_view_on_credentials() {
    let mut cred = Ucred::new(1, 2, 3);
    let view = cred.as_struct().field_view(1).unwrap();
    view.write(cred.as_struct_mut().as_bytes_mut(), &77u32.to_ne_bytes())
        .unwrap();
    assert_eq!(cred.uid(), 77);
    assert!(view.write(cred.as_struct_mut().as_bytes_mut(), &[0]).is_err());
    assert_eq!(cred.to_string(), "pid=1 uid=77 gid=3");
}

#[test]
fn test_msghdr_credentials() {
    let msg = MsgHdr::new(b"data".to_vec());
    assert!(msg.credentials().is_none());

    let msg = msg.with_credentials(Ucred::new(5, 6, 7));
    assert_eq!(msg.credentials().map(Ucred::pid), Some(5));
    assert_eq!(msg.iov, b"data");
}
