//! Ancillary socket data: process credentials and the message header
//! that carries them.
//!
//! The socket layer fills these from `SCM_CREDENTIALS` control messages;
//! this module only defines their byte layout and field access.

use std::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{Error, Result};
use crate::layout::{FixedLayoutStruct, SIZEOF_U32};

/// Field widths of `struct ucred`: pid, uid, gid.
const UCRED_SIGNATURE: &[usize] = &[SIZEOF_U32, SIZEOF_U32, SIZEOF_U32];

const PID: usize = 0;
const UID: usize = 1;
const GID: usize = 2;

/// Wire layout of `struct ucred` (mirrors `libc::ucred`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RawUcred {
    /// Process ID.
    pub pid: u32,
    /// User ID.
    pub uid: u32,
    /// Group ID.
    pub gid: u32,
}

/// Size of `struct ucred` in bytes.
pub const UCRED_SIZE: usize = std::mem::size_of::<RawUcred>();

/// Credentials of the sending process (see `unix(7)`).
///
/// Three native-endian `u32` fields at offsets 0, 4 and 8. All zero by
/// default.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ucred {
    inner: FixedLayoutStruct,
}

impl Ucred {
    /// Create credentials from explicit ids.
    pub fn new(pid: u32, uid: u32, gid: u32) -> Self {
        let mut cred = Self::default();
        cred.set_pid(pid);
        cred.set_uid(uid);
        cred.set_gid(gid);
        cred
    }

    /// Decode credentials from an ancillary data payload.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let (raw, _) = RawUcred::read_from_prefix(data).map_err(|_| Error::Truncated {
            expected: UCRED_SIZE,
            actual: data.len(),
        })?;
        Ok(Self::from(raw))
    }

    fn get(&self, field: usize) -> u32 {
        let value = self.inner.read::<u32>(field);
        debug_assert!(value.is_ok(), "ucred field {field}: {value:?}");
        value.unwrap_or_default()
    }

    fn put(&mut self, field: usize, value: u32) {
        let res = self.inner.write(field, value);
        debug_assert!(res.is_ok(), "ucred field {field}: {res:?}");
    }

    /// Process ID of the sending process.
    pub fn pid(&self) -> u32 {
        self.get(PID)
    }

    /// Set the process ID.
    pub fn set_pid(&mut self, pid: u32) {
        self.put(PID, pid);
    }

    /// User ID of the sending process.
    pub fn uid(&self) -> u32 {
        self.get(UID)
    }

    /// Set the user ID.
    pub fn set_uid(&mut self, uid: u32) {
        self.put(UID, uid);
    }

    /// Group ID of the sending process.
    pub fn gid(&self) -> u32 {
        self.get(GID)
    }

    /// Set the group ID.
    pub fn set_gid(&mut self, gid: u32) {
        self.put(GID, gid);
    }

    /// Raw bytes in pid, uid, gid order.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    /// Underlying fixed-layout struct.
    pub fn as_struct(&self) -> &FixedLayoutStruct {
        &self.inner
    }

    /// Mutable access for in-place edits (e.g. through a bounded view).
    pub fn as_struct_mut(&mut self) -> &mut FixedLayoutStruct {
        &mut self.inner
    }

    /// Check if all three ids are zero.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Wire representation.
    pub fn to_raw(&self) -> RawUcred {
        RawUcred {
            pid: self.pid(),
            uid: self.uid(),
            gid: self.gid(),
        }
    }
}

impl Default for Ucred {
    fn default() -> Self {
        Self {
            inner: FixedLayoutStruct::new(UCRED_SIGNATURE),
        }
    }
}

impl From<RawUcred> for Ucred {
    fn from(raw: RawUcred) -> Self {
        Self::new(raw.pid, raw.uid, raw.gid)
    }
}

impl From<libc::ucred> for Ucred {
    fn from(cred: libc::ucred) -> Self {
        Self::new(cred.pid as u32, cred.uid, cred.gid)
    }
}

impl From<&Ucred> for libc::ucred {
    fn from(cred: &Ucred) -> Self {
        libc::ucred {
            pid: cred.pid() as libc::pid_t,
            uid: cred.uid(),
            gid: cred.gid(),
        }
    }
}

impl fmt::Debug for Ucred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ucred")
            .field("pid", &self.pid())
            .field("uid", &self.uid())
            .field("gid", &self.gid())
            .finish()
    }
}

impl fmt::Display for Ucred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid={} uid={} gid={}", self.pid(), self.uid(), self.gid())
    }
}

/// Message header as handed over by the socket layer (`struct msghdr`).
#[derive(Debug, Clone, Default)]
pub struct MsgHdr {
    /// Optional peer address.
    pub name: Option<Vec<u8>>,
    /// Payload data.
    pub iov: Vec<u8>,
    /// Credentials from the control data, if any were attached.
    pub control: Option<Ucred>,
    /// Flags on the received message.
    pub flags: i32,
}

impl MsgHdr {
    /// Create a header around a payload.
    pub fn new(iov: Vec<u8>) -> Self {
        Self {
            iov,
            ..Self::default()
        }
    }

    /// Attach sender credentials.
    pub fn with_credentials(mut self, cred: Ucred) -> Self {
        self.control = Some(cred);
        self
    }

    /// Sender credentials, if present.
    pub fn credentials(&self) -> Option<&Ucred> {
        self.control.as_ref()
    }
}
