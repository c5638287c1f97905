//! C struct emulation for structs holding pointers.

use std::collections::HashMap;
use std::fmt;

use bytes::{Bytes, BytesMut};
use rand::Rng;

use super::{SIZEOF_POINTER, hex_dump};
use crate::error::{Error, Result};

/// Candidates drawn before token generation is reported as a bug.
const MAX_TOKEN_ATTEMPTS: usize = 64;

/// Opaque stand-in for a pointer value embedded in a struct.
///
/// Tokens are platform pointer width and never zero. They are keys into an
/// [`IndirectLayoutStruct`]'s pointer table, not addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerToken([u8; SIZEOF_POINTER]);

impl PointerToken {
    /// Build a token from a pointer-sized value.
    pub fn from_value(value: usize) -> Self {
        Self(value.to_ne_bytes())
    }

    /// Interpret `data` as a token. Returns `None` unless it is exactly
    /// pointer width.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(Self)
    }

    /// Token bytes as stored in a slot.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Token as a pointer-sized value.
    pub fn value(&self) -> usize {
        usize::from_ne_bytes(self.0)
    }
}

/// A C struct containing pointers.
///
/// Each member is an independent byte segment ("slot"). A slot holds either
/// a direct value or a [`PointerToken`] registered in the struct's pointer
/// table. [`resolve`](Self::resolve) follows the tokens while
/// [`raw_bytes`](Self::raw_bytes) keeps them, which exposes two slots
/// sharing a payload.
///
/// Not safe for unsynchronized concurrent use: token generation checks and
/// inserts in two steps.
///
/// # Example
///
/// ```
/// use nlobject::layout::IndirectLayoutStruct;
///
/// let mut s = IndirectLayoutStruct::new(2);
/// s.set_slot(0, &[1, 0, 0, 0]).unwrap();
/// s.point_slot(1, b"payload".to_vec()).unwrap();
///
/// assert_eq!(&s.resolve()[..], b"\x01\x00\x00\x00payload");
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndirectLayoutStruct {
    slots: Vec<Vec<u8>>,
    pointers: HashMap<PointerToken, Vec<u8>>,
}

impl IndirectLayoutStruct {
    /// Create a struct with `slot_count` empty slots and no pointers.
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![Vec::new(); slot_count],
            pointers: HashMap::new(),
        }
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Raw bytes of slot `index` (tokens unresolved).
    pub fn slot(&self, index: usize) -> Result<&[u8]> {
        self.slots
            .get(index)
            .map(Vec::as_slice)
            .ok_or(Error::FieldIndex {
                index,
                count: self.slots.len(),
            })
    }

    /// Replace the contents of slot `index`.
    pub fn set_slot(&mut self, index: usize, value: &[u8]) -> Result<()> {
        let count = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(Error::FieldIndex { index, count })?;
        slot.clear();
        slot.extend_from_slice(value);
        Ok(())
    }

    /// Reserve a fresh token using the thread-local RNG.
    ///
    /// The token is registered with an empty payload so that repeated calls
    /// never hand out the same value.
    pub fn new_token(&mut self) -> Result<PointerToken> {
        self.new_token_with(&mut rand::thread_rng())
    }

    /// Reserve a fresh token drawn from `rng`.
    ///
    /// Candidates are uniform over the non-zero pointer-width values and are
    /// redrawn while they collide with a registered token.
    pub fn new_token_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<PointerToken> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let candidate = PointerToken::from_value(rng.gen_range(1..=usize::MAX));
            if !self.pointers.contains_key(&candidate) {
                self.pointers.insert(candidate, Vec::new());
                tracing::debug!(token = candidate.value(), "reserved pointer token");
                return Ok(candidate);
            }
        }

        tracing::error!(
            attempts = MAX_TOKEN_ATTEMPTS,
            live = self.pointers.len(),
            "pointer token generation kept colliding"
        );
        Err(Error::TokenSpaceExhausted {
            attempts: MAX_TOKEN_ATTEMPTS,
            live: self.pointers.len(),
        })
    }

    /// Register (or replace) the payload behind `token`.
    pub fn insert_pointer(&mut self, token: PointerToken, payload: Vec<u8>) -> Option<Vec<u8>> {
        self.pointers.insert(token, payload)
    }

    /// Store `payload` out of line and write a fresh token into slot `index`.
    pub fn point_slot(&mut self, index: usize, payload: Vec<u8>) -> Result<PointerToken> {
        if index >= self.slots.len() {
            return Err(Error::FieldIndex {
                index,
                count: self.slots.len(),
            });
        }
        let token = self.new_token()?;
        self.pointers.insert(token, payload);
        self.set_slot(index, token.as_bytes())?;
        Ok(token)
    }

    /// Payload behind `token`.
    pub fn pointee(&self, token: &PointerToken) -> Option<&[u8]> {
        self.pointers.get(token).map(Vec::as_slice)
    }

    /// Mutable payload behind `token`.
    pub fn pointee_mut(&mut self, token: &PointerToken) -> Option<&mut Vec<u8>> {
        self.pointers.get_mut(token)
    }

    /// Drop `token` from the table, returning its payload.
    ///
    /// Slots still holding the token resolve to the raw token bytes afterwards.
    pub fn release(&mut self, token: &PointerToken) -> Option<Vec<u8>> {
        let payload = self.pointers.remove(token);
        if payload.is_some() {
            tracing::debug!(token = token.value(), "released pointer token");
        }
        payload
    }

    /// Number of registered tokens.
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    fn deref_slot<'a>(&'a self, slot: &'a [u8]) -> &'a [u8] {
        PointerToken::from_bytes(slot)
            .and_then(|token| self.pointers.get(&token))
            .map_or(slot, Vec::as_slice)
    }

    /// All slots concatenated with every registered token replaced by its
    /// payload. Computed on each call.
    pub fn resolve(&self) -> Bytes {
        let mut out = BytesMut::new();
        for slot in &self.slots {
            out.extend_from_slice(self.deref_slot(slot));
        }
        out.freeze()
    }

    /// All slots concatenated as stored, tokens included.
    pub fn raw_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.slots.iter().map(Vec::len).sum());
        for slot in &self.slots {
            out.extend_from_slice(slot);
        }
        out.freeze()
    }

    /// Check if every slot byte is zero (or there are none).
    pub fn is_empty(&self) -> bool {
        self.slots.iter().flatten().all(|&b| b == 0)
    }
}

impl fmt::Display for IndirectLayoutStruct {
    /// Hex dump of the raw slots, tokens unresolved.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_dump(self.slots.iter().flatten()))
    }
}
