//! Fixed-size C struct emulation.

use std::fmt;
use std::ops::Range;

use zerocopy::{FromBytes, Immutable, IntoBytes};

use super::BoundedView;
use super::hex_dump;
use crate::error::{Error, Result};

/// A C struct of fixed size holding no pointers.
///
/// The struct is one contiguous buffer; `signature` lists the byte width of
/// each field in declaration order, so field `i` occupies
/// `sum(signature[..i])..sum(signature[..=i])`. The buffer length always
/// equals the sum of the signature.
///
/// # Example
///
/// ```
/// use nlobject::layout::FixedLayoutStruct;
///
/// // struct { u16 a; u32 b; }
/// let mut s = FixedLayoutStruct::new(&[2, 4]);
/// s.write::<u32>(1, 7).unwrap();
/// assert_eq!(s.read::<u32>(1).unwrap(), 7);
/// assert!(s.set_field(0, &[1, 2, 3]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedLayoutStruct {
    signature: &'static [usize],
    buf: Vec<u8>,
}

impl FixedLayoutStruct {
    /// Create a zero-filled struct for the given signature.
    pub fn new(signature: &'static [usize]) -> Self {
        let size = signature.iter().sum();
        Self {
            signature,
            buf: vec![0u8; size],
        }
    }

    /// Create a struct from the leading bytes of `data`.
    ///
    /// Extra trailing bytes are ignored.
    pub fn from_bytes(signature: &'static [usize], data: &[u8]) -> Result<Self> {
        let size: usize = signature.iter().sum();
        if data.len() < size {
            return Err(Error::Truncated {
                expected: size,
                actual: data.len(),
            });
        }
        Ok(Self {
            signature,
            buf: data[..size].to_vec(),
        })
    }

    /// Field widths in declaration order.
    pub fn signature(&self) -> &'static [usize] {
        self.signature
    }

    /// Total size in bytes.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.signature.len()
    }

    fn field_range(&self, index: usize) -> Result<Range<usize>> {
        let width = *self.signature.get(index).ok_or(Error::FieldIndex {
            index,
            count: self.signature.len(),
        })?;
        let start: usize = self.signature[..index].iter().sum();
        Ok(start..start + width)
    }

    /// Raw bytes of field `index`.
    pub fn field(&self, index: usize) -> Result<&[u8]> {
        let range = self.field_range(index)?;
        Ok(&self.buf[range])
    }

    /// Overwrite field `index`.
    ///
    /// `value` must be exactly as wide as the field; the struct is left
    /// untouched otherwise.
    pub fn set_field(&mut self, index: usize, value: &[u8]) -> Result<()> {
        let range = self.field_range(index)?;
        if range.len() != value.len() {
            return Err(Error::FieldLength {
                field: index,
                expected: range.len(),
                actual: value.len(),
            });
        }
        self.buf[range].copy_from_slice(value);
        Ok(())
    }

    /// Read field `index` as a native-endian `T`.
    pub fn read<T: FromBytes>(&self, index: usize) -> Result<T> {
        let data = self.field(index)?;
        T::read_from_bytes(data).map_err(|_| Error::FieldLength {
            field: index,
            expected: data.len(),
            actual: std::mem::size_of::<T>(),
        })
    }

    /// Write `value` into field `index` in native-endian byte order.
    pub fn write<T: IntoBytes + Immutable>(&mut self, index: usize, value: T) -> Result<()> {
        self.set_field(index, value.as_bytes())
    }

    /// A bounded view covering exactly field `index`.
    pub fn field_view(&self, index: usize) -> Result<BoundedView> {
        let range = self.field_range(index)?;
        Ok(BoundedView::from_range(range))
    }

    /// The whole struct as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// The whole struct as mutable bytes. The length cannot change.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Consume the struct, returning its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Check if every byte is zero.
    pub fn is_empty(&self) -> bool {
        self.buf.iter().all(|&b| b == 0)
    }
}

impl fmt::Display for FixedLayoutStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_dump(&self.buf))
    }
}

impl AsRef<[u8]> for FixedLayoutStruct {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}
