//! Fixed-length mutable window over a byte buffer.

use std::ops::{Bound, Range, RangeBounds};

use crate::error::{Error, Result};

/// A bounded window `[start, stop)` over a parent buffer.
///
/// The view only records offsets; the parent is passed to every access.
/// Bounds are resolved once against the parent's length at construction,
/// so a parent that later grows on the right does not widen the view.
///
/// Writes are in place and must not change the view's length. Deletion is
/// never allowed. A rejected write leaves the parent untouched.
///
/// # Example
///
/// ```
/// use nlobject::layout::BoundedView;
///
/// let mut buf = vec![0u8; 10];
/// let view = BoundedView::new(&buf, 2, Some(5)).unwrap();
///
/// view.write(&mut buf, &[1, 2, 3]).unwrap();
/// assert_eq!(buf, [0, 0, 1, 2, 3, 0, 0, 0, 0, 0]);
///
/// assert!(view.write(&mut buf, &[9, 9]).is_err());
/// assert!(view.delete(&mut buf, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundedView {
    start: usize,
    stop: usize,
}

impl BoundedView {
    /// Create a view over `parent[start..stop]`.
    ///
    /// Negative offsets count from the end of `parent`. A missing `stop`
    /// means the current end of `parent`, while `Some(0)` means `start`.
    /// A `stop` before `start` gives an empty view at `start`.
    pub fn new(parent: &[u8], start: isize, stop: Option<isize>) -> Result<Self> {
        let len = parent.len();
        let resolve = |offset: isize| {
            if offset < 0 {
                offset + len as isize
            } else {
                offset
            }
        };
        let start = resolve(start);
        let stop = match stop {
            None => len as isize,
            Some(0) => start,
            Some(stop) => resolve(stop).max(start),
        };

        if start < 0 || start > len as isize || stop > len as isize {
            return Err(Error::InvalidRange { start, stop, len });
        }

        Ok(Self {
            start: start as usize,
            stop: stop as usize,
        })
    }

    /// Create a view over the whole of `parent`.
    pub fn over(parent: &[u8]) -> Self {
        Self {
            start: 0,
            stop: parent.len(),
        }
    }

    pub(crate) fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            stop: range.end,
        }
    }

    /// Offset of the first byte in the parent.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset one past the last byte in the parent.
    pub fn stop(&self) -> usize {
        self.stop
    }

    /// Length of the view. Never changes.
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    /// Check if the view covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    fn check_parent(&self, parent_len: usize) -> Result<()> {
        if parent_len < self.stop {
            return Err(Error::InvalidRange {
                start: self.start as isize,
                stop: self.stop as isize,
                len: parent_len,
            });
        }
        Ok(())
    }

    fn resolve_index(&self, index: isize) -> Result<usize> {
        let len = self.len();
        let resolved = if index < 0 { index + len as isize } else { index };
        if resolved < 0 || resolved >= len as isize {
            return Err(Error::IndexOutOfRange { index, len });
        }
        Ok(resolved as usize)
    }

    /// The parent's bytes covered by this view.
    pub fn read<'a>(&self, parent: &'a [u8]) -> Result<&'a [u8]> {
        self.check_parent(parent.len())?;
        Ok(&parent[self.start..self.stop])
    }

    /// Byte at `index` within the view. Negative indices count from the end.
    pub fn get(&self, parent: &[u8], index: isize) -> Result<u8> {
        let index = self.resolve_index(index)?;
        Ok(self.read(parent)?[index])
    }

    /// Overwrite the byte at `index` within the view.
    pub fn set(&self, parent: &mut [u8], index: isize, value: u8) -> Result<()> {
        let index = self.resolve_index(index)?;
        self.check_parent(parent.len())?;
        parent[self.start + index] = value;
        Ok(())
    }

    /// Replace `range` (relative to the view) with `value`.
    ///
    /// The range end is clipped to the view. `value` must be exactly as long
    /// as the clipped range.
    pub fn replace(
        &self,
        parent: &mut [u8],
        range: impl RangeBounds<usize>,
        value: &[u8],
    ) -> Result<()> {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.checked_add(1).ok_or(Error::IndexOutOfRange {
                index: isize::MAX,
                len,
            })?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        self.splice(parent, start, end, value)
    }

    /// Replace `view[start..stop]` with `value`, slice style.
    ///
    /// Negative bounds count from the end of the view. A missing `stop`
    /// means the end of the view and `Some(0)` means `start`. The end is
    /// clipped to the view and `value` must be exactly as long as the
    /// resulting range.
    ///
    /// ```
    /// use nlobject::layout::BoundedView;
    ///
    /// let mut buf = vec![0u8; 6];
    /// let view = BoundedView::new(&buf, 1, Some(5)).unwrap();
    /// view.replace_slice(&mut buf, -2, None, &[7, 7]).unwrap();
    /// assert_eq!(buf, [0, 0, 0, 7, 7, 0]);
    /// ```
    pub fn replace_slice(
        &self,
        parent: &mut [u8],
        start: isize,
        stop: Option<isize>,
        value: &[u8],
    ) -> Result<()> {
        let len = self.len() as isize;
        let start_rel = if start < 0 { start + len } else { start };
        if start_rel < 0 {
            return Err(Error::IndexOutOfRange {
                index: start,
                len: self.len(),
            });
        }
        let stop_rel = match stop {
            None => len,
            Some(0) => start_rel,
            Some(stop) if stop < 0 => (stop + len).max(0),
            Some(stop) => stop,
        };
        self.splice(parent, start_rel as usize, stop_rel as usize, value)
    }

    fn splice(&self, parent: &mut [u8], start: usize, end: usize, value: &[u8]) -> Result<()> {
        let len = self.len();
        let end = end.min(len);

        if start > len || (start == len && len != 0) {
            return Err(Error::IndexOutOfRange {
                index: isize::try_from(start).unwrap_or(isize::MAX),
                len,
            });
        }
        let target = end.saturating_sub(start);
        if target != value.len() {
            return Err(Error::ViewLength {
                expected: target,
                actual: value.len(),
            });
        }
        self.check_parent(parent.len())?;

        let abs = self.start + start;
        parent[abs..abs + target].copy_from_slice(value);
        Ok(())
    }

    /// Replace the whole view with `value`.
    pub fn write(&self, parent: &mut [u8], value: &[u8]) -> Result<()> {
        self.replace(parent, .., value)
    }

    /// Delete the byte at `index`. Always fails: a view cannot shrink.
    pub fn delete(&self, _parent: &mut [u8], _index: isize) -> Result<()> {
        Err(Error::ViewDeletion)
    }

    /// Copy the covered bytes into a new buffer.
    pub fn copy(&self, parent: &[u8]) -> Result<Vec<u8>> {
        Ok(self.read(parent)?.to_vec())
    }
}
