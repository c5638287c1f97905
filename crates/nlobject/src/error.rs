//! Error types for object and layout operations.

/// Result type for object and layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating objects and byte layouts.
///
/// Absent attributes are never an error: getters resolve them through a
/// documented default. Everything here is structural and local; a rejected
/// operation leaves its target untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A fixed-layout field was written with the wrong number of bytes.
    #[error("field {field}: expected {expected} bytes, got {actual}")]
    FieldLength {
        /// Field index in the struct signature.
        field: usize,
        /// Width of the field.
        expected: usize,
        /// Length of the rejected value.
        actual: usize,
    },

    /// Field or slot index beyond the struct definition.
    #[error("field index {index} out of range ({count} fields)")]
    FieldIndex {
        /// Requested index.
        index: usize,
        /// Number of fields or slots.
        count: usize,
    },

    /// A write through a bounded view would change its length.
    #[error("length of view cannot be changed: expected {expected} bytes, got {actual}")]
    ViewLength {
        /// Length of the targeted range.
        expected: usize,
        /// Length of the replacement.
        actual: usize,
    },

    /// Deletion through a bounded view.
    #[error("bounded view doesn't support item deletion")]
    ViewDeletion,

    /// Index outside a bounded view.
    #[error("view index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index, relative to the view.
        index: isize,
        /// Length of the view.
        len: usize,
    },

    /// View bounds that cannot be resolved against the parent buffer.
    #[error("invalid view range {start}..{stop} over {len} bytes")]
    InvalidRange {
        /// Resolved start offset.
        start: isize,
        /// Resolved stop offset.
        stop: isize,
        /// Length of the parent buffer.
        len: usize,
    },

    /// Raw buffer too short to decode a fixed-layout struct.
    #[error("buffer truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Size of the struct.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// Operations table entry without a fallback is missing.
    #[error("{object}: operation {operation} not implemented")]
    MissingOperation {
        /// Type name from the operations table.
        object: &'static str,
        /// Name of the missing hook.
        operation: &'static str,
    },

    /// Objects of different types, or a payload of an unexpected type.
    #[error("object type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type name.
        expected: &'static str,
        /// Actual type name.
        actual: &'static str,
    },

    /// Pointer token generation gave up. This is a bug, please report it.
    #[error("pointer token space exhausted after {attempts} attempts ({live} live tokens)")]
    TokenSpaceExhausted {
        /// Number of candidates drawn.
        attempts: usize,
        /// Number of tokens registered at the time.
        live: usize,
    },
}

impl Error {
    /// Check if this is a layout violation (mismatched field width or bad index).
    pub fn is_layout_violation(&self) -> bool {
        matches!(
            self,
            Self::FieldLength { .. } | Self::FieldIndex { .. } | Self::Truncated { .. }
        )
    }

    /// Check if this is a rejected bounded-view mutation.
    pub fn is_invalid_view_mutation(&self) -> bool {
        matches!(self, Self::ViewLength { .. } | Self::ViewDeletion)
    }

    /// Check if this error reports a broken internal invariant.
    pub fn is_bug(&self) -> bool {
        matches!(self, Self::TokenSpaceExhausted { .. })
    }
}
