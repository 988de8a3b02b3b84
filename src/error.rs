//! Error handling.

use core::alloc::{Layout, LayoutError};
use core::fmt;

/// An enumeration of error types raised by the storage manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// A memory allocation failed.
    AllocError(Layout),
    /// The requested capacity cannot be represented.
    CapacityLimit,
    /// The provided layout was not allocatable.
    LayoutError(LayoutError),
}

impl StorageError {
    /// Generic description of this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllocError(_) => "Allocation error",
            Self::CapacityLimit => "Exceeded storage capacity limit",
            Self::LayoutError(_) => "Layout error",
        }
    }

    /// Generate a panic with this error as the reason.
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        if let Self::AllocError(layout) = self {
            crate::alloc::handle_alloc_error(layout);
        } else {
            panic!("{}", self.as_str())
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LayoutError> for StorageError {
    fn from(err: LayoutError) -> Self {
        Self::LayoutError(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}

/// An enumeration of error types raised by vector operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VectorError {
    /// An index, position or range fell outside of the live elements.
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The number of live elements at the time of the call.
        len: usize,
    },
    /// The storage manager could not provide the requested capacity.
    Storage(StorageError),
}

impl VectorError {
    #[inline]
    pub(crate) const fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    /// Generic description of this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "Index out of range",
            Self::Storage(err) => err.as_str(),
        }
    }

    /// Access the storage error, if this error was raised by the storage manager.
    pub fn storage_error(&self) -> Option<&StorageError> {
        match self {
            Self::Storage(err) => Some(err),
            Self::OutOfRange { .. } => None,
        }
    }

    /// Generate a panic with this error as the reason.
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        match self {
            Self::Storage(err) => err.panic(),
            Self::OutOfRange { .. } => panic!("{}", self),
        }
    }
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => write!(
                f,
                "{}: the index is {} but the length is {}",
                self.as_str(),
                index,
                len
            ),
            Self::Storage(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl From<StorageError> for VectorError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<LayoutError> for VectorError {
    fn from(err: LayoutError) -> Self {
        Self::Storage(err.into())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::OutOfRange { .. } => None,
        }
    }
}

/// An error raised by collection update operations when the value could
/// not be stored. Includes the associated value, returned to the caller.
#[derive(Clone)]
pub struct UpdateError<T> {
    pub(crate) error: VectorError,
    pub(crate) value: T,
}

impl<T> UpdateError<T> {
    pub(crate) fn new(error: impl Into<VectorError>, value: T) -> Self {
        Self {
            error: error.into(),
            value,
        }
    }

    /// Generic description of this error
    pub fn as_str(&self) -> &'static str {
        "Update error"
    }

    /// Get a reference to the contained `VectorError`
    pub fn error(&self) -> &VectorError {
        &self.error
    }

    /// Unwrap the inner value of this error
    pub fn into_value(self) -> T {
        self.value
    }

    /// Split this error into the `VectorError` and the rejected value
    pub fn into_parts(self) -> (VectorError, T) {
        (self.error, self.value)
    }

    /// Generate a panic with this error as the reason
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        let reason = self.as_str();
        match self.error {
            VectorError::Storage(StorageError::AllocError(layout)) => {
                crate::alloc::handle_alloc_error(layout)
            }
            error => panic!("{}: {}", reason, error),
        }
    }
}

impl<T> fmt::Debug for UpdateError<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for UpdateError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}: {}", self.as_str(), self.error))
    }
}

#[cfg(feature = "std")]
impl<T> std::error::Error for UpdateError<T> {}
