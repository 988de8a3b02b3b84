use core::alloc::Layout;
use core::mem::size_of;

use crate::error::StorageError;

/// The largest number of `T` values a single allocation may hold.
#[inline]
pub const fn max_capacity<T>() -> usize {
    let size = size_of::<T>();
    if size == 0 {
        usize::MAX
    } else {
        isize::MAX as usize / size
    }
}

#[inline]
pub fn array_layout<T>(count: usize) -> Result<Layout, StorageError> {
    if count > max_capacity::<T>() {
        return Err(StorageError::CapacityLimit);
    }
    Layout::array::<T>(count).map_err(StorageError::LayoutError)
}
