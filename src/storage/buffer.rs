use core::fmt;
use core::marker::PhantomData;
use core::mem::{size_of, ManuallyDrop, MaybeUninit};
use core::ptr::{self, NonNull};
use core::slice;

use const_default::ConstDefault;

use super::utils::array_layout;
use crate::alloc::{Allocator, AllocatorDefault};
use crate::error::StorageError;

#[cfg(feature = "zeroize")]
use crate::alloc::AllocatorZeroizes;

/// The length and capacity of an [`ArrayBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferHeader {
    /// The number of allocated element slots.
    pub capacity: usize,
    /// The number of initialized element slots.
    pub length: usize,
}

impl BufferHeader {
    const fn empty<T>() -> Self {
        Self {
            capacity: if size_of::<T>() == 0 { usize::MAX } else { 0 },
            length: 0,
        }
    }
}

/// A single contiguous allocation of `T` slots owned together with its
/// allocator. The first `length` slots are initialized.
///
/// The buffer never touches the initialized elements itself: dropping it
/// only releases the block. Destroying the elements is left to the owner.
pub struct ArrayBuffer<T, A: Allocator> {
    header: BufferHeader,
    data: NonNull<T>,
    generation: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, A: Allocator> ArrayBuffer<T, A> {
    const IS_ZST: bool = size_of::<T>() == 0;

    #[inline]
    pub(crate) const fn dangling(alloc: A) -> Self {
        Self {
            header: BufferHeader::empty::<T>(),
            data: NonNull::dangling(),
            generation: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn allocate_in(capacity: usize, alloc: A) -> Result<Self, StorageError> {
        let mut buf = Self::dangling(alloc);
        buf.grow(capacity)?;
        Ok(buf)
    }

    /// The number of allocated element slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.header.capacity
    }

    /// The number of initialized element slots.
    #[inline]
    pub const fn length(&self) -> usize {
        self.header.length
    }

    /// The length and capacity of this buffer.
    #[inline]
    pub const fn header(&self) -> BufferHeader {
        self.header
    }

    /// Access the allocator instance.
    #[inline]
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// A counter which advances whenever the block is moved or released,
    /// even when the allocator hands back the same address.
    #[inline]
    pub(crate) const fn generation(&self) -> usize {
        self.generation
    }

    /// Continue counting from a buffer which this one replaces.
    #[inline]
    pub(crate) fn succeed(&mut self, previous: &Self) {
        self.generation = previous.generation.wrapping_add(1);
    }

    #[inline]
    fn is_allocated(&self) -> bool {
        !Self::IS_ZST && self.header.capacity > 0
    }

    /// # Safety
    /// The first `length` slots must be initialized and `length` must not
    /// exceed the capacity.
    #[inline]
    pub(crate) unsafe fn set_length(&mut self, length: usize) {
        debug_assert!(length <= self.header.capacity);
        self.header.length = length;
    }

    #[inline]
    pub(crate) const fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.header.length) }
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.data.as_ptr(), self.header.length) }
    }

    /// Access the slots `start..end` together with the allocator, so that
    /// values may be constructed into uninitialized slots. Slots outside of
    /// the range are not borrowed.
    #[inline]
    pub(crate) fn uninit_range(&mut self, start: usize, end: usize) -> (&mut [MaybeUninit<T>], &A) {
        debug_assert!(start <= end && end <= self.header.capacity);
        let slots = unsafe {
            slice::from_raw_parts_mut(self.data.as_ptr().add(start).cast(), end - start)
        };
        (slots, &self.alloc)
    }

    /// Grow the allocation to exactly `capacity` slots. When the allocation
    /// fails, the buffer is left unchanged.
    pub(crate) fn grow(&mut self, capacity: usize) -> Result<(), StorageError> {
        if Self::IS_ZST || capacity <= self.header.capacity {
            return Ok(());
        }
        let new_layout = array_layout::<T>(capacity)?;
        let ptr = if self.is_allocated() {
            let old_layout = array_layout::<T>(self.header.capacity)?;
            unsafe {
                self.alloc
                    .grow(self.data.cast(), old_layout, new_layout)
                    .map_err(|_| StorageError::AllocError(new_layout))?
            }
        } else {
            self.alloc
                .allocate(new_layout)
                .map_err(|_| StorageError::AllocError(new_layout))?
        };
        storage_trace!(
            from = self.header.capacity,
            to = capacity,
            length = self.header.length,
            "grow buffer"
        );
        self.data = ptr.cast();
        self.header.capacity = capacity;
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }

    /// Shrink the allocation to exactly `capacity` slots, releasing it
    /// entirely for a capacity of zero. When the allocation fails, the
    /// buffer is left unchanged.
    pub(crate) fn shrink(&mut self, capacity: usize) -> Result<(), StorageError> {
        if Self::IS_ZST || capacity >= self.header.capacity {
            return Ok(());
        }
        debug_assert!(capacity >= self.header.length);
        let old_layout = array_layout::<T>(self.header.capacity)?;
        if capacity == 0 {
            storage_trace!(from = self.header.capacity, "release buffer");
            unsafe { self.alloc.deallocate(self.data.cast(), old_layout) };
            self.data = NonNull::dangling();
        } else {
            let new_layout = array_layout::<T>(capacity)?;
            let ptr = unsafe {
                self.alloc
                    .shrink(self.data.cast(), old_layout, new_layout)
                    .map_err(|_| StorageError::AllocError(new_layout))?
            };
            storage_trace!(
                from = self.header.capacity,
                to = capacity,
                length = self.header.length,
                "shrink buffer"
            );
            self.data = ptr.cast();
        }
        self.header.capacity = capacity;
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }

    #[inline]
    pub(crate) fn into_parts(self) -> (NonNull<T>, BufferHeader, A) {
        let slf = ManuallyDrop::new(self);
        (slf.data, slf.header, unsafe { ptr::read(&slf.alloc) })
    }

    /// # Safety
    /// `data` must be a block of `header.capacity` slots allocated by `alloc`
    /// (or dangling for a zero capacity), with `header.length` initialized values.
    #[inline]
    pub(crate) unsafe fn from_parts(data: NonNull<T>, header: BufferHeader, alloc: A) -> Self {
        let header = if Self::IS_ZST {
            BufferHeader {
                capacity: usize::MAX,
                length: header.length,
            }
        } else {
            header
        };
        Self {
            header,
            data,
            generation: 0,
            alloc,
            _marker: PhantomData,
        }
    }
}

impl<T, A: AllocatorDefault> ConstDefault for ArrayBuffer<T, A> {
    const DEFAULT: Self = Self::dangling(A::DEFAULT);
}

impl<T, A: Allocator + fmt::Debug> fmt::Debug for ArrayBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayBuffer")
            .field("header", &self.header)
            .field("data", &self.data)
            .field("generation", &self.generation)
            .field("alloc", &self.alloc)
            .finish()
    }
}

impl<T, A: Allocator> Drop for ArrayBuffer<T, A> {
    fn drop(&mut self) {
        if self.is_allocated() {
            if let Ok(layout) = array_layout::<T>(self.header.capacity) {
                unsafe { self.alloc.deallocate(self.data.cast(), layout) };
            }
        }
    }
}

#[cfg(feature = "zeroize")]
impl<T, A: AllocatorZeroizes> zeroize::ZeroizeOnDrop for ArrayBuffer<T, A> {}
