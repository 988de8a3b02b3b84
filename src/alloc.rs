//! Support for memory allocation and element lifecycle.

use core::alloc::Layout;
use core::fmt;
use core::ptr::{self, NonNull};
#[cfg(feature = "zeroize")]
use core::slice;

#[cfg(feature = "alloc")]
use alloc_crate::alloc::{alloc as raw_alloc, dealloc as raw_dealloc};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

#[cfg(all(not(test), feature = "alloc"))]
pub use alloc_crate::alloc::handle_alloc_error;

#[cfg(any(test, not(feature = "alloc")))]
/// Custom allocation error handler.
pub fn handle_alloc_error(layout: Layout) -> ! {
    panic!("memory allocation of {} bytes failed", layout.size());
}

#[cfg(feature = "alloc")]
#[inline]
pub(crate) fn layout_dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: layout alignments are guaranteed to be non-zero.
    unsafe { NonNull::new_unchecked(layout.align() as *mut u8) }
}

/// The AllocError error indicates an allocation failure that may be due to
/// resource exhaustion or to something wrong when combining the given input
/// arguments with this allocator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AllocError {}

/// An implementation of Allocator can allocate, grow, shrink, and deallocate
/// arbitrary blocks of data described via `Layout`. It is also responsible
/// for the lifecycle of the elements placed in those blocks: every element
/// stored by a [`Vector`](crate::Vector) is constructed through
/// [`construct`](Allocator::construct), and every element dropped in place
/// is destroyed through [`destroy`](Allocator::destroy). A value moved out
/// of the vector (by `pop`, `remove`, `into_iter` or `append`) leaves the
/// block without a call to `destroy`, and is dropped by its new owner.
///
/// Allocator is designed to be implemented on ZSTs, references, or smart
/// pointers because having an allocator like `MyAlloc([u8; N])` cannot be
/// moved, without updating the pointers to the allocated memory.
///
/// # Currently allocated memory
/// Some of the methods require that a memory block be currently allocated via
/// an allocator. This means that:
/// - The starting address for that memory block was previously returned by
///   `allocate`, `grow`, or `shrink`, and
/// - The memory block has not been subsequently deallocated, where blocks are
///   either deallocated directly by being passed to deallocate or were changed
///   by being passed to `grow` or `shrink` that returns `Ok`. If `grow` or
///   `shrink` have returned `Err`, the passed pointer remains valid.
///
/// # Safety
/// - Memory blocks returned from an allocator must point to valid memory and retain
///   their validity until the instance and all of its clones are dropped,
/// - Cloning or moving the allocator must not invalidate memory blocks returned from
///   this allocator. A cloned allocator must behave like the same allocator, and
/// - `construct` must leave the slot initialized with the provided value and
///   `destroy` must leave it uninitialized.
pub unsafe trait Allocator {
    /// Try to allocate a slice of memory within this allocator instance,
    /// returning the new allocation.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Release an allocation produced by this allocator.
    ///
    /// # Safety
    /// The value `ptr` must represent an allocation produced by this allocator, otherwise
    /// a memory access error may occur. The value `layout` must correspond to the
    /// layout produced by the previous allocation.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Try to allocate a slice of memory within this allocator instance,
    /// returning the new allocation. The memory will be initialized with zeroes.
    #[inline]
    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let ptr = self.allocate(layout)?;
        // SAFETY: the result of `allocate` must be properly aligned
        unsafe { ptr::write_bytes(ptr.cast::<u8>().as_ptr(), 0, ptr.len()) };
        Ok(ptr)
    }

    /// Try to extend the size of an allocation to accomodate a new, larger layout.
    ///
    /// On failure the original allocation is left untouched.
    ///
    /// # Safety
    /// `ptr` must be currently allocated by this allocator using `old_layout`.
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() >= old_layout.size(),
            "`new_layout.size()` must be greater than or equal to `old_layout.size()`"
        );

        let new_ptr = self.allocate(new_layout)?;
        let cp_len = old_layout.size().min(new_ptr.len());
        if cp_len > 0 {
            ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr().cast(), cp_len);
        }
        self.deallocate(ptr, old_layout);
        Ok(new_ptr)
    }

    /// Try to reduce the size of an allocation to accomodate a new, smaller layout.
    ///
    /// On failure the original allocation is left untouched.
    ///
    /// # Safety
    /// `ptr` must be currently allocated by this allocator using `old_layout`.
    unsafe fn shrink(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() <= old_layout.size(),
            "`new_layout.size()` must be smaller than or equal to `old_layout.size()`"
        );

        let new_ptr = self.allocate(new_layout)?;
        let cp_len = new_layout.size().min(new_ptr.len());
        if cp_len > 0 {
            ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr().cast(), cp_len);
        }
        self.deallocate(ptr, old_layout);
        Ok(new_ptr)
    }

    /// Place `value` into the uninitialized `slot`.
    ///
    /// # Safety
    /// `slot` must be valid for writes, properly aligned and must not hold
    /// a live value.
    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        slot.as_ptr().write(value);
    }

    /// Run the destructor of the value held by `slot`, leaving it uninitialized.
    ///
    /// # Safety
    /// `slot` must hold a live value which is not accessed again until it
    /// has been reconstructed.
    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        ptr::drop_in_place(slot.as_ptr());
    }

    /// Obtain a reference to this allocator type.
    #[inline(always)]
    fn by_ref(&self) -> &Self
    where
        Self: Sized,
    {
        self
    }
}

unsafe impl<A: Allocator> Allocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }

    #[inline]
    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        (**self).allocate_zeroed(layout)
    }

    #[inline]
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        (**self).grow(ptr, old_layout, new_layout)
    }

    #[inline]
    unsafe fn shrink(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        (**self).shrink(ptr, old_layout, new_layout)
    }

    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        (**self).construct(slot, value)
    }

    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        (**self).destroy(slot)
    }
}

/// A trait implemented by allocators supporting a constant initializer.
/// This cannot use ConstDefault as it is not implemented for the external
/// `Global` allocator.
pub trait AllocatorDefault: Allocator + Clone + Default {
    /// The constant initializer for this allocator.
    const DEFAULT: Self;
}

/// A marker trait for allocators which zeroize on deallocation.
pub trait AllocatorZeroizes: Allocator {}

/// The global memory allocator.
///
/// When the `alloc` feature is enabled, this type implements the `Allocator`
/// trait by forwarding calls to the allocator registered with the
/// `#[global_allocator]` attribute if there is one, or the `std` crate's default.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "alloc", derive(Default, Copy))]
pub struct Global;

#[cfg(feature = "alloc")]
unsafe impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let ptr = if layout.size() == 0 {
            layout_dangling(layout)
        } else {
            let Some(ptr) = NonNull::new(unsafe { raw_alloc(layout) }) else {
                return Err(AllocError);
            };
            ptr
        };
        Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() > 0 {
            raw_dealloc(ptr.as_ptr(), layout);
        }
    }
}

#[cfg(not(feature = "alloc"))]
// Stub implementation to allow Global as the default allocator type
// even when the `alloc` feature is not enabled. Any usage as an allocator
// will result in a panic.
unsafe impl Allocator for Global {
    fn allocate(&self, _layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        unimplemented!();
    }

    unsafe fn deallocate(&self, _ptr: NonNull<u8>, _layout: Layout) {
        unimplemented!();
    }
}

#[cfg(feature = "alloc")]
impl AllocatorDefault for Global {
    const DEFAULT: Self = Global;
}

#[cfg(feature = "zeroize")]
/// An allocator which allocates via `A` and zeroizes all buffers when they are released.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroizingAlloc<A>(pub A);

#[cfg(feature = "zeroize")]
unsafe impl<A: Allocator> Allocator for ZeroizingAlloc<A> {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        self.0.allocate(layout)
    }

    // The default implementations of `grow` and `shrink` always allocate a new
    // buffer and release the old one, allowing it to be zeroized below.

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() > 0 {
            let mem = slice::from_raw_parts_mut(ptr.as_ptr(), layout.size());
            mem.zeroize();
        }
        self.0.deallocate(ptr, layout)
    }

    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        self.0.construct(slot, value)
    }

    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        self.0.destroy(slot)
    }
}

#[cfg(feature = "zeroize")]
impl<A: AllocatorDefault> AllocatorDefault for ZeroizingAlloc<A> {
    const DEFAULT: Self = ZeroizingAlloc(A::DEFAULT);
}

#[cfg(feature = "zeroize")]
impl<A: Allocator> AllocatorZeroizes for ZeroizingAlloc<A> {}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use core::alloc::Layout;

    use super::{Allocator, Global};

    #[test]
    fn global_zero_sized_is_aligned() {
        let layout = Layout::from_size_align(0, 16).expect("valid layout");
        let ptr = Global.allocate(layout).expect("zero-sized allocation");
        assert_eq!(ptr.len(), 0);
        assert_eq!(ptr.cast::<u8>().as_ptr() as usize % 16, 0);
        unsafe { Global.deallocate(ptr.cast(), layout) };
    }

    #[test]
    fn default_grow_preserves_contents() {
        let old = Layout::array::<u32>(2).expect("valid layout");
        let new = Layout::array::<u32>(4).expect("valid layout");
        let ptr = Global.allocate(old).expect("allocation").cast::<u32>();
        unsafe {
            ptr.as_ptr().write(7);
            ptr.as_ptr().add(1).write(9);
            let grown = Global.grow(ptr.cast(), old, new).expect("grow");
            let data = grown.cast::<u32>().as_ptr();
            assert_eq!((*data, *data.add(1)), (7, 9));
            Global.deallocate(grown.cast(), new);
        }
    }
}
