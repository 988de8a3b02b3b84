//! Construction and destruction of elements in place, routed through the
//! allocator so that custom allocators may observe element lifecycles.
//! Values moved out of a block are not destroyed here.

use core::ptr::NonNull;

use crate::alloc::Allocator;

/// Construct `value` in the uninitialized `slot`.
///
/// # Safety
/// `slot` must be non-null, aligned, valid for writes and not hold a live value.
#[inline]
pub(crate) unsafe fn construct_at<T, A: Allocator>(alloc: &A, slot: *mut T, value: T) {
    alloc.construct(NonNull::new_unchecked(slot), value)
}

/// Destroy the live value held by `slot`.
///
/// # Safety
/// `slot` must be non-null and hold a live value, which is not accessed again.
#[inline]
pub(crate) unsafe fn destroy_at<T, A: Allocator>(alloc: &A, slot: *mut T) {
    alloc.destroy(NonNull::new_unchecked(slot))
}

/// Destroy `count` consecutive live values starting at `first`. A panicking
/// destructor does not prevent the remaining values from being destroyed.
///
/// # Safety
/// Every slot in `first..first + count` must hold a live value, none of which
/// are accessed again.
pub(crate) unsafe fn destroy_range<T, A: Allocator>(alloc: &A, first: *mut T, count: usize) {
    let mut guard = DestroyRange {
        alloc,
        first,
        pos: 0,
        count,
    };
    guard.run();
}

struct DestroyRange<'a, T, A: Allocator> {
    alloc: &'a A,
    first: *mut T,
    pos: usize,
    count: usize,
}

impl<T, A: Allocator> DestroyRange<'_, T, A> {
    #[inline]
    fn run(&mut self) {
        while self.pos < self.count {
            let slot = unsafe { self.first.add(self.pos) };
            self.pos += 1;
            unsafe { destroy_at(self.alloc, slot) };
        }
    }
}

impl<T, A: Allocator> Drop for DestroyRange<'_, T, A> {
    fn drop(&mut self) {
        // only reached with remaining slots when a destructor panicked
        self.run();
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use core::alloc::Layout;
    use core::cell::Cell;
    use core::mem::MaybeUninit;
    use core::ptr::NonNull;
    use std::rc::Rc;

    use super::*;
    use crate::alloc::{AllocError, Global};

    #[derive(Default)]
    struct Counting {
        constructed: Cell<usize>,
        destroyed: Cell<usize>,
    }

    unsafe impl Allocator for Counting {
        fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
            Global.allocate(layout)
        }

        unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
            Global.deallocate(ptr, layout)
        }

        unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
            self.constructed.set(self.constructed.get() + 1);
            slot.as_ptr().write(value);
        }

        unsafe fn destroy<T>(&self, slot: NonNull<T>) {
            self.destroyed.set(self.destroyed.get() + 1);
            core::ptr::drop_in_place(slot.as_ptr());
        }
    }

    #[test]
    fn construct_and_destroy_through_allocator() {
        let alloc = Counting::default();
        let marker = Rc::new(());
        let mut slots = [MaybeUninit::<Rc<()>>::uninit(), MaybeUninit::uninit()];
        unsafe {
            construct_at(&alloc, slots[0].as_mut_ptr(), marker.clone());
            construct_at(&alloc, slots[1].as_mut_ptr(), marker.clone());
        }
        assert_eq!(Rc::strong_count(&marker), 3);
        unsafe { destroy_range(&alloc, slots.as_mut_ptr().cast::<Rc<()>>(), 2) };
        assert_eq!(Rc::strong_count(&marker), 1);
        assert_eq!(alloc.constructed.get(), 2);
        assert_eq!(alloc.destroyed.get(), 2);
    }

    #[test]
    fn destroy_range_continues_after_panic() {
        struct Bomb<'a>(bool, &'a Cell<usize>);

        impl Drop for Bomb<'_> {
            fn drop(&mut self) {
                self.1.set(self.1.get() + 1);
                if self.0 {
                    panic!("bomb");
                }
            }
        }

        let dropped = Cell::new(0);
        let mut items = [
            MaybeUninit::new(Bomb(false, &dropped)),
            MaybeUninit::new(Bomb(true, &dropped)),
            MaybeUninit::new(Bomb(false, &dropped)),
        ];
        let first = items.as_mut_ptr().cast::<Bomb<'_>>();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| unsafe {
            destroy_range(&Global, first, 3)
        }));
        assert!(res.is_err());
        assert_eq!(dropped.get(), 3);
    }
}
