#![cfg(all(feature = "alloc", feature = "zeroize"))]

use core::alloc::Layout;
use core::cell::RefCell;
use core::ptr::NonNull;
use core::slice;

use flex_vector::{
    alloc::{AllocError, Allocator, Global, ZeroizingAlloc},
    vector::ZeroizingVector,
    Vector,
};
use zeroize::Zeroize;

/// Records the contents of every block at the moment it is released.
#[derive(Debug, Default)]
struct TestAlloc {
    released: RefCell<Vec<Vec<u8>>>,
}

impl TestAlloc {
    fn log(&self) -> Vec<Vec<u8>> {
        self.released.borrow().clone()
    }
}

unsafe impl Allocator for TestAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let cp = Vec::from(unsafe { slice::from_raw_parts(ptr.as_ptr(), layout.size()) });
        self.released.borrow_mut().push(cp);
        Global.deallocate(ptr, layout)
    }
}

#[test]
fn test_alloc_log() {
    // check functioning of alloc log
    let alloc = TestAlloc::default();
    let v = Vector::from_slice_in(&[99u32], &alloc);
    drop(v);
    assert_eq!(alloc.log(), &[99u32.to_ne_bytes()]);
}

#[test]
fn vector_zeroize_on_release() {
    let alloc = TestAlloc::default();
    let v = Vector::from_slice_in(&[99u32], ZeroizingAlloc(&alloc));
    drop(v);
    assert_eq!(alloc.log(), &[&[0, 0, 0, 0]]);
}

#[test]
fn vector_zeroize_on_growth() {
    let alloc = TestAlloc::default();
    let mut v = Vector::<u16, _>::new_in(ZeroizingAlloc(&alloc));
    v.push(1);
    v.push(2);
    assert_eq!(v.capacity(), 2);
    // the single-slot block was released on growth
    assert_eq!(alloc.log(), &[vec![0u8; 2]]);
    v.truncate(0);
    v.adjust_capacity();
    assert_eq!(v.capacity(), 0);
    assert_eq!(alloc.log(), &[vec![0u8; 2], vec![0u8; 4]]);
}

#[test]
fn vector_zeroize_trait() {
    let alloc = TestAlloc::default();
    let mut v = Vector::<u8, _>::new_in(ZeroizingAlloc(&alloc));
    v.extend_from_slice(b"secret");
    v.zeroize();
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 0);
    assert_eq!(alloc.log(), &[vec![0u8; 6]]);
}

#[test]
fn zeroizing_vector_alias() {
    let mut v = ZeroizingVector::new();
    v.extend([1, 2, 3]);
    assert_eq!(v, [1, 2, 3]);
    assert!(v.is_sorted());
}
