#![cfg(feature = "alloc")]

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use flex_vector::{
    alloc::{AllocError, Allocator, Global},
    vector, StorageError, Vector, VectorError,
};

/// Counts element lifecycles and refuses blocks beyond a byte limit.
#[derive(Debug, Default)]
struct TestAlloc {
    constructed: Cell<usize>,
    destroyed: Cell<usize>,
    allocations: Cell<usize>,
    limit: Cell<Option<usize>>,
}

impl TestAlloc {
    fn with_limit(limit: usize) -> Self {
        let alloc = Self::default();
        alloc.limit.set(Some(limit));
        alloc
    }

    fn live(&self) -> usize {
        self.constructed.get() - self.destroyed.get()
    }
}

unsafe impl Allocator for TestAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        if matches!(self.limit.get(), Some(limit) if layout.size() > limit) {
            return Err(AllocError);
        }
        self.allocations.set(self.allocations.get() + 1);
        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.allocations.set(self.allocations.get() - 1);
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

/// A value which panics when cloned after a countdown.
#[derive(Debug, PartialEq, PartialOrd)]
struct Fragile {
    value: u32,
    fuse: Rc<Cell<usize>>,
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        let remain = self.fuse.get();
        if remain == 0 {
            panic!("clone failed");
        }
        self.fuse.set(remain - 1);
        Self {
            value: self.value,
            fuse: self.fuse.clone(),
        }
    }
}

fn fragile(values: &[u32], fuse: &Rc<Cell<usize>>) -> Vec<Fragile> {
    values
        .iter()
        .map(|&value| Fragile {
            value,
            fuse: fuse.clone(),
        })
        .collect()
}

#[test]
fn lifecycle_balanced() {
    let alloc = TestAlloc::default();
    {
        let mut v = Vector::new_in(&alloc);
        for i in 0..10 {
            v.push(i.to_string());
        }
        v.insert(3, "x".to_string());
        v.erase(0);
        v.erase_range(2..5);
        v.insert_within(0, 1..3);
        v.replace_all(&"x".to_string(), "y".to_string());
        v.resize(12, "z".to_string());
        v.remove_duplicates();
        v.truncate(3);
        assert_eq!(alloc.live(), 3);
    }
    assert_eq!(alloc.live(), 0);
    assert_eq!(alloc.allocations.get(), 0);
}

#[test]
fn lifecycle_into_iter_drops_remainder() {
    let alloc = TestAlloc::default();
    let marker = Rc::new(());
    {
        let v = Vector::from_elem_in(marker.clone(), 4, &alloc);
        assert_eq!(Rc::strong_count(&marker), 5);
        let mut iter = v.into_iter();
        let first = iter.next();
        assert!(first.is_some());
        drop(iter);
        assert_eq!(Rc::strong_count(&marker), 2);
    }
    assert_eq!(Rc::strong_count(&marker), 1);
    assert_eq!(alloc.allocations.get(), 0);
}

#[test]
fn grow_failure_leaves_vector_unchanged() {
    let alloc = TestAlloc::with_limit(16);
    let mut v = Vector::<u32, _>::new_in(&alloc);
    v.extend_from_slice(&[1, 2, 3, 4]);
    assert_eq!(v.capacity(), 4);
    let ptr = v.as_ptr();

    let err = v.try_push(5).expect_err("allocation should fail");
    assert!(matches!(
        err.error(),
        VectorError::Storage(StorageError::AllocError(_))
    ));
    assert_eq!(err.into_value(), 5);
    assert_eq!(v, [1, 2, 3, 4]);
    assert_eq!(v.capacity(), 4);
    assert_eq!(v.as_ptr(), ptr);
    assert!(v.is_sorted());

    assert!(v.try_insert_slice(0, &[9]).is_err());
    assert!(v.try_insert_within(0, ..).is_err());
    assert!(v.try_resize(8, 0).is_err());
    assert!(v.try_ensure_capacity(5).is_err());
    assert_eq!(v, [1, 2, 3, 4]);
    assert!(v.is_sorted());
}

#[test]
fn staged_insert_failure_restores() {
    let alloc = TestAlloc::with_limit(16);
    let mut v = Vector::<u32, _>::new_in(&alloc);
    v.extend_from_slice(&[1, 2]);
    let res = v.try_insert_iter(0, (0..10).filter(|_| true));
    assert!(res.is_err());
    assert_eq!(v, [1, 2]);
    assert!(v.is_sorted());
}

#[test]
fn clone_panic_during_insert_keeps_vector_consistent() {
    let fuse = Rc::new(Cell::new(usize::MAX));
    let alloc = TestAlloc::default();
    let mut v = Vector::from_slice_in(&fragile(&[1, 2, 3, 4], &fuse), &alloc);
    let source = fragile(&[7, 8, 9], &fuse);
    fuse.set(1);

    let res = catch_unwind(AssertUnwindSafe(|| v.insert_slice(1, &source)));
    assert!(res.is_err());
    // the head survives, the shifted tail is dropped
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].value, 1);
    assert_eq!(alloc.live(), 1);

    fuse.set(usize::MAX);
    v.push(Fragile {
        value: 5,
        fuse: fuse.clone(),
    });
    assert_eq!(v.len(), 2);
    drop(v);
    assert_eq!(alloc.live(), 0);
    assert_eq!(alloc.allocations.get(), 0);
}

#[test]
fn clone_panic_during_self_insert_discards_staged() {
    let fuse = Rc::new(Cell::new(usize::MAX));
    let mut v = Vector::<Fragile>::from_slice(&fragile(&[1, 2, 3], &fuse));
    fuse.set(2);
    let res = catch_unwind(AssertUnwindSafe(|| v.insert_within(0, ..)));
    assert!(res.is_err());
    assert_eq!(v.len(), 3);
    assert_eq!(v[2].value, 3);
    assert_eq!(Rc::strong_count(&fuse), 4);
}

#[test]
fn drop_panic_still_releases() {
    struct Bomb<'a>(bool, &'a Cell<usize>);

    impl Drop for Bomb<'_> {
        fn drop(&mut self) {
            self.1.set(self.1.get() + 1);
            if self.0 {
                panic!("bomb");
            }
        }
    }

    impl PartialEq for Bomb<'_> {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }

    impl PartialOrd for Bomb<'_> {
        fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
            self.0.partial_cmp(&other.0)
        }
    }

    let dropped = Cell::new(0);
    let alloc = TestAlloc::default();
    let mut v = Vector::new_in(&alloc);
    v.push(Bomb(false, &dropped));
    v.push(Bomb(true, &dropped));
    v.push(Bomb(false, &dropped));
    let res = catch_unwind(AssertUnwindSafe(move || drop(v)));
    assert!(res.is_err());
    assert_eq!(dropped.get(), 3);
    assert_eq!(alloc.live(), 0);
    assert_eq!(alloc.allocations.get(), 0);
}

#[test]
fn drop_panic_during_replace_drops_once() {
    #[derive(Debug, PartialOrd)]
    struct Bomb<'a> {
        id: u32,
        armed: bool,
        dropped: &'a Cell<usize>,
    }

    impl Clone for Bomb<'_> {
        fn clone(&self) -> Self {
            Self {
                id: self.id,
                armed: false,
                dropped: self.dropped,
            }
        }
    }

    impl Drop for Bomb<'_> {
        fn drop(&mut self) {
            self.dropped.set(self.dropped.get() + 1);
            if self.armed {
                panic!("bomb");
            }
        }
    }

    impl PartialEq for Bomb<'_> {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    let dropped = Cell::new(0);
    let bomb = |id, armed| Bomb {
        id,
        armed,
        dropped: &dropped,
    };
    let alloc = TestAlloc::default();
    let mut v = Vector::new_in(&alloc);
    v.push(bomb(2, false));
    v.push(bomb(1, true));
    v.push(bomb(3, false));
    let old = bomb(1, false);
    let new = bomb(4, false);

    let res = catch_unwind(AssertUnwindSafe(|| v.replace_all(&old, new)));
    assert!(res.is_err());
    // the armed value and the clone and source of the replacement
    assert_eq!(dropped.get(), 3);
    assert_eq!(v.len(), 2);
    assert_eq!(v[0].id, 2);
    assert_eq!(v[1].id, 3);

    drop(v);
    drop(old);
    assert_eq!(dropped.get(), 6);
    assert_eq!(alloc.live(), 0);
    assert_eq!(alloc.allocations.get(), 0);
}

#[test]
fn moved_out_values_skip_destroy() {
    let alloc = TestAlloc::default();
    let mut v = Vector::<u32, _>::new_in(&alloc);
    v.push(1);
    v.push(2);
    assert_eq!(v.pop(), Some(2));
    assert_eq!(v.remove(0), 1);
    assert_eq!(alloc.constructed.get(), 2);
    assert_eq!(alloc.destroyed.get(), 0);
    assert_eq!(alloc.live(), 2);

    v.extend_from_slice(&[3, 4]);
    let taken: Vec<u32> = v.into_iter().collect();
    assert_eq!(taken, [3, 4]);
    assert_eq!(alloc.constructed.get(), 4);
    assert_eq!(alloc.destroyed.get(), 0);
    assert_eq!(alloc.allocations.get(), 0);
}

#[test]
fn take_and_clear_release() {
    let alloc = TestAlloc::default();
    let mut v = Vector::from_slice_in(&[1u8, 2, 3], &alloc);
    let w = v.take();
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 0);
    assert_eq!(w, [1, 2, 3]);
    drop(w);
    assert_eq!(alloc.allocations.get(), 0);

    let mut v = vector![in &alloc; 1u8, 2, 3];
    v.clear();
    assert_eq!(alloc.allocations.get(), 1);
    v.shrink_to_fit();
    assert_eq!(alloc.allocations.get(), 0);
}
