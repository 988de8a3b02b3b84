/// Create a [`Vector`](crate::Vector) from a list of elements or a repeated
/// element, optionally in a given allocator.
///
/// ```
/// use flex_vector::{alloc::Global, vector, Vector};
///
/// let v: Vector<u32> = vector![1, 2, 3];
/// assert!(v.is_sorted());
/// let w = vector![in Global; 7u8; 4];
/// assert_eq!(w, [7, 7, 7, 7]);
/// ```
#[macro_export]
macro_rules! vector {
    (in $alloc:expr $(;)?) => (
        $crate::vector::Vector::new_in($alloc)
    );
    (in $alloc:expr; $elem:expr; $n:expr) => (
        $crate::vector::from_elem_in($elem, $n, $alloc)
    );
    (in $alloc:expr; $($x:expr),+ $(,)?) => (
        $crate::vector::from_array_in([$($x),+], $alloc)
    );
    () => (
        $crate::vector::Vector::new()
    );
    ($elem:expr; $n:expr) => (
        $crate::vector::from_elem($elem, $n)
    );
    ($($x:expr),+ $(,)?) => (
        $crate::vector::from_array([$($x),+])
    );
}
