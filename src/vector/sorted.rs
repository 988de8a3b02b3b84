/// Cached knowledge about the order of a vector's elements. `Sorted` is only
/// ever reported when no element is less than its predecessor; `Unsorted`
/// means the order is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum SortState {
    #[default]
    Sorted,
    Unsorted,
}

impl SortState {
    /// The state of a sequence of `len` elements whose order is unknown.
    #[inline]
    pub const fn unknown(len: usize) -> Self {
        if len <= 1 {
            Self::Sorted
        } else {
            Self::Unsorted
        }
    }

    /// Verify the order of `items` in a single pass.
    #[inline]
    pub fn verify<T: PartialOrd>(items: &[T]) -> Self {
        if is_non_decreasing(items) {
            Self::Sorted
        } else {
            Self::Unsorted
        }
    }

    #[inline]
    pub const fn is_sorted(self) -> bool {
        matches!(self, Self::Sorted)
    }

    /// The state after `value` is appended behind `tail`.
    #[inline]
    pub fn after_append<T: PartialOrd>(self, tail: Option<&T>, value: &T) -> Self {
        match (self, tail) {
            (Self::Sorted, None) => Self::Sorted,
            (Self::Sorted, Some(tail)) if !(value < tail) => Self::Sorted,
            _ => Self::Unsorted,
        }
    }

    /// The state after appending every item of `values` behind `tail`.
    #[inline]
    pub fn after_extend<T: PartialOrd>(self, tail: Option<&T>, values: &[T]) -> Self {
        values
            .iter()
            .fold((self, tail), |(state, tail), value| {
                (state.after_append(tail, value), Some(value))
            })
            .0
    }

    /// The state after the sequence is cut down to `len` elements.
    #[inline]
    pub const fn after_truncate(self, len: usize) -> Self {
        if len <= 1 {
            Self::Sorted
        } else {
            self
        }
    }
}

#[inline]
pub(crate) fn is_non_decreasing<T: PartialOrd>(items: &[T]) -> bool {
    items.windows(2).all(|pair| !(pair[1] < pair[0]))
}
