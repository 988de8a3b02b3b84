//! In-place ascending sorts over slices, ordered by `PartialOrd::lt`.
//!
//! Both sorts only swap elements, so an inconsistent ordering produces an
//! unspecified permutation but never loses or duplicates an element.

use core::mem;

/// Slices at or below this length are finished with an insertion sort.
const INSERTION_THRESHOLD: usize = 16;

/// Introspective sort: median-of-three quicksort which falls back to
/// heapsort once the recursion depth reaches `2 * log2(len)`.
pub(crate) fn introsort<T: PartialOrd>(v: &mut [T]) {
    if v.len() < 2 {
        return;
    }
    quicksort(v, 2 * log2(v.len()));
}

/// Adjacent-swap bubble sort, stopping early after a pass without swaps.
pub(crate) fn bubble_sort<T: PartialOrd>(v: &mut [T]) {
    let mut end = v.len();
    while end > 1 {
        let mut last_swap = 0;
        for i in 1..end {
            if v[i] < v[i - 1] {
                v.swap(i, i - 1);
                last_swap = i;
            }
        }
        end = last_swap;
    }
}

#[inline]
fn log2(n: usize) -> usize {
    (usize::BITS - 1 - n.leading_zeros()) as usize
}

fn quicksort<T: PartialOrd>(mut v: &mut [T], mut limit: usize) {
    loop {
        let len = v.len();
        if len <= INSERTION_THRESHOLD {
            insertion_sort(v);
            return;
        }
        if limit == 0 {
            heapsort(v);
            return;
        }
        limit -= 1;

        let pivot = median_of_three(v, 0, len / 2, len - 1);
        v.swap(0, pivot);
        let mid = partition(v);

        // recurse into the shorter side, loop over the longer one
        let (left, right) = mem::take(&mut v).split_at_mut(mid);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quicksort(left, limit);
            v = right;
        } else {
            quicksort(right, limit);
            v = left;
        }
    }
}

/// Partition around the pivot held at index 0, returning its final index.
fn partition<T: PartialOrd>(v: &mut [T]) -> usize {
    let mut store = 1;
    for i in 1..v.len() {
        if v[i] < v[0] {
            v.swap(i, store);
            store += 1;
        }
    }
    v.swap(0, store - 1);
    store - 1
}

fn median_of_three<T: PartialOrd>(v: &[T], a: usize, b: usize, c: usize) -> usize {
    if v[a] < v[b] {
        if v[b] < v[c] {
            b
        } else if v[a] < v[c] {
            c
        } else {
            a
        }
    } else if v[a] < v[c] {
        a
    } else if v[b] < v[c] {
        c
    } else {
        b
    }
}

fn insertion_sort<T: PartialOrd>(v: &mut [T]) {
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && v[j] < v[j - 1] {
            v.swap(j, j - 1);
            j -= 1;
        }
    }
}

fn heapsort<T: PartialOrd>(v: &mut [T]) {
    let len = v.len();
    for start in (0..len / 2).rev() {
        sift_down(v, start, len);
    }
    for end in (1..len).rev() {
        v.swap(0, end);
        sift_down(v, 0, end);
    }
}

fn sift_down<T: PartialOrd>(v: &mut [T], mut root: usize, end: usize) {
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            break;
        }
        if child + 1 < end && v[child] < v[child + 1] {
            child += 1;
        }
        if !(v[root] < v[child]) {
            break;
        }
        v.swap(root, child);
        root = child;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::vec::Vec;

    fn random_values(count: usize, max: i32, seed: u64) -> Vec<i32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count).map(|_| rng.gen_range(0..max)).collect()
    }

    fn check(mut values: Vec<i32>, sort: fn(&mut [i32])) {
        let mut expected = values.clone();
        expected.sort();
        sort(&mut values);
        assert_eq!(values, expected);
    }

    #[test]
    fn introsort_random() {
        for (count, seed) in [(0, 1), (1, 2), (15, 3), (17, 4), (100, 5), (5000, 6)] {
            check(random_values(count, 1000, seed), introsort);
        }
    }

    #[test]
    fn introsort_many_duplicates() {
        check(random_values(2000, 3, 7), introsort);
    }

    #[test]
    fn introsort_presorted() {
        check((0..500).collect(), introsort);
        check((0..500).rev().collect(), introsort);
    }

    #[test]
    fn depth_limit_uses_heapsort() {
        let mut values = random_values(200, 50, 8);
        let mut expected = values.clone();
        expected.sort();
        quicksort(&mut values, 0);
        assert_eq!(values, expected);
    }

    #[test]
    fn heapsort_alone() {
        check(random_values(333, 100, 9), heapsort);
    }

    #[test]
    fn bubble_sort_random() {
        for (count, seed) in [(0, 10), (1, 11), (2, 12), (64, 13)] {
            check(random_values(count, 20, seed), bubble_sort);
        }
    }

    #[test]
    fn median_selection() {
        assert_eq!(median_of_three(&[1, 2, 3], 0, 1, 2), 1);
        assert_eq!(median_of_three(&[3, 1, 2], 0, 1, 2), 2);
        assert_eq!(median_of_three(&[2, 3, 1], 0, 1, 2), 0);
        assert_eq!(median_of_three(&[5, 5, 5], 0, 1, 2), 1);
    }

    #[test]
    fn log2_floor() {
        assert_eq!(log2(1), 0);
        assert_eq!(log2(2), 1);
        assert_eq!(log2(1023), 9);
        assert_eq!(log2(1024), 10);
    }

    #[test]
    fn floats_with_nan_keep_elements() {
        let mut values = [3.0, f64::NAN, 1.0, 2.0, f64::NAN, 0.5];
        introsort(&mut values);
        assert_eq!(values.iter().filter(|v| v.is_nan()).count(), 2);
        let mut finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        finite.sort_by(|a, b| a.partial_cmp(b).expect("finite"));
        assert_eq!(finite, [0.5, 1.0, 2.0, 3.0]);
    }
}
