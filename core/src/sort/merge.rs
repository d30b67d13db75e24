//! Stable alternatives to the introspective sort: bottom-up merge sort and a
//! naive Timsort that insertion-sorts fixed runs before merging them.

use super::intro::insertion_sort;

/// Run length used by [`tim_sort`].
pub const RUN: usize = 16;

/// Merge the sorted halves `v[..mid]` and `v[mid..]`, taking from the left
/// half on ties.
fn merge<T, F>(v: &mut [T], mid: usize, lt: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    let left = v[..mid].to_vec();
    let right = v[mid..].to_vec();
    let (mut i, mut j, mut k) = (0, 0, 0);

    while i < left.len() && j < right.len() {
        if lt(&right[j], &left[i]) {
            v[k] = right[j].clone();
            j += 1;
        } else {
            v[k] = left[i].clone();
            i += 1;
        }
        k += 1;
    }
    for item in left[i..].iter().chain(&right[j..]) {
        v[k] = item.clone();
        k += 1;
    }
}

/// Merge adjacent sorted blocks of `width`, doubling until one block remains.
fn merge_passes<T, F>(v: &mut [T], mut width: usize, lt: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    let n = v.len();
    while width < n {
        let mut left = 0;
        while left < n {
            let mid = left + width;
            let right = (left + 2 * width).min(n);
            if mid < right {
                merge(&mut v[left..right], width, lt);
            }
            left += 2 * width;
        }
        width *= 2;
    }
}

/// Stable bottom-up merge sort.
pub fn merge_sort<T, F>(v: &mut [T], mut lt: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    merge_passes(v, 1, &mut lt);
}

/// Stable naive Timsort: insertion-sort runs of [`RUN`] elements, then merge
/// them bottom-up. No galloping or run detection.
pub fn tim_sort<T, F>(v: &mut [T], mut lt: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    for chunk in v.chunks_mut(RUN) {
        insertion_sort(chunk, &mut lt);
    }
    merge_passes(v, RUN, &mut lt);
}
