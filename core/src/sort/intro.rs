//! Introspective sort: median-of-three quicksort that falls back to heap sort
//! once its depth budget runs out and finishes short ranges with insertion sort.

/// Ranges at or below this length are finished with insertion sort.
pub const INSERTION_THRESHOLD: usize = 16;

/// Counters collected during one [`introsort_with_stats`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntroStats {
    pub comparisons: usize,
    pub partitions: usize,
    pub heap_fallbacks: usize,
    pub insertion_runs: usize,
}

/// Initial depth budget, `2 * round(log2(n))`.
pub fn depth_budget(len: usize) -> usize {
    if len < 2 {
        return 0;
    }
    2 * (len as f64).log2().round() as usize
}

/// Sort `v` ascending under the strict less-than `lt`.
///
/// Not stable. `lt` must be a strict weak ordering; if it is not, the result
/// is some permutation of the input in unspecified order.
pub fn introsort<T, F>(v: &mut [T], lt: F)
where
    F: FnMut(&T, &T) -> bool,
{
    introsort_with_stats(v, lt);
}

pub fn introsort_with_stats<T, F>(v: &mut [T], mut lt: F) -> IntroStats
where
    F: FnMut(&T, &T) -> bool,
{
    let mut stats = IntroStats::default();
    if v.len() < 2 {
        return stats;
    }
    let mut comparisons = 0usize;
    let mut counted = |a: &T, b: &T| {
        comparisons += 1;
        lt(a, b)
    };
    sort_range(v, &mut counted, depth_budget(v.len()), &mut stats);
    stats.comparisons = comparisons;
    stats
}

fn sort_range<T, F>(v: &mut [T], lt: &mut F, depth: usize, stats: &mut IntroStats)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len <= INSERTION_THRESHOLD {
        stats.insertion_runs += 1;
        insertion_sort(v, lt);
        return;
    }
    if depth == 0 {
        stats.heap_fallbacks += 1;
        heap_sort(v, lt);
        return;
    }

    stats.partitions += 1;
    let last = len - 1;
    let pivot = median_of_three(v, 0, len / 2, last, lt);
    v.swap(pivot, last);
    let mid = partition(v, lt);

    let (left, right) = v.split_at_mut(mid);
    sort_range(left, lt, depth - 1, stats);
    sort_range(&mut right[1..], lt, depth - 1, stats);
}

/// Index of the median of `v[a]`, `v[b]`, `v[c]`.
fn median_of_three<T, F>(v: &[T], a: usize, b: usize, c: usize, lt: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let (x, y, z) = (&v[a], &v[b], &v[c]);
    if lt(x, y) {
        if lt(y, z) {
            b
        } else if lt(x, z) {
            c
        } else {
            a
        }
    } else if lt(x, z) {
        a
    } else if lt(y, z) {
        c
    } else {
        b
    }
}

/// Lomuto partition around the last element; returns the pivot's final index.
fn partition<T, F>(v: &mut [T], lt: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let last = v.len() - 1;
    let mut store = 0;
    for j in 0..last {
        if lt(&v[j], &v[last]) {
            v.swap(store, j);
            store += 1;
        }
    }
    v.swap(store, last);
    store
}

/// Stable insertion sort.
pub fn insertion_sort<T, F>(v: &mut [T], lt: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && lt(&v[j], &v[j - 1]) {
            v.swap(j, j - 1);
            j -= 1;
        }
    }
}

pub fn heap_sort<T, F>(v: &mut [T], lt: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    for node in (0..len / 2).rev() {
        sift_down(v, node, len, lt);
    }
    for end in (1..len).rev() {
        v.swap(0, end);
        sift_down(v, 0, end, lt);
    }
}

fn sift_down<T, F>(v: &mut [T], mut node: usize, end: usize, lt: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    loop {
        let mut child = 2 * node + 1;
        if child >= end {
            break;
        }
        if child + 1 < end && lt(&v[child], &v[child + 1]) {
            child += 1;
        }
        if !lt(&v[node], &v[child]) {
            break;
        }
        v.swap(node, child);
        node = child;
    }
}
