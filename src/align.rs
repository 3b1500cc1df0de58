//! Index alignment primitives.
//!
//! All functions here assume strictly ascending inputs. Duplicate or
//! unordered values do not panic but produce unspecified pairings.

use tracing::trace;

/// Merge-join over two ascending sequences.
///
/// Returns `(pos_a, pos_b)` for every value present in both, in ascending
/// order of both positions. Runs in `O(a + b)`.
pub fn intersection_map<T: Ord>(a: &[T], b: &[T]) -> Vec<(usize, usize)> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if b[j] < a[i] {
            j += 1;
        } else {
            result.push((i, j));
            i += 1;
            j += 1;
        }
    }

    trace!(
        lhs_len = a.len(),
        rhs_len = b.len(),
        matched = result.len(),
        "intersection_map"
    );
    result
}

/// Positions of the last element of each run of equal consecutive keys.
///
/// The final element is always a break. An empty input has no breaks.
pub fn breaks<K: PartialEq>(keys: &[K]) -> Vec<usize> {
    let mut result = Vec::new();
    if keys.is_empty() {
        return result;
    }

    for (pos, pair) in keys.windows(2).enumerate() {
        if pair[0] != pair[1] {
            result.push(pos);
        }
    }
    result.push(keys.len() - 1);
    result
}

/// Row correspondence between an index and another index that contains it.
///
/// `arg1()[k]` is a position in the old index and `arg2()[k]` is the position
/// holding the same value in the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpecifier {
    arg1: Vec<usize>,
    arg2: Vec<usize>,
}

impl RangeSpecifier {
    /// Pairs each value `old` shares with `new` with its position in both.
    pub fn new<T: Ord>(old: &[T], new: &[T]) -> Self {
        let (arg1, arg2) = intersection_map(old, new).into_iter().unzip();
        RangeSpecifier { arg1, arg2 }
    }

    /// Positions in the old index.
    pub fn arg1(&self) -> &[usize] {
        &self.arg1
    }

    /// Matching positions in the new index.
    pub fn arg2(&self) -> &[usize] {
        &self.arg2
    }

    /// Returns the number of matched rows.
    pub fn len(&self) -> usize {
        self.arg1.len()
    }

    /// Whether no rows matched.
    pub fn is_empty(&self) -> bool {
        self.arg1.is_empty()
    }

    /// Iterates `(old_position, new_position)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.arg1.iter().copied().zip(self.arg2.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_map_matches_equal_values() {
        let a = [1, 3, 5, 7, 9];
        let b = [3, 4, 5, 9, 11];
        let pairs = intersection_map(&a, &b);
        assert_eq!(pairs, vec![(1, 0), (2, 2), (4, 3)]);
        for (i, j) in &pairs {
            assert_eq!(a[*i], b[*j]);
        }
    }

    #[test]
    fn intersection_map_disjoint_and_empty() {
        assert!(intersection_map(&[1, 2, 3], &[4, 5]).is_empty());
        assert!(intersection_map::<i32>(&[], &[1, 2]).is_empty());
        assert!(intersection_map::<i32>(&[], &[]).is_empty());
    }

    #[test]
    fn intersection_map_is_strictly_ascending_and_bounded() {
        let a: Vec<i64> = (0..200).map(|v| v * 3).collect();
        let b: Vec<i64> = (0..150).map(|v| v * 4 + 1).collect();
        let pairs = intersection_map(&a, &b);
        assert!(pairs.len() <= a.len().min(b.len()));
        for w in pairs.windows(2) {
            assert!(w[0].0 < w[1].0);
            assert!(w[0].1 < w[1].1);
        }
        for (i, j) in pairs {
            assert_eq!(a[i], b[j]);
        }
    }

    #[test]
    fn intersection_map_identical_inputs() {
        let a = [10, 20, 30];
        assert_eq!(intersection_map(&a, &a), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn breaks_marks_last_of_each_run() {
        assert_eq!(breaks(&[1, 1, 2, 2, 2, 3]), vec![1, 4, 5]);
        assert_eq!(breaks(&[5]), vec![0]);
        assert_eq!(breaks(&[1, 2, 3]), vec![0, 1, 2]);
        assert!(breaks::<i32>(&[]).is_empty());
    }

    #[test]
    fn range_specifier_maps_old_into_new() {
        let old = [2, 4, 6];
        let new = [1, 2, 3, 4, 5, 6];
        let range = RangeSpecifier::new(&old, &new);
        assert_eq!(range.len(), 3);
        assert_eq!(range.arg1(), &[0, 1, 2]);
        assert_eq!(range.arg2(), &[1, 3, 5]);
        assert_eq!(range.pairs().collect::<Vec<_>>(), vec![(0, 1), (1, 3), (2, 5)]);
    }
}
