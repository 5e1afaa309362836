//! Structural invariant checks.
//!
//! Operations call these after producing a new state. A failure is an
//! internal bug, never a user error, and is reported as
//! [`VizError::InvariantViolation`] instead of panicking.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{VizError, VizResult};

/// Check that `values` is sorted ascending (ties allowed).
///
/// # Errors
///
/// Returns `InvariantViolation` naming the first out-of-order index.
pub fn check_ascending<T: PartialOrd + std::fmt::Debug>(values: &[T]) -> VizResult<()> {
    match values.windows(2).position(|pair| pair[0] > pair[1]) {
        None => Ok(()),
        Some(i) => Err(VizError::invariant(format!(
            "not ascending at index {}: {:?} > {:?}",
            i,
            values[i],
            values[i + 1]
        ))),
    }
}

/// Check that `values` is strictly increasing (in-order walk of a BST).
///
/// # Errors
///
/// Returns `InvariantViolation` naming the first offending index.
pub fn check_strictly_increasing<T: PartialOrd + std::fmt::Debug>(values: &[T]) -> VizResult<()> {
    match values.windows(2).position(|pair| pair[0] >= pair[1]) {
        None => Ok(()),
        Some(i) => Err(VizError::invariant(format!(
            "BST order broken at in-order index {}: {:?} >= {:?}",
            i,
            values[i],
            values[i + 1]
        ))),
    }
}

/// Check that `a` and `b` hold the same multiset of elements.
///
/// # Errors
///
/// Returns `InvariantViolation` if lengths or element counts differ.
pub fn check_permutation<T: Eq + Hash>(a: &[T], b: &[T]) -> VizResult<()> {
    if a.len() != b.len() {
        return Err(VizError::invariant(format!(
            "element count changed: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    let mut counts: HashMap<&T, isize> = HashMap::new();
    for item in a {
        *counts.entry(item).or_insert(0) += 1;
    }
    for item in b {
        *counts.entry(item).or_insert(0) -= 1;
    }
    if counts.values().all(|&c| c == 0) {
        Ok(())
    } else {
        Err(VizError::invariant("multiset of values changed"))
    }
}

/// Check the implicit-tree heap property over a dense array.
///
/// `in_order(parent, child)` must hold for every parent/child pair.
///
/// # Errors
///
/// Returns `InvariantViolation` naming the first offending child index.
pub fn check_implicit_heap<T, F>(values: &[T], in_order: F) -> VizResult<()>
where
    T: std::fmt::Debug,
    F: Fn(&T, &T) -> bool,
{
    for child in 1..values.len() {
        let parent = (child - 1) / 2;
        if !in_order(&values[parent], &values[child]) {
            return Err(VizError::invariant(format!(
                "heap order broken: parent[{}]={:?} child[{}]={:?}",
                parent, values[parent], child, values[child]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending() {
        assert!(check_ascending::<i64>(&[]).is_ok());
        assert!(check_ascending(&[1, 1, 2, 5]).is_ok());
        let err = check_ascending(&[1, 3, 2]).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_strictly_increasing() {
        assert!(check_strictly_increasing(&[20, 30, 40, 50]).is_ok());
        assert!(check_strictly_increasing(&[20, 20]).is_err());
    }

    #[test]
    fn test_permutation() {
        assert!(check_permutation(&[3, 1, 2, 1], &[1, 1, 2, 3]).is_ok());
        assert!(check_permutation(&[1, 2], &[1, 2, 3]).is_err());
        assert!(check_permutation(&[1, 1, 2], &[1, 2, 2]).is_err());
    }

    #[test]
    fn test_implicit_heap() {
        let max = |p: &i64, c: &i64| p >= c;
        assert!(check_implicit_heap(&[100, 80, 70, 50, 60, 30, 20], max).is_ok());
        assert!(check_implicit_heap(&[10, 80], max).is_err());
        assert!(check_implicit_heap::<i64, _>(&[], max).is_ok());
    }
}
