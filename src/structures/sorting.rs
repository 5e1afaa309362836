//! Array sorting step generators.
//!
//! Each generator sorts a private copy of its input and records one
//! [`ArraySnapshot`] per comparison, per swap announcement and per
//! post-swap state. The caller's slice is never touched.
//!
//! # Example
//!
//! ```rust
//! use algoviz::structures::sorting::{generate_steps, SortAlgorithm};
//!
//! let log = generate_steps(SortAlgorithm::Quick, &[5, 2, 9, 1]);
//! assert_eq!(log.first().values, vec![5, 2, 9, 1]);
//! assert_eq!(log.last().values, vec![1, 2, 5, 9]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{StepLog, StepLogBuilder};
use crate::error::{VizError, VizResult};
use crate::replay::ReplayController;

/// Default input shown on first load.
pub const DEFAULT_INPUT: &str = "64, 34, 25, 12, 22, 11, 90";

/// Parse the leading integer of one token.
///
/// Leading whitespace and a single sign are accepted, then as many decimal
/// digits as are present (a `0x` prefix switches to hex and needs at least
/// one hex digit after it). Anything after the digits is ignored. Values
/// beyond the `i64` range saturate. Returns `None` when no digit was found.
#[must_use]
pub fn parse_int_prefix(token: &str) -> Option<i64> {
    let s = token.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, s) = if s.starts_with("0x") || s.starts_with("0X") {
        (16, &s[2..])
    } else {
        (10, s)
    };
    let digits: &str = {
        let end = s
            .char_indices()
            .find(|(_, c)| !c.is_digit(radix))
            .map_or(s.len(), |(i, _)| i);
        &s[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let value = digits.chars().try_fold(0i64, |acc, c| {
        let digit = i64::from(c.to_digit(radix)?);
        let shifted = acc.checked_mul(i64::from(radix))?;
        if negative {
            shifted.checked_sub(digit)
        } else {
            shifted.checked_add(digit)
        }
    });
    Some(value.unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

/// Parse comma-separated integers, silently dropping tokens with no digits.
#[must_use]
pub fn parse_number_list(input: &str) -> Vec<i64> {
    input.split(',').filter_map(parse_int_prefix).collect()
}

/// Parse a single-value input field.
///
/// # Errors
///
/// Returns `InvalidNumber` if the field holds no leading integer.
pub fn parse_number(input: &str) -> VizResult<i64> {
    parse_int_prefix(input).ok_or(VizError::InvalidNumber)
}

/// Selectable sorting algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    /// Adjacent-swap passes.
    #[default]
    Bubble,
    /// Lomuto partition, last element as pivot.
    Quick,
    /// Top-down merge sort.
    Merge,
}

impl SortAlgorithm {
    /// All algorithms in menu order.
    pub const ALL: [Self; 3] = [Self::Bubble, Self::Quick, Self::Merge];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Quick => "Quick Sort",
            Self::Merge => "Merge Sort",
        }
    }

    /// (time, space) complexity.
    #[must_use]
    pub const fn complexity(self) -> (&'static str, &'static str) {
        match self {
            Self::Bubble => ("O(n²)", "O(1)"),
            Self::Quick => ("O(n log n)", "O(log n)"),
            Self::Merge => ("O(n log n)", "O(n)"),
        }
    }

    /// Next algorithm in menu order, wrapping.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Bubble => Self::Quick,
            Self::Quick => Self::Merge,
            Self::Merge => Self::Bubble,
        }
    }

    /// Parse a command-line name (`bubble`, `quick`, `merge`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bubble" => Some(Self::Bubble),
            "quick" => Some(Self::Quick),
            "merge" => Some(Self::Merge),
            _ => None,
        }
    }
}

/// Array contents plus the indices highlighted at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArraySnapshot {
    /// Array contents.
    pub values: Vec<i64>,
    /// Indices being compared.
    pub comparing: Vec<usize>,
    /// Indices being swapped or written.
    pub swapping: Vec<usize>,
}

impl ArraySnapshot {
    /// Snapshot with no highlights.
    #[must_use]
    pub fn plain(values: &[i64]) -> Self {
        Self {
            values: values.to_vec(),
            comparing: Vec::new(),
            swapping: Vec::new(),
        }
    }

    fn comparing(values: &[i64], indices: Vec<usize>) -> Self {
        Self {
            values: values.to_vec(),
            comparing: indices,
            swapping: Vec::new(),
        }
    }

    fn swapping(values: &[i64], indices: Vec<usize>) -> Self {
        Self {
            values: values.to_vec(),
            comparing: Vec::new(),
            swapping: indices,
        }
    }
}

/// Run `algorithm` on a copy of `input` and record every step.
///
/// Empty and single-element input yields a log holding only the initial
/// snapshot.
#[must_use]
pub fn generate_steps(algorithm: SortAlgorithm, input: &[i64]) -> StepLog<ArraySnapshot> {
    let mut work = input.to_vec();
    let mut steps = StepLog::builder(ArraySnapshot::plain(&work));
    match algorithm {
        SortAlgorithm::Bubble => bubble_sort(&mut work, &mut steps),
        SortAlgorithm::Quick => {
            if let Some(high) = work.len().checked_sub(1) {
                quick_sort(&mut work, 0, high, &mut steps);
            }
        }
        SortAlgorithm::Merge => {
            if let Some(right) = work.len().checked_sub(1) {
                merge_sort(&mut work, 0, right, &mut steps);
            }
        }
    }
    let log = steps.finish();
    debug!(
        algorithm = algorithm.name(),
        n = input.len(),
        steps = log.len(),
        "generated sort steps"
    );
    log
}

fn bubble_sort(arr: &mut [i64], steps: &mut StepLogBuilder<ArraySnapshot>) {
    let n = arr.len();
    for i in 0..n {
        for j in 0..n - i - 1 {
            steps.push(ArraySnapshot::comparing(arr, vec![j, j + 1]));
            if arr[j] > arr[j + 1] {
                steps.push(ArraySnapshot::swapping(arr, vec![j, j + 1]));
                arr.swap(j, j + 1);
                steps.push(ArraySnapshot::plain(arr));
            }
        }
    }
}

fn quick_sort(arr: &mut [i64], low: usize, high: usize, steps: &mut StepLogBuilder<ArraySnapshot>) {
    if low < high {
        let pivot = partition(arr, low, high, steps);
        if pivot > low {
            quick_sort(arr, low, pivot - 1, steps);
        }
        quick_sort(arr, pivot + 1, high, steps);
    }
}

/// Lomuto partition. `store` is the slot the next small element goes to.
fn partition(
    arr: &mut [i64],
    low: usize,
    high: usize,
    steps: &mut StepLogBuilder<ArraySnapshot>,
) -> usize {
    let pivot = arr[high];
    steps.push(ArraySnapshot::comparing(arr, vec![high]));

    let mut store = low;
    for j in low..high {
        steps.push(ArraySnapshot::comparing(arr, vec![j, high]));
        if arr[j] <= pivot {
            steps.push(ArraySnapshot::swapping(arr, vec![store, j]));
            arr.swap(store, j);
            steps.push(ArraySnapshot::plain(arr));
            store += 1;
        }
    }

    steps.push(ArraySnapshot::swapping(arr, vec![store, high]));
    arr.swap(store, high);
    steps.push(ArraySnapshot::plain(arr));
    store
}

fn merge_sort(arr: &mut [i64], left: usize, right: usize, steps: &mut StepLogBuilder<ArraySnapshot>) {
    if left < right {
        let mid = (left + right) / 2;
        merge_sort(arr, left, mid, steps);
        merge_sort(arr, mid + 1, right, steps);
        merge(arr, left, mid, right, steps);
    }
}

fn merge(
    arr: &mut [i64],
    left: usize,
    mid: usize,
    right: usize,
    steps: &mut StepLogBuilder<ArraySnapshot>,
) {
    let lhs = arr[left..=mid].to_vec();
    let rhs = arr[mid + 1..=right].to_vec();
    let (mut i, mut j, mut k) = (0, 0, left);

    while i < lhs.len() && j < rhs.len() {
        steps.push(ArraySnapshot::comparing(arr, vec![left + i, mid + 1 + j]));
        steps.push(ArraySnapshot::swapping(arr, vec![k]));
        if lhs[i] <= rhs[j] {
            arr[k] = lhs[i];
            i += 1;
        } else {
            arr[k] = rhs[j];
            j += 1;
        }
        steps.push(ArraySnapshot::plain(arr));
        k += 1;
    }

    for &value in lhs[i..].iter().chain(&rhs[j..]) {
        steps.push(ArraySnapshot::swapping(arr, vec![k]));
        arr[k] = value;
        steps.push(ArraySnapshot::plain(arr));
        k += 1;
    }
}

/// Array tab state: input text, primary array and its replay.
#[derive(Debug, Clone)]
pub struct ArrayVisualizer {
    input: String,
    values: Vec<i64>,
    algorithm: SortAlgorithm,
    replay: ReplayController<ArraySnapshot>,
}

impl ArrayVisualizer {
    /// Visualizer over `input`, already reset.
    #[must_use]
    pub fn new(input: &str, algorithm: SortAlgorithm, speed: f64) -> Self {
        let values = parse_number_list(input);
        let replay = ReplayController::new(StepLog::single(ArraySnapshot::plain(&values)), speed);
        Self {
            input: input.to_string(),
            values,
            algorithm,
            replay,
        }
    }

    /// Re-parse the input text and show it unsorted, paused.
    pub fn reset(&mut self) {
        self.values = parse_number_list(&self.input);
        self.replay
            .load(StepLog::single(ArraySnapshot::plain(&self.values)));
    }

    /// Generate a fresh log for the current array and start playing.
    pub fn start(&mut self) {
        let log = generate_steps(self.algorithm, &self.values);
        self.replay.start(log);
    }

    /// Replace the input text (takes effect on the next reset).
    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    /// Choose the algorithm used by the next start.
    pub fn set_algorithm(&mut self, algorithm: SortAlgorithm) {
        self.algorithm = algorithm;
    }

    /// Current input text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Primary (unsorted) array.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Selected algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> SortAlgorithm {
        self.algorithm
    }

    /// Replay controller.
    #[must_use]
    pub const fn replay(&self) -> &ReplayController<ArraySnapshot> {
        &self.replay
    }

    /// Mutable replay controller.
    pub fn replay_mut(&mut self) -> &mut ReplayController<ArraySnapshot> {
        &mut self.replay
    }
}

impl Default for ArrayVisualizer {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT, SortAlgorithm::Bubble, 50.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::engine::guard::{check_ascending, check_permutation};
    use proptest::prelude::*;

    proptest! {
        /// Every algorithm ends on the sorted permutation of its input.
        #[test]
        fn prop_final_snapshot_sorted(values in proptest::collection::vec(-500i64..500, 0..40)) {
            for algorithm in SortAlgorithm::ALL {
                let log = generate_steps(algorithm, &values);
                let last = &log.last().values;
                prop_assert!(check_ascending(last).is_ok());
                prop_assert!(check_permutation(last, &values).is_ok());
                prop_assert_eq!(&log.first().values, &values);
            }
        }

        /// Highlighted indices always point into the array.
        #[test]
        fn prop_highlights_in_bounds(values in proptest::collection::vec(0i64..100, 0..30)) {
            for algorithm in SortAlgorithm::ALL {
                for step in &generate_steps(algorithm, &values) {
                    prop_assert!(step.comparing.iter().chain(&step.swapping).all(|&i| i < values.len()));
                }
            }
        }
    }
}
