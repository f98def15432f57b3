//! Per-column match symbols and alignment-probability classes.

use itertools::Itertools;

use crate::libs::geometry::is_match;
use crate::libs::maf::MafBlock;

pub fn pairwise_symbol(column: &[u8]) -> char {
    if is_match(column) {
        '|'
    } else {
        ' '
    }
}

pub fn multiple_symbol(column: &[u8]) -> char {
    if is_match(column) {
        '*'
    } else {
        ' '
    }
}

/// Six confidence levels, from most to least reliable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbClass {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl ProbClass {
    pub const ALL: [ProbClass; 6] = [
        ProbClass::A,
        ProbClass::B,
        ProbClass::C,
        ProbClass::D,
        ProbClass::E,
        ProbClass::F,
    ];

    pub fn from_prob(p: f64) -> Self {
        if p > 0.999 {
            ProbClass::A
        } else if p > 0.99 {
            ProbClass::B
        } else if p > 0.95 {
            ProbClass::C
        } else if p > 0.9 {
            ProbClass::D
        } else if p > 0.5 {
            ProbClass::E
        } else {
            ProbClass::F
        }
    }

    /// CSS class name
    pub fn css(&self) -> &'static str {
        match self {
            ProbClass::A => "a",
            ProbClass::B => "b",
            ProbClass::C => "c",
            ProbClass::D => "d",
            ProbClass::E => "e",
            ProbClass::F => "f",
        }
    }
}

/// Class of one column from the product of its probabilities; `None` if any
/// value isn't a number.
///
/// ```
/// use mafconv::libs::confidence::{classify, ProbClass};
/// assert_eq!(classify(&["0.9999"]), Some(ProbClass::A));
/// assert_eq!(classify(&["0.99", "0.99"]), Some(ProbClass::C));
/// assert_eq!(classify(&["0.99", "x"]), None);
/// ```
pub fn classify<S: AsRef<str>>(values: &[S]) -> Option<ProbClass> {
    let mut p = 1.0;
    for v in values {
        p *= v.as_ref().trim().parse::<f64>().ok()?;
    }
    Some(ProbClass::from_prob(p))
}

/// One class per alignment column, all `None` without `p` lines.
pub fn column_classes(block: &MafBlock) -> Vec<Option<ProbClass>> {
    if block.probs.is_empty() {
        return vec![None; block.columns()];
    }

    (0..block.columns())
        .map(|i| {
            let values: Option<Vec<&str>> = block
                .probs
                .iter()
                .map(|row| row.get(i).map(|s| s.as_str()))
                .collect();
            values.and_then(|v| classify(&v))
        })
        .collect()
}

/// (item, begin, end) for each run of identical items.
pub fn identical_runs<T: PartialEq + Clone>(items: &[T]) -> Vec<(T, usize, usize)> {
    let mut runs = vec![];
    let mut beg = 0;
    for (len, item) in items.iter().dedup_with_count() {
        runs.push((item.clone(), beg, beg + len));
        beg += len;
    }
    runs
}
