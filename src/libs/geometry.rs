//! Alignment geometry: letter sizes, gapless/insertion partitioning and
//! coordinate advances.
//!
//! A row's *letter size* is the number of sequence units behind one aligned
//! letter: 1 normally, 3 when a DNA sequence is aligned to protein. Frameshift
//! markers shift the DNA coordinate by one unit: `\` forward, `/` backward.

use itertools::Itertools;

use crate::libs::maf::MafBlock;

pub const GAP: u8 = b'-';
pub const FORWARD_SHIFT: u8 = b'\\';
pub const REVERSE_SHIFT: u8 = b'/';

/// A maximal run of columns, either gapless or containing gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Number of columns where no row has a gap
    Gapless(usize),
    /// Per-row sequence advance over columns where some row has a gap
    Insertion(Vec<i64>),
}

/// Counts (letters, forward frameshifts, reverse frameshifts) in aligned text.
pub fn insertion_counts(text: &[u8]) -> (u64, u64, u64) {
    let mut gaps = 0;
    let mut forward = 0;
    let mut reverse = 0;
    for &c in text {
        match c {
            GAP => gaps += 1,
            FORWARD_SHIFT => forward += 1,
            REVERSE_SHIFT => reverse += 1,
            _ => {}
        }
    }
    let letters = text.len() as u64 - gaps - forward - reverse;
    (letters, forward, reverse)
}

/// ```
/// use mafconv::libs::geometry::letter_size;
/// assert_eq!(letter_size(b"AC-GT", 4), 1);
/// assert_eq!(letter_size(b"MK-V", 9), 3);
/// assert_eq!(letter_size(b"MK\\V", 10), 3);
/// ```
pub fn letter_size(text: &[u8], declared_size: u64) -> u64 {
    let (letters, forward, reverse) = insertion_counts(text);
    if forward > 0 || reverse > 0 || letters < declared_size {
        3
    } else {
        1
    }
}

/// Net sequence displacement over a stretch of aligned text.
pub fn advance(text: &[u8], letter_size: u64) -> i64 {
    let (letters, forward, reverse) = insertion_counts(text);
    (letters * letter_size + forward) as i64 - reverse as i64
}

pub fn letter_sizes(block: &MafBlock) -> Vec<u64> {
    block
        .components
        .iter()
        .map(|c| letter_size(c.text.as_bytes(), c.size))
        .collect()
}

pub fn is_translated(letter_sizes: &[u64]) -> bool {
    letter_sizes.iter().any(|&s| s > 1)
}

pub fn is_gapless(column: &[u8]) -> bool {
    !column.contains(&GAP)
}

/// Case-insensitive identity of every character in a column.
///
/// Ambiguity codes get no special treatment, as in NCBI BLAST.
pub fn is_match(column: &[u8]) -> bool {
    match column.split_first() {
        Some((first, rest)) => rest.iter().all(|c| c.eq_ignore_ascii_case(first)),
        None => true,
    }
}

/// Splits the columns of a block into alternating gapless and insertion segments.
///
/// ```
/// use mafconv::libs::geometry::{letter_sizes, partition, Segment};
/// use mafconv::libs::maf::MafBlock;
/// let block = MafBlock::from_lines(&["s a 0 4 + 9 AC-GT", "s b 0 5 + 9 ACGGT"]).unwrap();
/// let segments = partition(&block, &letter_sizes(&block));
/// assert_eq!(
///     segments,
///     vec![Segment::Gapless(2), Segment::Insertion(vec![0, 1]), Segment::Gapless(2)]
/// );
/// ```
pub fn partition(block: &MafBlock, letter_sizes: &[u64]) -> Vec<Segment> {
    let flags = (0..block.columns()).map(|i| is_gapless(&block.column(i)));

    let mut segments = vec![];
    let mut beg = 0;
    for (len, gapless) in flags.dedup_with_count() {
        let end = beg + len;
        if gapless {
            segments.push(Segment::Gapless(len));
        } else {
            let advances = block
                .components
                .iter()
                .zip(letter_sizes)
                .map(|(c, &ls)| advance(&c.text.as_bytes()[beg..end], ls))
                .collect();
            segments.push(Segment::Insertion(advances));
        }
        beg = end;
    }

    segments
}

/// Number of runs of gap characters in aligned text.
pub fn gap_run_count(text: &[u8]) -> usize {
    text.iter()
        .dedup()
        .filter(|&&c| c == GAP)
        .count()
}
