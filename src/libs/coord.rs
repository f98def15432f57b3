//! Strand-aware coordinate conversion.
//!
//! MAF coordinates are 0-based, half-open and relative to the row's strand.

use crate::libs::geometry::advance;
use crate::libs::maf::{MafBlock, Strand};

/// Reflects a coordinate against the sequence length. Applying it twice is a no-op.
pub fn mirror(x: u64, size: u64) -> u64 {
    size - x
}

/// 1-based inclusive range on the same strand, as in AXT.
pub fn axt_range(start: u64, size: u64) -> (u64, u64) {
    (start + 1, start + size)
}

/// 0-based half-open range on the forward strand, as in PSL.
pub fn forward_range(start: u64, size: u64, strand: Strand, src_size: u64) -> (u64, u64) {
    let end = start + size;
    match strand {
        Strand::Forward => (start, end),
        Strand::Reverse => (mirror(end, src_size), mirror(start, src_size)),
    }
}

/// A 1-based strand-relative coordinate as printed in BLAST-like reports.
///
/// ```
/// use mafconv::libs::coord::blast_coordinate;
/// use mafconv::libs::maf::Strand;
/// assert_eq!(blast_coordinate(1, Strand::Forward, 100), 1);
/// assert_eq!(blast_coordinate(1, Strand::Reverse, 100), 100);
/// ```
pub fn blast_coordinate(one_based: i64, strand: Strand, src_size: u64) -> i64 {
    match strand {
        Strand::Forward => one_based,
        Strand::Reverse => src_size as i64 - one_based + 1,
    }
}

/// Start and end coordinates of each row for one wrapped chunk of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkCoords {
    pub beg: usize,
    pub end: usize,
    pub starts: Vec<String>,
    pub ends: Vec<String>,
}

/// Cuts the columns of a block into chunks of `line_size`, tracking every row's
/// running sequence coordinates.
pub fn chunk_coords(block: &MafBlock, letter_sizes: &[u64], line_size: usize) -> Vec<ChunkCoords> {
    let mut coords: Vec<i64> = block.components.iter().map(|c| c.start as i64).collect();
    let columns = block.columns();

    let mut chunks = vec![];
    let mut beg = 0;
    while beg < columns {
        let end = (beg + line_size).min(columns);
        let mut starts = vec![];
        let mut ends = vec![];
        for (i, comp) in block.components.iter().enumerate() {
            starts.push(blast_coordinate(coords[i] + 1, comp.strand, comp.src_size).to_string());
            coords[i] += advance(&comp.text.as_bytes()[beg..end], letter_sizes[i]);
            ends.push(blast_coordinate(coords[i], comp.strand, comp.src_size).to_string());
        }
        chunks.push(ChunkCoords {
            beg,
            end,
            starts,
            ends,
        });
        beg = end;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::geometry::letter_sizes;

    #[test]
    fn test_mirror_involution() {
        let size = 37;
        for x in 0..=size {
            assert_eq!(mirror(mirror(x, size), size), x);
        }
    }

    #[test]
    fn test_ranges() {
        assert_eq!(axt_range(100, 4), (101, 104));
        assert_eq!(forward_range(100, 4, Strand::Forward, 1000), (100, 104));
        assert_eq!(forward_range(100, 4, Strand::Reverse, 1000), (896, 900));
    }

    #[test]
    fn test_chunk_coords() {
        let block = MafBlock::from_lines(&[
            "s t 10 7 + 100 ACGTA-CG",
            "s q 0  6 - 50  AC--ACGT",
        ])
        .unwrap();
        let chunks = chunk_coords(&block, &letter_sizes(&block), 3);
        assert_eq!(chunks.len(), 3);

        assert_eq!((chunks[0].beg, chunks[0].end), (0, 3));
        assert_eq!(chunks[0].starts, vec!["11", "50"]);
        assert_eq!(chunks[0].ends, vec!["13", "49"]);

        assert_eq!(chunks[1].starts, vec!["14", "48"]);
        assert_eq!(chunks[1].ends, vec!["15", "47"]);

        assert_eq!((chunks[2].beg, chunks[2].end), (6, 8));
        assert_eq!(chunks[2].starts, vec!["16", "46"]);
        assert_eq!(chunks[2].ends, vec!["17", "45"]);
    }
}
