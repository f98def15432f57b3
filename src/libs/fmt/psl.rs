use itertools::Itertools;
use std::fmt;

use crate::libs::coord::forward_range;
use crate::libs::error::ConvError;
use crate::libs::geometry::{gap_run_count, is_translated, letter_sizes, partition, Segment, GAP};
use crate::libs::maf::MafBlock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Psl {
    pub match_count: u64,
    pub mismatch_count: u64,
    pub rep_match: u64,
    pub n_count: u64,
    pub q_num_insert: u64,
    pub q_base_insert: i64,
    pub t_num_insert: u64,
    pub t_base_insert: i64,
    pub strand: String, // "+", "-", "++", "+-"
    pub q_name: String,
    pub q_size: u64,
    pub q_start: u64,
    pub q_end: u64,
    pub t_name: String,
    pub t_size: u64,
    pub t_start: u64,
    pub t_end: u64,
    pub block_count: u64,
    pub block_sizes: Vec<u64>,
    pub q_starts: Vec<i64>,
    pub t_starts: Vec<i64>,
}

/// Pairwise only; the target may be on `-` only when translated.
pub fn check(block: &MafBlock) -> Result<(), ConvError> {
    block.require_pairwise()?;
    if !is_translated(&letter_sizes(block)) && !block.components[0].strand.is_forward() {
        return Err(ConvError::constraint(
            "for non-translated PSL, the 1st strand in each alignment must be +",
        ));
    }
    Ok(())
}

fn is_standard_base(c: u8) -> bool {
    matches!(c, b'A' | b'C' | b'G' | b'T' | b'U')
}

impl Psl {
    /// Converts a pairwise block; row 0 is the target, row 1 the query.
    ///
    /// Block starts are strand-relative, as PSL wants for `-` strands.
    pub fn from_maf(block: &MafBlock, is_protein: bool) -> Result<Self, ConvError> {
        check(block)?;

        let sizes = letter_sizes(block);
        let target = &block.components[0];
        let query = &block.components[1];

        let mut strand = query.strand.to_string();
        if is_translated(&sizes) {
            strand.push(target.strand.as_char());
        }

        let (t_start, t_end) =
            forward_range(target.start, target.size, target.strand, target.src_size);
        let (q_start, q_end) = forward_range(query.start, query.size, query.strand, query.src_size);

        let mut psl = Psl {
            strand,
            q_name: query.src.clone(),
            q_size: query.src_size,
            q_start,
            q_end,
            t_name: target.src.clone(),
            t_size: target.src_size,
            t_start,
            t_end,
            ..Default::default()
        };

        psl.accum_counts(block, is_protein);
        let gapless_columns =
            (psl.match_count + psl.mismatch_count + psl.rep_match + psl.n_count) as i64;

        psl.q_num_insert = gap_run_count(target.text.as_bytes()) as u64;
        psl.q_base_insert = query.size as i64 - gapless_columns * sizes[1] as i64;
        psl.t_num_insert = gap_run_count(query.text.as_bytes()) as u64;
        psl.t_base_insert = target.size as i64 - gapless_columns * sizes[0] as i64;

        // Strand-relative start of the next block
        let mut ts = target.start as i64;
        let mut qs = query.start as i64;
        for seg in partition(block, &sizes) {
            match seg {
                Segment::Gapless(len) => {
                    psl.add_block(len as u64, qs, ts);
                    ts += (len as u64 * sizes[0]) as i64;
                    qs += (len as u64 * sizes[1]) as i64;
                }
                Segment::Insertion(adv) => {
                    ts += adv[0];
                    qs += adv[1];
                }
            }
        }

        Ok(psl)
    }

    // repMatch stays zero; proteins never count as N
    fn accum_counts(&mut self, block: &MafBlock, is_protein: bool) {
        let t_bytes = block.components[0].text.as_bytes();
        let q_bytes = block.components[1].text.as_bytes();

        for (&t, &q) in t_bytes.iter().zip(q_bytes) {
            let t = t.to_ascii_uppercase();
            let q = q.to_ascii_uppercase();
            if t == GAP || q == GAP {
                continue;
            }
            if is_protein || (is_standard_base(t) && is_standard_base(q)) {
                if t == q {
                    self.match_count += 1;
                } else {
                    self.mismatch_count += 1;
                }
            } else {
                self.n_count += 1;
            }
        }
    }

    fn add_block(&mut self, size: u64, qs: i64, ts: i64) {
        self.block_count += 1;
        self.block_sizes.push(size);
        self.q_starts.push(qs);
        self.t_starts.push(ts);
    }
}

// UCSC software prefers a trailing comma
fn comma_list<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(|x| format!("{},", x)).collect()
}

/// The 21 tab-separated PSL columns, without the line terminator.
impl fmt::Display for Psl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            self.match_count.to_string(),
            self.mismatch_count.to_string(),
            self.rep_match.to_string(),
            self.n_count.to_string(),
            self.q_num_insert.to_string(),
            self.q_base_insert.to_string(),
            self.t_num_insert.to_string(),
            self.t_base_insert.to_string(),
            self.strand.clone(),
            self.q_name.clone(),
            self.q_size.to_string(),
            self.q_start.to_string(),
            self.q_end.to_string(),
            self.t_name.clone(),
            self.t_size.to_string(),
            self.t_start.to_string(),
            self.t_end.to_string(),
            self.block_count.to_string(),
            comma_list(&self.block_sizes),
            comma_list(&self.q_starts),
            comma_list(&self.t_starts),
        ];
        write!(f, "{}", fields.iter().join("\t"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(lines: &[&str]) -> MafBlock {
        MafBlock::from_lines(lines).unwrap()
    }

    #[test]
    fn test_from_maf() {
        // t: ACTGAC-A
        // q: AC-GnCTA
        let b = block(&[
            "a score=10",
            "s t 10 7 + 100 ACTGAC-A",
            "s q 0  7 - 50  AC-GnCTA",
        ]);
        let psl = Psl::from_maf(&b, false).unwrap();

        assert_eq!(psl.match_count, 5); // A C G C A
        assert_eq!(psl.mismatch_count, 0);
        assert_eq!(psl.n_count, 1); // A/n
        assert_eq!(psl.q_num_insert, 1);
        assert_eq!(psl.q_base_insert, 1);
        assert_eq!(psl.t_num_insert, 1);
        assert_eq!(psl.t_base_insert, 1);
        assert_eq!(psl.strand, "-");
        assert_eq!((psl.q_start, psl.q_end), (43, 50));
        assert_eq!((psl.t_start, psl.t_end), (10, 17));
        assert_eq!(psl.block_count, 3);
        assert_eq!(psl.block_sizes, vec![2, 3, 1]);
        assert_eq!(psl.t_starts, vec![10, 13, 16]);
        assert_eq!(psl.q_starts, vec![0, 2, 6]);

        assert_eq!(
            psl.to_string(),
            "5\t0\t0\t1\t1\t1\t1\t1\t-\tq\t50\t43\t50\tt\t100\t10\t17\t3\t2,3,1,\t0,2,6,\t10,13,16,"
        );
    }

    #[test]
    fn test_blocks_monotonic_and_end() {
        let b = block(&[
            "s t 5 9  + 100 AC--GTACG-TA",
            "s q 3 10 + 80  ACTTG--CGATA",
        ]);
        let psl = Psl::from_maf(&b, false).unwrap();
        for starts in [&psl.t_starts, &psl.q_starts] {
            assert!(starts.windows(2).all(|w| w[0] <= w[1]));
        }
        let last = psl.block_count as usize - 1;
        let size = psl.block_sizes[last] as i64;
        assert_eq!(psl.t_starts[last] + size, psl.t_end as i64);
        assert_eq!(psl.q_starts[last] + size, psl.q_end as i64);
    }

    #[test]
    fn test_protein_counts() {
        let b = block(&["s t 0 4 + 10 MKVX", "s q 0 4 + 10 MKVL"]);
        let dna = Psl::from_maf(&b, false).unwrap();
        assert_eq!((dna.match_count, dna.mismatch_count, dna.n_count), (0, 0, 4));
        let prot = Psl::from_maf(&b, true).unwrap();
        assert_eq!((prot.match_count, prot.mismatch_count, prot.n_count), (3, 1, 0));
    }

    #[test]
    fn test_translated() {
        // query is DNA aligned as codons against a protein
        let b = block(&["s prot 2 4 - 40 MK--VL", "s dna 30 16 + 200 MKA\\VL"]);
        let psl = Psl::from_maf(&b, true).unwrap();
        assert_eq!(psl.strand, "+-");
        assert_eq!(psl.match_count, 4);
        assert_eq!((psl.t_start, psl.t_end), (34, 38));
        assert_eq!((psl.q_start, psl.q_end), (30, 46));
        assert_eq!(psl.block_sizes, vec![2, 2]);
        assert_eq!(psl.t_starts, vec![2, 4]);
        assert_eq!(psl.q_starts, vec![30, 40]);
    }

    #[test]
    fn test_rejects() {
        let b = block(&["s t 0 4 - 10 ACGT", "s q 0 4 + 10 ACGT"]);
        assert!(matches!(
            Psl::from_maf(&b, false),
            Err(ConvError::Constraint(_))
        ));

        let b = block(&["s t 0 4 + 10 ACGT"]);
        assert!(matches!(
            Psl::from_maf(&b, false),
            Err(ConvError::Constraint(_))
        ));
    }

    #[test]
    fn test_reverse_row_past_sequence_end() {
        // a `-` row ending past its sequence would wrap when mirrored
        let err = MafBlock::from_lines(&["s t 0 4 + 10 ACGT", "s q 8 4 - 10 ACGT"]).unwrap_err();
        assert!(matches!(err, ConvError::Parse(_)));

        let b = block(&["s t 0 4 + 10 ACGT", "s q 6 4 - 10 ACGT"]);
        let psl = Psl::from_maf(&b, false).unwrap();
        assert_eq!((psl.q_start, psl.q_end), (0, 4));
        assert_eq!(psl.q_starts, vec![6]);
    }
}
