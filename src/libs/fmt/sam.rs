use indexmap::IndexMap;
use itertools::Itertools;
use std::fmt;
use std::io;

use crate::libs::error::ConvError;
use crate::libs::geometry::{is_translated, letter_sizes, GAP};
use crate::libs::maf::MafBlock;

pub const MAPQ_MISSING: u8 = 255;
pub const MAPQ_MAXIMUM: u8 = 254;

pub fn write_header<W: io::Write>(w: &mut W, seq_lengths: &IndexMap<String, u64>) -> io::Result<()> {
    writeln!(w, "@HD\tVN:1.3\tSO:unknown")?;
    for (name, length) in seq_lengths {
        writeln!(w, "@SQ\tSN:{}\tLN:{}", name, length)?;
    }
    Ok(())
}

/// Phred-scaled mapping quality from the probability that the alignment is
/// misplaced.
///
/// ```
/// use mafconv::libs::fmt::sam::mapq_from_prob;
/// assert_eq!(mapq_from_prob("0.01").unwrap(), 20);
/// assert_eq!(mapq_from_prob("0").unwrap(), 254);
/// assert!(mapq_from_prob("1.5").is_err());
/// ```
pub fn mapq_from_prob(prob: &str) -> Result<u8, ConvError> {
    let bad = || ConvError::value(format!("bad probability: {}", prob));
    let p = prob.trim().parse::<f64>().map_err(|_| bad())?;
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return Err(bad());
    }
    if p == 0.0 {
        return Ok(MAPQ_MAXIMUM);
    }
    let phred = -10.0 * p.log10();
    if phred > MAPQ_MAXIMUM as f64 {
        return Ok(MAPQ_MAXIMUM);
    }
    Ok(phred.round() as u8)
}

/// CIGAR operation of one (target, query) column.
pub fn cigar_category(t: u8, q: u8) -> char {
    match (t == GAP, q == GAP) {
        (true, true) => 'P',
        (true, false) => 'I',
        (false, true) => 'D',
        (false, false) => 'M',
    }
}

/// Run-length encoded CIGAR operations over the columns of a pairwise alignment.
pub fn cigar_ops(target: &[u8], query: &[u8]) -> Vec<(u64, char)> {
    target
        .iter()
        .zip(query)
        .map(|(&t, &q)| cigar_category(t, q))
        .dedup_with_count()
        .map(|(n, op)| (n as u64, op))
        .collect()
}

/// Pairwise, untranslated, reference on `+`.
pub fn check(block: &MafBlock) -> Result<(), ConvError> {
    block.require_pairwise()?;
    if is_translated(&letter_sizes(block)) {
        return Err(ConvError::constraint(
            "this looks like translated DNA - can't convert to SAM format",
        ));
    }
    if !block.components[0].strand.is_forward() {
        return Err(ConvError::constraint(
            "for SAM, the 1st strand in each alignment must be +",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamRecord {
    pub q_name: String,
    pub flag: u16,
    pub r_name: String,
    pub pos: u64, // 1-based
    pub mapq: u8,
    pub cigar: Vec<(u64, char)>,
    pub seq: String,
    pub qual: String,
    pub edit_distance: u64,
    pub score: Option<i64>,
    pub evalue: Option<String>,
}

impl SamRecord {
    /// Converts a pairwise block; row 0 is the reference, row 1 the read.
    pub fn from_maf(block: &MafBlock) -> Result<Self, ConvError> {
        check(block)?;

        // it must be an integer
        let score = block.annotation("score").and_then(|s| s.parse::<i64>().ok());
        let evalue = block.annotation("expect").map(|s| s.to_string());
        let mapq = match block.annotation("mismap") {
            Some(prob) => mapq_from_prob(prob)?,
            None => MAPQ_MISSING,
        };

        let reference = &block.components[0];
        let query = &block.components[1];

        let r_bytes = reference.text.as_bytes();
        let q_bytes = query.text.as_bytes();

        let mut cigar = vec![];
        if query.start > 0 {
            cigar.push((query.start, 'H'));
        }
        cigar.extend(cigar_ops(r_bytes, q_bytes));
        let q_rev_start = query.src_size - query.end();
        if q_rev_start > 0 {
            cigar.push((q_rev_start, 'H'));
        }

        let seq: String = query.text.chars().filter(|&c| c != '-').collect();

        let qual = match block.qualities.as_slice() {
            [] => "*".to_string(),
            [(name, quality)] if *name == query.src && quality.len() == query.text.len() => q_bytes
                .iter()
                .zip(quality.chars())
                .filter(|(&c, _)| c != GAP)
                .map(|(_, q)| q)
                .collect(),
            _ => {
                return Err(ConvError::constraint("can't interpret the quality data"));
            }
        };

        // no special treatment of ambiguous bases
        let edit_distance = r_bytes
            .iter()
            .zip(q_bytes)
            .filter(|(r, q)| !r.eq_ignore_ascii_case(*q))
            .count() as u64;

        Ok(SamRecord {
            q_name: query.src.clone(),
            flag: if query.strand.is_forward() { 0 } else { 16 },
            r_name: reference.src.clone(),
            pos: reference.start + 1,
            mapq,
            cigar,
            seq,
            qual,
            edit_distance,
            score,
            evalue,
        })
    }

    pub fn cigar_string(&self) -> String {
        self.cigar
            .iter()
            .map(|(n, op)| format!("{}{}", n, op))
            .join("")
    }
}

impl fmt::Display for SamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t*\t0\t0\t{}\t{}\tNM:i:{}",
            self.q_name,
            self.flag,
            self.r_name,
            self.pos,
            self.mapq,
            self.cigar_string(),
            self.seq,
            self.qual,
            self.edit_distance
        )?;
        if let Some(score) = self.score {
            write!(f, "\tAS:i:{}", score)?;
        }
        if let Some(evalue) = &self.evalue {
            write!(f, "\tEV:Z:{}", evalue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(lines: &[&str]) -> MafBlock {
        MafBlock::from_lines(lines).unwrap()
    }

    #[test]
    fn test_mapq() {
        assert_eq!(mapq_from_prob("1").unwrap(), 0);
        assert_eq!(mapq_from_prob("0.5").unwrap(), 3);
        assert_eq!(mapq_from_prob("1e-5").unwrap(), 50);
        assert_eq!(mapq_from_prob("1e-30").unwrap(), 254);
        assert_eq!(mapq_from_prob("0").unwrap(), 254);
        assert!(matches!(mapq_from_prob("-0.1"), Err(ConvError::Value(_))));
        assert!(matches!(mapq_from_prob("abc"), Err(ConvError::Value(_))));
        assert!(matches!(mapq_from_prob("nan"), Err(ConvError::Value(_))));
    }

    #[test]
    fn test_cigar_ops() {
        assert_eq!(
            cigar_ops(b"AC--GT-A", b"ACTT-TGA"),
            vec![(2, 'M'), (2, 'I'), (1, 'D'), (1, 'M'), (1, 'I'), (1, 'M')]
        );
        assert_eq!(cigar_ops(b"A-", b"A-"), vec![(1, 'M'), (1, 'P')]);
    }

    #[test]
    fn test_from_maf() {
        let b = block(&[
            "a score=21 expect=3e-9 mismap=0.01",
            "s chr1 100 7 + 1000 ACGTA-CG",
            "s read 2   7 - 11   ACcT-ACG",
            "q read              ABCD!EFG",
        ]);
        let sam = SamRecord::from_maf(&b).unwrap();
        assert_eq!(sam.flag, 16);
        assert_eq!(sam.pos, 101);
        assert_eq!(sam.mapq, 20);
        assert_eq!(sam.cigar_string(), "2H4M1D1I2M2H");
        assert_eq!(sam.seq, "ACcTACG");
        assert_eq!(sam.qual, "ABCDEFG");
        assert_eq!(sam.edit_distance, 3);
        assert_eq!(
            sam.to_string(),
            "read\t16\tchr1\t101\t20\t2H4M1D1I2M2H\t*\t0\t0\tACcTACG\tABCDEFG\tNM:i:3\tAS:i:21\tEV:Z:3e-9"
        );
    }

    #[test]
    fn test_cigar_sums() {
        let b = block(&["s r 0 9 + 100 ACG--TAC-GTA", "s q 3 10 + 20 A-GTTTACC-TA"]);
        let sam = SamRecord::from_maf(&b).unwrap();
        let sum = |ops: &[char]| -> u64 {
            sam.cigar
                .iter()
                .filter(|(_, op)| ops.contains(op))
                .map(|(n, _)| n)
                .sum()
        };
        assert_eq!(sum(&['M', 'D']), 9);
        assert_eq!(sum(&['M', 'I']), 10);
        assert_eq!(sam.qual, "*");
        assert_eq!(sam.mapq, MAPQ_MISSING);
        assert_eq!(sam.score, None);
    }

    #[test]
    fn test_rejects() {
        let b = block(&["s r 0 4 - 100 ACGT", "s q 0 4 + 4 ACGT"]);
        assert!(matches!(SamRecord::from_maf(&b), Err(ConvError::Constraint(_))));

        let b = block(&["s r 0 9 + 100 MKV", "s q 0 3 + 4 MKV"]);
        assert!(matches!(SamRecord::from_maf(&b), Err(ConvError::Constraint(_))));

        let b = block(&["s r 0 4 + 100 ACGT", "s q 0 4 + 4 ACGT", "q other IIII"]);
        assert!(matches!(SamRecord::from_maf(&b), Err(ConvError::Constraint(_))));

        let b = block(&["a mismap=2", "s r 0 4 + 100 ACGT", "s q 0 4 + 4 ACGT"]);
        assert!(matches!(SamRecord::from_maf(&b), Err(ConvError::Value(_))));

        let b = block(&["a score=1.5", "s r 0 4 + 100 ACGT", "s q 0 4 + 4 ACGT"]);
        assert_eq!(SamRecord::from_maf(&b).unwrap().score, None);
    }

    #[test]
    fn test_header() {
        let mut lengths = IndexMap::new();
        lengths.insert("chr2".to_string(), 500);
        lengths.insert("chr1".to_string(), 1000);
        let mut buf = vec![];
        write_header(&mut buf, &lengths).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "@HD\tVN:1.3\tSO:unknown\n@SQ\tSN:chr2\tLN:500\n@SQ\tSN:chr1\tLN:1000\n"
        );
    }
}
