use std::io;

use crate::libs::coord::axt_range;
use crate::libs::error::ConvError;
use crate::libs::maf::{MafBlock, Strand};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxtRange {
    pub name: String,
    pub start: u64, // 0-based
    pub end: u64,   // 0-based, half-open
    pub strand: Strand,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axt {
    pub id: u64, // The first number in the header line
    pub target: AxtRange,
    pub queries: Vec<AxtRange>,
    pub score: String,
    pub syms: Vec<String>,
}

pub fn check(block: &MafBlock) -> Result<(), ConvError> {
    if !block.components[0].strand.is_forward() {
        return Err(ConvError::constraint(
            "for AXT, the 1st strand in each alignment must be +",
        ));
    }
    block.required_annotation("score")?;
    Ok(())
}

impl Axt {
    /// The AXT record of a block; `id` is the running record number.
    pub fn from_maf(block: &MafBlock, id: u64) -> Result<Self, ConvError> {
        check(block)?;
        let score = block.required_annotation("score")?.to_string();

        let mut ranges = block.components.iter().map(|c| AxtRange {
            name: c.src.clone(),
            start: c.start,
            end: c.end(),
            strand: c.strand,
        });
        let target = ranges.next().unwrap_or_default();
        let queries = ranges.collect();

        Ok(Axt {
            id,
            target,
            queries,
            score,
            syms: block.components.iter().map(|c| c.text.clone()).collect(),
        })
    }
}

pub fn write_axt<W: io::Write>(writer: &mut W, axt: &Axt) -> io::Result<()> {
    // Header, 1-based coordinates
    // Format: id tName tStart tEnd qName qStart qEnd qStrand score
    let (t_start, t_end) = axt_range(axt.target.start, axt.target.end - axt.target.start);
    write!(writer, "{} {} {} {}", axt.id, axt.target.name, t_start, t_end)?;
    for q in &axt.queries {
        let (q_start, q_end) = axt_range(q.start, q.end - q.start);
        write!(writer, " {} {} {} {}", q.name, q_start, q_end, q.strand)?;
    }
    writeln!(writer, " {}", axt.score)?;

    for sym in &axt.syms {
        writeln!(writer, "{}", sym)?;
    }
    writeln!(writer)?; // Blank line

    Ok(())
}
