use itertools::Itertools;

use crate::libs::error::ConvError;
use crate::libs::geometry::{letter_sizes, partition, Segment};
use crate::libs::maf::MafBlock;

/// Gap structure as comma-separated segments, each a gapless length or the
/// colon-separated per-row insertion sizes.
///
/// ```
/// use mafconv::libs::fmt::tab::gap_word;
/// use mafconv::libs::maf::MafBlock;
/// let block = MafBlock::from_lines(&["s a 0 4 + 9 AC-GT", "s b 0 5 + 9 ACGGT"]).unwrap();
/// assert_eq!(gap_word(&block), "2,0:1,2");
/// ```
pub fn gap_word(block: &MafBlock) -> String {
    partition(block, &letter_sizes(block))
        .iter()
        .map(|seg| match seg {
            Segment::Gapless(n) => n.to_string(),
            Segment::Insertion(sizes) => sizes.iter().join(":"),
        })
        .join(",")
}

pub fn check(block: &MafBlock) -> Result<(), ConvError> {
    block.required_annotation("score")?;
    Ok(())
}

/// One tab-separated line, without the line terminator.
pub fn to_tab(block: &MafBlock) -> Result<String, ConvError> {
    check(block)?;
    let mut fields = vec![block.required_annotation("score")?.to_string()];

    for c in &block.components {
        fields.push(c.src.clone());
        fields.push(c.start.to_string());
        fields.push(c.size.to_string());
        fields.push(c.strand.to_string());
        fields.push(c.src_size.to_string());
    }

    fields.push(gap_word(block));

    for key in ["expect", "mismap"] {
        if let Some(value) = block.annotation(key) {
            fields.push(value.to_string());
        }
    }

    Ok(fields.join("\t"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_tab() {
        let block = MafBlock::from_lines(&[
            "a score=15 mismap=1e-05 expect=2.3e-3",
            "s chr1 10 5 + 100 AC-GTA",
            "s chr2 20 5 - 50 ACCG-A",
        ])
        .unwrap();
        assert_eq!(
            to_tab(&block).unwrap(),
            "15\tchr1\t10\t5\t+\t100\tchr2\t20\t5\t-\t50\t2,0:1,1,1:0,1\t2.3e-3\t1e-05"
        );
    }

    #[test]
    fn test_to_tab_plain() {
        let block =
            MafBlock::from_lines(&["a score=9", "s x 0 3 + 3 ACG", "s y 1 3 + 4 ACG"]).unwrap();
        assert_eq!(
            to_tab(&block).unwrap(),
            "9\tx\t0\t3\t+\t3\ty\t1\t3\t+\t4\t3"
        );

        let block = MafBlock::from_lines(&["s x 0 3 + 3 ACG"]).unwrap();
        assert!(to_tab(&block).is_err());
    }
}
