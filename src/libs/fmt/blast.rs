use crate::libs::confidence::pairwise_symbol;
use crate::libs::coord::chunk_coords;
use crate::libs::error::ConvError;
use crate::libs::geometry::{is_gapless, is_match, letter_sizes};
use crate::libs::maf::{MafBlock, Strand};

fn strand_text(strand: Strand) -> &'static str {
    match strand {
        Strand::Forward => "Plus",
        Strand::Reverse => "Minus",
    }
}

pub fn check(block: &MafBlock) -> Result<(), ConvError> {
    block.require_pairwise()?;
    block.required_annotation("score")?;
    Ok(())
}

/// Renders a pairwise block as the lines of a BLAST-like report, wrapped every
/// `line_size` columns. Row 1 is the query, row 0 the subject.
pub fn to_blast(block: &MafBlock, line_size: usize) -> Result<Vec<String>, ConvError> {
    check(block)?;
    let score = block.required_annotation("score")?;

    let subject = &block.components[0];
    let query = &block.components[1];

    let mut lines = vec![
        format!("Query= {}", query.src),
        format!("         ({} letters)", query.src_size),
        String::new(),
        format!(">{}", subject.src),
        format!("          Length = {}", subject.src_size),
        String::new(),
    ];

    let mut score_line = format!(" Score = {}", score);
    if let Some(expect) = block.annotation("expect") {
        score_line += &format!(", Expect = {}", expect);
    }
    lines.push(score_line);

    let columns: Vec<Vec<u8>> = (0..block.columns()).map(|i| block.column(i)).collect();
    let aln_size = columns.len();

    // round down, like BLAST
    let matches = columns.iter().filter(|c| is_match(c)).count();
    let mut ident_line = format!(
        " Identities = {}/{} ({}%)",
        matches,
        aln_size,
        100 * matches / aln_size
    );
    let gaps = aln_size - columns.iter().filter(|c| is_gapless(c)).count();
    if gaps > 0 {
        ident_line += &format!(", Gaps = {}/{} ({}%)", gaps, aln_size, 100 * gaps / aln_size);
    }
    lines.push(ident_line);

    lines.push(format!(
        " Strand = {} / {}",
        strand_text(query.strand),
        strand_text(subject.strand)
    ));
    lines.push(String::new());

    for chunk in chunk_coords(block, &letter_sizes(block), line_size) {
        let width = chunk.starts.iter().map(|s| s.len()).max().unwrap_or(0);
        let symbols: String = columns[chunk.beg..chunk.end]
            .iter()
            .map(|c| pairwise_symbol(c))
            .collect();

        lines.push(format!(
            "Query: {:<width$} {} {}",
            chunk.starts[1],
            &query.text[chunk.beg..chunk.end],
            chunk.ends[1],
        ));
        lines.push(format!("       {:<width$} {}", " ", symbols));
        lines.push(format!(
            "Sbjct: {:<width$} {} {}",
            chunk.starts[0],
            &subject.text[chunk.beg..chunk.end],
            chunk.ends[0],
        ));
        lines.push(String::new());
    }

    Ok(lines)
}
