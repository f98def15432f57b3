use indexmap::IndexMap;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::io::BufRead;

use crate::libs::error::ConvError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    pub fn is_forward(&self) -> bool {
        matches!(self, Strand::Forward)
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl std::str::FromStr for Strand {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Err(ConvError::parse(format!("bad strand: {}", s))),
        }
    }
}

/// One `s` line: a sequence's participation in an alignment block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MafComp {
    pub src: String,
    pub start: u64, // 0-based, strand-relative
    pub size: u64,  // letters consumed, gaps and frameshifts excluded
    pub strand: Strand,
    pub src_size: u64,
    pub text: String,
}

impl MafComp {
    /// End of the aligned region, 0-based half-open, strand-relative
    pub fn end(&self) -> u64 {
        self.start + self.size
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MafBlock {
    pub annotations: HashMap<String, String>,
    pub components: Vec<MafComp>,
    /// (sequence name, quality string) of each `q` line
    pub qualities: Vec<(String, String)>,
    /// The per-column values of each `p` line
    pub probs: Vec<Vec<String>>,
}

fn parse_number(field: &str, what: &str) -> Result<u64, ConvError> {
    field
        .parse::<u64>()
        .map_err(|_| ConvError::value(format!("bad {}: {}", what, field)))
}

impl MafBlock {
    /// Builds a block from the non-blank lines of one paragraph.
    ///
    /// Line kinds other than `a`, `s`, `q` and `p` are ignored.
    ///
    /// ```
    /// use mafconv::libs::maf::MafBlock;
    /// let lines = ["a score=50", "s chr1 100 4 + 1000 ACGT", "s chr2 200 4 + 500 ACGT"];
    /// let block = MafBlock::from_lines(&lines).unwrap();
    /// assert_eq!(block.components.len(), 2);
    /// assert_eq!(block.annotation("score"), Some("50"));
    /// assert_eq!(block.columns(), 4);
    /// ```
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, ConvError> {
        let mut block = MafBlock::default();

        for line in lines {
            let fields: Vec<&str> = line.as_ref().split_whitespace().collect();
            match fields.first() {
                Some(&"a") => {
                    for pair in &fields[1..] {
                        let (key, value) = pair
                            .split_once('=')
                            .ok_or_else(|| ConvError::parse(format!("bad annotation: {}", pair)))?;
                        block.annotations.insert(key.to_string(), value.to_string());
                    }
                }
                Some(&"s") => {
                    if fields.len() < 7 {
                        return Err(ConvError::parse(format!(
                            "bad sequence line: {}",
                            line.as_ref().trim_end()
                        )));
                    }
                    let text = fields[6];
                    if !text.is_ascii() {
                        return Err(ConvError::parse(format!(
                            "non-ASCII alignment text for {}",
                            fields[1]
                        )));
                    }
                    let comp = MafComp {
                        src: fields[1].to_string(),
                        start: parse_number(fields[2], "start")?,
                        size: parse_number(fields[3], "size")?,
                        strand: fields[4].parse()?,
                        src_size: parse_number(fields[5], "sequence size")?,
                        text: text.to_string(),
                    };
                    // coordinates get mirrored against the sequence size
                    match comp.start.checked_add(comp.size) {
                        Some(end) if end <= comp.src_size => {}
                        _ => {
                            return Err(ConvError::parse(format!(
                                "{} {} {} lies outside the sequence size {}",
                                comp.src, comp.start, comp.size, comp.src_size
                            )));
                        }
                    }
                    block.components.push(comp);
                }
                Some(&"q") => {
                    if fields.len() < 3 {
                        return Err(ConvError::parse(format!(
                            "bad quality line: {}",
                            line.as_ref().trim_end()
                        )));
                    }
                    block
                        .qualities
                        .push((fields[1].to_string(), fields[2].to_string()));
                }
                Some(&"p") => {
                    block
                        .probs
                        .push(fields[1..].iter().map(|s| s.to_string()).collect());
                }
                _ => {}
            }
        }

        if block.components.is_empty() {
            return Err(ConvError::parse("empty alignment"));
        }

        let columns = block.components[0].text.len();
        if let Some(comp) = block.components.iter().find(|c| c.text.len() != columns) {
            return Err(ConvError::parse(format!(
                "alignment lengths differ: {} has {} columns, expected {}",
                comp.src,
                comp.text.len(),
                columns
            )));
        }

        Ok(block)
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(|s| s.as_str())
    }

    pub fn required_annotation(&self, key: &str) -> Result<&str, ConvError> {
        self.annotation(key)
            .ok_or_else(|| ConvError::MissingAnnotation(key.to_string()))
    }

    /// Number of alignment columns
    pub fn columns(&self) -> usize {
        self.components[0].text.len()
    }

    /// Bytes of every row at column `i`
    pub fn column(&self, i: usize) -> Vec<u8> {
        self.components
            .iter()
            .map(|c| c.text.as_bytes()[i])
            .collect()
    }

    pub fn is_pairwise(&self) -> bool {
        self.components.len() == 2
    }

    pub fn require_pairwise(&self) -> Result<(), ConvError> {
        if self.is_pairwise() {
            Ok(())
        } else {
            Err(ConvError::constraint("pairwise alignments only, please"))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MafItem {
    /// A `#` line, without its line terminator
    Comment(String),
    Block(MafBlock),
}

/// Yields comment lines and parsed blocks from MAF text, one block at a time.
///
/// Comments inside a paragraph come out before the block they interrupt.
pub struct MafReader<R> {
    reader: R,
    line_buf: String,
    lines: Vec<String>,
    queue: VecDeque<MafItem>,
    done: bool,
}

impl<R: BufRead> MafReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: String::new(),
            lines: vec![],
            queue: VecDeque::new(),
            done: false,
        }
    }

    fn flush_block(&mut self) -> Result<(), ConvError> {
        if !self.lines.is_empty() {
            let block = MafBlock::from_lines(&self.lines)?;
            self.lines.clear();
            self.queue.push_back(MafItem::Block(block));
        }
        Ok(())
    }

    // Reads lines until at least one item is queued or input runs out
    fn fill(&mut self) -> anyhow::Result<()> {
        let mut comments = vec![];
        while self.queue.is_empty() && !self.done {
            self.line_buf.clear();
            if self.reader.read_line(&mut self.line_buf)? == 0 {
                self.done = true;
                self.queue.extend(comments.drain(..));
                self.flush_block()?;
                break;
            }

            let line = self.line_buf.trim_end_matches(['\n', '\r']);
            if line.starts_with('#') {
                if self.lines.is_empty() {
                    self.queue.push_back(MafItem::Comment(line.to_string()));
                } else {
                    comments.push(MafItem::Comment(line.to_string()));
                }
            } else if line.trim().is_empty() {
                self.queue.extend(comments.drain(..));
                self.flush_block()?;
            } else {
                self.lines.push(line.to_string());
            }
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for MafReader<R> {
    type Item = anyhow::Result<MafItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.queue.is_empty() {
            if let Err(e) = self.fill() {
                self.done = true;
                self.lines.clear();
                return Some(Err(e));
            }
        }
        self.queue.pop_front().map(Ok)
    }
}

/// Name and length of the topmost sequence of every block, in order of first appearance.
///
/// A name seen again keeps its position and takes the later length.
pub fn read_seq_lengths<R: BufRead>(reader: R) -> anyhow::Result<IndexMap<String, u64>> {
    let mut lengths = IndexMap::new();
    let mut searching = true;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            searching = true;
        } else if searching {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.first() == Some(&"s") {
                if fields.len() < 6 {
                    return Err(ConvError::parse(format!("bad sequence line: {}", line)).into());
                }
                lengths.insert(
                    fields[1].to_string(),
                    parse_number(fields[5], "sequence size")?,
                );
                searching = false;
            }
        }
    }

    Ok(lengths)
}
