use indexmap::IndexMap;
use std::io::{BufRead, Write};

use crate::libs::error::ConvError;
use crate::libs::fmt::{axt, blast, html, psl, sam, tab};
use crate::libs::maf::{MafBlock, MafItem, MafReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Axt,
    Blast,
    Html,
    Psl,
    Sam,
    Tabular,
}

impl Format {
    /// Lookup order; a prefix selects the first entry it matches.
    pub const ALL: [Format; 6] = [
        Format::Axt,
        Format::Blast,
        Format::Html,
        Format::Psl,
        Format::Sam,
        Format::Tabular,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Format::Axt => "axt",
            Format::Blast => "blast",
            Format::Html => "html",
            Format::Psl => "psl",
            Format::Sam => "sam",
            Format::Tabular => "tabular",
        }
    }

    /// Case-insensitive prefix lookup.
    ///
    /// ```
    /// use mafconv::libs::format::Format;
    /// assert_eq!(Format::lookup("tab").unwrap(), Format::Tabular);
    /// assert_eq!(Format::lookup("B").unwrap(), Format::Blast);
    /// assert!(Format::lookup("bed").is_err());
    /// ```
    pub fn lookup(name: &str) -> Result<Format, ConvError> {
        let given = name.to_lowercase();
        Format::ALL
            .iter()
            .find(|f| f.name().starts_with(&given))
            .copied()
            .ok_or_else(|| ConvError::UnknownFormat(name.to_string()))
    }

    /// Only tabular output passes `#` lines through.
    pub fn keeps_comments(&self) -> bool {
        matches!(self, Format::Tabular)
    }

    /// Whether this format can express the block at all.
    pub fn check(&self, block: &MafBlock) -> Result<(), ConvError> {
        match self {
            Format::Axt => axt::check(block),
            Format::Blast => blast::check(block),
            Format::Html => Ok(()),
            Format::Psl => psl::check(block),
            Format::Sam => sam::check(block),
            Format::Tabular => tab::check(block),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Format {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::lookup(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Count PSL matches over all letters, not just nucleotides
    pub protein: bool,
    /// Columns per line in blast and html output
    pub line_size: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            protein: false,
            line_size: 60,
        }
    }
}

impl ConvertOptions {
    pub fn new(protein: bool, line_size: usize) -> Result<Self, ConvError> {
        if line_size == 0 {
            return Err(ConvError::value("line size must be at least 1"));
        }
        Ok(Self { protein, line_size })
    }
}

/// Streams MAF items into one output format.
///
/// ```
/// use indexmap::IndexMap;
/// use mafconv::libs::format::{ConvertOptions, Converter, Format};
///
/// let maf = "a score=50\ns chr1 100 4 + 1000 ACGT\ns chr2 200 4 + 500 ACGT\n";
/// let mut converter = Converter::new(Format::Axt, ConvertOptions::default());
/// let mut out = vec![];
/// let count = converter.run(maf.as_bytes(), &mut out, &IndexMap::new()).unwrap();
/// assert_eq!(count, 1);
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "0 chr1 101 104 chr2 201 204 + 50\nACGT\nACGT\n\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    format: Format,
    opts: ConvertOptions,
    axt_counter: u64,
}

impl Converter {
    pub fn new(format: Format, opts: ConvertOptions) -> Self {
        Self {
            format,
            opts,
            axt_counter: 0,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn write_header<W: Write>(
        &self,
        writer: &mut W,
        seq_lengths: &IndexMap<String, u64>,
    ) -> anyhow::Result<()> {
        match self.format {
            Format::Sam => sam::write_header(writer, seq_lengths)?,
            Format::Html => write_lines(writer, &html::header_lines())?,
            _ => {}
        }
        Ok(())
    }

    pub fn write_comment<W: Write>(&self, writer: &mut W, line: &str) -> anyhow::Result<()> {
        if self.format.keeps_comments() {
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }

    pub fn write_block<W: Write>(&mut self, writer: &mut W, block: &MafBlock) -> anyhow::Result<()> {
        self.format.check(block)?;

        match self.format {
            Format::Axt => {
                let record = axt::Axt::from_maf(block, self.axt_counter)?;
                self.axt_counter += 1;
                axt::write_axt(writer, &record)?;
            }
            Format::Blast => write_lines(writer, &blast::to_blast(block, self.opts.line_size)?)?,
            Format::Html => write_lines(writer, &html::to_html(block, self.opts.line_size))?,
            Format::Psl => writeln!(writer, "{}", psl::Psl::from_maf(block, self.opts.protein)?)?,
            Format::Sam => writeln!(writer, "{}", sam::SamRecord::from_maf(block)?)?,
            Format::Tabular => writeln!(writer, "{}", tab::to_tab(block)?)?,
        }
        Ok(())
    }

    pub fn write_trailer<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        if self.format == Format::Html {
            writeln!(writer, "{}", html::TRAILER)?;
        }
        Ok(())
    }

    /// Converts every item of one input; returns the number of blocks.
    pub fn write_items<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        writer: &mut W,
    ) -> anyhow::Result<usize> {
        let mut count = 0;
        for item in MafReader::new(reader) {
            match item? {
                MafItem::Comment(line) => self.write_comment(writer, &line)?,
                MafItem::Block(block) => {
                    self.write_block(writer, &block)?;
                    count += 1;
                }
            }
        }
        log::debug!("{} blocks in this input", count);
        Ok(count)
    }

    /// A whole conversion of a single input, header to trailer.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        writer: &mut W,
        seq_lengths: &IndexMap<String, u64>,
    ) -> anyhow::Result<usize> {
        self.write_header(writer, seq_lengths)?;
        let count = self.write_items(reader, writer)?;
        self.write_trailer(writer)?;
        Ok(count)
    }
}

fn write_lines<W: Write>(writer: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIR: &str = "\
# comment
a score=50 expect=1e-10 mismap=1e-05
s chr1 100 4 + 1000 ACGT
s chr2 200 4 + 500 ACGT

a score=20
s chr1 300 3 + 1000 AC-G
s chr3 0 4 - 40 ACTG
";

    fn convert(format: Format, input: &str) -> anyhow::Result<String> {
        let mut converter = Converter::new(format, ConvertOptions::default());
        let mut out = vec![];
        converter.run(input.as_bytes(), &mut out, &IndexMap::new())?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Format::lookup("a").unwrap(), Format::Axt);
        assert_eq!(Format::lookup("h").unwrap(), Format::Html);
        assert_eq!(Format::lookup("PSL").unwrap(), Format::Psl);
        assert_eq!(Format::lookup("s").unwrap(), Format::Sam);
        assert_eq!(Format::lookup("t").unwrap(), Format::Tabular);
        assert_eq!(Format::lookup("tabular").unwrap(), Format::Tabular);
        // the empty prefix matches the first entry
        assert_eq!(Format::lookup("").unwrap(), Format::Axt);
        assert_eq!(
            Format::lookup("tabs"),
            Err(ConvError::UnknownFormat("tabs".to_string()))
        );
        assert_eq!("bl".parse::<Format>().unwrap(), Format::Blast);
    }

    #[test]
    fn test_options() {
        assert_eq!(ConvertOptions::default().line_size, 60);
        assert!(matches!(
            ConvertOptions::new(false, 0),
            Err(ConvError::Value(_))
        ));
        assert_eq!(ConvertOptions::new(true, 10).unwrap().line_size, 10);
    }

    #[test]
    fn test_check() {
        let rev = MafBlock::from_lines(&["a score=1", "s a 0 4 - 9 ACGT", "s b 0 4 + 9 ACGT"])
            .unwrap();
        for f in [Format::Axt, Format::Psl, Format::Sam] {
            assert!(matches!(f.check(&rev), Err(ConvError::Constraint(_))));
        }
        for f in [Format::Blast, Format::Html, Format::Tabular] {
            assert!(f.check(&rev).is_ok());
        }

        let triple = MafBlock::from_lines(&[
            "s a 0 4 + 9 ACGT",
            "s b 0 4 + 9 ACGT",
            "s c 0 4 + 9 ACGT",
        ])
        .unwrap();
        assert!(Format::Html.check(&triple).is_ok());
        assert!(matches!(
            Format::Axt.check(&triple),
            Err(ConvError::MissingAnnotation(_))
        ));
        assert!(matches!(
            Format::Sam.check(&triple),
            Err(ConvError::Constraint(_))
        ));
    }

    #[test]
    fn test_check_agrees_with_encoders() {
        let blocks = [
            vec!["a score=1", "s a 0 4 - 9 ACGT", "s b 0 4 + 9 ACGT"],
            vec!["s a 0 4 + 9 ACGT", "s b 0 4 + 9 ACGT"],
            vec!["a score=1", "s a 0 4 + 9 ACGT", "s b 0 4 + 9 ACGT", "s c 0 4 + 9 ACGT"],
            vec!["a score=1", "s p 0 2 - 9 MK", "s d 0 6 + 9 MK"],
        ];
        for lines in &blocks {
            let block = MafBlock::from_lines(lines).unwrap();
            assert_eq!(
                Format::Axt.check(&block).err(),
                axt::Axt::from_maf(&block, 0).err()
            );
            assert_eq!(
                Format::Blast.check(&block).err(),
                blast::to_blast(&block, 60).err()
            );
            assert_eq!(
                Format::Psl.check(&block).err(),
                psl::Psl::from_maf(&block, true).err()
            );
            assert_eq!(
                Format::Sam.check(&block).err(),
                sam::SamRecord::from_maf(&block).err()
            );
            assert_eq!(
                Format::Tabular.check(&block).err(),
                tab::to_tab(&block).err()
            );
        }
    }

    #[test]
    fn test_axt_counter() {
        let out = convert(Format::Axt, PAIR).unwrap();
        let headers: Vec<&str> = out
            .lines()
            .filter(|l| l.split(' ').count() > 1)
            .collect();
        assert_eq!(
            headers,
            vec![
                "0 chr1 101 104 chr2 201 204 + 50",
                "1 chr1 301 303 chr3 1 4 - 20"
            ]
        );
        assert!(!out.contains("# comment"));
    }

    #[test]
    fn test_tabular_comments() {
        let out = convert(Format::Tabular, PAIR).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "# comment");
        assert!(lines[1].starts_with("50\tchr1\t100\t4\t+\t1000\t"));
        assert_eq!(lines[2], "20\tchr1\t300\t3\t+\t1000\tchr3\t0\t4\t-\t40\t2,0:1,1");
    }

    #[test]
    fn test_sam_header() {
        let mut lengths = IndexMap::new();
        lengths.insert("chr1".to_string(), 1000);
        let mut converter = Converter::new(Format::Sam, ConvertOptions::default());
        let mut out = vec![];
        let count = converter.run(PAIR.as_bytes(), &mut out, &lengths).unwrap();
        assert_eq!(count, 2);

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "@HD\tVN:1.3\tSO:unknown");
        assert_eq!(lines[1], "@SQ\tSN:chr1\tLN:1000");
        assert_eq!(
            lines[2],
            "chr2\t0\tchr1\t101\t50\t200H4M296H\t*\t0\t0\tACGT\t*\tNM:i:0\tAS:i:50\tEV:Z:1e-10"
        );
        assert!(lines[3].starts_with("chr3\t16\tchr1\t301\t255\t2M1I1M36H\t"));
    }

    #[test]
    fn test_html_frame() {
        let out = convert(Format::Html, "s a 0 3 + 5 ACG\n").unwrap();
        assert!(out.starts_with("\n<!DOCTYPE HTML"));
        assert!(out.contains("<h3>Alignment:</h3>\n<pre>\na 1 ACG 3\n"));
        assert!(out.ends_with("</pre>\n</body></html>\n"));

        // prologue and epilogue even without blocks
        let out = convert(Format::Html, "").unwrap();
        assert!(out.ends_with("</div>\n\n</body></html>\n"));
    }

    #[test]
    fn test_errors_abort() {
        let input = "a score=1\ns a 0 4 + 9 ACGT\n\ns b 0 4 + 9 ACGT\n";
        let err = convert(Format::Tabular, input).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConvError>(),
            Some(&ConvError::MissingAnnotation("score".to_string()))
        );

        let err = convert(Format::Psl, "a score=1\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvError>(),
            Some(ConvError::Parse(_))
        ));
    }
}
