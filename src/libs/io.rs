use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Write};

/// Standard input for `stdin` or `-`, otherwise a file, decompressed when it ends in `.gz`.
///
/// ```
/// use std::io::BufRead;
/// let reader = mafconv::reader("tests/maf/pair.maf").unwrap();
/// let lines: Vec<_> = reader.lines().collect();
/// assert!(!lines.is_empty());
///
/// assert!(mafconv::reader("tests/maf/not_exist.maf").is_err());
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if is_stdin(input) {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

pub fn is_stdin(input: &str) -> bool {
    input == "stdin" || input == "-"
}

pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}

/// True when the error chain ends at a closed pipe, e.g. output piped into `head`.
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .map_or(false, |e| e.kind() == std::io::ErrorKind::BrokenPipe)
    })
}
