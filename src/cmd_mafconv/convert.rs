use anyhow::Context;
use clap::*;
use std::io::Write;

use mafconv::libs::format::{ConvertOptions, Converter, Format};
use mafconv::libs::maf::read_seq_lengths;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("convert")
        .about("Convert MAF alignments to another format")
        .after_help(
            r###"
Formats: axt, blast, html, psl, sam, tabular.
Any unique prefix is accepted, case-insensitively; an ambiguous one picks the
first in the list above, so `t` is tabular and `s` is sam.

Input files can be gzipped. If the input file is 'stdin' or '-', data is read from standard input.

Notes:
* Conversion stops at the first block the format can't express
* axt, psl and sam need the 1st sequence of each block on the + strand
* psl, sam and blast take pairwise alignments only
* Comment lines are kept only in tabular output

Examples:
1. LAST alignments to SAM, with a sequence dictionary:
   mafconv convert sam tests/maf/pair.maf -d

2. Colored HTML with 80 columns per line:
   mafconv convert html tests/maf/probs.maf -l 80 -o out.html

"###,
        )
        .arg(
            Arg::new("format")
                .required(true)
                .index(1)
                .value_parser(Format::lookup)
                .help("Output format, or a prefix of it"),
        );

    add_convert_args(cmd, 2)
}

/// Arguments shared by `convert` and the `to-*` subcommands.
pub fn add_convert_args(cmd: Command, first_index: usize) -> Command {
    cmd.arg(
        Arg::new("infiles")
            .num_args(1..)
            .index(first_index)
            .default_value("stdin")
            .help("Input MAF file(s) to process"),
    )
    .arg(
        Arg::new("protein")
            .long("protein")
            .short('p')
            .action(ArgAction::SetTrue)
            .help("Assume protein alignments, for psl match counts"),
    )
    .arg(
        Arg::new("dictionary")
            .long("dictionary")
            .short('d')
            .action(ArgAction::SetTrue)
            .help("Include a sequence dictionary in the SAM header"),
    )
    .arg(
        Arg::new("linesize")
            .long("linesize")
            .short('l')
            .num_args(1)
            .default_value("60")
            .value_parser(value_parser!(usize))
            .help("Line length for blast and html formats"),
    )
    .arg(
        Arg::new("outfile")
            .long("outfile")
            .short('o')
            .num_args(1)
            .default_value("stdout")
            .help("Output filename. [stdout] for screen"),
    )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let format = *args.get_one::<Format>("format").unwrap();
    run(format, args)
}

pub fn run(format: Format, args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let opts = ConvertOptions::new(
        args.get_flag("protein"),
        *args.get_one::<usize>("linesize").unwrap(),
    )?;
    let infiles: Vec<&String> = args.get_many::<String>("infiles").unwrap().collect();
    let is_dictionary = args.get_flag("dictionary");

    let seq_lengths = if is_dictionary {
        if format != Format::Sam {
            anyhow::bail!("--dictionary is only for sam output");
        }
        if infiles.iter().any(|f| mafconv::is_stdin(f)) {
            anyhow::bail!("--dictionary can't read standard input twice");
        }

        let mut lengths = indexmap::IndexMap::new();
        for infile in &infiles {
            // later files may add names or update lengths
            lengths.extend(read_seq_lengths(mafconv::reader(infile)?)?);
        }
        log::info!("{} sequences in the dictionary", lengths.len());
        lengths
    } else {
        indexmap::IndexMap::new()
    };

    let mut writer = mafconv::writer(args.get_one::<String>("outfile").unwrap())?;
    let mut converter = Converter::new(format, opts);
    log::debug!("converting {} file(s) to {}", infiles.len(), format);

    //----------------------------
    // Ops
    //----------------------------
    converter.write_header(&mut writer, &seq_lengths)?;
    let mut count = 0;
    for infile in &infiles {
        let reader = mafconv::reader(infile)?;
        count += converter
            .write_items(reader, &mut writer)
            .with_context(|| format!("converting {}", infile))?;
    }
    converter.write_trailer(&mut writer)?;
    writer.flush()?;

    log::info!("{} blocks written as {}", count, format);

    Ok(())
}
