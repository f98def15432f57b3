use clap::*;

use mafconv::libs::format::Format;

use super::convert::{add_convert_args, run};

/// Subcommand name of each format
pub fn command_name(format: Format) -> &'static str {
    match format {
        Format::Axt => "to-axt",
        Format::Blast => "to-blast",
        Format::Html => "to-html",
        Format::Psl => "to-psl",
        Format::Sam => "to-sam",
        Format::Tabular => "to-tab",
    }
}

pub fn make_subcommand(format: Format) -> Command {
    let about = match format {
        Format::Axt => "Convert MAF to axt format",
        Format::Blast => "Convert MAF to BLAST-like pairwise text",
        Format::Html => "Convert MAF to HTML colored by column probabilities",
        Format::Psl => "Convert MAF to psl format",
        Format::Sam => "Convert MAF to SAM format",
        Format::Tabular => "Convert MAF to LAST tabular format",
    };

    add_convert_args(Command::new(command_name(format)).about(about), 1)
}

pub fn execute(format: Format, args: &ArgMatches) -> anyhow::Result<()> {
    run(format, args)
}
