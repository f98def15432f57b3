extern crate clap;
use clap::*;

use mafconv::libs::format::Format;

mod cmd_mafconv;

fn init_log(verbosity: usize) -> anyhow::Result<()> {
    stderrlog::new()
        .module(module_path!())
        .quiet(false)
        .verbosity(verbosity)
        .timestamp(stderrlog::Timestamp::Off)
        .init()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut app = Command::new("mafconv")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`mafconv` - Convert MAF alignments to other formats")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More log messages on stderr; repeat for more"),
        )
        .subcommand(cmd_mafconv::convert::make_subcommand());
    for format in Format::ALL {
        app = app.subcommand(cmd_mafconv::to::make_subcommand(format));
    }
    let app = app.after_help(
        r###"Subcommands:

* convert <format> - any format, chosen by name or prefix
* to-axt, to-blast, to-html, to-psl, to-sam, to-tab - one format each

"###,
    );

    let matches = app.get_matches();
    // warnings by default
    init_log(1 + matches.get_count("verbose") as usize)?;

    // Check which subcomamnd the user ran...
    let result = match matches.subcommand() {
        Some(("convert", sub_matches)) => cmd_mafconv::convert::execute(sub_matches),
        Some((name, sub_matches)) => match Format::ALL
            .into_iter()
            .find(|f| cmd_mafconv::to::command_name(*f) == name)
        {
            Some(format) => cmd_mafconv::to::execute(format, sub_matches),
            None => unreachable!(),
        },
        _ => unreachable!(),
    };

    match result {
        // The reader went away, e.g. `mafconv ... | head`
        Err(e) if mafconv::is_broken_pipe(&e) => Ok(()),
        other => other,
    }
}
