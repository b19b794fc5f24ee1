//! Subcommand modules for the `mice` binary.

pub mod compress;
pub mod count;
pub mod maf;
pub mod sim;

use clap::{Arg, ArgAction, ArgMatches, Command};
use mice::libs::contract::Order;
use mice::libs::pipeline::BuildOptions;

/// Switches shared by `count` and `compress`.
pub fn build_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("no_telomeres")
            .long("no-telomeres")
            .action(ArgAction::SetTrue)
            .help("Do not anchor path ends to a telomere sentinel"),
    )
    .arg(
        Arg::new("scrub_loops")
            .long("scrub-loops")
            .action(ArgAction::SetTrue)
            .help("Remove edges joining a gene's head to its own tail"),
    )
    .arg(
        Arg::new("no_group_by")
            .long("no-group-by")
            .action(ArgAction::SetTrue)
            .help("Treat every path as its own genome instead of grouping on `#`"),
    )
    .arg(
        Arg::new("dirty")
            .long("dirty")
            .action(ArgAction::SetTrue)
            .help("Let repeated genes merge like unique ones"),
    )
    .arg(
        Arg::new("format")
            .long("format")
            .num_args(1)
            .value_parser(["gfa", "gff"])
            .help("Input format; inferred from the extension when omitted"),
    )
}

pub fn build_options(args: &ArgMatches, order: Order) -> BuildOptions {
    BuildOptions {
        telomeres: !args.get_flag("no_telomeres"),
        scrub_loops: args.get_flag("scrub_loops"),
        dirty: args.get_flag("dirty"),
        group_by: !args.get_flag("no_group_by"),
        order,
    }
}
