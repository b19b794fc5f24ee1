pub mod to_gff;

pub fn make_subcommand() -> clap::Command {
    clap::Command::new("maf")
        .about("Maf tools")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(to_gff::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("to-gff", sub_matches)) => to_gff::execute(sub_matches),
        _ => Ok(()),
    }
}
